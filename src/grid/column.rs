use std::borrow::Cow;
use std::fmt;

use crate::layout::ColumnWidth;

/// A cell value produced by a column accessor.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue<'a> {
    Number(f64),
    Text(Cow<'a, str>),
    /// The row has no value for the column.
    Empty,
}

impl<'a> CellValue<'a> {
    /// Numeric view of the value; text is parsed after dropping `,` separators and only
    /// finite parses count.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value).filter(|value| !value.is_nan()),
            Self::Text(text) => {
                let trimmed = text.trim();
                let parsed = if trimmed.contains(',') {
                    trimmed.replace(',', "").parse::<f64>()
                } else {
                    trimmed.parse::<f64>()
                };
                parsed.ok().filter(|value| value.is_finite())
            }
            Self::Empty => None,
        }
    }

    /// Plain text of the value; empty for [`CellValue::Empty`].
    pub fn into_text(self) -> Cow<'a, str> {
        match self {
            Self::Number(value) => Cow::Owned(value.to_string()),
            Self::Text(text) => text,
            Self::Empty => Cow::Borrowed(""),
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Empty => Ok(()),
        }
    }
}

impl From<f64> for CellValue<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for CellValue<'_> {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for CellValue<'_> {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<'a> From<&'a str> for CellValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl From<String> for CellValue<'_> {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

impl<'a, T: Into<CellValue<'a>>> From<Option<T>> for CellValue<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Declared value type of a column; decides how it sorts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColumnKind {
    Numeric,
    #[default]
    Text,
}

/// Reads the value of a column from a row.
pub type CellAccessor<R> = for<'a> fn(&'a R) -> CellValue<'a>;

/// Formats a row's cell for display and search.
pub type CellRenderer<R> = fn(&R) -> String;

/// Describes one grid column: identity, how to read and show it, width, and sortability.
pub struct GridColumn<R> {
    id: &'static str,
    header: &'static str,
    kind: ColumnKind,
    accessor: CellAccessor<R>,
    render: Option<CellRenderer<R>>,
    width: ColumnWidth,
    sortable: bool,
}

impl<R> Clone for GridColumn<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for GridColumn<R> {}

impl<R> fmt::Debug for GridColumn<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridColumn")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

impl<R> GridColumn<R> {
    /// A sortable text column.
    pub const fn new(id: &'static str, header: &'static str, accessor: CellAccessor<R>) -> Self {
        Self {
            id,
            header,
            kind: ColumnKind::Text,
            accessor,
            render: None,
            width: ColumnWidth::new(4, 12, 24),
            sortable: true,
        }
    }

    /// A sortable numeric column.
    pub const fn numeric(
        id: &'static str,
        header: &'static str,
        accessor: CellAccessor<R>,
    ) -> Self {
        Self::new(id, header, accessor).kind(ColumnKind::Numeric)
    }

    #[must_use]
    pub const fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Display formatter; also the text the search matches against.
    #[must_use]
    pub const fn render(mut self, render: CellRenderer<R>) -> Self {
        self.render = Some(render);
        self
    }

    #[must_use]
    pub const fn width(mut self, width: ColumnWidth) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub const fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub const fn id(&self) -> &'static str {
        self.id
    }

    pub const fn header(&self) -> &'static str {
        self.header
    }

    pub const fn column_kind(&self) -> ColumnKind {
        self.kind
    }

    pub const fn column_width(&self) -> ColumnWidth {
        self.width
    }

    pub const fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Raw value of the cell.
    pub fn value<'a>(&self, row: &'a R) -> CellValue<'a> {
        (self.accessor)(row)
    }

    /// Displayed text of the cell: the renderer output, else the raw value.
    pub fn display<'a>(&self, row: &'a R) -> Cow<'a, str> {
        match self.render {
            Some(render) => Cow::Owned(render(row)),
            None => self.value(row).into_text(),
        }
    }
}

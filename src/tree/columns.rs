use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row};
use smallvec::SmallVec;

use crate::layout::{ColumnWidth, width_constraints};

use super::model::HierarchicalRow;

/// Column layout and payload cells for tree rows.
pub trait TreeColumns<P> {
    /// Returns an optional header row (label column first).
    fn header(&self) -> Option<Row<'_>> {
        None
    }
    /// Returns cells for the columns after the label column.
    fn cells<'a>(&'a self, row: &'a HierarchicalRow<P>) -> SmallVec<[Cell<'a>; 8]>;
    /// Returns constraints for all columns (label column first) for the given width.
    fn constraints(&self, width: u16) -> SmallVec<[Constraint; 8]>;
}

/// Function pointer type for rendering a payload cell.
pub type TreeCellFn<P> = for<'a> fn(&'a HierarchicalRow<P>) -> Cell<'a>;

/// A payload column: header, width bounds, and cell renderer.
pub struct TreeColumn<P> {
    pub header: &'static str,
    pub width: ColumnWidth,
    pub cell: TreeCellFn<P>,
}

impl<P> TreeColumn<P> {
    pub const fn new(header: &'static str, width: ColumnWidth, cell: TreeCellFn<P>) -> Self {
        Self {
            header,
            width,
            cell,
        }
    }
}

impl<P> Clone for TreeColumn<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for TreeColumn<P> {}

/// How [`PayloadColumns`] turns width bounds into constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColumnSizing {
    /// Every column gets its ideal width.
    #[default]
    Ideal,
    /// Widths are distributed over the available area (min → ideal → max).
    Adaptive,
}

/// Label column plus a list of payload columns.
pub struct PayloadColumns<P> {
    label_header: &'static str,
    label_width: ColumnWidth,
    columns: Vec<TreeColumn<P>>,
    sizing: ColumnSizing,
    header_style: Style,
    show_header: bool,
}

impl<P> PayloadColumns<P> {
    /// Creates a layout with only the label column.
    pub fn new(label_header: &'static str, label_width: ColumnWidth) -> Self {
        Self {
            label_header,
            label_width,
            columns: Vec::new(),
            sizing: ColumnSizing::Ideal,
            header_style: Style::default(),
            show_header: true,
        }
    }

    /// Appends a payload column.
    #[must_use]
    pub fn column(mut self, column: TreeColumn<P>) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets how widths are computed.
    #[must_use]
    pub const fn sizing(mut self, sizing: ColumnSizing) -> Self {
        self.sizing = sizing;
        self
    }

    /// Sets the header row style.
    #[must_use]
    pub const fn header_style(mut self, style: Style) -> Self {
        self.header_style = style;
        self
    }

    /// Disables the header row.
    #[must_use]
    pub const fn without_header(mut self) -> Self {
        self.show_header = false;
        self
    }

    fn widths(&self) -> SmallVec<[ColumnWidth; 8]> {
        std::iter::once(self.label_width)
            .chain(self.columns.iter().map(|column| column.width))
            .collect()
    }
}

impl<P> TreeColumns<P> for PayloadColumns<P> {
    fn header(&self) -> Option<Row<'_>> {
        if !self.show_header {
            return None;
        }
        let cells: SmallVec<[Cell; 8]> = std::iter::once(self.label_header)
            .chain(self.columns.iter().map(|column| column.header))
            .map(Cell::from)
            .collect();
        Some(Row::new(cells).style(self.header_style))
    }

    fn cells<'a>(&'a self, row: &'a HierarchicalRow<P>) -> SmallVec<[Cell<'a>; 8]> {
        self.columns.iter().map(|column| (column.cell)(row)).collect()
    }

    fn constraints(&self, width: u16) -> SmallVec<[Constraint; 8]> {
        match self.sizing {
            ColumnSizing::Ideal => self
                .widths()
                .iter()
                .map(|w| Constraint::Length(w.ideal))
                .collect(),
            ColumnSizing::Adaptive => width_constraints(width, &self.widths()),
        }
    }
}

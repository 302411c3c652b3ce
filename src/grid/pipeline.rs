//! Filter → sort → page stages of the grid.
//!
//! Each stage consumes the output type of the previous one, so the order cannot be
//! rearranged by accident.

use std::cmp::Ordering;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::column::{ColumnKind, GridColumn};

/// Sort order of the active sort column.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Header glyph for the direction.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// The single active sort column and its direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
    pub column: &'static str,
    pub direction: SortDirection,
}

/// Page position and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationState {
    /// Zero-based page index.
    pub page_index: usize,
    /// Rows per page, at least 1.
    pub page_size: usize,
}

impl PaginationState {
    /// Number of pages for `total` rows; 0 when there are no rows.
    pub const fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Source range of the current page within `total` rows.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(total);
        start..start.saturating_add(self.page_size).min(total)
    }
}

/// Row indices that passed the global filter, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Filtered(Vec<usize>);

/// Filtered row indices in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Sorted(Vec<usize>);

impl Filtered {
    pub(crate) const fn len(&self) -> usize {
        self.0.len()
    }
}

impl Sorted {
    pub(crate) fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub(crate) const fn len(&self) -> usize {
        self.0.len()
    }

    /// Row indices of one page.
    pub(crate) fn page(&self, range: Range<usize>) -> &[usize] {
        self.0.get(range).unwrap_or_default()
    }
}

/// Keeps rows where any of `columns` displays text containing `query` (already
/// lower-cased). An empty query keeps everything.
pub(crate) fn filter<R>(rows: &[R], columns: &[&GridColumn<R>], query: &str) -> Filtered {
    if query.is_empty() {
        return Filtered((0..rows.len()).collect());
    }
    let matches = |row: &R| {
        columns
            .iter()
            .any(|column| column.display(row).to_lowercase().contains(query))
    };
    Filtered(
        rows.iter()
            .enumerate()
            .filter_map(|(idx, row)| matches(row).then_some(idx))
            .collect(),
    )
}

enum SortKey {
    Number(f64),
    Text(String),
    /// Numeric column value that is empty or does not parse.
    Missing,
}

fn sort_key<R>(column: &GridColumn<R>, row: &R) -> SortKey {
    let value = column.value(row);
    match column.column_kind() {
        ColumnKind::Numeric => value.as_number().map_or(SortKey::Missing, SortKey::Number),
        ColumnKind::Text => SortKey::Text(value.into_text().to_lowercase()),
    }
}

// Missing numeric values stay after every number in both directions.
fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
        (SortKey::Missing, _) => return Ordering::Greater,
        (_, SortKey::Missing) => return Ordering::Less,
        (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
        (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    };
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Orders the filtered rows by `sort`; stable, so ties keep source order.
pub(crate) fn sort<R>(
    rows: &[R],
    filtered: &Filtered,
    sort: Option<(&GridColumn<R>, SortDirection)>,
) -> Sorted {
    let Some((column, direction)) = sort else {
        return Sorted(filtered.0.clone());
    };
    let mut keyed: Vec<(usize, SortKey)> = filtered
        .0
        .iter()
        .map(|&idx| (idx, sort_key(column, &rows[idx])))
        .collect();
    keyed.sort_by(|(_, a), (_, b)| compare_keys(a, b, direction));
    Sorted(keyed.into_iter().map(|(idx, _)| idx).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::column::CellValue;

    struct Row {
        name: &'static str,
        units: &'static str,
    }

    fn name(row: &Row) -> CellValue<'_> {
        row.name.into()
    }

    fn units(row: &Row) -> CellValue<'_> {
        if row.units.is_empty() {
            CellValue::Empty
        } else {
            row.units.into()
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Beta", units: "12" },
            Row { name: "alpha", units: "n/a" },
            Row { name: "Gamma", units: "3" },
            Row { name: "delta", units: "" },
            Row { name: "Alpha", units: "100" },
        ]
    }

    fn names(rows: &[Row], sorted: &Sorted) -> Vec<&'static str> {
        sorted.as_slice().iter().map(|&idx| rows[idx].name).collect()
    }

    #[test]
    fn filter_is_case_insensitive_over_the_given_columns() {
        let rows = rows();
        let name_col = GridColumn::new("name", "Name", name);
        let units_col = GridColumn::numeric("units", "Units", units);

        let by_name = filter(&rows, &[&name_col], "alp");
        assert_eq!(by_name.0, vec![1, 4]);

        let by_units = filter(&rows, &[&name_col, &units_col], "12");
        assert_eq!(by_units.0, vec![0]);

        assert_eq!(filter(&rows, &[], "").len(), rows.len());
        assert_eq!(filter(&rows, &[], "beta").len(), 0);
    }

    #[test]
    fn numeric_sort_puts_unparseable_values_last_in_both_directions() {
        let rows = rows();
        let units_col = GridColumn::numeric("units", "Units", units);
        let all = filter(&rows, &[], "");

        let asc = sort(&rows, &all, Some((&units_col, SortDirection::Ascending)));
        assert_eq!(names(&rows, &asc), vec!["Gamma", "Beta", "Alpha", "alpha", "delta"]);

        let desc = sort(&rows, &all, Some((&units_col, SortDirection::Descending)));
        assert_eq!(names(&rows, &desc), vec!["Alpha", "Beta", "Gamma", "alpha", "delta"]);
    }

    #[test]
    fn infinity_text_sorts_with_the_unparseable_values() {
        let rows = vec![
            Row { name: "five", units: "5" },
            Row { name: "inf", units: "Infinity" },
            Row { name: "na", units: "n/a" },
            Row { name: "seven", units: "7" },
        ];
        let units_col = GridColumn::numeric("units", "Units", units);
        let all = filter(&rows, &[], "");

        let desc = sort(&rows, &all, Some((&units_col, SortDirection::Descending)));
        assert_eq!(names(&rows, &desc), vec!["seven", "five", "inf", "na"]);
    }

    #[test]
    fn text_sort_is_case_insensitive_and_stable() {
        let rows = rows();
        let name_col = GridColumn::new("name", "Name", name);
        let all = filter(&rows, &[], "");

        let asc = sort(&rows, &all, Some((&name_col, SortDirection::Ascending)));
        assert_eq!(names(&rows, &asc), vec!["alpha", "Alpha", "Beta", "delta", "Gamma"]);

        let unsorted = sort(&rows, &all, None);
        assert_eq!(unsorted.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn pagination_ranges_clamp_to_total() {
        let pagination = PaginationState {
            page_index: 2,
            page_size: 10,
        };
        assert_eq!(pagination.page_count(25), 3);
        assert_eq!(pagination.range(25), 20..25);
        assert_eq!(pagination.page_count(0), 0);
        assert_eq!(pagination.range(0), 0..0);
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::widgets::{Borders, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget};
use smallvec::SmallVec;

/// Width bounds for a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnWidth {
    /// Minimum width.
    pub min: u16,
    /// Ideal width (filled before growing toward `max`).
    pub ideal: u16,
    /// Maximum width.
    pub max: u16,
}

impl ColumnWidth {
    /// Creates a width with distinct bounds.
    pub const fn new(min: u16, ideal: u16, max: u16) -> Self {
        Self { min, ideal, max }
    }

    /// Creates a fixed width (min = ideal = max).
    pub const fn fixed(width: u16) -> Self {
        Self::new(width, width, width)
    }
}

/// Distributes `total` width across columns respecting `min`/`ideal`/`max`.
///
/// Columns first get their minimum, then grow toward `ideal` left to right, then toward
/// `max`. If `total` is outside `sum(min)..=sum(max)` the widths are clamped, so the sum
/// may differ from `total`.
pub fn distribute_widths(total: u16, columns: &[ColumnWidth]) -> SmallVec<[u16; 8]> {
    let mut widths: SmallVec<[u16; 8]> = columns.iter().map(|col| col.min).collect();
    let min_sum = widths.iter().fold(0u16, |acc, w| acc.saturating_add(*w));
    let mut remaining = total.saturating_sub(min_sum);

    let targets: [fn(&ColumnWidth) -> u16; 2] = [|col| col.ideal.max(col.min), |col| col.max];
    'grow: for target in targets {
        for (width, col) in widths.iter_mut().zip(columns) {
            if remaining == 0 {
                break 'grow;
            }
            let add = target(col).saturating_sub(*width).min(remaining);
            *width += add;
            remaining -= add;
        }
    }
    widths
}

/// Turns distributed widths into `Length` constraints.
pub fn width_constraints(total: u16, columns: &[ColumnWidth]) -> SmallVec<[Constraint; 8]> {
    distribute_widths(total, columns)
        .into_iter()
        .map(Constraint::Length)
        .collect()
}

/// Splits a one-column scrollbar off the right edge when `scroll_rows > 0`.
///
/// The returned borders drop the right border, which the scrollbar replaces.
pub(crate) fn split_scrollbar(
    area: Rect,
    borders: Borders,
    scroll_rows: usize,
) -> (Rect, Borders, Option<Rect>) {
    if scroll_rows == 0 {
        return (area, borders, None);
    }
    let table_area = Rect {
        width: area.width.saturating_sub(1),
        ..area
    };
    let scrollbar_area = Rect {
        x: area.x + area.width.saturating_sub(1),
        width: 1.min(area.width),
        ..area
    };
    let mut borders = borders;
    borders.remove(Borders::RIGHT);
    (table_area, borders, Some(scrollbar_area))
}

pub(crate) fn render_scrollbar(
    area: Rect,
    buf: &mut Buffer,
    offset: usize,
    viewport: usize,
    scroll_rows: usize,
) {
    let mut scrollbar_state = ScrollbarState::new(scroll_rows.saturating_add(1))
        .position(offset.min(scroll_rows))
        .viewport_content_length(viewport);
    Scrollbar::default()
        .orientation(ScrollbarOrientation::VerticalRight)
        .render(area, buf, &mut scrollbar_state);
}

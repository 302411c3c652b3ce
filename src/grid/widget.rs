use std::marker::PhantomData;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Row, StatefulWidget, Table, TableState};
use smallvec::SmallVec;

use crate::layout::{ColumnWidth, render_scrollbar, split_scrollbar, width_constraints};
use crate::style::TableStyle;

use super::column::GridColumn;
use super::state::{GridTable, RowEmphasis};

/// Text of the single row shown when nothing passes the filter.
pub const NO_RESULTS: &str = "No results.";

/// Renders the current page of a [`GridTable`] with a sortable header and a result footer.
pub struct GridTableView<'a, R> {
    style: TableStyle<'a>,
    show_footer: bool,
    show_sort_hints: bool,
    _rows: PhantomData<fn(&R)>,
}

impl<'a, R> GridTableView<'a, R> {
    pub const fn new(style: TableStyle<'a>) -> Self {
        Self {
            style,
            show_footer: true,
            show_sort_hints: true,
            _rows: PhantomData,
        }
    }

    /// Hides the "Showing …" footer.
    #[must_use]
    pub const fn without_footer(mut self) -> Self {
        self.show_footer = false;
        self
    }

    /// Hides the `↕` glyph on sortable columns that are not sorted.
    #[must_use]
    pub const fn without_sort_hints(mut self) -> Self {
        self.show_sort_hints = false;
        self
    }

    fn header(&self, grid: &GridTable<R>) -> Row<'static> {
        let selected = grid.selected_column();
        let cells: SmallVec<[Cell; 8]> = grid
            .visible_columns()
            .enumerate()
            .map(|(idx, column)| {
                let glyph = match grid.sort_direction(column.id()) {
                    Some(direction) => direction.glyph(),
                    None if self.show_sort_hints && column.is_sortable() => "↕",
                    None => "",
                };
                let text = if glyph.is_empty() {
                    column.header().to_owned()
                } else {
                    format!("{} {glyph}", column.header())
                };
                let cell = Cell::from(text);
                if selected == Some(idx) {
                    cell.style(self.style.highlight_style)
                } else {
                    cell
                }
            })
            .collect();
        Row::new(cells).style(self.style.header_style)
    }

    fn footer(grid: &GridTable<R>) -> String {
        let summary = grid.summary();
        if grid.config().paginated {
            format!(
                "{summary} · Page {} of {}",
                summary.page_index + 1,
                summary.page_count.max(1)
            )
        } else {
            summary.to_string()
        }
    }

    fn build_row<'r>(
        &self,
        grid: &'r GridTable<R>,
        columns: &[&GridColumn<R>],
        position: usize,
        row: &'r R,
    ) -> Row<'r> {
        let cells: SmallVec<[Cell; 8]> = columns
            .iter()
            .map(|column| Cell::from(column.display(row)))
            .collect();
        let mut style = if position % 2 == 1 {
            self.style.stripe_style
        } else {
            Style::default()
        };
        style = match grid.row_emphasis(row) {
            RowEmphasis::Normal => style,
            RowEmphasis::Active => style.patch(self.style.active_style),
            RowEmphasis::Dimmed => style.patch(self.style.dimmed_style),
        };
        Row::new(cells).style(style)
    }
}

impl<R> StatefulWidget for GridTableView<'_, R> {
    type State = GridTable<R>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut block = Block::default()
            .borders(self.style.borders)
            .style(self.style.block_style)
            .border_style(self.style.border_style);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        if self.show_footer {
            block = block.title_bottom(Line::styled(Self::footer(state), self.style.footer_style));
        }

        // Header row.
        let inner_height = block.inner(area).height.saturating_sub(1) as usize;
        state.ensure_selection_visible(inner_height, self.style.scroll_policy);
        let offset = state.table_state().offset();
        let scroll_rows = state.page_len().saturating_sub(inner_height);

        let (table_area, borders, scrollbar_area) =
            split_scrollbar(area, self.style.borders, scroll_rows);
        let block = block.borders(borders);

        let mut table_state: TableState = *state.table_state();
        {
            let shared: &GridTable<R> = state;
            let columns: SmallVec<[&GridColumn<R>; 8]> = shared.visible_columns().collect();
            let widths: SmallVec<[ColumnWidth; 8]> =
                columns.iter().map(|column| column.column_width()).collect();
            // Column gaps and the highlight symbol come out of the distributable width.
            let gaps = u16::try_from(columns.len().saturating_sub(1)).unwrap_or(u16::MAX);
            let symbol = if table_state.selected().is_some() {
                u16::try_from(Span::raw(self.style.highlight_symbol).width()).unwrap_or(0)
            } else {
                0
            };
            let available = block
                .inner(table_area)
                .width
                .saturating_sub(gaps)
                .saturating_sub(symbol);
            let constraints: SmallVec<[Constraint; 8]> = width_constraints(available, &widths);

            let rows: Vec<Row> = if shared.page_len() == 0 {
                vec![Row::new([Cell::from(NO_RESULTS)]).style(self.style.empty_style)]
            } else {
                shared
                    .visible_rows()
                    .enumerate()
                    .map(|(position, row)| self.build_row(shared, &columns, position, row))
                    .collect()
            };

            Table::new(rows, constraints.iter().copied())
                .style(self.style.block_style)
                .block(block)
                .header(self.header(shared))
                .row_highlight_style(self.style.highlight_style)
                .highlight_symbol(self.style.highlight_symbol)
                .render(table_area, buf, &mut table_state);
        }
        *state.table_state_mut() = table_state;

        if let Some(scrollbar_area) = scrollbar_area {
            render_scrollbar(scrollbar_area, buf, offset, inner_height, scroll_rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::column::CellValue;

    struct Dealer {
        name: String,
        units: u32,
    }

    fn name(row: &Dealer) -> CellValue<'_> {
        row.name.as_str().into()
    }

    fn units(row: &Dealer) -> CellValue<'_> {
        row.units.into()
    }

    fn grid(count: u32) -> GridTable<Dealer> {
        let rows = (0..count)
            .map(|idx| Dealer {
                name: format!("Dealer {idx}"),
                units: idx * 10,
            })
            .collect();
        GridTable::new(
            rows,
            vec![
                GridColumn::new("name", "Dealer", name).width(ColumnWidth::new(8, 12, 16)),
                GridColumn::numeric("units", "Units", units).width(ColumnWidth::fixed(8)),
            ],
        )
        .unwrap()
    }

    fn lines(buffer: &Buffer) -> Vec<String> {
        let width = usize::from(buffer.area.width);
        buffer
            .content()
            .chunks(width)
            .map(|line| line.iter().map(ratatui::buffer::Cell::symbol).collect())
            .collect()
    }

    fn render(grid: &mut GridTable<Dealer>, view: GridTableView<'_, Dealer>) -> Vec<String> {
        let area = Rect::new(0, 0, 60, 8);
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer, grid);
        lines(&buffer)
    }

    #[test]
    fn header_shows_sort_state() {
        let mut grid = grid(3);
        grid.toggle_sort("units");
        let lines = render(&mut grid, GridTableView::new(TableStyle::default()));
        assert!(lines[1].contains("Dealer ↕"));
        assert!(lines[1].contains("Units ▲"));
    }

    #[test]
    fn footer_summarizes_the_page() {
        let mut grid = grid(25);
        grid.set_page_size(5);
        grid.next_page();
        let lines = render(&mut grid, GridTableView::new(TableStyle::default()));
        assert!(lines[7].contains("Showing 6 to 10 of 25 results · Page 2 of 5"));
    }

    #[test]
    fn empty_result_renders_placeholder_row() {
        let mut grid = grid(3);
        grid.set_global_filter("nothing matches");
        let lines = render(
            &mut grid,
            GridTableView::new(TableStyle::default()).without_footer(),
        );
        assert!(lines[2].contains(NO_RESULTS));
        assert!(!lines[7].contains("Showing"));
    }

    #[test]
    fn render_smoke_with_scrollbar() {
        let mut grid = grid(30);
        grid.set_page_size(20);
        grid.select_last();

        render(&mut grid, GridTableView::new(TableStyle::default()));

        assert!(grid.table_state().offset() > 0);
    }
}

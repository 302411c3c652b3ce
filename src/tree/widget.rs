use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::{Block, Cell, Row, StatefulWidget, Table, TableState};
use smallvec::SmallVec;

use crate::layout::{render_scrollbar, split_scrollbar};
use crate::style::TableStyle;

use super::columns::TreeColumns;
use super::context::TreeRowContext;
use super::glyphs::{TreeGlyphs, TreeLabelRenderer};
use super::state::{TreeRow, TreeTable};

/// Renders the visible rows of a [`TreeTable`].
pub struct TreeTableView<'a, P, L, C>
where
    L: TreeLabelRenderer<P>,
    C: TreeColumns<P>,
{
    label: &'a L,
    columns: &'a C,
    style: TableStyle<'a>,
    glyphs: TreeGlyphs<'a>,
    _payload: std::marker::PhantomData<fn(&P)>,
}

impl<'a, P, L, C> TreeTableView<'a, P, L, C>
where
    L: TreeLabelRenderer<P>,
    C: TreeColumns<P>,
{
    pub const fn new(label: &'a L, columns: &'a C, style: TableStyle<'a>) -> Self {
        Self {
            label,
            columns,
            style,
            glyphs: TreeGlyphs::unicode(),
            _payload: std::marker::PhantomData,
        }
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    fn build_row<'r>(&'r self, row: TreeRow<'r, P>, draw_lines: bool) -> Row<'r> {
        let ctx = TreeRowContext::for_row(&row, draw_lines, self.style.line_style);
        let mut cells = SmallVec::<[Cell; 8]>::new();
        cells.push(self.label.cell(row.row, &ctx, &self.glyphs));
        cells.extend(self.columns.cells(row.row));
        Row::new(cells)
    }
}

impl<P, L, C> StatefulWidget for TreeTableView<'_, P, L, C>
where
    L: TreeLabelRenderer<P>,
    C: TreeColumns<P>,
{
    type State = TreeTable<P>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let header = self.columns.header();
        let header_height = u16::from(header.is_some());

        let mut block = Block::default()
            .borders(self.style.borders)
            .style(self.style.block_style)
            .border_style(self.style.border_style);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }

        let inner_height = block.inner(area).height.saturating_sub(header_height) as usize;
        state.ensure_selection_visible(inner_height, self.style.scroll_policy);

        let total_rows = state.visible_len();
        let offset = state.table_state().offset();
        let (range_start, range_end) = if self.style.virtualize_rows {
            let start = offset.min(total_rows);
            (start, (start + inner_height).min(total_rows))
        } else {
            (0, total_rows)
        };
        let scroll_rows = total_rows.saturating_sub(inner_height);

        let (table_area, borders, scrollbar_area) =
            split_scrollbar(area, self.style.borders, scroll_rows);
        let block = block.borders(borders);
        let constraints: SmallVec<[Constraint; 8]> =
            self.columns.constraints(block.inner(table_area).width);

        // Rows borrow the forest, so render against a copy of the table state and write
        // the scroll position back afterwards.
        let mut table_state: TableState = *state.table_state();
        if self.style.virtualize_rows {
            *table_state.offset_mut() = 0;
            let selected = table_state
                .selected()
                .filter(|selected| (range_start..range_end).contains(selected))
                .map(|selected| selected - range_start);
            table_state.select(selected);
        }

        {
            let shared: &TreeTable<P> = state;
            let draw_lines = shared.draw_lines();
            let rows: Vec<Row> = (range_start..range_end)
                .filter_map(|position| shared.visible_row(position))
                .map(|row| self.build_row(row, draw_lines))
                .collect();

            let mut table = Table::new(rows, constraints.iter().copied())
                .style(self.style.block_style)
                .block(block)
                .row_highlight_style(self.style.highlight_style)
                .highlight_symbol(self.style.highlight_symbol);
            if let Some(header) = header {
                table = table.header(header);
            }
            table.render(table_area, buf, &mut table_state);
        }

        if !self.style.virtualize_rows {
            *state.table_state_mut() = table_state;
        }

        if let Some(scrollbar_area) = scrollbar_area {
            render_scrollbar(scrollbar_area, buf, offset, inner_height, scroll_rows);
        }
    }
}

use ratatui::widgets::TableState;

use crate::style::ScrollPolicy;

/// Row selection and scroll offset over a list of `len` rendered rows.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RowSelection {
    table: TableState,
}

impl RowSelection {
    pub(crate) const fn table(&self) -> &TableState {
        &self.table
    }

    pub(crate) const fn table_mut(&mut self) -> &mut TableState {
        &mut self.table
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        self.table.selected()
    }

    pub(crate) fn select(&mut self, index: Option<usize>) {
        self.table.select(index);
    }

    pub(crate) fn offset(&self) -> usize {
        self.table.offset()
    }

    pub(crate) fn set_offset(&mut self, offset: usize) {
        *self.table.offset_mut() = offset;
    }

    pub(crate) fn selected_column(&self) -> Option<usize> {
        self.table.selected_column()
    }

    pub(crate) fn select_column(&mut self, column: Option<usize>) {
        *self.table.selected_column_mut() = column;
    }

    pub(crate) fn select_first(&mut self, len: usize) {
        self.table.select((len > 0).then_some(0));
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.table.select(len.checked_sub(1));
    }

    pub(crate) fn select_prev(&mut self, len: usize) {
        if len == 0 {
            self.table.select(None);
            return;
        }
        let selected = self.table.selected().unwrap_or(0);
        self.table.select(Some(selected.saturating_sub(1).min(len - 1)));
    }

    pub(crate) fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.table.select(None);
            return;
        }
        let new_selected = self
            .table
            .selected()
            .map_or(0, |selected| (selected + 1).min(len - 1));
        self.table.select(Some(new_selected));
    }

    /// Keeps the selection inside `0..len`.
    pub(crate) fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.table.select(None);
            *self.table.offset_mut() = 0;
            return;
        }
        if let Some(selected) = self.table.selected()
            && selected >= len
        {
            self.table.select(Some(len - 1));
        }
        if self.table.offset() >= len {
            *self.table.offset_mut() = len - 1;
        }
    }

    /// Adjusts the scroll offset according to the policy so the selection is on screen.
    pub(crate) fn ensure_visible(&mut self, len: usize, viewport_height: usize, policy: ScrollPolicy) {
        self.clamp(len);
        let Some(selected) = self.table.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        match policy {
            ScrollPolicy::KeepInView => {
                let offset = self.table.offset();
                if selected < offset {
                    *self.table.offset_mut() = selected;
                } else if selected >= offset + viewport_height {
                    *self.table.offset_mut() = selected + 1 - viewport_height;
                }
            }
            ScrollPolicy::CenterOnSelect => {
                if len <= viewport_height {
                    *self.table.offset_mut() = 0;
                    return;
                }
                // Center, then clamp to the valid scroll range.
                let max_offset = len - viewport_height;
                let offset = selected.saturating_sub(viewport_height / 2).min(max_offset);
                *self.table.offset_mut() = offset;
            }
        }
    }
}

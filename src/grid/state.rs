use std::fmt;

use ratatui::widgets::TableState;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "keymap")]
use crate::keymap::TableKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

use crate::action::{TableAction, TableEvent};
use crate::error::GridError;
use crate::selection::RowSelection;
use crate::style::ScrollPolicy;

use super::column::GridColumn;
use super::config::GridConfig;
use super::pipeline::{self, Filtered, PaginationState, SortDirection, SortState, Sorted};

/// Result counts for the current page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSummary {
    /// One-based position of the first row on the page; 0 when there are no rows.
    pub from: usize,
    /// One-based position of the last row on the page.
    pub to: usize,
    /// Rows that passed the filter.
    pub total: usize,
    pub page_index: usize,
    pub page_count: usize,
}

impl fmt::Display for GridSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} results",
            self.from, self.to, self.total
        )
    }
}

/// How a row is drawn relative to the active highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RowEmphasis {
    /// No highlight is active.
    #[default]
    Normal,
    /// The row's value is in the highlight set.
    Active,
    /// A highlight is active and the row is not part of it.
    Dimmed,
}

struct Highlight {
    column: usize,
    values: FxHashSet<String>,
}

/// Snapshot of the grid view state.
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridTableSnapshot {
    /// Sorted column id and direction.
    pub sort: Option<(String, SortDirection)>,
    pub global_filter: String,
    pub page_index: usize,
    pub page_size: usize,
    /// Ids of hidden columns.
    pub hidden_columns: Vec<String>,
}

/// Flat data table with global search, single-column sort and pagination.
///
/// The filtered and sorted row orders are cached: a query or column visibility change
/// re-runs filter and sort, a sort change re-runs the sort, and pagination only moves
/// the page window.
pub struct GridTable<R> {
    rows: Vec<R>,
    columns: Vec<GridColumn<R>>,
    hidden: FxHashSet<&'static str>,
    config: GridConfig,
    query: String,
    // Lower-cased `query`, empty when searching is disabled.
    needle: String,
    sort: Option<SortState>,
    pagination: PaginationState,
    highlight: Option<Highlight>,
    filtered: Filtered,
    sorted: Sorted,
    selection: RowSelection,
    #[cfg(feature = "keymap")]
    keymap: TableKeyBindings,
}

impl<R> GridTable<R> {
    /// Creates a grid with the default configuration.
    pub fn new(rows: Vec<R>, columns: Vec<GridColumn<R>>) -> Result<Self, GridError> {
        Self::with_config(rows, columns, GridConfig::default())
    }

    /// Creates a grid after checking column ids and the configuration.
    pub fn with_config(
        rows: Vec<R>,
        columns: Vec<GridColumn<R>>,
        config: GridConfig,
    ) -> Result<Self, GridError> {
        config.validate()?;
        let mut seen = FxHashSet::default();
        for (idx, column) in columns.iter().enumerate() {
            if column.id().is_empty() {
                return Err(GridError::EmptyColumnId(idx));
            }
            if !seen.insert(column.id()) {
                return Err(GridError::DuplicateColumn(column.id()));
            }
        }

        let pagination = PaginationState {
            page_index: 0,
            page_size: config.page_size,
        };
        let mut grid = Self {
            rows,
            columns,
            hidden: FxHashSet::default(),
            config,
            query: String::new(),
            needle: String::new(),
            sort: None,
            pagination,
            highlight: None,
            filtered: Filtered::default(),
            sorted: Sorted::default(),
            selection: RowSelection::default(),
            #[cfg(feature = "keymap")]
            keymap: TableKeyBindings::new(),
        };
        grid.refilter();
        Ok(grid)
    }

    /// Replaces the rows, keeping query, sort and column settings.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.refilter();
        self.clamp_page();
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &[GridColumn<R>] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&GridColumn<R>> {
        self.column_index(id).map(|idx| &self.columns[idx])
    }

    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of source rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows that passed the filter.
    pub const fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    // Search

    /// Sets the global filter and returns to the first page.
    ///
    /// A row matches when any visible column's displayed text contains the query,
    /// ignoring case. Ignored when the grid is not searchable.
    pub fn set_global_filter(&mut self, query: &str) {
        if !self.config.searchable || self.query == query {
            return;
        }
        query.clone_into(&mut self.query);
        self.needle = query.to_lowercase();
        self.refilter();
        self.reset_page();
        debug!(
            query,
            matches = self.filtered.len(),
            "grid global filter changed"
        );
    }

    pub fn global_filter(&self) -> &str {
        &self.query
    }

    // Sort

    /// Cycles the sort of a column: unsorted → ascending → descending → unsorted.
    ///
    /// Sorting a different column starts at ascending. Returns false for unknown or
    /// unsortable columns.
    pub fn toggle_sort(&mut self, column_id: &str) -> bool {
        let Some(idx) = self.column_index(column_id) else {
            return false;
        };
        let column = &self.columns[idx];
        if !column.is_sortable() {
            return false;
        }
        let direction = match self.sort {
            Some(sort) if sort.column == column.id() => match sort.direction {
                SortDirection::Ascending => Some(SortDirection::Descending),
                SortDirection::Descending => None,
            },
            _ => Some(SortDirection::Ascending),
        };
        let column = column.id();
        self.sort = direction.map(|direction| SortState { column, direction });
        debug!(column, ?direction, "grid sort toggled");
        self.resort();
        self.reset_page();
        true
    }

    /// Sets the sort explicitly.
    pub fn set_sort(&mut self, column_id: &str, direction: SortDirection) -> bool {
        let Some(column) = self.column(column_id).filter(|column| column.is_sortable()) else {
            return false;
        };
        self.sort = Some(SortState {
            column: column.id(),
            direction,
        });
        self.resort();
        self.reset_page();
        true
    }

    /// Removes the sort; rows return to source order.
    pub fn clear_sort(&mut self) {
        if self.sort.take().is_some() {
            self.resort();
            self.reset_page();
        }
    }

    pub const fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Direction of the column if it is the sorted one.
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sort
            .filter(|sort| sort.column == column_id)
            .map(|sort| sort.direction)
    }

    // Pagination

    pub const fn pagination(&self) -> PaginationState {
        self.pagination
    }

    /// Number of pages; 0 when no rows pass the filter.
    pub fn page_count(&self) -> usize {
        let total = self.filtered.len();
        if self.config.paginated {
            self.pagination.page_count(total)
        } else {
            usize::from(total > 0)
        }
    }

    /// Moves to a page, clamped to the last page.
    pub fn set_page_index(&mut self, page_index: usize) {
        let max = self.page_count().saturating_sub(1);
        let clamped = page_index.min(max);
        if clamped != page_index {
            debug!(requested = page_index, clamped, "grid page index clamped");
        }
        self.pagination.page_index = clamped;
        self.selection.clamp(self.page_len());
    }

    /// Changes the page size (at least 1) and re-clamps the page index.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.page_size = page_size.max(1);
        self.clamp_page();
    }

    /// Switches to the next configured page size.
    pub fn cycle_page_size(&mut self) -> bool {
        match self.config.next_page_size(self.pagination.page_size) {
            Some(size) => {
                self.set_page_size(size);
                true
            }
            None => false,
        }
    }

    pub fn can_previous_page(&self) -> bool {
        self.pagination.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.pagination.page_index + 1 < self.page_count()
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_next_page() {
            return false;
        }
        self.set_page_index(self.pagination.page_index + 1);
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.can_previous_page() {
            return false;
        }
        self.set_page_index(self.pagination.page_index - 1);
        true
    }

    pub fn first_page(&mut self) {
        self.set_page_index(0);
    }

    pub fn last_page(&mut self) {
        self.set_page_index(self.page_count().saturating_sub(1));
    }

    // Rows

    /// Rows of the current page in display order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &R> + '_ {
        self.page_indices().iter().map(move |&idx| &self.rows[idx])
    }

    /// Source indices of the rows on the current page.
    pub fn page_indices(&self) -> &[usize] {
        if self.config.paginated {
            self.sorted.page(self.pagination.range(self.sorted.len()))
        } else {
            self.sorted.as_slice()
        }
    }

    /// Number of rows on the current page.
    pub fn page_len(&self) -> usize {
        self.page_indices().len()
    }

    /// Every filtered row in display order, across pages.
    pub fn sorted_rows(&self) -> impl Iterator<Item = &R> + '_ {
        self.sorted.as_slice().iter().map(move |&idx| &self.rows[idx])
    }

    /// Counts for the result footer.
    pub fn summary(&self) -> GridSummary {
        let total = self.filtered.len();
        let page_len = self.page_len();
        let start = if self.config.paginated {
            self.pagination.range(total).start
        } else {
            0
        };
        GridSummary {
            from: if page_len == 0 { 0 } else { start + 1 },
            to: start + page_len,
            total,
            page_index: self.pagination.page_index,
            page_count: self.page_count(),
        }
    }

    // Columns

    /// Shows or hides a column; hidden columns are not searched.
    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) -> bool {
        let Some(id) = self.column(column_id).map(GridColumn::id) else {
            return false;
        };
        let changed = if visible {
            self.hidden.remove(id)
        } else {
            self.hidden.insert(id)
        };
        if changed {
            debug!(column = id, visible, "grid column visibility changed");
            if !self.needle.is_empty() {
                self.refilter();
                self.clamp_page();
            }
            self.clamp_selected_column();
        }
        changed
    }

    pub fn toggle_column_visibility(&mut self, column_id: &str) -> bool {
        let visible = self.is_column_visible(column_id);
        self.set_column_visibility(column_id, !visible)
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.column(column_id).is_some() && !self.hidden.contains(column_id)
    }

    /// Visible columns in declaration order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &GridColumn<R>> + '_ {
        self.columns
            .iter()
            .filter(|column| !self.hidden.contains(column.id()))
    }

    pub fn visible_column_count(&self) -> usize {
        self.columns.len() - self.hidden.len()
    }

    // Highlight

    /// Emphasizes rows whose value in `column_id` is one of `values`; other rows dim.
    ///
    /// An empty set behaves like no highlight.
    pub fn set_highlight<I, S>(&mut self, column_id: &str, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(column) = self.column_index(column_id) else {
            return false;
        };
        self.highlight = Some(Highlight {
            column,
            values: values.into_iter().map(Into::into).collect(),
        });
        true
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    /// Classifies a row against the active highlight.
    pub fn row_emphasis(&self, row: &R) -> RowEmphasis {
        let Some(highlight) = self.highlight.as_ref().filter(|h| !h.values.is_empty()) else {
            return RowEmphasis::Normal;
        };
        let value = self.columns[highlight.column].value(row).into_text();
        if highlight.values.contains(value.as_ref()) {
            RowEmphasis::Active
        } else {
            RowEmphasis::Dimmed
        }
    }

    // Selection

    /// Position of the selected row within the current page.
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn selected_row(&self) -> Option<&R> {
        let position = self.selection.selected()?;
        self.page_indices()
            .get(position)
            .map(|&idx| &self.rows[idx])
    }

    pub fn select(&mut self, position: Option<usize>) {
        self.selection.select(position);
        self.selection.clamp(self.page_len());
    }

    pub fn select_first(&mut self) {
        self.selection.select_first(self.page_len());
    }

    pub fn select_last(&mut self) {
        self.selection.select_last(self.page_len());
    }

    pub fn select_prev(&mut self) {
        self.selection.select_prev(self.page_len());
    }

    pub fn select_next(&mut self) {
        self.selection.select_next(self.page_len());
    }

    /// Selected column as an index into [`visible_columns`](Self::visible_columns).
    pub fn selected_column(&self) -> Option<usize> {
        self.selection.selected_column()
    }

    pub fn select_prev_column(&mut self) {
        let count = self.visible_column_count();
        if count == 0 {
            self.selection.select_column(None);
            return;
        }
        let column = self
            .selection
            .selected_column()
            .map_or(0, |column| column.saturating_sub(1));
        self.selection.select_column(Some(column.min(count - 1)));
    }

    pub fn select_next_column(&mut self) {
        let count = self.visible_column_count();
        if count == 0 {
            self.selection.select_column(None);
            return;
        }
        let column = self
            .selection
            .selected_column()
            .map_or(0, |column| column + 1);
        self.selection.select_column(Some(column.min(count - 1)));
    }

    /// Toggles the sort of the selected column.
    pub fn sort_selected_column(&mut self) -> bool {
        let Some(id) = self
            .selection
            .selected_column()
            .and_then(|column| self.visible_columns().nth(column))
            .map(GridColumn::id)
        else {
            return false;
        };
        self.toggle_sort(id)
    }

    /// Adjusts the scroll offset so the selection is within the viewport.
    pub fn ensure_selection_visible(&mut self, viewport_height: usize, policy: ScrollPolicy) {
        self.selection
            .ensure_visible(self.page_len(), viewport_height, policy);
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut TableKeyBindings {
        &mut self.keymap
    }

    pub(crate) const fn table_state(&self) -> &TableState {
        self.selection.table()
    }

    pub(crate) const fn table_state_mut(&mut self) -> &mut TableState {
        self.selection.table_mut()
    }

    // Snapshot

    /// Captures sort, query, pagination and hidden columns.
    pub fn snapshot(&self) -> GridTableSnapshot {
        let mut hidden_columns: Vec<String> =
            self.hidden.iter().map(|&id| id.to_owned()).collect();
        hidden_columns.sort_unstable();
        GridTableSnapshot {
            sort: self
                .sort
                .map(|sort| (sort.column.to_owned(), sort.direction)),
            global_filter: self.query.clone(),
            page_index: self.pagination.page_index,
            page_size: self.pagination.page_size,
            hidden_columns,
        }
    }

    /// Restores a snapshot; unknown or unsortable columns are ignored.
    pub fn restore(&mut self, snapshot: GridTableSnapshot) {
        self.hidden = snapshot
            .hidden_columns
            .iter()
            .filter_map(|id| self.column(id).map(GridColumn::id))
            .collect();
        self.sort = snapshot.sort.and_then(|(id, direction)| {
            self.column(&id)
                .filter(|column| column.is_sortable())
                .map(|column| SortState {
                    column: column.id(),
                    direction,
                })
        });
        if self.config.searchable {
            self.needle = snapshot.global_filter.to_lowercase();
            self.query = snapshot.global_filter;
        }
        self.refilter();
        self.pagination.page_size = snapshot.page_size.max(1);
        self.set_page_index(snapshot.page_index);
        self.clamp_selected_column();
    }

    // Actions

    /// Handles a table action and returns the resulting event.
    pub fn handle_action<C>(&mut self, action: TableAction<C>) -> TableEvent<C> {
        if matches!(&action, TableAction::Custom(_)) {
            return TableEvent::Action(action);
        }

        match action {
            TableAction::SelectPrev => self.with_rows(Self::select_prev),
            TableAction::SelectNext => self.with_rows(Self::select_next),
            TableAction::SelectFirst => self.with_rows(Self::select_first),
            TableAction::SelectLast => self.with_rows(Self::select_last),
            TableAction::SelectPrevColumn => {
                self.select_prev_column();
                TableEvent::from_handled(self.visible_column_count() > 0)
            }
            TableAction::SelectNextColumn => {
                self.select_next_column();
                TableEvent::from_handled(self.visible_column_count() > 0)
            }
            TableAction::SetSearch(query) => {
                if !self.config.searchable {
                    return TableEvent::Unhandled;
                }
                self.set_global_filter(&query);
                TableEvent::Handled
            }
            TableAction::ClearSearch => {
                if !self.config.searchable {
                    return TableEvent::Unhandled;
                }
                self.set_global_filter("");
                TableEvent::Handled
            }
            TableAction::ToggleSort(column) => TableEvent::from_handled(self.toggle_sort(&column)),
            TableAction::SortSelectedColumn => {
                TableEvent::from_handled(self.sort_selected_column())
            }
            TableAction::SetPage(page) => {
                self.set_page_index(page);
                TableEvent::Handled
            }
            TableAction::NextPage => TableEvent::from_handled(self.next_page()),
            TableAction::PrevPage => TableEvent::from_handled(self.previous_page()),
            TableAction::FirstPage => {
                self.first_page();
                TableEvent::Handled
            }
            TableAction::LastPage => {
                self.last_page();
                TableEvent::Handled
            }
            TableAction::SetPageSize(size) => {
                self.set_page_size(size);
                TableEvent::Handled
            }
            TableAction::CyclePageSize => TableEvent::from_handled(self.cycle_page_size()),
            TableAction::SetColumnVisibility(column, visible) => {
                if self.column(&column).is_none() {
                    return TableEvent::Unhandled;
                }
                self.set_column_visibility(&column, visible);
                TableEvent::Handled
            }
            TableAction::ToggleColumnVisibility(column) => {
                TableEvent::from_handled(self.toggle_column_visibility(&column))
            }
            TableAction::SelectParent
            | TableAction::SelectChild
            | TableAction::ToggleNode(_)
            | TableAction::ToggleSelected
            | TableAction::ToggleRecursive
            | TableAction::ExpandAll
            | TableAction::CollapseAll
            | TableAction::ToggleAll
            | TableAction::ToggleGuides
            | TableAction::Custom(_) => TableEvent::Unhandled,
        }
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key(&mut self, key: KeyEvent) -> TableEvent<()> {
        let Some(action) = self.keymap.resolve_grid(key) else {
            return TableEvent::Unhandled;
        };
        self.handle_action(action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<C, F>(&mut self, key: KeyEvent, custom: F) -> TableEvent<C>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        let Some(action) = self.keymap.resolve_grid_with(key, custom) else {
            return TableEvent::Unhandled;
        };
        self.handle_action(action)
    }

    fn with_rows<C>(&mut self, select: fn(&mut Self)) -> TableEvent<C> {
        if self.page_len() == 0 {
            return TableEvent::Unhandled;
        }
        select(self);
        TableEvent::Handled
    }

    fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.id() == id)
    }

    // Sort and filter changes return to the first page.
    fn reset_page(&mut self) {
        self.pagination.page_index = 0;
        self.selection.clamp(self.page_len());
    }

    fn clamp_page(&mut self) {
        self.set_page_index(self.pagination.page_index);
    }

    fn clamp_selected_column(&mut self) {
        let count = self.visible_column_count();
        if let Some(column) = self.selection.selected_column() {
            self.selection
                .select_column((count > 0).then(|| column.min(count - 1)));
        }
    }

    // Filter stage, followed by the sort stage that depends on it.
    fn refilter(&mut self) {
        let searched: Vec<&GridColumn<R>> = self.visible_columns().collect();
        self.filtered = pipeline::filter(&self.rows, &searched, &self.needle);
        trace!(
            rows = self.rows.len(),
            matches = self.filtered.len(),
            "grid filter recomputed"
        );
        self.resort();
    }

    fn resort(&mut self) {
        let sort = self.sort.and_then(|sort| {
            self.column_index(sort.column)
                .map(|idx| (&self.columns[idx], sort.direction))
        });
        self.sorted = pipeline::sort(&self.rows, &self.filtered, sort);
        trace!(rows = self.sorted.len(), "grid sort recomputed");
        self.selection.clamp(self.page_len());
    }
}

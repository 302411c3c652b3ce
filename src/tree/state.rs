use ratatui::widgets::TableState;
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "keymap")]
use crate::keymap::TableKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

use crate::action::{TableAction, TableEvent};
use crate::error::ForestError;
use crate::selection::RowSelection;
use crate::style::ScrollPolicy;

use super::flatten::{ExpansionState, FlatMeta, VisibilityMap, visibility_pass, walk_forest};
use super::model::{HierarchicalRow, forest_len, validate_forest};

/// Cached flattened row: where it lives in the forest and how it is drawn.
#[derive(Clone, Debug)]
struct FlatNode {
    id: String,
    path: SmallVec<[u32; 8]>,
    meta: FlatMeta,
    last_sibling_path: SmallVec<[bool; 8]>,
}

/// A flattened row together with its current view state.
#[derive(Clone, Copy, Debug)]
pub struct TreeRow<'a, P> {
    /// The source row.
    pub row: &'a HierarchicalRow<P>,
    /// Position in the flattened (pre-order) sequence.
    pub flat_index: usize,
    /// Indentation level.
    pub level: u16,
    /// Whether the row has children.
    pub has_children: bool,
    /// Whether the row is in the expansion state.
    pub is_expanded: bool,
    /// Whether the row currently renders.
    pub is_visible: bool,
    /// Last-sibling flags of the row's ancestors, used for guide lines.
    pub last_sibling_path: &'a [bool],
}

/// Snapshot of the tree view state (expansion and selection).
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeTableSnapshot {
    /// Expanded row ids.
    pub expanded: Vec<String>,
    /// Id of the selected row.
    pub selected: Option<String>,
    /// Scroll offset within the visible rows.
    pub offset: usize,
    /// Whether guide lines were enabled.
    pub draw_lines: bool,
}

/// Expandable tree table: owns the forest, its flattening, and the expansion state.
///
/// The forest is flattened once per [`set_forest`](Self::set_forest); expansion changes
/// only recompute visibility.
pub struct TreeTable<P> {
    forest: Vec<HierarchicalRow<P>>,
    // Pre-order flattening of `forest`.
    nodes: Vec<FlatNode>,
    // Fast lookup from id to flattened position.
    index: FxHashMap<String, usize>,
    expandable_count: usize,
    expanded: ExpansionState,
    // Visibility per flattened row.
    visible_flags: Vec<bool>,
    // Flattened positions of visible rows, ascending.
    visible_rows: Vec<usize>,
    selection: RowSelection,
    draw_lines: bool,
    #[cfg(feature = "keymap")]
    keymap: TableKeyBindings,
}

impl<P> Default for TreeTable<P> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<P> TreeTable<P> {
    /// Creates a fully collapsed table over the forest, trusting the forest contract.
    pub fn new(forest: Vec<HierarchicalRow<P>>) -> Self {
        let mut table = Self {
            forest: Vec::new(),
            nodes: Vec::new(),
            index: FxHashMap::default(),
            expandable_count: 0,
            expanded: ExpansionState::new(),
            visible_flags: Vec::new(),
            visible_rows: Vec::new(),
            selection: RowSelection::default(),
            draw_lines: true,
            #[cfg(feature = "keymap")]
            keymap: TableKeyBindings::new(),
        };
        table.set_forest(forest);
        table
    }

    /// Creates a table after checking the forest contract.
    pub fn validated(forest: Vec<HierarchicalRow<P>>) -> Result<Self, ForestError> {
        validate_forest(&forest)?;
        Ok(Self::new(forest))
    }

    /// Replaces the forest, re-flattening it once.
    ///
    /// Expanded ids that no longer name a row with children are dropped.
    ///
    /// The selection follows the selected row's id, or its nearest ancestor that still
    /// exists, into the new forest.
    pub fn set_forest(&mut self, forest: Vec<HierarchicalRow<P>>) {
        // Selected id first, then its ancestors.
        let mut lineage: SmallVec<[String; 8]> = SmallVec::new();
        let mut cursor = self.selected_flat();
        while let Some(idx) = cursor {
            lineage.push(self.nodes[idx].id.clone());
            cursor = self.nodes[idx].meta.parent;
        }

        let capacity = forest_len(&forest);
        let mut nodes = Vec::with_capacity(capacity);
        let mut index = FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher);
        let mut expandable_count = 0;
        walk_forest(&forest, |row, visit| {
            debug_assert_eq!(visit.index, nodes.len());
            if visit.meta.has_children {
                expandable_count += 1;
            }
            index.insert(row.id.clone(), visit.index);
            nodes.push(FlatNode {
                id: row.id.clone(),
                path: SmallVec::from_slice(visit.path),
                meta: visit.meta,
                last_sibling_path: SmallVec::from_slice(visit.last_sibling_path),
            });
        });

        self.forest = forest;
        self.nodes = nodes;
        self.index = index;
        self.expandable_count = expandable_count;
        let (nodes, index) = (&self.nodes, &self.index);
        self.expanded
            .retain(|id| index.get(id).is_some_and(|&idx| nodes[idx].meta.has_children));
        debug!(
            rows = self.nodes.len(),
            expandable = self.expandable_count,
            "flattened tree forest"
        );
        let previous = lineage.iter().find_map(|id| self.index.get(id).copied());
        self.refresh_from(previous);
    }

    /// The forest as given.
    pub fn forest(&self) -> &[HierarchicalRow<P>] {
        &self.forest
    }

    /// Total number of rows in the forest.
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the forest has no rows.
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of rows that have children.
    pub const fn expandable_count(&self) -> usize {
        self.expandable_count
    }

    /// Current expansion state.
    pub const fn expansion(&self) -> &ExpansionState {
        &self.expanded
    }

    /// Looks up a row by id.
    pub fn row(&self, id: &str) -> Option<&HierarchicalRow<P>> {
        self.index.get(id).and_then(|&idx| self.row_at(idx))
    }

    /// Returns whether the row is expanded.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Returns whether the row currently renders; unknown ids are not visible.
    pub fn is_visible(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&idx| self.visible_flags[idx])
    }

    /// Returns `true` if every expandable row is expanded.
    pub fn is_all_expanded(&self) -> bool {
        self.expanded.len() >= self.expandable_count
    }

    /// Label for the toggle-all control.
    pub fn toggle_all_label(&self) -> &'static str {
        if self.is_all_expanded() {
            "Collapse All"
        } else {
            "Expand All"
        }
    }

    /// Flips the expansion of a row. Leaves and unknown ids are ignored.
    ///
    /// Returns `true` if the expansion state changed.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.is_expandable(id) {
            trace!(id, "ignored toggle of non-expandable row");
            return false;
        }
        let expanded = self.expanded.toggle(id);
        debug!(id, expanded, "toggled tree row");
        self.refresh();
        true
    }

    /// Sets the expansion of a row. Leaves and unknown ids are ignored.
    ///
    /// Returns `true` if the expansion state changed.
    pub fn set_expanded(&mut self, id: &str, expand: bool) -> bool {
        if !self.is_expandable(id) || !self.expanded.set(id, expand) {
            return false;
        }
        debug!(id, expanded = expand, "set tree row expansion");
        self.refresh();
        true
    }

    /// Expands every row that has children.
    pub fn expand_all(&mut self) {
        self.expanded.clear();
        self.expanded.extend(
            self.nodes
                .iter()
                .filter(|node| node.meta.has_children)
                .map(|node| node.id.as_str()),
        );
        debug!(expanded = self.expanded.len(), "expanded all tree rows");
        self.refresh();
    }

    /// Collapses every row.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        debug!("collapsed all tree rows");
        self.refresh();
    }

    /// Collapses all when everything is expanded, otherwise expands all.
    pub fn toggle_all(&mut self) {
        if self.is_all_expanded() {
            self.collapse_all();
        } else {
            self.expand_all();
        }
    }

    /// The current visibility map of the whole forest.
    pub fn visibility(&self) -> VisibilityMap<'_> {
        VisibilityMap::from_ordered(
            self.nodes
                .iter()
                .map(|node| node.id.as_str())
                .zip(self.visible_flags.iter().copied()),
        )
    }

    /// Every flattened row with its view state, in pre-order.
    pub fn rows(&self) -> impl Iterator<Item = TreeRow<'_, P>> + '_ {
        (0..self.nodes.len()).filter_map(move |idx| self.tree_row(idx))
    }

    /// The rows that currently render, in display order.
    pub fn visible_rows(&self) -> impl Iterator<Item = TreeRow<'_, P>> + '_ {
        self.visible_rows
            .iter()
            .filter_map(move |&idx| self.tree_row(idx))
    }

    /// Number of rows that currently render.
    pub const fn visible_len(&self) -> usize {
        self.visible_rows.len()
    }

    /// Returns the visible row at a display position.
    pub fn visible_row(&self, position: usize) -> Option<TreeRow<'_, P>> {
        self.visible_rows
            .get(position)
            .and_then(|&idx| self.tree_row(idx))
    }

    /// Whether guide lines are drawn.
    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    /// Enables or disables guide lines.
    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.draw_lines = draw;
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

    /// Display position of the selected row.
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.selected()
    }

    /// The selected row, if any.
    pub fn selected_row(&self) -> Option<TreeRow<'_, P>> {
        self.selection
            .selected()
            .and_then(|position| self.visible_row(position))
    }

    /// Id of the selected row, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_flat()
            .map(|idx| self.nodes[idx].id.as_str())
    }

    /// Selects the first visible row.
    pub fn select_first(&mut self) {
        self.selection.select_first(self.visible_rows.len());
    }

    /// Selects the last visible row.
    pub fn select_last(&mut self) {
        self.selection.select_last(self.visible_rows.len());
    }

    /// Moves selection to the previous visible row.
    pub fn select_prev(&mut self) {
        self.selection.select_prev(self.visible_rows.len());
    }

    /// Moves selection to the next visible row.
    pub fn select_next(&mut self) {
        self.selection.select_next(self.visible_rows.len());
    }

    /// Makes the row visible by expanding its ancestors, then selects it.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        let Some(&target) = self.index.get(id) else {
            return false;
        };
        let mut changed = false;
        let mut parent = self.nodes[target].meta.parent;
        while let Some(idx) = parent {
            changed |= self.expanded.set(&self.nodes[idx].id, true);
            parent = self.nodes[idx].meta.parent;
        }
        if changed {
            self.refresh();
        }
        match self.visible_position(target) {
            Some(position) => {
                self.selection.select(Some(position));
                true
            }
            None => false,
        }
    }

    /// Moves selection to the parent of the selected row.
    pub fn select_parent(&mut self) {
        let Some(parent) = self
            .selected_flat()
            .and_then(|idx| self.nodes[idx].meta.parent)
        else {
            return;
        };
        if let Some(position) = self.visible_position(parent) {
            self.selection.select(Some(position));
        }
    }

    /// Expands the selected row and moves to its first child that has children,
    /// falling back to the next expandable row of the subtree.
    pub fn select_child(&mut self) {
        let Some(selected) = self.selected_flat() else {
            return;
        };
        let node = &self.nodes[selected];
        if node.meta.has_children && !self.expanded.contains(&node.id) {
            let id = node.id.clone();
            self.expanded.set(&id, true);
            self.refresh();
        }
        let Some(position) = self.visible_position(selected) else {
            return;
        };
        let level = self.nodes[selected].meta.level;

        // Prefer direct children that themselves have descendants.
        let mut fallback = None;
        for (offset, &idx) in self.visible_rows[position + 1..].iter().enumerate() {
            let candidate = &self.nodes[idx].meta;
            if candidate.level <= level {
                break;
            }
            if candidate.has_children {
                if candidate.parent == Some(selected) {
                    self.selection.select(Some(position + 1 + offset));
                    return;
                }
                fallback.get_or_insert(position + 1 + offset);
            }
        }
        if let Some(position) = fallback {
            self.selection.select(Some(position));
        }
    }

    /// Flips the expansion of the selected row and its whole subtree.
    pub fn toggle_recursive(&mut self) -> bool {
        let Some(selected) = self.selected_flat() else {
            return false;
        };
        if !self.nodes[selected].meta.has_children {
            return false;
        }
        let expand = !self.expanded.contains(&self.nodes[selected].id);
        let level = self.nodes[selected].meta.level;
        // The subtree is the contiguous pre-order run after the row.
        let end = self.nodes[selected + 1..]
            .iter()
            .position(|node| !self.descends_from(node, selected))
            .map_or(self.nodes.len(), |offset| selected + 1 + offset);
        for node in &self.nodes[selected..end] {
            if node.meta.has_children {
                self.expanded.set(&node.id, expand);
            }
        }
        debug!(
            id = self.nodes[selected].id.as_str(),
            level,
            expand,
            "toggled tree subtree"
        );
        self.refresh();
        true
    }

    /// Adjusts the scroll offset so the selection is within the viewport.
    pub fn ensure_selection_visible(&mut self, viewport_height: usize, policy: ScrollPolicy) {
        self.selection
            .ensure_visible(self.visible_rows.len(), viewport_height, policy);
    }

    /// Captures expansion and selection.
    pub fn snapshot(&self) -> TreeTableSnapshot {
        let mut expanded: Vec<String> = self.expanded.iter().map(str::to_owned).collect();
        expanded.sort_unstable();
        TreeTableSnapshot {
            expanded,
            selected: self.selected_id().map(str::to_owned),
            offset: self.selection.offset(),
            draw_lines: self.draw_lines,
        }
    }

    /// Restores a snapshot; ids that are not expandable in this forest are ignored.
    pub fn restore(&mut self, snapshot: TreeTableSnapshot) {
        self.expanded.clear();
        for id in &snapshot.expanded {
            if self.is_expandable(id) {
                self.expanded.set(id, true);
            }
        }
        self.draw_lines = snapshot.draw_lines;
        self.refresh();
        let position = snapshot
            .selected
            .as_deref()
            .and_then(|id| self.index.get(id).copied())
            .and_then(|idx| self.visible_position(idx));
        self.selection.select(position);
        self.selection.set_offset(snapshot.offset);
        self.selection.clamp(self.visible_rows.len());
    }

    /// Handles a table action and returns the resulting event.
    pub fn handle_action<C>(&mut self, action: TableAction<C>) -> TableEvent<C> {
        if matches!(&action, TableAction::Custom(_)) {
            return TableEvent::Action(action);
        }

        if self.visible_rows.is_empty() {
            return TableEvent::Unhandled;
        }

        match action {
            TableAction::SelectPrev => {
                self.select_prev();
                TableEvent::Handled
            }
            TableAction::SelectNext => {
                self.select_next();
                TableEvent::Handled
            }
            TableAction::SelectFirst => {
                self.select_first();
                TableEvent::Handled
            }
            TableAction::SelectLast => {
                self.select_last();
                TableEvent::Handled
            }
            TableAction::SelectParent => {
                self.select_parent();
                TableEvent::Handled
            }
            TableAction::SelectChild => {
                self.select_child();
                TableEvent::Handled
            }
            TableAction::ToggleNode(id) => TableEvent::from_handled(self.toggle(&id)),
            TableAction::ToggleSelected => {
                let Some(id) = self.selected_id().map(str::to_owned) else {
                    return TableEvent::Unhandled;
                };
                TableEvent::from_handled(self.toggle(&id))
            }
            TableAction::ToggleRecursive => TableEvent::from_handled(self.toggle_recursive()),
            TableAction::ExpandAll => {
                self.expand_all();
                TableEvent::Handled
            }
            TableAction::CollapseAll => {
                self.collapse_all();
                TableEvent::Handled
            }
            TableAction::ToggleAll => {
                self.toggle_all();
                TableEvent::Handled
            }
            TableAction::ToggleGuides => {
                self.draw_lines = !self.draw_lines;
                TableEvent::Handled
            }
            TableAction::SetSearch(_)
            | TableAction::ClearSearch
            | TableAction::ToggleSort(_)
            | TableAction::SortSelectedColumn
            | TableAction::SelectPrevColumn
            | TableAction::SelectNextColumn
            | TableAction::SetPage(_)
            | TableAction::NextPage
            | TableAction::PrevPage
            | TableAction::FirstPage
            | TableAction::LastPage
            | TableAction::SetPageSize(_)
            | TableAction::CyclePageSize
            | TableAction::SetColumnVisibility(..)
            | TableAction::ToggleColumnVisibility(_)
            | TableAction::Custom(_) => TableEvent::Unhandled,
        }
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key(&mut self, key: KeyEvent) -> TableEvent<()> {
        let Some(action) = self.keymap.resolve_tree(key) else {
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
        let Some(action) = self.keymap.resolve_tree_with(key, custom) else {
            return TableEvent::Unhandled;
        };
        self.handle_action(action)
    }

    fn is_expandable(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&idx| self.nodes[idx].meta.has_children)
    }

    fn descends_from(&self, node: &FlatNode, ancestor: usize) -> bool {
        let mut parent = node.meta.parent;
        while let Some(idx) = parent {
            if idx == ancestor {
                return true;
            }
            parent = self.nodes[idx].meta.parent;
        }
        false
    }

    fn row_at(&self, idx: usize) -> Option<&HierarchicalRow<P>> {
        let (first, rest) = self.nodes.get(idx)?.path.split_first()?;
        let mut row = self.forest.get(*first as usize)?;
        for &step in rest {
            row = row.children.get(step as usize)?;
        }
        Some(row)
    }

    fn tree_row(&self, idx: usize) -> Option<TreeRow<'_, P>> {
        let node = self.nodes.get(idx)?;
        Some(TreeRow {
            row: self.row_at(idx)?,
            flat_index: idx,
            level: node.meta.level,
            has_children: node.meta.has_children,
            is_expanded: self.expanded.contains(&node.id),
            is_visible: self.visible_flags[idx],
            last_sibling_path: node.last_sibling_path.as_slice(),
        })
    }

    fn selected_flat(&self) -> Option<usize> {
        self.selection
            .selected()
            .and_then(|position| self.visible_rows.get(position).copied())
    }

    fn visible_position(&self, idx: usize) -> Option<usize> {
        self.visible_rows.binary_search(&idx).ok()
    }

    // Recomputes visibility and keeps the selection on the same row, or on its
    // nearest visible ancestor when the row became hidden.
    fn refresh(&mut self) {
        self.refresh_from(self.selected_flat());
    }

    // `previous` is a flat index into the current `nodes`.
    fn refresh_from(&mut self, previous: Option<usize>) {

        self.visible_flags = visibility_pass(
            self.nodes
                .iter()
                .map(|node| (node.meta, self.expanded.contains(&node.id))),
        );
        self.visible_rows.clear();
        self.visible_rows.extend(
            self.visible_flags
                .iter()
                .enumerate()
                .filter_map(|(idx, &visible)| visible.then_some(idx)),
        );
        trace!(
            visible = self.visible_rows.len(),
            total = self.nodes.len(),
            "recomputed tree visibility"
        );

        let mut target = previous;
        while let Some(idx) = target {
            if self.visible_flags[idx] {
                break;
            }
            target = self.nodes[idx].meta.parent;
        }
        match target.and_then(|idx| self.visible_position(idx)) {
            Some(position) => self.selection.select(Some(position)),
            None => self.selection.clamp(self.visible_rows.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> Vec<HierarchicalRow<u32>> {
        vec![
            HierarchicalRow::root("tt", "Travel Trailers", 0)
                .with_child(
                    HierarchicalRow::root("tt-a", "A", 1)
                        .with_child(HierarchicalRow::root("tt-a-1", "A1", 2))
                        .with_child(HierarchicalRow::root("tt-a-2", "A2", 3)),
                )
                .with_child(HierarchicalRow::root("tt-b", "B", 4)),
            HierarchicalRow::root("mh", "Motorhomes", 5),
        ]
    }

    fn visible_ids<P>(table: &TreeTable<P>) -> Vec<&str> {
        table.visible_rows().map(|row| row.row.id.as_str()).collect()
    }

    #[test]
    fn builds_visible_rows_with_expansion() {
        let mut table = TreeTable::new(forest());
        table.set_expanded("tt", true);
        table.set_expanded("tt-a", true);

        let levels: Vec<_> = table.visible_rows().map(|row| row.level).collect();
        assert_eq!(
            visible_ids(&table),
            vec!["tt", "tt-a", "tt-a-1", "tt-a-2", "tt-b", "mh"]
        );
        assert_eq!(levels, vec![0, 1, 2, 2, 1, 0]);
    }

    #[test]
    fn toggle_ignores_leaves_and_unknown_ids() {
        let mut table = TreeTable::new(forest());
        assert!(!table.toggle("mh"));
        assert!(!table.toggle("nope"));
        assert!(table.expansion().is_empty());
    }

    #[test]
    fn expand_all_marks_every_expandable_row() {
        let mut table = TreeTable::new(forest());
        assert_eq!(table.toggle_all_label(), "Expand All");

        table.expand_all();

        assert!(table.is_all_expanded());
        assert_eq!(table.expansion().len(), 2);
        assert_eq!(table.visible_len(), table.len());
        assert_eq!(table.toggle_all_label(), "Collapse All");

        table.toggle_all();
        assert_eq!(visible_ids(&table), vec!["tt", "mh"]);
    }

    #[test]
    fn collapsing_moves_selection_to_visible_ancestor() {
        let mut table = TreeTable::new(forest());
        assert!(table.select_by_id("tt-a-2"));
        assert_eq!(table.selected_id(), Some("tt-a-2"));

        table.collapse_all();

        assert_eq!(table.selected_id(), Some("tt"));
    }

    #[test]
    fn select_child_expands_and_descends() {
        let mut table = TreeTable::new(forest());
        table.select_first();

        table.select_child();

        assert!(table.is_expanded("tt"));
        assert_eq!(table.selected_id(), Some("tt-a"));
    }

    #[test]
    fn select_parent_moves_up_one_level() {
        let mut table = TreeTable::new(forest());
        table.select_by_id("tt-a-1");
        table.select_parent();
        assert_eq!(table.selected_id(), Some("tt-a"));
    }

    #[test]
    fn toggle_recursive_expands_whole_subtree_only() {
        let mut table = TreeTable::new(forest());
        table.select_first();

        assert!(table.toggle_recursive());
        assert!(table.is_expanded("tt"));
        assert!(table.is_expanded("tt-a"));
        assert!(table.is_visible("tt-a-2"));

        assert!(table.toggle_recursive());
        assert!(table.expansion().is_empty());
    }

    #[test]
    fn set_forest_drops_stale_expansion() {
        let mut table = TreeTable::new(forest());
        table.expand_all();

        table.set_forest(vec![HierarchicalRow::root("tt", "Travel Trailers", 0)]);

        assert!(table.expansion().is_empty());
        assert_eq!(visible_ids(&table), vec!["tt"]);
    }

    #[test]
    fn snapshot_restores_expansion_and_selection() {
        let mut table = TreeTable::new(forest());
        table.toggle("tt");
        table.select_by_id("tt-b");
        let snapshot = table.snapshot();

        let mut restored = TreeTable::new(forest());
        restored.restore(snapshot);

        assert!(restored.is_expanded("tt"));
        assert_eq!(restored.selected_id(), Some("tt-b"));
    }

    #[test]
    fn empty_forest_handles_nothing() {
        let mut table = TreeTable::<()>::new(Vec::new());
        assert!(table.is_all_expanded());
        assert_eq!(
            table.handle_action::<()>(TableAction::ExpandAll),
            TableEvent::Unhandled
        );
        assert_eq!(table.visible_rows().count(), 0);
    }

    #[test]
    fn custom_and_grid_actions_are_not_consumed() {
        let mut table = TreeTable::new(forest());
        assert_eq!(
            table.handle_action(TableAction::Custom(7)),
            TableEvent::Action(TableAction::Custom(7))
        );
        assert_eq!(
            table.handle_action::<()>(TableAction::NextPage),
            TableEvent::Unhandled
        );
        assert_eq!(
            table.handle_action::<()>(TableAction::ToggleNode("tt".to_string())),
            TableEvent::Handled
        );
    }

    #[test]
    fn set_forest_with_fewer_rows_keeps_a_valid_selection() {
        let mut table = TreeTable::new(forest());
        table.expand_all();
        assert!(table.select_by_id("tt-a-2"));

        table.set_forest(vec![HierarchicalRow::root("x", "X", 9)]);

        assert_eq!(table.selected_id(), Some("x"));
        assert_eq!(table.selected_index(), Some(0));
    }

    #[test]
    fn set_forest_falls_back_to_surviving_ancestor() {
        let mut table = TreeTable::new(forest());
        table.expand_all();
        table.select_by_id("tt-a-2");

        table.set_forest(vec![
            HierarchicalRow::root("tt", "Travel Trailers", 0)
                .with_child(HierarchicalRow::root("tt-a", "A", 1))
                .with_child(HierarchicalRow::root("tt-b", "B", 4)),
        ]);

        assert_eq!(table.selected_id(), Some("tt-a"));
    }

    #[test]
    fn set_forest_follows_selected_id_when_reordered() {
        let mut table = TreeTable::new(forest());
        table.expand_all();
        table.select_by_id("tt-a-2");

        table.set_forest(vec![
            HierarchicalRow::root("tt", "Travel Trailers", 0)
                .with_child(HierarchicalRow::root("tt-b", "B", 4))
                .with_child(
                    HierarchicalRow::root("tt-a", "A", 1)
                        .with_child(HierarchicalRow::root("tt-a-1", "A1", 2))
                        .with_child(HierarchicalRow::root("tt-a-2", "A2", 3)),
                ),
            HierarchicalRow::root("mh", "Motorhomes", 5),
        ]);

        assert_eq!(
            visible_ids(&table),
            vec!["tt", "tt-b", "tt-a", "tt-a-1", "tt-a-2", "mh"]
        );
        assert_eq!(table.selected_id(), Some("tt-a-2"));
        assert_eq!(table.selected_index(), Some(4));
    }
}

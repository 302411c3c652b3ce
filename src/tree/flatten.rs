use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::model::{HierarchicalRow, forest_len};

/// Per-row metadata shared by borrowed and cached flattened rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatMeta {
    /// Level as declared by the row (used for indentation).
    pub level: u16,
    /// Position of the structural parent in the flattened sequence.
    pub parent: Option<usize>,
    /// Whether the row has at least one child.
    pub has_children: bool,
}

/// A row of the flattened forest, in pre-order.
#[derive(Clone, Debug)]
pub struct FlattenedRow<'a, P> {
    /// The source row.
    pub row: &'a HierarchicalRow<P>,
    /// Level, parent position and child flag.
    pub meta: FlatMeta,
    /// For each ancestor depth, whether that branch is the last sibling (guide lines).
    pub last_sibling_path: SmallVec<[bool; 8]>,
}

impl<P> FlattenedRow<'_, P> {
    /// Row id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.row.id
    }

    /// Declared row level.
    #[inline]
    pub const fn level(&self) -> u16 {
        self.meta.level
    }
}

/// Set of expanded row ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionState {
    ids: FxHashSet<String>,
}

impl ExpansionState {
    /// Creates an empty (fully collapsed) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id is expanded.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of expanded ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing is expanded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over the expanded ids in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Flips membership of `id`; returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_owned());
            true
        }
    }

    /// Sets membership of `id`; returns `true` if the state changed.
    pub fn set(&mut self, id: &str, expanded: bool) -> bool {
        if expanded {
            if self.ids.contains(id) {
                return false;
            }
            self.ids.insert(id.to_owned())
        } else {
            self.ids.remove(id)
        }
    }

    /// Removes every id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keeps only the ids accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.ids.retain(|id| keep(id));
    }
}

impl<S: Into<String>> FromIterator<S> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for ExpansionState {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.ids.extend(iter.into_iter().map(Into::into));
    }
}

/// Visibility of every flattened row, keyed by id and in flattened order.
#[derive(Clone, Debug, Default)]
pub struct VisibilityMap<'a> {
    order: Vec<(&'a str, bool)>,
    index: FxHashMap<&'a str, usize>,
}

impl<'a> VisibilityMap<'a> {
    pub(crate) fn from_ordered(entries: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        let order: Vec<_> = entries.into_iter().collect();
        let mut index = FxHashMap::with_capacity_and_hasher(order.len(), FxBuildHasher);
        for (idx, &(id, _)) in order.iter().enumerate() {
            index.insert(id, idx);
        }
        Self { order, index }
    }

    /// Returns whether the row is visible; unknown ids are not visible.
    pub fn is_visible(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&idx| self.order[idx].1)
    }

    /// Iterates `(id, visible)` pairs in flattened order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, bool)> + '_ {
        self.order.iter().copied()
    }

    /// Ids of the visible rows in display order.
    pub fn visible_ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.order
            .iter()
            .filter_map(|&(id, visible)| visible.then_some(id))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Flattens the forest in pre-order, preserving sibling order.
///
/// Every node appears exactly once; a parent always precedes its subtree.
pub fn flatten<P>(forest: &[HierarchicalRow<P>]) -> Vec<FlattenedRow<'_, P>> {
    let mut out = Vec::with_capacity(forest_len(forest));
    walk_forest(forest, |row, visit| {
        out.push(FlattenedRow {
            row,
            meta: visit.meta,
            last_sibling_path: SmallVec::from_slice(visit.last_sibling_path),
        });
    });
    out
}

/// Computes visibility in a single pass over the flattened rows.
///
/// A row is visible if its level is 0, or if its parent is both visible and expanded.
/// Parents precede children in pre-order, so the parent's result is always available.
pub fn compute_visibility<'a, P>(
    flat: &[FlattenedRow<'a, P>],
    expansion: &ExpansionState,
) -> VisibilityMap<'a> {
    let visible =
        visibility_pass(flat.iter().map(|row| (row.meta, expansion.contains(&row.row.id))));
    VisibilityMap::from_ordered(flat.iter().map(|row| row.row.id.as_str()).zip(visible))
}

/// Ids of every row with at least one child, in pre-order.
pub fn expandable_ids<P>(forest: &[HierarchicalRow<P>]) -> Vec<&str> {
    let mut ids = Vec::new();
    walk_forest(forest, |row, visit| {
        if visit.meta.has_children {
            ids.push(row.id.as_str());
        }
    });
    ids
}

/// Core visibility rule over `(meta, is_expanded)` pairs in flattened order.
pub(crate) fn visibility_pass<I>(rows: I) -> Vec<bool>
where
    I: IntoIterator<Item = (FlatMeta, bool)>,
{
    let rows = rows.into_iter();
    let mut visible = Vec::with_capacity(rows.size_hint().0);
    let mut expanded = Vec::with_capacity(rows.size_hint().0);
    for (meta, is_expanded) in rows {
        let is_visible = meta.level == 0
            || meta
                .parent
                .is_none_or(|parent| visible[parent] && expanded[parent]);
        visible.push(is_visible);
        expanded.push(is_expanded);
    }
    visible
}

/// Location of a row reported by [`walk_forest`].
pub(crate) struct WalkVisit<'s> {
    pub(crate) index: usize,
    pub(crate) meta: FlatMeta,
    pub(crate) path: &'s [u32],
    pub(crate) last_sibling_path: &'s [bool],
}

/// Pre-order traversal shared by [`flatten`] and the table engine.
pub(crate) fn walk_forest<'a, P, F>(forest: &'a [HierarchicalRow<P>], mut visit: F)
where
    F: FnMut(&'a HierarchicalRow<P>, WalkVisit<'_>),
{
    let mut path: SmallVec<[u32; 8]> = SmallVec::new();
    let mut last_sibling_path: SmallVec<[bool; 8]> = SmallVec::new();
    let mut next = 0;
    for (idx, root) in forest.iter().enumerate() {
        path.push(index_u32(idx));
        walk_row(root, None, &mut path, &mut last_sibling_path, &mut next, &mut visit);
        path.pop();
    }
}

fn walk_row<'a, P, F>(
    row: &'a HierarchicalRow<P>,
    parent: Option<usize>,
    path: &mut SmallVec<[u32; 8]>,
    last_sibling_path: &mut SmallVec<[bool; 8]>,
    next: &mut usize,
    visit: &mut F,
) where
    F: FnMut(&'a HierarchicalRow<P>, WalkVisit<'_>),
{
    let index = *next;
    *next += 1;
    visit(
        row,
        WalkVisit {
            index,
            meta: FlatMeta {
                level: row.level,
                parent,
                has_children: row.has_children(),
            },
            path: path.as_slice(),
            last_sibling_path: last_sibling_path.as_slice(),
        },
    );

    let last = row.children.len().saturating_sub(1);
    for (idx, child) in row.children.iter().enumerate() {
        path.push(index_u32(idx));
        last_sibling_path.push(idx == last);
        walk_row(child, Some(index), path, last_sibling_path, next, visit);
        last_sibling_path.pop();
        path.pop();
    }
}

#[inline]
fn index_u32(idx: usize) -> u32 {
    u32::try_from(idx).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<HierarchicalRow<u32>> {
        vec![
            HierarchicalRow::root("tt", "Travel Trailers", 52_400)
                .with_child(HierarchicalRow::root("tt-jayco", "Jayco", 18_200))
                .with_child(
                    HierarchicalRow::root("tt-keystone", "Keystone", 22_100)
                        .with_child(HierarchicalRow::root("tt-keystone-x", "X", 1)),
                ),
            HierarchicalRow::root("mh", "Motorhomes", 12_850),
        ]
    }

    #[test]
    fn flattens_in_pre_order() {
        let forest = sample();
        let flat = flatten(&forest);

        let ids: Vec<_> = flat.iter().map(FlattenedRow::id).collect();
        let levels: Vec<_> = flat.iter().map(FlattenedRow::level).collect();
        let parents: Vec<_> = flat.iter().map(|row| row.meta.parent).collect();

        assert_eq!(
            ids,
            vec!["tt", "tt-jayco", "tt-keystone", "tt-keystone-x", "mh"]
        );
        assert_eq!(levels, vec![0, 1, 1, 2, 0]);
        assert_eq!(parents, vec![None, Some(0), Some(0), Some(2), None]);
    }

    #[test]
    fn tail_stack_marks_last_siblings() {
        let forest = sample();
        let flat = flatten(&forest);

        assert!(flat[0].last_sibling_path.is_empty());
        assert_eq!(flat[1].last_sibling_path.as_slice(), &[false]);
        assert_eq!(flat[2].last_sibling_path.as_slice(), &[true]);
        assert_eq!(flat[3].last_sibling_path.as_slice(), &[true, true]);
    }

    #[test]
    fn collapsed_forest_shows_only_roots() {
        let forest = sample();
        let flat = flatten(&forest);
        let map = compute_visibility(&flat, &ExpansionState::new());

        assert_eq!(map.visible_ids().collect::<Vec<_>>(), vec!["tt", "mh"]);
        assert!(!map.is_visible("tt-jayco"));
        assert!(!map.is_visible("missing"));
    }

    #[test]
    fn expanded_child_under_collapsed_parent_stays_hidden() {
        let forest = sample();
        let flat = flatten(&forest);
        let expansion: ExpansionState = ["tt-keystone"].into_iter().collect();
        let map = compute_visibility(&flat, &expansion);

        assert!(!map.is_visible("tt-keystone"));
        assert!(!map.is_visible("tt-keystone-x"));
    }

    #[test]
    fn expandable_ids_skip_leaves() {
        let forest = sample();
        assert_eq!(expandable_ids(&forest), vec!["tt", "tt-keystone"]);
    }

    #[test]
    fn empty_forest_flattens_to_nothing() {
        let forest: Vec<HierarchicalRow<()>> = Vec::new();
        let flat = flatten(&forest);
        assert!(flat.is_empty());
        assert!(compute_visibility(&flat, &ExpansionState::new()).is_empty());
    }

    #[test]
    fn expansion_toggle_round_trips() {
        let mut state = ExpansionState::new();
        assert!(state.toggle("a"));
        assert!(!state.toggle("a"));
        assert!(state.is_empty());
        assert!(state.set("b", true));
        assert!(!state.set("b", true));
        assert!(state.set("b", false));
    }
}

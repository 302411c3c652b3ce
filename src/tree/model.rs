use rustc_hash::{FxBuildHasher, FxHashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ForestError;

/// A node of the row forest rendered by [`TreeTable`](crate::TreeTable).
///
/// The forest contract:
/// - no cycles and no shared nodes (children are owned by their parent);
/// - ids are unique across the whole forest and stable between frames;
/// - `level` is the parent's level plus one (roots are level 0);
/// - `parent_id` names the structural parent (`None` for roots).
///
/// The engine trusts `level` for indentation and does not repair inconsistent input.
/// Use [`validate_forest`] to check the contract up front.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchicalRow<P> {
    /// Unique, stable row key.
    pub id: String,
    /// Label shown in the tree column.
    pub name: String,
    /// Depth of the row (roots are 0).
    pub level: u16,
    /// Id of the parent row, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent_id: Option<String>,
    /// Display-only metrics carried with the row.
    pub payload: P,
    /// Child rows in display order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Self>,
}

impl<P> HierarchicalRow<P> {
    /// Creates a root row without children.
    pub fn root(id: impl Into<String>, name: impl Into<String>, payload: P) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: 0,
            parent_id: None,
            payload,
            children: Vec::new(),
        }
    }

    /// Appends a child, filling in its `level` and `parent_id` from `self`.
    #[must_use]
    pub fn with_child(mut self, mut child: Self) -> Self {
        child.level = self.level + 1;
        child.parent_id = Some(self.id.clone());
        child.relevel();
        self.children.push(child);
        self
    }

    /// Returns `true` if the row has at least one child.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Counts this row and all of its descendants.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }

    // Keeps nested children consistent after a subtree is re-parented.
    fn relevel(&mut self) {
        let level = self.level + 1;
        for child in &mut self.children {
            child.level = level;
            child.parent_id = Some(self.id.clone());
            child.relevel();
        }
    }
}

/// Counts every row in the forest.
pub fn forest_len<P>(forest: &[HierarchicalRow<P>]) -> usize {
    forest.iter().map(HierarchicalRow::subtree_len).sum()
}

/// Checks the forest contract, reporting the first violation in pre-order.
pub fn validate_forest<P>(forest: &[HierarchicalRow<P>]) -> Result<(), ForestError> {
    let mut seen: FxHashSet<&str> =
        FxHashSet::with_capacity_and_hasher(forest_len(forest), FxBuildHasher);
    for row in forest {
        if row.level != 0 {
            return Err(ForestError::RootLevel {
                id: row.id.clone(),
                level: row.level,
            });
        }
        validate_row(row, None, &mut seen)?;
    }
    Ok(())
}

fn validate_row<'a, P>(
    row: &'a HierarchicalRow<P>,
    parent: Option<&'a HierarchicalRow<P>>,
    seen: &mut FxHashSet<&'a str>,
) -> Result<(), ForestError> {
    if !seen.insert(row.id.as_str()) {
        return Err(ForestError::DuplicateId(row.id.clone()));
    }

    let expected_parent = parent.map(|p| p.id.as_str());
    if row.parent_id.as_deref() != expected_parent {
        return Err(ForestError::ParentMismatch {
            id: row.id.clone(),
            expected: expected_parent.map(str::to_owned),
            found: row.parent_id.clone(),
        });
    }

    if let Some(parent) = parent {
        let expected = parent.level.saturating_add(1);
        if row.level != expected {
            return Err(ForestError::LevelMismatch {
                id: row.id.clone(),
                expected,
                found: row.level,
            });
        }
    }

    for child in &row.children {
        validate_row(child, Some(row), seen)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, level: u16, parent: &str) -> HierarchicalRow<()> {
        HierarchicalRow {
            id: id.to_string(),
            name: id.to_string(),
            level,
            parent_id: Some(parent.to_string()),
            payload: (),
            children: Vec::new(),
        }
    }

    #[test]
    fn builder_fills_level_and_parent() {
        let tree = HierarchicalRow::root("tt", "Travel Trailers", ())
            .with_child(HierarchicalRow::root("tt-a", "A", ()).with_child(HierarchicalRow::root(
                "tt-a-1",
                "A1",
                (),
            )));

        assert!(validate_forest(std::slice::from_ref(&tree)).is_ok());
        let grandchild = &tree.children[0].children[0];
        assert_eq!(grandchild.level, 2);
        assert_eq!(grandchild.parent_id.as_deref(), Some("tt-a"));
        assert_eq!(forest_len(&[tree]), 3);
    }

    #[test]
    fn rejects_duplicate_ids_across_roots() {
        let forest = vec![
            HierarchicalRow::root("a", "A", ()),
            HierarchicalRow::root("b", "B", ()).with_child(HierarchicalRow::root("a", "A", ())),
        ];
        assert_eq!(
            validate_forest(&forest),
            Err(ForestError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn rejects_level_mismatch() {
        let mut root = HierarchicalRow::root("r", "R", ());
        root.children.push(leaf("c", 2, "r"));
        assert_eq!(
            validate_forest(&[root]),
            Err(ForestError::LevelMismatch {
                id: "c".to_string(),
                expected: 1,
                found: 2,
            })
        );
    }

    #[test]
    fn rejects_wrong_parent_id() {
        let mut root = HierarchicalRow::root("r", "R", ());
        root.children.push(leaf("c", 1, "elsewhere"));
        assert!(matches!(
            validate_forest(&[root]),
            Err(ForestError::ParentMismatch { .. })
        ));
    }

    #[test]
    fn rejects_nested_root_level() {
        let mut root = HierarchicalRow::root("r", "R", ());
        root.level = 1;
        assert!(matches!(
            validate_forest(&[root]),
            Err(ForestError::RootLevel { level: 1, .. })
        ));
    }

    #[test]
    fn empty_forest_is_valid() {
        assert!(validate_forest::<()>(&[]).is_ok());
    }
}

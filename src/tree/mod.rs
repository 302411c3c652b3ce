//! Expandable hierarchical table: flattening, expansion state, and the tree view widget.

mod columns;
mod context;
mod flatten;
mod glyphs;
mod model;
mod state;
mod widget;

pub use columns::{ColumnSizing, PayloadColumns, TreeCellFn, TreeColumn, TreeColumns};
pub use context::TreeRowContext;
pub use flatten::{
    ExpansionState, FlatMeta, FlattenedRow, VisibilityMap, compute_visibility, expandable_ids,
    flatten,
};
pub use glyphs::{NameLabel, TreeGlyphs, TreeLabelRenderer, tree_label_line};
pub use model::{HierarchicalRow, forest_len, validate_forest};
pub use state::{TreeRow, TreeTable, TreeTableSnapshot};
pub use widget::TreeTableView;

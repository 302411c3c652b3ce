//! Expandable tree tables and sortable, searchable, paginated grids for ratatui.
//!
//! [`TreeTable`] flattens a forest of [`HierarchicalRow`]s once and tracks which rows are
//! expanded; [`GridTable`] runs rows through a filter → sort → page pipeline. Both are
//! plain state objects that can be driven and inspected without a terminal, and both
//! render through a `StatefulWidget` ([`TreeTableView`], [`GridTableView`]).
//!
//! Feature flags:
//! - `keymap`: crossterm-based key bindings and `handle_key*` helpers on both tables.
//! - `serde`: serde support for rows, snapshots and [`GridConfig`].

mod action;
mod error;
pub mod format;
pub mod grid;
#[cfg(feature = "keymap")]
mod keymap;
mod layout;
pub mod prelude;
mod selection;
mod style;
pub mod tree;

pub use action::{TableAction, TableEvent};
pub use error::{ForestError, GridError};
pub use format::{
    MetricFormat, Trend, TrendDirection, format_currency, format_integer, format_metric,
    format_percent, percent_change,
};
pub use grid::{
    CellValue, ColumnKind, GridColumn, GridConfig, GridSummary, GridTable, GridTableSnapshot,
    GridTableView, PaginationState, RowEmphasis, SortDirection, SortState,
};
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, TableKeyBindings};
pub use layout::{ColumnWidth, distribute_widths, width_constraints};
pub use style::{ScrollPolicy, TableStyle};
pub use tree::{
    HierarchicalRow, NameLabel, PayloadColumns, TreeColumn, TreeColumns, TreeGlyphs,
    TreeLabelRenderer, TreeRow, TreeRowContext, TreeTable, TreeTableSnapshot, TreeTableView,
    validate_forest,
};

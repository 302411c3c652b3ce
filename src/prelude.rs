pub use crate::{
    CellValue, ColumnKind, ColumnWidth, ForestError, GridColumn, GridConfig, GridError,
    GridSummary, GridTable, GridTableSnapshot, GridTableView, HierarchicalRow, MetricFormat,
    NameLabel, PayloadColumns, RowEmphasis, ScrollPolicy, SortDirection, TableAction,
    TableEvent, TableStyle, Trend, TrendDirection, TreeColumn, TreeColumns, TreeGlyphs,
    TreeLabelRenderer, TreeRow, TreeRowContext, TreeTable, TreeTableSnapshot, TreeTableView,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, TableKeyBindings};

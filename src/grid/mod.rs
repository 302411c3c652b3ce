//! Flat data table: global search, single-column sort, pagination, and the grid view widget.

mod column;
mod config;
mod pipeline;
mod state;
mod widget;

pub use column::{CellAccessor, CellRenderer, CellValue, ColumnKind, GridColumn};
pub use config::{GridConfig, PAGE_SIZES};
pub use pipeline::{PaginationState, SortDirection, SortState};
pub use state::{GridSummary, GridTable, GridTableSnapshot, RowEmphasis};
pub use widget::{GridTableView, NO_RESULTS};

/// Actions that a user or application can initiate on a table.
///
/// Tree tables react to the selection, expansion and guide actions; grid tables react to
/// the selection, search, sort, pagination and column actions. Actions that do not apply
/// to a table kind are reported as [`TableEvent::Unhandled`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableAction<Custom = ()> {
    /// Move selection to the previous row.
    SelectPrev,
    /// Move selection to the next row.
    SelectNext,
    /// Select the first row.
    SelectFirst,
    /// Select the last row.
    SelectLast,
    /// Move selection to the parent row (tree).
    SelectParent,
    /// Expand the selection and move to its first expandable child (tree).
    SelectChild,
    /// Toggle expansion of the row with the given id (tree).
    ToggleNode(String),
    /// Toggle expansion of the selected row (tree).
    ToggleSelected,
    /// Toggle expansion of the selected subtree recursively (tree).
    ToggleRecursive,
    /// Expand every row that has children (tree).
    ExpandAll,
    /// Collapse every row (tree).
    CollapseAll,
    /// Collapse all when everything is expanded, otherwise expand all (tree).
    ToggleAll,
    /// Toggle drawing of guide lines (tree).
    ToggleGuides,
    /// Replace the global search query (grid).
    SetSearch(String),
    /// Clear the global search query (grid).
    ClearSearch,
    /// Cycle the sort state of a column (grid).
    ToggleSort(String),
    /// Cycle the sort state of the selected column (grid).
    SortSelectedColumn,
    /// Move column selection left (grid).
    SelectPrevColumn,
    /// Move column selection right (grid).
    SelectNextColumn,
    /// Jump to a page index (grid).
    SetPage(usize),
    /// Go to the next page (grid).
    NextPage,
    /// Go to the previous page (grid).
    PrevPage,
    /// Go to the first page (grid).
    FirstPage,
    /// Go to the last page (grid).
    LastPage,
    /// Change the page size (grid).
    SetPageSize(usize),
    /// Step to the next configured page size, wrapping around (grid).
    CyclePageSize,
    /// Show or hide a column (grid).
    SetColumnVisibility(String, bool),
    /// Flip a column's visibility (grid).
    ToggleColumnVisibility(String),
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

/// Result of handling an action or key event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent<Custom = ()> {
    /// The action was handled internally and state was updated.
    Handled,
    /// The action was ignored (e.g., nothing selected / nothing to do).
    Unhandled,
    /// The action is forwarded to the caller for handling.
    Action(TableAction<Custom>),
}

impl<Custom> TableEvent<Custom> {
    pub(crate) fn from_handled(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Unhandled }
    }
}

use ratatui::style::Style;

use super::state::TreeRow;

/// Everything a label renderer needs to draw the tree column of one row.
#[derive(Clone, Copy)]
pub struct TreeRowContext<'a> {
    /// Id of the row being drawn.
    pub id: &'a str,
    pub level: u16,
    /// Last-sibling flags of the row's ancestors, root first.
    pub last_sibling_path: &'a [bool],
    pub is_expanded: bool,
    pub has_children: bool,
    /// Draw guide lines instead of plain indentation.
    pub draw_lines: bool,
    pub line_style: Style,
}

impl<'a> TreeRowContext<'a> {
    pub fn for_row<P>(row: &TreeRow<'a, P>, draw_lines: bool, line_style: Style) -> Self {
        Self {
            id: row.row.id.as_str(),
            level: row.level,
            last_sibling_path: row.last_sibling_path,
            is_expanded: row.is_expanded,
            has_children: row.has_children,
            draw_lines,
            line_style,
        }
    }
}

use ratatui::text::{Line, Span};
use ratatui::widgets::Cell;

use super::context::TreeRowContext;
use super::model::HierarchicalRow;

#[derive(Clone, Copy)]
pub struct TreeGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub leaf: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
}

impl TreeGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            leaf: "•",
            expanded: "▼",
            collapsed: "▶",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            leaf: "*",
            expanded: "v",
            collapsed: ">",
        }
    }
}

/// Draws the tree column for a row.
pub trait TreeLabelRenderer<P> {
    fn cell<'a>(
        &'a self,
        row: &'a HierarchicalRow<P>,
        ctx: &TreeRowContext,
        glyphs: &TreeGlyphs<'a>,
    ) -> Cell<'a>;
}

/// Renders the row name with indentation, guides and the expander glyph.
#[derive(Clone, Copy, Debug, Default)]
pub struct NameLabel;

impl<P> TreeLabelRenderer<P> for NameLabel {
    fn cell<'a>(
        &'a self,
        row: &'a HierarchicalRow<P>,
        ctx: &TreeRowContext,
        glyphs: &TreeGlyphs<'a>,
    ) -> Cell<'a> {
        Cell::from(tree_label_line(ctx, &row.name, glyphs))
    }
}

const fn expander<'a>(ctx: &TreeRowContext<'_>, glyphs: &TreeGlyphs<'a>) -> &'a str {
    match (ctx.has_children, ctx.is_expanded) {
        (true, true) => glyphs.expanded,
        (true, false) => glyphs.collapsed,
        (false, _) if ctx.level == 0 => "",
        (false, _) => glyphs.leaf,
    }
}

/// Builds the label line: guides (or plain indentation), expander, then the name.
pub fn tree_label_line<'a>(
    ctx: &TreeRowContext<'_>,
    name: &'a str,
    glyphs: &TreeGlyphs<'a>,
) -> Line<'a> {
    let depth = ctx.last_sibling_path.len();
    let mut spans = Vec::with_capacity(usize::from(ctx.level).max(depth) + 3);

    if ctx.draw_lines && depth > 0 {
        for (depth_idx, &is_last) in ctx.last_sibling_path.iter().enumerate() {
            let part = if depth_idx + 1 == depth {
                if is_last {
                    glyphs.branch_last
                } else {
                    glyphs.branch
                }
            } else if is_last {
                glyphs.indent
            } else {
                glyphs.vert
            };
            spans.push(Span::styled(part, ctx.line_style));
        }
    } else {
        for _ in 0..ctx.level {
            spans.push(Span::raw(glyphs.indent));
        }
    }

    let expander = expander(ctx, glyphs);
    if !expander.is_empty() {
        spans.push(Span::raw(expander));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw(name));
    Line::from(spans)
}

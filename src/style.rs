use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Scroll behaviour when the selected row changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScrollPolicy {
    /// Scroll only as far as needed to keep the selection on screen.
    #[default]
    KeepInView,
    /// Keep the selection in the middle of the viewport where possible.
    CenterOnSelect,
}

/// Visual settings shared by the tree and grid views.
#[derive(Clone)]
pub struct TableStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub header_style: Style,
    pub highlight_style: Style,
    /// Applied to every other row of the grid.
    pub stripe_style: Style,
    /// Guide lines of the tree column.
    pub line_style: Style,
    /// Rows whose value is in the active highlight set.
    pub active_style: Style,
    /// Rows outside a non-empty highlight set.
    pub dimmed_style: Style,
    /// The "No results." row.
    pub empty_style: Style,
    /// Footer with the result summary and page indicator.
    pub footer_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
    pub virtualize_rows: bool,
    pub scroll_policy: ScrollPolicy,
}

impl Default for TableStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            header_style: Style::default().add_modifier(Modifier::BOLD),
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            stripe_style: Style::default(),
            line_style: Style::default(),
            active_style: Style::default().add_modifier(Modifier::BOLD),
            dimmed_style: Style::default().add_modifier(Modifier::DIM),
            empty_style: Style::default().add_modifier(Modifier::ITALIC),
            footer_style: Style::default(),
            highlight_symbol: ">> ",
            borders: Borders::ALL,
            virtualize_rows: false,
            scroll_policy: ScrollPolicy::KeepInView,
        }
    }
}

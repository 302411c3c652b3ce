use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::TableAction;

/// Navigation key layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeymapProfile {
    /// Arrow keys and `hjkl`.
    #[default]
    Default,
    /// `hjkl` only.
    Vim,
    /// Arrow keys only.
    Arrows,
}

enum Nav {
    Up,
    Down,
    Left,
    Right,
}

/// Maps crossterm key events to [`TableAction`]s for tree and grid tables.
#[derive(Clone, Copy, Debug)]
pub struct TableKeyBindings {
    profile: KeymapProfile,
}

impl Default for TableKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl TableKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    /// Resolves a key for a tree table.
    pub fn resolve_tree<C>(&self, key: KeyEvent) -> Option<TableAction<C>> {
        if let Some(nav) = self.nav(key) {
            return Some(match nav {
                Nav::Up => TableAction::SelectPrev,
                Nav::Down => TableAction::SelectNext,
                Nav::Left => TableAction::SelectParent,
                Nav::Right => TableAction::SelectChild,
            });
        }
        match key.code {
            KeyCode::Enter => Some(TableAction::ToggleSelected),
            KeyCode::Char(' ') => Some(TableAction::ToggleRecursive),
            KeyCode::Char('e') => Some(TableAction::ExpandAll),
            KeyCode::Char('c') => Some(TableAction::CollapseAll),
            KeyCode::Char('a') => Some(TableAction::ToggleAll),
            KeyCode::Char('g') => Some(TableAction::ToggleGuides),
            KeyCode::Home => Some(TableAction::SelectFirst),
            KeyCode::End => Some(TableAction::SelectLast),
            _ => None,
        }
    }

    /// Resolves a key for a tree table, giving `custom` the first chance.
    pub fn resolve_tree_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<TableAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(TableAction::Custom(action));
        }
        self.resolve_tree(key)
    }

    /// Resolves a key for a grid table.
    pub fn resolve_grid<C>(&self, key: KeyEvent) -> Option<TableAction<C>> {
        if key.modifiers.contains(KeyModifiers::SHIFT) {
            match key.code {
                KeyCode::Left => return Some(TableAction::FirstPage),
                KeyCode::Right => return Some(TableAction::LastPage),
                _ => {}
            }
        }
        if let Some(nav) = self.nav(key) {
            return Some(match nav {
                Nav::Up => TableAction::SelectPrev,
                Nav::Down => TableAction::SelectNext,
                Nav::Left => TableAction::SelectPrevColumn,
                Nav::Right => TableAction::SelectNextColumn,
            });
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') => Some(TableAction::SortSelectedColumn),
            KeyCode::PageDown | KeyCode::Char('n') => Some(TableAction::NextPage),
            KeyCode::PageUp | KeyCode::Char('p') => Some(TableAction::PrevPage),
            KeyCode::Char('z') => Some(TableAction::CyclePageSize),
            KeyCode::Esc => Some(TableAction::ClearSearch),
            KeyCode::Home => Some(TableAction::SelectFirst),
            KeyCode::End => Some(TableAction::SelectLast),
            _ => None,
        }
    }

    /// Resolves a key for a grid table, giving `custom` the first chance.
    pub fn resolve_grid_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<TableAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(TableAction::Custom(action));
        }
        self.resolve_grid(key)
    }

    const fn nav(&self, key: KeyEvent) -> Option<Nav> {
        let arrows = !matches!(self.profile, KeymapProfile::Vim);
        let letters = !matches!(self.profile, KeymapProfile::Arrows);
        match key.code {
            KeyCode::Up if arrows => Some(Nav::Up),
            KeyCode::Down if arrows => Some(Nav::Down),
            KeyCode::Left if arrows => Some(Nav::Left),
            KeyCode::Right if arrows => Some(Nav::Right),
            KeyCode::Char('k') if letters => Some(Nav::Up),
            KeyCode::Char('j') if letters => Some(Nav::Down),
            KeyCode::Char('h') if letters => Some(Nav::Left),
            KeyCode::Char('l') if letters => Some(Nav::Right),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn profiles_limit_navigation_keys() {
        let default = TableKeyBindings::new();
        let vim = TableKeyBindings::with_profile(KeymapProfile::Vim);
        let arrows = TableKeyBindings::with_profile(KeymapProfile::Arrows);

        assert_eq!(default.resolve_tree::<()>(key(KeyCode::Up)), Some(TableAction::SelectPrev));
        assert_eq!(default.resolve_tree::<()>(key(KeyCode::Char('j'))), Some(TableAction::SelectNext));
        assert_eq!(vim.resolve_tree::<()>(key(KeyCode::Up)), None);
        assert_eq!(vim.resolve_tree::<()>(key(KeyCode::Char('h'))), Some(TableAction::SelectParent));
        assert_eq!(arrows.resolve_tree::<()>(key(KeyCode::Char('l'))), None);
        assert_eq!(arrows.resolve_tree::<()>(key(KeyCode::Right)), Some(TableAction::SelectChild));
    }

    #[test]
    fn grid_keys_map_to_grid_actions() {
        let bindings = TableKeyBindings::new();
        assert_eq!(
            bindings.resolve_grid::<()>(key(KeyCode::Right)),
            Some(TableAction::SelectNextColumn)
        );
        assert_eq!(
            bindings.resolve_grid::<()>(key(KeyCode::Enter)),
            Some(TableAction::SortSelectedColumn)
        );
        assert_eq!(
            bindings.resolve_grid::<()>(key(KeyCode::PageDown)),
            Some(TableAction::NextPage)
        );
        assert_eq!(
            bindings.resolve_grid::<()>(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT)),
            Some(TableAction::LastPage)
        );
        assert_eq!(bindings.resolve_tree::<()>(key(KeyCode::Enter)), Some(TableAction::ToggleSelected));
    }

    #[test]
    fn custom_mapping_takes_precedence() {
        let bindings = TableKeyBindings::new();
        let custom = |key: KeyEvent| (key.code == KeyCode::Char('j')).then_some("jump");
        assert_eq!(
            bindings.resolve_tree_with(key(KeyCode::Char('j')), custom),
            Some(TableAction::Custom("jump"))
        );
        assert_eq!(
            bindings.resolve_grid_with(key(KeyCode::Char('k')), custom),
            Some(TableAction::SelectPrev)
        );
    }
}

//! Menu model: focusable item lists and the navigation stack

use std::path::{Path, PathBuf};

use crate::catalog::ActionKind;

/// What selecting an item does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Action(ActionKind),
    Directory,
    ScriptFile,
}

/// A single selectable row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    label: String,
    kind: ItemKind,
    path: Option<PathBuf>,
}

impl MenuItem {
    pub fn action(label: impl Into<String>, action: ActionKind) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::Action(action),
            path: None,
        }
    }

    pub fn directory(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::Directory,
            path: Some(path.into()),
        }
    }

    pub fn script(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::ScriptFile,
            path: Some(path.into()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// An ordered list of items with one focused row.
///
/// `focused` is always a valid index while the menu has items. An empty
/// menu (e.g. a directory without scripts) has no focus target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    title: String,
    items: Vec<MenuItem>,
    focused: usize,
}

impl Menu {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            title: title.into(),
            items,
            focused: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Focused index, `None` for an empty menu
    pub fn focused(&self) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.focused)
        }
    }

    pub fn current_item(&self) -> Option<&MenuItem> {
        self.items.get(self.focused)
    }

    /// Move focus one row down, stopping at the last item
    pub fn focus_next(&mut self) {
        if self.focused + 1 < self.items.len() {
            self.focused += 1;
        }
    }

    /// Move focus one row up, stopping at the first item
    pub fn focus_previous(&mut self) {
        self.focused = self.focused.saturating_sub(1);
    }

    pub fn reset_focus(&mut self) {
        self.focused = 0;
    }
}

/// The active menu together with the chain of menus that opened it
#[derive(Debug, Clone)]
pub struct MenuStack {
    active: Menu,
    parents: Vec<Menu>,
}

impl MenuStack {
    pub fn new(root: Menu) -> Self {
        Self {
            active: root,
            parents: Vec::new(),
        }
    }

    pub fn active(&self) -> &Menu {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut Menu {
        &mut self.active
    }

    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    /// Make `child` active, keeping the current menu as its parent
    pub fn descend(&mut self, child: Menu) {
        let parent = std::mem::replace(&mut self.active, child);
        self.parents.push(parent);
    }

    /// Drop the active menu and return to its parent.
    ///
    /// At the root nothing changes and `None` is returned.
    pub fn ascend(&mut self) -> Option<&Menu> {
        let parent = self.parents.pop()?;
        self.active = parent;
        Some(&self.active)
    }

    /// Swap the active menu in place; the stack is untouched
    pub fn replace(&mut self, menu: Menu) {
        self.active = menu;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_items() -> Menu {
        Menu::new(
            "test",
            vec![
                MenuItem::action("Reboot", ActionKind::Reboot),
                MenuItem::action("Execute script", ActionKind::ExecuteScript),
                MenuItem::action("Power off", ActionKind::PowerOff),
            ],
        )
    }

    #[test]
    fn focus_clamps_at_both_ends() {
        let mut menu = three_items();
        menu.focus_previous();
        assert_eq!(menu.focused(), Some(0));

        for _ in 0..10 {
            menu.focus_next();
            let idx = menu.focused().unwrap();
            assert!(idx < menu.len());
        }
        assert_eq!(menu.focused(), Some(2));

        menu.focus_next();
        menu.focus_next();
        assert_eq!(menu.current_item().unwrap().label(), "Power off");
    }

    #[test]
    fn empty_menu_has_no_focus() {
        let mut menu = Menu::new("empty", Vec::new());
        menu.focus_next();
        menu.focus_previous();
        assert!(menu.is_empty());
        assert_eq!(menu.focused(), None);
        assert!(menu.current_item().is_none());
    }

    #[test]
    fn descend_and_ascend_restore_parent() {
        let mut stack = MenuStack::new(three_items());
        stack.active_mut().focus_next();

        stack.descend(Menu::new("child", Vec::new()));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.active().title(), "child");

        let parent = stack.ascend().unwrap();
        assert_eq!(parent.title(), "test");
        assert_eq!(parent.focused(), Some(1));
        assert_eq!(stack.depth(), 0);

        assert!(stack.ascend().is_none());
        assert_eq!(stack.active().title(), "test");
    }

    #[test]
    fn replace_keeps_parents() {
        let mut stack = MenuStack::new(three_items());
        stack.descend(Menu::new("/", Vec::new()));
        stack.replace(Menu::new("/etc", Vec::new()));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.active().title(), "/etc");
        assert_eq!(stack.ascend().unwrap().title(), "test");
    }
}

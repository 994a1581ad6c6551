//! Fixed menus offered by the recovery screen

use crate::menu::{Menu, MenuItem};

/// Every action the fixed menus can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Reboot,
    ExecuteScript,
    PowerOff,
    RebootSystem,
    RebootRecovery,
    RebootBootloader,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Reboot => "Reboot",
            ActionKind::ExecuteScript => "Execute script",
            ActionKind::PowerOff => "Power off",
            ActionKind::RebootSystem => "Reboot to system",
            ActionKind::RebootRecovery => "Reboot to recovery",
            ActionKind::RebootBootloader => "Reboot to bootloader",
        }
    }

    /// Reboot target for the reboot-menu actions
    pub fn reboot_mode(&self) -> Option<RebootMode> {
        match self {
            ActionKind::RebootSystem => Some(RebootMode::System),
            ActionKind::RebootRecovery => Some(RebootMode::Recovery),
            ActionKind::RebootBootloader => Some(RebootMode::Bootloader),
            _ => None,
        }
    }
}

/// Where a reboot lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebootMode {
    System,
    Recovery,
    Bootloader,
}

const MAIN_ACTIONS: [ActionKind; 3] = [
    ActionKind::Reboot,
    ActionKind::ExecuteScript,
    ActionKind::PowerOff,
];

const REBOOT_ACTIONS: [ActionKind; 3] = [
    ActionKind::RebootSystem,
    ActionKind::RebootRecovery,
    ActionKind::RebootBootloader,
];

fn build(title: &str, actions: &[ActionKind]) -> Menu {
    let items = actions
        .iter()
        .map(|&action| MenuItem::action(action.label(), action))
        .collect();
    Menu::new(title, items)
}

pub fn main_menu() -> Menu {
    build("Recovery", &MAIN_ACTIONS)
}

pub fn reboot_menu() -> Menu {
    build("Reboot", &REBOOT_ACTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::ItemKind;

    #[test]
    fn main_menu_order() {
        let menu = main_menu();
        let labels: Vec<_> = menu.items().iter().map(|i| i.label()).collect();
        assert_eq!(labels, ["Reboot", "Execute script", "Power off"]);
        assert_eq!(menu.focused(), Some(0));
    }

    #[test]
    fn reboot_menu_carries_modes() {
        let modes: Vec<_> = reboot_menu()
            .items()
            .iter()
            .map(|item| match item.kind() {
                ItemKind::Action(action) => action.reboot_mode(),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            [
                Some(RebootMode::System),
                Some(RebootMode::Recovery),
                Some(RebootMode::Bootloader)
            ]
        );
    }
}

//! Navigation state machine
//!
//! Receives one discrete key at a time and either moves through the menus
//! or queues an action for the [`Executor`]. Queued work is run separately
//! by [`Navigator::run_pending`] so the UI can draw the progress message
//! ("Unmounting partitions", "Running script...") before blocking on it.

use std::path::{Path, PathBuf};

use crate::catalog::{self, ActionKind};
use crate::executor::Executor;
use crate::lister::{self, ListOptions};
use crate::menu::{ItemKind, Menu, MenuStack};
use crate::tick::TickClock;

/// Keys understood by the menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Back,
}

/// Where the user currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    RebootMenu,
    FileBrowse(PathBuf),
    ScriptConfirm(PathBuf),
    /// A reboot or power off has been issued; input is ignored until a
    /// failure notice returns to the main menu
    Halting(ActionKind),
}

/// What happens when a timed notice runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Dismiss,
    ReturnToMain,
}

/// Message box drawn over the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// Tick at which the notice goes away; `None` stays until replaced
    pub expires_at_ms: Option<u64>,
    pub on_expire: Expiry,
}

impl Notice {
    fn sticky(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expires_at_ms: None,
            on_expire: Expiry::Dismiss,
        }
    }

    fn timed(message: impl Into<String>, expires_at_ms: u64, on_expire: Expiry) -> Self {
        Self {
            message: message.into(),
            expires_at_ms: Some(expires_at_ms),
            on_expire,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Unmount(ActionKind),
    Halt(ActionKind),
    RunScript(PathBuf),
}

/// Navigator settings, taken from the config
#[derive(Debug, Clone)]
pub struct NavOptions {
    pub browse_root: PathBuf,
    pub list: ListOptions,
    /// Skip the unmount step before reboot/power off
    pub skip_unmount: bool,
    pub result_display_ms: u64,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            browse_root: PathBuf::from("/"),
            list: ListOptions::default(),
            skip_unmount: false,
            result_display_ms: 2000,
        }
    }
}

/// All mutable navigation state: the menus and the directory being browsed
#[derive(Debug, Clone)]
pub struct NavigationContext {
    pub menus: MenuStack,
    pub browse_path: Option<PathBuf>,
}

pub struct Navigator {
    options: NavOptions,
    context: NavigationContext,
    reboot_menu: Menu,
    screen: Screen,
    notice: Option<Notice>,
    pending: Option<Pending>,
}

impl Navigator {
    pub fn new(options: NavOptions) -> Self {
        Self {
            options,
            context: NavigationContext {
                menus: MenuStack::new(catalog::main_menu()),
                browse_path: None,
            },
            reboot_menu: catalog::reboot_menu(),
            screen: Screen::MainMenu,
            notice: None,
            pending: None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn menu(&self) -> &Menu {
        self.context.menus.active()
    }

    pub fn context(&self) -> &NavigationContext {
        &self.context
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Feed one key
    pub fn handle_key(&mut self, key: Key, now_ms: u64) {
        if self.pending.is_some() || matches!(self.screen, Screen::Halting(_)) {
            return;
        }
        if self.notice.as_ref().is_some_and(|n| n.expires_at_ms.is_some()) {
            tracing::debug!("Ignoring {:?} while a timed notice is shown", key);
            return;
        }

        match key {
            Key::Up => self.move_focus(Key::Up),
            Key::Down => self.move_focus(Key::Down),
            Key::Enter => self.enter(now_ms),
            Key::Back => self.back(),
        }
    }

    /// Advance timers; call on every loop iteration
    pub fn tick(&mut self, now_ms: u64) {
        let Some(notice) = &self.notice else {
            return;
        };
        let Some(expires_at) = notice.expires_at_ms else {
            return;
        };
        if now_ms < expires_at {
            return;
        }

        let on_expire = notice.on_expire;
        self.notice = None;
        if on_expire == Expiry::ReturnToMain {
            self.return_to_main();
        }
    }

    /// Run the queued action, if any. May block on the executor.
    ///
    /// Result notices are timed from `clock` after the action returns.
    pub fn run_pending<E: Executor + ?Sized>(&mut self, exec: &mut E, clock: &TickClock) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending {
            Pending::Unmount(action) => {
                exec.unmount_all();
                self.queue_halt(action);
            }
            Pending::Halt(action) => {
                let result = match action.reboot_mode() {
                    Some(mode) => exec.reboot(mode),
                    None => exec.power_off(),
                };
                if result.ok {
                    tracing::info!("{} issued", action.label());
                } else {
                    tracing::error!(
                        "{} failed with exit code {:?}",
                        action.label(),
                        result.exit_code
                    );
                    self.notice = Some(Notice::timed(
                        format!("{} failed", action.label()),
                        clock.now_ms() + self.options.result_display_ms,
                        Expiry::ReturnToMain,
                    ));
                }
            }
            Pending::RunScript(path) => {
                let result = exec.run_script(&path);
                tracing::info!(
                    "Script {} finished: ok={} code={:?}",
                    path.display(),
                    result.ok,
                    result.exit_code
                );
                let message = if result.ok { "Successful" } else { "Error" };
                self.notice = Some(Notice::timed(
                    message,
                    clock.now_ms() + self.options.result_display_ms,
                    Expiry::ReturnToMain,
                ));
            }
        }
    }

    fn move_focus(&mut self, key: Key) {
        if matches!(self.screen, Screen::ScriptConfirm(_)) {
            return;
        }
        let menu = self.context.menus.active_mut();
        match key {
            Key::Up => menu.focus_previous(),
            _ => menu.focus_next(),
        }
    }

    fn enter(&mut self, now_ms: u64) {
        if let Screen::ScriptConfirm(path) = &self.screen {
            let path = path.clone();
            self.notice = Some(Notice::sticky("Running script..."));
            self.pending = Some(Pending::RunScript(path));
            return;
        }

        let Some(item) = self.menu().current_item().cloned() else {
            return;
        };
        tracing::debug!("Enter on {:?} in {:?}", item.label(), self.screen);

        match (item.kind(), item.path()) {
            (ItemKind::Action(ActionKind::Reboot), _) => {
                let mut menu = self.reboot_menu.clone();
                menu.reset_focus();
                self.context.menus.descend(menu);
                self.screen = Screen::RebootMenu;
            }
            (ItemKind::Action(ActionKind::ExecuteScript), _) => {
                let root = self.options.browse_root.clone();
                if let Some(menu) = self.open_directory(&root, now_ms) {
                    self.context.menus.descend(menu);
                    self.context.browse_path = Some(root.clone());
                    self.screen = Screen::FileBrowse(root);
                }
            }
            (ItemKind::Action(action), _) => self.start_halt(action),
            (ItemKind::Directory, Some(path)) => {
                if let Some(menu) = self.open_directory(path, now_ms) {
                    self.context.menus.replace(menu);
                    self.context.browse_path = Some(path.to_path_buf());
                    self.screen = Screen::FileBrowse(path.to_path_buf());
                }
            }
            (ItemKind::ScriptFile, Some(path)) => {
                self.notice = Some(Notice::sticky(format!(
                    "Run {}?\n[Enter] confirm  [Esc] cancel",
                    item.label()
                )));
                self.screen = Screen::ScriptConfirm(path.to_path_buf());
            }
            (_, None) => tracing::warn!("Item {:?} has no path", item.label()),
        }
    }

    fn back(&mut self) {
        match self.screen {
            Screen::MainMenu | Screen::Halting(_) => {}
            Screen::RebootMenu | Screen::FileBrowse(_) | Screen::ScriptConfirm(_) => {
                self.return_to_main()
            }
        }
    }

    fn open_directory(&mut self, path: &Path, now_ms: u64) -> Option<Menu> {
        match lister::list(path, self.options.list) {
            Ok(menu) => Some(menu),
            Err(e) => {
                tracing::warn!("{}", e);
                self.notice = Some(Notice::timed(
                    format!("Cannot open {}", path.display()),
                    now_ms + self.options.result_display_ms,
                    Expiry::Dismiss,
                ));
                None
            }
        }
    }

    fn start_halt(&mut self, action: ActionKind) {
        self.screen = Screen::Halting(action);
        if self.options.skip_unmount {
            tracing::info!("Skipping unmount before {}", action.label());
            self.queue_halt(action);
        } else {
            self.notice = Some(Notice::sticky("Unmounting partitions"));
            self.pending = Some(Pending::Unmount(action));
        }
    }

    fn queue_halt(&mut self, action: ActionKind) {
        let message = match action {
            ActionKind::PowerOff => "Power off",
            _ => "Rebooting",
        };
        self.notice = Some(Notice::sticky(message));
        self.pending = Some(Pending::Halt(action));
    }

    fn return_to_main(&mut self) {
        while self.context.menus.ascend().is_some() {}
        self.context.menus.active_mut().reset_focus();
        self.context.browse_path = None;
        self.screen = Screen::MainMenu;
        self.notice = None;
    }
}

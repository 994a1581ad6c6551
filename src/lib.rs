//! raven-recovery - RavenLinux Recovery Menu
//!
//! Keypad-driven recovery screen: reboot into system, recovery or
//! bootloader, power off, and run `.sh` scripts picked from the
//! filesystem, with a battery indicator in the corner.

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod input;
pub mod lister;
pub mod logging;
pub mod menu;
pub mod nav;
pub mod partitions;
pub mod status;
pub mod tick;
pub mod ui;

pub use error::{RecoveryError, Result};

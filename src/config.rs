//! Configuration structures for the recovery menu

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RecoveryError, Result};
use crate::lister::ListOptions;

/// Locations searched when no `--config` is given
pub const CONFIG_PATHS: [&str; 2] = ["/etc/raven/recovery.toml", "/etc/recovery.toml"];

/// Main recovery configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoveryConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub commands: CommandConfig,

    #[serde(default)]
    pub status: StatusConfig,

    #[serde(default)]
    pub partitions: PartitionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory opened by "Execute script"
    #[serde(default = "default_browse_root")]
    pub browse_root: PathBuf,

    /// Sort directory listings by name
    #[serde(default)]
    pub sort_entries: bool,

    /// Show a `..` row in directory listings
    #[serde(default)]
    pub show_parent_entry: bool,

    /// Never touch partitions (for development hosts)
    #[serde(default)]
    pub skip_unmount: bool,

    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory receiving the log file
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            browse_root: default_browse_root(),
            sort_entries: false,
            show_parent_entry: false,
            skip_unmount: false,
            log_level: default_log_level(),
            log_dir: default_log_dir(),
        }
    }
}

impl GeneralConfig {
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            sort: self.sort_entries,
            show_parent: self.show_parent_entry,
        }
    }
}

/// Timing, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,

    /// How long a script result stays on screen
    #[serde(default = "default_result_display_ms")]
    pub result_display_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            status_interval_ms: default_status_interval_ms(),
            result_display_ms: default_result_display_ms(),
        }
    }
}

/// Shell command lines for the destructive actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_reboot_system")]
    pub reboot_system: String,

    #[serde(default = "default_reboot_recovery")]
    pub reboot_recovery: String,

    #[serde(default = "default_reboot_bootloader")]
    pub reboot_bootloader: String,

    #[serde(default = "default_power_off")]
    pub power_off: String,

    /// Interpreter used to run `.sh` files
    #[serde(default = "default_script_shell")]
    pub script_shell: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            reboot_system: default_reboot_system(),
            reboot_recovery: default_reboot_recovery(),
            reboot_bootloader: default_reboot_bootloader(),
            power_off: default_power_off(),
            script_shell: default_script_shell(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Sysfs file holding the battery percentage
    #[serde(default = "default_status_path")]
    pub path: PathBuf,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            path: default_status_path(),
        }
    }
}

/// Raw device attach/detach and the partitions mounted on top of it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    #[serde(default = "default_attach")]
    pub attach: String,

    #[serde(default = "default_detach")]
    pub detach: String,

    #[serde(default = "default_partitions")]
    pub entries: Vec<MountConfig>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            attach: default_attach(),
            detach: default_detach(),
            entries: default_partitions(),
        }
    }
}

/// Mount point configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountConfig {
    /// Volume to mount, e.g. `ubi0:system`
    pub source: String,

    /// Mount point path
    pub target: PathBuf,

    #[serde(default = "default_fstype")]
    pub fstype: String,
}

fn default_browse_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

fn default_tick_ms() -> u64 {
    5
}

fn default_status_interval_ms() -> u64 {
    2000
}

fn default_result_display_ms() -> u64 {
    2000
}

fn default_reboot_system() -> String {
    "reboot".to_string()
}

fn default_reboot_recovery() -> String {
    "reboot-mode recovery".to_string()
}

fn default_reboot_bootloader() -> String {
    "reboot-mode bootloader".to_string()
}

fn default_power_off() -> String {
    "poweroff".to_string()
}

fn default_script_shell() -> String {
    "/bin/sh".to_string()
}

fn default_status_path() -> PathBuf {
    PathBuf::from("/sys/class/power_supply/battery/capacity")
}

fn default_attach() -> String {
    "ubiattach /dev/ubi_ctrl -m 3".to_string()
}

fn default_detach() -> String {
    "ubidetach -m 3".to_string()
}

fn default_fstype() -> String {
    "ubifs".to_string()
}

fn default_partitions() -> Vec<MountConfig> {
    [
        ("ubi0:system", "/system"),
        ("ubi0:userdata", "/data"),
        ("ubi0:cache", "/cache"),
        ("ubi0:boot", "/boot"),
        ("ubi0:recovery", "/recovery"),
    ]
    .into_iter()
    .map(|(source, target)| MountConfig {
        source: source.to_string(),
        target: PathBuf::from(target),
        fstype: default_fstype(),
    })
    .collect()
}

impl RecoveryConfig {
    /// Parse a configuration from a TOML string
    pub fn from_toml(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| RecoveryError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from an explicit file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RecoveryError::io(path, e))?;
        Self::from_toml(path, &content)
    }

    /// First existing file among [`CONFIG_PATHS`]
    pub fn locate() -> Option<PathBuf> {
        Self::locate_in(CONFIG_PATHS.iter().map(Path::new))
    }

    pub fn locate_in<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Option<PathBuf> {
        candidates
            .into_iter()
            .find(|path| path.is_file())
            .map(Path::to_path_buf)
    }
}

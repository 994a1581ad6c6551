//! Mounting and unmounting the device partitions

use std::fs;
use std::process::Command;

use crate::config::{MountConfig, PartitionConfig};
use crate::executor::run_shell;

/// The raw flash device and the filesystems on top of it
pub struct Partitions {
    config: PartitionConfig,
}

impl Partitions {
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    pub fn entries(&self) -> &[MountConfig] {
        &self.config.entries
    }

    /// Attach the device and mount every partition.
    ///
    /// Returns how many partitions were mounted; failures are logged and
    /// the rest continue.
    pub fn mount_all(&self) -> usize {
        tracing::info!("Attaching partitions via `{}`", self.config.attach);
        if !run_shell(&self.config.attach).ok {
            tracing::warn!("Attach failed, trying to mount anyway");
        }

        let mut mounted = 0;
        for entry in &self.config.entries {
            match mount_partition(entry) {
                Ok(()) => mounted += 1,
                Err(e) => tracing::error!(
                    "Failed to mount {} on {}: {}",
                    entry.source,
                    entry.target.display(),
                    e
                ),
            }
        }

        tracing::info!("{} of {} partitions mounted", mounted, self.config.entries.len());
        mounted
    }

    /// Unmount in reverse order, then detach the device
    pub fn unmount_all(&self) {
        tracing::info!("Unmounting partitions...");
        for entry in self.config.entries.iter().rev() {
            match nix::mount::umount(entry.target.as_path()) {
                Ok(()) => tracing::debug!("Unmounted {}", entry.target.display()),
                Err(e) => tracing::warn!("Failed to unmount {}: {}", entry.target.display(), e),
            }
        }

        if !run_shell(&self.config.detach).ok {
            tracing::warn!("Detach `{}` failed", self.config.detach);
        }
    }
}

fn mount_partition(entry: &MountConfig) -> anyhow::Result<()> {
    fs::create_dir_all(&entry.target)?;

    let status = Command::new("mount")
        .arg("-t")
        .arg(&entry.fstype)
        .arg(&entry.source)
        .arg(&entry.target)
        .status()?;

    if !status.success() {
        anyhow::bail!("mount exited with {}", status);
    }

    tracing::debug!("Mounted {} on {}", entry.source, entry.target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::path::PathBuf;

    #[test]
    fn mount_failures_do_not_abort() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("nested/system");
        let partitions = Partitions::new(PartitionConfig {
            attach: "exit 1".to_string(),
            detach: "true".to_string(),
            entries: vec![MountConfig {
                source: "ubi9:missing".to_string(),
                target: target.clone(),
                fstype: "no-such-fs".to_string(),
            }],
        });

        assert_eq!(partitions.mount_all(), 0);
        assert!(target.is_dir(), "mount point is created even when mount fails");
        Ok(())
    }

    #[test]
    fn unmount_runs_detach_after_failures() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let marker = dir.path().join("detached");
        let partitions = Partitions::new(PartitionConfig {
            attach: "true".to_string(),
            detach: format!("touch {}", marker.display()),
            entries: vec![MountConfig {
                source: "ubi0:cache".to_string(),
                target: PathBuf::from("/definitely/not/mounted"),
                fstype: "ubifs".to_string(),
            }],
        });

        partitions.unmount_all();
        assert!(marker.exists());
        Ok(())
    }
}

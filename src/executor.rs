//! Side-effecting actions: reboot, power off, running scripts

use std::path::Path;
use std::process::{Command, Stdio};

use crate::catalog::RebootMode;
use crate::config::CommandConfig;
use crate::error::RecoveryError;
use crate::partitions::Partitions;

/// Outcome of an external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    pub ok: bool,
    /// `None` when the command could not start or was killed by a signal
    pub exit_code: Option<i32>,
}

impl ExecResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            exit_code: Some(0),
        }
    }

    pub fn failure(exit_code: Option<i32>) -> Self {
        Self {
            ok: false,
            exit_code,
        }
    }
}

/// Operating system primitives the navigator drives
pub trait Executor {
    /// Unmount every managed partition and detach the backing device
    fn unmount_all(&mut self);

    fn reboot(&mut self, mode: RebootMode) -> ExecResult;

    fn power_off(&mut self) -> ExecResult;

    fn run_script(&mut self, path: &Path) -> ExecResult;
}

/// Executor backed by real shell commands
pub struct SystemExecutor {
    commands: CommandConfig,
    partitions: Partitions,
}

impl SystemExecutor {
    pub fn new(commands: CommandConfig, partitions: Partitions) -> Self {
        Self {
            commands,
            partitions,
        }
    }

    fn reboot_command(&self, mode: RebootMode) -> &str {
        match mode {
            RebootMode::System => &self.commands.reboot_system,
            RebootMode::Recovery => &self.commands.reboot_recovery,
            RebootMode::Bootloader => &self.commands.reboot_bootloader,
        }
    }
}

impl Executor for SystemExecutor {
    fn unmount_all(&mut self) {
        self.partitions.unmount_all();
    }

    fn reboot(&mut self, mode: RebootMode) -> ExecResult {
        sync_filesystems();
        let command = self.reboot_command(mode).to_string();
        tracing::info!("Rebooting ({:?}) via `{}`", mode, command);
        run_shell(&command)
    }

    fn power_off(&mut self) -> ExecResult {
        sync_filesystems();
        tracing::info!("Powering off via `{}`", self.commands.power_off);
        run_shell(&self.commands.power_off)
    }

    fn run_script(&mut self, path: &Path) -> ExecResult {
        tracing::info!("Running script {}", path.display());
        let mut cmd = Command::new(&self.commands.script_shell);
        cmd.arg(path);
        if let Some(dir) = path.parent() {
            cmd.current_dir(dir);
        }
        let command_line = format!("{} {}", self.commands.script_shell, path.display());
        run(&command_line, &mut cmd)
    }
}

fn sync_filesystems() {
    tracing::debug!("Syncing filesystems...");
    nix::unistd::sync();
}

/// Run a configured command line through `sh -c`
pub fn run_shell(command: &str) -> ExecResult {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    run(command, &mut cmd)
}

// The terminal belongs to the UI, so children never inherit stdio.
fn run(command_line: &str, cmd: &mut Command) -> ExecResult {
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    let output = match output {
        Ok(output) => output,
        Err(source) => {
            let err = RecoveryError::Spawn {
                command: command_line.to_string(),
                source,
            };
            tracing::error!("{}", err);
            return ExecResult::failure(None);
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        tracing::debug!(target: "raven_recovery::child", "{}", line);
    }

    if output.status.success() {
        tracing::debug!("`{}` succeeded", command_line);
        return ExecResult::success();
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let err = RecoveryError::Exec {
        command: command_line.to_string(),
        code: output.status.code(),
    };
    tracing::warn!("{}: {}", err, stderr.trim());
    ExecResult::failure(output.status.code())
}

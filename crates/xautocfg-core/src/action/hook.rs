// Xautocfg Hook Runner
// Runs user hook commands through the shell and waits for them

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use super::{HookError, HookRunner};
use crate::event::DeviceId;

/// Environment variable carrying the triggering device id
pub const DEVICE_ID_ENV: &str = "XINPUTID";

const DEFAULT_SHELL: &str = "/bin/sh";

/// Runs hooks as `<shell> -c <command>`.
///
/// The child inherits stdin/stdout/stderr and the environment, plus
/// `XINPUTID`. There is no timeout.
#[derive(Debug, Clone)]
pub struct ShellHookRunner {
    shell: PathBuf,
}

impl ShellHookRunner {
    pub fn new() -> Self {
        Self::with_shell(DEFAULT_SHELL)
    }

    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    fn command(&self, command: &str, device_id: DeviceId) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .env(DEVICE_ID_ENV, device_id.to_string());
        cmd
    }
}

impl Default for ShellHookRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRunner for ShellHookRunner {
    fn run_hook(&self, command: &str, device_id: DeviceId) -> Result<ExitStatus, HookError> {
        let mut child = self
            .command(command, device_id)
            .spawn()
            .map_err(|source| HookError::Spawn {
                command: command.to_string(),
                source,
            })?;

        child.wait().map_err(|source| HookError::Wait {
            command: command.to_string(),
            source,
        })
    }
}

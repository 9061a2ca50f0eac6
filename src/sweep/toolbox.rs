use std::process::{Command, Stdio};

use super::target::ToolCommand;
use crate::privilege::is_root;

/// How an external cleaner invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Success,
    /// Exited non-zero, or was killed by a signal (`None`).
    Failed(Option<i32>),
    /// Could not be spawned at all.
    Missing,
}

impl ToolStatus {
    pub fn is_success(self) -> bool {
        matches!(self, ToolStatus::Success)
    }
}

/// Access to third-party tools that ship their own cache cleaners.
pub trait Toolbox {
    /// Whether `program` can be found on this system.
    fn is_installed(&self, program: &str) -> bool;

    /// Run `command`, discarding its output. Never fails the caller.
    fn invoke(&self, command: &ToolCommand) -> ToolStatus;
}

/// [`Toolbox`] backed by `PATH` lookup and real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolbox {
    verbose: u8,
}

impl SystemToolbox {
    /// Tool output is passed through at verbosity 2 and above.
    pub fn new(verbose: u8) -> Self {
        Self { verbose }
    }

    fn command(&self, tool: &ToolCommand) -> Command {
        let mut command = if tool.elevated && !is_root() {
            let mut sudo = Command::new("sudo");
            sudo.arg("-n").arg(&tool.program);
            sudo
        } else {
            Command::new(&tool.program)
        };
        command.args(&tool.args).stdin(Stdio::null());

        if self.verbose < 2 {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        command
    }
}

impl Toolbox for SystemToolbox {
    fn is_installed(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn invoke(&self, tool: &ToolCommand) -> ToolStatus {
        match self.command(tool).status() {
            Ok(status) if status.success() => ToolStatus::Success,
            Ok(status) => ToolStatus::Failed(status.code()),
            Err(_) => ToolStatus::Missing,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_system_toolbox_reports_exit_status() {
        let toolbox = SystemToolbox::new(0);

        assert_eq!(
            toolbox.invoke(&ToolCommand::new("sh", &["-c", "exit 0"])),
            ToolStatus::Success
        );
        assert_eq!(
            toolbox.invoke(&ToolCommand::new("sh", &["-c", "exit 3"])),
            ToolStatus::Failed(Some(3))
        );
        assert_eq!(
            toolbox.invoke(&ToolCommand::new("mac-cleanup-no-such-tool", &[])),
            ToolStatus::Missing
        );
    }

    #[test]
    fn test_system_toolbox_detects_installed_tools() {
        let toolbox = SystemToolbox::new(0);
        assert!(toolbox.is_installed("sh"));
        assert!(!toolbox.is_installed("mac-cleanup-no-such-tool"));
    }
}

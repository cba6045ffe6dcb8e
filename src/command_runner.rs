//! Host command execution
//!
//! [`CommandRunner`] is the seam between provisioning steps and the OS. The
//! steps only ever see this trait, so tests substitute a recording fake and
//! `--dry-run` substitutes [`DryRunRunner`] without touching step logic.
//!
//! # Failure semantics
//!
//! - `Err` means the command could not be run at all (spawn or wait failed).
//! - `Ok` with `success == false` means it ran and exited non-zero.
//!
//! Deciding what a failure means for the run is the caller's job.

use crate::command_traits::HostCommand;
use crate::error::{ProvisionError, Result};
use crate::process_guard::{self, ChildSlot};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Output from a host command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output. Empty unless captured.
    pub stdout: String,
    /// Standard error. Empty unless captured.
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// Whether the command was skipped by a dry run.
    pub dry_run: bool,
}

impl CommandOutput {
    /// A successful run with the given stdout.
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code: Some(0),
            success: true,
            ..Self::default()
        }
    }

    /// A run that exited with `code`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stderr: stderr.into(),
            exit_code: Some(code),
            success: false,
            ..Self::default()
        }
    }

    /// Check if the command succeeded and return an error if not.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.success {
            return Ok(());
        }
        let code = self.exit_code.unwrap_or(-1);
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            Err(ProvisionError::command(format!(
                "{} failed (exit code {})",
                context, code
            )))
        } else {
            Err(ProvisionError::command(format!(
                "{} failed (exit code {}): {}",
                context, code, stderr
            )))
        }
    }
}

/// Capability to run host commands.
pub trait CommandRunner {
    /// Run a command with stdout/stderr inherited from this process.
    fn execute(&self, command: &dyn HostCommand) -> Result<CommandOutput>;

    /// Run a command and capture its stdout/stderr as text.
    fn execute_captured(&self, command: &dyn HostCommand) -> Result<CommandOutput>;
}

/// Runs commands on the local host.
///
/// Programs are spawned directly, never through a shell. Each child leads its
/// own process group and occupies [`ChildSlot::global`] until it is reaped.
/// stdin is closed; no timeout is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, command: &dyn HostCommand, capture: bool) -> Result<CommandOutput> {
        let command_line = command.command_line();
        info!(command = %command_line, capture, "executing host command");

        let slot = ChildSlot::global();
        if slot.is_closed() {
            return Err(ProvisionError::command(format!(
                "not starting `{}`: shutting down",
                command_line
            )));
        }

        let mut cmd = Command::new(command.program());
        cmd.args(command.to_cli_args()).stdin(Stdio::null());
        if capture {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let child = process_guard::spawn_isolated(&mut cmd).map_err(|e| {
            ProvisionError::command(format!("failed to spawn `{}`: {}", command_line, e))
        })?;
        let active = slot.track(child.id());
        let output = child.wait_with_output();
        drop(active);

        let output = output.map_err(|e| {
            ProvisionError::command(format!("failed waiting for `{}`: {}", command_line, e))
        })?;

        let exit_code = output.status.code();
        debug!(command = %command_line, ?exit_code, "host command finished");

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code,
            success: output.status.success(),
            dry_run: false,
        })
    }
}

impl CommandRunner for SystemRunner {
    fn execute(&self, command: &dyn HostCommand) -> Result<CommandOutput> {
        self.run(command, false)
    }

    fn execute_captured(&self, command: &dyn HostCommand) -> Result<CommandOutput> {
        self.run(command, true)
    }
}

/// Skips destructive commands and runs the rest through `inner`.
///
/// Non-destructive commands (the verification `curl`) still execute so the
/// preview reflects what the host currently serves.
#[derive(Debug, Default, Clone)]
pub struct DryRunRunner<R = SystemRunner> {
    inner: R,
}

impl<R: CommandRunner> DryRunRunner<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The runner that non-destructive commands go to.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn skip(&self, command: &dyn HostCommand) -> CommandOutput {
        let command_line = command.command_line();
        info!("[DRY RUN] Skipped: {}", command_line);
        CommandOutput {
            stdout: format!("[DRY RUN] Skipped: {}\n", command_line),
            exit_code: Some(0),
            success: true,
            dry_run: true,
            ..CommandOutput::default()
        }
    }
}

impl<R: CommandRunner> CommandRunner for DryRunRunner<R> {
    fn execute(&self, command: &dyn HostCommand) -> Result<CommandOutput> {
        if command.is_destructive() {
            return Ok(self.skip(command));
        }
        self.inner.execute(command)
    }

    fn execute_captured(&self, command: &dyn HostCommand) -> Result<CommandOutput> {
        if command.is_destructive() {
            return Ok(self.skip(command));
        }
        self.inner.execute_captured(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Arbitrary program + args, for exercising the real runner.
    struct Raw {
        program: &'static str,
        args: Vec<&'static str>,
        destructive: bool,
    }

    impl HostCommand for Raw {
        fn program(&self) -> &str {
            self.program
        }

        fn to_cli_args(&self) -> Vec<String> {
            self.args.iter().map(|a| a.to_string()).collect()
        }

        fn is_destructive(&self) -> bool {
            self.destructive
        }
    }

    fn raw(program: &'static str, args: &[&'static str]) -> Raw {
        Raw {
            program,
            args: args.to_vec(),
            destructive: true,
        }
    }

    #[test]
    fn test_execute_captured_returns_stdout() {
        let output = SystemRunner::new()
            .execute_captured(&raw("echo", &["hello", "host"]))
            .unwrap();
        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout.trim(), "hello host");
        assert!(!output.dry_run);
    }

    #[test]
    fn test_execute_reports_nonzero_exit() {
        let output = SystemRunner::new()
            .execute(&raw("sh", &["-c", "exit 3"]))
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let err = SystemRunner::new()
            .execute(&raw("webprovision-no-such-program", &[]))
            .unwrap_err();
        assert!(matches!(err, ProvisionError::Command(_)));
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[test]
    fn test_dry_run_skips_destructive_commands() {
        let runner = DryRunRunner::new(SystemRunner::new());
        let output = runner
            .execute(&raw("sh", &["-c", "exit 7"]))
            .unwrap();
        assert!(output.dry_run);
        assert!(output.success);
        assert!(output.stdout.contains("[DRY RUN] Skipped: sh -c exit 7"));
    }

    #[test]
    fn test_dry_run_executes_read_only_commands() {
        let runner = DryRunRunner::new(SystemRunner::new());
        let command = Raw {
            program: "echo",
            args: vec!["served"],
            destructive: false,
        };
        let output = runner.execute_captured(&command).unwrap();
        assert!(!output.dry_run);
        assert_eq!(output.stdout.trim(), "served");
    }

    #[test]
    fn test_ensure_success() {
        assert!(CommandOutput::succeeded("ok").ensure_success("install").is_ok());

        let err = CommandOutput::failed(1, "No package httpd available.")
            .ensure_success("yum install -y httpd")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("yum install -y httpd"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("No package httpd available."));
    }

    #[test]
    fn test_ensure_success_signal_termination() {
        let output = CommandOutput {
            exit_code: None,
            success: false,
            ..CommandOutput::default()
        };
        let err = output.ensure_success("systemctl start httpd").unwrap_err();
        assert!(err.to_string().contains("exit code -1"));
    }
}

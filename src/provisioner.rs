//! Provisioning pipeline
//!
//! Runs the steps of [`Step`] once, in order, against a [`CommandRunner`]
//! and a [`FileStore`]. Progress lines go to the console writer; diagnostics
//! go to `tracing`.
//!
//! # Failure Policy
//!
//! Under [`FailurePolicy::Permissive`] (the default) a command that cannot be
//! spawned or exits non-zero is logged, recorded in the [`RunReport`], and
//! the run continues with the next command. Under [`FailurePolicy::Strict`]
//! the first such failure ends the run with an error.
//!
//! File errors always end the run. The verification result never does.

use std::io::Write;
use std::path::Path;

use strum::IntoEnumIterator;
use tracing::{info, warn};

use crate::command_runner::CommandRunner;
use crate::command_traits::HostCommand;
use crate::commands::files::CopyArgs;
use crate::commands::http::CurlArgs;
use crate::commands::package::PackageInstallArgs;
use crate::commands::selinux::SetenforceArgs;
use crate::commands::service::SystemctlArgs;
use crate::config_file::ProvisionConfig;
use crate::error::{ProvisionError, Result};
use crate::file_store::FileStore;
use crate::logic::page::render_index_html;
use crate::logic::selinux::rewrite_config;
use crate::logic::verify::VerifyOutcome;
use crate::types::{FailurePolicy, ServiceAction, Step};

// ============================================================================
// Step Commands
// ============================================================================

fn firewall_commands(config: &ProvisionConfig) -> [SystemctlArgs; 2] {
    [
        SystemctlArgs::new(ServiceAction::Stop, &config.firewall_service),
        SystemctlArgs::new(ServiceAction::Disable, &config.firewall_service),
    ]
}

fn install_command(config: &ProvisionConfig) -> PackageInstallArgs {
    PackageInstallArgs {
        manager: config.package_manager,
        package: config.web_package.clone(),
    }
}

fn web_service_commands(config: &ProvisionConfig) -> [SystemctlArgs; 2] {
    [
        SystemctlArgs::new(ServiceAction::Start, &config.web_service),
        SystemctlArgs::new(ServiceAction::Enable, &config.web_service),
    ]
}

fn copy_command(config: &ProvisionConfig) -> CopyArgs {
    CopyArgs {
        source: config.image_source.clone(),
        destination: config.image_destination(),
    }
}

fn verify_command(config: &ProvisionConfig) -> CurlArgs {
    CurlArgs {
        url: config.verify_url.clone(),
    }
}

/// Journal form of a whole-file write.
pub fn write_action(path: &Path) -> String {
    format!("write {}", path.display())
}

// ============================================================================
// Plan
// ============================================================================

/// A step and the actions it will take, rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: Step,
    pub actions: Vec<String>,
}

/// Everything a run would do with `config`, without doing any of it.
pub fn plan(config: &ProvisionConfig) -> Vec<PlannedStep> {
    Step::iter()
        .map(|step| {
            let actions = match step {
                Step::DisableFirewall => firewall_commands(config)
                    .iter()
                    .map(|command| command.command_line())
                    .collect(),
                Step::DisableSelinux => vec![
                    SetenforceArgs::permissive().command_line(),
                    write_action(&config.selinux_config),
                ],
                Step::InstallWebServer => vec![install_command(config).command_line()],
                Step::StartWebServer => web_service_commands(config)
                    .iter()
                    .map(|command| command.command_line())
                    .collect(),
                Step::CopyImage => vec![copy_command(config).command_line()],
                Step::CreateIndexPage => vec![write_action(&config.page_path())],
                Step::VerifyWebsite => vec![verify_command(config).command_line()],
            };
            PlannedStep { step, actions }
        })
        .collect()
}

// ============================================================================
// Run Report
// ============================================================================

/// A command that failed under the permissive policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: String,
    pub reason: String,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Commands and file writes, in the order they were issued.
    pub actions: Vec<String>,
    /// Commands that failed and were skipped over.
    pub failures: Vec<CommandFailure>,
    /// Verification outcome, once the final step has run.
    pub verification: Option<VerifyOutcome>,
}

impl RunReport {
    /// No failed commands and the site served the expected content.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.verification == Some(VerifyOutcome::Accessible)
    }
}

// ============================================================================
// Provisioner
// ============================================================================

/// Drives the provisioning steps against a host.
pub struct Provisioner<'a, W: Write> {
    config: &'a ProvisionConfig,
    runner: &'a dyn CommandRunner,
    files: &'a dyn FileStore,
    console: W,
    policy: FailurePolicy,
    report: RunReport,
}

impl<'a, W: Write> Provisioner<'a, W> {
    /// The failure policy comes from `config.strict`.
    pub fn new(
        config: &'a ProvisionConfig,
        runner: &'a dyn CommandRunner,
        files: &'a dyn FileStore,
        console: W,
    ) -> Self {
        Self {
            config,
            runner,
            files,
            console,
            policy: config.failure_policy(),
            report: RunReport::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Run every step in order and return the report.
    pub fn run(mut self) -> Result<RunReport> {
        info!(policy = %self.policy, "starting provisioning run");
        for step in Step::iter() {
            self.run_step(step)?;
        }
        info!(
            failures = self.report.failures.len(),
            "provisioning run finished"
        );
        Ok(self.report)
    }

    /// Run a single step.
    pub fn run_step(&mut self, step: Step) -> Result<()> {
        info!(step = %step, "running step");
        match step {
            Step::DisableFirewall => self.disable_firewall(),
            Step::DisableSelinux => self.disable_selinux(),
            Step::InstallWebServer => self.install_web_server(),
            Step::StartWebServer => self.start_and_enable_web_server(),
            Step::CopyImage => self.copy_image(),
            Step::CreateIndexPage => self.create_index_html(),
            Step::VerifyWebsite => self.verify_website().map(|_| ()),
        }
    }

    pub fn disable_firewall(&mut self) -> Result<()> {
        let config = self.config;
        let service = &config.firewall_service;
        writeln!(self.console, "Disabling {}...", service)?;
        for command in firewall_commands(config) {
            self.run_command(&command)?;
        }
        writeln!(self.console, "{} stopped and disabled.", service)?;
        Ok(())
    }

    /// Permissive now via `setenforce 0`, disabled after reboot via the config file.
    pub fn disable_selinux(&mut self) -> Result<()> {
        let config = self.config;
        writeln!(self.console, "Disabling SELinux (temporary and permanent)...")?;
        self.run_command(&SetenforceArgs::permissive())?;

        let path = &config.selinux_config;
        let current = self.files.read_to_string(path)?;
        let rewrite = rewrite_config(
            &current,
            &config.selinux_key,
            &config.selinux_value,
        );
        if rewrite.replaced == 0 {
            warn!(
                "No {}= line found in {}",
                config.selinux_key,
                path.display()
            );
        }
        self.write_file(path, &rewrite.content)?;

        writeln!(
            self.console,
            "SELinux set to permissive now and disabled permanently."
        )?;
        Ok(())
    }

    pub fn install_web_server(&mut self) -> Result<()> {
        let config = self.config;
        let package = &config.web_package;
        writeln!(self.console, "Installing {}...", package)?;
        self.run_command(&install_command(config))?;
        writeln!(self.console, "{} installed.", package)?;
        Ok(())
    }

    pub fn start_and_enable_web_server(&mut self) -> Result<()> {
        let config = self.config;
        let service = &config.web_service;
        writeln!(self.console, "Starting and enabling {} service...", service)?;
        for command in web_service_commands(config) {
            self.run_command(&command)?;
        }
        writeln!(self.console, "{} service started and enabled.", service)?;
        Ok(())
    }

    pub fn copy_image(&mut self) -> Result<()> {
        let config = self.config;
        self.run_command(&copy_command(config))?;
        writeln!(self.console, "Image copied to web directory.")?;
        Ok(())
    }

    pub fn create_index_html(&mut self) -> Result<()> {
        let config = self.config;
        let html = render_index_html(&config.page_heading, &config.image_name);
        self.write_file(&config.page_path(), &html)?;
        writeln!(
            self.console,
            "{} created with centered content and image.",
            config.page_name
        )?;
        Ok(())
    }

    /// Fetch the site and check the body. Never fails on a mismatch.
    pub fn verify_website(&mut self) -> Result<VerifyOutcome> {
        let config = self.config;
        writeln!(self.console, "Verifying website accessibility...")?;

        let command = verify_command(config);
        let command_line = command.command_line();
        self.report.actions.push(command_line.clone());

        let body = match self.runner.execute_captured(&command) {
            Ok(output) => {
                if !output.success {
                    warn!(command = %command_line, exit_code = ?output.exit_code, "verification request failed");
                }
                output.stdout
            }
            Err(e) => {
                warn!(command = %command_line, "{}", e);
                String::new()
            }
        };

        let outcome = VerifyOutcome::from_body(&body, &config.expected_content);
        info!(accessible = outcome.is_accessible(), "verification finished");
        writeln!(self.console, "{}", outcome)?;

        self.report.verification = Some(outcome);
        Ok(outcome)
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.report.actions.push(write_action(path));
        self.files.write(path, contents)
    }

    fn run_command(&mut self, command: &dyn HostCommand) -> Result<()> {
        let command_line = command.command_line();
        self.report.actions.push(command_line.clone());

        let error = match self.runner.execute(command) {
            Ok(output) => match output.ensure_success(&command_line) {
                Ok(()) => return Ok(()),
                Err(e) => e,
            },
            Err(e) => e,
        };
        self.command_failed(command_line, error)
    }

    fn command_failed(&mut self, command_line: String, error: ProvisionError) -> Result<()> {
        match self.policy {
            FailurePolicy::Strict => Err(error),
            FailurePolicy::Permissive => {
                warn!(command = %command_line, "{}; continuing", error);
                self.report.failures.push(CommandFailure {
                    command: command_line,
                    reason: error.to_string(),
                });
                Ok(())
            }
        }
    }
}

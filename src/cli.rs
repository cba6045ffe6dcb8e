use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// webprovision - provision the intranet web host
#[derive(Parser, Debug)]
#[command(name = "webprovision")]
#[command(about = "Disable firewalld and SELinux, install httpd, deploy the landing page and verify it")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: show what would be executed without making changes.
    ///
    /// Commands that change the host and file writes are skipped and
    /// logged. The verification request still runs.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to a JSON configuration file (defaults are used without one)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Stop at the first failed command instead of continuing
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Provision the host (the default when no command is given)
    Run,
    /// Print every command and file write, step by step, without running them
    Plan,
    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(value_name = "CONFIG")]
        file: PathBuf,
    },
    /// Print the effective configuration as JSON
    ShowConfig,
    /// Print the generated landing page to stdout
    RenderPage,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

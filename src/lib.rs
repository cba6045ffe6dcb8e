//! webprovision library
//!
//! Provisions an intranet web host: disables firewalld and SELinux, installs
//! and enables httpd, deploys a page and an image, then checks the site.

pub mod cli;
pub mod command_runner;
pub mod command_traits;
pub mod commands;
pub mod config_file;
pub mod error;
pub mod file_store;
pub mod logic;
pub mod process_guard;
pub mod provisioner;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

// Re-export main types for convenience
pub use command_runner::{CommandOutput, CommandRunner, DryRunRunner, SystemRunner};
pub use command_traits::HostCommand;
pub use config_file::ProvisionConfig;
pub use error::ProvisionError;
pub use file_store::{DryRunFiles, FileStore, LocalFiles};
pub use logic::verify::VerifyOutcome;
pub use process_guard::ChildSlot;
pub use provisioner::{PlannedStep, Provisioner, RunReport, plan};
pub use types::{FailurePolicy, PackageManager, ServiceAction, Step};

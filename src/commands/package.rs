//! Typed arguments for the OS package manager.

use crate::command_traits::HostCommand;
use crate::types::PackageManager;

/// `<yum|dnf> install -y <package>`
///
/// `-y` keeps the install non-interactive; stdin is closed anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInstallArgs {
    pub manager: PackageManager,
    pub package: String,
}

impl HostCommand for PackageInstallArgs {
    fn program(&self) -> &str {
        self.manager.program()
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["install".to_string(), "-y".to_string(), self.package.clone()]
    }
}

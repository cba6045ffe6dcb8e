//! Typed arguments for SELinux runtime control.

use crate::command_traits::HostCommand;

/// `setenforce <mode>`
///
/// Mode `0` switches the running kernel to permissive, `1` to enforcing.
/// The persisted mode in `/etc/selinux/config` is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetenforceArgs {
    pub enforcing: bool,
}

impl SetenforceArgs {
    pub fn permissive() -> Self {
        Self { enforcing: false }
    }
}

impl HostCommand for SetenforceArgs {
    fn program(&self) -> &str {
        "setenforce"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mode = if self.enforcing { "1" } else { "0" };
        vec![mode.to_string()]
    }
}

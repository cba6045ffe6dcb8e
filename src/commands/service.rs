//! Typed arguments for `systemctl`.

use crate::command_traits::HostCommand;
use crate::types::ServiceAction;

/// `systemctl <action> <unit>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemctlArgs {
    pub action: ServiceAction,
    pub unit: String,
}

impl SystemctlArgs {
    pub fn new(action: ServiceAction, unit: impl Into<String>) -> Self {
        Self {
            action,
            unit: unit.into(),
        }
    }
}

impl HostCommand for SystemctlArgs {
    fn program(&self) -> &str {
        "systemctl"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![self.action.as_str().to_string(), self.unit.clone()]
    }
}

//! Typed arguments for file copies.

use std::path::PathBuf;

use crate::command_traits::HostCommand;

/// `cp <source> <destination>`
///
/// The source is not checked beforehand; a missing file surfaces as a
/// non-zero exit from `cp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyArgs {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl HostCommand for CopyArgs {
    fn program(&self) -> &str {
        "cp"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            self.source.display().to_string(),
            self.destination.display().to_string(),
        ]
    }
}

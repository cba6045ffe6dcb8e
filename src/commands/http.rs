//! Typed arguments for the HTTP client.

use crate::command_traits::HostCommand;

/// `curl -s <url>`
///
/// Silent mode: the body goes to stdout, no progress meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlArgs {
    pub url: String,
}

impl HostCommand for CurlArgs {
    fn program(&self) -> &str {
        "curl"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["-s".to_string(), self.url.clone()]
    }

    /// A GET changes nothing on the host.
    fn is_destructive(&self) -> bool {
        false
    }
}

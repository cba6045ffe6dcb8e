//! Type-safe host command contracts.
//!
//! Every command the provisioner issues (`systemctl`, `setenforce`, `yum`,
//! `cp`, `curl`) is described by a struct implementing [`HostCommand`]
//! instead of a hand-assembled shell string. The struct definition is the
//! contract: the program name and argument order live in exactly one place.

/// Trait for typed host commands.
///
/// # Contract
///
/// - `program()`: the executable, resolved through `PATH` at execution time.
/// - `to_cli_args()`: arguments exactly as the program expects them.
/// - `is_destructive()`: whether running the command changes host state.
///   Dry runs skip destructive commands and still execute the rest.
///
/// # Example
///
/// ```
/// use webprovision::command_traits::HostCommand;
/// use webprovision::commands::service::SystemctlArgs;
/// use webprovision::types::ServiceAction;
///
/// let args = SystemctlArgs::new(ServiceAction::Stop, "firewalld");
/// assert_eq!(args.command_line(), "systemctl stop firewalld");
/// ```
pub trait HostCommand {
    /// Executable name (e.g. `systemctl`).
    fn program(&self) -> &str;

    /// Convert struct fields to CLI arguments.
    fn to_cli_args(&self) -> Vec<String>;

    /// Whether the command modifies the host.
    fn is_destructive(&self) -> bool {
        true
    }

    /// Human-readable rendering, `program arg arg`.
    ///
    /// This is the form used in logs, plans and recorded test journals.
    /// It is never handed to a shell.
    fn command_line(&self) -> String {
        let mut line = self.program().to_string();
        for arg in self.to_cli_args() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

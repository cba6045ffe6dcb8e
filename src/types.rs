//! Type-safe configuration types for webprovision
//!
//! Stringly-typed choices (package manager, service verbs, pipeline steps)
//! are modelled as enums so they can be matched exhaustively.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// OS package manager used to install the web server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Yum,
    Dnf,
}

impl PackageManager {
    /// Executable name of the package manager
    pub fn program(self) -> &'static str {
        self.into()
    }
}

/// systemd verb applied to a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ServiceAction {
    Start,
    Stop,
    Enable,
    Disable,
}

impl ServiceAction {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// One stage of the provisioning pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Step {
    DisableFirewall,
    DisableSelinux,
    InstallWebServer,
    StartWebServer,
    CopyImage,
    CreateIndexPage,
    VerifyWebsite,
}

/// What to do when a host command exits unsuccessfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and carry on with the next command
    #[default]
    Permissive,
    /// Stop the run at the first failed command
    Strict,
}

impl From<bool> for FailurePolicy {
    fn from(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Permissive }
    }
}

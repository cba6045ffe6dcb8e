//! Provisioning configuration that can be saved/loaded.
//!
//! Every field defaults to the value the tool has always used, so running
//! without a config file provisions the stock intranet host. A JSON file only
//! needs to name the fields it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};
use crate::types::{FailurePolicy, PackageManager};

/// Provisioning configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    // Firewall
    pub firewall_service: String,

    // SELinux
    pub selinux_config: PathBuf,
    pub selinux_key: String,
    pub selinux_value: String,

    // Web server
    pub package_manager: PackageManager,
    pub web_package: String,
    pub web_service: String,
    pub document_root: PathBuf,

    // Content
    pub image_source: PathBuf,
    pub image_name: String,
    pub page_name: String,
    pub page_heading: String,

    // Verification
    pub verify_url: String,
    pub expected_content: String,

    /// Abort on the first failed command instead of carrying on
    pub strict: bool,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            firewall_service: "firewalld".to_string(),
            selinux_config: PathBuf::from("/etc/selinux/config"),
            selinux_key: "SELINUX".to_string(),
            selinux_value: "disabled".to_string(),
            package_manager: PackageManager::Yum,
            web_package: "httpd".to_string(),
            web_service: "httpd".to_string(),
            document_root: PathBuf::from("/var/www/html"),
            image_source: PathBuf::from("/root/sallam.jpg"),
            image_name: "sallam.jpg".to_string(),
            page_name: "index.html".to_string(),
            page_heading: "msg from mahmoud sallam".to_string(),
            verify_url: "http://intranet.xyz.local".to_string(),
            expected_content: "<h1>this is sallam</h1>".to_string(),
            strict: false,
        }
    }
}

impl ProvisionConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| ProvisionError::file_access(path.as_ref(), e))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .map_err(|e| ProvisionError::file_access(path.as_ref(), e))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Where the image asset lands inside the document root
    pub fn image_destination(&self) -> PathBuf {
        self.document_root.join(&self.image_name)
    }

    /// Where the generated page is written
    pub fn page_path(&self) -> PathBuf {
        self.document_root.join(&self.page_name)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::from(self.strict)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("firewall_service", &self.firewall_service),
            ("selinux_key", &self.selinux_key),
            ("selinux_value", &self.selinux_value),
            ("web_package", &self.web_package),
            ("web_service", &self.web_service),
            ("image_name", &self.image_name),
            ("page_name", &self.page_name),
            ("verify_url", &self.verify_url),
            ("expected_content", &self.expected_content),
        ] {
            if value.trim().is_empty() {
                return Err(ProvisionError::config(format!("{field} must not be empty")));
            }
        }

        for (field, path) in [
            ("selinux_config", &self.selinux_config),
            ("document_root", &self.document_root),
            ("image_source", &self.image_source),
        ] {
            if !path.is_absolute() {
                return Err(ProvisionError::config(format!(
                    "{field} must be an absolute path, got {}",
                    path.display()
                )));
            }
        }

        if self.selinux_key.contains('=') || self.selinux_key.chars().any(char::is_whitespace) {
            return Err(ProvisionError::config(
                "selinux_key must be a bare key without '=' or whitespace",
            ));
        }

        // A line break in the value would split the rewritten line in two
        if self.selinux_value.contains(['\n', '\r']) {
            return Err(ProvisionError::config("selinux_value must be a single line"));
        }

        // Both names are interpolated into the page and joined onto the document root
        for (field, name) in [("image_name", &self.image_name), ("page_name", &self.page_name)] {
            if name.contains(['/', '"', '<', '>']) {
                return Err(ProvisionError::config(format!(
                    "{field} must be a plain file name, got {name:?}"
                )));
            }
        }

        if !(self.verify_url.starts_with("http://") || self.verify_url.starts_with("https://")) {
            return Err(ProvisionError::config(format!(
                "verify_url must start with http:// or https://, got {}",
                self.verify_url
            )));
        }

        Ok(())
    }
}

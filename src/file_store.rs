//! File access for provisioning steps
//!
//! The SELinux rewrite and the page write go through [`FileStore`], the file
//! counterpart of `CommandRunner`. Writes replace the whole file in place:
//! no temp file, no rename, no backup.

use crate::error::{ProvisionError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Capability to read and overwrite whole files.
pub trait FileStore {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Create or truncate `path` and write `contents`.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Reads and writes the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFiles;

impl FileStore for LocalFiles {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| ProvisionError::file_access(path, e))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        info!(path = %path.display(), bytes = contents.len(), "writing file");
        fs::write(path, contents).map_err(|e| ProvisionError::file_access(path, e))
    }
}

/// Reads the real filesystem, logs writes instead of performing them.
///
/// A missing file reads as empty so a preview can run on a machine that
/// is not the target host.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunFiles;

impl FileStore for DryRunFiles {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("[DRY RUN] {} does not exist, treating as empty", path.display());
                Ok(String::new())
            }
            Err(e) => Err(ProvisionError::file_access(path, e)),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        info!(
            "[DRY RUN] Skipped: write {} ({} bytes)",
            path.display(),
            contents.len()
        );
        Ok(())
    }
}

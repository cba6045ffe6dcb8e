//! In-memory host for tests.
//!
//! [`RecordingHost`] implements both `CommandRunner` and `FileStore`, and
//! appends every command line and every file write to one journal, so a test
//! can assert the exact order of everything a run did to the host.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::command_runner::{CommandOutput, CommandRunner};
use crate::command_traits::HostCommand;
use crate::error::{ProvisionError, Result};
use crate::file_store::FileStore;
use crate::provisioner::write_action;

/// Fake host that records instead of executing.
#[derive(Debug, Default)]
pub struct RecordingHost {
    journal: RefCell<Vec<String>>,
    files: RefCell<BTreeMap<PathBuf, String>>,
    responses: HashMap<String, CommandOutput>,
    missing_programs: HashSet<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), content.into());
        self
    }

    /// Answer `command_line` with `output`. Unlisted commands succeed silently.
    pub fn with_response(mut self, command_line: impl Into<String>, output: CommandOutput) -> Self {
        self.responses.insert(command_line.into(), output);
        self
    }

    /// Make every command of `program` fail to spawn.
    pub fn with_missing_program(mut self, program: impl Into<String>) -> Self {
        self.missing_programs.insert(program.into());
        self
    }

    /// Commands and writes, in order.
    pub fn journal(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }

    /// Current content of a file.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    fn respond(&self, command: &dyn HostCommand) -> Result<CommandOutput> {
        let command_line = command.command_line();
        self.journal.borrow_mut().push(command_line.clone());

        if self.missing_programs.contains(command.program()) {
            return Err(ProvisionError::command(format!(
                "failed to spawn `{}`: No such file or directory (os error 2)",
                command_line
            )));
        }

        Ok(self
            .responses
            .get(&command_line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::succeeded("")))
    }
}

impl CommandRunner for RecordingHost {
    fn execute(&self, command: &dyn HostCommand) -> Result<CommandOutput> {
        self.respond(command)
    }

    fn execute_captured(&self, command: &dyn HostCommand) -> Result<CommandOutput> {
        self.respond(command)
    }
}

impl FileStore for RecordingHost {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            ProvisionError::file_access(
                path,
                std::io::Error::new(ErrorKind::NotFound, "No such file or directory"),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.journal.borrow_mut().push(write_action(path));
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

//! Scriptable collaborators for exercising the assertion helpers
//!
//! Both mocks are cheap to clone and share their recorded state between
//! clones, so a test can hand one copy to `Assertions` and inspect the other.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::configuration::Configuration;
use crate::error::{Result, ToolError};
use crate::fs::FileSystem;
use crate::tool::{BuildRequest, ExitStatus, PackageTool, ProcessResult};

/// What a scripted build or test run does
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    Success,
    /// Process exits with this code, reported as `NonZeroExit` even for 0
    Exit(i32),
    Signal(i32),
    SpawnError,
    InvalidPackage,
}

impl BuildOutcome {
    fn to_result(&self, command: &str, path: &Path) -> Result<ProcessResult> {
        let finished = |exit_status| ProcessResult {
            command: command.to_string(),
            exit_status,
            stdout: String::new(),
            stderr: String::new(),
        };

        match self {
            BuildOutcome::Success => Ok(finished(ExitStatus::Terminated { code: 0 })),
            BuildOutcome::Exit(code) => Err(ToolError::non_zero_exit(finished(
                ExitStatus::Terminated { code: *code },
            ))),
            BuildOutcome::Signal(signal) => Err(ToolError::non_zero_exit(finished(
                ExitStatus::Signalled { signal: *signal },
            ))),
            BuildOutcome::SpawnError => Err(ToolError::spawn(
                command,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            )),
            BuildOutcome::InvalidPackage => {
                Err(ToolError::invalid_package(path, "no Cargo.toml found"))
            }
        }
    }
}

/// A build invocation as seen by [`MockTool`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBuild {
    pub path: PathBuf,
    pub configuration: Option<Configuration>,
    pub cc_flags: Vec<String>,
    pub linker_flags: Vec<String>,
    pub compiler_flags: Vec<String>,
    pub env: Option<HashMap<String, String>>,
}

#[derive(Debug, Default)]
struct ToolCalls {
    builds: Vec<RecordedBuild>,
    tests: Vec<Option<HashMap<String, String>>>,
}

/// A [`PackageTool`] with scripted outcomes that records every call.
#[derive(Debug, Clone)]
pub struct MockTool {
    name: String,
    build_outcomes: HashMap<Configuration, BuildOutcome>,
    default_build_outcome: BuildOutcome,
    test_outcome: BuildOutcome,
    calls: Arc<Mutex<ToolCalls>>,
}

impl Default for MockTool {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            build_outcomes: HashMap::new(),
            default_build_outcome: BuildOutcome::Success,
            test_outcome: BuildOutcome::Success,
            calls: Arc::new(Mutex::new(ToolCalls::default())),
        }
    }
}

impl MockTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_build_outcome(
        mut self,
        configuration: Configuration,
        outcome: BuildOutcome,
    ) -> Self {
        self.build_outcomes.insert(configuration, outcome);
        self
    }

    /// Outcome for the unspecified configuration and any configuration
    /// without its own outcome
    pub fn with_default_build_outcome(mut self, outcome: BuildOutcome) -> Self {
        self.default_build_outcome = outcome;
        self
    }

    pub fn with_test_outcome(mut self, outcome: BuildOutcome) -> Self {
        self.test_outcome = outcome;
        self
    }

    pub fn build_calls(&self) -> Vec<RecordedBuild> {
        self.calls.lock().unwrap().builds.clone()
    }

    pub fn test_calls(&self) -> Vec<Option<HashMap<String, String>>> {
        self.calls.lock().unwrap().tests.clone()
    }
}

impl PackageTool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, request: &BuildRequest<'_>) -> Result<ProcessResult> {
        self.calls.lock().unwrap().builds.push(RecordedBuild {
            path: request.path.to_path_buf(),
            configuration: request.configuration.cloned(),
            cc_flags: request.cc_flags.to_vec(),
            linker_flags: request.linker_flags.to_vec(),
            compiler_flags: request.compiler_flags.to_vec(),
            env: request.env.cloned(),
        });

        let outcome = request
            .configuration
            .and_then(|c| self.build_outcomes.get(c))
            .unwrap_or(&self.default_build_outcome);
        outcome.to_result(&format!("{} build", self.name), request.path)
    }

    fn test(&self, path: &Path, env: Option<&HashMap<String, String>>) -> Result<ProcessResult> {
        self.calls.lock().unwrap().tests.push(env.cloned());
        self.test_outcome
            .to_result(&format!("{} test", self.name), path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

/// In-memory [`FileSystem`]
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: HashMap<PathBuf, EntryKind>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(path.into(), EntryKind::File);
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(path.into(), EntryKind::Directory);
        self
    }
}

impl FileSystem for MockFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.entries.get(path) == Some(&EntryKind::File)
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.entries.get(path) == Some(&EntryKind::Directory)
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }
}

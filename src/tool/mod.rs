pub mod cargo;

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::configuration::Configuration;
use crate::error::Result;

pub use cargo::CargoTool;

/// How a tool process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitStatus {
    Terminated { code: i32 },
    Signalled { signal: i32 },
}

impl ExitStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitStatus::Terminated { code: 0 })
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitStatus::Terminated { code };
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitStatus::Signalled { signal };
            }
        }

        ExitStatus::Terminated { code: -1 }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Terminated { code } => write!(f, "exit code {code}"),
            ExitStatus::Signalled { signal } => write!(f, "signal {signal}"),
        }
    }
}

/// Captured outcome of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    pub command: String,
    pub exit_status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    pub fn succeeded(&self) -> bool {
        self.exit_status.is_success()
    }
}

impl fmt::Display for ProcessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` terminated with {}", self.command, self.exit_status)?;
        let stdout = self.stdout.trim_end();
        if !stdout.is_empty() {
            write!(f, "\nstdout:\n{stdout}")?;
        }
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            write!(f, "\nstderr:\n{stderr}")?;
        }
        Ok(())
    }
}

/// One build invocation
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    pub path: &'a Path,
    /// `None` builds the tool's default configuration
    pub configuration: Option<&'a Configuration>,
    pub cc_flags: &'a [String],
    pub linker_flags: &'a [String],
    pub compiler_flags: &'a [String],
    pub env: Option<&'a HashMap<String, String>>,
}

impl<'a> BuildRequest<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self {
            path,
            configuration: None,
            cc_flags: &[],
            linker_flags: &[],
            compiler_flags: &[],
            env: None,
        }
    }
}

/// Runs build and test commands for a package.
pub trait PackageTool: Send + Sync {
    /// Short name used in failure messages, e.g. `cargo`
    fn name(&self) -> &str;

    /// Builds the package. Any unsuccessful run is an `Err`.
    fn build(&self, request: &BuildRequest<'_>) -> Result<ProcessResult>;

    /// Runs the package's test suite. Any unsuccessful run is an `Err`.
    fn test(&self, path: &Path, env: Option<&HashMap<String, String>>) -> Result<ProcessResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_success() {
        assert!(ExitStatus::Terminated { code: 0 }.is_success());
        assert!(!ExitStatus::Terminated { code: 101 }.is_success());
        assert!(!ExitStatus::Signalled { signal: 9 }.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_from_std() {
        use std::os::unix::process::ExitStatusExt;

        let exited = std::process::ExitStatus::from_raw(3 << 8);
        assert_eq!(ExitStatus::from(exited), ExitStatus::Terminated { code: 3 });

        let killed = std::process::ExitStatus::from_raw(9);
        assert_eq!(ExitStatus::from(killed), ExitStatus::Signalled { signal: 9 });
    }

    #[test]
    fn test_process_result_display_skips_empty_streams() {
        let result = ProcessResult {
            command: "cargo test".to_string(),
            exit_status: ExitStatus::Terminated { code: 101 },
            stdout: String::new(),
            stderr: "test failed\n".to_string(),
        };
        let text = result.to_string();
        assert_eq!(
            text,
            "`cargo test` terminated with exit code 101\nstderr:\ntest failed"
        );
        assert!(!result.succeeded());
    }

    #[test]
    fn test_build_request_defaults() {
        let request = BuildRequest::new(Path::new("/pkg"));
        assert!(request.configuration.is_none());
        assert!(request.cc_flags.is_empty());
        assert!(request.env.is_none());
    }
}

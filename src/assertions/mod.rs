//! Assertion helpers for build tool behavior
//!
//! Each helper performs exactly one check and, on failure, reports a
//! message plus the caller's [`Location`] to the configured [`Reporter`].
//! Helpers never panic and never return errors; whatever goes wrong is
//! turned into a report.
//!
//! ```rust,no_run
//! use build_assert::assertions::Assertions;
//! use build_assert::configuration::BuildOptions;
//! use build_assert::here;
//! use build_assert::reporter::FailureLog;
//! use std::path::Path;
//!
//! let log = FailureLog::new();
//! let check = Assertions::new(&log);
//! check.assert_builds(Path::new("fixtures/hello"), &BuildOptions::default(), here!());
//! check.assert_file_exists(Path::new("fixtures/hello/target/debug/hello"), here!());
//! log.assert_clean();
//! ```

mod build;
mod diagnostics;
mod errors;
mod paths;

pub use errors::classify;

use crate::fs::{FileSystem, LocalFileSystem};
use crate::location::Location;
use crate::reporter::Reporter;
use crate::tool::{CargoTool, PackageTool};

/// Assertion entry point bundling the collaborators every helper needs.
pub struct Assertions<'r> {
    reporter: &'r dyn Reporter,
    tool: Box<dyn PackageTool>,
    fs: Box<dyn FileSystem>,
}

impl<'r> Assertions<'r> {
    /// Uses `cargo` with default settings and the host filesystem.
    ///
    /// The settings file and `$BUILD_ASSERT_PROGRAM` are not consulted here;
    /// pass `CargoTool::from_env()?` to [`Assertions::with_tool`] for that.
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self {
            reporter,
            tool: Box::new(CargoTool::new()),
            fs: Box::new(LocalFileSystem),
        }
    }

    pub fn with_tool(mut self, tool: impl PackageTool + 'static) -> Self {
        self.tool = Box::new(tool);
        self
    }

    pub fn with_file_system(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    fn fail(&self, message: impl AsRef<str>, location: Location) {
        self.reporter.report_failure(message.as_ref(), location);
    }
}

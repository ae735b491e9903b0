//! Test assertions for package build tools.
//!
//! Helpers that run a build tool against a package, inspect the filesystem
//! or diagnostics, or check returned errors, and report every failure with
//! the caller's source location instead of panicking mid-check.

pub mod assertions;
pub mod config;
pub mod configuration;
pub mod diagnostics;
pub mod error;
pub mod fixture;
pub mod fs;
pub mod location;
pub mod logging;
pub mod reporter;
pub mod test_utils;
pub mod tool;

pub use assertions::{classify, Assertions};
pub use configuration::{BuildOptions, Configuration};
pub use diagnostics::{Diagnostic, DiagnosticsEngine, DiagnosticsSource, Severity};
pub use error::ToolError;
pub use location::Location;
pub use reporter::{Failure, FailureLog, PanicReporter, Reporter};

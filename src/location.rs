//! Source locations attached to failure reports.

use serde::Serialize;
use std::fmt;

/// File, line and column of the assertion call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }

    /// Captures the location of the caller.
    ///
    /// Functions that forward to this must themselves be `#[track_caller]`
    /// for the reported location to point at test code.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Expands to the [`Location`] of the macro invocation.
#[macro_export]
macro_rules! here {
    () => {
        $crate::location::Location::new(file!(), line!(), column!())
    };
}

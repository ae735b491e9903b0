//! Diagnostics emitted by the build tooling
//!
//! [`DiagnosticsEngine`] is an ordered collection of [`Diagnostic`]s. It can
//! be filled by hand or from cargo's `--message-format=json` output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic. `Note` is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    /// Maps a rustc message level onto a severity
    pub fn from_level(level: &str) -> Self {
        match level {
            "warning" => Severity::Warning,
            "note" | "help" | "failure-note" => Severity::Note,
            // "error" and "error: internal compiler error"
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    pub fn is_note(&self) -> bool {
        self.severity == Severity::Note
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Anything holding an ordered list of diagnostics.
pub trait DiagnosticsSource {
    fn diagnostics(&self) -> &[Diagnostic];
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DiagnosticsEngine {
    diagnostics: Vec<Diagnostic>,
}

// One line of cargo's JSON message stream. Only compiler messages matter.
#[derive(Deserialize)]
struct CargoMessage {
    reason: String,
    message: Option<CompilerMessage>,
}

#[derive(Deserialize)]
struct CompilerMessage {
    message: String,
    level: String,
}

impl DiagnosticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Builds an engine from `cargo build --message-format=json` output.
    ///
    /// Lines that are not JSON, or not `compiler-message` records, are skipped.
    pub fn from_cargo_json(output: &str) -> Self {
        let mut engine = Self::new();
        for line in output.lines().map(str::trim).filter(|l| l.starts_with('{')) {
            let Ok(record) = serde_json::from_str::<CargoMessage>(line) else {
                tracing::debug!(line = line, "Skipping unparseable cargo message");
                continue;
            };
            if record.reason != "compiler-message" {
                continue;
            }
            if let Some(message) = record.message {
                engine.emit(Diagnostic::new(
                    Severity::from_level(&message.level),
                    message.message,
                ));
            }
        }
        engine
    }
}

impl DiagnosticsSource for DiagnosticsEngine {
    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl FromIterator<Diagnostic> for DiagnosticsEngine {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

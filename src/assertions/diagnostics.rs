use super::Assertions;
use crate::diagnostics::DiagnosticsSource;
use crate::location::Location;

impl Assertions<'_> {
    /// Fails if `source` holds anything other than notes.
    pub fn assert_no_diagnostics(&self, source: &impl DiagnosticsSource, location: Location) {
        let listing: Vec<String> = source
            .diagnostics()
            .iter()
            .filter(|d| !d.is_note())
            .map(|d| format!("- {d}"))
            .collect();

        if listing.is_empty() {
            return;
        }
        self.fail(
            format!("Found unexpected diagnostics: \n{}", listing.join("\n")),
            location,
        );
    }
}

use std::path::Path;

use super::Assertions;
use crate::location::Location;

impl Assertions<'_> {
    pub fn assert_file_exists(&self, path: &Path, location: Location) {
        if !self.fs.is_file(path) {
            self.fail(
                format!("Expected file doesn't exist: {}", path.display()),
                location,
            );
        }
    }

    pub fn assert_directory_exists(&self, path: &Path, location: Location) {
        if !self.fs.is_directory(path) {
            self.fail(
                format!("Expected directory doesn't exist: {}", path.display()),
                location,
            );
        }
    }

    /// Fails if anything at all exists at `path`
    pub fn assert_no_such_path(&self, path: &Path, location: Location) {
        if self.fs.exists(path) {
            self.fail(
                format!("path exists but should not: {}", path.display()),
                location,
            );
        }
    }
}

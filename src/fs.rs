//! Filesystem queries used by the path assertions

use std::path::Path;

pub trait FileSystem: Send + Sync {
    /// True if `path` resolves to a regular file
    fn is_file(&self, path: &Path) -> bool;
    /// True if `path` resolves to a directory
    fn is_directory(&self, path: &Path) -> bool;
    /// True if anything exists at `path`
    fn exists(&self, path: &Path) -> bool;
}

/// The host filesystem. Symlinks are followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_file_system_queries() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Cargo.toml");
        std::fs::write(&file, "").unwrap();
        let missing = dir.path().join("missing");
        let fs = LocalFileSystem;

        assert!(fs.is_file(&file));
        assert!(!fs.is_directory(&file));
        assert!(fs.exists(&file));

        assert!(fs.is_directory(dir.path()));
        assert!(!fs.is_file(dir.path()));

        assert!(!fs.exists(&missing));
        assert!(!fs.is_file(&missing));
        assert!(!fs.is_directory(&missing));
    }
}

//! Isolated copies of fixture packages
//!
//! Building a fixture in place would leave `target/` directories behind and
//! let tests observe each other's artifacts, so tests build a throwaway copy.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory names never copied from a fixture source
const SKIPPED_DIRS: &[&str] = &["target", ".git"];

/// A package copied into a temporary directory, removed on drop.
#[derive(Debug)]
pub struct Fixture {
    temp_dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    /// Copies the package at `source` into a fresh temporary directory.
    pub fn copy_from(source: &Path) -> Result<Self> {
        if !source.is_dir() {
            bail!("Fixture source is not a directory: {}", source.display());
        }
        let name = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "fixture".into());

        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let root = temp_dir.path().join(name);
        copy_tree(source, &root)?;

        tracing::debug!(source = %source.display(), root = %root.display(), "Fixture copied");
        Ok(Self { temp_dir, root })
    }

    /// Creates an empty fixture directory named `name`.
    pub fn empty(name: &str) -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let root = temp_dir.path().join(name);
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create directory: {}", root.display()))?;
        Ok(Self { temp_dir, root })
    }

    /// Root of the copied package
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Directory holding the package root; cleaned up with the fixture
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` to `relative` under the package root, creating
    /// parent directories as needed.
    pub fn create_file<P: AsRef<Path>>(&self, relative: P, contents: &str) -> Result<PathBuf> {
        let full_path = self.root.join(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&full_path, contents)
            .with_context(|| format!("Failed to write file: {}", full_path.display()))?;
        Ok(full_path)
    }
}

fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    fs::create_dir_all(destination)
        .with_context(|| format!("Failed to create directory: {}", destination.display()))?;

    for entry in fs::read_dir(source)
        .with_context(|| format!("Failed to read directory: {}", source.display()))?
    {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        // Symlinks are followed and their targets copied.
        let metadata = fs::metadata(entry.path())
            .with_context(|| format!("Failed to resolve {}", entry.path().display()))?;

        if metadata.is_dir() {
            let skipped = entry
                .file_name()
                .to_str()
                .is_some_and(|name| SKIPPED_DIRS.contains(&name));
            if !skipped {
                copy_tree(&entry.path(), &target)?;
            }
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }
    Ok(())
}

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::configuration::Configuration;

/// Path to a settings file, overriding the per-user location
pub const CONFIG_PATH_ENV: &str = "BUILD_ASSERT_CONFIG";
/// Build tool program, overriding the settings file
pub const PROGRAM_ENV: &str = "BUILD_ASSERT_PROGRAM";

/// User-level settings for the cargo runner and the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Build tool executable, looked up on `PATH`
    pub program: String,
    pub default_configurations: BTreeSet<Configuration>,
    /// Pass `--offline` to every build and test
    pub offline: bool,
    /// Applied to every spawned tool command
    pub env: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            program: "cargo".to_string(),
            default_configurations: Configuration::defaults(),
            offline: false,
            env: HashMap::new(),
        }
    }
}

impl Settings {
    /// Loads settings from `$BUILD_ASSERT_CONFIG`, then the per-user config
    /// file, then defaults, and applies `$BUILD_ASSERT_PROGRAM`.
    pub fn load() -> Result<Self> {
        let mut settings = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Ok(program) = std::env::var(PROGRAM_ENV) {
            if !program.trim().is_empty() {
                tracing::debug!(program = %program, "Build tool overridden from environment");
                settings.program = program;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Location of the settings file, if one can be determined
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("", "", "build-assert")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            bail!("Settings field 'program' must not be empty");
        }
        if self.default_configurations.is_empty() {
            bail!("Settings field 'default_configurations' must name at least one configuration");
        }
        if let Some(key) = self.env.keys().find(|k| k.is_empty() || k.contains('=')) {
            bail!("Invalid environment variable name in settings: '{key}'");
        }
        Ok(())
    }
}

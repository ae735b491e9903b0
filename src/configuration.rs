//! Build configurations and per-assertion build options

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// A named build mode.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Configuration {
    Debug,
    Release,
    /// Any other named profile
    Custom(String),
}

impl Configuration {
    pub fn name(&self) -> &str {
        match self {
            Configuration::Debug => "debug",
            Configuration::Release => "release",
            Configuration::Custom(name) => name,
        }
    }

    /// The conventional `{debug, release}` pair
    pub fn defaults() -> BTreeSet<Configuration> {
        BTreeSet::from([Configuration::Debug, Configuration::Release])
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Configuration {
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "debug" | "dev" => Configuration::Debug,
            "release" => Configuration::Release,
            _ => Configuration::Custom(name.to_string()),
        }
    }
}

impl From<String> for Configuration {
    fn from(name: String) -> Self {
        Configuration::from(name.as_str())
    }
}

impl From<Configuration> for String {
    fn from(configuration: Configuration) -> Self {
        configuration.name().to_string()
    }
}

impl FromStr for Configuration {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Configuration::from(s))
    }
}

/// Options for the build assertions.
///
/// `configurations` is only consulted by `assert_builds`;
/// `assert_build_fails` always builds the tool's default configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub configurations: BTreeSet<Configuration>,
    /// Flags for the C compiler
    pub cc_flags: Vec<String>,
    /// Flags for the linker
    pub linker_flags: Vec<String>,
    /// Flags for the language compiler frontend
    pub compiler_flags: Vec<String>,
    /// Passed through to the tool unchanged
    pub env: Option<HashMap<String, String>>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            configurations: Configuration::defaults(),
            cc_flags: Vec::new(),
            linker_flags: Vec::new(),
            compiler_flags: Vec::new(),
            env: None,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configurations<I, C>(mut self, configurations: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Configuration>,
    {
        self.configurations = configurations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cc_flag(mut self, flag: impl Into<String>) -> Self {
        self.cc_flags.push(flag.into());
        self
    }

    pub fn with_linker_flag(mut self, flag: impl Into<String>) -> Self {
        self.linker_flags.push(flag.into());
        self
    }

    pub fn with_compiler_flag(mut self, flag: impl Into<String>) -> Self {
        self.compiler_flags.push(flag.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

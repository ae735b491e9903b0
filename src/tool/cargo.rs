//! `cargo`-backed implementation of [`PackageTool`]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{BuildRequest, ExitStatus, PackageTool, ProcessResult};
use crate::config::Settings;
use crate::configuration::Configuration;
use crate::error::{Result, ToolError};
use crate::logging;

const MANIFEST: &str = "Cargo.toml";
const ENCODED_RUSTFLAGS: &str = "CARGO_ENCODED_RUSTFLAGS";
const RUSTFLAGS_SEPARATOR: &str = "\x1f";

/// Runs `cargo build` / `cargo test` as child processes.
#[derive(Debug, Clone)]
pub struct CargoTool {
    program: String,
    offline: bool,
    base_env: HashMap<String, String>,
}

impl Default for CargoTool {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl CargoTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses [`Settings::load`], so the settings file and
    /// `$BUILD_ASSERT_PROGRAM` apply.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::from_settings(&Settings::load()?))
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            program: settings.program.clone(),
            offline: settings.offline,
            base_env: settings.env.clone(),
        }
    }

    fn resolve_program(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|e| ToolError::tool_not_found(&self.program, e))
    }

    fn manifest_path(path: &Path) -> Result<PathBuf> {
        if !path.is_dir() {
            return Err(ToolError::invalid_package(path, "not a directory"));
        }
        let manifest = path.join(MANIFEST);
        if !manifest.is_file() {
            return Err(ToolError::invalid_package(
                path,
                format!("no {MANIFEST} found"),
            ));
        }
        Ok(manifest)
    }

    /// Arguments for `cargo build`, excluding the program itself
    pub fn build_args(
        &self,
        manifest: &Path,
        configuration: Option<&Configuration>,
    ) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--manifest-path".to_string(),
            manifest.to_string_lossy().to_string(),
        ];
        match configuration {
            None | Some(Configuration::Debug) => {}
            Some(Configuration::Release) => args.push("--release".to_string()),
            Some(Configuration::Custom(profile)) => {
                args.push("--profile".to_string());
                args.push(profile.clone());
            }
        }
        if self.offline {
            args.push("--offline".to_string());
        }
        args
    }

    /// Environment for a build: settings env, then the caller's override,
    /// then the flag variables appended to whatever those provided.
    ///
    /// Rust flags go to `CARGO_ENCODED_RUSTFLAGS`, one argument per flag,
    /// so a flag containing spaces reaches rustc intact. Any `RUSTFLAGS`
    /// from the env is folded in and removed, since cargo would ignore it.
    pub fn build_env(&self, request: &BuildRequest<'_>) -> HashMap<String, String> {
        let mut env = self.base_env.clone();
        if let Some(overrides) = request.env {
            env.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        if !request.compiler_flags.is_empty() || !request.linker_flags.is_empty() {
            let mut rustflags = existing_rustflags(&mut env);
            rustflags.extend(request.compiler_flags.iter().cloned());
            for flag in request.linker_flags {
                rustflags.push("-C".to_string());
                rustflags.push(format!("link-arg={flag}"));
            }
            let encoded = rustflags.join(RUSTFLAGS_SEPARATOR);
            env.insert(ENCODED_RUSTFLAGS.to_string(), encoded);
        }
        append_flags(&mut env, "CFLAGS", request.cc_flags);

        env
    }

    fn execute(
        &self,
        args: Vec<String>,
        env: &HashMap<String, String>,
        cwd: &Path,
    ) -> Result<ProcessResult> {
        let program = self.resolve_program()?;
        let command_line = format!("{} {}", self.program, args.join(" "));
        logging::log_command(&command_line, Some(env));

        let output = Command::new(&program)
            .args(&args)
            .envs(env)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ToolError::spawn(&command_line, e))?;

        let result = ProcessResult {
            command: command_line,
            exit_status: ExitStatus::from(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if result.succeeded() {
            Ok(result)
        } else {
            tracing::debug!(
                command = %result.command,
                status = %result.exit_status,
                "Tool command failed"
            );
            Err(ToolError::non_zero_exit(result))
        }
    }
}

/// Takes the Rust flags already present in `env`; the encoded form wins over
/// `RUSTFLAGS`, as it does in cargo.
fn existing_rustflags(env: &mut HashMap<String, String>) -> Vec<String> {
    let plain = env.remove("RUSTFLAGS");
    match env.remove(ENCODED_RUSTFLAGS) {
        Some(encoded) => encoded
            .split(RUSTFLAGS_SEPARATOR)
            .filter(|flag| !flag.is_empty())
            .map(str::to_string)
            .collect(),
        None => plain
            .map(|flags| flags.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
    }
}

fn append_flags(env: &mut HashMap<String, String>, key: &str, flags: &[String]) {
    if flags.is_empty() {
        return;
    }
    let joined = flags.join(" ");
    env.entry(key.to_string())
        .and_modify(|existing| {
            if existing.trim().is_empty() {
                *existing = joined.clone();
            } else {
                existing.push(' ');
                existing.push_str(&joined);
            }
        })
        .or_insert_with(|| joined.clone());
}

impl PackageTool for CargoTool {
    fn name(&self) -> &str {
        &self.program
    }

    fn build(&self, request: &BuildRequest<'_>) -> Result<ProcessResult> {
        let manifest = Self::manifest_path(request.path)?;
        let args = self.build_args(&manifest, request.configuration);
        let env = self.build_env(request);
        self.execute(args, &env, request.path)
    }

    fn test(&self, path: &Path, env: Option<&HashMap<String, String>>) -> Result<ProcessResult> {
        let manifest = Self::manifest_path(path)?;
        let mut args = vec![
            "test".to_string(),
            "--manifest-path".to_string(),
            manifest.to_string_lossy().to_string(),
        ];
        if self.offline {
            args.push("--offline".to_string());
        }

        let mut merged = self.base_env.clone();
        if let Some(overrides) = env {
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self.execute(args, &merged, path)
    }
}

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use build_assert::config::Settings;
use build_assert::logging;
use build_assert::tool::CargoTool;
use build_assert::{here, Assertions, BuildOptions, Configuration, DiagnosticsEngine, FailureLog};

#[derive(Parser)]
#[command(name = "build-assert")]
#[command(version)]
#[command(about = "Assert build tool behavior against a package", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, help = "Enable verbose output", global = true)]
    verbose: bool,

    #[arg(long, help = "Print failures as JSON", global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Assert that a package builds in every configuration")]
    Builds(BuildsArgs),

    #[command(about = "Assert that a package fails to build")]
    BuildFails(BuildFailsArgs),

    #[command(about = "Assert that a package's tests pass")]
    Test {
        #[arg(help = "Path to the package")]
        path: PathBuf,

        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
        env: Vec<(String, String)>,
    },

    #[command(about = "Assert that a regular file exists")]
    FileExists { path: PathBuf },

    #[command(about = "Assert that a directory exists")]
    DirExists { path: PathBuf },

    #[command(about = "Assert that nothing exists at a path")]
    NoSuchPath { path: PathBuf },

    #[command(about = "Assert that a cargo JSON message log has no warnings or errors")]
    Diagnostics {
        #[arg(help = "Output of `cargo build --message-format=json`, or - for stdin")]
        log: PathBuf,
    },
}

#[derive(Args)]
struct FlagArgs {
    #[arg(long = "Xcc", allow_hyphen_values = true, help = "Flag for the C compiler")]
    cc_flags: Vec<String>,

    #[arg(long = "Xlinker", allow_hyphen_values = true, help = "Flag for the linker")]
    linker_flags: Vec<String>,

    #[arg(long = "Xrustc", allow_hyphen_values = true, help = "Argument passed to rustc as-is")]
    compiler_flags: Vec<String>,

    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,
}

impl FlagArgs {
    fn options(&self, configurations: BTreeSet<Configuration>) -> BuildOptions {
        BuildOptions {
            configurations,
            cc_flags: self.cc_flags.clone(),
            linker_flags: self.linker_flags.clone(),
            compiler_flags: self.compiler_flags.clone(),
            env: env_override(&self.env),
        }
    }
}

#[derive(Args)]
struct BuildsArgs {
    #[arg(help = "Path to the package")]
    path: PathBuf,

    #[arg(short = 'c', long = "configuration", help = "Configuration to build (repeatable)")]
    configurations: Vec<Configuration>,

    #[command(flatten)]
    flags: FlagArgs,
}

impl BuildsArgs {
    fn options(&self, settings: &Settings) -> BuildOptions {
        let configurations = if self.configurations.is_empty() {
            settings.default_configurations.clone()
        } else {
            self.configurations.iter().cloned().collect()
        };
        self.flags.options(configurations)
    }
}

/// `build-fails` always builds the tool's default configuration.
#[derive(Args)]
struct BuildFailsArgs {
    #[arg(help = "Path to the package")]
    path: PathBuf,

    #[command(flatten)]
    flags: FlagArgs,
}

impl BuildFailsArgs {
    fn options(&self) -> BuildOptions {
        self.flags.options(BTreeSet::new())
    }
}

fn parse_env_pair(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

fn env_override(pairs: &[(String, String)]) -> Option<HashMap<String, String>> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.iter().cloned().collect())
    }
}

fn read_log(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("Failed to read diagnostics from stdin")?;
        return Ok(contents);
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read diagnostics log: {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("{} {}", "⚠".yellow(), e);
    }

    let settings = Settings::load()?;
    let log = FailureLog::new();
    let check = Assertions::new(&log).with_tool(CargoTool::from_settings(&settings));

    match &cli.command {
        Commands::Builds(args) => {
            check.assert_builds(&args.path, &args.options(&settings), here!());
        }
        Commands::BuildFails(args) => {
            check.assert_build_fails(&args.path, &args.options(), here!());
        }
        Commands::Test { path, env } => {
            check.assert_tests_pass(path, env_override(env).as_ref(), here!());
        }
        Commands::FileExists { path } => check.assert_file_exists(path, here!()),
        Commands::DirExists { path } => check.assert_directory_exists(path, here!()),
        Commands::NoSuchPath { path } => check.assert_no_such_path(path, here!()),
        Commands::Diagnostics { log: log_path } => {
            let engine = DiagnosticsEngine::from_cargo_json(&read_log(log_path)?);
            check.assert_no_diagnostics(&engine, here!());
        }
    }

    let failures = log.take();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&failures)?);
    } else if failures.is_empty() {
        println!("{} All checks passed", "✓".green().bold());
    } else {
        for failure in &failures {
            eprintln!("{} {}", "✗".red().bold(), failure.message);
        }
    }

    if !failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

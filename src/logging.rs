use anyhow::Result;
use std::collections::HashMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::location::Location;

/// Initialize structured logging based on verbosity level
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("build_assert=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("build_assert=info,warn"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("Verbose logging enabled");

    Ok(())
}

/// Log a spawned tool command
pub fn log_command(command: &str, env: Option<&HashMap<String, String>>) {
    let env_keys: Vec<&str> = env
        .map(|vars| vars.keys().map(String::as_str).collect())
        .unwrap_or_default();
    tracing::debug!(command = command, env = ?env_keys, "Spawning tool command");
}

/// Log a reported assertion failure
pub fn log_failure(message: &str, location: &Location) {
    tracing::warn!(
        file = location.file,
        line = location.line,
        failure = message,
        "Assertion failed"
    );
}

/*!
 * Logging and tracing initialization
 */

use std::fs::File;
use std::path::Path;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::CliConfig;
use crate::error::{MdpackError, Result};

/// Effective level: `verbose` wins over the configured level
pub fn effective_level(config: &CliConfig) -> Level {
    if config.verbose {
        Level::DEBUG
    } else {
        config.log_level.to_tracing_level()
    }
}

/// Initialize structured logging based on configuration
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &CliConfig) -> Result<()> {
    let log_level = effective_level(config);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!("mdpack={},mdpack_core_poll={}", log_level, log_level))
        })
        .map_err(|e| MdpackError::Config(format!("Failed to create log filter: {}", e)))?;

    if let Some(ref log_path) = config.log_file {
        init_file_logging(log_path, env_filter)?;
    } else {
        init_stderr_logging(env_filter);
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for command output
fn init_stderr_logging(env_filter: EnvFilter) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Log JSON lines to a file
fn init_file_logging(log_path: &Path, env_filter: EnvFilter) -> Result<()> {
    let file = File::create(log_path)
        .map_err(|e| MdpackError::Config(format!("Failed to create log file: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(file)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

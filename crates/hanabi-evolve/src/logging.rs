use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_path: PathBuf,
}

/// Installs the global subscriber writing to `<directory>/<run_id>.jsonl`
/// (or `.log` for plain text). `RUST_LOG` overrides the configured level.
pub fn init_logging(logging: &LoggingConfig, run_id: &str) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    fs::create_dir_all(&logging.directory).with_context(|| {
        format!(
            "creating log directory at {}",
            logging.directory.display()
        )
    })?;

    let extension = if logging.json { "jsonl" } else { "log" };
    let log_path = logging.directory.join(format!("{run_id}.{extension}"));
    let file = File::create(&log_path)
        .with_context(|| format!("creating log file at {}", log_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer);

    // A subscriber may already be installed, e.g. by another test.
    let _ = if logging.json {
        tracing::subscriber::set_global_default(builder.json().with_current_span(false).finish())
    } else {
        tracing::subscriber::set_global_default(builder.with_ansi(false).finish())
    };

    Ok(Some(LoggingGuard {
        _guard: guard,
        log_path,
    }))
}

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{runtime_dir, LogLevel};

/// Targets that follow the configured level. Everything else stays at warn.
const WORKSPACE_TARGETS: &[&str] = &["supplyfs", "supplyfs_property", "supplyfs_platform"];

const LOG_FILE_PREFIX: &str = "supplyfs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Daily rolling file in the runtime directory.
    File,
    Stderr,
}

pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(level: LogLevel, mode: LogMode, cli_override: Option<LogLevel>) -> LogGuard {
    let Some(level) = cli_override.unwrap_or(level).as_tracing_level() else {
        return LogGuard { _guard: None };
    };

    let guard = match mode {
        LogMode::File => init_file_logging(level).or_else(|| {
            init_stderr_logging(level);
            None
        }),
        LogMode::Stderr => {
            init_stderr_logging(level);
            None
        }
    };

    LogGuard { _guard: guard }
}

/// `RUST_LOG` replaces the workspace directives entirely when set.
fn build_env_filter(level: Level) -> EnvFilter {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .unwrap_or_else(|_| workspace_directives(level));
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

fn workspace_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn init_file_logging(level: Level) -> Option<WorkerGuard> {
    let log_dir = runtime_dir();
    let appender = std::fs::create_dir_all(&log_dir)
        .map_err(|e| e.to_string())
        .and_then(|()| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .max_log_files(7)
                .build(&log_dir)
                .map_err(|e| e.to_string())
        });
    let appender = match appender {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!(
                "Warning: cannot log to {}: {}; logging to stderr",
                log_dir.display(),
                e
            );
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true);

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(file_layer)
        .try_init();

    Some(guard)
}

fn init_stderr_logging(level: Level) {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(io::stderr().is_terminal());

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(stderr_layer)
        .try_init();
}

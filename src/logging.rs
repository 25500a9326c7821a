//! Tracing subscriber setup.
//!
//! CLI commands log to stderr. The terminal UI owns the screen, so it logs to
//! a file with ANSI colours off. `RUST_LOG` takes precedence over the level
//! passed in.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::LogLevel;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("logging already initialised")]
    AlreadySet,
}

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber.
pub fn init(target: &LogTarget, level: LogLevel) -> Result<(), LoggingError> {
    match target {
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter(level))
                .with_writer(io::stderr)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber).map_err(|_| LoggingError::AlreadySet)
        }
        LogTarget::File(path) => {
            let file = open_append(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter(level))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber).map_err(|_| LoggingError::AlreadySet)
        }
    }
}

fn open_append(path: &Path) -> Result<fs::File, LoggingError> {
    let open = || -> io::Result<fs::File> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    };
    open().map_err(|source| LoggingError::Open { path: path.to_path_buf(), source })
}

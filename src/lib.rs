pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod models;

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Callback for failures nothing else handles (panicked load tasks,
/// terminal I/O errors). Injected into the dashboard entry point.
pub type ErrorReporter = Arc<dyn Fn(&anyhow::Error) + Send + Sync>;

/// Reporter that only logs
pub fn log_error_reporter() -> ErrorReporter {
    Arc::new(|err: &anyhow::Error| {
        tracing::error!(error = %format!("{:#}", err), "Unexpected error");
    })
}

/// Initialize tracing/logging
///
/// `RUST_LOG` overrides the configured level. When `logging.file` is set,
/// output goes there instead of stderr.
///
/// Note: This function can only be called once.
pub fn init_tracing(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = cfg.format == "json";

    match &cfg.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = Mutex::new(file);
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(writer))
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_target(true).with_ansi(false).with_writer(writer))
                    .init();
            }
        }
        None => {
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                    .init();
            }
        }
    }

    Ok(())
}

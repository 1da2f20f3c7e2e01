use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Directives for the console layer: `RUST_LOG` wins when set, otherwise
/// debug output from this crate with `verbose`, otherwise nothing.
fn console_directives(verbose: bool, env: Option<&str>) -> String {
    match env {
        Some(directives) if !directives.trim().is_empty() => directives.to_string(),
        _ if verbose => "cambio=debug".to_string(),
        _ => "off".to_string(),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

/// Console output is silent unless `verbose` or `RUST_LOG` is set. A log file,
/// when given, always receives INFO and above from this crate. A log file that
/// cannot be opened is reported through the console layer.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = console_directives(verbose, env.as_deref());
    let console_filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "cambio=debug" } else { "off" })
    });

    let console_layer = fmt::layer()
        .pretty()
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file = log_file.map(open_log_file).transpose();
    let (file_layer, file_error) = match file {
        Ok(file) => (
            file.map(|file| {
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(Targets::new().with_target("cambio", LevelFilter::INFO))
            }),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    if let Some(e) = file_error {
        tracing::error!("{e:#}");
    }
    Ok(())
}

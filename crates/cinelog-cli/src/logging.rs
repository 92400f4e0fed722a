use anyhow::Result;
use cinelog_config::LoggingConfig;
use std::io;
use std::io::IsTerminal;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub fn init_logging(verbose_level: u8, quiet: bool, config: &LoggingConfig) -> Result<()> {
    // 0 = config level, 1 = debug (hyper quieted), 2+ = trace
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        let default_filter = match verbose_level {
            0 => config.level.clone(),
            1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn".to_string(),
            _ => "trace".to_string(),
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    };

    let json = std::env::var("CINELOG_LOG_JSON")
        .map(|v| v == "true")
        .ok()
        .or(config.json)
        .unwrap_or_else(|| !io::stdout().is_terminal());

    let registry = Registry::default().with(filter);

    match &config.file {
        Some(log_path) => {
            let file_appender = rolling_appender(log_path)?;
            if json {
                let layer = fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(file_appender);
                registry.with(layer).init();
            } else {
                let layer = fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(file_appender);
                registry.with(layer).init();
            }
        }
        None if json => {
            let layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(io::stderr);
            registry.with(layer).init();
        }
        None => {
            let layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(io::stderr);
            registry.with(layer).init();
        }
    }

    Ok(())
}

/// Daily rotation: cinelog.log becomes cinelog.2026-01-17 and so on
fn rolling_appender(log_path: &Path) -> Result<RollingFileAppender> {
    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    std::fs::create_dir_all(log_dir)?;

    let log_filename = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;
    let log_prefix = log_filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(log_filename);

    Ok(RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix))
}

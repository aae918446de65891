use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S%.3fZ)(utc)} {h({l:<5})} {t} - {m}{n}";

/// Installs the global logger.
///
/// Diagnostics go to stderr so stdout carries only the run report; with a
/// `log_file` every entry is also appended there.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<log4rs::Handle> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut config = Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    if let Some(path) = log_file {
        let file = FileAppender::builder()
            .append(true)
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        config = config.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    let config = config
        .build(root.build(level))
        .context("Invalid logging configuration")?;
    let handle = log4rs::init_config(config).context("Logger already installed")?;
    Ok(handle)
}

//! Logger setup.
//!
//! Uses `log4rs.yml` when present so deployments can route and filter logs
//! without a rebuild. Otherwise logs go to stderr, keeping stdout clean for
//! CLI output.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

const STDERR_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";

/// Console-only config at `level`.
pub fn default_config(level: LevelFilter) -> Result<Config, Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(STDERR_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    Ok(config)
}

/// Initialize log4rs from `config_file` if it exists, else from [`default_config`].
pub fn init_logging(config_file: &Path, level: LevelFilter) -> Result<(), Box<dyn Error>> {
    if config_file.is_file() {
        log4rs::init_file(config_file, Default::default())
            .map_err(|e| format!("Error initializing log4rs from {}: {e}", config_file.display()))?;
        log::debug!("Logging configured from {}", config_file.display());
        return Ok(());
    }
    log4rs::init_config(default_config(level)?)?;
    Ok(())
}

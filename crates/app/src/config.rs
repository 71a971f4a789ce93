//! Host configuration from the environment

use std::path::PathBuf;

use jpainter_config::{ConfigError, PainterConfig};
use tracing::info;

/// Path to a JSON painter config. Defaults are used when unset.
pub const CONFIG_ENV: &str = "JPAINTER_CONFIG";
/// Directory snapshots are saved into
pub const OUTPUT_ENV: &str = "JPAINTER_OUT";
pub const DEFAULT_OUTPUT_DIR: &str = "paintings";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub painter: PainterConfig,
    pub output_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let painter = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                info!("Loading config from {}", PathBuf::from(&path).display());
                PainterConfig::load(path)?
            }
            None => PainterConfig::default(),
        };
        let output_dir = std::env::var_os(OUTPUT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            painter,
            output_dir,
        })
    }
}

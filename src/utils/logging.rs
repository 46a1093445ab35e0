//! Structured logging setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to every
//! target. Only the first successful call installs a subscriber, later calls
//! leave it in place.

use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};

/// Install the global `tracing` subscriber described by `config`
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let problems = config.validate();
    if !problems.is_empty() {
        return Err(ProtocolError::ConfigError(problems.join("; ")));
    }

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.log_level).into())
        .from_env_lossy();

    let installed = if config.json_format {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init()
            .is_ok()
    };

    if installed {
        info!(
            app = %config.app_name,
            level = %config.log_level,
            json = config.json_format,
            "Logging initialized"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let config = LoggingConfig::default();
        init_logging(&config).unwrap();
        init_logging(&config).unwrap();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LoggingConfig {
            app_name: String::new(),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            init_logging(&config),
            Err(ProtocolError::ConfigError(_))
        ));
    }
}

//! Logging initialization
//!
//! Structured logging via tracing. The filter comes from `WIREUP_LOG` when
//! set, otherwise from the configured level; output is human-readable by
//! default with a JSON branch for log shippers.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};
use wireup::{Error, Result};

use crate::config::LoggingConfig;

/// Environment variable holding an explicit filter directive
pub const LOG_FILTER_ENV: &str = "WIREUP_LOG";

/// Install the global tracing subscriber
///
/// Fails if a subscriber is already installed for this process.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = if config.json_format {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|err| Error::Configuration {
        message: "failed to install tracing subscriber".to_string(),
        source: Some(Box::new(err)),
    })
}

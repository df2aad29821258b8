pub mod app_config;
pub mod auction;
pub mod config;
pub mod counties;
pub mod money;

pub use app_config::{AppConfig, ProxyConfig};
pub use auction::{CleanedAuction, CSV_COLUMNS, SHEET_COLUMNS, THIRD_PARTY_BIDDER};
pub use config::{load_app_config, load_app_config_from_env};
pub use counties::{load_counties, CountiesFile, CountyConfig};
pub use money::{format_currency, parse_currency, CurrencyError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read counties file {path}: {source}")]
    CountiesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse counties file: {0}")]
    CountiesFileParse(#[from] serde_yaml::Error),

    #[error("counties file validation failed: {0}")]
    Validation(String),
}

//! Configuration management

use serde::{Deserialize, Serialize};

use crate::combiner::CombinerConfig;
use crate::error::Result;

/// Environment variable prefix, e.g. `ENSEMBLE__COMBINER__MODE=corrected`
pub const ENV_PREFIX: &str = "ENSEMBLE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub combiner: CombinerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "ensemble_combiner=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load from an optional TOML file, then `.env`, then `ENSEMBLE__*`
    /// environment variables. A missing file yields defaults.
    pub fn load(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(path, Self::environment())
    }

    /// Load from an optional TOML file layered under `env`. Values in `env`
    /// win over the file.
    pub fn load_from(path: &str, env: ::config::Environment) -> Result<Self> {
        let path = shellexpand::tilde(path).to_string();
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(&path).required(false))
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// `ENSEMBLE__SECTION__KEY` environment source over the process environment
    pub fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }
}

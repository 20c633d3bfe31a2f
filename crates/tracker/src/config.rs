//! Tracker configuration.

use promo_core::{ClientEnvironment, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use store_client::StoreConfig;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PROMO";

/// Tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub store: StoreConfig,

    /// User agent stamped on interaction records
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Referrer stamped on interaction records
    #[serde(default)]
    pub referrer: Option<String>,
}

fn default_user_agent() -> String {
    format!("promo-tracker/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            user_agent: default_user_agent(),
            referrer: None,
        }
    }
}

impl TrackerConfig {
    /// Loads `config/default.toml` (if present) and the process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Some("config/default"), std::env::vars().collect())
    }

    /// Layers defaults, an optional TOML file, then `PROMO__*` variables,
    /// then the flat `PROMO_*` overrides.
    pub fn load_from(file: Option<&str>, vars: HashMap<String, String>) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .map_err(|e| Error::config(format!("failed to encode defaults: {}", e)))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(file) = file {
            builder = builder.add_source(
                config::File::with_name(file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        let built = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(Some(vars.clone())),
            )
            .build()
            .map_err(|e| Error::config(format!("failed to build configuration: {}", e)))?;

        let mut config: Self = built
            .try_deserialize()
            .map_err(|e| Error::config(format!("failed to deserialize configuration: {}", e)))?;

        // Flat names are what deployment dashboards usually set
        if let Some(url) = vars.get("PROMO_STORE_URL") {
            config.store.url = url.clone();
        }
        if let Some(key) = vars.get("PROMO_STORE_API_KEY") {
            config.store.api_key = key.clone();
        }
        if let Some(timeout) = vars.get("PROMO_STORE_TIMEOUT_SECS") {
            config.store.timeout_secs = timeout.parse().map_err(|_| {
                Error::config(format!("PROMO_STORE_TIMEOUT_SECS is not a number: {}", timeout))
            })?;
        }
        if let Some(ua) = vars.get("PROMO_USER_AGENT") {
            config.user_agent = ua.clone();
        }
        if let Some(referrer) = vars.get("PROMO_REFERRER") {
            config.referrer = Some(referrer.clone());
        }

        config.store.validate()?;
        Ok(config)
    }

    pub fn environment(&self) -> ClientEnvironment {
        ClientEnvironment::new(self.user_agent.clone(), self.referrer.clone())
    }
}

//! Store configuration.

use promo_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// REST backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public (anon) API key sent with every request
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Checks the URL is an absolute http(s) URL and a key is set.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| Error::config(format!("invalid store url {:?}: {}", self.url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "store url must be http or https, got {}",
                parsed.scheme()
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(Error::config("store api_key is empty"));
        }

        if self.timeout_secs == 0 {
            return Err(Error::config("store timeout_secs must be positive"));
        }

        Ok(())
    }

    /// Base URL of the REST interface, without a trailing slash.
    pub fn rest_base(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }
}

//! HTTP client for the hosted REST tables.

use crate::config::StoreConfig;
use promo_core::{Collection, Error, Result};
use std::time::Duration;
use tracing::info;

/// Client for a PostgREST-style table API.
#[derive(Clone)]
pub struct RestStore {
    http: reqwest::Client,
    config: StoreConfig,
}

impl RestStore {
    /// Creates a new client after validating the configuration.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        info!(url = %config.url, timeout_secs = config.timeout_secs, "Created REST store client");

        Ok(Self { http, config })
    }

    /// URL that accepts inserts for a table.
    pub fn table_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.config.rest_base(), collection)
    }

    /// Request builder with the auth headers the backend expects.
    pub(crate) fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

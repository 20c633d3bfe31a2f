//! Store health checks.

use crate::client::RestStore;
use reqwest::Method;
use telemetry::health;
use tracing::{debug, warn};

/// Probes the REST root and records the result in the health registry.
///
/// Any answer below 500 counts as reachable: the anon key may not be
/// allowed to read the schema, but the backend is up.
pub async fn check_connection(store: &RestStore) -> bool {
    let url = format!("{}/", store.config().rest_base());

    match store.request(Method::GET, &url).send().await {
        Ok(response) if !response.status().is_server_error() => {
            debug!(status = %response.status(), "Store connection healthy");
            health().store.set_healthy();
            true
        }
        Ok(response) => {
            let msg = format!("store answered {}", response.status());
            warn!("Store health check failed: {}", msg);
            health().store.set_unhealthy(msg);
            false
        }
        Err(e) => {
            warn!("Store health check failed: {}", e);
            health().store.set_unhealthy(e.to_string());
            false
        }
    }
}

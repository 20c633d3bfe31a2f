//! Single-record inserts.

use crate::client::RestStore;
use async_trait::async_trait;
use promo_core::{Collection, Error, Record, Result, StoredEvent};
use reqwest::Method;
use std::time::Instant;
use telemetry::metrics;
use tracing::debug;

/// Insert-only view of the analytics backend.
///
/// Implementations report success or a STORE_* error and never retry.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends one record to a table.
    async fn insert(&self, collection: Collection, record: Record) -> Result<()>;
}

#[async_trait]
impl RecordStore for RestStore {
    async fn insert(&self, collection: Collection, record: Record) -> Result<()> {
        let url = self.table_url(collection);
        let start = Instant::now();

        let result = self
            .request(Method::POST, &url)
            .header("Prefer", "return=minimal")
            .json(&record)
            .send()
            .await;

        metrics()
            .store_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        let response = result.map_err(|e| {
            metrics().store_errors.inc();
            Error::transport(format!("insert into {} failed: {}", collection, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            metrics().store_errors.inc();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::rejected(
                status.as_u16(),
                format!("{} rejected insert ({}): {}", collection, status, body),
            ));
        }

        debug!(
            table = %collection,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Inserted record"
        );
        Ok(())
    }
}

/// Validates an event and inserts it into its own table.
pub async fn insert_event<E: StoredEvent + Sync>(store: &dyn RecordStore, event: &E) -> Result<()> {
    let record = event.to_record()?;
    store.insert(E::COLLECTION, record).await
}

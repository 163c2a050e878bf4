use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::appointment::{AppointmentRecord, AppointmentRequest};
use crate::services::store::{KeyValueStore, StoreError};
use crate::services::transport::{AppointmentTransport, TransportError, TransportReceipt};

pub const DEFAULT_APPOINTMENTS_KEY: &str = "appointments";

/// Persists appointments as a JSON list in one key-value store slot.
///
/// Entries of other shapes already in the list are kept as they are.
pub struct LocalTransport {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl LocalTransport {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Every entry of the stored list, whatever its shape.
    ///
    /// An absent or blank slot, or one that is not a JSON array, reads as an
    /// empty list.
    pub fn entries(&self) -> Result<Vec<Value>, StoreError> {
        read_entries(self.store.as_ref(), &self.key)
    }

    /// The stored entries that parse as [`AppointmentRecord`]s.
    pub fn load(&self) -> Result<Vec<AppointmentRecord>, StoreError> {
        Ok(self
            .entries()?
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect())
    }

    /// Append one record and write the list back. Returns the list length.
    pub fn append(&self, record: &AppointmentRecord) -> Result<usize, TransportError> {
        append_entry(self.store.as_ref(), &self.key, record)
    }
}

fn read_entries(store: &dyn KeyValueStore, key: &str) -> Result<Vec<Value>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(entries)) => Ok(entries),
        Ok(_) => {
            warn!(key = %key, "Discarding appointment slot that is not a list");
            Ok(Vec::new())
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Discarding unreadable appointment list");
            Ok(Vec::new())
        }
    }
}

fn append_entry(
    store: &dyn KeyValueStore,
    key: &str,
    record: &AppointmentRecord,
) -> Result<usize, TransportError> {
    let mut entries = read_entries(store, key)?;
    entries.push(serde_json::to_value(record)?);
    store.set(key, &serde_json::to_string(&entries)?)?;
    Ok(entries.len())
}

#[async_trait]
impl AppointmentTransport for LocalTransport {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn deliver(&self, request: &AppointmentRequest) -> Result<TransportReceipt, TransportError> {
        let record = AppointmentRecord::new(request.clone());
        let id = record.id;

        // Store access may hit the filesystem; keep it off the async workers.
        let store = self.store.clone();
        let key = self.key.clone();
        let total =
            tokio::task::spawn_blocking(move || append_entry(store.as_ref(), &key, &record))
                .await??;

        info!(record_id = %id, stored = total, "Appointment stored locally");

        Ok(TransportReceipt {
            record_id: Some(id.to_string()),
        })
    }
}

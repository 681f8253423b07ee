//! Snapshot capture and the portable backup document.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BillingError, Result};
use crate::fs::write_atomic;
use crate::store::KeyValueStore;

/// Application name recorded in every snapshot.
pub const APP_NAME: &str = "Billing-App";

/// Snapshot document schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Store keys captured by a snapshot. Exactly the keys the application
/// persists.
pub const ALLOWLIST_KEYS: [&str; 11] = [
    "cart",
    "products",
    "accounts",
    "bills",
    "shopName",
    "shopAddress",
    "shopPhone",
    "shopGST",
    "upiId",
    "pin",
    "logoImage",
];

/// Point-in-time export of the allow-listed keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// `snap-<ISO-8601 timestamp>`
    pub id: String,
    pub meta: SnapshotMeta,
    /// Every allow-listed key; `null` when the key was absent at capture
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub created_at: DateTime<Utc>,
    #[serde(rename = "app")]
    pub app_name: String,
    #[serde(rename = "version")]
    pub schema_version: u32,
}

/// Capture the allow-listed keys as of now.
pub fn build_snapshot<S: KeyValueStore + ?Sized>(store: &S) -> Snapshot {
    build_snapshot_at(store, Utc::now())
}

/// Capture the allow-listed keys, stamping the snapshot with `now`.
///
/// Never fails: a value that is not valid JSON is captured as its raw text.
pub fn build_snapshot_at<S: KeyValueStore + ?Sized>(store: &S, now: DateTime<Utc>) -> Snapshot {
    let mut data = Map::new();
    for key in ALLOWLIST_KEYS {
        let value = match store.get_raw(key) {
            None => Value::Null,
            Some(raw) => serde_json::from_str::<Value>(&raw).unwrap_or_else(|err| {
                tracing::debug!(key, error = %err, "capturing unparseable value as raw text");
                Value::String(raw)
            }),
        };
        data.insert(key.to_string(), value);
    }

    let snapshot = Snapshot {
        id: format!("snap-{}", now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        meta: SnapshotMeta {
            created_at: now,
            app_name: APP_NAME.to_string(),
            schema_version: SCHEMA_VERSION,
        },
        data,
    };
    tracing::debug!(id = %snapshot.id, "built snapshot");
    snapshot
}

/// Pretty-printed UTF-8 JSON document for `snapshot`.
pub fn document_bytes(snapshot: &Snapshot) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot)
        .map_err(|e| BillingError::Storage(format!("Failed to encode snapshot: {}", e)))
}

/// File name for a document exported at `now`; safe on every filesystem.
pub fn document_file_name(now: DateTime<Utc>) -> String {
    format!(
        "billing-backup-{}.json",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace(':', "-")
    )
}

/// Write the document for `snapshot` into `dir`, returning its path.
pub fn write_document(snapshot: &Snapshot, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(document_file_name(snapshot.meta.created_at));
    let bytes = document_bytes(snapshot)?;
    write_atomic(&path, &bytes).map_err(|e| {
        BillingError::Storage(format!("Failed to write backup {}: {}", path.display(), e))
    })?;
    tracing::debug!(path = %path.display(), "wrote backup document");
    Ok(path)
}

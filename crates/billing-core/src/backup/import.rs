//! Merging snapshot data back into the primary store.
//!
//! A document must pass validation before any key is touched. After that,
//! every key is written independently and a failure on one key does not
//! stop the rest.

use serde_json::{Map, Value};

use crate::error::{BillingError, Result};
use crate::store::KeyValueStore;

use super::snapshot::Snapshot;

/// Conflict policy for keys that already hold a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Replace existing values instead of keeping them
    pub overwrite: bool,
}

impl ImportOptions {
    pub fn overwrite(overwrite: bool) -> Self {
        Self { overwrite }
    }
}

/// Per-key outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub written: Vec<String>,
    /// Keys left alone because they already held a value
    pub skipped: Vec<String>,
    /// Keys whose write and fallback write both failed
    pub failed: Vec<String>,
}

/// Check that `doc` is an object carrying a `data` object.
///
/// # Errors
///
/// Returns `BillingError::InvalidFormat` otherwise.
pub fn validate(doc: &Value) -> Result<&Map<String, Value>> {
    let object = doc.as_object().ok_or_else(|| {
        BillingError::InvalidFormat("backup document must be a JSON object".to_string())
    })?;
    object
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            BillingError::InvalidFormat("backup document has no `data` object".to_string())
        })
}

/// Import the `data` mapping of an untyped snapshot-like document.
pub fn import_into<S: KeyValueStore + ?Sized>(
    store: &S,
    doc: &Value,
    options: ImportOptions,
) -> Result<ImportReport> {
    let data = validate(doc)?;
    Ok(apply(store, data, options))
}

/// Parse `bytes` as JSON, then [`import_into`].
///
/// # Errors
///
/// Returns `BillingError::InvalidJson` if the bytes do not parse, or
/// `BillingError::InvalidFormat` if the parsed document is rejected.
pub fn import_from_document<S: KeyValueStore + ?Sized>(
    store: &S,
    bytes: &[u8],
    options: ImportOptions,
) -> Result<ImportReport> {
    let doc: Value = serde_json::from_slice(bytes)
        .map_err(|e| BillingError::InvalidJson(format!("backup document: {}", e)))?;
    import_into(store, &doc, options)
}

/// Import an already-typed snapshot.
pub fn import_snapshot<S: KeyValueStore + ?Sized>(
    store: &S,
    snapshot: &Snapshot,
    options: ImportOptions,
) -> ImportReport {
    apply(store, &snapshot.data, options)
}

fn apply<S: KeyValueStore + ?Sized>(
    store: &S,
    data: &Map<String, Value>,
    options: ImportOptions,
) -> ImportReport {
    let mut report = ImportReport::default();
    for (key, value) in data {
        let occupied = store.get_raw(key).is_some_and(|raw| !raw.is_empty());
        if occupied && !options.overwrite {
            report.skipped.push(key.clone());
            continue;
        }

        let primary = serde_json::to_string(value)
            .map_err(BillingError::from)
            .and_then(|encoded| store.set_raw(key, &encoded));
        let outcome = primary.or_else(|err| {
            tracing::warn!(key = %key, error = %err, "import write failed; retrying raw value");
            store.set_raw(key, &raw_text(value))
        });

        match outcome {
            Ok(()) => report.written.push(key.clone()),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "import skipped key after fallback failed");
                report.failed.push(key.clone());
            }
        }
    }

    tracing::debug!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        overwrite = options.overwrite,
        "import finished"
    );
    report
}

/// Unencoded text for the fallback write: strings as-is, others as JSON.
fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::Mutex;

    /// Rejects JSON-encoded writes for one key, accepting only its raw form.
    struct PickyStore {
        inner: MemoryStore,
        picky_key: &'static str,
        reject_all: bool,
        attempts: Mutex<Vec<String>>,
    }

    impl KeyValueStore for PickyStore {
        fn get_raw(&self, key: &str) -> Option<String> {
            self.inner.get_raw(key)
        }

        fn set_raw(&self, key: &str, raw: &str) -> Result<()> {
            self.attempts.lock().unwrap().push(key.to_string());
            if key == self.picky_key && (self.reject_all || raw.starts_with('"')) {
                return Err(BillingError::Storage("quota exceeded".to_string()));
            }
            self.inner.set_raw(key, raw)
        }

        fn remove_raw(&self, key: &str) -> Result<()> {
            self.inner.remove_raw(key)
        }

        fn keys(&self) -> Vec<String> {
            self.inner.keys()
        }
    }

    #[test]
    fn test_overwrite_policy() {
        let store = MemoryStore::with_entries([("shopName", "\"A\"")]);
        let doc = json!({ "data": { "shopName": "B" } });

        let report = import_into(&store, &doc, ImportOptions::default()).unwrap();
        assert_eq!(store.get_raw("shopName").as_deref(), Some("\"A\""));
        assert_eq!(report.skipped, vec!["shopName".to_string()]);

        let report = import_into(&store, &doc, ImportOptions::overwrite(true)).unwrap();
        assert_eq!(store.get_raw("shopName").as_deref(), Some("\"B\""));
        assert_eq!(report.written, vec!["shopName".to_string()]);
    }

    #[test]
    fn test_empty_existing_value_counts_as_absent() {
        let store = MemoryStore::with_entries([("pin", "")]);
        import_into(&store, &json!({ "data": { "pin": "1234" } }), ImportOptions::default())
            .unwrap();
        assert_eq!(store.get_raw("pin").as_deref(), Some("\"1234\""));
    }

    #[test]
    fn test_malformed_documents_rejected_without_writes() {
        let store = MemoryStore::new();
        for doc in [
            json!({}),
            json!({ "data": "not-an-object" }),
            json!([{ "data": {} }]),
            json!(null),
            json!({ "data": [1, 2] }),
        ] {
            let err = import_into(&store, &doc, ImportOptions::overwrite(true)).unwrap_err();
            assert!(matches!(err, BillingError::InvalidFormat(_)), "{:?}", doc);
        }
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_invalid_json_bytes() {
        let store = MemoryStore::new();
        let err = import_from_document(&store, b"{ nope", ImportOptions::default()).unwrap_err();
        assert!(matches!(err, BillingError::InvalidJson(_)));
        assert_eq!(err.code(), "invalid-json");
    }

    #[test]
    fn test_document_bytes_import() {
        let store = MemoryStore::new();
        let bytes = br#"{"id":"snap-x","data":{"cart":[{"sku":"A1","qty":2}],"logoImage":null}}"#;
        let report = import_from_document(&store, bytes, ImportOptions::default()).unwrap();

        assert_eq!(report.written.len(), 2);
        let cart: Value = serde_json::from_str(&store.get_raw("cart").unwrap()).unwrap();
        assert_eq!(cart, json!([{ "sku": "A1", "qty": 2 }]));
        assert_eq!(store.get_raw("logoImage").as_deref(), Some("null"));
    }

    #[test]
    fn test_failed_key_falls_back_to_raw_value() {
        let store = PickyStore {
            inner: MemoryStore::new(),
            picky_key: "shopName",
            reject_all: false,
            attempts: Mutex::new(Vec::new()),
        };
        let doc = json!({ "data": { "shopName": "Corner Garage", "upiId": "shop@upi" } });

        let report = import_into(&store, &doc, ImportOptions::default()).unwrap();

        assert_eq!(store.get_raw("shopName").as_deref(), Some("Corner Garage"));
        assert_eq!(store.get_raw("upiId").as_deref(), Some("\"shop@upi\""));
        assert!(report.failed.is_empty());
        assert_eq!(
            store.attempts.lock().unwrap().iter().filter(|k| *k == "shopName").count(),
            2
        );
    }

    #[test]
    fn test_failure_on_one_key_does_not_stop_others() {
        let store = PickyStore {
            inner: MemoryStore::new(),
            picky_key: "bills",
            reject_all: true,
            attempts: Mutex::new(Vec::new()),
        };
        let doc = json!({ "data": { "bills": [], "cart": [], "pin": "0000" } });

        let report = import_into(&store, &doc, ImportOptions::default()).unwrap();

        assert_eq!(report.failed, vec!["bills".to_string()]);
        assert_eq!(report.written, vec!["cart".to_string(), "pin".to_string()]);
        assert!(store.get_raw("bills").is_none());
    }
}

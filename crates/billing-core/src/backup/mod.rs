//! Backup and restore.
//!
//! - **snapshot**: capture of the allow-listed keys and the document format
//! - **import**: validated, per-key merge of snapshot data into the store
//! - **snapshot_store**: asynchronous store of named snapshots
//! - **manager**: the operations front ends call

mod import;
mod manager;
mod snapshot;
mod snapshot_store;

pub use import::{
    import_from_document, import_into, import_snapshot, validate, ImportOptions, ImportReport,
};
pub use manager::BackupManager;
pub use snapshot::{
    build_snapshot, build_snapshot_at, document_bytes, document_file_name, write_document,
    Snapshot, SnapshotMeta, ALLOWLIST_KEYS, APP_NAME, SCHEMA_VERSION,
};
pub use snapshot_store::SnapshotStore;

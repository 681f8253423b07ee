//! Backup operations exposed to front ends.
//!
//! [`BackupManager`] pairs the primary store with an optional snapshot
//! store. When the snapshot store could not be opened the manager still
//! exports and imports documents; listing reports no snapshots and the
//! other snapshot operations fail with `StorageUnavailable`.

use std::path::{Path, PathBuf};

use crate::error::{BillingError, Result};
use crate::store::KeyValueStore;

use super::import::{import_from_document, ImportOptions, ImportReport};
use super::snapshot::{build_snapshot, write_document, Snapshot};
use super::snapshot_store::SnapshotStore;

pub struct BackupManager<S> {
    store: S,
    snapshots: Option<SnapshotStore>,
}

impl<S: KeyValueStore> BackupManager<S> {
    pub fn new(store: S, snapshots: Option<SnapshotStore>) -> Self {
        Self { store, snapshots }
    }

    /// Build a manager, opening the snapshot database at `snapshot_path`.
    ///
    /// An unopenable snapshot database is logged and tolerated.
    pub async fn connect(store: S, snapshot_path: &Path) -> Self {
        let snapshots = match SnapshotStore::open(snapshot_path).await {
            Ok(snapshots) => Some(snapshots),
            Err(err) => {
                tracing::warn!(
                    path = %snapshot_path.display(),
                    error = %err,
                    "snapshot store unavailable; local snapshots disabled"
                );
                None
            }
        };
        Self::new(store, snapshots)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshots_available(&self) -> bool {
        self.snapshots.is_some()
    }

    fn snapshot_store(&self) -> Result<&SnapshotStore> {
        self.snapshots.as_ref().ok_or_else(|| {
            BillingError::StorageUnavailable("snapshot store is not available".to_string())
        })
    }

    /// Capture the store and write a backup document into `dir`.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let snapshot = build_snapshot(&self.store);
        write_document(&snapshot, dir)
    }

    /// Capture the store into the snapshot store.
    pub async fn save_snapshot(&self) -> Result<Snapshot> {
        let snapshots = self.snapshot_store()?;
        let snapshot = build_snapshot(&self.store);
        snapshots.put(&snapshot).await?;
        Ok(snapshot)
    }

    /// Stored snapshots, newest first; empty when the snapshot store fails.
    pub async fn list_snapshots(&self) -> Vec<Snapshot> {
        let Some(snapshots) = self.snapshots.as_ref() else {
            return Vec::new();
        };
        match snapshots.list_all().await {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list snapshots");
                Vec::new()
            }
        }
    }

    pub async fn delete_snapshot(&self, id: &str) -> Result<()> {
        self.snapshot_store()?.delete(id).await
    }

    pub async fn restore_snapshot(&self, id: &str, options: ImportOptions) -> Result<ImportReport> {
        self.snapshot_store()?
            .restore(id, &self.store, options)
            .await
    }

    /// Import a backup document from raw bytes.
    pub fn import_document(&self, bytes: &[u8], options: ImportOptions) -> Result<ImportReport> {
        import_from_document(&self.store, bytes, options)
    }

    /// Import a backup document from a file.
    pub fn import_file(&self, path: &Path, options: ImportOptions) -> Result<ImportReport> {
        let bytes = std::fs::read(path).map_err(|e| {
            BillingError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.import_document(&bytes, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_degrades_without_snapshot_store() {
        let manager = BackupManager::new(MemoryStore::new(), None);

        assert!(!manager.snapshots_available());
        assert!(manager.list_snapshots().await.is_empty());
        let err = manager.save_snapshot().await.unwrap_err();
        assert!(matches!(err, BillingError::StorageUnavailable(_)));
        let err = manager
            .restore_snapshot("snap-x", ImportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn test_connect_tolerates_bad_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let manager = BackupManager::connect(MemoryStore::new(), &blocker.join("db")).await;
        assert!(!manager.snapshots_available());
    }

    #[tokio::test]
    async fn test_export_then_import_file() {
        let dir = tempdir().unwrap();
        let source = BackupManager::new(
            MemoryStore::with_entries([("shopName", "\"Corner Garage\"")]),
            None,
        );
        let path = source.export_to_dir(dir.path()).unwrap();

        let target = BackupManager::new(MemoryStore::new(), None);
        let report = target.import_file(&path, ImportOptions::default()).unwrap();

        assert_eq!(report.written.len(), 11);
        assert_eq!(
            target.store().get_raw("shopName").as_deref(),
            Some("\"Corner Garage\"")
        );
    }

    #[tokio::test]
    async fn test_save_list_restore_delete() {
        let snapshots = SnapshotStore::open_in_memory().await.unwrap();
        let manager = BackupManager::new(
            MemoryStore::with_entries([("upiId", "\"shop@upi\"")]),
            Some(snapshots),
        );

        let saved = manager.save_snapshot().await.unwrap();
        manager.store().remove_raw("upiId").unwrap();

        let listed = manager.list_snapshots().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);

        manager
            .restore_snapshot(&saved.id, ImportOptions::default())
            .await
            .unwrap();
        assert_eq!(manager.store().get_raw("upiId").as_deref(), Some("\"shop@upi\""));

        manager.delete_snapshot(&saved.id).await.unwrap();
        assert!(manager.list_snapshots().await.is_empty());
    }
}

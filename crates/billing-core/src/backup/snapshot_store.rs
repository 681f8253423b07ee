//! SQLite-backed snapshot store.
//!
//! Independent of the primary key-value store. Every operation runs on the
//! tokio blocking pool against a single connection guarded by a mutex, so
//! callers await it without stalling the runtime and conflicting writes to
//! the same id are serialized.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::SecondsFormat;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;

use crate::error::{BillingError, Result};
use crate::store::KeyValueStore;

use super::import::{import_snapshot, ImportOptions, ImportReport};
use super::snapshot::Snapshot;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS snapshots (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    body TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS snapshots_created_at ON snapshots (created_at);";

/// Keyed record store holding any number of snapshots.
#[derive(Clone)]
pub struct SnapshotStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore").finish_non_exhaustive()
    }
}

impl SnapshotStore {
    fn sqlite_error(err: rusqlite::Error) -> BillingError {
        BillingError::Storage(format!("SQLite error: {}", err))
    }

    fn unavailable(err: impl std::fmt::Display) -> BillingError {
        BillingError::StorageUnavailable(err.to_string())
    }

    /// Open (creating when missing) the snapshot database at `path`.
    ///
    /// Safe to call repeatedly on the same path.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::StorageUnavailable` if the database cannot be
    /// opened or initialized.
    pub async fn open(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        let conn = task::spawn_blocking(move || -> Result<Connection> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(Self::unavailable)?;
            }
            let conn = Connection::open(&path).map_err(Self::unavailable)?;
            Self::ensure_schema(&conn).map_err(Self::unavailable)?;
            tracing::debug!(path = %path.display(), "opened snapshot store");
            Ok(conn)
        })
        .await
        .map_err(|e| BillingError::StorageUnavailable(format!("open task failed: {}", e)))??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a private in-memory snapshot database.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Self::unavailable)?;
        Self::ensure_schema(&conn).map_err(Self::unavailable)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(SCHEMA)
    }

    fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
        conn.lock()
            .map_err(|_| BillingError::Storage("Snapshot connection poisoned".to_string()))
    }

    /// Run `op` against the connection on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let mut guard = Self::lock(&conn)?;
            op(&mut *guard)
        })
        .await
        .map_err(|e| BillingError::Storage(format!("snapshot task failed: {}", e)))?
    }

    /// Persist `snapshot`, replacing any snapshot with the same id.
    pub async fn put(&self, snapshot: &Snapshot) -> Result<String> {
        let id = snapshot.id.clone();
        let created_at = snapshot
            .meta
            .created_at
            .to_rfc3339_opts(SecondsFormat::Nanos, true);
        let body = serde_json::to_string(snapshot)
            .map_err(|e| BillingError::Storage(format!("Failed to encode snapshot: {}", e)))?;

        let stored_id = id.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO snapshots (id, created_at, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET created_at = excluded.created_at, body = excluded.body",
                params![stored_id, created_at, body],
            )
            .map_err(Self::sqlite_error)?;
            Ok(())
        })
        .await?;

        tracing::debug!(id = %id, "saved snapshot");
        Ok(id)
    }

    /// Every stored snapshot, most recent first. Unreadable rows are skipped.
    pub async fn list_all(&self) -> Result<Vec<Snapshot>> {
        self.run(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, body FROM snapshots ORDER BY created_at DESC, id DESC")
                .map_err(Self::sqlite_error)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
                .map_err(Self::sqlite_error)?;

            let mut snapshots = Vec::new();
            for row in rows {
                let (id, body) = row.map_err(Self::sqlite_error)?;
                match serde_json::from_str::<Snapshot>(&body) {
                    Ok(snapshot) => snapshots.push(snapshot),
                    Err(err) => tracing::warn!(id = %id, error = %err, "skipping unreadable snapshot"),
                }
            }
            Ok(snapshots)
        })
        .await
    }

    /// Fetch one snapshot.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::NotFound` if no snapshot has this id.
    pub async fn get(&self, id: &str) -> Result<Snapshot> {
        let id = id.to_string();
        self.run(move |conn| {
            let body: Option<String> = conn
                .query_row(
                    "SELECT body FROM snapshots WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(Self::sqlite_error)?;
            let body = body.ok_or_else(|| BillingError::NotFound(format!("snapshot {}", id)))?;
            serde_json::from_str(&body)
                .map_err(|e| BillingError::Storage(format!("Snapshot {} is corrupt: {}", id, e)))
        })
        .await
    }

    /// Remove a snapshot. Removing an unknown id succeeds.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        let removed = self
            .run({
                let id = id.clone();
                move |conn| {
                    conn.execute("DELETE FROM snapshots WHERE id = ?1", params![id])
                        .map_err(Self::sqlite_error)
                }
            })
            .await?;
        tracing::debug!(id = %id, removed, "deleted snapshot");
        Ok(())
    }

    /// Import a stored snapshot into `store`.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::NotFound` (leaving `store` untouched) if no
    /// snapshot has this id.
    pub async fn restore<S: KeyValueStore + ?Sized>(
        &self,
        id: &str,
        store: &S,
        options: ImportOptions,
    ) -> Result<ImportReport> {
        let snapshot = self.get(id).await?;
        let report = import_snapshot(store, &snapshot, options);
        tracing::debug!(id = %id, written = report.written.len(), "restored snapshot");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::snapshot::build_snapshot_at;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn snapshot_at(hour: u32) -> Snapshot {
        let store = MemoryStore::with_entries([("shopName", format!("\"Shop {}\"", hour))]);
        build_snapshot_at(&store, Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let snapshots = SnapshotStore::open_in_memory().await.unwrap();
        assert!(snapshots.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let snapshots = SnapshotStore::open_in_memory().await.unwrap();
        for hour in [9, 7, 8] {
            snapshots.put(&snapshot_at(hour)).await.unwrap();
        }

        let listed = snapshots.list_all().await.unwrap();
        let hours: Vec<_> = listed
            .iter()
            .map(|s| s.data["shopName"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(hours, vec!["Shop 9", "Shop 8", "Shop 7"]);
    }

    #[tokio::test]
    async fn test_put_overwrites_same_id() {
        let snapshots = SnapshotStore::open_in_memory().await.unwrap();
        let mut snapshot = snapshot_at(9);
        snapshots.put(&snapshot).await.unwrap();
        snapshot.data.insert("pin".to_string(), serde_json::json!("4321"));
        let id = snapshots.put(&snapshot).await.unwrap();

        assert_eq!(id, snapshot.id);
        let listed = snapshots.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].data["pin"], "4321");
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let snapshots = SnapshotStore::open_in_memory().await.unwrap();
        let snapshot = snapshot_at(9);
        snapshots.put(&snapshot).await.unwrap();

        assert_eq!(snapshots.get(&snapshot.id).await.unwrap(), snapshot);

        snapshots.delete(&snapshot.id).await.unwrap();
        snapshots.delete(&snapshot.id).await.unwrap();
        let err = snapshots.get(&snapshot.id).await.unwrap_err();
        assert!(matches!(err, BillingError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_restore_missing_id_leaves_store_untouched() {
        let snapshots = SnapshotStore::open_in_memory().await.unwrap();
        let store = MemoryStore::with_entries([("cart", "[]")]);

        let err = snapshots
            .restore("snap-missing", &store, ImportOptions::overwrite(true))
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::NotFound(_)));
        assert_eq!(store.keys(), vec!["cart".to_string()]);
        assert_eq!(store.get_raw("cart").as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_open_is_repeatable_and_persistent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshots.sqlite3");

        let first = SnapshotStore::open(&path).await.unwrap();
        first.put(&snapshot_at(9)).await.unwrap();
        let second = SnapshotStore::open(&path).await.unwrap();

        assert_eq!(second.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_open_unusable_path_is_unavailable() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = SnapshotStore::open(&blocker.join("snapshots.sqlite3"))
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn test_concurrent_puts_do_not_corrupt() {
        let snapshots = SnapshotStore::open_in_memory().await.unwrap();
        let mut handles = Vec::new();
        for hour in 0..12 {
            let store = snapshots.clone();
            handles.push(tokio::spawn(async move {
                store.put(&snapshot_at(hour)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(snapshots.list_all().await.unwrap().len(), 12);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_interleaved_put_delete_list() {
        let snapshots = SnapshotStore::open_in_memory().await.unwrap();
        for hour in 0..6 {
            snapshots.put(&snapshot_at(hour)).await.unwrap();
        }

        let mut handles = Vec::new();
        for hour in 0..12 {
            let store = snapshots.clone();
            handles.push(tokio::spawn(async move {
                if hour < 6 {
                    if hour % 2 == 0 {
                        store.delete(&snapshot_at(hour).id).await?;
                    }
                } else {
                    store.put(&snapshot_at(hour)).await?;
                }
                store.list_all().await.map(|listed| listed.len())
            }));
        }
        for handle in handles {
            let seen = handle.await.unwrap().unwrap();
            assert!(seen <= 12);
        }

        let mut ids: Vec<String> = snapshots
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        ids.sort();
        let mut expected: Vec<String> = [1, 3, 5, 6, 7, 8, 9, 10, 11]
            .into_iter()
            .map(|hour| snapshot_at(hour).id)
            .collect();
        expected.sort();
        assert_eq!(ids, expected);
    }
}

//! In-memory product store implementation.
//!
//! Holds documents behind a mutex and replays the ordered snapshot to every
//! registered watcher after each committed change. Backs tests and local
//! development; the collection name only labels log lines and mirrors the
//! remote store's addressing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use log::{debug, info};
use shiftlog_core::expiration::{ProductItem, sort_by_expiration};
use uuid::Uuid;

use super::{Error, ProductStore, SnapshotFn, Watch};
use crate::config;

/// In-memory implementation of [`ProductStore`].
pub struct MemoryProductStore {
    collection: String,
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    products: Mutex<Vec<ProductItem>>,
    watchers: Mutex<Vec<(u64, SnapshotFn)>>,
    next_watcher: AtomicU64,
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProductStore {
    /// Creates an empty store over the default collection name.
    pub fn new() -> Self {
        Self::with_collection(config::DEFAULT_COLLECTION)
    }

    /// Creates an empty store labelled with the given collection name.
    pub fn with_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            inner: Arc::default(),
        }
    }

    fn snapshot(&self) -> Vec<ProductItem> {
        lock_or_recover(&self.inner.products).clone()
    }

    // Watchers must not call back into the store; the registry lock is held
    // while they run.
    fn notify_watchers(&self) {
        let snapshot = self.snapshot();
        let watchers = lock_or_recover(&self.inner.watchers);
        for (_, watcher) in watchers.iter() {
            watcher(snapshot.clone());
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    fn watch(&self, on_snapshot: SnapshotFn) -> Result<Watch, Error> {
        on_snapshot(self.snapshot());

        let token = self.inner.next_watcher.fetch_add(1, Ordering::Relaxed);
        lock_or_recover(&self.inner.watchers).push((token, on_snapshot));
        debug!("Registered watcher {} on {}", token, self.collection);

        let registry = Arc::downgrade(&self.inner);
        Ok(Watch::new(move || {
            if let Some(inner) = registry.upgrade() {
                lock_or_recover(&inner.watchers).retain(|(candidate, _)| *candidate != token);
            }
        }))
    }

    async fn insert(&self, product: ProductItem) -> Result<String, Error> {
        let id = Uuid::new_v4().to_string();
        {
            let mut products = lock_or_recover(&self.inner.products);
            products.push(ProductItem {
                id: id.clone(),
                ..product
            });
            sort_by_expiration(products.as_mut_slice());
        }
        info!("Inserted product {} into {}", id, self.collection);

        self.notify_watchers();
        Ok(id)
    }

    async fn delete<'store, 'id>(&'store self, product_id: &'id str) -> Result<(), Error> {
        let removed = {
            let mut products = lock_or_recover(&self.inner.products);
            let before = products.len();
            products.retain(|item| item.id != product_id);
            before != products.len()
        };

        if removed {
            info!("Deleted product {} from {}", product_id, self.collection);
            self.notify_watchers();
        } else {
            debug!(
                "Delete of unknown product {} in {} ignored",
                product_id, self.collection
            );
        }
        Ok(())
    }
}

fn lock_or_recover<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn product(name: &str, expiration_date: Option<NaiveDate>) -> ProductItem {
        ProductItem {
            id: String::new(),
            name: name.to_string(),
            barcode: "8800000000000".to_string(),
            expiration_date,
        }
    }

    fn recording_watcher() -> (Arc<Mutex<Vec<Vec<ProductItem>>>>, SnapshotFn) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let watcher: SnapshotFn = Box::new(move |snapshot| sink.lock().unwrap().push(snapshot));
        (seen, watcher)
    }

    #[tokio::test]
    async fn insert_assigns_a_fresh_unique_id() {
        let store = MemoryProductStore::new();

        let first = store.insert(product("milk", None)).await.unwrap();
        let second = store.insert(product("milk", None)).await.unwrap();

        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn insert_ignores_a_caller_supplied_id() {
        let store = MemoryProductStore::new();
        let mut item = product("milk", None);
        item.id = "caller-id".to_string();

        let assigned = store.insert(item).await.unwrap();

        assert_ne!(assigned, "caller-id");
    }

    #[tokio::test]
    async fn snapshots_are_ordered_with_dateless_items_last() {
        let store = MemoryProductStore::new();
        store
            .insert(product("undated", None))
            .await
            .unwrap();
        store
            .insert(product("later", Some(date(2025, 7, 1))))
            .await
            .unwrap();
        store
            .insert(product("sooner", Some(date(2025, 6, 1))))
            .await
            .unwrap();

        let (seen, watcher) = recording_watcher();
        let _watch = store.watch(watcher).unwrap();

        let snapshots = seen.lock().unwrap();
        let names: Vec<String> = snapshots[0].iter().map(|item| item.name.clone()).collect();
        assert_eq!(names, ["sooner", "later", "undated"]);
    }

    #[tokio::test]
    async fn watch_delivers_the_current_snapshot_immediately() {
        let store = MemoryProductStore::new();
        let (seen, watcher) = recording_watcher();

        let _watch = store.watch(watcher).unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(seen.lock().unwrap()[0].is_empty());
    }

    #[tokio::test]
    async fn watchers_see_every_committed_change() {
        let store = MemoryProductStore::new();
        let (seen, watcher) = recording_watcher();
        let _watch = store.watch(watcher).unwrap();

        let id = store
            .insert(product("milk", Some(date(2025, 6, 20))))
            .await
            .unwrap();
        store.delete(&id).await.unwrap();

        let snapshots = seen.lock().unwrap();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[1].len(), 1);
        assert!(snapshots[2].is_empty());
    }

    #[tokio::test]
    async fn a_dropped_watch_stops_receiving_snapshots() {
        let store = MemoryProductStore::new();
        let (seen, watcher) = recording_watcher();
        let watch = store.watch(watcher).unwrap();

        drop(watch);
        store.insert(product("milk", None)).await.unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_behaves_like_drop() {
        let store = MemoryProductStore::new();
        let (seen, watcher) = recording_watcher();
        let watch = store.watch(watcher).unwrap();

        watch.cancel();
        store.insert(product("milk", None)).await.unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_an_unknown_id_is_a_no_op_success() {
        let store = MemoryProductStore::new();
        let (seen, watcher) = recording_watcher();
        let _watch = store.watch(watcher).unwrap();

        let result = store.delete("missing").await;

        assert!(result.is_ok());
        // No change committed, so no snapshot beyond the initial one.
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}

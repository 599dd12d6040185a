//! Product store connectivity module for the expiration tracker.
//!
//! This module treats the remote document store as an external collaborator
//! behind the `ProductStore` trait: a live ordered query over the product
//! collection plus document creation and deletion. The store is the sole
//! writer of product truth; consumers only issue write requests and observe
//! snapshots.
//!
//! The module is implementation-agnostic. An in-memory implementation used
//! by tests and local development is provided in the `memory` submodule.

use async_trait::async_trait;
use shiftlog_core::expiration::ProductItem;
use thiserror::Error;

pub mod memory;

/// Errors that can occur while talking to the product store.
///
/// Write and delete failures are surfaced through this type instead of
/// being swallowed; a silently stale list is the failure mode this channel
/// exists to prevent.
#[derive(Error, Debug)]
pub enum Error {
    /// The live query could not be registered
    #[error("Cannot watch product collection")]
    CannotWatch,
    /// Document creation was rejected by the store
    #[error("Cannot insert product")]
    CannotInsert,
    /// Document deletion was rejected by the store
    #[error("Cannot delete product")]
    CannotDelete,
}

/// Callback invoked with the full ordered snapshot of the product
/// collection.
pub type SnapshotFn = Box<dyn Fn(Vec<ProductItem>) + Send + Sync>;

/// Cancellation handle for a live product query.
///
/// Cancelling, or simply dropping, the handle deregisters the snapshot
/// callback.
pub struct Watch {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Watch {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the live query.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Watch {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

/// Trait for abstracting product store interactions.
///
/// Implementations own the collection ordering: snapshots arrive sorted
/// ascending by expiration date with dateless items after all dated ones.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Registers a live query over the product collection.
    ///
    /// The callback receives the current snapshot immediately and again
    /// after every committed change, until the returned handle is
    /// cancelled or dropped.
    fn watch(&self, on_snapshot: SnapshotFn) -> Result<Watch, Error>;

    /// Creates a product document and returns the id the store assigned.
    /// Any id already present on the item is ignored.
    async fn insert(&self, product: ProductItem) -> Result<String, Error>;

    /// Deletes the document with the given id. Deleting an id that is not
    /// present is a no-op success.
    async fn delete<'store, 'id>(&'store self, product_id: &'id str) -> Result<(), Error>;
}

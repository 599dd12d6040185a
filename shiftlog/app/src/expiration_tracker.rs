//! View-state holder for the expiration-date tracker.

use chrono::NaiveDate;
use log::{info, warn};
use shiftlog_core::expiration::ProductItem;

use crate::connectors::store::{self, ProductStore, Watch};
use crate::state::StateCell;

/// Observable state of the tracked product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListState {
    /// Products ordered ascending by expiration date, dateless items last
    pub product_items: Vec<ProductItem>,
    /// True until the first snapshot arrives
    pub is_loading: bool,
    /// Last store failure surfaced to observers, if any
    pub error_message: Option<String>,
}

/// Mirrors the live product collection into an observable state object and
/// forwards add/delete requests to the store.
///
/// The store subscription is the sole writer of the product list; the
/// entry points below only issue write requests and surface their
/// failures.
pub struct ExpirationTracker<'a, S: ProductStore> {
    store: &'a S,
    state: StateCell<ProductListState>,
    // Keeps the live query registered for the tracker's lifetime.
    _watch: Watch,
}

impl<'a, S: ProductStore> ExpirationTracker<'a, S> {
    /// Subscribes to the store and starts mirroring snapshots.
    ///
    /// The state reports loading until the first snapshot arrives; each
    /// snapshot then replaces the whole list.
    pub fn start(store: &'a S) -> Result<Self, store::Error> {
        let state = StateCell::new(ProductListState {
            product_items: Vec::new(),
            is_loading: true,
            error_message: None,
        });
        let snapshot_state = state.clone();
        let watch = store.watch(Box::new(move |products| {
            snapshot_state.set(ProductListState {
                product_items: products,
                is_loading: false,
                error_message: None,
            });
        }))?;

        Ok(Self {
            store,
            state,
            _watch: watch,
        })
    }

    /// Observable product list state.
    pub fn state(&self) -> &StateCell<ProductListState> {
        &self.state
    }

    /// Requests creation of a new product.
    ///
    /// Blank names or barcodes are rejected here, at the input boundary,
    /// and never reach the store.
    pub async fn add_product(
        &self,
        name: &str,
        barcode: &str,
        expiration_date: NaiveDate,
    ) -> Result<(), store::Error> {
        if name.trim().is_empty() || barcode.trim().is_empty() {
            warn!("Ignored product with blank name or barcode");
            return Ok(());
        }

        let product = ProductItem {
            id: String::new(),
            name: name.to_string(),
            barcode: barcode.to_string(),
            expiration_date: Some(expiration_date),
        };
        match self.store.insert(product).await {
            Ok(id) => {
                info!("Added product {}", id);
                Ok(())
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Requests deletion of a product. Items that were never persisted
    /// (empty id) are skipped.
    pub async fn delete_product(&self, product: &ProductItem) -> Result<(), store::Error> {
        if product.id.is_empty() {
            warn!("Skipped delete of unpersisted product \"{}\"", product.name);
            return Ok(());
        }

        match self.store.delete(&product.id).await {
            Ok(()) => {
                info!("Deleted product {}", product.id);
                Ok(())
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Records a store failure into the observable state so observers get
    /// a diagnostic instead of a silently stale list.
    fn surface(&self, err: store::Error) -> store::Error {
        warn!("Product store failure: {}", err);
        self.state.update(|current| ProductListState {
            error_message: Some(err.to_string()),
            ..current.clone()
        });
        err
    }
}

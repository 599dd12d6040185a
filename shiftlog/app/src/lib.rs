//! View-state holders and store connectivity for Shiftlog.
//!
//! Presentation layers consume the two features through observable state
//! objects (`StateCell`) and a small set of mutation entry points; the
//! remote document store stays behind the `connectors::store` seam.
pub mod config;
pub mod connectors;
pub mod expiration_tracker;
pub mod handover_board;
pub mod state;

pub use expiration_tracker::{ExpirationTracker, ProductListState};
pub use handover_board::{HandoverBoard, HandoverListState};
pub use state::{StateCell, Subscription};

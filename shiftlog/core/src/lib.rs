//! Core domain models and business rules for Shiftlog.
pub mod expiration;
pub mod handover;

pub use expiration::{ExpirationStatus, ProductItem, Urgency};
pub use handover::{HandoverChecklist, HandoverItem};

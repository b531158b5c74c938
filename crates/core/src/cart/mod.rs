//! Cart domain: line items, cart state, and change detection.
//!
//! [`CartState`] is the pure state machine behind the storefront cart. It
//! knows nothing about storage or observers; the storefront's `CartStore`
//! wraps it with persistence and change publication.

mod diff;
mod item;
mod state;

pub use diff::{Addition, detect_additions};
pub use item::{LineItem, Product};
pub use state::{CartDecodeError, CartSnapshot, CartState};

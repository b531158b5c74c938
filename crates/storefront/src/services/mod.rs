//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - The persistent cart store (single owner of cart contents)
//! - `toast` - "Added to cart" notifications derived from cart changes

pub mod cart;
pub mod toast;

pub use cart::{CART_STORAGE_KEY, CartStore};
pub use toast::{ChangeNotifier, NotificationEvent, ToastHandle, ToastService};

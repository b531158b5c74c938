//! Products and cart line items.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product descriptor as offered to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image reference (URL or path). May be empty.
    #[serde(default)]
    pub image: String,
}

/// One product's entry in the cart.
///
/// The quantity is a [`NonZeroU32`]: an item whose quantity reaches zero is
/// removed from the cart rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    pub quantity: NonZeroU32,
}

impl LineItem {
    /// A new line item holding a single unit of `product`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: NonZeroU32::MIN,
        }
    }

    /// Price multiplied by quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity.get())
    }
}

//! Cart state and derived snapshots.

use std::collections::HashMap;

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::item::{LineItem, Product};
use crate::types::{Price, ProductId};

/// Errors decoding a persisted cart.
#[derive(thiserror::Error, Debug)]
pub enum CartDecodeError {
    /// The value is not a well-formed cart document.
    #[error("malformed cart: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The same product appears on more than one line.
    #[error("duplicate line item for product {0}")]
    DuplicateItem(ProductId),
    /// The cart total exceeds the largest representable amount.
    #[error("cart total overflows")]
    TotalOverflow,
}

/// The authoritative list of cart line items.
///
/// Items keep the order in which distinct products were first added. An
/// id-keyed index is maintained alongside the sequence so lookups during
/// `add`, `update_quantity` and `remove` do not rescan the list.
///
/// Totals are never stored; [`CartState::total`], [`CartState::count`] and
/// [`CartState::snapshot`] recompute them from the items on every call.
/// The exact total is always representable: decoding rejects carts whose
/// total would overflow, and mutations that would overflow it are refused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "StoredCart")]
pub struct CartState {
    items: Vec<LineItem>,
    #[serde(skip)]
    index: HashMap<ProductId, usize>,
}

/// Wire shape of a persisted cart, validated into a [`CartState`].
#[derive(Deserialize)]
struct StoredCart {
    items: Vec<LineItem>,
}

impl TryFrom<StoredCart> for CartState {
    type Error = CartDecodeError;

    fn try_from(stored: StoredCart) -> Result<Self, Self::Error> {
        Self::from_items(stored.items)
    }
}

impl PartialEq for CartState {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for CartState {}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from an ordered list of items.
    ///
    /// # Errors
    ///
    /// Returns [`CartDecodeError::DuplicateItem`] if two items share an id,
    /// or [`CartDecodeError::TotalOverflow`] if the total is not representable.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartDecodeError> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if index.insert(item.id, position).is_some() {
                return Err(CartDecodeError::DuplicateItem(item.id));
            }
        }
        let cart = Self { items, index };
        if cart.checked_total().is_none() {
            return Err(CartDecodeError::TotalOverflow);
        }
        Ok(cart)
    }

    /// Decode a cart from its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a valid cart: wrong
    /// shape, zero quantities, negative prices, or duplicate products.
    pub fn from_json(raw: &str) -> Result<Self, CartDecodeError> {
        let stored: StoredCart = serde_json::from_str(raw)?;
        Self::from_items(stored.items)
    }

    /// Encode the cart as `{"items": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Add one unit of `product`.
    ///
    /// A product already in the cart keeps its position and has its quantity
    /// incremented; otherwise a new line is appended with quantity one.
    /// Returns the resulting quantity, or `None` if the quantity or the cart
    /// total would overflow, in which case the cart is unchanged.
    pub fn add(&mut self, product: &Product) -> Option<NonZeroU32> {
        let total = self.checked_total()?;

        if let Some(item) = self.get_mut(product.id) {
            let quantity = item.quantity.checked_add(1)?;
            total.checked_add(item.price)?;
            item.quantity = quantity;
            return Some(quantity);
        }

        total.checked_add(product.price)?;
        self.index.insert(product.id, self.items.len());
        self.items.push(LineItem::from_product(product));
        Some(NonZeroU32::MIN)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Negative quantities clamp to zero, and zero removes the line.
    /// Quantities above `u32::MAX` clamp to it. Unknown ids are ignored, and a
    /// quantity whose cart total would overflow is refused. Returns `true` if
    /// the cart changed.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        let Some(item) = self.get(id) else {
            return false;
        };

        let clamped = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        let Some(quantity) = NonZeroU32::new(clamped) else {
            return self.remove(id).is_some();
        };
        if quantity == item.quantity {
            return false;
        }

        let others = self
            .items
            .iter()
            .filter(|other| other.id != id)
            .try_fold(Price::ZERO, |sum, other| {
                sum.checked_add(other.price.checked_times(other.quantity.get())?)
            });
        let fits = others
            .and_then(|sum| sum.checked_add(item.price.checked_times(quantity.get())?))
            .is_some();
        if !fits {
            return false;
        }

        if let Some(item) = self.get_mut(id) {
            item.quantity = quantity;
        }
        true
    }

    /// Remove a product's line entirely, returning it if it was present.
    pub fn remove(&mut self, id: ProductId) -> Option<LineItem> {
        let position = self.index.remove(&id)?;
        let removed = self.items.remove(position);
        for (offset, item) in self.items.iter().enumerate().skip(position) {
            self.index.insert(item.id, offset);
        }
        Some(removed)
    }

    /// Remove every line. Returns `true` if the cart was non-empty.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        self.index.clear();
        had_items
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a product's line.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.index.get(&id).and_then(|&i| self.items.get(i))
    }

    fn get_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        let position = *self.index.get(&id)?;
        self.items.get_mut(position)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// The total, or `None` if it is not representable.
    #[must_use]
    pub fn checked_total(&self) -> Option<Price> {
        self.items.iter().try_fold(Price::ZERO, |sum, item| {
            sum.checked_add(item.price.checked_times(item.quantity.get())?)
        })
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// An immutable view of the items with freshly computed totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total: self.total(),
            count: self.count(),
        }
    }
}

/// An immutable observation of the cart at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub total: Price,
    pub count: u64,
}

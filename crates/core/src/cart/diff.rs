//! Detect products added between two cart snapshots.

use std::collections::HashMap;

use super::item::LineItem;
use crate::types::ProductId;

/// Net additions found by [`detect_additions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition {
    /// Units added across all products.
    pub total_added: u64,
    /// Name of the first added product, in cart order.
    pub name: String,
    /// Image of the first added product, in cart order.
    pub image: String,
}

impl Addition {
    /// Notification title: the product name for a single unit, otherwise
    /// the number of units.
    #[must_use]
    pub fn title(&self) -> String {
        if self.total_added == 1 {
            format!("{} added to cart", self.name)
        } else {
            format!("{} items added to cart", self.total_added)
        }
    }
}

/// Compare two item lists and report what was added.
///
/// A product missing from `previous` counts its whole quantity; a product
/// whose quantity grew counts the difference. Decreases and removals are
/// ignored. Returns `None` when nothing was added.
#[must_use]
pub fn detect_additions(previous: &[LineItem], current: &[LineItem]) -> Option<Addition> {
    let before: HashMap<ProductId, u32> = previous
        .iter()
        .map(|item| (item.id, item.quantity.get()))
        .collect();

    let mut first: Option<&LineItem> = None;
    let mut total_added = 0u64;

    for item in current {
        let now = item.quantity.get();
        let added = before
            .get(&item.id)
            .map_or(now, |&then| now.saturating_sub(then));
        if added == 0 {
            continue;
        }
        total_added += u64::from(added);
        first.get_or_insert(item);
    }

    first.map(|item| Addition {
        total_added,
        name: item.name.clone(),
        image: item.image.clone(),
    })
}

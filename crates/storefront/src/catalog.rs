//! Static product catalog.
//!
//! The Serene Home range is small and fixed, so it ships with the binary
//! rather than coming from a database.

use serde::Serialize;
use serene_home_core::{Price, Product, ProductId};

/// Category name that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// A product as shown on the catalog and detail pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    pub description: String,
    /// Styling suggestion shown in the detail view.
    pub recommendation: String,
}

impl CatalogProduct {
    /// The descriptor handed to the cart.
    #[must_use]
    pub fn to_cart_product(&self) -> Product {
        Product {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }
}

/// The full product range.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<CatalogProduct>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::serene_home()
    }
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<CatalogProduct>) -> Self {
        Self { products }
    }

    /// The storefront's built-in range.
    #[must_use]
    pub fn serene_home() -> Self {
        let entry = |id: i32,
                     name: &str,
                     price: u32,
                     image: &str,
                     category: &str,
                     description: &str,
                     recommendation: &str| CatalogProduct {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_units(price),
            image: image.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            recommendation: recommendation.to_string(),
        };

        Self::new(vec![
            entry(
                1,
                "Aesthetic Vase",
                499,
                "/images/vase.jpg",
                "Decor",
                "Hand-glazed ceramic vase with a matte finish, perfect for single-stem florals.",
                "Place on a console table or bookshelf. Pair with dried pampas grass for a warm, natural touch.",
            ),
            entry(
                2,
                "Minimalist Lamp",
                899,
                "/images/lamp.jpg",
                "Lighting",
                "Slim desk and table lamp with soft warm LED. Dimmable and energy efficient.",
                "Use on a bedside table or reading nook to create layered ambient lighting.",
            ),
            entry(
                3,
                "Wooden Shelf",
                1299,
                "/images/table.jfif",
                "Furniture",
                "Floating oak shelf, sturdy and minimalist for modern interiors.",
                "Install above a sofa or entryway and style with plants, books and framed photos.",
            ),
            entry(
                4,
                "Ceramic Mug Set",
                299,
                "/images/mug.webp",
                "Kitchen",
                "Set of 4 artisan mugs with comfortable handles and chip-resistant glaze.",
                "Display on open shelving or keep on a dedicated mug rail for cozy kitchen vibes.",
            ),
            entry(
                5,
                "Wall Clock",
                399,
                "/images/clock.webp",
                "Decor",
                "Silent sweep wall clock with a minimalist face. No ticking.",
                "Center above a sideboard or kitchen wall for functional decor that anchors the room.",
            ),
            entry(
                6,
                "Throw Pillow",
                199,
                "/images/pillow.webp",
                "Textiles",
                "Soft textured throw pillow with a removable cover for easy washing.",
                "Mix contrasting colors and textures on the sofa to add depth and comfort.",
            ),
            entry(
                7,
                "Table Runner",
                349,
                "/images/table.webp",
                "Textiles",
                "Linen-blend table runner with a subtle weave pattern.",
                "Use as the focal piece for a dining table; layer with a simple centerpiece.",
            ),
            entry(
                8,
                "Indoor Plant",
                599,
                "/images/plant.webp",
                "Greenery",
                "Low-maintenance potted indoor plant that thrives in indirect light.",
                "Place in a corner or on a shelf to soften the harsh lines of furniture.",
            ),
            entry(
                9,
                "Scented Candle",
                249,
                "/images/candle.webp",
                "Aromas",
                "Soy wax candle with long burn time and a subtle vanilla-cedar scent.",
                "Light during evenings for a relaxing atmosphere; place on a tray with matches.",
            ),
        ])
    }

    /// Every product, in display order.
    #[must_use]
    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    /// `"All"` followed by each distinct category in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Products in `category` whose name contains `query`.
    ///
    /// A missing category or `"All"` matches every category. The query is
    /// trimmed and compared case-insensitively; an empty query matches all.
    #[must_use]
    pub fn filter(&self, category: Option<&str>, query: Option<&str>) -> Vec<&CatalogProduct> {
        let category = category.filter(|c| *c != ALL_CATEGORIES);
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|n| p.name.to_lowercase().contains(n))
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(products: &[&CatalogProduct]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_builtin_catalog_has_unique_ids() {
        let catalog = Catalog::serene_home();
        let mut ids: Vec<i32> = catalog.products().iter().map(|p| p.id.as_i32()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.products().len());
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn test_find() {
        let catalog = Catalog::serene_home();
        let vase = catalog.find(ProductId::new(1)).unwrap();
        assert_eq!(vase.name, "Aesthetic Vase");
        assert_eq!(vase.price, Price::from_units(499));
        assert!(catalog.find(ProductId::new(404)).is_none());
    }

    #[test]
    fn test_categories_start_with_all_in_first_seen_order() {
        let catalog = Catalog::serene_home();
        assert_eq!(
            catalog.categories(),
            vec![
                "All",
                "Decor",
                "Lighting",
                "Furniture",
                "Kitchen",
                "Textiles",
                "Greenery",
                "Aromas"
            ]
        );
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = Catalog::serene_home();
        assert_eq!(
            names(&catalog.filter(Some("Textiles"), None)),
            vec!["Throw Pillow", "Table Runner"]
        );
        assert_eq!(catalog.filter(Some("All"), None).len(), 9);
        assert_eq!(catalog.filter(None, None).len(), 9);
        assert!(catalog.filter(Some("Garden"), None).is_empty());
    }

    #[test]
    fn test_filter_by_query_is_case_insensitive_and_trimmed() {
        let catalog = Catalog::serene_home();
        assert_eq!(names(&catalog.filter(None, Some("  LAMP "))), vec!["Minimalist Lamp"]);
        assert_eq!(catalog.filter(None, Some("   ")).len(), 9);
        assert_eq!(
            names(&catalog.filter(Some("Decor"), Some("clock"))),
            vec!["Wall Clock"]
        );
    }

    #[test]
    fn test_to_cart_product() {
        let catalog = Catalog::serene_home();
        let product = catalog.find(ProductId::new(8)).unwrap().to_cart_product();
        assert_eq!(product.name, "Indoor Plant");
        assert_eq!(product.image, "/images/plant.webp");
    }
}

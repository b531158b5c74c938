//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serene_home_core::{CurrencyCode, ProductId};
use tracing::instrument;

use crate::catalog::{ALL_CATEGORIES, CatalogProduct};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: CatalogProduct,
    pub price_display: String,
}

impl From<&CatalogProduct> for ProductView {
    fn from(product: &CatalogProduct) -> Self {
        Self {
            product: product.clone(),
            price_display: product.price.display(CurrencyCode::default()),
        }
    }
}

/// Catalog listing response.
#[derive(Debug, Serialize)]
pub struct ProductListView {
    pub categories: Vec<String>,
    pub active_category: String,
    pub query: String,
    pub products: Vec<ProductView>,
}

/// Catalog filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// List products, optionally filtered by category and name.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ProductListView> {
    let catalog = state.catalog();
    let products = catalog
        .filter(query.category.as_deref(), query.q.as_deref())
        .into_iter()
        .map(ProductView::from)
        .collect();

    Json(ProductListView {
        categories: catalog.categories().into_iter().map(String::from).collect(),
        active_category: query
            .category
            .unwrap_or_else(|| ALL_CATEGORIES.to_string()),
        query: query.q.unwrap_or_default(),
        products,
    })
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ProductView>> {
    let id = id
        .parse::<i32>()
        .map(ProductId::new)
        .map_err(|_| AppError::BadRequest(format!("invalid product id {id:?}")))?;

    state
        .catalog()
        .find(id)
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

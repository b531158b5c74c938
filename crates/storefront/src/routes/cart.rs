//! Cart route handlers.
//!
//! Every mutation answers with the resulting cart so the client can render
//! it without a second request.
//!
//! Mutations persist synchronously (a file store fsyncs on every write), so
//! they run on the blocking pool rather than on the async workers.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serene_home_core::{CartSnapshot, CurrencyCode, LineItem, Price, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{CartStore, NotificationEvent};
use crate::state::AppState;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: Price,
    pub price_display: String,
    pub subtotal: Price,
    pub subtotal_display: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Price,
    pub total_display: String,
    pub count: u64,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        let currency = CurrencyCode::default();
        let subtotal = item.subtotal();
        Self {
            id: item.id,
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity.get(),
            price: item.price,
            price_display: item.price.display(currency),
            subtotal,
            subtotal_display: subtotal.display(currency),
        }
    }
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            items: snapshot.items.iter().map(CartItemView::from).collect(),
            total: snapshot.total,
            total_display: snapshot.total.display(CurrencyCode::default()),
            count: snapshot.count,
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(&*state.cart().snapshot()))
}

/// Add one unit of a catalog product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .find(request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?
        .to_cart_product();

    let product_id = product.id.to_string();
    add_breadcrumb(
        "cart",
        "Added product to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    let snapshot = mutate_cart(&state, move |cart| cart.add(&product)).await?;
    Ok(Json(CartView::from(&*snapshot)))
}

/// Set the quantity of a cart line. Zero or below removes it.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let snapshot = mutate_cart(&state, move |cart| {
        cart.update_quantity(request.product_id, request.quantity)
    })
    .await?;
    Ok(Json(CartView::from(&*snapshot)))
}

/// Remove a cart line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let snapshot = mutate_cart(&state, move |cart| cart.remove(request.product_id)).await?;
    Ok(Json(CartView::from(&*snapshot)))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    add_breadcrumb("cart", "Cleared cart", None);
    let snapshot = mutate_cart(&state, CartStore::clear).await?;
    Ok(Json(CartView::from(&*snapshot)))
}

/// Get the cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCountView> {
    Json(CartCountView {
        count: state.cart().snapshot().count,
    })
}

/// Get the current "added to cart" toast.
#[instrument(skip(state))]
pub async fn toast(State(state): State<AppState>) -> Json<NotificationEvent> {
    Json(state.toasts().current())
}

/// Run a cart mutation on the blocking pool.
async fn mutate_cart<F>(state: &AppState, op: F) -> Result<Arc<CartSnapshot>>
where
    F: FnOnce(&CartStore) -> Arc<CartSnapshot> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || op(state.cart()))
        .await
        .map_err(|e| AppError::Internal(format!("cart mutation failed: {e}")))
}

//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (?category=&q=)
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart contents with total and count
//! POST /cart/add               - Add one unit ({"product_id"})
//! POST /cart/update            - Set quantity ({"product_id", "quantity"})
//! POST /cart/remove            - Remove line ({"product_id"})
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge
//! GET  /cart/toast             - Current "added to cart" toast
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .route("/toast", get(cart::toast))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
}

/// The storefront application with state and request tracing attached.
pub fn app(state: AppState) -> Router {
    routes().layer(TraceLayer::new_for_http()).with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

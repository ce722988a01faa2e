//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog (query: category, sort)
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products/{id}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns cart_count fragment)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout form
//! POST /checkout               - Place order (rate limited)
//!
//! # Assets
//! GET  /static/*               - Static files
//! ```
//!
//! Cart mutations answer with an `HX-Trigger` header firing `cart-updated`
//! and, when there is something to tell the shopper, a `notice` event.

pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    middleware::from_fn,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cart::Cart;
use crate::middleware::{
    checkout_rate_limiter, create_session_layer, csp_nonce_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::models::{Notice, Product, hx_trigger};
use crate::state::AppState;

// =============================================================================
// Shared View Data
// =============================================================================

/// Data every full page needs for the layout.
#[derive(Clone, Debug)]
pub struct PageContext {
    /// CSP nonce for inline scripts
    pub nonce: String,
    /// Units in the cart, for the header badge
    pub cart_count: u32,
    /// One-shot notice carried over a redirect
    pub flash: Option<Notice>,
}

impl PageContext {
    #[must_use]
    pub fn new(nonce: String, cart: &Cart) -> Self {
        Self {
            nonce,
            cart_count: cart.total_items(),
            flash: None,
        }
    }

    #[must_use]
    pub fn with_flash(mut self, flash: Option<Notice>) -> Self {
        self.flash = flash;
        self
    }
}

/// Product summary for grids and related products.
#[derive(Clone, Debug)]
pub struct ProductCard {
    pub id: String,
    pub title: String,
    pub category: String,
    pub price: String,
    pub image: String,
    pub stock_label: String,
    pub available: bool,
    pub scarce: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let level = product.stock_level();
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            stock_label: level.label(),
            available: level.is_available(),
            scarce: level.is_scarce(),
        }
    }
}

// =============================================================================
// HTMX Helpers
// =============================================================================

/// Whether the request was made by htmx.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// Attach an `HX-Trigger` header to a response.
pub(crate) fn with_trigger(
    notice: Option<&Notice>,
    cart_updated: bool,
    body: impl IntoResponse,
) -> Response {
    (
        AppendHeaders([("HX-Trigger", hx_trigger(notice, cart_updated))]),
        body,
    )
        .into_response()
}

/// Send the browser to the catalog, via `HX-Redirect` for htmx requests.
pub(crate) fn redirect_home(headers: &HeaderMap) -> Response {
    if is_htmx(headers) {
        (StatusCode::OK, AppendHeaders([("HX-Redirect", "/")])).into_response()
    } else {
        Redirect::to("/").into_response()
    }
}

// =============================================================================
// Router
// =============================================================================

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
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
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .route(
            "/checkout",
            get(checkout::show).merge(post(checkout::submit).layer(checkout_rate_limiter())),
        )
}

/// Build the complete application with middleware and static files.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let static_files = ServeDir::new(&state.config().static_dir);

    Router::new()
        .merge(routes())
        .nest_service("/static", static_files)
        .layer(session_layer)
        .layer(from_fn(csp_nonce_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
        .layer(sentry_tower::NewSentryLayer::new_from_top())
}

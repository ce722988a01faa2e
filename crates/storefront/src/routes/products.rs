//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use artesania_core::ProductId;

use crate::catalog::CatalogError;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::Product;
use crate::routes::cart::load_cart;
use crate::routes::{PageContext, ProductCard};
use crate::state::AppState;

/// Number of related products shown under the detail view.
const RELATED_LIMIT: usize = 4;

/// Product display data for templates.
#[derive(Clone, Debug)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub materials: Vec<String>,
    pub dimensions: String,
    pub stock_label: String,
    pub available: bool,
    pub scarce: bool,
    /// Units already in the shopper's cart
    pub in_cart: u32,
    /// Units that can still be added
    pub addable: u32,
}

impl ProductView {
    fn new(product: &Product, in_cart: u32) -> Self {
        let level = product.stock_level();
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            materials: product.materials.clone(),
            dimensions: product.dimensions.clone(),
            stock_label: level.label(),
            available: level.is_available(),
            scarce: level.is_scarce(),
            in_cart,
            addable: product.stock.saturating_sub(in_cart),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
    pub related_products: Vec<ProductCard>,
}

/// Product not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub page: PageContext,
}

/// Display product detail page.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let catalog = state.catalog();
    let cart = load_cart(&session, catalog).await?;
    let page = PageContext::new(nonce, &cart);

    let product = match catalog.product(&ProductId::new(id)) {
        Ok(product) => product,
        Err(CatalogError::NotFound(id)) => {
            tracing::debug!(product_id = %id, "Product not found");
            return Ok((StatusCode::NOT_FOUND, ProductNotFoundTemplate { page }).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    add_breadcrumb(
        "navigation",
        "Viewed product page",
        Some(&[("product_id", product.id.as_str())]),
    );

    let in_cart = cart.get(&product.id).map_or(0, |entry| entry.quantity);
    let related_products = catalog
        .related(&product, RELATED_LIMIT)
        .iter()
        .map(|p| ProductCard::from(p.as_ref()))
        .collect();

    Ok(ProductShowTemplate {
        page,
        product: ProductView::new(&product, in_cart),
        related_products,
    }
    .into_response())
}

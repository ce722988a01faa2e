//! Home page route handler: the filterable, sortable catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{Category, SortMode};
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::{Notice, session_keys};
use crate::routes::cart::load_cart;
use crate::routes::{PageContext, ProductCard, is_htmx};
use crate::state::AppState;

/// Catalog query parameters.
///
/// Unknown categories and sort modes fall back to "all" and the default order.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// A category filter option.
#[derive(Clone, Debug)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// A sort order option.
#[derive(Clone, Debug)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCard>,
    pub categories: Vec<CategoryOption>,
    pub sorts: Vec<SortOption>,
    pub all_selected: bool,
}

/// Product grid fragment template (for HTMX filter changes).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductCard>,
}

/// Display the catalog.
///
/// htmx requests (filter or sort changes) get only the product grid.
#[instrument(skip(state, session, headers, nonce))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<CatalogQuery>,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let catalog = state.catalog();
    let category: Option<Category> = query
        .category
        .as_deref()
        .and_then(|name| catalog.category(name));
    let sort = SortMode::from_param(query.sort.as_deref());

    let products: Vec<ProductCard> = catalog
        .filter_and_sort(category.as_ref(), sort)
        .iter()
        .map(|product| ProductCard::from(product.as_ref()))
        .collect();

    tracing::debug!(
        category = category.as_ref().map(Category::as_str),
        sort = sort.as_str(),
        results = products.len(),
        "Catalog query"
    );

    if is_htmx(&headers) {
        return Ok(ProductGridTemplate { products }.into_response());
    }

    let cart = load_cart(&session, catalog).await?;
    let flash = session.remove::<Notice>(session_keys::FLASH).await?;

    let categories = catalog
        .categories()
        .into_iter()
        .map(|c| CategoryOption {
            selected: category.as_ref() == Some(&c),
            name: c.as_str().to_owned(),
        })
        .collect();

    let sorts = SortMode::ALL
        .iter()
        .map(|mode| SortOption {
            value: mode.as_str(),
            label: mode.label(),
            selected: *mode == sort,
        })
        .collect();

    Ok(HomeTemplate {
        page: PageContext::new(nonce, &cart).with_flash(flash),
        products,
        categories,
        sorts,
        all_selected: category.is_none(),
    }
    .into_response())
}

//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart is stored in the session as product/quantity lines and rebuilt
//! against the catalog on every request.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use artesania_core::{Price, ProductId};

use crate::cart::{AddOutcome, Cart, CartEntry, CartLine, UpdateOutcome};
use crate::catalog::Catalog;
use crate::checkout::{FREE_SHIPPING_THRESHOLD, OrderTotals};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::{Notice, session_keys};
use crate::routes::{PageContext, with_trigger};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone, Debug)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image: String,
    pub quantity: u32,
    pub stock: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.product.id.to_string(),
            title: entry.product.title.clone(),
            category: entry.product.category.clone(),
            image: entry.product.image.clone(),
            quantity: entry.quantity,
            stock: entry.product.stock,
            price: entry.product.price.to_string(),
            line_price: entry.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone, Debug)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub free_shipping: bool,
    /// How much more to spend for free shipping, if any.
    pub free_shipping_remaining: Option<String>,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = OrderTotals::for_cart(cart);
        let remaining = FREE_SHIPPING_THRESHOLD
            .amount
            .saturating_sub(totals.subtotal.amount);

        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            item_count: cart.total_items(),
            subtotal: totals.subtotal.to_string(),
            shipping: totals.shipping.to_string(),
            total: totals.total.to_string(),
            free_shipping: totals.free_shipping(),
            free_shipping_remaining: (remaining > 0)
                .then(|| Price::new(remaining, totals.subtotal.currency_code).to_string()),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the shopper's cart from the session.
///
/// Lines for products that no longer exist are dropped and quantities are
/// clamped to current stock.
pub(crate) async fn load_cart(session: &Session, catalog: &Catalog) -> Result<Cart> {
    let lines: Vec<CartLine> = session
        .get(session_keys::CART)
        .await?
        .unwrap_or_default();
    Ok(Cart::from_lines(&lines, catalog))
}

/// Store the cart in the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart.lines()).await?;
    Ok(())
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
///
/// Quantities of zero or less remove the item.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse> {
    let cart = load_cart(&session, state.catalog()).await?;

    Ok(CartShowTemplate {
        page: PageContext::new(nonce, &cart),
        cart: CartView::from(&cart),
    })
}

/// Add item to cart (HTMX).
///
/// Returns the cart count badge and triggers `cart-updated` with a notice.
/// Requests above available stock answer 409 and leave the cart unchanged.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state.catalog().product(&ProductId::new(form.product_id))?;
    let quantity = form.quantity.unwrap_or(1);

    let mut cart = load_cart(&session, state.catalog()).await?;
    let outcome = cart.add(Arc::clone(&product), quantity)?;
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str())]),
    );
    tracing::info!(
        product_id = %product.id,
        quantity,
        total_items = cart.total_items(),
        "Added to cart"
    );

    let notice = match outcome {
        AddOutcome::Added => Notice::success(format!("{} añadido al carrito", product.title)),
        AddOutcome::Updated => {
            Notice::success(format!("{} actualizado en el carrito", product.title))
        }
    };

    Ok(with_trigger(
        Some(&notice),
        true,
        CartCountTemplate {
            count: cart.total_items(),
        },
    ))
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let product = state.catalog().product(&ProductId::new(form.product_id))?;

    let mut cart = load_cart(&session, state.catalog()).await?;
    let outcome = cart.update_quantity(&product.id, form.quantity)?;

    let notice = match outcome {
        UpdateOutcome::Updated => None,
        UpdateOutcome::Removed => Some(Notice::success("Producto eliminado del carrito")),
        UpdateOutcome::NotInCart => {
            tracing::debug!(product_id = %product.id, "Update for product not in cart");
            None
        }
    };
    if outcome != UpdateOutcome::NotInCart {
        save_cart(&session, &cart).await?;
    }

    Ok(with_trigger(
        notice.as_ref(),
        true,
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    ))
}

/// Remove item from cart (HTMX).
///
/// Removing a product that is not in the cart changes nothing and shows no
/// notice.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let product = state.catalog().product(&ProductId::new(form.product_id))?;

    let mut cart = load_cart(&session, state.catalog()).await?;
    let notice = if cart.remove(&product.id).is_some() {
        save_cart(&session, &cart).await?;
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", product.id.as_str())]),
        );
        Some(Notice::success("Producto eliminado del carrito"))
    } else {
        None
    };

    Ok(with_trigger(
        notice.as_ref(),
        true,
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    ))
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut cart = load_cart(&session, state.catalog()).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(with_trigger(
        Some(&Notice::success("Carrito vaciado")),
        true,
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    ))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session, state.catalog()).await?;

    Ok(CartCountTemplate {
        count: cart.total_items(),
    })
}

//! Checkout route handlers.
//!
//! The form posts back to `/checkout`. Validation failures re-render the form
//! with field messages (422); a successful submission places the order,
//! empties the cart and redirects to the catalog with a flash notice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::Cart;
use crate::checkout::{CheckoutError, CheckoutField, CheckoutFlow, CheckoutForm, FieldErrors};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::{Notice, session_keys};
use crate::routes::cart::{CartView, load_cart, save_cart};
use crate::routes::{PageContext, is_htmx, redirect_home};
use crate::services::OrderConfirmation;
use crate::state::AppState;

/// One text input of the checkout form.
#[derive(Clone, Debug)]
pub struct FormFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub autocomplete: &'static str,
    pub value: String,
    pub error: Option<&'static str>,
}

/// Checkout form display data.
#[derive(Clone, Debug)]
pub struct CheckoutFormView {
    pub fields: Vec<FormFieldView>,
    pub notes: String,
    pub notes_error: Option<&'static str>,
    pub has_errors: bool,
}

impl CheckoutFormView {
    fn new(form: &CheckoutForm, errors: &FieldErrors) -> Self {
        let field = |field: CheckoutField,
                     label: &'static str,
                     input_type: &'static str,
                     autocomplete: &'static str,
                     value: &str| FormFieldView {
            name: field.name(),
            label,
            input_type,
            autocomplete,
            value: value.to_owned(),
            error: errors.message(field),
        };

        Self {
            fields: vec![
                field(CheckoutField::FirstName, "Nombre", "text", "given-name", &form.first_name),
                field(CheckoutField::LastName, "Apellido", "text", "family-name", &form.last_name),
                field(CheckoutField::Email, "Email", "email", "email", &form.email),
                field(CheckoutField::Phone, "Teléfono", "tel", "tel", &form.phone),
                field(CheckoutField::Address, "Dirección", "text", "street-address", &form.address),
                field(CheckoutField::City, "Ciudad", "text", "address-level2", &form.city),
                field(CheckoutField::Province, "Provincia", "text", "address-level1", &form.province),
                field(
                    CheckoutField::PostalCode,
                    "Código postal",
                    "text",
                    "postal-code",
                    &form.postal_code,
                ),
            ],
            notes: form.notes.clone().unwrap_or_default(),
            notes_error: errors.message(CheckoutField::Notes),
            has_errors: !errors.is_empty(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub form: CheckoutFormView,
    pub cart: CartView,
}

/// Checkout form fragment template (for HTMX re-renders with errors).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_form.html")]
pub struct CheckoutFormTemplate {
    pub form: CheckoutFormView,
}

/// Display the checkout form.
///
/// An empty cart redirects to the catalog.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let cart = load_cart(&session, state.catalog()).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(CheckoutTemplate {
        page: PageContext::new(nonce, &cart),
        form: CheckoutFormView::new(&CheckoutForm::default(), &FieldErrors::default()),
        cart: CartView::from(&cart),
    }
    .into_response())
}

/// Submit the checkout form.
///
/// Only one submission per session is processed at a time; a duplicate
/// answers 409 while the first is in flight.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    CspNonce(nonce): CspNonce,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let cart = load_cart(&session, state.catalog()).await?;
    let Ok(mut flow) = CheckoutFlow::begin(&cart) else {
        tracing::debug!("Checkout submitted with empty cart");
        return Ok(redirect_home(&headers));
    };
    let Some(session_id) = session.id() else {
        return Ok(redirect_home(&headers));
    };

    let Some(claim) = state.submissions().try_acquire(&session_id.to_string()).await else {
        tracing::warn!("Duplicate checkout submission while one is in flight");
        return Err(CheckoutError::SubmissionInFlight.into());
    };

    // Dropping the claim (client gone, early return) also releases it
    let result = place_order(&state, &session, &mut flow, &form).await;
    claim.release().await;

    match result {
        Ok(confirmation) => {
            tracing::info!(
                order_id = %confirmation.order_id,
                total = %confirmation.totals.total,
                "Checkout completed"
            );
            Ok(redirect_home(&headers))
        }
        Err(AppError::Checkout(CheckoutError::Validation(errors))) => {
            tracing::debug!(%errors, "Checkout form rejected");
            let form = CheckoutFormView::new(&form, &errors);
            let body = if is_htmx(&headers) {
                CheckoutFormTemplate { form }.into_response()
            } else {
                CheckoutTemplate {
                    page: PageContext::new(nonce, &cart),
                    form,
                    cart: CartView::from(&cart),
                }
                .into_response()
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Validate, place the order and reset the session's cart.
async fn place_order(
    state: &AppState,
    session: &Session,
    flow: &mut CheckoutFlow,
    form: &CheckoutForm,
) -> Result<OrderConfirmation> {
    let order = flow.submit(form)?;
    add_breadcrumb("checkout", "Order submitted", None);

    let confirmation = state.orders().place(order).await;
    flow.complete(&confirmation)?;

    // The whole cart goes, including anything added while the order was placed
    save_cart(session, &Cart::new()).await?;
    session
        .insert(
            session_keys::FLASH,
            Notice::success("¡Pedido realizado con éxito!")
                .with_description("Te enviaremos un email de confirmación."),
        )
        .await?;
    // Persist before the claim is released so the next submission sees the empty cart
    session.save().await?;

    Ok(confirmation)
}

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Client errors carry an `HX-Trigger` header with an error notice so HTMX
//! requests can show a toast without swapping any content.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::models::{Notice, hx_trigger};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product lookup or catalog construction failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart mutation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout flow rejected the request.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Cart(CartError::InsufficientStock { .. })
            | Self::Checkout(CheckoutError::SubmissionInFlight | CheckoutError::AlreadyCompleted) => {
                StatusCode::CONFLICT
            }
            Self::Cart(CartError::InvalidQuantity)
            | Self::Checkout(CheckoutError::EmptyCart)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Checkout(CheckoutError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Catalog(CatalogError::DuplicateProduct(_))
            | Self::Checkout(CheckoutError::NotSubmitting)
            | Self::Session(_)
            | Self::Template(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the shopper.
    ///
    /// Server errors never expose their details.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(CatalogError::NotFound(_)) => "Producto no encontrado".to_string(),
            Self::Cart(CartError::InsufficientStock { available, .. }) => {
                format!("Solo hay {available} unidades disponibles")
            }
            Self::Cart(CartError::InvalidQuantity) => "Cantidad inválida".to_string(),
            Self::Checkout(CheckoutError::EmptyCart) => "Tu carrito está vacío".to_string(),
            Self::Checkout(CheckoutError::Validation(_)) => {
                "Revisá los datos del formulario".to_string()
            }
            Self::Checkout(CheckoutError::SubmissionInFlight) => "Procesando...".to_string(),
            Self::Checkout(CheckoutError::AlreadyCompleted) => {
                "El pedido ya fue realizado".to_string()
            }
            Self::NotFound(message) | Self::BadRequest(message) => message.clone(),
            Self::Catalog(CatalogError::DuplicateProduct(_))
            | Self::Checkout(CheckoutError::NotSubmitting)
            | Self::Session(_)
            | Self::Template(_)
            | Self::Internal(_) => "Error interno del servidor".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.user_message();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let trigger = hx_trigger(Some(&Notice::error(message.clone())), false);
        let mut response = (status, message).into_response();
        if status.is_client_error()
            && let Ok(value) = HeaderValue::from_str(&trigger)
        {
            response.headers_mut().insert("HX-Trigger", value);
        }
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "silla-copenhagen")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use artesania_core::ProductId;

    use super::*;
    use crate::checkout::FieldErrors;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("silla-123".to_string());
        assert_eq!(err.to_string(), "Not found: silla-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(CatalogError::NotFound(ProductId::new("x")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(
                CartError::InsufficientStock {
                    product: ProductId::new("x"),
                    available: 3,
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(CartError::InvalidQuantity.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CheckoutError::Validation(FieldErrors::default()).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(CheckoutError::SubmissionInFlight.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = AppError::from(CartError::InsufficientStock {
            product: ProductId::new("escritorio-ejecutivo"),
            available: 2,
        });
        assert_eq!(err.user_message(), "Solo hay 2 unidades disponibles");
    }

    #[test]
    fn test_client_errors_carry_notice() {
        let response = AppError::from(CheckoutError::SubmissionInFlight).into_response();
        let header = response.headers().get("HX-Trigger").unwrap().to_str().unwrap();
        let json: serde_json::Value = serde_json::from_str(header).unwrap();
        assert_eq!(json["notice"]["level"], "error");
        assert_eq!(json["notice"]["message"], "Procesando...");
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Internal("connection refused".to_string());
        assert_eq!(err.user_message(), "Error interno del servidor");
        assert!(err.into_response().headers().get("HX-Trigger").is_none());
    }
}

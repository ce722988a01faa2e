//! Session-related types.
//!
//! Types stored in the shopper's session between requests.

use serde::{Deserialize, Serialize};

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast-style message shown to the shopper.
///
/// Cart mutations send notices in the `HX-Trigger` header; notices that must
/// survive a redirect (checkout success) are stored in the session as a flash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notice {
    /// A success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            description: None,
        }
    }

    /// An error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            description: None,
        }
    }

    /// Attach a secondary line of text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this is a success notice (used by templates).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.level, NoticeLevel::Success)
    }
}

/// Build the `HX-Trigger` header value for a response.
///
/// With `cart_updated`, the `cart-updated` event is fired so the cart badge
/// and cart items refresh; a notice is delivered as the `notice` event. Non-ASCII characters are written as JSON `\u`
/// escapes, since header values are not decoded as UTF-8 by browsers.
#[must_use]
pub fn hx_trigger(notice: Option<&Notice>, cart_updated: bool) -> String {
    let mut events = serde_json::Map::new();
    if cart_updated {
        events.insert("cart-updated".to_owned(), serde_json::Value::Null);
    }
    if let Some(notice) = notice
        && let Ok(value) = serde_json::to_value(notice)
    {
        events.insert("notice".to_owned(), value);
    }

    let json = serde_json::Value::Object(events).to_string();
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    escaped
}

/// Session keys for storefront data.
pub mod session_keys {
    /// Key for the shopper's cart lines.
    pub const CART: &str = "cart";

    /// Key for a one-shot notice displayed on the next page render.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_serializes_for_htmx() {
        let notice = Notice::error("Solo hay 3 unidades disponibles");
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "level": "error",
                "message": "Solo hay 3 unidades disponibles"
            })
        );
    }

    #[test]
    fn test_hx_trigger_announces_cart_update() {
        let header = hx_trigger(Some(&Notice::success("Carrito vaciado")), true);
        let json: serde_json::Value = serde_json::from_str(&header).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "cart-updated": null,
                "notice": { "level": "success", "message": "Carrito vaciado" }
            })
        );
    }

    #[test]
    fn test_hx_trigger_is_ascii() {
        let header = hx_trigger(
            Some(&Notice::success("Librería Nórdica añadido al carrito")),
            true,
        );
        assert!(header.is_ascii());
        assert!(header.contains("\\u00ed"));

        let json: serde_json::Value = serde_json::from_str(&header).unwrap();
        assert_eq!(
            json["notice"]["message"],
            "Librería Nórdica añadido al carrito"
        );
        assert!(axum::http::HeaderValue::from_str(&header).is_ok());
    }

    #[test]
    fn test_hx_trigger_without_cart_update() {
        let header = hx_trigger(Some(&Notice::error("Procesando...")), false);
        let json: serde_json::Value = serde_json::from_str(&header).unwrap();
        assert!(json.get("cart-updated").is_none());
        assert_eq!(json["notice"]["message"], "Procesando...");

        assert_eq!(hx_trigger(None, true), r#"{"cart-updated":null}"#);
    }

    #[test]
    fn test_notice_with_description() {
        let notice = Notice::success("¡Pedido realizado con éxito!")
            .with_description("Te enviaremos un email de confirmación.");
        assert!(notice.is_success());
        assert_eq!(
            notice.description.as_deref(),
            Some("Te enviaremos un email de confirmación.")
        );
    }
}

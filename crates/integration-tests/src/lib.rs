//! Integration tests for the Artesanía Madera storefront.
//!
//! Requests run in-process against the full router, including the session,
//! CSP and rate limiting layers, so no server needs to be running.
//!
//! Run with: cargo test -p artesania-integration-tests
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Catalog filtering, sorting and product pages
//! - `storefront_cart` - Session cart operations
//! - `storefront_checkout` - Checkout validation and order placement

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use tower::ServiceExt;

use artesania_storefront::config::{ConfigError, StorefrontConfig};
use artesania_storefront::routes;
use artesania_storefront::state::AppState;

/// Error type for test helpers; `Send` so requests can run in spawned tasks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for tests and test helpers.
pub type TestResult<T = ()> = Result<T, BoxError>;

/// Name of the storefront session cookie.
pub const SESSION_COOKIE: &str = "artesania_session";

/// Build a storefront configuration with the given simulated order latency.
///
/// # Errors
///
/// Returns `ConfigError` if the built-in defaults fail to parse.
pub fn test_config(order_latency: Duration) -> Result<StorefrontConfig, ConfigError> {
    let latency = order_latency.as_millis().to_string();
    StorefrontConfig::from_lookup(|key| match key {
        "STOREFRONT_ORDER_LATENCY_MS" => Some(latency.clone()),
        _ => None,
    })
}

/// A response with its body collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Get a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parse the `HX-Trigger` header.
    #[must_use]
    pub fn trigger(&self) -> Option<serde_json::Value> {
        self.header("HX-Trigger")
            .and_then(|v| serde_json::from_str(v).ok())
    }

    /// The message of the `notice` event, if one was triggered.
    #[must_use]
    pub fn notice_message(&self) -> Option<String> {
        self.trigger()?
            .get("notice")?
            .get("message")?
            .as_str()
            .map(str::to_owned)
    }
}

/// An in-process client that carries the session cookie between requests.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Create a client over a fresh storefront with instant order placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or catalog fails to load.
    pub fn new() -> TestResult<Self> {
        Self::with_latency(Duration::ZERO)
    }

    /// Create a client over a fresh storefront with the given order latency.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or catalog fails to load.
    pub fn with_latency(order_latency: Duration) -> TestResult<Self> {
        let state = AppState::new(test_config(order_latency)?)?;
        Ok(Self {
            app: routes::app(state),
            cookie: None,
        })
    }

    /// The session cookie, once the storefront has issued one.
    #[must_use]
    pub fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Forget the session cookie, as a new visitor would.
    pub fn clear_cookie(&mut self) {
        self.cookie = None;
    }

    /// Send a full-page GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn get(&mut self, uri: &str) -> TestResult<TestResponse> {
        self.send(Method::GET, uri, None, false).await
    }

    /// Send a GET request as htmx would.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn htmx_get(
        &mut self,
        uri: &str,
    ) -> TestResult<TestResponse> {
        self.send(Method::GET, uri, None, true).await
    }

    /// Send a form POST as htmx would.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn htmx_post(
        &mut self,
        uri: &str,
        form: &[(&str, &str)],
    ) -> TestResult<TestResponse> {
        self.send(Method::POST, uri, Some(encode_form(form)), true)
            .await
    }

    /// Send a plain form POST.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn post(
        &mut self,
        uri: &str,
        form: &[(&str, &str)],
    ) -> TestResult<TestResponse> {
        self.send(Method::POST, uri, Some(encode_form(form)), false)
            .await
    }

    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        form: Option<String>,
        htmx: bool,
    ) -> TestResult<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if htmx {
            builder = builder.header("HX-Request", "true");
        }
        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;

        if let Some(cookie) = session_cookie(&headers) {
            self.cookie = Some(cookie);
        }

        Ok(TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Extract `name=value` of the session cookie from `Set-Cookie` headers.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(SESSION_COOKIE))
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

/// Form-encode key/value pairs.
fn encode_form(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// A checkout form that passes validation.
#[must_use]
pub fn valid_checkout_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("first_name", "Lucía"),
        ("last_name", "Fernández"),
        ("email", "lucia@example.com"),
        ("phone", "+54 11 5555-1234"),
        ("address", "Av. Corrientes 1234"),
        ("city", "Buenos Aires"),
        ("province", "CABA"),
        ("postal_code", "C1043"),
        ("notes", ""),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_form() {
        assert_eq!(
            encode_form(&[("email", "a+b@example.com"), ("city", "San Juan")]),
            "email=a%2Bb%40example.com&city=San%20Juan"
        );
        assert_eq!(encode_form(&[("first_name", "Lucía")]), "first_name=Luc%C3%ADa");
    }

    #[test]
    fn test_session_cookie_extraction() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::SET_COOKIE,
            "artesania_session=abc123; HttpOnly; SameSite=Lax; Path=/"
                .parse()
                .unwrap(),
        );
        assert_eq!(
            session_cookie(&headers).as_deref(),
            Some("artesania_session=abc123")
        );
    }

    #[test]
    fn test_config_latency() {
        let config = test_config(Duration::from_millis(250)).unwrap();
        assert_eq!(config.order_latency, Duration::from_millis(250));
    }
}

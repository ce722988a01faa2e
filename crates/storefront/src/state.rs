//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{Catalog, CatalogError};
use crate::checkout::SubmissionGuard;
use crate::config::StorefrontConfig;
use crate::services::SimulatedOrderService;

/// How long a submission claim outlives the configured order latency.
const SUBMISSION_GRACE: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the order service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    orders: SimulatedOrderService,
    submissions: SubmissionGuard,
}

impl AppState {
    /// Create application state over the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in catalog is inconsistent.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        Ok(Self::with_catalog(config, Catalog::builtin()?))
    }

    /// Create application state over a specific catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let orders = SimulatedOrderService::new(config.order_latency);
        let submissions = SubmissionGuard::new(config.order_latency + SUBMISSION_GRACE);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Arc::new(catalog),
                orders,
                submissions,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &SimulatedOrderService {
        &self.inner.orders
    }

    /// Get a reference to the checkout submission guard.
    #[must_use]
    pub fn submissions(&self) -> &SubmissionGuard {
        &self.inner.submissions
    }
}

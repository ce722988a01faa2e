//! Product domain type.

use serde::Serialize;

use artesania_core::{Price, ProductId, StockLevel};

/// A piece of furniture offered in the catalog.
///
/// Products are immutable once the catalog is built; carts hold shared
/// references to them and never modify them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Unique slug, also the key of the product detail route.
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub price: Price,
    /// Upper bound on the quantity a single cart may hold.
    pub stock: u32,
    pub description: String,
    pub materials: Vec<String>,
    pub dimensions: String,
    /// Path of the product photo under `/static`.
    pub image: String,
}

impl Product {
    /// Availability classification for display.
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::from_stock(self.stock)
    }

    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.stock > 0
    }
}

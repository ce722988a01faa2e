//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Availability of a product, derived from its stock count.
///
/// Products with more than [`StockLevel::LOW_STOCK_THRESHOLD`] units are
/// comfortably in stock; below that the storefront warns the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", content = "units", rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    LastUnit,
    Low(u32),
    InStock(u32),
}

impl StockLevel {
    /// Highest stock count still considered "low".
    pub const LOW_STOCK_THRESHOLD: u32 = 5;

    /// Classify a stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        match stock {
            0 => Self::OutOfStock,
            1 => Self::LastUnit,
            n if n <= Self::LOW_STOCK_THRESHOLD => Self::Low(n),
            n => Self::InStock(n),
        }
    }

    /// Whether at least one unit can be bought.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::OutOfStock)
    }

    /// Whether the shopper should be warned about scarcity.
    #[must_use]
    pub const fn is_scarce(&self) -> bool {
        matches!(self, Self::LastUnit | Self::Low(_))
    }

    /// Customer-facing label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::OutOfStock => "Agotado".to_owned(),
            Self::LastUnit => "¡Última unidad!".to_owned(),
            Self::Low(n) => format!("Solo {n} unidades disponibles"),
            Self::InStock(n) => format!("{n} unidades en stock"),
        }
    }
}

impl From<u32> for StockLevel {
    fn from(stock: u32) -> Self {
        Self::from_stock(stock)
    }
}

//! Product catalog and catalog queries.
//!
//! The catalog is a fixed, read-only list of products built once at startup
//! and shared through [`Arc`]. Queries never mutate it: filtering and sorting
//! always produce a fresh `Vec` of shared product references.

mod data;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use artesania_core::ProductId;

use crate::models::Product;

/// Errors raised by catalog construction and lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No product has this ID.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// Two products were declared with the same ID.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),
}

/// A category name known to exist in the catalog.
///
/// Only [`Catalog::categories`] and [`Catalog::category`] hand these out, so a
/// `Category` can never name something the catalog doesn't contain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing order for catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Catalog declaration order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
}

/// A sort mode string that isn't one of the known values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown sort mode: {0}")]
pub struct UnknownSortMode(pub String);

impl SortMode {
    /// All modes, in the order the sort selector lists them.
    pub const ALL: [Self; 3] = [Self::Default, Self::PriceAsc, Self::PriceDesc];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    /// Label for the sort selector.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Default => "Destacados",
            Self::PriceAsc => "Precio: menor a mayor",
            Self::PriceDesc => "Precio: mayor a menor",
        }
    }

    /// Parse an optional query parameter, falling back to [`SortMode::Default`]
    /// for missing or unknown values.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        param.and_then(|p| p.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            other => Err(UnknownSortMode(other.to_owned())),
        }
    }
}

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from products in display order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if two products share an ID.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self {
            products: products.into_iter().map(Arc::new).collect(),
            index,
        })
    }

    /// The built-in furniture collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in data declares a duplicate ID.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(data::products())
    }

    /// All products in declaration order.
    #[must_use]
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product has this ID.
    pub fn product(&self, id: &ProductId) -> Result<Arc<Product>, CatalogError> {
        self.index
            .get(id)
            .and_then(|&position| self.products.get(position))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Distinct categories present in the catalog, sorted lexicographically.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|name| Category(name.to_owned()))
            .collect()
    }

    /// Validate a category name against the catalog.
    ///
    /// Returns `None` for names no product carries (exact match).
    #[must_use]
    pub fn category(&self, name: &str) -> Option<Category> {
        self.products
            .iter()
            .any(|p| p.category == name)
            .then(|| Category(name.to_owned()))
    }

    /// Products in `category` (all products for `None`), ordered by `sort`.
    ///
    /// Sorting is stable: products with equal prices keep their declaration
    /// order for both ascending and descending modes.
    #[must_use]
    pub fn filter_and_sort(&self, category: Option<&Category>, sort: SortMode) -> Vec<Arc<Product>> {
        let mut view: Vec<Arc<Product>> = self
            .products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c.as_str()))
            .cloned()
            .collect();

        match sort {
            SortMode::Default => {}
            SortMode::PriceAsc => view.sort_by_key(|p| p.price),
            SortMode::PriceDesc => view.sort_by(|a, b| b.price.cmp(&a.price)),
        }

        view
    }

    /// Up to `limit` other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<Arc<Product>> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .cloned()
            .collect()
    }
}

//! Shopping cart state.
//!
//! A [`Cart`] is a plain owned value: route handlers load it from the
//! shopper's session, mutate it, and store it back. It holds shared
//! references to catalog products and never changes them.
//!
//! Every entry satisfies `1 <= quantity <= product.stock`, and there is at
//! most one entry per product. Totals are computed on each read.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use artesania_core::{Price, ProductId};

use crate::catalog::Catalog;
use crate::models::Product;

/// Errors raised by cart mutations. The cart is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity exceeds the product's stock.
    #[error("only {available} units of {product} available")]
    InsufficientStock {
        product: ProductId,
        available: u32,
    },

    /// Adding zero units.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// Result of a successful [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product was not in the cart before.
    Added,
    /// The quantity of an existing entry was increased.
    Updated,
}

/// Result of a successful [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// A quantity of zero or less removed the entry.
    Removed,
    /// No entry for that product; nothing changed.
    NotInCart,
}

/// One product and how many units of it the shopper wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    pub product: Arc<Product>,
    pub quantity: u32,
}

impl CartEntry {
    /// `quantity × price`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// Session representation of a cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The shopper's cart. Entries keep insertion order for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a cart from session lines.
    ///
    /// Lines for products that are no longer in the catalog are dropped, as
    /// are duplicates of an already restored product. Quantities above the
    /// current stock are clamped to it; lines left at zero are dropped.
    #[must_use]
    pub fn from_lines(lines: &[CartLine], catalog: &Catalog) -> Self {
        let mut cart = Self::new();
        for line in lines {
            let Ok(product) = catalog.product(&line.product_id) else {
                tracing::debug!(product_id = %line.product_id, "Dropping cart line for unknown product");
                continue;
            };
            if cart.get(&product.id).is_some() {
                continue;
            }
            let quantity = line.quantity.min(product.stock);
            if quantity > 0 {
                cart.entries.push(CartEntry { product, quantity });
            }
        }
        cart
    }

    /// Session snapshot of the cart.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.entries
            .iter()
            .map(|entry| CartLine {
                product_id: entry.product.id.clone(),
                quantity: entry.quantity,
            })
            .collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// The entry for a product, if present.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.product.id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Add `quantity` units of `product`, merging with an existing entry.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is zero.
    /// - [`CartError::InsufficientStock`] if the resulting quantity would
    ///   exceed the product's stock. The cart is unchanged.
    pub fn add(&mut self, product: Arc<Product>, quantity: u32) -> Result<AddOutcome, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let insufficient = |product: &Product| CartError::InsufficientStock {
            product: product.id.clone(),
            available: product.stock,
        };

        if let Some(entry) = self.entries.iter_mut().find(|e| e.product.id == product.id) {
            let merged = entry.quantity.saturating_add(quantity);
            if merged > product.stock {
                return Err(insufficient(&product));
            }
            entry.quantity = merged;
            return Ok(AddOutcome::Updated);
        }

        if quantity > product.stock {
            return Err(insufficient(&product));
        }
        self.entries.push(CartEntry { product, quantity });
        Ok(AddOutcome::Added)
    }

    /// Set the quantity of an existing entry.
    ///
    /// A quantity of zero or less removes the entry. Unknown products are a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InsufficientStock`] if `quantity` exceeds the
    /// product's stock. The entry is unchanged.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<UpdateOutcome, CartError> {
        if quantity <= 0 {
            return Ok(self
                .remove(product_id)
                .map_or(UpdateOutcome::NotInCart, |_| UpdateOutcome::Removed));
        }

        let Some(entry) = self.entries.iter_mut().find(|e| &e.product.id == product_id) else {
            return Ok(UpdateOutcome::NotInCart);
        };

        match u32::try_from(quantity) {
            Ok(quantity) if quantity <= entry.product.stock => {
                entry.quantity = quantity;
                Ok(UpdateOutcome::Updated)
            }
            _ => Err(CartError::InsufficientStock {
                product: entry.product.id.clone(),
                available: entry.product.stock,
            }),
        }
    }

    /// Remove the entry for a product, returning it if it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartEntry> {
        let position = self.entries.iter().position(|e| &e.product.id == product_id)?;
        Some(self.entries.remove(position))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.entries
            .iter()
            .fold(0, |sum, e| sum.saturating_add(e.quantity))
    }

    /// Sum of `quantity × price` over all entries.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn product(catalog: &Catalog, id: &str) -> Arc<Product> {
        catalog.product(&ProductId::new(id)).unwrap()
    }

    #[test]
    fn test_add_within_stock_creates_entry() {
        let catalog = catalog();
        let chair = product(&catalog, "silla-copenhagen");

        for q in 1..=chair.stock {
            let mut cart = Cart::new();
            assert_eq!(cart.add(Arc::clone(&chair), q), Ok(AddOutcome::Added));
            assert_eq!(cart.get(&chair.id).unwrap().quantity, q);
            assert_eq!(cart.len(), 1);
        }
    }

    #[test]
    fn test_add_above_stock_rejected_without_mutation() {
        let catalog = catalog();
        let desk = product(&catalog, "escritorio-ejecutivo");
        let mut cart = Cart::new();

        assert_eq!(
            cart.add(Arc::clone(&desk), 3),
            Err(CartError::InsufficientStock {
                product: desk.id.clone(),
                available: 2,
            })
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_zero_rejected() {
        let catalog = catalog();
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(product(&catalog, "mesita-cerezo"), 0),
            Err(CartError::InvalidQuantity)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_twice_merges_quantities() {
        let catalog = catalog();
        let nightstand = product(&catalog, "mesita-cerezo");
        let mut cart = Cart::new();

        cart.add(Arc::clone(&nightstand), 3).unwrap();
        assert_eq!(cart.add(Arc::clone(&nightstand), 5), Ok(AddOutcome::Updated));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&nightstand.id).unwrap().quantity, 8);
    }

    #[test]
    fn test_second_add_over_stock_keeps_first_quantity() {
        let catalog = catalog();
        let nightstand = product(&catalog, "mesita-cerezo");
        let mut cart = Cart::new();

        cart.add(Arc::clone(&nightstand), 6).unwrap();
        assert!(matches!(
            cart.add(Arc::clone(&nightstand), 3),
            Err(CartError::InsufficientStock { available: 8, .. })
        ));
        assert_eq!(cart.get(&nightstand.id).unwrap().quantity, 6);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let catalog = catalog();
        let rack = product(&catalog, "perchero-pared");
        let mut cart = Cart::new();
        cart.add(Arc::clone(&rack), 1).unwrap();

        assert_eq!(cart.update_quantity(&rack.id, 15), Ok(UpdateOutcome::Updated));
        assert_eq!(cart.get(&rack.id).unwrap().quantity, 15);
    }

    #[test]
    fn test_update_quantity_over_stock_rejected() {
        let catalog = catalog();
        let cabinet = product(&catalog, "vitrina-clasica");
        let mut cart = Cart::new();
        cart.add(Arc::clone(&cabinet), 1).unwrap();

        assert!(matches!(
            cart.update_quantity(&cabinet.id, 2),
            Err(CartError::InsufficientStock { available: 1, .. })
        ));
        assert!(cart.update_quantity(&cabinet.id, i64::MAX).is_err());
        assert_eq!(cart.get(&cabinet.id).unwrap().quantity, 1);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let catalog = catalog();
        let bed = product(&catalog, "cama-rustica");
        let mirror = product(&catalog, "espejo-circular");
        let mut cart = Cart::new();
        cart.add(Arc::clone(&bed), 1).unwrap();
        cart.add(Arc::clone(&mirror), 2).unwrap();

        assert_eq!(cart.update_quantity(&bed.id, 0), Ok(UpdateOutcome::Removed));
        assert_eq!(cart.update_quantity(&mirror.id, -1), Ok(UpdateOutcome::Removed));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(product(&catalog, "banco-jardin"), 1).unwrap();
        let before = cart.clone();

        let missing = ProductId::new("silla-copenhagen");
        assert_eq!(cart.update_quantity(&missing, 4), Ok(UpdateOutcome::NotInCart));
        assert_eq!(cart.update_quantity(&missing, 0), Ok(UpdateOutcome::NotInCart));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_present_and_absent() {
        let catalog = catalog();
        let bench = product(&catalog, "banco-jardin");
        let mut cart = Cart::new();
        cart.add(Arc::clone(&bench), 2).unwrap();
        let before = cart.clone();

        assert!(cart.remove(&ProductId::new("sillon-cuero")).is_none());
        assert_eq!(cart, before);

        let removed = cart.remove(&bench.id).unwrap();
        assert_eq!(removed.quantity, 2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_follow_entries() {
        let catalog = catalog();
        let mut cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);

        cart.add(product(&catalog, "silla-copenhagen"), 4).unwrap();
        cart.add(product(&catalog, "mesa-roble-imperial"), 1).unwrap();
        cart.add(product(&catalog, "perchero-pared"), 2).unwrap();

        let expected_items: u32 = cart.entries().iter().map(|e| e.quantity).sum();
        let expected_price: u64 = cart
            .entries()
            .iter()
            .map(|e| e.product.price.amount * u64::from(e.quantity))
            .sum();
        assert_eq!(cart.total_items(), expected_items);
        assert_eq!(cart.total_items(), 7);
        assert_eq!(cart.total_price(), Price::ars(expected_price));
        assert_eq!(cart.total_price(), Price::ars(4_960_000));

        cart.update_quantity(&ProductId::new("silla-copenhagen"), 1).unwrap();
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price(), Price::ars(3_505_000));
    }

    #[test]
    fn test_clear_empties_cart() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(product(&catalog, "libreria-nordica"), 2).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(product(&catalog, "perchero-pared"), 1).unwrap();
        cart.add(product(&catalog, "mesa-roble-imperial"), 1).unwrap();
        cart.add(product(&catalog, "perchero-pared"), 1).unwrap();

        let order: Vec<&str> = cart.entries().iter().map(|e| e.product.id.as_str()).collect();
        assert_eq!(order, vec!["perchero-pared", "mesa-roble-imperial"]);
    }

    #[test]
    fn test_lines_restore_through_catalog() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(product(&catalog, "sillon-cuero"), 2).unwrap();
        cart.add(product(&catalog, "estante-plantas"), 5).unwrap();

        let restored = Cart::from_lines(&cart.lines(), &catalog);
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_from_lines_drops_unknown_and_clamps_to_stock() {
        let catalog = catalog();
        let lines = vec![
            CartLine {
                product_id: ProductId::new("producto-retirado"),
                quantity: 1,
            },
            CartLine {
                product_id: ProductId::new("vitrina-clasica"),
                quantity: 4,
            },
            CartLine {
                product_id: ProductId::new("vitrina-clasica"),
                quantity: 1,
            },
            CartLine {
                product_id: ProductId::new("silla-copenhagen"),
                quantity: 0,
            },
        ];

        let cart = Cart::from_lines(&lines, &catalog);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&ProductId::new("vitrina-clasica")).unwrap().quantity, 1);
    }

    #[test]
    fn test_cart_never_mutates_products() {
        let catalog = catalog();
        let chair = product(&catalog, "silla-copenhagen");
        let mut cart = Cart::new();
        cart.add(Arc::clone(&chair), 12).unwrap();
        cart.clear();

        assert_eq!(product(&catalog, "silla-copenhagen").stock, 12);
    }
}

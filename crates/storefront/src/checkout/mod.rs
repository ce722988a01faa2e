//! Checkout flow.
//!
//! A [`CheckoutFlow`] walks one submission through
//! `Editing -> Validating -> Submitting -> Succeeded`, falling back to
//! `Editing` with field errors when validation fails. The order is built from
//! a snapshot of the cart taken when the flow begins.

pub mod guard;
pub mod validation;

use serde::Serialize;
use thiserror::Error;

use artesania_core::{OrderId, Price, ProductId};

use crate::cart::{Cart, CartEntry};
use crate::services::orders::OrderConfirmation;

pub use guard::{SubmissionClaim, SubmissionGuard};
pub use validation::{CheckoutField, CheckoutForm, FieldErrors, ShippingDetails};

/// Subtotal from which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::ars(500_000);

/// Flat shipping fee below the free shipping threshold.
pub const SHIPPING_FEE: Price = Price::ars(25_000);

/// Errors from the checkout flow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("checkout already completed")]
    AlreadyCompleted,

    #[error("no submission in flight")]
    NotSubmitting,
}

/// Subtotal, shipping and grand total of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Apply the shipping rule to a subtotal.
    #[must_use]
    pub fn for_subtotal(subtotal: Price) -> Self {
        let shipping = if subtotal.amount >= FREE_SHIPPING_THRESHOLD.amount {
            Price::new(0, subtotal.currency_code)
        } else {
            Price::new(SHIPPING_FEE.amount, subtotal.currency_code)
        };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    /// Totals for the current contents of a cart.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        Self::for_subtotal(cart.total_price())
    }

    #[must_use]
    pub const fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// One line of an order, frozen at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartEntry> for OrderLine {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product.id.clone(),
            title: entry.product.title.clone(),
            unit_price: entry.product.price,
            quantity: entry.quantity,
            line_total: entry.line_total(),
        }
    }
}

/// A validated order ready to be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingOrder {
    pub details: ShippingDetails,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
}

impl PendingOrder {
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }
}

/// Where a checkout currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPhase {
    Editing { errors: FieldErrors },
    Validating,
    Submitting,
    Succeeded { order_id: OrderId },
}

impl CheckoutPhase {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// State machine for a single checkout.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    phase: CheckoutPhase,
    lines: Vec<OrderLine>,
    totals: OrderTotals,
}

impl CheckoutFlow {
    /// Start a checkout over the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no entries.
    pub fn begin(cart: &Cart) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self {
            phase: CheckoutPhase::Editing {
                errors: FieldErrors::default(),
            },
            lines: cart.entries().iter().map(OrderLine::from).collect(),
            totals: OrderTotals::for_cart(cart),
        })
    }

    #[must_use]
    pub const fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    #[must_use]
    pub const fn totals(&self) -> OrderTotals {
        self.totals
    }

    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Validate the form and move to `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` with every failing field (the flow returns to
    /// `Editing`), `SubmissionInFlight` while a previous submit is pending,
    /// and `AlreadyCompleted` once the order has been placed.
    pub fn submit(&mut self, form: &CheckoutForm) -> Result<PendingOrder, CheckoutError> {
        match self.phase {
            CheckoutPhase::Editing { .. } => {}
            CheckoutPhase::Validating | CheckoutPhase::Submitting => {
                return Err(CheckoutError::SubmissionInFlight);
            }
            CheckoutPhase::Succeeded { .. } => return Err(CheckoutError::AlreadyCompleted),
        }

        self.phase = CheckoutPhase::Validating;

        match form.validate() {
            Ok(details) => {
                self.phase = CheckoutPhase::Submitting;
                Ok(PendingOrder {
                    details,
                    lines: self.lines.clone(),
                    totals: self.totals,
                })
            }
            Err(errors) => {
                self.phase = CheckoutPhase::Editing {
                    errors: errors.clone(),
                };
                Err(CheckoutError::Validation(errors))
            }
        }
    }

    /// Record the placed order.
    ///
    /// # Errors
    ///
    /// Returns `NotSubmitting` unless a submission is pending, or
    /// `AlreadyCompleted` if one was already recorded.
    pub fn complete(&mut self, confirmation: &OrderConfirmation) -> Result<(), CheckoutError> {
        match self.phase {
            CheckoutPhase::Submitting => {
                self.phase = CheckoutPhase::Succeeded {
                    order_id: confirmation.order_id,
                };
                Ok(())
            }
            CheckoutPhase::Succeeded { .. } => Err(CheckoutError::AlreadyCompleted),
            CheckoutPhase::Editing { .. } | CheckoutPhase::Validating => {
                Err(CheckoutError::NotSubmitting)
            }
        }
    }
}

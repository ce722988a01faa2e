//! Order placement.
//!
//! Orders are not persisted or charged anywhere. Placing one waits for a
//! configurable latency, assigns an order id and logs the result.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use artesania_core::{Email, OrderId};

use crate::checkout::{OrderTotals, PendingOrder};

/// Receipt for a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub totals: OrderTotals,
    pub item_count: u32,
    pub line_count: usize,
    pub customer_email: Email,
}

impl OrderConfirmation {
    /// Issue a confirmation for an order, stamped now.
    #[must_use]
    pub fn for_order(order: &PendingOrder) -> Self {
        Self {
            order_id: OrderId::generate(),
            placed_at: Utc::now(),
            totals: order.totals,
            item_count: order.item_count(),
            line_count: order.lines.len(),
            customer_email: order.details.email.clone(),
        }
    }
}

/// Order service with simulated processing latency.
#[derive(Debug, Clone)]
pub struct SimulatedOrderService {
    latency: Duration,
}

impl SimulatedOrderService {
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Place an order. Never fails.
    #[instrument(
        skip_all,
        fields(lines = order.lines.len(), total = %order.totals.total)
    )]
    pub async fn place(&self, order: PendingOrder) -> OrderConfirmation {
        tokio::time::sleep(self.latency).await;

        let confirmation = OrderConfirmation::for_order(&order);
        tracing::info!(
            order_id = %confirmation.order_id,
            reference = %confirmation.order_id.reference(),
            items = confirmation.item_count,
            subtotal = %confirmation.totals.subtotal,
            shipping = %confirmation.totals.shipping,
            total = %confirmation.totals.total,
            city = %order.details.city,
            province = %order.details.province,
            "Order placed"
        );

        confirmation
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use artesania_core::{Price, ProductId};

    use super::*;
    use crate::cart::Cart;
    use crate::catalog::Catalog;
    use crate::checkout::{CheckoutFlow, CheckoutForm};

    fn pending_order() -> PendingOrder {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new();
        cart.add(
            Arc::clone(&catalog.product(&ProductId::new("estante-plantas")).unwrap()),
            1,
        )
        .unwrap();

        let form = CheckoutForm {
            first_name: "Martín".to_owned(),
            last_name: "Gómez".to_owned(),
            email: "martin@example.com".to_owned(),
            phone: "1145678901".to_owned(),
            address: "Calle Falsa 123".to_owned(),
            city: "Rosario".to_owned(),
            province: "Santa Fe".to_owned(),
            postal_code: "2000".to_owned(),
            notes: Some("Tocar timbre".to_owned()),
        };

        CheckoutFlow::begin(&cart).unwrap().submit(&form).unwrap()
    }

    #[tokio::test]
    async fn test_place_waits_for_latency() {
        tokio::time::pause();
        let service = SimulatedOrderService::new(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();

        let confirmation = service.place(pending_order()).await;

        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(confirmation.item_count, 1);
        assert_eq!(confirmation.line_count, 1);
        assert_eq!(confirmation.totals.subtotal, Price::ars(345_000));
        assert_eq!(confirmation.totals.total, Price::ars(370_000));
        assert_eq!(confirmation.customer_email.as_str(), "martin@example.com");
    }

    #[tokio::test]
    async fn test_each_order_gets_a_fresh_id() {
        let service = SimulatedOrderService::new(Duration::ZERO);
        let first = service.place(pending_order()).await;
        let second = service.place(pending_order()).await;
        assert_ne!(first.order_id, second.order_id);
    }
}

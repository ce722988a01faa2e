//! Business logic services for storefront.
//!
//! # Services
//!
//! - `orders` - Order placement (simulated, no payment or persistence)

pub mod orders;

pub use orders::{OrderConfirmation, SimulatedOrderService};

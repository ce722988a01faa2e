//! Domain models for storefront.

pub mod product;
pub mod session;

pub use product::Product;
pub use session::{Notice, NoticeLevel, hx_trigger, session_keys};

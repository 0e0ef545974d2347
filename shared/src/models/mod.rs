//! Data models
//!
//! `order` holds what the remote platform hands us for one cycle,
//! `product` holds what is persisted and served.

pub mod order;
pub mod product;

// Re-exports
pub use order::*;
pub use product::*;

//! Till
//!
//! Till is a shopping cart and billing calculator: a product catalog, a cart with per-item
//! and cart-level discounts, single-step undo, and sorted receipts.

pub mod actions;
pub mod billing;
pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;

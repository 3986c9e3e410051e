//! Till prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    actions::{Action, UndoError, UndoHistory},
    billing::{BillingError, BillingSystem},
    cart::{Cart, CartError, SortCriteria},
    catalog::Catalog,
    discounts::{DiscountError, DiscountRule},
    fixtures::{FixtureError, load_catalog, parse_catalog},
    items::CartItem,
    pricing::{CartDiscountPolicy, PricingError, Totals},
    products::{Product, ProductId},
    receipt::{Receipt, ReceiptError, ReceiptLine},
};

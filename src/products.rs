//! Products

use std::{borrow::Borrow, cell::Cell, fmt};

use rusty_money::{Money, iso::Currency};

use crate::discounts::DiscountRule;

/// Product identifier, unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Product
///
/// Products are shared between the catalog and any cart items that reference them.
/// The price and discount rule can be corrected after the fact; carts always read
/// the current values when they compute totals.
#[derive(Debug)]
pub struct Product<'a> {
    id: ProductId,
    name: String,
    price: Cell<Money<'a, Currency>>,
    discount: Cell<DiscountRule>,
}

impl<'a> Product<'a> {
    /// Create a product without a discount.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self::with_discount(id, name, price, DiscountRule::None)
    }

    /// Create a product with the given discount rule.
    pub fn with_discount(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
        discount: DiscountRule,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: Cell::new(price),
            discount: Cell::new(discount),
        }
    }

    /// Product identifier
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current unit price
    pub fn price(&self) -> Money<'a, Currency> {
        self.price.get()
    }

    /// Current discount rule
    pub fn discount(&self) -> DiscountRule {
        self.discount.get()
    }

    /// Correct the unit price.
    pub fn set_price(&self, price: Money<'a, Currency>) {
        tracing::debug!(product = %self.id, %price, "product price updated");

        self.price.set(price);
    }

    /// Replace the discount rule.
    pub fn set_discount(&self, discount: DiscountRule) {
        tracing::debug!(product = %self.id, ?discount, "product discount updated");

        self.discount.set(discount);
    }
}

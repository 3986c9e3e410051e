//! Cart

use std::rc::Rc;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    actions::{Action, UndoError, UndoHistory},
    items::CartItem,
    pricing::{CartDiscountPolicy, PricingError, Totals, sum},
    products::{Product, ProductId},
    receipt::{Receipt, ReceiptError},
};

/// Errors returned when a cart mutation is rejected.
///
/// A rejected mutation leaves both the items and the undo history untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantities must be at least one.
    #[error("quantity must be positive")]
    InvalidQuantity,

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    UnknownProduct(ProductId),

    /// The product is priced in a different currency to the cart.
    #[error("product {product} is priced in {actual}, but the cart uses {expected}")]
    CurrencyMismatch {
        /// Product that was rejected
        product: ProductId,

        /// Cart currency
        expected: &'static str,

        /// Product currency
        actual: &'static str,
    },

    /// Adding the units would overflow the item quantity.
    #[error("quantity of product {0} overflowed")]
    QuantityOverflow(ProductId),
}

/// Order in which cart items are listed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortCriteria {
    /// Product name, A to Z.
    #[default]
    Name,

    /// Quantity, largest first.
    Quantity,

    /// Final (discounted) line price, most expensive first.
    Price,
}

/// Shopping cart
#[derive(Debug)]
pub struct Cart<'a> {
    items: FxHashMap<ProductId, CartItem<'a>>,
    history: UndoHistory,
    policy: CartDiscountPolicy<'a>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart using the standard cart discount policy.
    pub fn new(currency: &'a Currency) -> Self {
        Self::with_policy(CartDiscountPolicy::standard(currency))
    }

    /// Create an empty cart with a custom cart discount policy.
    ///
    /// The cart uses the currency the policy threshold is expressed in.
    pub fn with_policy(policy: CartDiscountPolicy<'a>) -> Self {
        Cart {
            items: FxHashMap::default(),
            history: UndoHistory::new(),
            policy,
        }
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.policy.currency()
    }

    /// Get the cart discount policy.
    pub fn policy(&self) -> &CartDiscountPolicy<'a> {
        &self.policy
    }

    /// Add `quantity` units of `product`, merging with any units already in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the quantity is zero, the product is priced in another
    /// currency, or the merged quantity would overflow.
    pub fn add_product(
        &mut self,
        product: &Rc<Product<'a>>,
        quantity: u32,
    ) -> Result<(), CartError> {
        let id = product.id();

        if quantity == 0 {
            warn!(product = %id, "rejected add with zero quantity");

            return Err(CartError::InvalidQuantity);
        }

        let product_currency = product.price().currency();

        if product_currency != self.currency() {
            warn!(
                product = %id,
                currency = product_currency.iso_alpha_code,
                "rejected add in foreign currency"
            );

            return Err(CartError::CurrencyMismatch {
                product: id.clone(),
                expected: self.currency().iso_alpha_code,
                actual: product_currency.iso_alpha_code,
            });
        }

        let merged = match self.items.get(id) {
            Some(item) => item
                .quantity()
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(id.clone()))?,
            None => quantity,
        };

        self.history.push(Action::Add {
            product: id.clone(),
            quantity,
        });

        self.items
            .entry(id.clone())
            .and_modify(|item| item.set_quantity(merged))
            .or_insert_with(|| CartItem::new(Rc::clone(product), quantity));

        debug!(product = %id, quantity, merged, "added to cart");

        Ok(())
    }

    /// Remove up to `quantity` units of a product.
    ///
    /// Removing as many units as are in the cart, or more, removes the item entirely.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the quantity is zero or the product is not in the cart.
    pub fn remove_product(&mut self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            warn!(product = product_id, "rejected remove with zero quantity");

            return Err(CartError::InvalidQuantity);
        }

        let Some(id) = self.items.get(product_id).map(|item| item.product().id().clone()) else {
            warn!(product = product_id, "rejected remove of product not in cart");

            return Err(CartError::UnknownProduct(ProductId::new(product_id)));
        };

        let removed = self.take(product_id, quantity);

        self.history.push(Action::Remove {
            product: id.clone(),
            quantity: removed,
        });

        debug!(product = %id, requested = quantity, removed, "removed from cart");

        Ok(())
    }

    /// Undo the most recent add or remove.
    ///
    /// The action is consumed even when it cannot be undone.
    ///
    /// # Errors
    ///
    /// - [`UndoError::NothingToUndo`]: the history is empty.
    /// - [`UndoError::ItemEvicted`]: the action was a removal and the item has since left
    ///   the cart, so there is no product to restore the units to.
    pub fn undo_last_action(&mut self) -> Result<Action, UndoError> {
        let action = self.history.pop()?;

        match &action {
            Action::Add { product, quantity } => {
                self.take(product.as_str(), *quantity);
            }
            Action::Remove { product, quantity } => {
                let Some(item) = self.items.get_mut(product.as_str()) else {
                    warn!(product = %product, quantity, "cannot undo removal of evicted item");

                    return Err(UndoError::ItemEvicted(product.clone()));
                };

                item.set_quantity(item.quantity().saturating_add(*quantity));
            }
        }

        debug!(?action, remaining = self.history.len(), "undid cart action");

        Ok(action)
    }

    /// Take up to `quantity` units of a product out of the cart, dropping the item once it
    /// would reach zero. Returns the number of units actually taken.
    fn take(&mut self, product_id: &str, quantity: u32) -> u32 {
        let Some(current) = self.items.get(product_id).map(CartItem::quantity) else {
            return 0;
        };

        if quantity >= current {
            self.items.remove(product_id);

            return current;
        }

        if let Some(item) = self.items.get_mut(product_id) {
            item.set_quantity(current - quantity);
        }

        quantity
    }

    /// Calculate the subtotal of the cart before any discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if there was a money arithmetic or overflow error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        sum(self.items.values().map(CartItem::subtotal), self.currency())
    }

    /// Calculate the sum of all per-item discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if there was a money arithmetic or overflow error.
    pub fn item_discounts_total(&self) -> Result<Money<'a, Currency>, PricingError> {
        sum(
            self.items.values().map(CartItem::discount_amount),
            self.currency(),
        )
    }

    /// Calculate the cart-level discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if there was a money arithmetic or overflow error.
    pub fn cart_discount(&self) -> Result<Money<'a, Currency>, PricingError> {
        Ok(self.totals()?.cart_discount)
    }

    /// Calculate the amount payable after all discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if there was a money arithmetic or overflow error.
    pub fn total(&self) -> Result<Money<'a, Currency>, PricingError> {
        Ok(self.totals()?.total)
    }

    /// Calculate every amount that makes up the total in one pass.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if there was a money arithmetic or overflow error.
    pub fn totals(&self) -> Result<Totals<'a>, PricingError> {
        let subtotal = self.subtotal()?;
        let item_discounts = self.item_discounts_total()?;
        let discounted = subtotal.sub(item_discounts)?;
        let cart_discount = self.policy.discount_on(discounted)?;

        Ok(Totals {
            subtotal,
            item_discounts,
            cart_discount,
            total: discounted.sub(cart_discount)?,
        })
    }

    /// Get an item by product id.
    pub fn get(&self, product_id: &str) -> Option<&CartItem<'a>> {
        self.items.get(product_id)
    }

    /// Get all items in the cart, in no particular order.
    pub fn items(&self) -> Vec<&CartItem<'a>> {
        self.items.values().collect()
    }

    /// Get all items ordered by `criteria`.
    ///
    /// Items that compare equal keep whatever relative order they had.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a final price cannot be calculated.
    pub fn sorted_items(
        &self,
        criteria: SortCriteria,
    ) -> Result<Vec<&CartItem<'a>>, PricingError> {
        let mut items = self.items();

        match criteria {
            SortCriteria::Name => {
                items.sort_by(|a, b| a.product().name().cmp(b.product().name()));
            }
            SortCriteria::Quantity => {
                items.sort_by(|a, b| b.quantity().cmp(&a.quantity()));
            }
            SortCriteria::Price => {
                let mut priced = items
                    .into_iter()
                    .map(|item| Ok((*item.final_price()?.amount(), item)))
                    .collect::<Result<Vec<_>, PricingError>>()?;

                priced.sort_by(|(a, _), (b, _)| b.cmp(a));

                items = priced.into_iter().map(|(_, item)| item).collect();
            }
        }

        Ok(items)
    }

    /// Render a plain-text receipt with items ordered by `criteria`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the cart totals cannot be calculated.
    pub fn generate_receipt(&self, criteria: SortCriteria) -> Result<String, ReceiptError> {
        Ok(Receipt::from_cart(self, criteria)?.to_string())
    }

    /// Get the number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of actions that can still be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The action [`Cart::undo_last_action`] would reverse next, if any.
    pub fn last_action(&self) -> Option<&Action> {
        self.history.last()
    }

    /// Empty the cart and forget the undo history.
    pub fn clear(&mut self) {
        self.items.clear();
        self.history.clear();

        debug!("cart cleared");
    }
}

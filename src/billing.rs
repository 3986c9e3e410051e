//! Billing system

use std::rc::Rc;

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::warn;

use crate::{
    actions::{Action, UndoError},
    cart::{Cart, CartError, SortCriteria},
    catalog::Catalog,
    pricing::CartDiscountPolicy,
    products::{Product, ProductId},
    receipt::{Receipt, ReceiptError},
};

/// Errors returned by the billing system.
#[derive(Debug, Error)]
pub enum BillingError {
    /// The product is not in the catalog.
    #[error("product {0} not found")]
    UnknownProduct(ProductId),

    /// The cart rejected the change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The last cart action could not be undone.
    #[error(transparent)]
    Undo(#[from] UndoError),

    /// The receipt could not be produced.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// A catalog and the cart being filled from it.
#[derive(Debug)]
pub struct BillingSystem<'a> {
    catalog: Catalog<'a>,
    cart: Cart<'a>,
}

impl<'a> BillingSystem<'a> {
    /// Create a billing system with an empty catalog and the standard cart discount.
    pub fn new(currency: &'a Currency) -> Self {
        Self::with_catalog(Catalog::new(), CartDiscountPolicy::standard(currency))
    }

    /// Create a billing system from an existing catalog and cart discount policy.
    pub fn with_catalog(catalog: Catalog<'a>, policy: CartDiscountPolicy<'a>) -> Self {
        BillingSystem {
            catalog,
            cart: Cart::with_policy(policy),
        }
    }

    /// Create a billing system stocked with the sample catalog.
    pub fn with_sample_products(currency: &'a Currency) -> Self {
        Self::with_catalog(
            Catalog::sample(currency),
            CartDiscountPolicy::standard(currency),
        )
    }

    /// Add a product to the catalog, replacing any product with the same id.
    pub fn add_product_to_catalog(&mut self, product: Product<'a>) -> Rc<Product<'a>> {
        self.catalog.put(product)
    }

    /// Look up a catalog product by id.
    pub fn product(&self, id: &str) -> Option<&Rc<Product<'a>>> {
        self.catalog.get(id)
    }

    /// Add units of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::UnknownProduct`] if the id is not in the catalog, or
    /// [`BillingError::Cart`] if the cart rejects the quantity.
    pub fn add_to_cart(&mut self, id: &str, quantity: u32) -> Result<(), BillingError> {
        let Some(product) = self.catalog.get(id) else {
            warn!(product = id, "rejected add of product not in catalog");

            return Err(BillingError::UnknownProduct(ProductId::new(id)));
        };

        self.cart.add_product(product, quantity)?;

        Ok(())
    }

    /// Remove units of a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::Cart`] if the product is not in the cart or the quantity
    /// is zero.
    pub fn remove_from_cart(&mut self, id: &str, quantity: u32) -> Result<(), BillingError> {
        self.cart.remove_product(id, quantity)?;

        Ok(())
    }

    /// Undo the most recent cart change.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::Undo`] if there is nothing to undo or the change can no
    /// longer be reversed.
    pub fn undo_last_cart_action(&mut self) -> Result<Action, BillingError> {
        Ok(self.cart.undo_last_action()?)
    }

    /// Build a receipt for the cart.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::Receipt`] if the cart cannot be priced.
    pub fn receipt(&self, criteria: SortCriteria) -> Result<Receipt<'a>, BillingError> {
        Ok(Receipt::from_cart(&self.cart, criteria)?)
    }

    /// Render the plain-text receipt for the cart.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::Receipt`] if the cart cannot be priced.
    pub fn generate_receipt(&self, criteria: SortCriteria) -> Result<String, BillingError> {
        Ok(self.cart.generate_receipt(criteria)?)
    }

    /// The cart
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// The catalog
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Empty the cart and its undo history.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::items::CartItem;

    use super::*;

    #[test]
    fn add_to_cart_uses_catalog_products() -> TestResult {
        let mut billing = BillingSystem::with_sample_products(USD);

        billing.add_to_cart("P002", 3)?;
        billing.add_to_cart("P003", 2)?;

        assert_eq!(billing.cart().len(), 2);
        assert_eq!(billing.cart().total()?, Money::from_minor(2_200, USD));

        Ok(())
    }

    #[test]
    fn add_unknown_product_leaves_cart_untouched() {
        let mut billing = BillingSystem::with_sample_products(USD);

        let result = billing.add_to_cart("P999", 1);

        assert!(matches!(
            result,
            Err(BillingError::UnknownProduct(id)) if id.as_str() == "P999"
        ));
        assert!(billing.cart().is_empty());
        assert_eq!(billing.cart().history_len(), 0);
    }

    #[test]
    fn cart_errors_pass_through() {
        let mut billing = BillingSystem::with_sample_products(USD);

        assert!(matches!(
            billing.add_to_cart("P001", 0),
            Err(BillingError::Cart(CartError::InvalidQuantity))
        ));
        assert!(matches!(
            billing.remove_from_cart("P001", 1),
            Err(BillingError::Cart(CartError::UnknownProduct(_)))
        ));
        assert!(matches!(
            billing.undo_last_cart_action(),
            Err(BillingError::Undo(UndoError::NothingToUndo))
        ));
    }

    #[test]
    fn catalog_edits_reach_the_cart() -> TestResult {
        let mut billing = BillingSystem::new(USD);

        let tea = billing.add_product_to_catalog(Product::new(
            "T001",
            "Tea",
            Money::from_minor(200, USD),
        ));

        billing.add_to_cart("T001", 2)?;
        tea.set_price(Money::from_minor(300, USD));

        assert_eq!(billing.cart().subtotal()?, Money::from_minor(600, USD));
        assert_eq!(
            billing.product("T001").map(|product| product.price()),
            Some(Money::from_minor(300, USD))
        );

        Ok(())
    }

    #[test]
    fn undo_and_clear() -> TestResult {
        let mut billing = BillingSystem::with_sample_products(USD);

        billing.add_to_cart("P001", 2)?;
        billing.remove_from_cart("P001", 1)?;

        let undone = billing.undo_last_cart_action()?;

        assert!(matches!(undone, Action::Remove { quantity: 1, .. }));
        assert_eq!(billing.cart().get("P001").map(CartItem::quantity), Some(2));

        billing.clear_cart();

        assert!(billing.cart().is_empty());
        assert!(billing.undo_last_cart_action().is_err());

        Ok(())
    }

    #[test]
    fn receipt_lists_cart_items() -> TestResult {
        let mut billing = BillingSystem::with_sample_products(USD);

        billing.add_to_cart("P004", 2)?;

        let text = billing.generate_receipt(SortCriteria::Name)?;
        let receipt = billing.receipt(SortCriteria::Name)?;

        assert!(text.contains("Soap         2     $2.50        None       $5.00"));
        assert_eq!(receipt.total(), Money::from_minor(500, USD));

        Ok(())
    }
}

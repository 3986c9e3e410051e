//! Items

use std::rc::Rc;

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, line_price},
    products::Product,
};

/// A product in the cart together with the quantity being bought.
///
/// The product is shared with the catalog, so prices are always derived from the
/// product's current price and discount rule.
#[derive(Debug, Clone)]
pub struct CartItem<'a> {
    product: Rc<Product<'a>>,
    quantity: u32,
}

impl<'a> CartItem<'a> {
    /// Creates a new cart item.
    pub fn new(product: Rc<Product<'a>>, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Returns the product of the item
    pub fn product(&self) -> &Product<'a> {
        &self.product
    }

    /// Returns the quantity in the cart
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Unit price × quantity, before any discount.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the line total does not fit in minor units.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        line_price(self.product.price(), self.quantity)
    }

    /// Discount given by the product's discount rule.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount cannot be represented in minor units.
    pub fn discount_amount(&self) -> Result<Money<'a, Currency>, PricingError> {
        Ok(self
            .product
            .discount()
            .discount_on(self.product.price(), self.quantity)?)
    }

    /// Subtotal less the item discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if either amount cannot be calculated.
    pub fn final_price(&self) -> Result<Money<'a, Currency>, PricingError> {
        Ok(self.subtotal()?.sub(self.discount_amount()?)?)
    }

    /// Short description of the discount for receipts ("BOGO", "20%" or "None").
    pub fn discount_description(&self) -> String {
        self.product.discount().to_string()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::discounts::DiscountRule;

    use super::*;

    fn item(discount: DiscountRule, price: i64, quantity: u32) -> CartItem<'static> {
        let product =
            Product::with_discount("P", "Product", Money::from_minor(price, USD), discount);

        CartItem::new(Rc::new(product), quantity)
    }

    #[test]
    fn undiscounted_item_final_price_is_subtotal() -> TestResult {
        let item = item(DiscountRule::None, 500, 2);

        assert_eq!(item.subtotal()?, Money::from_minor(1_000, USD));
        assert_eq!(item.discount_amount()?, Money::from_minor(0, USD));
        assert_eq!(item.final_price()?, Money::from_minor(1_000, USD));
        assert_eq!(item.discount_description(), "None");

        Ok(())
    }

    #[test]
    fn bogo_item_three_units() -> TestResult {
        let item = item(DiscountRule::BuyOneGetOneFree, 300, 3);

        assert_eq!(item.subtotal()?, Money::from_minor(900, USD));
        assert_eq!(item.discount_amount()?, Money::from_minor(300, USD));
        assert_eq!(item.final_price()?, Money::from_minor(600, USD));
        assert_eq!(item.discount_description(), "BOGO");

        Ok(())
    }

    #[test]
    fn percentage_item_two_units() -> TestResult {
        let item = item(DiscountRule::percentage_off(Decimal::from(20))?, 1_000, 2);

        assert_eq!(item.subtotal()?, Money::from_minor(2_000, USD));
        assert_eq!(item.discount_amount()?, Money::from_minor(400, USD));
        assert_eq!(item.final_price()?, Money::from_minor(1_600, USD));
        assert_eq!(item.discount_description(), "20%");

        Ok(())
    }

    #[test]
    fn item_reflects_product_edits() -> TestResult {
        let product = Rc::new(Product::new("P004", "Soap", Money::from_minor(250, USD)));
        let item = CartItem::new(Rc::clone(&product), 4);

        product.set_price(Money::from_minor(200, USD));
        product.set_discount(DiscountRule::BuyOneGetOneFree);

        assert_eq!(item.final_price()?, Money::from_minor(400, USD));

        Ok(())
    }
}

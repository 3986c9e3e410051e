//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, Round, iso::Currency};
use thiserror::Error;

use crate::discounts::{DiscountError, percent_of};

/// Errors that can occur while calculating prices and totals.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A line or cart amount does not fit in minor units.
    #[error("amount overflowed")]
    Overflow,

    /// Errors bubbled up from discount calculation.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Cart-level discount policy.
///
/// Once the cart's subtotal after item discounts reaches `threshold` (inclusive),
/// a further `percentage` is taken off that amount.
#[derive(Debug, Copy, Clone)]
pub struct CartDiscountPolicy<'a> {
    threshold: Money<'a, Currency>,
    percentage: Percentage,
}

impl<'a> CartDiscountPolicy<'a> {
    /// Create a policy with the given threshold and percentage.
    pub fn new(threshold: Money<'a, Currency>, percentage: Percentage) -> Self {
        Self {
            threshold,
            percentage,
        }
    }

    /// 10% off once the discounted subtotal reaches 100.00 in `currency`.
    pub fn standard(currency: &'a Currency) -> Self {
        Self::new(
            Money::from_minor(10_000, currency),
            Percentage::from(Decimal::new(10, 2)),
        )
    }

    /// Amount the discounted subtotal must reach for the policy to apply.
    pub fn threshold(&self) -> Money<'a, Currency> {
        self.threshold
    }

    /// Fraction taken off once the threshold is reached.
    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    /// Currency the policy is expressed in.
    pub fn currency(&self) -> &'a Currency {
        self.threshold.currency()
    }

    /// Calculate the cart discount on a subtotal that already has item discounts taken off.
    ///
    /// The discount is not rounded.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the percentage cannot be applied safely.
    pub fn discount_on(
        &self,
        discounted_subtotal: Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let amount = *discounted_subtotal.amount();

        if amount < *self.threshold.amount() {
            return Ok(Money::from_minor(0, self.currency()));
        }

        let discount = percent_of(&self.percentage, amount)?;

        Ok(Money::from_decimal(discount, self.currency()))
    }
}

/// Every amount that makes up a cart total.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Totals<'a> {
    /// Sum of unit price × quantity over all items
    pub subtotal: Money<'a, Currency>,

    /// Sum of per-item discounts
    pub item_discounts: Money<'a, Currency>,

    /// Cart-level discount applied after item discounts
    pub cart_discount: Money<'a, Currency>,

    /// Amount payable
    pub total: Money<'a, Currency>,
}

impl<'a> Totals<'a> {
    /// Calculate the total savings (item and cart discounts combined).
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.item_discounts.add(self.cart_discount)
    }
}

/// Multiply a unit price by a quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in minor units.
pub fn line_price<'a>(
    unit_price: Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Round an amount to its currency's minor unit, halves away from zero.
///
/// Stored amounts keep full precision; this is applied only when they are shown.
pub fn round_for_display(amount: Money<'_, Currency>) -> Money<'_, Currency> {
    amount.round(amount.currency().exponent, Round::HalfUp)
}

/// Format an amount as its currency symbol followed by the rounded amount, with no
/// digit grouping (`$1234567.89`).
pub fn plain_amount(amount: Money<'_, Currency>) -> String {
    let currency = amount.currency();
    let mut rounded = *round_for_display(amount).amount();
    rounded.rescale(currency.exponent);

    format!("{}{rounded}", currency.symbol)
}

/// Sum a sequence of amounts, starting from zero in `currency`.
///
/// # Errors
///
/// Returns a [`PricingError`] if any amount is in a different currency.
pub fn sum<'a>(
    amounts: impl IntoIterator<Item = Result<Money<'a, Currency>, PricingError>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| {
            Ok(acc.add(amount?)?)
        })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn standard_policy_is_ten_percent_over_one_hundred() {
        let policy = CartDiscountPolicy::standard(USD);

        assert_eq!(policy.threshold(), Money::from_minor(10_000, USD));
        assert_eq!(policy.currency(), USD);
    }

    #[test]
    fn discount_applies_from_threshold_inclusive() -> TestResult {
        let policy = CartDiscountPolicy::standard(USD);

        assert_eq!(
            policy.discount_on(Money::from_minor(9_999, USD))?,
            Money::from_minor(0, USD)
        );
        assert_eq!(
            policy.discount_on(Money::from_minor(10_000, USD))?,
            Money::from_minor(1_000, USD)
        );
        assert_eq!(
            policy.discount_on(Money::from_minor(12_345, USD))?,
            Money::from_decimal(Decimal::new(12_345, 3), USD)
        );

        Ok(())
    }

    #[test]
    fn custom_policy_uses_its_own_threshold() -> TestResult {
        let policy = CartDiscountPolicy::new(
            Money::from_minor(5_000, USD),
            Percentage::from(Decimal::new(5, 2)),
        );

        assert_eq!(
            policy.discount_on(Money::from_minor(6_000, USD))?,
            Money::from_minor(300, USD)
        );

        Ok(())
    }

    #[test]
    fn threshold_compares_unrounded_amounts() -> TestResult {
        let policy = CartDiscountPolicy::standard(USD);

        assert_eq!(
            policy.discount_on(Money::from_decimal(Decimal::new(99_999, 3), USD))?,
            Money::from_minor(0, USD)
        );

        Ok(())
    }

    #[test]
    fn round_for_display_rounds_halves_away_from_zero() {
        assert_eq!(
            round_for_display(Money::from_decimal(Decimal::new(12_345, 3), USD)),
            Money::from_minor(1_235, USD)
        );
        assert_eq!(
            round_for_display(Money::from_decimal(Decimal::new(-1_005, 3), USD)),
            Money::from_minor(-101, USD)
        );
    }

    #[test]
    fn plain_amount_has_no_digit_grouping() {
        assert_eq!(
            plain_amount(Money::from_minor(123_456_789, USD)),
            "$1234567.89"
        );
        assert_eq!(
            plain_amount(Money::from_decimal(Decimal::new(1_111_111_101, 3), USD)),
            "$1111111.10"
        );
        assert_eq!(plain_amount(Money::from_minor(500, GBP)), "£5.00");
        assert_eq!(plain_amount(Money::from_minor(0, USD)), "$0.00");
    }

    #[test]
    fn line_price_multiplies_quantity() -> TestResult {
        assert_eq!(
            line_price(Money::from_minor(250, USD), 3)?,
            Money::from_minor(750, USD)
        );

        Ok(())
    }

    #[test]
    fn line_price_overflow_returns_error() {
        let result = line_price(Money::from_minor(i64::MAX, USD), 2);

        assert!(matches!(result, Err(PricingError::Overflow)));
    }

    #[test]
    fn sum_of_nothing_is_zero() -> TestResult {
        let total = sum(std::iter::empty(), USD)?;

        assert_eq!(total, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn sum_rejects_mixed_currencies() {
        let amounts = [
            Ok(Money::from_minor(100, USD)),
            Ok(Money::from_minor(100, GBP)),
        ];

        assert!(matches!(sum(amounts, USD), Err(PricingError::Money(_))));
    }

    #[test]
    fn savings_combines_item_and_cart_discounts() -> TestResult {
        let totals = Totals {
            subtotal: Money::from_minor(12_000, USD),
            item_discounts: Money::from_minor(1_000, USD),
            cart_discount: Money::from_minor(1_100, USD),
            total: Money::from_minor(9_900, USD),
        };

        assert_eq!(totals.savings()?, Money::from_minor(2_100, USD));

        Ok(())
    }
}

//! Discounts

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage outside 0% to 100%, which would make a price negative or raise it.
    #[error("percentage {0}% is outside 0% to 100%")]
    PercentOutOfRange(Decimal),

    /// The discounted amount does not fit in minor units.
    #[error("discount amount overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Per-product discount rule.
#[derive(Debug, Copy, Clone, Default)]
pub enum DiscountRule {
    /// Full price.
    #[default]
    None,

    /// Buy one, get one free: every second unit costs nothing.
    BuyOneGetOneFree,

    /// Take a percentage off the line subtotal (e.g. "20% off").
    PercentageOff(Percentage),
}

impl DiscountRule {
    /// Build a [`DiscountRule::PercentageOff`] from percent points (`20` for 20%).
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentOutOfRange`] unless `points` is within `0..=100`.
    pub fn percentage_off(points: Decimal) -> Result<Self, DiscountError> {
        if !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&points) {
            return Err(DiscountError::PercentOutOfRange(points));
        }

        Ok(DiscountRule::PercentageOff(Percentage::from(
            points / Decimal::ONE_HUNDRED,
        )))
    }

    /// Calculate the discount for `quantity` units at `unit_price`.
    ///
    /// Percentage discounts keep fractions of a minor unit; rounding happens when
    /// amounts are displayed.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the line does not fit in minor units or the
    /// percentage is out of range.
    pub fn discount_on<'a>(
        &self,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let currency = unit_price.currency();

        match self {
            DiscountRule::None => Ok(Money::from_minor(0, currency)),
            DiscountRule::BuyOneGetOneFree => {
                let minor = unit_price
                    .to_minor_units()
                    .checked_mul(i64::from(quantity / 2))
                    .ok_or(DiscountError::Overflow)?;

                Ok(Money::from_minor(minor, currency))
            }
            DiscountRule::PercentageOff(percent) => {
                let subtotal = unit_price
                    .to_minor_units()
                    .checked_mul(i64::from(quantity))
                    .ok_or(DiscountError::Overflow)?;
                let subtotal = Money::from_minor(subtotal, currency);

                Ok(Money::from_decimal(
                    percent_of(percent, *subtotal.amount())?,
                    currency,
                ))
            }
        }
    }
}

impl fmt::Display for DiscountRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountRule::None => f.write_str("None"),
            DiscountRule::BuyOneGetOneFree => f.write_str("BOGO"),
            DiscountRule::PercentageOff(percent) => write!(f, "{}%", percent_points(*percent)),
        }
    }
}

/// Take `percent` of `amount` without rounding, so 10% of 10.05 is 1.005.
///
/// # Errors
///
/// Returns [`DiscountError::PercentOutOfRange`] if `percent` is not a fraction in
/// `0..=1`.
pub fn percent_of(percent: &Percentage, amount: Decimal) -> Result<Decimal, DiscountError> {
    let fraction = (*percent) * Decimal::ONE; // decimal_percentage doesn't expose the underlying Decimal

    if !(Decimal::ZERO..=Decimal::ONE).contains(&fraction) {
        return Err(DiscountError::PercentOutOfRange(percent_points(*percent)));
    }

    fraction.checked_mul(amount).ok_or(DiscountError::Overflow)
}

/// Converts a fractional percentage to percent points for display (`0.2` becomes `20`).
pub fn percent_points(percent: Percentage) -> Decimal {
    ((percent * Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn no_discount_is_zero() -> TestResult {
        let discount = DiscountRule::None.discount_on(Money::from_minor(500, USD), 7)?;

        assert_eq!(discount, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn bogo_discounts_every_second_unit() -> TestResult {
        let price = Money::from_minor(300, USD);

        assert_eq!(
            DiscountRule::BuyOneGetOneFree.discount_on(price, 1)?,
            Money::from_minor(0, USD)
        );
        assert_eq!(
            DiscountRule::BuyOneGetOneFree.discount_on(price, 3)?,
            Money::from_minor(300, USD)
        );
        assert_eq!(
            DiscountRule::BuyOneGetOneFree.discount_on(price, 4)?,
            Money::from_minor(600, USD)
        );

        Ok(())
    }

    #[test]
    fn percentage_off_applies_to_line_subtotal() -> TestResult {
        let rule = DiscountRule::percentage_off(Decimal::from(20))?;

        let discount = rule.discount_on(Money::from_minor(1000, USD), 2)?;

        assert_eq!(discount, Money::from_minor(400, USD));

        Ok(())
    }

    #[test]
    fn percentage_off_keeps_fractions_of_a_cent() -> TestResult {
        let rule = DiscountRule::percentage_off(Decimal::from(10))?;

        let discount = rule.discount_on(Money::from_minor(1005, USD), 1)?;

        assert_eq!(discount, Money::from_decimal(Decimal::new(1005, 3), USD));

        Ok(())
    }

    #[test]
    fn percentage_off_rejects_points_outside_zero_to_one_hundred() -> TestResult {
        assert!(matches!(
            DiscountRule::percentage_off(Decimal::from(150)),
            Err(DiscountError::PercentOutOfRange(points)) if points == Decimal::from(150)
        ));
        assert!(matches!(
            DiscountRule::percentage_off(Decimal::from(-5)),
            Err(DiscountError::PercentOutOfRange(_))
        ));

        let everything = DiscountRule::percentage_off(Decimal::ONE_HUNDRED)?;

        assert_eq!(
            everything.discount_on(Money::from_minor(250, USD), 2)?,
            Money::from_minor(500, USD)
        );

        Ok(())
    }

    #[test]
    fn out_of_range_percentage_is_rejected_when_applied() {
        let rule = DiscountRule::PercentageOff(Percentage::from(Decimal::new(15, 1)));

        let result = rule.discount_on(Money::from_minor(1000, USD), 1);

        assert!(matches!(result, Err(DiscountError::PercentOutOfRange(_))));
    }

    #[test]
    fn bogo_overflow_returns_error() {
        let result =
            DiscountRule::BuyOneGetOneFree.discount_on(Money::from_minor(i64::MAX, USD), 4);

        assert!(matches!(result, Err(DiscountError::Overflow)));
    }

    #[test]
    fn display_describes_rule() -> TestResult {
        assert_eq!(DiscountRule::None.to_string(), "None");
        assert_eq!(DiscountRule::BuyOneGetOneFree.to_string(), "BOGO");
        assert_eq!(
            DiscountRule::percentage_off(Decimal::from(20))?.to_string(),
            "20%"
        );
        assert_eq!(
            DiscountRule::percentage_off(Decimal::new(125, 1))?.to_string(),
            "12.5%"
        );

        Ok(())
    }

    #[test]
    fn percent_of_calculates_correctly() -> TestResult {
        let percent = Percentage::from(Decimal::new(25, 2));

        assert_eq!(percent_of(&percent, Decimal::from(200))?, Decimal::from(50));
        assert_eq!(
            percent_of(&percent, Decimal::new(5, 2))?,
            Decimal::new(125, 4)
        );

        Ok(())
    }
}

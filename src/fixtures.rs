//! Catalog fixtures
//!
//! Catalogs can be loaded from YAML files shaped like:
//!
//! ```yaml
//! currency: USD
//! products:
//!   P002:
//!     name: Toothpaste
//!     price: "3.00"
//!     discount: bogo
//! ```

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{catalog::Catalog, discounts::DiscountRule, products::Product};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unrecognised discount rule
    #[error("Unknown discount: {0}")]
    UnknownDiscount(String),
}

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO currency code every product is priced in
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

fn default_currency() -> String {
    USD.iso_alpha_code.to_string()
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Unit price (e.g., "2.99")
    pub price: String,

    /// Discount rule: `none`, `bogo`, or a percentage such as `"20%"`
    #[serde(default)]
    pub discount: Option<String>,
}

impl ProductFixture {
    fn into_product(
        self,
        id: String,
        currency: &'static Currency,
    ) -> Result<Product<'static>, FixtureError> {
        let price = parse_price(&self.price, currency)?;
        let discount = self
            .discount
            .as_deref()
            .map_or(Ok(DiscountRule::None), parse_discount)?;

        Ok(Product::with_discount(id, self.name, price, discount))
    }
}

impl TryFrom<CatalogFixture> for Catalog<'static> {
    type Error = FixtureError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let currency = parse_currency(&fixture.currency)?;
        let mut catalog = Catalog::new();

        for (id, product) in fixture.products {
            catalog.put(product.into_product(id, currency)?);
        }

        Ok(catalog)
    }
}

impl Catalog<'static> {
    /// Load a catalog from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or any product is invalid.
    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        load_catalog(path)
    }
}

/// Parse a catalog from YAML.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or any product is invalid.
pub fn parse_catalog(yaml: &str) -> Result<Catalog<'static>, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

    fixture.try_into()
}

/// Load a catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or any product is invalid.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog<'static>, FixtureError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let catalog = parse_catalog(&contents)?;

    tracing::info!(path = %path.display(), products = catalog.len(), "loaded catalog");

    Ok(catalog)
}

/// Look up a supported currency by its ISO code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything other than GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        _ => Err(FixtureError::UnknownCurrency(code.to_string())),
    }
}

/// Parse a non-negative decimal amount (e.g., "2.99") into money.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the amount cannot be parsed, is negative,
/// or does not fit in minor units.
pub fn parse_price(
    s: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, FixtureError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or lies outside 0% to 100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let fraction = if let Some(points) = trimmed.strip_suffix('%') {
        points
            .trim()
            .parse::<Decimal>()
            .map(|points| points / Decimal::ONE_HUNDRED)
    } else {
        trimmed.parse::<Decimal>()
    }
    .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    if fraction.is_sign_negative() || fraction > Decimal::ONE {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(fraction))
}

/// Parse a discount rule: `none`, `bogo`, or a percentage.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPercentage`] for a percentage outside 0% to 100%, or
/// [`FixtureError::UnknownDiscount`] if the rule is not recognised at all.
pub fn parse_discount(s: &str) -> Result<DiscountRule, FixtureError> {
    let rule = s.trim().to_ascii_lowercase();

    match rule.as_str() {
        "" | "none" => Ok(DiscountRule::None),
        "bogo" | "buy-one-get-one-free" => Ok(DiscountRule::BuyOneGetOneFree),
        _ if rule.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') => {
            Ok(DiscountRule::PercentageOff(parse_percentage(s)?))
        }
        _ => Err(FixtureError::UnknownDiscount(s.to_string())),
    }
}

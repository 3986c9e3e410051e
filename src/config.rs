//! Command line and environment configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::SortCriteria,
    fixtures::{FixtureError, parse_currency, parse_percentage, parse_price},
    pricing::CartDiscountPolicy,
};

/// Errors from configuration values that parse as strings but make no sense as prices.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unsupported currency code
    #[error("invalid currency: {0}")]
    Currency(#[source] FixtureError),

    /// Cart discount threshold is not an amount
    #[error("invalid discount threshold: {0}")]
    DiscountThreshold(#[source] FixtureError),

    /// Cart discount percentage is not a percentage
    #[error("invalid discount percent: {0}")]
    DiscountPercent(#[source] FixtureError),
}

/// Interactive shopping cart and billing calculator.
#[derive(Debug, Parser)]
#[command(name = "till", about = "Shopping cart and billing calculator", long_about = None)]
pub struct Cli {
    /// YAML catalog to load instead of the built-in sample products
    #[arg(long, env = "TILL_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Currency and cart discount settings
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Receipt settings
    #[command(flatten)]
    pub receipt: ReceiptConfig,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Currency and cart discount settings.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// Currency for the built-in catalog (GBP, USD, EUR)
    #[arg(long, env = "TILL_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Discounted subtotal from which the cart discount applies
    #[arg(long, env = "TILL_DISCOUNT_THRESHOLD", default_value = "100.00")]
    pub discount_threshold: String,

    /// Cart discount ("10%" or "0.1")
    #[arg(long, env = "TILL_DISCOUNT_PERCENT", default_value = "10%")]
    pub discount_percent: String,
}

impl PricingConfig {
    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Currency`] if the code is not supported.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        parse_currency(&self.currency).map_err(ConfigError::Currency)
    }

    /// Build the cart discount policy in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the threshold or percentage cannot be parsed.
    pub fn policy(
        &self,
        currency: &'static Currency,
    ) -> Result<CartDiscountPolicy<'static>, ConfigError> {
        let threshold = parse_price(&self.discount_threshold, currency)
            .map_err(ConfigError::DiscountThreshold)?;
        let percentage =
            parse_percentage(&self.discount_percent).map_err(ConfigError::DiscountPercent)?;

        Ok(CartDiscountPolicy::new(threshold, percentage))
    }
}

/// How receipts are printed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReceiptStyle {
    /// Fixed-width plain text.
    #[default]
    Plain,

    /// Boxed table with a summary.
    Table,
}

/// Receipt settings.
#[derive(Debug, Args)]
pub struct ReceiptConfig {
    /// Sort order used when viewing the cart
    #[arg(long, env = "TILL_SORT", value_enum, default_value_t = SortCriteria::Name)]
    pub sort: SortCriteria,

    /// Receipt style (plain, table)
    #[arg(long, env = "TILL_RECEIPT_STYLE", value_enum, default_value_t = ReceiptStyle::Plain)]
    pub style: ReceiptStyle,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

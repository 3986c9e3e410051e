//! Receipt

use std::{fmt, io};

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, SortCriteria},
    discounts::percent_points,
    items::CartItem,
    pricing::{PricingError, Totals, plain_amount, round_for_display},
};

/// Longest item name shown before it is cut short with "...".
const NAME_WIDTH: usize = 12;

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating line prices or cart totals.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A single receipt row.
#[derive(Debug, Clone)]
pub struct ReceiptLine<'a> {
    name: String,
    quantity: u32,
    unit_price: Money<'a, Currency>,
    discount: String,
    final_price: Money<'a, Currency>,
}

impl<'a> ReceiptLine<'a> {
    fn from_item(item: &CartItem<'a>) -> Result<Self, PricingError> {
        Ok(Self {
            name: item.product().name().to_string(),
            quantity: item.quantity(),
            unit_price: item.product().price(),
            discount: item.discount_description(),
            final_price: item.final_price()?,
        })
    }

    /// Full product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units bought
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one unit
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Discount description
    pub fn discount(&self) -> &str {
        &self.discount
    }

    /// Line price after the item discount
    pub fn final_price(&self) -> Money<'a, Currency> {
        self.final_price
    }
}

/// Snapshot of a cart, ready to print.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 10]>,
    totals: Totals<'a>,
    cart_discount_percentage: Percentage,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the cart, listing items ordered by `criteria`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line price or the cart totals cannot be calculated.
    pub fn from_cart(cart: &Cart<'a>, criteria: SortCriteria) -> Result<Self, ReceiptError> {
        let lines = cart
            .sorted_items(criteria)?
            .into_iter()
            .map(ReceiptLine::from_item)
            .collect::<Result<SmallVec<_>, PricingError>>()?;

        Ok(Self {
            lines,
            totals: cart.totals()?,
            cart_discount_percentage: cart.policy().percentage(),
        })
    }

    /// Receipt rows, in print order
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Subtotal, discounts and total
    pub fn totals(&self) -> &Totals<'a> {
        &self.totals
    }

    /// Total cost before any discounts
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.totals.subtotal
    }

    /// Total amount payable
    pub fn total(&self) -> Money<'a, Currency> {
        self.totals.total
    }

    fn has_cart_discount(&self) -> bool {
        round_for_display(self.totals.cart_discount).is_positive()
    }

    /// Writes the receipt as a boxed table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_table_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Discount", "Subtotal"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.discount.clone(),
                round_for_display(line.final_price).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Alignment::center());
        table.modify(Columns::new(1..3), Alignment::right());
        table.modify(Columns::new(4..5), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)?;

        Ok(())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut rows: SmallVec<[(String, String); 4]> = SmallVec::new();

        let item_discounts = round_for_display(self.totals.item_discounts);

        rows.push(("Subtotal:".to_string(), self.totals.subtotal.to_string()));

        if item_discounts.is_positive() {
            rows.push(("Item Discounts:".to_string(), format!("-{item_discounts}")));
        }

        if self.has_cart_discount() {
            rows.push((
                format!(
                    "Cart Discount ({}%):",
                    percent_points(self.cart_discount_percentage)
                ),
                format!("-{}", round_for_display(self.totals.cart_discount)),
            ));
        }

        rows.push((
            "Total:".to_string(),
            round_for_display(self.totals.total).to_string(),
        ));

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }
}

impl fmt::Display for Receipt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- RECEIPT ---")?;
        writeln!(
            f,
            "{:<12} {:<5} {:<12} {:<10} {:<12}",
            "Item", "Qty", "Unit Price", "Discount", "Subtotal"
        )?;
        writeln!(f, "{}", "-".repeat(52))?;

        for line in &self.lines {
            writeln!(
                f,
                "{:<12} {:<5} {:<12} {:<10} {:<12}",
                truncate(&line.name, NAME_WIDTH),
                line.quantity,
                plain_amount(line.unit_price),
                line.discount,
                plain_amount(line.final_price),
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Subtotal: {}", plain_amount(self.totals.subtotal))?;

        if self.has_cart_discount() {
            writeln!(
                f,
                "Cart Discount: {}% (-{})",
                percent_points(self.cart_discount_percentage),
                plain_amount(self.totals.cart_discount)
            )?;
        }

        writeln!(f, "TOTAL: {}", plain_amount(self.totals.total))?;
        writeln!(f, "{}", "-".repeat(16))
    }
}

/// Cut `text` down to `max` characters, ending in "..." when anything was dropped.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max.saturating_sub(3)).collect();
    truncated.push_str("...");

    truncated
}

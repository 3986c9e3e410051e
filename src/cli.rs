//! Interactive menu session

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::{
    billing::{BillingError, BillingSystem},
    cart::{CartError, SortCriteria},
    config::ReceiptStyle,
    pricing::plain_amount,
};

/// Errors that end a session early.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading input or writing output failed.
    #[error("terminal IO failed: {0}")]
    Io(#[from] io::Error),

    /// The billing system failed in a way the user cannot correct.
    #[error(transparent)]
    Billing(#[from] BillingError),
}

/// A menu-driven session over a billing system.
#[derive(Debug)]
pub struct Session<'a, R, W> {
    billing: BillingSystem<'a>,
    input: R,
    output: W,
    sort: SortCriteria,
    style: ReceiptStyle,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Create a session reading choices from `input` and printing to `output`.
    pub fn new(billing: BillingSystem<'a>, input: R, output: W) -> Self {
        Session {
            billing,
            input,
            output,
            sort: SortCriteria::default(),
            style: ReceiptStyle::default(),
        }
    }

    /// Sort order used when viewing the cart.
    #[must_use]
    pub fn with_sort(mut self, sort: SortCriteria) -> Self {
        self.sort = sort;
        self
    }

    /// Style used for every printed receipt.
    #[must_use]
    pub fn with_style(mut self, style: ReceiptStyle) -> Self {
        self.style = style;
        self
    }

    /// The billing system driven by this session.
    pub fn billing(&self) -> &BillingSystem<'a> {
        &self.billing
    }

    /// Show the menu and handle choices until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the terminal cannot be read or written, or a
    /// receipt cannot be priced.
    pub fn run(&mut self) -> Result<(), SessionError> {
        writeln!(self.output, "Billing System with Discounts Engine\n")?;

        loop {
            self.print_menu()?;

            let Some(choice) = self.read_line()? else {
                writeln!(self.output)?;
                break;
            };

            match choice.as_str() {
                "1" => self.add_product()?,
                "2" => self.remove_product()?,
                "3" => self.view_cart()?,
                "4" => self.undo()?,
                "5" => self.receipt()?,
                "6" => {
                    self.billing.clear_cart();
                    writeln!(self.output, "Cart cleared.")?;
                }
                "0" => break,
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }

            writeln!(self.output)?;
        }

        writeln!(self.output, "Thank you for using the Billing System!")?;
        self.output.flush()?;

        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "===== Menu =====")?;
        writeln!(self.output, "1. Add product to cart")?;
        writeln!(self.output, "2. Remove product from cart")?;
        writeln!(self.output, "3. View cart")?;
        writeln!(self.output, "4. Undo last action")?;
        writeln!(self.output, "5. Generate receipt")?;
        writeln!(self.output, "6. Clear cart")?;
        writeln!(self.output, "0. Exit")?;

        self.prompt("Enter your choice: ")
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Next trimmed input line, or `None` once input is exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();

        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    /// Read a quantity, printing why it was refused if it is not a positive number.
    fn read_quantity(&mut self) -> io::Result<Option<u32>> {
        let input = self.read_line()?.unwrap_or_default();

        match input.parse::<i64>() {
            Err(_) => writeln!(self.output, "Invalid quantity.")?,
            Ok(quantity) if quantity <= 0 => {
                writeln!(self.output, "Quantity must be positive.")?;
            }
            Ok(quantity) => match u32::try_from(quantity) {
                Ok(quantity) => return Ok(Some(quantity)),
                Err(_) => writeln!(self.output, "Invalid quantity.")?,
            },
        }

        Ok(None)
    }

    fn add_product(&mut self) -> Result<(), SessionError> {
        writeln!(self.output, "\nAvailable Products:")?;
        writeln!(self.output, "{:<6} {:<12} {:<10} Discount", "ID", "Name", "Price")?;
        writeln!(self.output, "{}", "-".repeat(40))?;

        for product in self.billing.catalog().iter() {
            writeln!(
                self.output,
                "{:<6} {:<12} {:<10} {}",
                product.id().as_str(),
                product.name(),
                plain_amount(product.price()),
                product.discount()
            )?;
        }

        self.prompt("\nEnter product ID: ")?;
        let id = self.read_line()?.unwrap_or_default();

        let Some(name) = self
            .billing
            .product(&id)
            .map(|product| product.name().to_string())
        else {
            writeln!(self.output, "Product not found.")?;
            return Ok(());
        };

        self.prompt("Enter quantity: ")?;
        let Some(quantity) = self.read_quantity()? else {
            return Ok(());
        };

        match self.billing.add_to_cart(&id, quantity) {
            Ok(()) => writeln!(self.output, "{name} added to cart.")?,
            Err(BillingError::Cart(error)) => {
                writeln!(self.output, "Could not add {name}: {error}.")?;
            }
            Err(error) => return Err(error.into()),
        }

        Ok(())
    }

    fn remove_product(&mut self) -> Result<(), SessionError> {
        if self.billing.cart().is_empty() {
            writeln!(self.output, "Cart is empty.")?;
            return Ok(());
        }

        self.view_cart()?;

        self.prompt("\nEnter product ID to remove: ")?;
        let id = self.read_line()?.unwrap_or_default();

        self.prompt("Enter quantity to remove: ")?;
        let Some(quantity) = self.read_quantity()? else {
            return Ok(());
        };

        match self.billing.remove_from_cart(&id, quantity) {
            Ok(()) => writeln!(self.output, "Product removed from cart.")?,
            Err(BillingError::Cart(CartError::UnknownProduct(_))) => {
                writeln!(self.output, "Product is not in the cart.")?;
            }
            Err(error) => return Err(error.into()),
        }

        Ok(())
    }

    fn view_cart(&mut self) -> Result<(), SessionError> {
        if self.billing.cart().is_empty() {
            writeln!(self.output, "Cart is empty.")?;
            return Ok(());
        }

        self.print_receipt(self.sort)
    }

    fn undo(&mut self) -> io::Result<()> {
        match self.billing.undo_last_cart_action() {
            Ok(_) => writeln!(self.output, "Last action undone successfully."),
            Err(_) => writeln!(self.output, "Nothing to undo or undo failed."),
        }
    }

    fn receipt(&mut self) -> Result<(), SessionError> {
        if self.billing.cart().is_empty() {
            writeln!(self.output, "Cart is empty.")?;
            return Ok(());
        }

        writeln!(self.output, "\nSort receipt by:")?;
        writeln!(self.output, "1. Product Name")?;
        writeln!(self.output, "2. Quantity")?;
        writeln!(self.output, "3. Price")?;
        self.prompt("Enter your choice (default is Name): ")?;

        let sort = match self.read_line()?.unwrap_or_default().as_str() {
            "" | "1" => SortCriteria::Name,
            "2" => SortCriteria::Quantity,
            "3" => SortCriteria::Price,
            _ => {
                writeln!(self.output, "Invalid choice, using default sorting (Name).")?;
                SortCriteria::Name
            }
        };

        self.print_receipt(sort)
    }

    fn print_receipt(&mut self, sort: SortCriteria) -> Result<(), SessionError> {
        let receipt = self.billing.receipt(sort)?;

        match self.style {
            ReceiptStyle::Plain => writeln!(self.output, "{receipt}")?,
            ReceiptStyle::Table => receipt
                .write_table_to(&mut self.output)
                .map_err(BillingError::from)?,
        }

        Ok(())
    }
}

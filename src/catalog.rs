//! Product catalog

use std::rc::Rc;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::DiscountRule,
    products::{Product, ProductId},
};

/// Products available to buy, keyed by id.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    products: FxHashMap<ProductId, Rc<Product<'a>>>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample catalog the billing system ships with.
    pub fn sample(currency: &'a Currency) -> Self {
        let mut catalog = Self::new();

        catalog.put(Product::new("P001", "Shampoo", Money::from_minor(500, currency)));
        catalog.put(Product::with_discount(
            "P002",
            "Toothpaste",
            Money::from_minor(300, currency),
            DiscountRule::BuyOneGetOneFree,
        ));
        catalog.put(Product::with_discount(
            "P003",
            "Face Cream",
            Money::from_minor(1_000, currency),
            DiscountRule::PercentageOff(Percentage::from(Decimal::new(20, 2))),
        ));
        catalog.put(Product::new("P004", "Soap", Money::from_minor(250, currency)));
        catalog.put(Product::new("P005", "Deodorant", Money::from_minor(450, currency)));

        catalog
    }

    /// Add a product, replacing any product with the same id.
    ///
    /// Returns the shared handle the catalog now holds.
    pub fn put(&mut self, product: Product<'a>) -> Rc<Product<'a>> {
        let product = Rc::new(product);

        if self
            .products
            .insert(product.id().clone(), Rc::clone(&product))
            .is_some()
        {
            tracing::debug!(product = %product.id(), "replaced catalog product");
        }

        product
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Rc<Product<'a>>> {
        self.products.get(id)
    }

    /// Iterate over the products, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Product<'a>>> {
        let mut products: Vec<_> = self.products.values().collect();
        products.sort_by(|a, b| a.id().cmp(b.id()));

        products.into_iter()
    }

    /// Currency of the product with the lowest id, if there are any products.
    ///
    /// Catalogs loaded from fixtures price every product in one currency.
    pub fn currency(&self) -> Option<&'a Currency> {
        self.iter().next().map(|product| product.price().currency())
    }

    /// Get the number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

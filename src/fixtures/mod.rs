//! Fixtures
//!
//! Catalog snapshots stored as YAML, in the same document shape the catalog API serves:
//!
//! ```text
//! <base>/offers/<set>.yml
//! <base>/products/<set>.yml
//! ```

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, INR, USD};
use thiserror::Error;
use tracing::debug;

use crate::{
    fixtures::{offers::OffersFixture, products::ProductsFixture},
    offers::OfferCatalog,
    products::Product,
};

pub mod offers;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between fixture files
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Nothing loaded yet
    #[error("No fixtures loaded yet; currency unknown")]
    NoCurrency,

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Offers loaded so far
    offers: OfferCatalog<'static>,

    /// Products in file order
    products: Vec<Product<'static>>,

    /// Product key (slug, `_id`, `id` or name) -> index into `products`
    product_keys: FxHashMap<String, usize>,

    /// Currency shared by every loaded file
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            offers: OfferCatalog::new(),
            products: Vec::new(),
            product_keys: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load offers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its currency differs from
    /// previously loaded files.
    pub fn load_offers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("offers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: OffersFixture = serde_norway::from_str(&contents)?;

        let currency = self.adopt_currency(&fixture.currency)?;
        let before = self.offers.len();

        self.offers.extend(
            fixture
                .offers
                .into_iter()
                .filter_map(|record| record.into_offer(currency)),
        );

        debug!(
            set = name,
            offers = self.offers.len() - before,
            "loaded offer fixtures"
        );

        Ok(self)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its currency differs from
    /// previously loaded files.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let currency = self.adopt_currency(&fixture.currency)?;
        let before = self.products.len();

        for record in fixture.products {
            let product = record.to_product(currency);
            let key = record.key().map_or_else(|| product.name.clone(), str::to_string);

            self.product_keys.insert(key, self.products.len());
            self.products.push(product);
        }

        debug!(
            set = name,
            products = self.products.len() - before,
            "loaded product fixtures"
        );

        Ok(self)
    }

    /// Load a complete fixture set (offers and products with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_offers(name)?.load_products(name)?;

        Ok(fixture)
    }

    /// Get a product by its key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product<'static>, FixtureError> {
        self.product_keys
            .get(key)
            .and_then(|index| self.products.get(*index))
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get all products, in file order
    pub fn products(&self) -> &[Product<'static>] {
        &self.products
    }

    /// Get the offer catalog
    pub fn offers(&self) -> &OfferCatalog<'static> {
        &self.offers
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn adopt_currency(&mut self, code: &str) -> Result<&'static Currency, FixtureError> {
        let currency = parse_currency(code)?;

        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            _ => {
                self.currency = Some(currency);
                Ok(currency)
            }
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up a supported ISO currency code
///
/// # Errors
///
/// Returns an error if the code is not one of the supported currencies.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "INR" => Ok(INR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

//! Product Fixtures

use serde::Deserialize;

use crate::records::ProductRecord;

/// Product fixture file
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// ISO currency code for every amount in the file (e.g. "INR")
    pub currency: String,

    /// Product documents
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

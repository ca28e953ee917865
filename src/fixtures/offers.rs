//! Offer Fixtures

use serde::Deserialize;

use crate::records::OfferRecord;

/// Offer fixture file
#[derive(Debug, Deserialize)]
pub struct OffersFixture {
    /// ISO currency code for every amount in the file (e.g. "INR")
    pub currency: String,

    /// Offer documents
    #[serde(default)]
    pub offers: Vec<OfferRecord>,
}

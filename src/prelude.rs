//! Catalog pricing prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    amounts::{AmountError, RawAmount, parse_non_negative_money, parse_percent},
    fixtures::{Fixture, FixtureError},
    offers::{Offer, OfferCatalog, OfferDiscount, OfferId},
    pricing::{DiscountStep, PriceBreakdown, compute_price, compute_price_from_raw},
    products::Product,
    records::{DiscountType, OfferRecord, OfferReference, ProductRecord},
};

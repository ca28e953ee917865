//! Products

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};

use crate::{
    offers::{OfferCatalog, OfferId},
    pricing::{PriceBreakdown, compute_price},
};

/// Product, reduced to the fields that affect its price
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Price before any discount
    pub base_price: Money<'a, Currency>,

    /// Product-level percentage discount
    pub discount_percent: Option<Percentage>,

    /// Linked promotional offer
    pub offer: Option<OfferId>,
}

impl<'a> Product<'a> {
    /// Create a product with no discount and no offer.
    pub fn new(name: impl Into<String>, base_price: Money<'a, Currency>) -> Self {
        Self {
            name: name.into(),
            base_price,
            discount_percent: None,
            offer: None,
        }
    }

    /// Price this product against an offer catalog snapshot.
    pub fn price_breakdown<'c>(&self, offers: &'c OfferCatalog<'a>) -> PriceBreakdown<'a, 'c> {
        compute_price(
            self.base_price,
            self.discount_percent,
            self.offer.as_ref().map(OfferId::as_str),
            offers,
        )
    }
}

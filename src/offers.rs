//! Offers
//!
//! Promotional offers that may be linked from a product, and the catalog snapshot they are
//! resolved against.

use std::{borrow::Borrow, fmt};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    amounts::{display_amount, percent_of, percent_points},
    records::OfferRecord,
};

/// Offer identifier, as issued by the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct OfferId(String);

impl OfferId {
    /// Create a new offer identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for OfferId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OfferId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OfferId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an offer reduces the price.
#[derive(Debug, Copy, Clone)]
pub enum OfferDiscount<'a> {
    /// A percentage of the price after the product discount (e.g. "20% off")
    Percentage(Percentage),

    /// A fixed amount off, regardless of price (e.g. "₹100 off")
    Flat(Money<'a, Currency>),
}

impl fmt::Display for OfferDiscount<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferDiscount::Percentage(percent) => {
                write!(f, "{}% Off", percent_points(*percent).normalize())
            }
            OfferDiscount::Flat(amount) => write!(f, "Flat {} Off", display_amount(amount)),
        }
    }
}

/// A promotional offer.
#[derive(Debug, Clone)]
pub struct Offer<'a> {
    /// Offer identifier
    pub id: OfferId,

    /// Display title
    pub title: String,

    /// Redemption code
    pub code: String,

    /// Inactive offers never apply
    pub is_active: bool,

    /// Discount granted when the offer applies
    pub discount: OfferDiscount<'a>,

    /// Minimum price (after the product discount) for the offer to apply
    pub min_order_amount: Option<Money<'a, Currency>>,

    /// Upper bound on a percentage discount
    pub max_discount_amount: Option<Money<'a, Currency>>,
}

impl<'a> Offer<'a> {
    /// Create an active offer with no title, code, threshold or cap.
    pub fn new(id: impl Into<OfferId>, discount: OfferDiscount<'a>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            code: String::new(),
            is_active: true,
            discount,
            min_order_amount: None,
            max_discount_amount: None,
        }
    }

    /// Whether `price` meets the offer's minimum order amount.
    ///
    /// Offers without a minimum are always eligible.
    pub fn is_eligible(&self, price: &Money<'a, Currency>) -> bool {
        self.min_order_amount
            .is_none_or(|minimum| price.amount() >= minimum.amount())
    }

    /// Discount this offer grants on `price`, before the final price floor.
    ///
    /// Percentage discounts are capped by `max_discount_amount`. Flat discounts are neither
    /// scaled nor capped.
    pub fn discount_on(&self, price: &Money<'a, Currency>) -> Decimal {
        match &self.discount {
            OfferDiscount::Percentage(percent) => {
                let amount = percent_of(*percent, *price.amount());

                match self.max_discount_amount {
                    Some(cap) if amount > *cap.amount() => *cap.amount(),
                    _ => amount,
                }
            }
            OfferDiscount::Flat(amount) => *amount.amount(),
        }
    }

    /// Whether every monetary field of the offer is denominated in `currency`.
    pub fn matches_currency(&self, currency: &Currency) -> bool {
        let flat = match &self.discount {
            OfferDiscount::Flat(amount) => Some(amount),
            OfferDiscount::Percentage(_) => None,
        };

        flat.into_iter()
            .chain(self.min_order_amount.as_ref())
            .chain(self.max_discount_amount.as_ref())
            .all(|money| money.currency() == currency)
    }
}

/// Snapshot of the offers a product may reference, keyed by offer id.
#[derive(Debug, Clone, Default)]
pub struct OfferCatalog<'a> {
    offers: FxHashMap<OfferId, Offer<'a>>,
}

impl<'a> OfferCatalog<'a> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from backend records.
    ///
    /// Records without an identifier are skipped.
    pub fn from_records<I>(records: I, currency: &'a Currency) -> Self
    where
        I: IntoIterator<Item = OfferRecord>,
    {
        records
            .into_iter()
            .filter_map(|record| record.into_offer(currency))
            .collect()
    }

    /// Insert an offer, returning any offer previously stored under the same id.
    pub fn insert(&mut self, offer: Offer<'a>) -> Option<Offer<'a>> {
        self.offers.insert(offer.id.clone(), offer)
    }

    /// Look up an offer by id, whether or not it is active.
    pub fn get(&self, id: &str) -> Option<&Offer<'a>> {
        self.offers.get(id)
    }

    /// Look up an offer that may be applied: known and active.
    pub fn resolve(&self, id: &str) -> Option<&Offer<'a>> {
        self.get(id).filter(|offer| offer.is_active)
    }

    /// Active offers, sorted by id.
    pub fn active(&self) -> Vec<&Offer<'a>> {
        let mut active: Vec<_> = self.offers.values().filter(|offer| offer.is_active).collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));

        active
    }

    /// Iterate over all offers in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Offer<'a>> {
        self.offers.values()
    }

    /// Number of offers in the catalog.
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Whether the catalog holds no offers.
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

impl<'a> FromIterator<Offer<'a>> for OfferCatalog<'a> {
    fn from_iter<I: IntoIterator<Item = Offer<'a>>>(iter: I) -> Self {
        let mut catalog = Self::new();
        catalog.extend(iter);

        catalog
    }
}

impl<'a> Extend<Offer<'a>> for OfferCatalog<'a> {
    fn extend<I: IntoIterator<Item = Offer<'a>>>(&mut self, iter: I) {
        for offer in iter {
            self.insert(offer);
        }
    }
}

//! Catalog records
//!
//! Offer and product documents as served by the catalog API, and their conversion into pricing
//! types. Numeric fields are kept as [`RawAmount`] until conversion, since the API and the admin
//! forms send numbers, numeric strings and blanks interchangeably.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use tracing::debug;

use crate::{
    amounts::{RawAmount, parse_non_negative_money, parse_percent, percent_from_points},
    offers::{Offer, OfferDiscount, OfferId},
    products::Product,
};

/// Offer discount type as stored by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Percentage of the price
    Percentage,

    /// Fixed amount; any unrecognised type is read as flat
    #[default]
    #[serde(other)]
    Flat,
}

/// Offer document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRecord {
    /// Primary document id
    #[serde(rename = "_id")]
    pub document_id: Option<String>,

    /// Secondary id, used when `_id` is absent
    pub id: Option<String>,

    /// Display title
    pub title: Option<String>,

    /// Redemption code
    pub code: Option<String>,

    /// Whether the offer is live; missing or null reads as inactive
    pub is_active: Option<bool>,

    /// Percentage or flat; missing or null reads as flat
    pub discount_type: Option<DiscountType>,

    /// Percentage points or flat amount, depending on `discount_type`
    #[serde(default)]
    pub discount_value: RawAmount,

    /// Minimum qualifying price
    #[serde(default)]
    pub min_order_amount: RawAmount,

    /// Cap on a percentage discount
    #[serde(default)]
    pub max_discount_amount: RawAmount,
}

impl OfferRecord {
    /// The record's identifier: `_id`, falling back to `id`. Empty ids count as missing.
    pub fn offer_id(&self) -> Option<OfferId> {
        first_id([self.document_id.as_deref(), self.id.as_deref()])
    }

    /// Convert into an [`Offer`] priced in `currency`.
    ///
    /// Returns `None` when the record has no identifier, since it could never be referenced.
    /// Non-positive discount values become zero, and non-positive thresholds or caps are
    /// treated as absent.
    pub fn into_offer(self, currency: &Currency) -> Option<Offer<'_>> {
        let Some(id) = self.offer_id() else {
            debug!(title = self.title.as_deref(), "offer record without an id; skipping");
            return None;
        };

        let value = self.discount_value.positive().unwrap_or(Decimal::ZERO);

        let discount = match self.discount_type.unwrap_or_default() {
            DiscountType::Percentage => OfferDiscount::Percentage(percent_from_points(value)),
            DiscountType::Flat => OfferDiscount::Flat(Money::from_decimal(value, currency)),
        };

        Some(Offer {
            id,
            title: self.title.unwrap_or_default(),
            code: self.code.unwrap_or_default(),
            is_active: self.is_active.unwrap_or_default(),
            discount,
            min_order_amount: positive_money(&self.min_order_amount, currency),
            max_discount_amount: positive_money(&self.max_discount_amount, currency),
        })
    }
}

/// A product's link to an offer: either a bare id or a populated offer document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OfferReference {
    /// Offer id
    Id(String),

    /// Embedded offer document
    Document(Box<OfferRecord>),
}

impl OfferReference {
    /// The referenced offer's identifier, if it has one.
    pub fn offer_id(&self) -> Option<OfferId> {
        match self {
            OfferReference::Id(id) => first_id([Some(id.as_str())]),
            OfferReference::Document(record) => record.offer_id(),
        }
    }
}

/// Product document, reduced to the fields that matter for pricing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Primary document id
    #[serde(rename = "_id")]
    pub document_id: Option<String>,

    /// Secondary id
    pub id: Option<String>,

    /// URL slug
    pub slug: Option<String>,

    /// Product name
    pub name: Option<String>,

    /// Base price
    #[serde(default)]
    pub price: RawAmount,

    /// Product discount in percentage points
    #[serde(default)]
    pub discount_percent: RawAmount,

    /// Offer link as written by the admin form
    pub offer_id: Option<OfferReference>,

    /// Offer link as populated by the API
    pub offer: Option<OfferReference>,
}

impl ProductRecord {
    /// Identifier used to address the product: slug, then `_id`, then `id`.
    pub fn key(&self) -> Option<&str> {
        [
            self.slug.as_deref(),
            self.document_id.as_deref(),
            self.id.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|key| !key.is_empty())
    }

    /// The linked offer: `offerId` first, then `offer`.
    pub fn offer_reference(&self) -> Option<OfferId> {
        self.offer_id
            .as_ref()
            .and_then(OfferReference::offer_id)
            .or_else(|| self.offer.as_ref().and_then(OfferReference::offer_id))
    }

    /// Convert into a [`Product`] priced in `currency`, normalising malformed numbers.
    pub fn to_product<'a>(&self, currency: &'a Currency) -> Product<'a> {
        Product {
            name: self.name.clone().unwrap_or_default(),
            base_price: parse_non_negative_money(&self.price, currency),
            discount_percent: parse_percent(&self.discount_percent),
            offer: self.offer_reference(),
        }
    }
}

fn first_id<'s>(candidates: impl IntoIterator<Item = Option<&'s str>>) -> Option<OfferId> {
    candidates
        .into_iter()
        .flatten()
        .find(|id| !id.is_empty())
        .map(OfferId::from)
}

fn positive_money<'a>(raw: &RawAmount, currency: &'a Currency) -> Option<Money<'a, Currency>> {
    raw.positive()
        .map(|amount| Money::from_decimal(amount, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::amounts::percent_points;

    use super::*;

    #[test]
    fn offer_record_reads_api_document() -> TestResult {
        let record: OfferRecord = serde_json::from_str(
            r#"{
                "_id": "65f0c1",
                "title": "Festive Sale",
                "code": "FEST20",
                "isActive": true,
                "discountType": "percentage",
                "discountValue": "20",
                "minOrderAmount": 500,
                "maxDiscountAmount": null,
                "createdAt": "2025-01-01T00:00:00Z"
            }"#,
        )?;

        let offer = record.into_offer(INR).ok_or("offer should convert")?;

        assert_eq!(offer.id.as_str(), "65f0c1");
        assert_eq!(offer.code, "FEST20");
        assert!(offer.is_active);
        assert!(matches!(
            offer.discount,
            OfferDiscount::Percentage(percent) if percent_points(percent) == Decimal::from(20)
        ));
        assert_eq!(offer.min_order_amount, Some(Money::from_minor(50_000, INR)));
        assert!(offer.max_discount_amount.is_none());

        Ok(())
    }

    #[test]
    fn offer_record_falls_back_to_id_and_flat() -> TestResult {
        let record: OfferRecord = serde_json::from_str(
            r#"{"_id": "", "id": "o2", "discountType": "bogus", "discountValue": 75, "maxDiscountAmount": 0}"#,
        )?;

        assert_eq!(record.discount_type, Some(DiscountType::Flat));

        let offer = record.into_offer(INR).ok_or("offer should convert")?;

        assert_eq!(offer.id.as_str(), "o2");
        assert!(!offer.is_active);
        assert!(matches!(
            offer.discount,
            OfferDiscount::Flat(amount) if amount == Money::from_minor(7_500, INR)
        ));
        assert!(offer.max_discount_amount.is_none());

        Ok(())
    }

    #[test]
    fn offer_record_null_fields_read_as_defaults() -> TestResult {
        let inactive: OfferRecord = serde_json::from_str(
            r#"{"_id": "o1", "isActive": null, "discountType": "flat", "discountValue": 100}"#,
        )?;
        let offer = inactive.into_offer(INR).ok_or("offer should convert")?;

        assert!(!offer.is_active);

        let untyped: OfferRecord = serde_json::from_str(
            r#"{"_id": "o2", "isActive": true, "discountType": null, "discountValue": 100}"#,
        )?;
        let offer = untyped.into_offer(INR).ok_or("offer should convert")?;

        assert!(offer.is_active);
        assert!(matches!(
            offer.discount,
            OfferDiscount::Flat(amount) if amount == Money::from_minor(10_000, INR)
        ));

        Ok(())
    }

    #[test]
    fn offer_record_without_id_is_skipped() -> TestResult {
        let record: OfferRecord = serde_json::from_str(r#"{"title": "Orphan"}"#)?;

        assert!(record.into_offer(INR).is_none());

        Ok(())
    }

    #[test]
    fn product_record_prefers_offer_id_field() -> TestResult {
        let record: ProductRecord = serde_json::from_str(
            r#"{
                "_id": "p1",
                "slug": "led-mirror",
                "name": "LED Mirror",
                "price": "4999",
                "discountPercent": 10,
                "offerId": "o1",
                "offer": {"_id": "o2", "title": "Other"}
            }"#,
        )?;

        assert_eq!(record.key(), Some("led-mirror"));
        assert_eq!(record.offer_reference(), Some(OfferId::from("o1")));

        Ok(())
    }

    #[test]
    fn product_record_reads_populated_offer() -> TestResult {
        let record: ProductRecord = serde_json::from_str(
            r#"{"id": "p2", "price": 1000, "offerId": null, "offer": {"_id": "o9", "isActive": true}}"#,
        )?;

        assert_eq!(record.key(), Some("p2"));
        assert_eq!(record.offer_reference(), Some(OfferId::from("o9")));

        let populated: ProductRecord =
            serde_json::from_str(r#"{"offerId": {"_id": "o3"}}"#)?;

        assert_eq!(populated.offer_reference(), Some(OfferId::from("o3")));

        Ok(())
    }

    #[test]
    fn product_record_converts_with_normalised_numbers() -> TestResult {
        let record: ProductRecord = serde_json::from_str(
            r#"{"name": "Glass shelf", "price": "abc", "discountPercent": "", "offerId": ""}"#,
        )?;

        let product = record.to_product(INR);

        assert_eq!(product.name, "Glass shelf");
        assert_eq!(product.base_price, Money::from_minor(0, INR));
        assert!(product.discount_percent.is_none());
        assert!(product.offer.is_none());

        Ok(())
    }
}

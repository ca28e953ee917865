//! Pricing
//!
//! Computes a product's price breakdown: the base price, the product's own percentage discount,
//! then at most one promotional offer. The offer's minimum order amount and its percentage are
//! both evaluated against the price *after* the product discount.
//!
//! The computation never fails. Negative base prices and non-positive discounts are treated as
//! zero, and unknown, inactive or ineligible offers are treated as no offer. Only the final price
//! is floored at zero.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    amounts::{RawAmount, parse_non_negative_money, parse_percent, percent_of},
    offers::{Offer, OfferCatalog},
};

/// A discount that contributed to a price breakdown.
#[derive(Debug, Clone, Copy)]
pub enum DiscountStep<'a, 'c> {
    /// The product's own percentage markdown.
    Product {
        /// Percentage applied to the base price
        percent: Percentage,

        /// Amount taken off
        amount: Money<'a, Currency>,
    },

    /// A promotional offer.
    Offer {
        /// The offer that applied
        offer: &'c Offer<'a>,

        /// Amount taken off
        amount: Money<'a, Currency>,
    },
}

/// Result of pricing a product.
#[derive(Debug, Clone, Copy)]
pub struct PriceBreakdown<'a, 'c> {
    base_price: Money<'a, Currency>,
    product_discount: Option<Percentage>,
    product_discount_amount: Money<'a, Currency>,
    price_after_product_discount: Money<'a, Currency>,
    offer_discount_amount: Money<'a, Currency>,
    final_price: Money<'a, Currency>,
    applied_offer: Option<&'c Offer<'a>>,
}

impl<'a, 'c> PriceBreakdown<'a, 'c> {
    /// Base price, after coercing negative input to zero
    pub fn base_price(&self) -> Money<'a, Currency> {
        self.base_price
    }

    /// Product percentage discount, if one applied
    pub fn product_discount(&self) -> Option<Percentage> {
        self.product_discount
    }

    /// Amount taken off by the product discount
    pub fn product_discount_amount(&self) -> Money<'a, Currency> {
        self.product_discount_amount
    }

    /// Price after the product discount; the base for offer evaluation
    pub fn price_after_product_discount(&self) -> Money<'a, Currency> {
        self.price_after_product_discount
    }

    /// Amount taken off by the applied offer
    pub fn offer_discount_amount(&self) -> Money<'a, Currency> {
        self.offer_discount_amount
    }

    /// Final payable price, never negative
    pub fn final_price(&self) -> Money<'a, Currency> {
        self.final_price
    }

    /// The offer that actually applied
    pub fn applied_offer(&self) -> Option<&'c Offer<'a>> {
        self.applied_offer
    }

    /// Discounts that applied, in the order they were applied.
    pub fn steps(&self) -> SmallVec<[DiscountStep<'a, 'c>; 2]> {
        let mut steps = SmallVec::new();

        if let Some(percent) = self.product_discount {
            steps.push(DiscountStep::Product {
                percent,
                amount: self.product_discount_amount,
            });
        }

        if let Some(offer) = self.applied_offer {
            steps.push(DiscountStep::Offer {
                offer,
                amount: self.offer_discount_amount,
            });
        }

        steps
    }

    /// Whether the final price is below the base price.
    pub fn is_discounted(&self) -> bool {
        self.final_price.amount() < self.base_price.amount()
    }
}

impl PartialEq for PriceBreakdown<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        self.base_price == other.base_price
            && self.product_discount_amount == other.product_discount_amount
            && self.price_after_product_discount == other.price_after_product_discount
            && self.offer_discount_amount == other.offer_discount_amount
            && self.final_price == other.final_price
            && self.applied_offer.map(|offer| &offer.id)
                == other.applied_offer.map(|offer| &offer.id)
    }
}

/// Compute the price breakdown for a product.
///
/// `offer_id` is looked up in `offers`; an empty id is the same as no id. The returned
/// breakdown borrows the applied offer from the catalog.
pub fn compute_price<'a, 'c>(
    base_price: Money<'a, Currency>,
    discount_percent: Option<Percentage>,
    offer_id: Option<&str>,
    offers: &'c OfferCatalog<'a>,
) -> PriceBreakdown<'a, 'c> {
    let currency = base_price.currency();
    let base = (*base_price.amount()).max(Decimal::ZERO);

    let product_discount =
        discount_percent.filter(|percent| (*percent * Decimal::ONE) > Decimal::ZERO);

    let product_discount_amount =
        product_discount.map_or(Decimal::ZERO, |percent| percent_of(percent, base));

    // Not clamped: a discount above 100% leaves this negative until the final floor.
    let after_product = base.saturating_sub(product_discount_amount);
    let price_after_product_discount = Money::from_decimal(after_product, currency);

    let applied_offer = offer_id
        .filter(|id| !id.is_empty())
        .and_then(|id| applicable_offer(id, &price_after_product_discount, offers));

    let offer_discount_amount = applied_offer.map_or(Decimal::ZERO, |offer| {
        offer.discount_on(&price_after_product_discount)
    });

    let final_price = after_product
        .saturating_sub(offer_discount_amount)
        .max(Decimal::ZERO);

    trace!(
        base_price = %base,
        product_discount = %product_discount_amount,
        offer_discount = %offer_discount_amount,
        final_price = %final_price,
        offer_id = applied_offer.map(|offer| offer.id.as_str()),
        "computed price breakdown"
    );

    PriceBreakdown {
        base_price: Money::from_decimal(base, currency),
        product_discount,
        product_discount_amount: Money::from_decimal(product_discount_amount, currency),
        price_after_product_discount,
        offer_discount_amount: Money::from_decimal(offer_discount_amount, currency),
        final_price: Money::from_decimal(final_price, currency),
        applied_offer,
    }
}

/// Compute a price breakdown straight from raw field values.
///
/// The price and discount are normalised with [`parse_non_negative_money`] and
/// [`parse_percent`], so malformed input prices as zero rather than failing.
pub fn compute_price_from_raw<'a, 'c>(
    price: &RawAmount,
    discount_percent: &RawAmount,
    offer_id: Option<&str>,
    offers: &'c OfferCatalog<'a>,
    currency: &'a Currency,
) -> PriceBreakdown<'a, 'c> {
    compute_price(
        parse_non_negative_money(price, currency),
        parse_percent(discount_percent),
        offer_id,
        offers,
    )
}

fn applicable_offer<'a, 'c>(
    id: &str,
    price: &Money<'a, Currency>,
    offers: &'c OfferCatalog<'a>,
) -> Option<&'c Offer<'a>> {
    let Some(offer) = offers.resolve(id) else {
        debug!(
            offer_id = id,
            known = offers.get(id).is_some(),
            "offer unknown or inactive; ignoring"
        );
        return None;
    };

    if !offer.matches_currency(price.currency()) {
        debug!(
            offer_id = id,
            currency = price.currency().iso_alpha_code,
            "offer currency differs from price currency; ignoring"
        );
        return None;
    }

    if !offer.is_eligible(price) {
        debug!(offer_id = id, price = %price, "minimum order amount not met");
        return None;
    }

    Some(offer)
}

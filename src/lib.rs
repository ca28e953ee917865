//! Catalog Pricing
//!
//! Price breakdowns for catalog products: a base price, the product's own percentage discount,
//! and at most one promotional offer with minimum-order and maximum-discount rules.

pub mod amounts;
pub mod fixtures;
pub mod offers;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod records;
pub mod utils;

//! Catalog Example
//!
//! Prices every product in a fixture set and prints the breakdowns as a table.
//!
//! Use `-f` to load a fixture set by name
//! Use `-d` to point at a different fixtures directory
//! Use `-p` to price a single product by key

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use tabled::{builder::Builder, settings::Style};
use tracing::info;

use catalog_pricing::{
    amounts::{display_amount, percent_points},
    fixtures::Fixture,
    pricing::{DiscountStep, PriceBreakdown},
    products::Product,
    utils::{ExampleCatalogArgs, init_tracing},
};

/// Catalog Example
pub fn main() -> Result<()> {
    let args = ExampleCatalogArgs::parse();

    init_tracing(&args.log_level, args.log_format)?;

    let mut fixture = Fixture::with_base_path(&args.fixtures_dir);
    fixture
        .load_offers(&args.fixture)?
        .load_products(&args.fixture)?;

    let products: Vec<&Product<'static>> = match args.product.as_deref() {
        Some(key) => vec![fixture.product(key)?],
        None => fixture.products().iter().collect(),
    };

    let start = Instant::now();

    let breakdowns: Vec<(&Product<'static>, PriceBreakdown<'static, '_>)> = products
        .into_iter()
        .map(|product| (product, product.price_breakdown(fixture.offers())))
        .collect();

    info!(
        products = breakdowns.len(),
        elapsed_us = start.elapsed().as_micros(),
        "priced catalog"
    );

    let mut builder = Builder::default();
    builder.push_record([
        "Product",
        "Base Price",
        "Discount",
        "Offer",
        "Offer Discount",
        "Final Price",
    ]);

    for (product, breakdown) in &breakdowns {
        builder.push_record(breakdown_row(product, breakdown));
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "{table}")?;

    Ok(())
}

fn breakdown_row(product: &Product<'_>, breakdown: &PriceBreakdown<'_, '_>) -> [String; 6] {
    let mut discount = "-".to_string();
    let mut offer = "-".to_string();

    for step in breakdown.steps() {
        match step {
            DiscountStep::Product { percent, amount } => {
                discount = format!(
                    "{}% (-{})",
                    percent_points(percent).normalize(),
                    display_amount(&amount)
                );
            }
            DiscountStep::Offer { offer: applied, .. } => {
                offer = format!("{} ({}, {})", applied.title, applied.code, applied.discount);
            }
        }
    }

    let offer_discount = if breakdown.applied_offer().is_some() {
        format!("-{}", display_amount(&breakdown.offer_discount_amount()))
    } else {
        "-".to_string()
    };

    [
        product.name.clone(),
        display_amount(&breakdown.base_price()).to_string(),
        discount,
        offer,
        offer_discount,
        display_amount(&breakdown.final_price()).to_string(),
    ]
}

//! Amounts
//!
//! Conversions from raw catalog field values into money and percentages.
//!
//! The catalog API sends prices as JSON numbers, numeric strings, blank form values or nothing
//! at all. The permissive helpers in this module normalise anything that is not a positive
//! number to zero, while [`RawAmount::to_decimal`] reports why a value was rejected for callers
//! that want to refuse bad input.

use std::str::FromStr;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use serde_json::{Number, Value};
use thiserror::Error;

/// Errors raised by strict amount parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// No value was supplied.
    #[error("no amount supplied")]
    Missing,

    /// The value was an empty or blank string.
    #[error("amount is blank")]
    Empty,

    /// The value could not be read as a decimal number.
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// A numeric field exactly as it arrived from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// A JSON or YAML number.
    Number(Number),

    /// A string, usually straight from a form input.
    Text(String),

    /// `null` or an absent field.
    #[default]
    Missing,

    /// Anything else (booleans, arrays, objects).
    Other(Value),
}

impl RawAmount {
    /// Read the value as an exact decimal.
    ///
    /// Strings are trimmed and may use scientific notation (`"1e3"`).
    ///
    /// # Errors
    ///
    /// - [`AmountError::Missing`]: the field was `null` or absent.
    /// - [`AmountError::Empty`]: the field was a blank string.
    /// - [`AmountError::Invalid`]: the field could not be read as a number.
    pub fn to_decimal(&self) -> Result<Decimal, AmountError> {
        match self {
            RawAmount::Number(number) => parse_decimal(&number.to_string()),
            RawAmount::Text(text) => parse_decimal(text),
            RawAmount::Missing => Err(AmountError::Missing),
            RawAmount::Other(value) => Err(AmountError::Invalid(value.to_string())),
        }
    }

    /// The value as a decimal, only if it parses and is strictly positive.
    pub fn positive(&self) -> Option<Decimal> {
        self.to_decimal()
            .ok()
            .filter(|amount| *amount > Decimal::ZERO)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Number(Number::from(value))
    }
}

impl From<u64> for RawAmount {
    fn from(value: u64) -> Self {
        RawAmount::Number(Number::from(value))
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        // NaN and the infinities are not representable as JSON numbers.
        Number::from_f64(value).map_or(RawAmount::Missing, RawAmount::Number)
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, AmountError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    Decimal::from_str(trimmed)
        .or_else(|_err| Decimal::from_scientific(trimmed))
        .map_err(|_err| AmountError::Invalid(trimmed.to_string()))
}

/// Read a money amount, substituting zero for anything that is not a positive number.
pub fn parse_non_negative_money<'a>(raw: &RawAmount, currency: &'a Currency) -> Money<'a, Currency> {
    Money::from_decimal(raw.positive().unwrap_or(Decimal::ZERO), currency)
}

/// Read a percentage expressed in points (`10` means 10%).
///
/// Returns `None` for missing, unparseable, zero or negative values.
pub fn parse_percent(raw: &RawAmount) -> Option<Percentage> {
    raw.positive().map(percent_from_points)
}

/// Convert percentage points (`25`) into a [`Percentage`] (`0.25`).
pub fn percent_from_points(points: Decimal) -> Percentage {
    Percentage::from(points / Decimal::ONE_HUNDRED)
}

/// Convert a [`Percentage`] back into percentage points.
pub fn percent_points(percent: Percentage) -> Decimal {
    percent * Decimal::ONE_HUNDRED
}

/// Apply a percentage to an amount without rounding.
pub fn percent_of(percent: Percentage, amount: Decimal) -> Decimal {
    // decimal_percentage doesn't expose the underlying Decimal
    (percent * Decimal::ONE).saturating_mul(amount)
}

/// Round an amount to whole currency units for display.
pub fn display_amount<'a>(money: &Money<'a, Currency>) -> Money<'a, Currency> {
    let rounded = money
        .amount()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    Money::from_decimal(rounded, money.currency())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn to_decimal_reads_numbers_and_strings() -> TestResult {
        assert_eq!(RawAmount::from(1000_i64).to_decimal()?, Decimal::from(1000));
        assert_eq!(RawAmount::from(" 12.5 ").to_decimal()?, Decimal::new(125, 1));
        assert_eq!(RawAmount::from("1e3").to_decimal()?, Decimal::from(1000));

        Ok(())
    }

    #[test]
    fn to_decimal_reports_rejections() {
        assert_eq!(RawAmount::Missing.to_decimal(), Err(AmountError::Missing));
        assert_eq!(RawAmount::from("   ").to_decimal(), Err(AmountError::Empty));
        assert_eq!(
            RawAmount::from("abc").to_decimal(),
            Err(AmountError::Invalid("abc".to_string()))
        );
        assert_eq!(
            RawAmount::Other(Value::Bool(true)).to_decimal(),
            Err(AmountError::Invalid("true".to_string()))
        );
    }

    #[test]
    fn positive_filters_zero_and_negative() {
        assert_eq!(RawAmount::from(0_i64).positive(), None);
        assert_eq!(RawAmount::from("-5").positive(), None);
        assert_eq!(RawAmount::from(f64::NAN).positive(), None);
        assert_eq!(RawAmount::from("5").positive(), Some(Decimal::from(5)));
    }

    #[test]
    fn parse_non_negative_money_defaults_to_zero() {
        assert_eq!(
            parse_non_negative_money(&RawAmount::from("-250"), INR),
            Money::from_minor(0, INR)
        );
        assert_eq!(
            parse_non_negative_money(&RawAmount::from("not a price"), INR),
            Money::from_minor(0, INR)
        );
        assert_eq!(
            parse_non_negative_money(&RawAmount::from("1499.50"), INR),
            Money::from_minor(149_950, INR)
        );
    }

    #[test]
    fn parse_percent_converts_points() {
        let percent = parse_percent(&RawAmount::from("15"));

        assert_eq!(percent.map(percent_points), Some(Decimal::from(15)));
        assert!(parse_percent(&RawAmount::from("")).is_none());
        assert!(parse_percent(&RawAmount::from(0_i64)).is_none());
    }

    #[test]
    fn percent_of_keeps_fractions() {
        let percent = percent_from_points(Decimal::from(15));

        assert_eq!(percent_of(percent, Decimal::from(999)), Decimal::new(14985, 2));
    }

    #[test]
    fn display_amount_rounds_half_away_from_zero() {
        let money = Money::from_minor(99_950, INR);

        assert_eq!(display_amount(&money), Money::from_minor(100_000, INR));
        assert_eq!(
            display_amount(&Money::from_minor(99_949, INR)),
            Money::from_minor(99_900, INR)
        );
    }

    #[test]
    fn raw_amount_deserializes_every_shape() -> TestResult {
        assert_eq!(
            serde_json::from_str::<RawAmount>("1200")?,
            RawAmount::from(1200_u64)
        );
        assert_eq!(
            serde_json::from_str::<RawAmount>("\"1200\"")?,
            RawAmount::from("1200")
        );
        assert_eq!(serde_json::from_str::<RawAmount>("null")?, RawAmount::Missing);
        assert_eq!(
            serde_json::from_str::<RawAmount>("[1]")?,
            RawAmount::Other(serde_json::json!([1]))
        );

        Ok(())
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::MortgageError;
use crate::time_value::checked_product;
use crate::types::{Money, Rate};
use crate::MortgageResult;

const PERCENT_MARKER: char = '%';

/// A rate as the user supplied it.
///
/// `"5%"` parses to `Percentage(5)`, `"0.05"` or a bare JSON number parses to
/// `Fraction(0.05)`. Both resolve to the same [`Rate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateInput {
    Fraction(Rate),
    Percentage(Decimal),
}

/// A currency amount that may be given relative to the principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountInput {
    Absolute(Money),
    Percentage(Decimal),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(Decimal),
    Text(String),
}

impl RateInput {
    /// Parse text, naming `field` in any error.
    pub fn parse(text: &str, field: &str) -> MortgageResult<Self> {
        let trimmed = non_blank(text, field)?;
        match trimmed.strip_suffix(PERCENT_MARKER) {
            Some(pct) => Ok(RateInput::Percentage(parse_decimal(pct, field)?)),
            None => Ok(RateInput::Fraction(parse_decimal(trimmed, field)?)),
        }
    }

    /// Resolve to a fraction (0.05 = 5%).
    pub fn to_fraction(self) -> Rate {
        match self {
            RateInput::Fraction(r) => r,
            RateInput::Percentage(p) => p / dec!(100),
        }
    }
}

impl AmountInput {
    /// Parse text, naming `field` in any error. Absolute amounts may carry a
    /// leading `$` and `,` thousands separators.
    pub fn parse(text: &str, field: &str) -> MortgageResult<Self> {
        let trimmed = non_blank(text, field)?;
        match trimmed.strip_suffix(PERCENT_MARKER) {
            Some(pct) => Ok(AmountInput::Percentage(parse_decimal(pct, field)?)),
            None => {
                let cleaned: String = trimmed
                    .trim_start_matches('$')
                    .chars()
                    .filter(|c| *c != ',')
                    .collect();
                Ok(AmountInput::Absolute(parse_decimal(&cleaned, field)?))
            }
        }
    }

    /// Resolve against `principal`. A percentage too large for the decimal
    /// range is invalid input.
    pub fn resolve(self, principal: Money) -> MortgageResult<Money> {
        match self {
            AmountInput::Absolute(amount) => Ok(amount),
            AmountInput::Percentage(p) => checked_product(principal, p / dec!(100), "down_payment"),
        }
    }
}

impl Default for AmountInput {
    fn default() -> Self {
        AmountInput::Absolute(Decimal::ZERO)
    }
}

fn non_blank<'a>(text: &'a str, field: &str) -> MortgageResult<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MortgageError::invalid(field, "Value is required"));
    }
    Ok(trimmed)
}

fn parse_decimal(text: &str, field: &str) -> MortgageResult<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| MortgageError::invalid(field, format!("'{text}' is not a number")))
}

impl FromStr for RateInput {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RateInput::parse(s, "rate")
    }
}

impl FromStr for AmountInput {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AmountInput::parse(s, "amount")
    }
}

impl<'de> Deserialize<'de> for RateInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawValue::deserialize(deserializer)? {
            RawValue::Number(n) => Ok(RateInput::Fraction(n)),
            RawValue::Text(s) => RateInput::parse(&s, "rate").map_err(D::Error::custom),
        }
    }
}

impl<'de> Deserialize<'de> for AmountInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawValue::deserialize(deserializer)? {
            RawValue::Number(n) => Ok(AmountInput::Absolute(n)),
            RawValue::Text(s) => AmountInput::parse(&s, "amount").map_err(D::Error::custom),
        }
    }
}

impl Serialize for RateInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for AmountInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for RateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateInput::Fraction(r) => write!(f, "{r}"),
            RateInput::Percentage(p) => write!(f, "{p}%"),
        }
    }
}

impl fmt::Display for AmountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountInput::Absolute(a) => write!(f, "{a}"),
            AmountInput::Percentage(p) => write!(f, "{p}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_percent_and_fraction_agree() {
        let pct = RateInput::parse("5%", "annual_rate").unwrap();
        let frac = RateInput::parse("0.05", "annual_rate").unwrap();
        assert_eq!(pct, RateInput::Percentage(dec!(5)));
        assert_eq!(pct.to_fraction(), frac.to_fraction());
    }

    #[test]
    fn test_rate_whitespace_tolerated() {
        let rate = RateInput::parse(" 6.5 % ", "annual_rate").unwrap();
        assert_eq!(rate.to_fraction(), dec!(0.065));
    }

    #[test]
    fn test_rate_malformed() {
        let err = RateInput::parse("five%", "annual_rate").unwrap_err();
        match err {
            MortgageError::InvalidInput { field, .. } => assert_eq!(field, "annual_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_is_invalid() {
        assert!(RateInput::parse("   ", "tax_rate").is_err());
        assert!(AmountInput::parse("", "down_payment").is_err());
    }

    #[test]
    fn test_amount_currency_formatting() {
        let amount = AmountInput::parse("$20,000", "down_payment").unwrap();
        assert_eq!(amount, AmountInput::Absolute(dec!(20000)));
    }

    #[test]
    fn test_amount_percent_resolves_against_principal() {
        let amount = AmountInput::parse("10%", "down_payment").unwrap();
        assert_eq!(amount.resolve(dec!(200000)).unwrap(), dec!(20000));
    }

    #[test]
    fn test_amount_percent_overflow_is_invalid() {
        let amount = AmountInput::parse("79228162514264337593543950335%", "down_payment").unwrap();
        match amount.resolve(dec!(200000)).unwrap_err() {
            MortgageError::InvalidInput { field, .. } => assert_eq!(field, "down_payment"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_serde_accepts_number_and_string() {
        let from_number: RateInput = serde_json::from_str("0.05").unwrap();
        let from_string: RateInput = serde_json::from_str("\"5%\"").unwrap();
        assert_eq!(from_number.to_fraction(), from_string.to_fraction());

        let down: AmountInput = serde_json::from_str("\"10%\"").unwrap();
        assert_eq!(down, AmountInput::Percentage(dec!(10)));
        assert_eq!(serde_json::to_string(&down).unwrap(), "\"10%\"");
    }
}

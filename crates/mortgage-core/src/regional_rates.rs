//! Regional property-tax and homeowners-insurance rates.
//!
//! Rates come from third-party tables that may be stale or unavailable, so
//! the engine only defines the lookup seam ([`RateProvider`]) and an
//! in-memory table a caller can load from JSON. Fetching is not done here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::MortgageError;
use crate::loan::RateInput;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Dwelling value that published average annual premiums are quoted against.
pub const REFERENCE_DWELLING_VALUE: Money = dec!(250000);

/// Source of annual tax and insurance rates by region name.
pub trait RateProvider {
    fn tax_rate(&self, region: &str) -> Option<Rate>;
    fn insurance_rate(&self, region: &str) -> Option<Rate>;
    fn regions(&self) -> Vec<String>;
}

/// Both escrow rates for one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionalRates {
    pub tax_rate: Rate,
    pub insurance_rate: Rate,
}

/// Resolve both rates for `region`, failing if either is missing.
pub fn lookup(provider: &impl RateProvider, region: &str) -> MortgageResult<RegionalRates> {
    let missing = |kind: &str| MortgageError::InvalidInput {
        field: "region".into(),
        reason: format!("No {kind} rate for region '{region}'"),
    };
    Ok(RegionalRates {
        tax_rate: provider.tax_rate(region).ok_or_else(|| missing("tax"))?,
        insurance_rate: provider.insurance_rate(region).ok_or_else(|| missing("insurance"))?,
    })
}

/// Annual insurance rate implied by an average annual premium.
pub fn insurance_rate_from_premium(annual_premium: Money) -> Rate {
    annual_premium / REFERENCE_DWELLING_VALUE
}

/// Rate table held in memory. Region names match case-insensitively.
///
/// JSON form: `{"tax": {"Texas": "1.6%"}, "insurance": {"Texas": 0.0088}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticRateTable {
    #[serde(default)]
    pub tax: BTreeMap<String, RateInput>,
    #[serde(default)]
    pub insurance: BTreeMap<String, RateInput>,
}

impl StaticRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> MortgageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_tax_rate(mut self, region: &str, rate: RateInput) -> Self {
        self.tax.insert(region.to_string(), rate);
        self
    }

    pub fn with_insurance_rate(mut self, region: &str, rate: RateInput) -> Self {
        self.insurance.insert(region.to_string(), rate);
        self
    }

    /// Record insurance as an average annual premium.
    pub fn with_insurance_premium(self, region: &str, annual_premium: Money) -> Self {
        let rate = insurance_rate_from_premium(annual_premium);
        self.with_insurance_rate(region, RateInput::Fraction(rate))
    }

    fn find(table: &BTreeMap<String, RateInput>, region: &str) -> Option<Rate> {
        let region = region.trim();
        table
            .get(region)
            .or_else(|| {
                table
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(region))
                    .map(|(_, rate)| rate)
            })
            .map(|rate| rate.to_fraction())
            .filter(|rate| *rate >= Decimal::ZERO)
    }
}

impl RateProvider for StaticRateTable {
    fn tax_rate(&self, region: &str) -> Option<Rate> {
        Self::find(&self.tax, region)
    }

    fn insurance_rate(&self, region: &str) -> Option<Rate> {
        Self::find(&self.insurance, region)
    }

    fn regions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tax.keys().chain(self.insurance.keys()).cloned().collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StaticRateTable {
        StaticRateTable::new()
            .with_tax_rate("Texas", RateInput::Percentage(dec!(1.6)))
            .with_insurance_premium("Texas", dec!(3875))
            .with_tax_rate("Hawaii", RateInput::Fraction(dec!(0.0029)))
    }

    #[test]
    fn test_lookup_both_rates() {
        let rates = lookup(&table(), "Texas").unwrap();
        assert_eq!(rates.tax_rate, dec!(0.016));
        // 3,875 / 250,000
        assert_eq!(rates.insurance_rate, dec!(0.0155));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(table().tax_rate(" texas "), Some(dec!(0.016)));
    }

    #[test]
    fn test_missing_insurance_is_invalid() {
        let err = lookup(&table(), "Hawaii").unwrap_err();
        match err {
            MortgageError::InvalidInput { field, reason } => {
                assert_eq!(field, "region");
                assert!(reason.contains("insurance"));
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_region() {
        assert!(lookup(&table(), "Atlantis").is_err());
    }

    #[test]
    fn test_regions_deduplicated() {
        assert_eq!(table().regions(), vec!["Hawaii".to_string(), "Texas".to_string()]);
    }

    #[test]
    fn test_from_json_mixed_forms() {
        let t = StaticRateTable::from_json(
            r#"{"tax": {"Ohio": "1.53%"}, "insurance": {"Ohio": 0.0046}}"#,
        )
        .unwrap();
        let rates = lookup(&t, "ohio").unwrap();
        assert_eq!(rates.tax_rate, dec!(0.0153));
        assert_eq!(rates.insurance_rate, dec!(0.0046));
    }
}

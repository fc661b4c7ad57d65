use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use mortgage_core::regional_rates::{self, RegionalRates, StaticRateTable};
use mortgage_core::{AmountInput, RateInput};

use crate::OutputFormat;

/// Looked up in the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "mtg.toml";

/// Optional `mtg.toml`. Every field can be overridden by a flag.
///
/// ```toml
/// output = "table"
/// rates_file = "rates.json"
///
/// [defaults]
/// tax_rate = "1.1%"
/// insurance_rate = 0.005
/// down_payment = "20%"
/// refinancing_cost = 4500
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MortgageConfig {
    pub output: Option<OutputFormat>,
    /// JSON rate table used by `--region`.
    pub rates_file: Option<PathBuf>,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub tax_rate: Option<RateInput>,
    pub insurance_rate: Option<RateInput>,
    pub down_payment: Option<AmountInput>,
    pub refinancing_cost: Option<Decimal>,
}

impl MortgageConfig {
    /// Load `path`, or `./mtg.toml` if it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        let config: MortgageConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Escrow rates for `region` from the configured rates file.
    pub fn regional_rates(&self, region: &str) -> Result<RegionalRates, Box<dyn std::error::Error>> {
        let path = self
            .rates_file
            .as_ref()
            .ok_or("--region needs `rates_file` in the config")?;
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read rates file '{}': {}", path.display(), e))?;
        let table = StaticRateTable::from_json(&contents)?;
        Ok(regional_rates::lookup(&table, region)?)
    }

    /// Tax and insurance to use: explicit flags first, then the region's
    /// rates, then config defaults.
    pub fn escrow(
        &self,
        region: Option<&str>,
        tax_rate: Option<RateInput>,
        insurance_rate: Option<RateInput>,
    ) -> Result<(Option<RateInput>, Option<RateInput>), Box<dyn std::error::Error>> {
        let regional = region.map(|r| self.regional_rates(r)).transpose()?;
        let tax = tax_rate
            .or(regional.map(|r| RateInput::Fraction(r.tax_rate)))
            .or(self.defaults.tax_rate);
        let insurance = insurance_rate
            .or(regional.map(|r| RateInput::Fraction(r.insurance_rate)))
            .or(self.defaults.insurance_rate);
        Ok((tax, insurance))
    }

    pub fn down_payment(&self, flag: Option<AmountInput>) -> AmountInput {
        flag.or(self.defaults.down_payment).unwrap_or_default()
    }
}

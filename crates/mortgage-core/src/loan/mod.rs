//! Input normalization: raw loan terms in, an immutable [`EffectiveLoan`] out.
//!
//! Percent-marked rates and down payments are tagged once here
//! ([`RateInput`], [`AmountInput`]) and resolved to plain decimals before any
//! calculation runs. Nothing downstream re-inspects the original text.

pub mod effective;
pub mod inputs;

pub use effective::{EffectiveLoan, LoanParameters};
pub use inputs::{AmountInput, RateInput};

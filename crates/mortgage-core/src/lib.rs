pub mod error;
pub mod loan;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "refinance")]
pub mod refinance;

#[cfg(feature = "prepayment")]
pub mod prepayment;

#[cfg(feature = "regional_rates")]
pub mod regional_rates;

#[cfg(feature = "investment")]
pub mod investment;

pub use error::MortgageError;
pub use loan::{AmountInput, EffectiveLoan, LoanParameters, RateInput};
pub use types::*;

/// Standard result type for all mortgage operations
pub type MortgageResult<T> = Result<T, MortgageError>;

pub mod amortization;
pub mod investment;
pub mod prepayment;
pub mod refinance;

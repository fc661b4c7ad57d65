//! Fixed-payment amortization: the level monthly payment, the per-period
//! ledger, and the total cost of ownership built on the same recurrence.

pub mod ledger;
pub mod payment;
pub mod schedule;
pub mod total_cost;

//! Refinance analysis: old-rate vs new-rate totals and the break-even point.

pub mod break_even;
pub mod comparison;

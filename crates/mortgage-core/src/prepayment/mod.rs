//! Payoff-until-zero simulations: a fixed extra principal amount on top of
//! the regular payment, and the closed-form payoff time of a fixed payment.

pub mod extra_payment;
pub mod payoff;

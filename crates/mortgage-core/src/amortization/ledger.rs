use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::loan::EffectiveLoan;
use crate::types::{round_cents, Money};

/// One month of an amortization schedule. Every amount is in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodLedgerEntry {
    /// 1-based period index.
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    /// Cash paid this period: interest + principal + tax + insurance.
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub tax: Money,
    pub insurance: Money,
    /// Balance after this period's principal is applied.
    pub balance: Money,
    pub cumulative_principal: Money,
    pub cumulative_interest: Money,
}

/// Walks the fixed-payment recurrence one period at a time.
///
/// interest = balance * r, principal = payment - interest - escrow,
/// balance -= principal, with interest, principal and balance rounded to
/// cents before the next period reads them. If a period would take the
/// balance below zero the principal is cut to land it on exactly zero and
/// the walk ends, so a ledger can be shorter than the loan term. It never
/// runs past `total_periods`.
#[derive(Debug, Clone)]
pub struct Ledger<'a> {
    loan: &'a EffectiveLoan,
    payment: Money,
    balance: Money,
    period: u32,
    cumulative_principal: Money,
    cumulative_interest: Money,
    finished: bool,
}

impl<'a> Ledger<'a> {
    /// Ledger at the loan's own level payment (P&I plus escrow).
    pub fn new(loan: &'a EffectiveLoan) -> Self {
        Ledger::with_payment(loan, loan.monthly_payment())
    }

    /// Ledger at another total monthly payment, escrow included. Must cover
    /// the first period's interest or the balance grows without bound.
    fn with_payment(loan: &'a EffectiveLoan, payment: Money) -> Self {
        Ledger {
            loan,
            payment,
            balance: round_cents(loan.financed_amount),
            period: 0,
            cumulative_principal: Decimal::ZERO,
            cumulative_interest: Decimal::ZERO,
            finished: false,
        }
    }

    /// Balance after the last period produced so far.
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// True once the balance has been driven to exactly zero.
    pub fn is_paid_off(&self) -> bool {
        self.finished
    }
}

impl Iterator for Ledger<'_> {
    type Item = PeriodLedgerEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.period >= self.loan.total_periods {
            return None;
        }
        self.period += 1;

        let interest = round_cents(self.balance * self.loan.monthly_rate);
        let mut principal = round_cents(
            self.payment - interest - self.loan.monthly_tax - self.loan.monthly_insurance,
        );
        let mut balance = self.balance - principal;
        if balance <= Decimal::ZERO {
            principal += balance;
            balance = Decimal::ZERO;
            self.finished = true;
        }

        let tax = round_cents(self.loan.monthly_tax);
        let insurance = round_cents(self.loan.monthly_insurance);
        self.balance = balance;
        self.cumulative_principal += principal;
        self.cumulative_interest += interest;

        Some(PeriodLedgerEntry {
            period: self.period,
            payment_date: None,
            payment: interest + principal + tax + insurance,
            interest,
            principal,
            tax,
            insurance,
            balance,
            cumulative_principal: self.cumulative_principal,
            cumulative_interest: self.cumulative_interest,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let remaining = self.loan.total_periods.saturating_sub(self.period) as usize;
        (0, Some(remaining))
    }
}

use mortgage_core::refinance::break_even::{compute_break_even_months, BreakEvenInput};
use mortgage_core::refinance::comparison::{compute_refinance_comparison, RefinanceInput};
use mortgage_core::{AmountInput, MortgageError, RateInput};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn refinance(old: &str, new: &str) -> RefinanceInput {
    RefinanceInput {
        principal: dec!(320000),
        old_rate: RateInput::parse(old, "old_rate").unwrap(),
        new_rate: RateInput::parse(new, "new_rate").unwrap(),
        years: 30,
        down_payment: AmountInput::Percentage(dec!(20)),
        tax_rate: Some(RateInput::Percentage(dec!(1.0))),
        insurance_rate: Some(RateInput::Percentage(dec!(0.5))),
        refinancing_cost: None,
    }
}

#[test]
fn test_lower_rate_always_cheaper() {
    for (old, new) in [("7%", "6%"), ("0.065", "0.0625"), ("5%", "3%"), ("4%", "0%")] {
        let r = compute_refinance_comparison(&refinance(old, new)).unwrap().result;
        assert!(
            r.new.total_paid < r.old.total_paid,
            "{old} -> {new}: {} !< {}",
            r.new.total_paid,
            r.old.total_paid
        );
    }
}

#[test]
fn test_same_rate_no_savings() {
    let r = compute_refinance_comparison(&refinance("6%", "0.06")).unwrap().result;
    assert_eq!(r.total_savings, Decimal::ZERO);
    assert_eq!(r.interest_savings, Decimal::ZERO);
    assert_eq!(r.monthly_savings, Decimal::ZERO);
}

#[test]
fn test_break_even_reference_cases() {
    let yes = compute_break_even_months(&BreakEvenInput {
        old_payment: dec!(1200),
        new_payment: dec!(1000),
        refinancing_cost: dec!(4000),
    })
    .unwrap();
    assert_eq!(yes.result.break_even_months, dec!(20));

    let no = compute_break_even_months(&BreakEvenInput {
        old_payment: dec!(1000),
        new_payment: dec!(1200),
        refinancing_cost: dec!(4000),
    });
    assert!(matches!(no, Err(MortgageError::NoBreakEven { .. })));
}

#[test]
fn test_comparison_break_even_consistent_with_standalone() {
    let mut input = refinance("7%", "5.5%");
    input.refinancing_cost = Some(dec!(5000));
    let r = compute_refinance_comparison(&input).unwrap().result;
    let standalone = compute_break_even_months(&BreakEvenInput {
        old_payment: r.old.monthly_payment,
        new_payment: r.new.monthly_payment,
        refinancing_cost: dec!(5000),
    })
    .unwrap()
    .result;
    assert_eq!(r.break_even, Some(standalone));
}

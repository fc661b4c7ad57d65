use mortgage_core::amortization::{payment, schedule, total_cost};
use mortgage_core::{AmountInput, LoanParameters, MortgageError, RateInput};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Monthly payment scenarios
// ===========================================================================

fn payment_input(principal: Decimal, rate: &str, years: u32, down: &str) -> payment::MonthlyPaymentInput {
    payment::MonthlyPaymentInput {
        principal,
        annual_rate: RateInput::parse(rate, "annual_rate").unwrap(),
        years,
        down_payment: AmountInput::parse(down, "down_payment").unwrap(),
    }
}

fn monthly(input: &payment::MonthlyPaymentInput) -> Result<Decimal, MortgageError> {
    payment::compute_monthly_payment(input).map(|o| o.result.monthly_payment)
}

#[test]
fn test_reference_payment_scenarios() {
    assert_eq!(monthly(&payment_input(dec!(200000), "0.05", 30, "0")).unwrap(), dec!(1073.64));
    assert_eq!(monthly(&payment_input(dec!(200000), "0.05", 30, "10%")).unwrap(), dec!(966.28));
    assert_eq!(monthly(&payment_input(dec!(200000), "0.05", 30, "20000")).unwrap(), dec!(966.28));
    assert_eq!(monthly(&payment_input(dec!(200000), "0", 30, "0")).unwrap(), dec!(555.56));
}

#[test]
fn test_percent_rate_same_as_fraction() {
    let pct = monthly(&payment_input(dec!(350000), "6.25%", 15, "0")).unwrap();
    let frac = monthly(&payment_input(dec!(350000), "0.0625", 15, "0")).unwrap();
    assert_eq!(pct, frac);
}

#[test]
fn test_invalid_reference_scenarios() {
    for input in [
        payment_input(dec!(-200000), "0.05", 30, "0"),
        payment_input(dec!(200000), "-0.05", 30, "0"),
        payment_input(dec!(0), "0.05", 30, "0"),
        payment_input(dec!(200000), "0.05", 0, "0"),
        payment_input(dec!(200000), "0.05", 30, "-5000"),
    ] {
        assert!(
            matches!(monthly(&input), Err(MortgageError::InvalidInput { .. })),
            "expected InvalidInput for {input:?}"
        );
    }
}

#[test]
fn test_extreme_inputs_return_errors_not_panics() {
    let huge_down = payment_input(dec!(200000), "0.05", 30, "79228162514264337593543950335%");
    assert!(matches!(monthly(&huge_down), Err(MortgageError::InvalidInput { .. })));

    let beyond_ceiling = payment_input(dec!(1000000), "1500%", 12, "0");
    assert!(matches!(monthly(&beyond_ceiling), Err(MortgageError::InvalidInput { .. })));
}

#[test]
fn test_very_high_rate_still_priced() {
    // At 600% a year the payment is essentially the monthly interest on 1M
    let out = payment::compute_monthly_payment(&payment_input(dec!(1000000), "600%", 12, "0"))
        .unwrap()
        .result;
    assert_eq!(out.monthly_payment, dec!(500000));
    assert_eq!(out.total_of_payments, dec!(72000000));
}

#[test]
fn test_payment_input_from_json() {
    let input: payment::MonthlyPaymentInput = serde_json::from_str(
        r#"{"principal": "200000", "annual_rate": "5%", "years": 30, "down_payment": "10%"}"#,
    )
    .unwrap();
    assert_eq!(monthly(&input).unwrap(), dec!(966.28));
}

// ===========================================================================
// Schedule properties
// ===========================================================================

fn loan(principal: Decimal, rate: Decimal, years: u32) -> LoanParameters {
    LoanParameters::new(principal, RateInput::Fraction(rate), years, AmountInput::default())
}

#[test]
fn test_schedule_properties_across_loans() {
    let cases = [
        loan(dec!(200000), dec!(0.05), 30),
        loan(dec!(425000), dec!(0.0675), 30),
        loan(dec!(90000), dec!(0.035), 10),
        loan(dec!(15000), dec!(0.12), 5),
    ];

    for params in &cases {
        let s = schedule::compute_amortization_schedule(params).unwrap().result;
        let tolerance = dec!(0.01) * Decimal::from(s.periods);

        let mut previous_balance = s.financed_amount;
        for (idx, entry) in s.entries.iter().enumerate() {
            assert_eq!(entry.period as usize, idx + 1);
            assert!(entry.balance >= Decimal::ZERO);
            assert!(entry.balance <= previous_balance);
            previous_balance = entry.balance;
        }

        let last = s.entries.last().unwrap();
        assert!((last.cumulative_principal + last.balance - s.financed_amount).abs() <= tolerance);
        assert!(s.periods <= params.years * 12);
        assert_eq!(last.cumulative_interest, s.total_interest);
    }
}

#[test]
fn test_interest_declines_principal_grows() {
    let s = schedule::compute_amortization_schedule(&loan(dec!(200000), dec!(0.05), 30))
        .unwrap()
        .result;
    let first = &s.entries[0];
    let mid = &s.entries[179];
    assert!(mid.interest < first.interest);
    assert!(mid.principal > first.principal);
}

#[test]
fn test_total_cost_adds_down_payment() {
    let mut params = loan(dec!(400000), dec!(0.055), 30);
    params.down_payment = AmountInput::parse("$80,000", "down_payment").unwrap();
    params.tax_rate = Some(RateInput::parse("1.5%", "tax_rate").unwrap());
    params.insurance_rate = Some(RateInput::parse("0.35%", "insurance_rate").unwrap());

    let cost = total_cost::compute_total_cost(&params).unwrap().result;
    let s = schedule::compute_amortization_schedule(&params).unwrap().result;

    assert_eq!(cost.breakdown.down_payment.amount, dec!(80000));
    assert_eq!(cost.total_cost, s.total_paid + dec!(80000));
    // 320k * 1.5% = 4,800 a year for 30 years
    assert_eq!(cost.breakdown.tax.amount, dec!(144000));
}

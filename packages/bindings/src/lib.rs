use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::amortization::payment::MonthlyPaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_core::amortization::payment::compute_monthly_payment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::LoanParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_core::amortization::schedule::compute_amortization_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn total_cost(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::LoanParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_core::amortization::total_cost::compute_total_cost(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Refinance
// ---------------------------------------------------------------------------

#[napi]
pub fn refinance_comparison(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::refinance::comparison::RefinanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_core::refinance::comparison::compute_refinance_comparison(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn break_even_months(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::refinance::break_even::BreakEvenInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_core::refinance::break_even::compute_break_even_months(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Prepayment
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_prepayment(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::prepayment::extra_payment::PrepaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_core::prepayment::extra_payment::simulate_prepayment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn payoff_timeline(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::prepayment::payoff::PayoffInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_core::prepayment::payoff::compute_payoff_timeline(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Regional rates and investment growth
// ---------------------------------------------------------------------------

/// Look up one region in a JSON rate table (`{"tax": {...}, "insurance": {...}}`).
#[napi]
pub fn regional_rates(table_json: String, region: String) -> NapiResult<String> {
    let table = mortgage_core::regional_rates::StaticRateTable::from_json(&table_json)
        .map_err(to_napi_error)?;
    let rates = mortgage_core::regional_rates::lookup(&table, &region).map_err(to_napi_error)?;
    serde_json::to_string(&rates).map_err(to_napi_error)
}

#[napi]
pub fn project_growth(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::investment::GrowthInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_core::investment::project_growth(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

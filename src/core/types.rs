use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RepaymentKind {
    Repayment,
    InterestOnly,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FeeHandling {
    AddToLoan,
    PaidUpfront,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanOption {
    pub label: String,
    pub kind: RepaymentKind,
    pub rate: f64,
    pub fee_amount: f64,
    pub fee_handling: FeeHandling,
    pub fixed_years: f64,
    pub fixed_months: f64,
    pub overpayment: f64,
    pub erc_amount: f64,
    pub apply_erc: bool,
    pub reversion_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MortgageInputs {
    pub outstanding: f64,
    pub remaining_term_months: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub month: u32,
    pub balance: f64,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub monthly_payment: f64,
    pub total_paid_during_fixed: f64,
    pub end_balance: f64,
    pub starting_balance: f64,
    pub added_to_loan: f64,
    pub upfront_fee: f64,
    pub fixed_term_months: u32,
    pub fixed_schedule: Vec<ScheduleRow>,
    pub after_fixed_payment: f64,
    pub after_fixed_total: f64,
    // Excludes redeeming any balance left at the end of the full term.
    pub total_cost_full_term: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionMetrics {
    pub label: String,
    pub metrics: Metrics,
}

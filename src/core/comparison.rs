use serde::Serialize;

use super::numeric::to_total_months;
use super::types::{
    FeeHandling, LoanOption, Metrics, MortgageInputs, OptionMetrics, RepaymentKind,
};

pub const MAX_OPTIONS: usize = 26;

pub const DEFAULT_OUTSTANDING: f64 = 250_000.0;
pub const DEFAULT_REMAINING_YEARS: f64 = 25.0;
pub const DEFAULT_REMAINING_MONTHS: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub month: u32,
    pub balances: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChart {
    pub series: Vec<String>,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferenceRow {
    pub label: String,
    pub monthly_payment_delta: f64,
    pub fixed_total_delta: f64,
    pub end_balance_delta: f64,
    pub full_term_cost_delta: f64,
}

pub fn option_label(index: usize) -> String {
    if index < MAX_OPTIONS {
        let letter = char::from(b'A' + index as u8);
        format!("Option {letter}")
    } else {
        format!("Option {}", index + 1)
    }
}

pub fn default_option(label: &str) -> LoanOption {
    LoanOption {
        label: label.to_string(),
        kind: RepaymentKind::Repayment,
        rate: 4.99,
        fee_amount: 999.0,
        fee_handling: FeeHandling::AddToLoan,
        fixed_years: 2.0,
        fixed_months: 0.0,
        overpayment: 0.0,
        erc_amount: 0.0,
        apply_erc: false,
        reversion_rate: 6.0,
    }
}

pub fn default_options() -> Vec<LoanOption> {
    vec![
        default_option(&option_label(0)),
        LoanOption {
            rate: 5.29,
            fee_amount: 0.0,
            fixed_years: 5.0,
            ..default_option(&option_label(1))
        },
    ]
}

pub fn default_mortgage() -> MortgageInputs {
    MortgageInputs {
        outstanding: DEFAULT_OUTSTANDING,
        remaining_term_months: to_total_months(DEFAULT_REMAINING_YEARS, DEFAULT_REMAINING_MONTHS),
    }
}

pub fn add_option(options: &mut Vec<LoanOption>) {
    let label = option_label(options.len());
    options.push(default_option(&label));
}

pub fn remove_option(options: &mut Vec<LoanOption>, index: usize) {
    if options.len() <= 1 || index >= options.len() {
        return;
    }
    options.remove(index);
    relabel_options(options);
}

pub fn relabel_options(options: &mut [LoanOption]) {
    for (idx, option) in options.iter_mut().enumerate() {
        option.label = option_label(idx);
    }
}

// Past the end of its schedule an option holds its end balance flat.
pub fn balance_at_month(metrics: &Metrics, month: u32) -> f64 {
    if month == 0 {
        return metrics.starting_balance;
    }
    metrics
        .fixed_schedule
        .get(month as usize - 1)
        .map_or(metrics.end_balance, |row| row.balance)
}

pub fn build_balance_chart(results: &[OptionMetrics]) -> BalanceChart {
    let max_fixed_months = results
        .iter()
        .map(|r| r.metrics.fixed_term_months)
        .max()
        .unwrap_or(0);

    let points = (0..=max_fixed_months)
        .map(|month| ChartPoint {
            month,
            balances: results
                .iter()
                .map(|r| balance_at_month(&r.metrics, month))
                .collect(),
        })
        .collect();

    BalanceChart {
        series: results.iter().map(|r| r.label.clone()).collect(),
        points,
    }
}

pub fn build_differences(results: &[OptionMetrics]) -> Vec<DifferenceRow> {
    let Some((baseline, rest)) = results.split_first() else {
        return Vec::new();
    };
    let base = &baseline.metrics;

    rest.iter()
        .map(|r| DifferenceRow {
            label: r.label.clone(),
            monthly_payment_delta: r.metrics.monthly_payment - base.monthly_payment,
            fixed_total_delta: r.metrics.total_paid_during_fixed - base.total_paid_during_fixed,
            end_balance_delta: r.metrics.end_balance - base.end_balance,
            full_term_cost_delta: r.metrics.total_cost_full_term - base.total_cost_full_term,
        })
        .collect()
}

pub fn format_gbp(amount: f64) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }

    let pence = (amount.abs() * 100.0).round();
    let negative = amount < 0.0 && pence > 0.0;
    let whole = (pence / 100.0).trunc();
    let fraction = (pence - whole * 100.0) as u64;

    let digits = format!("{whole:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}£{grouped}.{fraction:02}")
}

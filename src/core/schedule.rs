use super::numeric::monthly_rate;
use super::types::{RepaymentKind, ScheduleRow};

// Longest fixed term accepted from user input (100 years).
pub const MAX_TERM_MONTHS: u32 = 1_200;

#[derive(Debug, Clone, Copy)]
pub struct ScheduleParams {
    pub balance: f64,
    pub annual_rate: f64,
    pub months: u32,
    pub kind: RepaymentKind,
    pub base_payment: f64,
    pub overpayment: f64,
}

pub fn simulate_schedule(params: &ScheduleParams) -> Vec<ScheduleRow> {
    let r = monthly_rate(params.annual_rate);
    let mut rows = Vec::with_capacity(params.months.min(MAX_TERM_MONTHS) as usize);
    let mut balance = params.balance;

    for month in 1..=params.months {
        let interest = balance * r;
        let scheduled = match params.kind {
            RepaymentKind::InterestOnly => interest,
            RepaymentKind::Repayment => params.base_payment,
        };
        let mut payment = scheduled + params.overpayment;
        let mut principal = (payment - interest).max(0.0);
        if principal > balance {
            principal = balance;
            payment = interest + principal;
        }

        balance = (balance - principal).max(0.0);
        rows.push(ScheduleRow {
            month,
            balance,
            payment,
            interest,
            principal,
        });

        // Paid off: stop rather than pad the remaining months.
        if balance <= 0.0 {
            break;
        }
    }

    rows
}

use tracing::{debug, trace};

use super::numeric::{amortized_payment, monthly_rate, to_total_months};
use super::schedule::{ScheduleParams, simulate_schedule};
use super::types::{
    FeeHandling, LoanOption, Metrics, MortgageInputs, OptionMetrics, RepaymentKind,
};

#[derive(Debug, Clone, Copy)]
struct FeeSplit {
    added_to_loan: f64,
    upfront: f64,
}

impl FeeSplit {
    fn from_option(option: &LoanOption) -> Self {
        match option.fee_handling {
            FeeHandling::AddToLoan => Self {
                added_to_loan: option.fee_amount,
                upfront: 0.0,
            },
            FeeHandling::PaidUpfront => Self {
                added_to_loan: 0.0,
                upfront: option.fee_amount,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PostFixedProjection {
    payment: f64,
    total: f64,
}

pub fn compare_options(inputs: &MortgageInputs, options: &[LoanOption]) -> Vec<OptionMetrics> {
    options
        .iter()
        .map(|option| OptionMetrics {
            label: option.label.clone(),
            metrics: compute_option_metrics(inputs, option),
        })
        .collect()
}

pub fn compute_option_metrics(inputs: &MortgageInputs, option: &LoanOption) -> Metrics {
    let fixed_term_months = to_total_months(option.fixed_years, option.fixed_months);
    let fees = FeeSplit::from_option(option);
    let starting_balance = inputs.outstanding + fees.added_to_loan;

    // Never amortize over fewer than one month.
    let remaining_months = i64::from(inputs.remaining_term_months.max(1));
    let base_payment = match option.kind {
        RepaymentKind::Repayment => {
            amortized_payment(starting_balance, option.rate, remaining_months)
        }
        RepaymentKind::InterestOnly => 0.0,
    };
    let overpayment = option.overpayment.max(0.0);

    let fixed_schedule = simulate_schedule(&ScheduleParams {
        balance: starting_balance,
        annual_rate: option.rate,
        months: fixed_term_months,
        kind: option.kind,
        base_payment,
        overpayment,
    });

    let end_balance = fixed_schedule
        .last()
        .map_or(starting_balance, |row| row.balance);

    let monthly_payment = match option.kind {
        RepaymentKind::InterestOnly => starting_balance * monthly_rate(option.rate) + overpayment,
        RepaymentKind::Repayment => base_payment + overpayment,
    };

    let fixed_paid: f64 = fixed_schedule.iter().map(|row| row.payment).sum();
    let erc = if option.apply_erc {
        option.erc_amount
    } else {
        0.0
    };
    let total_paid_during_fixed = fixed_paid + fees.upfront + erc;

    let remaining_after_fixed = (remaining_months - i64::from(fixed_term_months)).max(0);
    let post_fixed = project_post_fixed(option, end_balance, remaining_after_fixed);

    let metrics = Metrics {
        monthly_payment,
        total_paid_during_fixed,
        end_balance,
        starting_balance,
        added_to_loan: fees.added_to_loan,
        upfront_fee: fees.upfront,
        fixed_term_months,
        fixed_schedule,
        after_fixed_payment: post_fixed.payment,
        after_fixed_total: post_fixed.total,
        total_cost_full_term: total_paid_during_fixed + post_fixed.total,
    };

    debug!(
        label = %option.label,
        fixed_term_months,
        schedule_rows = metrics.fixed_schedule.len(),
        monthly_payment = metrics.monthly_payment,
        end_balance = metrics.end_balance,
        total_cost_full_term = metrics.total_cost_full_term,
        "computed option metrics"
    );

    metrics
}

fn project_post_fixed(
    option: &LoanOption,
    end_balance: f64,
    remaining_after_fixed: i64,
) -> PostFixedProjection {
    if remaining_after_fixed <= 0 {
        return PostFixedProjection::default();
    }

    let rate = if option.reversion_rate != 0.0 {
        option.reversion_rate
    } else {
        option.rate
    };
    let payment = match option.kind {
        RepaymentKind::Repayment => amortized_payment(end_balance, rate, remaining_after_fixed),
        // Interest-only principal never reduces after the fixed term.
        RepaymentKind::InterestOnly => end_balance * monthly_rate(rate),
    };
    trace!(
        label = %option.label,
        rate,
        remaining_after_fixed,
        payment,
        "post-fixed projection"
    );

    PostFixedProjection {
        payment,
        total: payment * remaining_after_fixed as f64,
    }
}

mod comparison;
mod engine;
mod numeric;
mod schedule;
mod types;

pub use comparison::{
    BalanceChart, ChartPoint, DEFAULT_OUTSTANDING, DEFAULT_REMAINING_MONTHS,
    DEFAULT_REMAINING_YEARS, DifferenceRow, MAX_OPTIONS, add_option, balance_at_month,
    build_balance_chart, build_differences, default_mortgage, default_option, default_options,
    format_gbp, option_label, relabel_options, remove_option,
};
pub use engine::{compare_options, compute_option_metrics};
pub use numeric::{amortized_payment, monthly_rate, parse_decimal, to_total_months};
pub use schedule::{MAX_TERM_MONTHS, ScheduleParams, simulate_schedule};
pub use types::{
    FeeHandling, LoanOption, Metrics, MortgageInputs, OptionMetrics, RepaymentKind, ScheduleRow,
};

use axum::{
    Router,
    body::Bytes,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

mod error;

pub use error::{ApiError, ApiResult};

use crate::core::{
    BalanceChart, DEFAULT_REMAINING_MONTHS, DEFAULT_REMAINING_YEARS, DifferenceRow, FeeHandling,
    LoanOption, MAX_OPTIONS, MAX_TERM_MONTHS, MortgageInputs, OptionMetrics, RepaymentKind,
    build_balance_chart, build_differences, compare_options, default_mortgage, default_option,
    default_options, format_gbp, option_label, parse_decimal, to_total_months,
};

#[derive(Debug, Parser)]
#[command(name = "remortgage", version, about = "Compare remortgage offers side by side")]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable debug logging (RUST_LOG overrides)")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Serve the comparison JSON API over HTTP")]
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
    #[command(about = "Compare offers from a JSON request read from a file or stdin")]
    Compare {
        #[arg(long, help = "Path to a JSON comparison request; stdin when omitted")]
        input: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

// A form field arrives as a JSON number or as the text typed into the input.
// Anything else (booleans, arrays, objects) counts as 0.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl RawNumber {
    fn value(&self) -> f64 {
        match self {
            RawNumber::Number(v) => *v,
            RawNumber::Text(s) => parse_decimal(s),
            RawNumber::Other(_) => 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ApiRepaymentKind {
    #[serde(alias = "capital-and-interest", alias = "capitalAndInterest")]
    Repayment,
    #[serde(alias = "interest-only", alias = "interest_only")]
    InterestOnly,
}

impl From<ApiRepaymentKind> for RepaymentKind {
    fn from(value: ApiRepaymentKind) -> Self {
        match value {
            ApiRepaymentKind::Repayment => RepaymentKind::Repayment,
            ApiRepaymentKind::InterestOnly => RepaymentKind::InterestOnly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ApiFeeHandling {
    #[serde(alias = "addToLoan", alias = "add-to-loan", alias = "add_to_loan")]
    Add,
    #[serde(alias = "paidUpfront", alias = "paid-upfront", alias = "paid_upfront")]
    Upfront,
}

impl From<ApiFeeHandling> for FeeHandling {
    fn from(value: ApiFeeHandling) -> Self {
        match value {
            ApiFeeHandling::Add => FeeHandling::AddToLoan,
            ApiFeeHandling::Upfront => FeeHandling::PaidUpfront,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OptionPayload {
    #[serde(rename = "type", alias = "kind")]
    kind: Option<ApiRepaymentKind>,
    rate: Option<RawNumber>,
    fee_amount: Option<RawNumber>,
    fee_handling: Option<ApiFeeHandling>,
    fixed_years: Option<RawNumber>,
    fixed_months: Option<RawNumber>,
    overpayment: Option<RawNumber>,
    erc_amount: Option<RawNumber>,
    #[serde(alias = "applyERC")]
    apply_erc: Option<bool>,
    reversion_rate: Option<RawNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    outstanding: Option<RawNumber>,
    remaining_years: Option<RawNumber>,
    remaining_months: Option<RawNumber>,
    options: Option<Vec<OptionPayload>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CompareQuery {
    outstanding: Option<RawNumber>,
    remaining_years: Option<RawNumber>,
    remaining_months: Option<RawNumber>,
}

impl From<CompareQuery> for ComparePayload {
    fn from(query: CompareQuery) -> Self {
        Self {
            outstanding: query.outstanding,
            remaining_years: query.remaining_years,
            remaining_months: query.remaining_months,
            options: None,
        }
    }
}

#[derive(Debug)]
struct CompareRequest {
    inputs: MortgageInputs,
    options: Vec<LoanOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareResponse {
    outstanding: f64,
    remaining_term_months: u32,
    results: Vec<OptionMetrics>,
    differences: Vec<DifferenceRow>,
    chart: BalanceChart,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn api_request_from_json(json: &str) -> ApiResult<CompareRequest> {
    let payload = if json.trim().is_empty() {
        ComparePayload::default()
    } else {
        serde_json::from_str::<ComparePayload>(json)?
    };
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: ComparePayload) -> ApiResult<CompareRequest> {
    let mut inputs = default_mortgage();
    if let Some(v) = &payload.outstanding {
        inputs.outstanding = v.value();
    }
    let years = payload
        .remaining_years
        .as_ref()
        .map_or(DEFAULT_REMAINING_YEARS, RawNumber::value);
    let months = payload
        .remaining_months
        .as_ref()
        .map_or(DEFAULT_REMAINING_MONTHS, RawNumber::value);
    inputs.remaining_term_months = to_total_months(years, months);

    let options = match payload.options {
        None => default_options(),
        Some(list) if list.is_empty() => return Err(ApiError::NoOptions),
        Some(list) if list.len() > MAX_OPTIONS => {
            return Err(ApiError::TooManyOptions {
                count: list.len(),
                max: MAX_OPTIONS,
            });
        }
        Some(list) => list
            .into_iter()
            .enumerate()
            .map(|(idx, p)| option_from_payload(idx, p))
            .collect(),
    };

    for option in &options {
        let months = to_total_months(option.fixed_years, option.fixed_months);
        if months > MAX_TERM_MONTHS {
            return Err(ApiError::TermTooLong {
                label: option.label.clone(),
                months,
                max: MAX_TERM_MONTHS,
            });
        }
    }

    Ok(CompareRequest { inputs, options })
}

fn option_from_payload(index: usize, payload: OptionPayload) -> LoanOption {
    let mut option = default_option(&option_label(index));

    if let Some(v) = payload.kind {
        option.kind = v.into();
    }
    if let Some(v) = payload.rate {
        option.rate = v.value();
    }
    if let Some(v) = payload.fee_amount {
        option.fee_amount = v.value();
    }
    if let Some(v) = payload.fee_handling {
        option.fee_handling = v.into();
    }
    if let Some(v) = payload.fixed_years {
        option.fixed_years = v.value();
    }
    if let Some(v) = payload.fixed_months {
        option.fixed_months = v.value();
    }
    if let Some(v) = payload.overpayment {
        option.overpayment = v.value();
    }
    if let Some(v) = payload.erc_amount {
        option.erc_amount = v.value();
    }
    if let Some(v) = payload.apply_erc {
        option.apply_erc = v;
    }
    if let Some(v) = payload.reversion_rate {
        option.reversion_rate = v.value();
    }

    option
}

fn build_compare_response(request: &CompareRequest) -> CompareResponse {
    let results = compare_options(&request.inputs, &request.options);
    CompareResponse {
        outstanding: request.inputs.outstanding,
        remaining_term_months: request.inputs.remaining_term_months,
        differences: build_differences(&results),
        chart: build_balance_chart(&results),
        results,
    }
}

pub fn run_compare_command(input: Option<&Path>, format: OutputFormat) -> ApiResult<String> {
    let json = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let request = api_request_from_json(&json)?;
    debug!(
        options = request.options.len(),
        remaining_term_months = request.inputs.remaining_term_months,
        "running comparison"
    );
    let response = build_compare_response(&request);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&response)?),
        OutputFormat::Table => Ok(render_table(&response)),
    }
}

fn render_table(response: &CompareResponse) -> String {
    let label_width = response
        .results
        .iter()
        .map(|r| r.label.len())
        .max()
        .unwrap_or(0)
        .max("Option".len());

    let mut lines = vec![
        format!(
            "Outstanding {} over {} months",
            format_gbp(response.outstanding),
            response.remaining_term_months
        ),
        String::new(),
        format!(
            "{:<label_width$}  {:>14}  {:>16}  {:>16}  {:>18}  {:>16}",
            "Option",
            "Monthly",
            "Fixed-term total",
            "Left after fixed",
            "Post-fixed monthly",
            "Full-term cost"
        ),
    ];

    for result in &response.results {
        let m = &result.metrics;
        lines.push(format!(
            "{:<label_width$}  {:>14}  {:>16}  {:>16}  {:>18}  {:>16}",
            result.label,
            format_gbp(m.monthly_payment),
            format_gbp(m.total_paid_during_fixed),
            format_gbp(m.end_balance.max(0.0)),
            format_gbp(m.after_fixed_payment),
            format_gbp(m.total_cost_full_term),
        ));
    }

    if let (Some(baseline), false) = (response.results.first(), response.differences.is_empty()) {
        lines.push(String::new());
        lines.push(format!("Differences vs {}", baseline.label));
        lines.push(format!(
            "{:<label_width$}  {:>14}  {:>18}  {:>16}  {:>16}",
            "Option",
            "Monthly Δ",
            "Fixed-term total Δ",
            "End balance Δ",
            "Full-term cost Δ"
        ));
        for row in &response.differences {
            lines.push(format!(
                "{:<label_width$}  {:>14}  {:>18}  {:>16}  {:>16}",
                row.label,
                format_gbp(row.monthly_payment_delta),
                format_gbp(row.fixed_total_delta),
                format_gbp(row.end_balance_delta),
                format_gbp(row.full_term_cost_delta),
            ));
        }
    }

    lines.join("\n")
}

pub async fn run_http_server(host: &str, port: u16) -> ApiResult<()> {
    let listener = TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "remortgage comparison API listening");

    axum::serve(listener, router()).await?;
    Ok(())
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compare_get_handler(Query(query): Query<CompareQuery>) -> Response {
    compare_handler_impl(query.into())
}

async fn compare_post_handler(body: Bytes) -> Response {
    let request = std::str::from_utf8(&body)
        .map_err(|e| ApiError::InvalidJson(e.to_string()))
        .and_then(api_request_from_json);
    compare_response(request)
}

fn compare_handler_impl(payload: ComparePayload) -> Response {
    compare_response(api_request_from_payload(payload))
}

fn compare_response(request: ApiResult<CompareRequest>) -> Response {
    let request = match request {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejected compare request");
            return error_response(err.status(), &err.to_string());
        }
    };

    debug!(
        options = request.options.len(),
        outstanding = request.inputs.outstanding,
        remaining_term_months = request.inputs.remaining_term_months,
        "compare request"
    );
    json_response(StatusCode::OK, build_compare_response(&request))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "outstanding": "180,000",
          "remainingYears": 20,
          "remainingMonths": "6",
          "options": [
            {
              "type": "interestOnly",
              "rate": "3.75",
              "feeAmount": 1495,
              "feeHandling": "upfront",
              "fixedYears": "5",
              "fixedMonths": 0,
              "overpayment": "150",
              "ercAmount": "3,000",
              "applyERC": true,
              "reversionRate": "7.49"
            },
            { "rate": 4.1 }
          ]
        }"#;
        let request = api_request_from_json(json).expect("json should parse");

        assert_approx(request.inputs.outstanding, 180_000.0);
        assert_eq!(request.inputs.remaining_term_months, 246);
        assert_eq!(request.options.len(), 2);

        let a = &request.options[0];
        assert_eq!(a.label, "Option A");
        assert_eq!(a.kind, RepaymentKind::InterestOnly);
        assert_approx(a.rate, 3.75);
        assert_approx(a.fee_amount, 1_495.0);
        assert_eq!(a.fee_handling, FeeHandling::PaidUpfront);
        assert_approx(a.fixed_years, 5.0);
        assert_approx(a.overpayment, 150.0);
        assert_approx(a.erc_amount, 3_000.0);
        assert!(a.apply_erc);
        assert_approx(a.reversion_rate, 7.49);

        let b = &request.options[1];
        assert_eq!(b.label, "Option B");
        assert_approx(b.rate, 4.1);
        assert_eq!(
            *b,
            LoanOption {
                rate: 4.1,
                ..default_option("Option B")
            }
        );
    }

    #[test]
    fn api_request_accepts_enum_aliases() {
        let json = r#"{
          "options": [
            { "kind": "interest-only", "feeHandling": "paid-upfront" },
            { "type": "repayment", "feeHandling": "addToLoan" }
          ]
        }"#;
        let request = api_request_from_json(json).expect("json should parse");
        assert_eq!(request.options[0].kind, RepaymentKind::InterestOnly);
        assert_eq!(request.options[0].fee_handling, FeeHandling::PaidUpfront);
        assert_eq!(request.options[1].kind, RepaymentKind::Repayment);
        assert_eq!(request.options[1].fee_handling, FeeHandling::AddToLoan);
    }

    #[test]
    fn api_request_defaults_to_two_option_comparison() {
        let request = api_request_from_json("{}").expect("json should parse");
        assert_eq!(request.inputs, default_mortgage());
        assert_eq!(request.options, default_options());

        let blank = api_request_from_json("  \n").expect("blank input uses defaults");
        assert_eq!(blank.options.len(), 2);
    }

    #[test]
    fn api_request_degrades_invalid_numbers_to_zero() {
        let json = r#"{
          "outstanding": "lots",
          "remainingYears": "",
          "options": [{ "rate": "abc", "overpayment": "-50", "fixedYears": "x" }]
        }"#;
        let request = api_request_from_json(json).expect("json should parse");
        assert_eq!(request.inputs.outstanding, 0.0);
        assert_eq!(request.inputs.remaining_term_months, 0);
        assert_eq!(request.options[0].rate, 0.0);
        assert_eq!(request.options[0].overpayment, -50.0);
        assert_eq!(request.options[0].fixed_years, 0.0);

        // The engine still produces a defined result for degenerate input.
        let response = build_compare_response(&request);
        let metrics = &response.results[0].metrics;
        assert!(metrics.fixed_schedule.is_empty());
        assert_eq!(metrics.monthly_payment, 999.0);
    }

    #[test]
    fn api_request_treats_non_numeric_json_values_as_zero() {
        let json = r#"{
          "outstanding": [1, 2],
          "options": [{ "rate": true, "overpayment": null, "feeAmount": { "gbp": 10 } }]
        }"#;
        let request = api_request_from_json(json).expect("json should parse");
        assert_eq!(request.inputs.outstanding, 0.0);
        assert_eq!(request.options[0].rate, 0.0);
        assert_eq!(request.options[0].overpayment, 0.0);
        assert_eq!(request.options[0].fee_amount, 0.0);
    }

    #[test]
    fn api_request_rejects_fixed_term_beyond_limit() {
        for kind in ["repayment", "interestOnly"] {
            let json = format!(r#"{{ "options": [{{ "type": "{kind}", "fixedYears": "1e9" }}] }}"#);
            let err = api_request_from_json(&json).expect_err("must reject");
            assert!(matches!(
                err,
                ApiError::TermTooLong { ref label, months: u32::MAX, max: MAX_TERM_MONTHS }
                    if label == "Option A"
            ));
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }

        let at_limit = api_request_from_json(r#"{ "options": [{ "fixedYears": 100 }] }"#)
            .expect("100 years is accepted");
        assert_eq!(at_limit.options[0].fixed_years, 100.0);
    }

    #[test]
    fn api_request_rejects_empty_option_list() {
        let err = api_request_from_json(r#"{ "options": [] }"#).expect_err("must reject");
        assert!(matches!(err, ApiError::NoOptions));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_request_rejects_too_many_options() {
        let options = vec!["{}"; MAX_OPTIONS + 1].join(",");
        let json = format!(r#"{{ "options": [{options}] }}"#);
        let err = api_request_from_json(&json).expect_err("must reject");
        assert!(matches!(
            err,
            ApiError::TooManyOptions { count: 27, max: 26 }
        ));
        assert!(err.to_string().contains("at most 26"));
    }

    #[test]
    fn api_request_reports_malformed_json() {
        let err = api_request_from_json("{ not json").expect_err("must reject");
        assert!(matches!(err, ApiError::InvalidJson(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn query_form_uses_default_options() {
        let query = CompareQuery {
            outstanding: Some(RawNumber::Text("200,000".to_string())),
            remaining_years: Some(RawNumber::Text("10".to_string())),
            remaining_months: None,
        };
        let request = api_request_from_payload(query.into()).expect("valid query");
        assert_approx(request.inputs.outstanding, 200_000.0);
        assert_eq!(request.inputs.remaining_term_months, 120);
        assert_eq!(request.options, default_options());
    }

    #[test]
    fn compare_response_serialization_contains_expected_fields() {
        let request = api_request_from_json("{}").expect("defaults");
        let response = build_compare_response(&request);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.differences.len(), 1);
        assert_eq!(response.chart.points.len(), 61);

        let json = serde_json::to_string(&response).expect("response should serialize");
        for key in [
            "\"remainingTermMonths\"",
            "\"results\"",
            "\"label\"",
            "\"monthlyPayment\"",
            "\"totalPaidDuringFixed\"",
            "\"fixedSchedule\"",
            "\"afterFixedPayment\"",
            "\"totalCostFullTerm\"",
            "\"differences\"",
            "\"monthlyPaymentDelta\"",
            "\"chart\"",
            "\"series\"",
            "\"balances\"",
        ] {
            assert!(json.contains(key), "missing {key}");
        }
    }

    #[test]
    fn table_lists_options_and_differences() {
        let request = api_request_from_json("{}").expect("defaults");
        let table = render_table(&build_compare_response(&request));

        assert!(table.starts_with("Outstanding £250,000.00 over 300 months"));
        assert!(table.contains("Option A"));
        assert!(table.contains("Differences vs Option A"));
        assert!(table.contains("Monthly Δ"));
    }

    #[test]
    fn table_omits_differences_for_single_option() {
        let request = api_request_from_json(r#"{ "options": [{}] }"#).expect("valid");
        let table = render_table(&build_compare_response(&request));
        assert!(!table.contains("Differences vs"));
    }

    #[test]
    fn compare_command_reads_request_file() {
        let path = std::env::temp_dir().join(format!(
            "remortgage-compare-{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).expect("create temp file");
        file.write_all(br#"{ "outstanding": 120000, "options": [{ "rate": 0, "fixedYears": 25 }] }"#)
            .expect("write temp file");

        let out = run_compare_command(Some(&path), OutputFormat::Json).expect("command runs");
        std::fs::remove_file(&path).ok();

        let value: serde_json::Value = serde_json::from_str(&out).expect("valid json output");
        let metrics = &value["results"][0]["metrics"];
        assert_eq!(metrics["monthlyPayment"].as_f64(), Some(120_999.0 / 300.0));
        assert_eq!(value["differences"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn compare_command_reports_missing_file() {
        let err = run_compare_command(
            Some(Path::new("/nonexistent/remortgage/request.json")),
            OutputFormat::Table,
        )
        .expect_err("missing file");
        assert!(matches!(err, ApiError::Io(_)));
    }

    mod routes {
        use super::super::router;
        use axum::body::Body;
        use axum::http::{Request, StatusCode, header};
        use http_body_util::BodyExt;
        use serde_json::Value;
        use tower::ServiceExt;

        async fn send(request: Request<Body>) -> (StatusCode, Option<String>, Value) {
            let response = router().oneshot(request).await.expect("router responds");
            let status = response.status();
            let cache_control = response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = response
                .into_body()
                .collect()
                .await
                .expect("body collects")
                .to_bytes();
            let json = serde_json::from_slice(&bytes).expect("body is json");
            (status, cache_control, json)
        }

        async fn post_compare(body: &'static str) -> (StatusCode, Option<String>, Value) {
            send(
                Request::builder()
                    .method("POST")
                    .uri("/api/compare")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .expect("request builds"),
            )
            .await
        }

        fn get(uri: &str) -> Request<Body> {
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request builds")
        }

        #[tokio::test]
        async fn health_reports_ok() {
            let (status, cache_control, body) = send(get("/health")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            assert_eq!(body["status"], "ok");
        }

        #[tokio::test]
        async fn get_compare_reads_query_string() {
            let (status, cache_control, body) =
                send(get("/api/compare?outstanding=200%2C000&remainingYears=10")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            assert_eq!(body["outstanding"].as_f64(), Some(200_000.0));
            assert_eq!(body["remainingTermMonths"].as_u64(), Some(120));
            assert_eq!(body["results"].as_array().map(Vec::len), Some(2));
        }

        #[tokio::test]
        async fn post_compare_returns_results() {
            let (status, cache_control, body) =
                post_compare(r#"{ "outstanding": "150,000", "options": [{ "rate": "4.5" }] }"#).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            assert_eq!(body["results"][0]["label"], "Option A");
            assert_eq!(body["differences"].as_array().map(Vec::len), Some(0));
        }

        #[tokio::test]
        async fn post_compare_malformed_json_is_json_error() {
            let (status, cache_control, body) = post_compare("{ not json").await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            let message = body["error"].as_str().expect("error message");
            assert!(message.starts_with("invalid JSON payload"), "{message}");
        }

        #[tokio::test]
        async fn post_compare_boolean_rate_degrades_to_zero() {
            let (status, _, body) = post_compare(r#"{ "options": [{ "rate": true }] }"#).await;
            assert_eq!(status, StatusCode::OK);
            let metrics = &body["results"][0]["metrics"];
            assert_eq!(metrics["monthlyPayment"].as_f64(), Some(250_999.0 / 300.0));
        }

        #[tokio::test]
        async fn post_compare_rejects_empty_options() {
            let (status, cache_control, body) = post_compare(r#"{ "options": [] }"#).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            assert!(body["error"].as_str().is_some());
        }

        #[tokio::test]
        async fn post_compare_rejects_huge_fixed_term() {
            let (status, _, body) =
                post_compare(r#"{ "options": [{ "type": "interestOnly", "fixedYears": 1e9 }] }"#)
                    .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let message = body["error"].as_str().expect("error message");
            assert!(message.contains("1200-month limit"), "{message}");
        }

        #[tokio::test]
        async fn unknown_route_is_json_not_found() {
            let (status, cache_control, body) = send(get("/nope")).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            assert_eq!(body["error"], "Not found");
        }
    }
}

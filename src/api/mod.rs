use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::{
    AdviceSummary, AssetRecord, ExpenseRecord, FinancialSnapshot, GoalOverride, IncomeRecord,
    LiquidAssets, MonthlyExpenses, MonthlyIncome, NonLiquidAssets, Profile, ProjectionResult,
    YearlyExpenses, compute_snapshot, project_growth,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidPayload(String),
    #[error("missing or malformed Authorization bearer token")]
    Unauthorized,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::warn!("request rejected: {self}");
        error_response(self.status(), &self.to_string())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliStrategy {
    Lean,
    Standard,
    Chubby,
    Fat,
    Barista,
}

impl CliStrategy {
    fn id(self) -> &'static str {
        match self {
            Self::Lean => "lean",
            Self::Standard => "standard",
            Self::Chubby => "chubby",
            Self::Fat => "fat",
            Self::Barista => "barista",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "wealthwise",
    about = "Personal-finance statistics and FIRE projection engine"
)]
struct Cli {
    #[arg(long, default_value_t = 0.0, help = "Monthly salary")]
    salary: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual bonus, added to income as-is (not multiplied by 12)"
    )]
    bonus: f64,

    #[arg(long, default_value_t = 0.0, help = "Monthly housing expense")]
    housing: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly living expense")]
    living: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly transport expense")]
    transport: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly entertainment expense")]
    entertainment: f64,

    #[arg(long, default_value_t = 0.0, help = "Annual insurance expense")]
    insurance: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual tax expense")]
    tax: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual travel expense")]
    travel: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual loan payments")]
    loan: f64,

    #[arg(long, default_value_t = 0.0, help = "Cash balance")]
    cash: f64,
    #[arg(long, default_value_t = 0.0, help = "Stock holdings balance")]
    stock: f64,
    #[arg(long, default_value_t = 0.0, help = "Bond holdings balance")]
    bond: f64,
    #[arg(long, default_value_t = 0.0, help = "Real estate value")]
    real_estate: f64,
    #[arg(long, default_value_t = 0.0, help = "Vehicle value")]
    car: f64,
    #[arg(long, default_value_t = 0.0, help = "Other non-liquid assets")]
    other: f64,

    #[arg(
        long,
        value_enum,
        default_value_t = CliStrategy::Standard,
        help = "FIRE strategy that sizes the retirement goal"
    )]
    strategy: CliStrategy,
    #[arg(
        long,
        help = "Manual goal override; omit to use the strategy-computed goal"
    )]
    manual_goal: Option<f64>,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Assumed annual investment return in percent"
    )]
    return_rate: f64,
}

/// Sanitized inputs for one engine evaluation. The strategy id stays a free
/// string so unknown ids reach the catalog's fail-closed lookup instead of
/// being rejected here.
#[derive(Debug, Clone)]
struct EngineInputs {
    incomes: IncomeRecord,
    expenses: ExpenseRecord,
    assets: AssetRecord,
    manual_goal: GoalOverride,
    strategy_id: String,
    return_rate: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    salary: Option<f64>,
    bonus: Option<f64>,

    housing: Option<f64>,
    living: Option<f64>,
    transport: Option<f64>,
    entertainment: Option<f64>,
    insurance: Option<f64>,
    tax: Option<f64>,
    travel: Option<f64>,
    loan: Option<f64>,

    cash: Option<f64>,
    stock: Option<f64>,
    bond: Option<f64>,
    real_estate: Option<f64>,
    car: Option<f64>,
    other: Option<f64>,

    strategy_id: Option<String>,
    manual_goal: Option<f64>,
    return_rate: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    return_rate: f64,
    strategy_id: String,
    stats: FinancialSnapshot,
    projection: ProjectionResult,
    advice_summary: AdviceSummary,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    status: &'static str,
    data: Option<Profile>,
}

fn build_inputs(cli: Cli) -> Result<EngineInputs, ApiError> {
    for (name, value) in [
        ("--salary", cli.salary),
        ("--bonus", cli.bonus),
        ("--housing", cli.housing),
        ("--living", cli.living),
        ("--transport", cli.transport),
        ("--entertainment", cli.entertainment),
        ("--insurance", cli.insurance),
        ("--tax", cli.tax),
        ("--travel", cli.travel),
        ("--loan", cli.loan),
        ("--cash", cli.cash),
        ("--stock", cli.stock),
        ("--bond", cli.bond),
        ("--real-estate", cli.real_estate),
        ("--car", cli.car),
        ("--other", cli.other),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ApiError::InvalidPayload(format!(
                "{name} must be a finite non-negative number"
            )));
        }
    }

    if !(0.0..=100.0).contains(&cli.return_rate) {
        return Err(ApiError::InvalidPayload(
            "--return-rate must be between 0 and 100".to_string(),
        ));
    }

    if let Some(goal) = cli.manual_goal {
        if !goal.is_finite() || goal < 0.0 {
            return Err(ApiError::InvalidPayload(
                "--manual-goal must be a finite non-negative number".to_string(),
            ));
        }
    }

    Ok(EngineInputs {
        incomes: IncomeRecord {
            monthly: MonthlyIncome {
                salary: cli.salary,
                bonus: cli.bonus,
            },
        },
        expenses: ExpenseRecord {
            monthly: MonthlyExpenses {
                housing: cli.housing,
                living: cli.living,
                transport: cli.transport,
                entertainment: cli.entertainment,
            },
            yearly: YearlyExpenses {
                insurance: cli.insurance,
                tax: cli.tax,
                travel: cli.travel,
                loan: cli.loan,
            },
        },
        assets: AssetRecord {
            liquid: LiquidAssets {
                cash: cli.cash,
                stock: cli.stock,
                bond: cli.bond,
            },
            non_liquid: NonLiquidAssets {
                real_estate: cli.real_estate,
                car: cli.car,
                other: cli.other,
            },
        },
        manual_goal: cli.manual_goal.into(),
        strategy_id: cli.strategy.id().to_string(),
        return_rate: cli.return_rate,
    })
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<EngineInputs, ApiError> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| ApiError::InvalidPayload(format!("Invalid API JSON payload: {e}")))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<EngineInputs, ApiError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.salary {
        cli.salary = v;
    }
    if let Some(v) = payload.bonus {
        cli.bonus = v;
    }

    if let Some(v) = payload.housing {
        cli.housing = v;
    }
    if let Some(v) = payload.living {
        cli.living = v;
    }
    if let Some(v) = payload.transport {
        cli.transport = v;
    }
    if let Some(v) = payload.entertainment {
        cli.entertainment = v;
    }
    if let Some(v) = payload.insurance {
        cli.insurance = v;
    }
    if let Some(v) = payload.tax {
        cli.tax = v;
    }
    if let Some(v) = payload.travel {
        cli.travel = v;
    }
    if let Some(v) = payload.loan {
        cli.loan = v;
    }

    if let Some(v) = payload.cash {
        cli.cash = v;
    }
    if let Some(v) = payload.stock {
        cli.stock = v;
    }
    if let Some(v) = payload.bond {
        cli.bond = v;
    }
    if let Some(v) = payload.real_estate {
        cli.real_estate = v;
    }
    if let Some(v) = payload.car {
        cli.car = v;
    }
    if let Some(v) = payload.other {
        cli.other = v;
    }

    if let Some(v) = payload.manual_goal {
        cli.manual_goal = Some(v);
    }
    if let Some(v) = payload.return_rate {
        cli.return_rate = v;
    }

    let mut inputs = build_inputs(cli)?;
    if let Some(id) = payload.strategy_id {
        inputs.strategy_id = id;
    }
    Ok(inputs)
}

fn default_cli_for_api() -> Cli {
    Cli {
        salary: 0.0,
        bonus: 0.0,
        housing: 0.0,
        living: 0.0,
        transport: 0.0,
        entertainment: 0.0,
        insurance: 0.0,
        tax: 0.0,
        travel: 0.0,
        loan: 0.0,
        cash: 0.0,
        stock: 0.0,
        bond: 0.0,
        real_estate: 0.0,
        car: 0.0,
        other: 0.0,
        strategy: CliStrategy::Standard,
        manual_goal: None,
        return_rate: 6.0,
    }
}

fn run_simulation(inputs: &EngineInputs) -> SimulateResponse {
    let stats = compute_snapshot(
        &inputs.incomes,
        &inputs.expenses,
        &inputs.assets,
        inputs.manual_goal,
        &inputs.strategy_id,
    );
    let projection = project_growth(
        stats.total_liquid_assets,
        stats.monthly_savings,
        stats.effective_goal,
        inputs.return_rate,
    );
    let advice_summary = stats.advice_summary(inputs.return_rate);

    SimulateResponse {
        return_rate: inputs.return_rate,
        strategy_id: inputs.strategy_id.clone(),
        stats,
        projection,
        advice_summary,
    }
}

type SharedProfiles = Arc<RwLock<HashMap<String, Profile>>>;

/// The token itself is an opaque storage key here; verifying it belongs to
/// the authentication collaborator in front of this service.
fn bearer_user(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::Unauthorized)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let profiles: SharedProfiles = Arc::new(RwLock::new(HashMap::new()));
    let app = Router::new()
        .route("/healthz", get(health_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route("/api/profile/save", post(profile_save_handler))
        .route("/api/profile/get", get(profile_get_handler))
        .fallback(not_found_handler)
        .with_state(profiles);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("WealthWise HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, StatusResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let inputs = match api_request_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(err) => return err.into_response(),
    };
    json_response(StatusCode::OK, run_simulation(&inputs))
}

async fn profile_save_handler(
    State(profiles): State<SharedProfiles>,
    headers: HeaderMap,
    Json(profile): Json<Profile>,
) -> Response {
    let user = match bearer_user(&headers) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    profiles
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(user, profile);
    json_response(StatusCode::OK, StatusResponse { status: "success" })
}

async fn profile_get_handler(
    State(profiles): State<SharedProfiles>,
    headers: HeaderMap,
) -> Response {
    let user = match bearer_user(&headers) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let data = profiles
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&user)
        .copied();
    json_response(
        StatusCode::OK,
        ProfileResponse {
            status: "success",
            data,
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
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

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        Cli {
            salary: 100_000.0,
            bonus: 50_000.0,
            housing: 20_000.0,
            living: 10_000.0,
            transport: 3_000.0,
            entertainment: 2_000.0,
            insurance: 30_000.0,
            tax: 10_000.0,
            travel: 20_000.0,
            loan: 0.0,
            cash: 300_000.0,
            stock: 500_000.0,
            bond: 100_000.0,
            real_estate: 8_000_000.0,
            car: 400_000.0,
            other: 0.0,
            strategy: CliStrategy::Standard,
            manual_goal: None,
            return_rate: 6.0,
        }
    }

    #[test]
    fn build_inputs_maps_cli_fields_into_records() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        assert_approx(inputs.incomes.monthly.salary, 100_000.0);
        assert_approx(inputs.expenses.yearly.insurance, 30_000.0);
        assert_approx(inputs.assets.non_liquid.real_estate, 8_000_000.0);
        assert_eq!(inputs.strategy_id, "standard");
        assert_eq!(inputs.manual_goal, GoalOverride::Unset);
        assert_approx(inputs.return_rate, 6.0);
    }

    #[test]
    fn build_inputs_rejects_negative_amounts() {
        let mut cli = sample_cli();
        cli.housing = -1.0;
        let err = build_inputs(cli).expect_err("must reject negative expense");
        assert!(err.to_string().contains("--housing"));
    }

    #[test]
    fn build_inputs_rejects_non_finite_amounts() {
        let mut cli = sample_cli();
        cli.stock = f64::NAN;
        let err = build_inputs(cli).expect_err("must reject NaN balance");
        assert!(err.to_string().contains("--stock"));
    }

    #[test]
    fn build_inputs_rejects_out_of_range_return_rate() {
        let mut cli = sample_cli();
        cli.return_rate = 120.0;
        let err = build_inputs(cli).expect_err("must reject >100% return rate");
        assert!(err.to_string().contains("--return-rate"));
    }

    #[test]
    fn build_inputs_rejects_negative_manual_goal() {
        let mut cli = sample_cli();
        cli.manual_goal = Some(-5.0);
        let err = build_inputs(cli).expect_err("must reject negative goal");
        assert!(err.to_string().contains("--manual-goal"));
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "salary": 100000,
          "bonus": 50000,
          "housing": 20000,
          "living": 10000,
          "transport": 3000,
          "entertainment": 2000,
          "insurance": 30000,
          "tax": 10000,
          "travel": 20000,
          "cash": 300000,
          "stock": 500000,
          "bond": 100000,
          "realEstate": 8000000,
          "car": 400000,
          "strategyId": "chubby",
          "manualGoal": 9000000,
          "returnRate": 7.5
        }"#;
        let inputs = api_request_from_json(json).expect("json should parse");

        assert_approx(inputs.incomes.monthly.salary, 100_000.0);
        assert_approx(inputs.incomes.monthly.bonus, 50_000.0);
        assert_approx(inputs.expenses.monthly.entertainment, 2_000.0);
        assert_approx(inputs.expenses.yearly.travel, 20_000.0);
        assert_approx(inputs.assets.liquid.bond, 100_000.0);
        assert_approx(inputs.assets.non_liquid.real_estate, 8_000_000.0);
        assert_eq!(inputs.strategy_id, "chubby");
        assert_eq!(inputs.manual_goal, GoalOverride::Override(9_000_000.0));
        assert_approx(inputs.return_rate, 7.5);
    }

    #[test]
    fn api_request_defaults_unspecified_fields() {
        let inputs = api_request_from_json("{}").expect("empty payload is valid");
        assert_approx(inputs.incomes.monthly.salary, 0.0);
        assert_eq!(inputs.strategy_id, "standard");
        assert_eq!(inputs.manual_goal, GoalOverride::Unset);
        assert_approx(inputs.return_rate, 6.0);
    }

    #[test]
    fn unknown_strategy_id_flows_through_to_the_catalog_fallback() {
        let inputs =
            api_request_from_json(r#"{"strategyId": "no-such-mode"}"#).expect("payload is valid");
        let response = run_simulation(&inputs);
        assert_eq!(response.stats.selected_strategy.id, "lean");
        // the response echoes the requested id even when the catalog falls back
        assert_eq!(response.strategy_id, "no-such-mode");
    }

    #[test]
    fn manual_goal_zero_is_an_override_not_unset() {
        let inputs = api_request_from_json(r#"{"manualGoal": 0, "salary": 100000}"#)
            .expect("payload is valid");
        assert_eq!(inputs.manual_goal, GoalOverride::Override(0.0));

        let response = run_simulation(&inputs);
        assert_eq!(response.stats.effective_goal, 0.0);
        // goal already met at month zero
        assert_eq!(response.projection.years_to_goal, 0.0);
        assert!(response.projection.samples.is_empty());
    }

    #[test]
    fn simulate_response_serialization_contains_expected_fields() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        let response = run_simulation(&inputs);
        let json = serde_json::to_string(&response).expect("response should serialize");

        assert!(json.contains("\"returnRate\""));
        assert!(json.contains("\"strategyId\":\"standard\""));
        assert!(json.contains("\"stats\""));
        assert!(json.contains("\"projection\""));
        assert!(json.contains("\"adviceSummary\""));
        assert!(json.contains("\"annualIncome\""));
        assert!(json.contains("\"selectedStrategy\""));
        assert!(json.contains("\"emergencyFundMet\""));
        assert!(json.contains("\"yearsToGoal\""));
        assert!(json.contains("\"goalReached\""));
        assert!(json.contains("\"samples\""));
    }

    #[test]
    fn advice_summary_passes_snapshot_fields_through() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        let response = run_simulation(&inputs);

        assert_approx(
            response.advice_summary.annual_income,
            response.stats.annual_income,
        );
        assert_approx(
            response.advice_summary.total_liquid_assets,
            response.stats.total_liquid_assets,
        );
        assert_approx(
            response.advice_summary.effective_goal,
            response.stats.effective_goal,
        );
        assert_approx(response.advice_summary.annual_return_rate_percent, 6.0);
    }

    #[test]
    fn bearer_user_extracts_the_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer user-abc-123".parse().expect("valid header"),
        );
        assert_eq!(
            bearer_user(&headers).expect("token expected"),
            "user-abc-123"
        );
    }

    #[test]
    fn bearer_user_rejects_missing_or_empty_tokens() {
        let headers = HeaderMap::new();
        assert!(matches!(bearer_user(&headers), Err(ApiError::Unauthorized)));

        let mut empty = HeaderMap::new();
        empty.insert(
            header::AUTHORIZATION,
            "Bearer ".parse().expect("valid header"),
        );
        assert!(matches!(bearer_user(&empty), Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn profile_save_then_get_round_trips_per_user() {
        let profiles: SharedProfiles = Arc::new(RwLock::new(HashMap::new()));
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer token-1".parse().expect("valid header"),
        );

        let profile = Profile {
            manual_goal: GoalOverride::Override(2_000_000.0),
            return_rate: 8.0,
            ..Profile::default()
        };
        let save = profile_save_handler(
            State(profiles.clone()),
            headers.clone(),
            Json(profile),
        )
        .await;
        assert_eq!(save.status(), StatusCode::OK);
        assert_eq!(
            profiles
                .read()
                .expect("store lock")
                .get("token-1")
                .expect("profile saved")
                .return_rate,
            8.0
        );

        let get = profile_get_handler(State(profiles.clone()), headers).await;
        assert_eq!(get.status(), StatusCode::OK);

        // a different user sees no data but still gets a success envelope
        let mut other = HeaderMap::new();
        other.insert(
            header::AUTHORIZATION,
            "Bearer token-2".parse().expect("valid header"),
        );
        let miss = profile_get_handler(State(profiles), other).await;
        assert_eq!(miss.status(), StatusCode::OK);
    }
}

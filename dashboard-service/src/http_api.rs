use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use usage_client::domain::UtilityKind;

use crate::{
    dashboard::{self, DateStep, UsagePanel, UsageSnapshot},
    repository::{format_calendar_date, parse_calendar_date, RepositoryError, UsageRepository},
};

/// Household picker settings shared by all handlers.
#[derive(Debug, Clone)]
pub struct Households {
    pub options: Vec<String>,
    pub default: String,
}

#[derive(Clone)]
pub struct ApiState {
    pub repository: Arc<UsageRepository>,
    pub households: Arc<Households>,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Repository(RepositoryError::MalformedDate(_)) => StatusCode::BAD_REQUEST,
            ApiError::Repository(RepositoryError::FetchFailed(_)) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/households", get(households))
        .route("/api/date", get(step_date))
        .route("/api/usage", get(usage))
        .route("/api/dashboard", get(usage_dashboard))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Serialize)]
struct HouseholdsBody {
    households: Vec<String>,
    default: String,
}

async fn households(State(state): State<ApiState>) -> Json<HouseholdsBody> {
    Json(HouseholdsBody {
        households: state.households.options.clone(),
        default: state.households.default.clone(),
    })
}

#[derive(Deserialize)]
struct DateStepQuery {
    date: Option<String>,
    #[serde(default)]
    step: DateStep,
}

#[derive(Serialize)]
struct DateBody {
    date: String,
}

async fn step_date(Query(q): Query<DateStepQuery>) -> Result<Json<DateBody>, ApiError> {
    let date = resolve_date(q.date.as_deref())?;
    let date = format_calendar_date(dashboard::step_date(date, q.step))?;
    Ok(Json(DateBody { date }))
}

#[derive(Deserialize)]
struct UsageQuery {
    date: Option<String>,
    home_id: Option<String>,
    utility: Option<UtilityKind>,
}

async fn usage(
    State(state): State<ApiState>,
    Query(q): Query<UsageQuery>,
) -> Result<Json<UsageSnapshot>, ApiError> {
    Ok(Json(snapshot_for(&state, &q).await?))
}

async fn usage_dashboard(
    State(state): State<ApiState>,
    Query(q): Query<UsageQuery>,
) -> Result<Json<UsagePanel>, ApiError> {
    let snapshot = snapshot_for(&state, &q).await?;
    let kind = q.utility.unwrap_or(UtilityKind::Water);
    Ok(Json(UsagePanel::build(&snapshot, kind)))
}

async fn snapshot_for(state: &ApiState, q: &UsageQuery) -> Result<UsageSnapshot, ApiError> {
    let date = format_calendar_date(resolve_date(q.date.as_deref())?)?;
    // An empty `home_id=` means no household was picked.
    let home_id = q
        .home_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(state.households.default.as_str());

    let snapshot = dashboard::get_usage_and_classification(&state.repository, &date, home_id).await?;
    Ok(snapshot)
}

/// The picked date, or yesterday when none was given.
///
/// "Today" is the UTC calendar date, not the host's local date: the local
/// offset cannot be read reliably once the multi-threaded runtime is up.
fn resolve_date(input: Option<&str>) -> Result<Date, RepositoryError> {
    match input {
        Some(s) => parse_calendar_date(s),
        None => Ok(dashboard::default_date(OffsetDateTime::now_utc().date())),
    }
}

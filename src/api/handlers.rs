//! Request handlers for the planning endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DomainSolveRequest, DomainSolveResponse};
use crate::error::{PlannerError, PlanningError};
use crate::formatter::format_response;
use crate::mapper::map_domain_request;
use crate::planner;
use crate::problem::{PlannerDefaults, Problem, SolverResult};

/// Error body returned for a failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong.
    pub detail: String,
}

/// Map a [`PlanningError`] onto an HTTP status: 4xx for input-shape/parse
/// validation failures, 5xx for a genuine solver-backend failure (§7).
fn to_http_error(err: PlanningError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        PlanningError::Mapper(_) => StatusCode::BAD_REQUEST,
        PlanningError::Planner(PlannerError::InvalidProblem(_)) => StatusCode::BAD_REQUEST,
        PlanningError::Planner(PlannerError::Solver(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            detail: err.to_string(),
        }),
    )
}

/// Basic liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy")),
    tag = "health"
)]
pub async fn health() -> &'static str {
    "ok"
}

/// Endpoint A (`/solve-domain`): validates and translates the external
/// request (Mapper), solves it (Planner), and formats the result back to
/// domain shape (Formatter) — all three stages end to end.
#[utoipa::path(
    post,
    path = "/solve-domain",
    request_body = DomainSolveRequest,
    responses(
        (status = 200, description = "Plan computed", body = DomainSolveResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 500, description = "Solver backend failure", body = ErrorResponse),
    ),
    tag = "planning"
)]
pub async fn solve_domain(
    State(defaults): State<PlannerDefaults>,
    Json(request): Json<DomainSolveRequest>,
) -> Result<Json<DomainSolveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (problem, meta) = map_domain_request(&request)
        .map_err(PlanningError::from)
        .map_err(to_http_error)?;
    let result = planner::solve(&problem, &defaults)
        .map_err(PlanningError::from)
        .map_err(to_http_error)?;
    let response = format_response(
        request.current_timestamp_utc,
        &request.orders,
        &request.couriers,
        &problem,
        &result,
        &meta,
    );
    Ok(Json(response))
}

/// Endpoint B (`/solve`): accepts the internal problem verbatim and returns
/// the solver result verbatim, for tests and tuning.
#[utoipa::path(
    post,
    path = "/solve",
    request_body = Problem,
    responses(
        (status = 200, description = "Solver result", body = SolverResult),
        (status = 400, description = "Malformed problem", body = ErrorResponse),
        (status = 500, description = "Solver backend failure", body = ErrorResponse),
    ),
    tag = "planning"
)]
pub async fn solve(
    State(defaults): State<PlannerDefaults>,
    Json(problem): Json<Problem>,
) -> Result<Json<SolverResult>, (StatusCode, Json<ErrorResponse>)> {
    let result = planner::solve(&problem, &defaults)
        .map_err(PlanningError::from)
        .map_err(to_http_error)?;
    Ok(Json(result))
}

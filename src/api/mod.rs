//! HTTP surface: two planning endpoints plus a health check, wired with
//! `axum` + `utoipa`/`utoipa-swagger-ui` the way the pack's comparable JSON
//! daemon wires its own routes.

mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::{
    CourierPlan, CourierShift, DeliveryOrder, DeliveryStop, DomainSolveRequest,
    DomainSolveResponse, OptimizationWeights, OrderPlan, PlanMetrics, SolveMetadata,
    SolverSettings,
};
use crate::problem::{PlannerDefaults, Problem, SolverResult, SolverStatus};
use handlers::ErrorResponse;

/// OpenAPI schema for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::solve_domain, handlers::solve),
    components(schemas(
        DomainSolveRequest,
        DomainSolveResponse,
        DeliveryOrder,
        CourierShift,
        OptimizationWeights,
        SolverSettings,
        CourierPlan,
        OrderPlan,
        DeliveryStop,
        PlanMetrics,
        SolveMetadata,
        Problem,
        SolverResult,
        SolverStatus,
        ErrorResponse,
    )),
    tags(
        (name = "planning", description = "Order/courier assignment, routing and scheduling"),
        (name = "health", description = "Liveness probe"),
    ),
    info(
        title = "Last-mile delivery planner",
        description = "Assignment, routing and scheduling for single-depot pizzeria delivery",
    )
)]
struct ApiDoc;

/// Build the router exposing `/health`, `/solve-domain`, `/solve` and an
/// interactive Swagger UI at `/swagger-ui`, carrying `defaults` as shared
/// state for requests that omit their own solver tuning.
pub fn router(defaults: PlannerDefaults) -> Router {
    let openapi = ApiDoc::openapi();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/solve-domain", post(handlers::solve_domain))
        .route("/solve", post(handlers::solve))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(defaults)
}

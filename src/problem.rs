//! The internal problem and solver result types exchanged verbatim by the
//! internal (`/solve`) endpoint, and produced by the Mapper / consumed by the
//! Formatter for the domain (`/solve-domain`) endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default solver time limit, in seconds, when not overridden by the request.
pub const DEFAULT_TIME_LIMIT_SECONDS: f64 = 15.0;
/// Default solver worker/thread count when not overridden by the request.
pub const DEFAULT_WORKERS: u32 = 8;
/// Click-to-eat minutes above which an order is flagged with a certificate.
pub const CERTIFICATE_THRESHOLD_MINUTES: i64 = 60;

/// The internal assignment + routing + scheduling problem, in integer
/// minutes relative to a reference instant chosen by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    /// `(N+1)x(N+1)` travel-time matrix in minutes; index 0 is the depot.
    pub tau: Vec<Vec<i64>>,
    /// Number of couriers.
    #[serde(rename = "K")]
    pub k: usize,
    /// Capacity (boxes) of each courier, length `K`.
    #[serde(rename = "C")]
    pub c_capacity: Vec<i64>,
    /// Box count of each order, length `N`.
    #[serde(rename = "box")]
    pub boxes: Vec<i64>,
    /// Creation offset of each order, length `N`; may be negative.
    pub c: Vec<i64>,
    /// Readiness offset of each order, length `N`; may be negative.
    pub r: Vec<i64>,
    /// Availability offset of each courier, length `K`.
    pub a: Vec<i64>,
    /// Weight applied to the certificate count in the objective.
    #[serde(rename = "W_cert")]
    pub w_cert: i64,
    /// Weight applied to total click-to-eat minutes in the objective.
    #[serde(rename = "W_c2e")]
    pub w_c2e: i64,
    /// Weight applied to the skipped-order count in the objective.
    #[serde(rename = "W_skip")]
    pub w_skip: i64,
    /// Solver time limit override, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<f64>,
    /// Solver worker/thread count override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<u32>,
}

impl Problem {
    /// Number of orders (`N`).
    pub fn n(&self) -> usize {
        self.boxes.len()
    }

    /// Effective solver time limit in seconds, falling back to `defaults`
    /// when the problem itself carries no override.
    pub fn time_limit(&self, defaults: &PlannerDefaults) -> f64 {
        self.time_limit.unwrap_or(defaults.time_limit_seconds)
    }

    /// Effective solver worker count, falling back to `defaults` when the
    /// problem itself carries no override.
    pub fn workers(&self, defaults: &PlannerDefaults) -> u32 {
        self.workers.unwrap_or(defaults.workers)
    }
}

/// Service-wide fallbacks for solver tuning, used whenever a [`Problem`]
/// omits its own `time_limit`/`workers` override. Set from CLI flags at
/// startup (see `main.rs`) and threaded through the HTTP router as state.
#[derive(Debug, Clone, Copy)]
pub struct PlannerDefaults {
    /// Fallback solver time limit, in seconds.
    pub time_limit_seconds: f64,
    /// Fallback solver worker/thread count.
    pub workers: u32,
}

impl Default for PlannerDefaults {
    fn default() -> Self {
        Self {
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// The solver status, mirroring the CP-SAT status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SolverStatus {
    /// A provably optimal solution was found.
    #[serde(rename = "OPTIMAL")]
    Optimal,
    /// A feasible, not necessarily optimal, solution was found within the
    /// time limit.
    #[serde(rename = "FEASIBLE")]
    Feasible,
    /// The model has no feasible solution.
    #[serde(rename = "INFEASIBLE")]
    Infeasible,
    /// The model is malformed.
    #[serde(rename = "MODEL_INVALID")]
    ModelInvalid,
    /// The solver could not determine a status within the time limit.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl SolverStatus {
    /// Whether this status carries a usable solution.
    pub fn has_solution(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

/// Verbatim solver result, as returned by the internal (`/solve`) endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SolverResult {
    /// Status label.
    pub status: SolverStatus,
    /// Objective value, or `None` if no solution was found.
    pub objective: Option<i64>,
    /// Per-courier route as a node-index sequence, always starting/ending at
    /// depot (index 0). `[0, 0]` for an unused courier.
    pub routes: Vec<Vec<usize>>,
    /// Per-courier departure offset in minutes, or `None` if no solution.
    pub t_departure: Vec<Option<i64>>,
    /// Per-order delivery offset in minutes, keyed by 1-based order index.
    pub t_delivery: HashMap<usize, i64>,
    /// Per-order certificate flag, keyed by 1-based order index.
    pub cert: HashMap<usize, bool>,
    /// Per-order skip flag, keyed by 1-based order index.
    pub skip: HashMap<usize, bool>,
    /// Dense assignment table: row `i-1` (order), column `k` (courier).
    #[serde(rename = "assigned_to_courier")]
    pub assigned: Vec<Vec<bool>>,
}

impl SolverResult {
    /// Build the empty-result shape returned for non-solution statuses.
    pub fn empty(status: SolverStatus, k: usize) -> Self {
        Self {
            status,
            objective: None,
            routes: vec![vec![0, 0]; k],
            t_departure: vec![None; k],
            t_delivery: HashMap::new(),
            cert: HashMap::new(),
            skip: HashMap::new(),
            assigned: Vec::new(),
        }
    }
}

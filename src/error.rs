//! Crate-wide error types.

use good_lp::ResolutionError;
use thiserror::Error;

/// Error raised while validating and translating an external request into the
/// internal solver problem.
#[derive(Debug, Error)]
pub enum MapperError {
    /// The travel-time matrix is not square of size `N+1`.
    #[error("travel_time_matrix_minutes must have N+1 rows (depot + orders); got {got}, expected {expected}")]
    MatrixSizeMismatch {
        /// Number of rows actually present.
        got: usize,
        /// Expected number of rows (`N+1`).
        expected: usize,
    },
    /// A row of the travel-time matrix has the wrong length.
    #[error("travel_time_matrix_minutes row has length {got}, expected {expected}")]
    MatrixRowMismatch {
        /// Row length actually present.
        got: usize,
        /// Expected row length (`N+1`).
        expected: usize,
    },
    /// No orders were supplied.
    #[error("at least one order must be provided")]
    NoOrders,
    /// No couriers were supplied.
    #[error("at least one courier must be provided")]
    NoCouriers,
    /// A timestamp field could not be parsed as ISO-8601.
    #[error("could not parse timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The offending raw value.
        value: String,
        /// Why parsing failed.
        reason: String,
    },
    /// An order's `boxes_count` was not at least 1.
    #[error("order {order_id:?} has boxes_count {value}, must be >= 1")]
    InvalidBoxesCount {
        /// The offending order's external id.
        order_id: String,
        /// The offending value.
        value: i64,
    },
    /// A courier's `box_capacity` was not at least 1.
    #[error("courier {courier_id:?} has box_capacity {value}, must be >= 1")]
    InvalidBoxCapacity {
        /// The offending courier's external id.
        courier_id: String,
        /// The offending value.
        value: i64,
    },
    /// An objective weight was negative.
    #[error("{field} must be >= 0, got {value}")]
    NegativeWeight {
        /// The offending field's name.
        field: &'static str,
        /// The offending value.
        value: i64,
    },
    /// `solver_settings.time_limit_seconds` was not strictly positive.
    #[error("solver_settings.time_limit_seconds must be > 0, got {value}")]
    InvalidTimeLimit {
        /// The offending value.
        value: f64,
    },
    /// `solver_settings.max_parallel_workers` was not at least 1.
    #[error("solver_settings.max_parallel_workers must be >= 1, got {value}")]
    InvalidWorkerCount {
        /// The offending value.
        value: u32,
    },
}

/// Error raised while building or solving the planner's MILP model.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The underlying solver backend failed outright (not a normal
    /// infeasible/unknown status, but a resolution error).
    #[error("solver backend error: {0}")]
    Solver(#[from] ResolutionError),
    /// The internal problem failed an input-shape assertion.
    #[error("malformed internal problem: {0}")]
    InvalidProblem(String),
}

/// Top-level crate error, composed from the per-layer errors.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Failure while mapping the external request to the internal problem.
    #[error("request validation failed: {0}")]
    Mapper(#[from] MapperError),
    /// Failure while building or solving the MILP model.
    #[error("planning failed: {0}")]
    Planner(#[from] PlannerError),
}

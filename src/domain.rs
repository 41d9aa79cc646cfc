//! External (domain-facing) request and response types for the `/solve-domain`
//! endpoint: absolute ISO-8601 timestamps and external string ids, as opposed
//! to the internal integer-minute [`crate::problem::Problem`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::MapperError;

/// A single delivery order as received from the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryOrder {
    /// Caller-assigned order id.
    pub order_id: String,
    /// Number of boxes in the order. Must be at least 1.
    pub boxes_count: i64,
    /// UTC timestamp at which the order was created.
    pub created_at_utc: DateTime<Utc>,
    /// UTC timestamp at which the order is forecast to be ready.
    pub expected_ready_at_utc: DateTime<Utc>,
}

/// A single courier shift as received from the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourierShift {
    /// Caller-assigned courier id.
    pub courier_id: String,
    /// Maximum number of boxes the courier can carry per trip. Must be at
    /// least 1.
    pub box_capacity: i64,
    /// UTC timestamp at which the courier is expected back at the depot.
    pub expected_courier_return_at_utc: DateTime<Utc>,
}

/// Weights controlling the three objective terms.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OptimizationWeights {
    /// Penalty applied per order whose click-to-eat exceeds 60 minutes.
    pub certificate_penalty_weight: i64,
    /// Penalty applied per minute of click-to-eat.
    pub click_to_eat_penalty_weight: i64,
    /// Penalty applied per skipped order. Defaults to
    /// `certificate_penalty_weight` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_order_penalty_weight: Option<i64>,
}

/// Optional solver tuning knobs exposed to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SolverSettings {
    /// Solver time limit, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<f64>,
    /// Number of parallel solver workers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel_workers: Option<u32>,
}

/// Request body for the domain-oriented `/solve-domain` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DomainSolveRequest {
    /// The "current moment" that all minute offsets are computed relative to.
    pub current_timestamp_utc: DateTime<Utc>,
    /// `(N+1)x(N+1)` travel-time forecast in minutes.
    pub travel_time_matrix_minutes: Vec<Vec<i64>>,
    /// The orders to plan for.
    pub orders: Vec<DeliveryOrder>,
    /// The couriers available to serve them.
    pub couriers: Vec<CourierShift>,
    /// Objective weights.
    pub optimization_weights: OptimizationWeights,
    /// Optional solver tuning knobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver_settings: Option<SolverSettings>,
}

impl DomainSolveRequest {
    /// Validate matrix shape and non-emptiness; translation to the internal
    /// problem happens in [`crate::mapper`].
    pub fn validate_shape(&self) -> Result<(), MapperError> {
        if self.orders.is_empty() {
            return Err(MapperError::NoOrders);
        }
        if self.couriers.is_empty() {
            return Err(MapperError::NoCouriers);
        }
        let expected = self.orders.len() + 1;
        if self.travel_time_matrix_minutes.len() != expected {
            return Err(MapperError::MatrixSizeMismatch {
                got: self.travel_time_matrix_minutes.len(),
                expected,
            });
        }
        for row in &self.travel_time_matrix_minutes {
            if row.len() != expected {
                return Err(MapperError::MatrixRowMismatch {
                    got: row.len(),
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Validate the numeric ranges §3 requires of every field: box
    /// counts/capacities at least 1, weights non-negative, and solver
    /// settings (when present) within their documented bounds.
    pub fn validate_ranges(&self) -> Result<(), MapperError> {
        for order in &self.orders {
            if order.boxes_count < 1 {
                return Err(MapperError::InvalidBoxesCount {
                    order_id: order.order_id.clone(),
                    value: order.boxes_count,
                });
            }
        }
        for courier in &self.couriers {
            if courier.box_capacity < 1 {
                return Err(MapperError::InvalidBoxCapacity {
                    courier_id: courier.courier_id.clone(),
                    value: courier.box_capacity,
                });
            }
        }

        let weights = &self.optimization_weights;
        if weights.certificate_penalty_weight < 0 {
            return Err(MapperError::NegativeWeight {
                field: "optimization_weights.certificate_penalty_weight",
                value: weights.certificate_penalty_weight,
            });
        }
        if weights.click_to_eat_penalty_weight < 0 {
            return Err(MapperError::NegativeWeight {
                field: "optimization_weights.click_to_eat_penalty_weight",
                value: weights.click_to_eat_penalty_weight,
            });
        }
        if let Some(skip_weight) = weights.skip_order_penalty_weight {
            if skip_weight < 0 {
                return Err(MapperError::NegativeWeight {
                    field: "optimization_weights.skip_order_penalty_weight",
                    value: skip_weight,
                });
            }
        }

        if let Some(settings) = &self.solver_settings {
            if let Some(time_limit) = settings.time_limit_seconds {
                if !(time_limit > 0.0) {
                    return Err(MapperError::InvalidTimeLimit { value: time_limit });
                }
            }
            if let Some(workers) = settings.max_parallel_workers {
                if workers < 1 {
                    return Err(MapperError::InvalidWorkerCount { value: workers });
                }
            }
        }

        Ok(())
    }
}

/// One delivery stop on a courier's route.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryStop {
    /// 1-indexed position of this stop along the route.
    pub position: usize,
    /// The order delivered at this stop.
    pub order_id: String,
}

/// Plan for a single courier.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourierPlan {
    /// The courier's external id.
    pub courier_id: String,
    /// ISO-8601 planned departure time, or `None` if the courier is unused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_departure_utc: Option<String>,
    /// ISO-8601 planned return-to-depot time, or `None` if unused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_return_utc: Option<String>,
    /// Ordered sequence of stops.
    pub delivery_sequence: Vec<DeliveryStop>,
}

/// Plan for a single order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderPlan {
    /// The order's external id.
    pub order_id: String,
    /// External id of the assigned courier, or `None` if skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_courier_id: Option<String>,
    /// ISO-8601 planned delivery time, or `None` if skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_delivery_utc: Option<String>,
    /// Whether click-to-eat exceeds the 60-minute certificate threshold.
    pub is_cert: bool,
    /// Whether the order was deferred to a later planning round.
    pub is_skipped: bool,
}

/// Summary metrics accompanying a plan.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlanMetrics {
    /// Total number of orders in the request.
    pub total_orders: usize,
    /// Total number of couriers in the request.
    pub total_couriers: usize,
    /// Number of orders appearing in some courier's delivery sequence.
    pub assigned_orders: usize,
    /// Number of couriers whose route visits at least one order.
    pub assigned_couriers: usize,
    /// Objective value copied verbatim from the solver, or `None`.
    pub objective_value: Option<i64>,
}

/// Lookup tables handed back alongside a domain solve, so the caller can
/// relate solver indices to its own ids without re-deriving the mapping.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SolveMetadata {
    /// Ordered list of order ids, in request order.
    pub order_ids: Vec<String>,
    /// Ordered list of courier ids, in request order.
    pub courier_ids: Vec<String>,
    /// Map from order id to its 1-based solver index.
    pub order_index_by_id: std::collections::HashMap<String, usize>,
}

/// Response body for the domain-oriented `/solve-domain` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DomainSolveResponse {
    /// Status label, mirrors [`crate::problem::SolverStatus`].
    pub status: String,
    /// The reference timestamp echoed back, in ISO-8601.
    pub reference_timestamp_utc: String,
    /// Plan for each courier, in request order.
    pub couriers: Vec<CourierPlan>,
    /// Plan for each order, in request order.
    pub orders: Vec<OrderPlan>,
    /// Summary metrics.
    pub metrics: PlanMetrics,
    /// Id-lookup metadata from the Mapper.
    pub meta: SolveMetadata,
}

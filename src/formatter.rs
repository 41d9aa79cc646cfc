//! Response Formatter: converts a [`SolverResult`] plus [`SolveMetadata`]
//! back into ISO-8601-timestamped per-courier/per-order plans, relative to
//! the request's reference instant.

use chrono::{DateTime, Utc};

use crate::domain::{
    CourierPlan, CourierShift, DeliveryOrder, DeliveryStop, DomainSolveResponse, OrderPlan,
    PlanMetrics, SolveMetadata,
};
use crate::problem::{Problem, SolverResult, SolverStatus};
use crate::time::{add_minutes, format_utc};

/// Build the external [`DomainSolveResponse`] for one solved request.
///
/// `orders` and `couriers` must be in the same request order the [`Problem`]
/// and [`SolveMetadata`] were built from.
pub fn format_response(
    reference: DateTime<Utc>,
    orders: &[DeliveryOrder],
    couriers: &[CourierShift],
    problem: &Problem,
    result: &SolverResult,
    meta: &SolveMetadata,
) -> DomainSolveResponse {
    let couriers_plan: Vec<CourierPlan> = couriers
        .iter()
        .enumerate()
        .map(|(kk, courier)| format_courier_plan(reference, courier, kk, problem, result, meta))
        .collect();

    let orders_plan: Vec<OrderPlan> = orders
        .iter()
        .enumerate()
        .map(|(idx, order)| format_order_plan(reference, order, idx + 1, result, meta))
        .collect();

    // Derived from the delivery sequences themselves, not from `is_skipped`,
    // so the emitted invariant (assigned_orders == total delivery-sequence
    // length) holds for every status, including INFEASIBLE/MODEL_INVALID/
    // UNKNOWN, where no order is actually delivered regardless of its
    // `is_skipped` flag.
    let assigned_orders: usize = couriers_plan.iter().map(|c| c.delivery_sequence.len()).sum();
    let assigned_couriers = couriers_plan
        .iter()
        .filter(|c| !c.delivery_sequence.is_empty())
        .count();

    DomainSolveResponse {
        status: status_label(result.status).to_string(),
        reference_timestamp_utc: format_utc(reference),
        couriers: couriers_plan,
        orders: orders_plan,
        metrics: PlanMetrics {
            total_orders: orders.len(),
            total_couriers: couriers.len(),
            assigned_orders,
            assigned_couriers,
            objective_value: result.objective,
        },
        meta: meta.clone(),
    }
}

/// Render a [`SolverStatus`] the way the external contract spells it.
fn status_label(status: SolverStatus) -> &'static str {
    match status {
        SolverStatus::Optimal => "OPTIMAL",
        SolverStatus::Feasible => "FEASIBLE",
        SolverStatus::Infeasible => "INFEASIBLE",
        SolverStatus::ModelInvalid => "MODEL_INVALID",
        SolverStatus::Unknown => "UNKNOWN",
    }
}

/// Build one courier's plan: departure/return timestamps and its ordered
/// delivery sequence, derived by walking its route and accumulating `tau`.
fn format_courier_plan(
    reference: DateTime<Utc>,
    courier: &CourierShift,
    kk: usize,
    problem: &Problem,
    result: &SolverResult,
    meta: &SolveMetadata,
) -> CourierPlan {
    let route = &result.routes[kk];
    let order_stops: Vec<usize> = route.iter().copied().filter(|&node| node != 0).collect();

    if order_stops.is_empty() {
        return CourierPlan {
            courier_id: courier.courier_id.clone(),
            planned_departure_utc: None,
            planned_return_utc: None,
            delivery_sequence: Vec::new(),
        };
    }

    let departure = result.t_departure[kk];
    let planned_departure_utc = departure.map(|d| format_utc(add_minutes(reference, d)));

    let planned_return_utc = departure.map(|d| {
        let mut elapsed = d;
        let mut prev = 0usize;
        for &node in route.iter().skip(1) {
            elapsed += problem.tau[prev][node];
            prev = node;
        }
        format_utc(add_minutes(reference, elapsed))
    });

    let delivery_sequence = order_stops
        .iter()
        .enumerate()
        .map(|(pos, &node)| DeliveryStop {
            position: pos + 1,
            order_id: meta.order_ids[node - 1].clone(),
        })
        .collect();

    CourierPlan {
        courier_id: courier.courier_id.clone(),
        planned_departure_utc,
        planned_return_utc,
        delivery_sequence,
    }
}

/// Build one order's plan: assigned courier and planned delivery, or nulls
/// if the order was skipped.
fn format_order_plan(
    reference: DateTime<Utc>,
    order: &DeliveryOrder,
    index: usize,
    result: &SolverResult,
    meta: &SolveMetadata,
) -> OrderPlan {
    // A non-solution status (INFEASIBLE/MODEL_INVALID/UNKNOWN) carries empty
    // `skip`/`cert`/`assigned` maps (`SolverResult::empty`); nothing was
    // decided for any order, so it is neither skipped nor delivered.
    if !result.status.has_solution() {
        return OrderPlan {
            order_id: order.order_id.clone(),
            assigned_courier_id: None,
            planned_delivery_utc: None,
            is_cert: false,
            is_skipped: false,
        };
    }

    let is_skipped = result.skip.get(&index).copied().unwrap_or(false);
    let is_cert = result.cert.get(&index).copied().unwrap_or(false);

    let assigned_courier = if is_skipped {
        None
    } else {
        result
            .assigned
            .get(index - 1)
            .and_then(|row| row.iter().position(|&a| a))
    };

    let assigned_courier_id = assigned_courier.map(|kk| meta.courier_ids[kk].clone());
    let planned_delivery_utc = assigned_courier.and_then(|_| {
        result
            .t_delivery
            .get(&index)
            .map(|&d| format_utc(add_minutes(reference, d)))
    });

    OrderPlan {
        order_id: order.order_id.clone(),
        assigned_courier_id,
        planned_delivery_utc,
        is_cert,
        is_skipped,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::OptimizationWeights;
    use crate::problem::SolverResult;

    fn reference() -> DateTime<Utc> {
        crate::time::parse_utc("2024-01-01T12:00:00Z").unwrap()
    }

    fn sample_problem() -> Problem {
        Problem {
            tau: vec![vec![0, 10], vec![10, 0]],
            k: 1,
            c_capacity: vec![10],
            boxes: vec![1],
            c: vec![0],
            r: vec![0],
            a: vec![0],
            w_cert: 100,
            w_c2e: 1,
            w_skip: 1000,
            time_limit: None,
            workers: None,
        }
    }

    fn sample_meta() -> SolveMetadata {
        SolveMetadata {
            order_ids: vec!["order-1".into()],
            courier_ids: vec!["courier-1".into()],
            order_index_by_id: HashMap::from([("order-1".to_string(), 1)]),
        }
    }

    fn sample_orders() -> Vec<DeliveryOrder> {
        vec![DeliveryOrder {
            order_id: "order-1".into(),
            boxes_count: 1,
            created_at_utc: reference(),
            expected_ready_at_utc: reference(),
        }]
    }

    fn sample_couriers() -> Vec<CourierShift> {
        vec![CourierShift {
            courier_id: "courier-1".into(),
            box_capacity: 10,
            expected_courier_return_at_utc: reference(),
        }]
    }

    #[test]
    fn delivered_order_gets_timestamps_and_courier() {
        let result = SolverResult {
            status: SolverStatus::Optimal,
            objective: Some(10),
            routes: vec![vec![0, 1, 0]],
            t_departure: vec![Some(0)],
            t_delivery: HashMap::from([(1, 10)]),
            cert: HashMap::from([(1, false)]),
            skip: HashMap::from([(1, false)]),
            assigned: vec![vec![true]],
        };

        let response = format_response(
            reference(),
            &sample_orders(),
            &sample_couriers(),
            &sample_problem(),
            &result,
            &sample_meta(),
        );

        assert_eq!(response.status, "OPTIMAL");
        assert_eq!(response.metrics.assigned_orders, 1);
        assert_eq!(response.metrics.assigned_couriers, 1);
        let order_plan = &response.orders[0];
        assert_eq!(order_plan.assigned_courier_id.as_deref(), Some("courier-1"));
        assert_eq!(
            order_plan.planned_delivery_utc.as_deref(),
            Some("2024-01-01T12:10:00Z")
        );
        let courier_plan = &response.couriers[0];
        assert_eq!(
            courier_plan.planned_departure_utc.as_deref(),
            Some("2024-01-01T12:00:00Z")
        );
        assert_eq!(
            courier_plan.planned_return_utc.as_deref(),
            Some("2024-01-01T12:20:00Z")
        );
        assert_eq!(courier_plan.delivery_sequence.len(), 1);
        assert_eq!(courier_plan.delivery_sequence[0].order_id, "order-1");
    }

    #[test]
    fn skipped_order_has_no_courier_or_timestamp() {
        let result = SolverResult {
            status: SolverStatus::Optimal,
            objective: Some(1000),
            routes: vec![vec![0, 0]],
            t_departure: vec![None],
            t_delivery: HashMap::from([(1, 0)]),
            cert: HashMap::from([(1, false)]),
            skip: HashMap::from([(1, true)]),
            assigned: vec![vec![false]],
        };

        let response = format_response(
            reference(),
            &sample_orders(),
            &sample_couriers(),
            &sample_problem(),
            &result,
            &sample_meta(),
        );

        let order_plan = &response.orders[0];
        assert!(order_plan.is_skipped);
        assert!(order_plan.assigned_courier_id.is_none());
        assert!(order_plan.planned_delivery_utc.is_none());
        assert_eq!(response.metrics.assigned_orders, 0);
        assert_eq!(response.metrics.assigned_couriers, 0);
        assert!(response.couriers[0].delivery_sequence.is_empty());
    }

    #[test]
    fn infeasible_status_reports_no_order_as_skipped_or_assigned() {
        // SolverResult::empty() leaves every per-order map empty; the
        // formatter must not read that as "nothing was skipped" in a way
        // that inflates assigned_orders past the (empty) delivery sequences.
        let result = SolverResult::empty(SolverStatus::Infeasible, 1);

        let response = format_response(
            reference(),
            &sample_orders(),
            &sample_couriers(),
            &sample_problem(),
            &result,
            &sample_meta(),
        );

        let order_plan = &response.orders[0];
        assert!(!order_plan.is_skipped);
        assert!(!order_plan.is_cert);
        assert!(order_plan.assigned_courier_id.is_none());
        assert!(order_plan.planned_delivery_utc.is_none());
        assert_eq!(response.metrics.assigned_orders, 0);
        assert_eq!(response.metrics.assigned_couriers, 0);
        assert!(response.couriers[0].delivery_sequence.is_empty());
    }

    #[test]
    fn skip_weight_default_is_the_mappers_job_not_the_formatters() {
        // The formatter never looks at weights; this just documents the
        // boundary so a future change doesn't thread defaulting logic here.
        let weights = OptimizationWeights {
            certificate_penalty_weight: 5,
            click_to_eat_penalty_weight: 1,
            skip_order_penalty_weight: None,
        };
        assert!(weights.skip_order_penalty_weight.is_none());
    }
}

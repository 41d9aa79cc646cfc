//! Domain Mapper: validates an external [`DomainSolveRequest`] and translates
//! it into the internal [`Problem`] plus an id-lookup [`SolveMetadata`] block.
//!
//! External string ids must never leak into the constraint model; this is
//! the only module that sees both namespaces.

use std::collections::HashMap;

use crate::domain::{DomainSolveRequest, SolveMetadata};
use crate::error::MapperError;
use crate::problem::Problem;
use crate::time::minutes_between;

/// Translates a [`DomainSolveRequest`] into the internal [`Problem`] and its
/// accompanying [`SolveMetadata`].
pub struct DomainToSolverMapper<'a> {
    request: &'a DomainSolveRequest,
}

impl<'a> DomainToSolverMapper<'a> {
    /// Validate `request`'s shape and numeric ranges, and wrap it for
    /// translation.
    pub fn new(request: &'a DomainSolveRequest) -> Result<Self, MapperError> {
        request.validate_shape()?;
        request.validate_ranges()?;
        Ok(Self { request })
    }

    /// Build the internal problem: matrix, capacities, and minute offsets
    /// for every order and courier, relative to `current_timestamp_utc`.
    pub fn build_problem(&self) -> Problem {
        let reference = self.request.current_timestamp_utc;
        let weights = &self.request.optimization_weights;
        let skip_weight = weights
            .skip_order_penalty_weight
            .unwrap_or(weights.certificate_penalty_weight);

        let settings = self.request.solver_settings.as_ref();

        Problem {
            tau: self.request.travel_time_matrix_minutes.clone(),
            k: self.request.couriers.len(),
            c_capacity: self
                .request
                .couriers
                .iter()
                .map(|c| c.box_capacity)
                .collect(),
            boxes: self.request.orders.iter().map(|o| o.boxes_count).collect(),
            c: self
                .request
                .orders
                .iter()
                .map(|o| minutes_between(reference, o.created_at_utc))
                .collect(),
            r: self
                .request
                .orders
                .iter()
                .map(|o| minutes_between(reference, o.expected_ready_at_utc))
                .collect(),
            a: self
                .request
                .couriers
                .iter()
                .map(|c| minutes_between(reference, c.expected_courier_return_at_utc))
                .collect(),
            w_cert: weights.certificate_penalty_weight,
            w_c2e: weights.click_to_eat_penalty_weight,
            w_skip: skip_weight,
            time_limit: settings.and_then(|s| s.time_limit_seconds),
            workers: settings.and_then(|s| s.max_parallel_workers),
        }
    }

    /// Build the id-lookup metadata the Formatter needs to re-label the
    /// solver's output.
    pub fn build_metadata(&self) -> SolveMetadata {
        let order_ids: Vec<String> = self
            .request
            .orders
            .iter()
            .map(|o| o.order_id.clone())
            .collect();
        let courier_ids: Vec<String> = self
            .request
            .couriers
            .iter()
            .map(|c| c.courier_id.clone())
            .collect();
        let order_index_by_id: HashMap<String, usize> = order_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx + 1))
            .collect();

        SolveMetadata {
            order_ids,
            courier_ids,
            order_index_by_id,
        }
    }
}

/// Convenience function combining validation, problem construction, and
/// metadata construction in one call.
pub fn map_domain_request(
    request: &DomainSolveRequest,
) -> Result<(Problem, SolveMetadata), MapperError> {
    let mapper = DomainToSolverMapper::new(request)?;
    Ok((mapper.build_problem(), mapper.build_metadata()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CourierShift, DeliveryOrder, OptimizationWeights, SolverSettings};
    use crate::time::parse_utc;

    fn sample_request() -> DomainSolveRequest {
        let reference = parse_utc("2024-01-01T12:00:00Z").unwrap();
        DomainSolveRequest {
            current_timestamp_utc: reference,
            travel_time_matrix_minutes: vec![vec![0, 10], vec![10, 0]],
            orders: vec![DeliveryOrder {
                order_id: "order-1".into(),
                boxes_count: 1,
                created_at_utc: reference,
                expected_ready_at_utc: reference,
            }],
            couriers: vec![CourierShift {
                courier_id: "courier-1".into(),
                box_capacity: 10,
                expected_courier_return_at_utc: reference,
            }],
            optimization_weights: OptimizationWeights {
                certificate_penalty_weight: 100,
                click_to_eat_penalty_weight: 1,
                skip_order_penalty_weight: None,
            },
            solver_settings: None,
        }
    }

    #[test]
    fn defaults_skip_weight_to_certificate_weight() {
        let req = sample_request();
        let mapper = DomainToSolverMapper::new(&req).unwrap();
        let problem = mapper.build_problem();
        assert_eq!(problem.w_skip, problem.w_cert);
    }

    #[test]
    fn metadata_indexes_orders_from_one() {
        let req = sample_request();
        let mapper = DomainToSolverMapper::new(&req).unwrap();
        let meta = mapper.build_metadata();
        assert_eq!(meta.order_index_by_id["order-1"], 1);
        assert_eq!(meta.order_ids, vec!["order-1".to_string()]);
    }

    #[test]
    fn rejects_empty_orders() {
        let mut req = sample_request();
        req.orders.clear();
        req.travel_time_matrix_minutes = vec![vec![0]];
        assert!(matches!(
            DomainToSolverMapper::new(&req),
            Err(MapperError::NoOrders)
        ));
    }

    #[test]
    fn rejects_mismatched_matrix_size() {
        let mut req = sample_request();
        req.travel_time_matrix_minutes = vec![vec![0, 10, 5], vec![10, 0, 5], vec![5, 5, 0]];
        assert!(matches!(
            DomainToSolverMapper::new(&req),
            Err(MapperError::MatrixSizeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_zero_boxes_count() {
        let mut req = sample_request();
        req.orders[0].boxes_count = 0;
        assert!(matches!(
            DomainToSolverMapper::new(&req),
            Err(MapperError::InvalidBoxesCount { .. })
        ));
    }

    #[test]
    fn rejects_zero_box_capacity() {
        let mut req = sample_request();
        req.couriers[0].box_capacity = 0;
        assert!(matches!(
            DomainToSolverMapper::new(&req),
            Err(MapperError::InvalidBoxCapacity { .. })
        ));
    }

    #[test]
    fn rejects_negative_weight() {
        let mut req = sample_request();
        req.optimization_weights.click_to_eat_penalty_weight = -1;
        assert!(matches!(
            DomainToSolverMapper::new(&req),
            Err(MapperError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_time_limit() {
        let mut req = sample_request();
        req.solver_settings = Some(SolverSettings {
            time_limit_seconds: Some(0.0),
            max_parallel_workers: None,
        });
        assert!(matches!(
            DomainToSolverMapper::new(&req),
            Err(MapperError::InvalidTimeLimit { .. })
        ));
    }

    #[test]
    fn rejects_zero_worker_count() {
        let mut req = sample_request();
        req.solver_settings = Some(SolverSettings {
            time_limit_seconds: None,
            max_parallel_workers: Some(0),
        });
        assert!(matches!(
            DomainToSolverMapper::new(&req),
            Err(MapperError::InvalidWorkerCount { .. })
        ));
    }
}

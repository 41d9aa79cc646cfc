//! End-to-end integration tests for the six literal scenarios of the
//! planner's testable properties: build a [`Problem`] directly, solve it
//! through the public planner API, and check the solution against the
//! exact expected values.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use test_log::test;

use lastmile_planner::planner::solve;
use lastmile_planner::problem::{PlannerDefaults, Problem, SolverStatus};

#[allow(clippy::too_many_arguments)]
fn problem(
    tau: Vec<Vec<i64>>,
    k: usize,
    c_capacity: Vec<i64>,
    boxes: Vec<i64>,
    c: Vec<i64>,
    r: Vec<i64>,
    a: Vec<i64>,
    weights: (i64, i64, i64),
) -> Problem {
    Problem {
        tau,
        k,
        c_capacity,
        boxes,
        c,
        r,
        a,
        w_cert: weights.0,
        w_c2e: weights.1,
        w_skip: weights.2,
        time_limit: None,
        workers: None,
    }
}

fn defaults() -> PlannerDefaults {
    PlannerDefaults::default()
}

#[test]
fn basic_sanity() {
    let p = problem(
        vec![vec![0, 10], vec![10, 0]],
        1,
        vec![10],
        vec![1],
        vec![0],
        vec![0],
        vec![0],
        (100, 1, 1000),
    );

    let result = solve(&p, &defaults()).unwrap();

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(result.routes, vec![vec![0, 1, 0]]);
    assert_eq!(result.t_delivery, HashMap::from([(1, 10)]));
    assert_eq!(result.cert, HashMap::from([(1, false)]));
    assert_eq!(result.skip, HashMap::from([(1, false)]));
    assert_eq!(result.objective, Some(10));
}

#[test]
fn order_choice() {
    let p = problem(
        vec![
            vec![0, 10, 20],
            vec![10, 0, 5],
            vec![20, 5, 0],
        ],
        1,
        vec![10],
        vec![1, 1],
        vec![0, 0],
        vec![0, 0],
        vec![0],
        (100, 1, 1000),
    );

    let result = solve(&p, &defaults()).unwrap();

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(result.routes, vec![vec![0, 1, 2, 0]]);
    assert_eq!(result.t_delivery, HashMap::from([(1, 10), (2, 15)]));
    assert_eq!(result.objective, Some(25));
}

#[test]
fn reorder_to_avoid_certificate() {
    let p = problem(
        vec![
            vec![0, 50, 20],
            vec![50, 0, 20],
            vec![20, 50, 0],
        ],
        1,
        vec![10],
        vec![1, 1],
        vec![30, 0],
        vec![0, 0],
        vec![0],
        (100, 1, 1000),
    );

    let result = solve(&p, &defaults()).unwrap();

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(result.routes, vec![vec![0, 2, 1, 0]]);
    assert_eq!(result.t_delivery, HashMap::from([(2, 20), (1, 70)]));
    assert_eq!(result.cert, HashMap::from([(1, false), (2, false)]));
    assert_eq!(result.objective, Some(60));
}

#[test]
fn capacity_forces_skip() {
    let p = problem(
        vec![
            vec![0, 5, 5],
            vec![5, 0, 5],
            vec![5, 5, 0],
        ],
        1,
        vec![1],
        vec![1, 1],
        vec![0, 0],
        vec![0, 0],
        vec![0],
        (100, 1, 10),
    );

    let result = solve(&p, &defaults()).unwrap();

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(result.objective, Some(15));

    // Which of the two symmetric orders gets skipped is not determined by
    // the spec; only that exactly one is, and the kept one's route is a
    // direct depot round trip.
    let skipped: Vec<usize> = (1..=2).filter(|i| result.skip[i]).collect();
    assert_eq!(skipped.len(), 1);
    let kept = if skipped[0] == 1 { 2 } else { 1 };

    assert_eq!(result.routes.len(), 1);
    assert_eq!(result.routes[0], vec![0, kept, 0]);
}

#[test]
fn skip_beats_certificate() {
    let p = problem(
        vec![
            vec![0, 70, 5],
            vec![70, 0, 70],
            vec![5, 70, 0],
        ],
        1,
        vec![10],
        vec![1, 1],
        vec![0, 0],
        vec![0, 0],
        vec![0],
        (1000, 1, 100),
    );

    let result = solve(&p, &defaults()).unwrap();

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(result.routes, vec![vec![0, 2, 0]]);
    assert_eq!(result.skip, HashMap::from([(1, true), (2, false)]));
    assert_eq!(result.objective, Some(105));
}

#[test]
fn capacity_zero_degenerate() {
    let p = problem(
        vec![
            vec![0, 5, 5],
            vec![5, 0, 5],
            vec![5, 5, 0],
        ],
        1,
        vec![0],
        vec![1, 1],
        vec![0, 0],
        vec![0, 0],
        vec![0],
        (100, 1, 1),
    );

    let result = solve(&p, &defaults()).unwrap();

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(result.routes, vec![vec![0, 0]]);
    assert_eq!(result.skip, HashMap::from([(1, true), (2, true)]));
    assert_eq!(result.objective, Some(2));
}

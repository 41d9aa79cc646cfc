//! Decision variables, constraints (C1-C7), and objective for the
//! assignment + routing + scheduling MILP.

use std::collections::HashMap;

use good_lp::solvers::coin_cbc::CoinCbcProblem;
use good_lp::{constraint, variable, Expression, ProblemVariables, SolverModel, Variable};
use log::debug;

use crate::problem::Problem;

use super::or_tools::c_any;

/// All decision variables of the model, keyed the way §4.2.1 describes them.
#[derive(Debug)]
pub struct PlannerVars {
    /// `assigned[i,k]`: order `i` (1-based) assigned to courier `k` (0-based).
    pub assigned: HashMap<(usize, usize), Variable>,
    /// `y[i,j,k]`: on courier `k`'s route, `j` is visited immediately after
    /// `i`. Keys range over `i != j` in `0..=N`.
    pub y: HashMap<(usize, usize, usize), Variable>,
    /// `t_departure[k]`: departure minute offset of courier `k`.
    pub t_departure: Vec<Variable>,
    /// `t_delivery[i]`: delivery minute offset for order `i`.
    pub t_delivery: HashMap<usize, Variable>,
    /// `cert[i]`: click-to-eat of order `i` exceeds 60 minutes.
    pub cert: HashMap<usize, Variable>,
    /// `skip[i]`: order `i` deferred to a later planning round.
    pub skip: HashMap<usize, Variable>,
    /// `used[k]`: courier `k` serves at least one order.
    pub used: Vec<Variable>,
}

/// Compute the big-M horizon per §4.2.2.
pub fn big_m(problem: &Problem) -> f64 {
    let n = problem.n();
    if n == 0 {
        let horizon_start = problem.a.iter().copied().max().unwrap_or(0).max(0);
        return (horizon_start + 60) as f64;
    }
    let max_tau = problem
        .tau
        .iter()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0);
    let horizon_start = problem
        .a
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
        .max(problem.r.iter().copied().max().unwrap_or(0));
    (horizon_start + (n as i64 + 1) * max_tau + 60) as f64
}

/// Allocate all decision variables for `problem`, given the precomputed
/// big-M bound.
pub fn setup_vars(p: &mut ProblemVariables, problem: &Problem, m: f64) -> PlannerVars {
    let n = problem.n();
    let k = problem.k;
    let orders = 1..=n;
    let nodes = 0..=n;

    let assigned: HashMap<(usize, usize), Variable> = orders
        .clone()
        .flat_map(|i| (0..k).map(move |kk| (i, kk)))
        .map(|(i, kk)| ((i, kk), p.add(variable().binary())))
        .collect();

    let y: HashMap<(usize, usize, usize), Variable> = (0..k)
        .flat_map(|kk| {
            nodes
                .clone()
                .flat_map(move |i| nodes.clone().map(move |j| (i, j, kk)))
        })
        .filter(|(i, j, _)| i != j)
        .map(|key| (key, p.add(variable().binary())))
        .collect();

    let t_departure: Vec<Variable> = (0..k)
        .map(|_| p.add(variable().integer().min(0).max(m)))
        .collect();

    let t_delivery: HashMap<usize, Variable> = orders
        .clone()
        .map(|i| (i, p.add(variable().integer().min(0).max(m))))
        .collect();

    let cert: HashMap<usize, Variable> = orders
        .clone()
        .map(|i| (i, p.add(variable().binary())))
        .collect();

    let skip: HashMap<usize, Variable> = orders.map(|i| (i, p.add(variable().binary()))).collect();

    let used: Vec<Variable> = (0..k).map(|_| p.add(variable().binary())).collect();

    PlannerVars {
        assigned,
        y,
        t_departure,
        t_delivery,
        cert,
        skip,
        used,
    }
}

/// Add constraints (C1)-(C7) to `problem`, logging the row-count delta
/// contributed by each constraint group at `debug` level.
pub fn setup_constraints(solver: &mut CoinCbcProblem, vars: &PlannerVars, problem: &Problem, m: f64) {
    let n = problem.n();
    let k = problem.k;
    let orders: Vec<usize> = (1..=n).collect();

    let mut rows = solver.as_inner().num_rows();
    debug!("{rows} equations before start");

    // (C1) coverage
    for &i in &orders {
        let sum: Expression = (0..k).map(|kk| vars.assigned[&(i, kk)]).sum();
        solver.add_constraint(constraint!(sum + vars.skip[&i] == 1));
    }
    let new_rows = solver.as_inner().num_rows();
    debug!("{} equations for `coverage` (C1)", new_rows - rows);
    rows = new_rows;

    // (C2) capacity
    for kk in 0..k {
        let load: Expression = orders
            .iter()
            .map(|&i| problem.boxes[i - 1] * vars.assigned[&(i, kk)])
            .sum();
        solver.add_constraint(constraint!(load <= problem.c_capacity[kk]));
    }
    let new_rows = solver.as_inner().num_rows();
    debug!("{} equations for `capacity` (C2)", new_rows - rows);
    rows = new_rows;

    // (C3) courier usage linkage, via disjunction over assigned[.,k]
    for kk in 0..k {
        let assigned_k: Vec<Variable> = orders.iter().map(|&i| vars.assigned[&(i, kk)]).collect();
        c_any(solver, vars.used[kk], assigned_k);
    }
    let new_rows = solver.as_inner().num_rows();
    debug!("{} equations for `courier_usage_linkage` (C3)", new_rows - rows);
    rows = new_rows;

    // (C4) readiness and availability
    for kk in 0..k {
        solver.add_constraint(constraint!(vars.t_departure[kk] >= problem.a[kk]));
        for &i in &orders {
            let r = problem.r[i - 1] as f64;
            solver.add_constraint(constraint!(
                vars.t_departure[kk] >= r - m * (1 - vars.assigned[&(i, kk)])
            ));
        }
    }
    let new_rows = solver.as_inner().num_rows();
    debug!(
        "{} equations for `readiness_and_availability` (C4)",
        new_rows - rows
    );
    rows = new_rows;

    // (C5) degree constraints on the route graph
    for kk in 0..k {
        for &i in &orders {
            let out_deg: Expression = (0..=n)
                .filter(|&j| j != i)
                .map(|j| vars.y[&(i, j, kk)])
                .sum();
            solver.add_constraint(constraint!(out_deg == vars.assigned[&(i, kk)]));

            let in_deg: Expression = (0..=n)
                .filter(|&j| j != i)
                .map(|j| vars.y[&(j, i, kk)])
                .sum();
            solver.add_constraint(constraint!(in_deg == vars.assigned[&(i, kk)]));
        }

        let depot_out: Expression = orders.iter().map(|&j| vars.y[&(0, j, kk)]).sum();
        solver.add_constraint(constraint!(depot_out == vars.used[kk]));

        let depot_in: Expression = orders.iter().map(|&i| vars.y[&(i, 0, kk)]).sum();
        solver.add_constraint(constraint!(depot_in == vars.used[kk]));
    }
    let new_rows = solver.as_inner().num_rows();
    debug!("{} equations for `route_graph_degree` (C5)", new_rows - rows);
    rows = new_rows;

    // (C6) time propagation along arcs
    for kk in 0..k {
        for &i in &orders {
            let tau_0i = problem.tau[0][i] as f64;
            solver.add_constraint(constraint!(
                vars.t_delivery[&i]
                    >= vars.t_departure[kk] + tau_0i - m * (1 - vars.y[&(0, i, kk)])
            ));
        }
        for &i in &orders {
            for &j in &orders {
                if i == j {
                    continue;
                }
                let tau_ij = problem.tau[i][j] as f64;
                solver.add_constraint(constraint!(
                    vars.t_delivery[&j]
                        >= vars.t_delivery[&i] + tau_ij - m * (1 - vars.y[&(i, j, kk)])
                ));
            }
        }
    }
    let new_rows = solver.as_inner().num_rows();
    debug!("{} equations for `time_propagation` (C6)", new_rows - rows);
    rows = new_rows;

    // (C7) certificate linearization
    for &i in &orders {
        let c_i = problem.c[i - 1] as f64;
        solver.add_constraint(constraint!(
            vars.t_delivery[&i] - c_i <= 60 + m * vars.cert[&i]
        ));
        solver.add_constraint(constraint!(vars.t_delivery[&i] >= c_i));
    }
    let new_rows = solver.as_inner().num_rows();
    debug!(
        "{} equations for `certificate_linearization` (C7)",
        new_rows - rows
    );
    rows = new_rows;

    debug!("{rows} total equations");
}

/// Build the three-term weighted objective of §4.2.4.
pub fn objective(vars: &PlannerVars, problem: &Problem) -> Expression {
    let cert_sum: Expression = vars.cert.values().copied().sum();
    let skip_sum: Expression = vars.skip.values().copied().sum();
    let c2e_sum: Expression = (1..=problem.n())
        .map(|i| vars.t_delivery[&i] - problem.c[i - 1] as f64)
        .sum();

    problem.w_cert as f64 * cert_sum + problem.w_c2e as f64 * c2e_sum + problem.w_skip as f64 * skip_sum
}

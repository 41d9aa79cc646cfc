//! MILP Planner: builds the assignment + routing + scheduling model for one
//! [`Problem`], solves it under its time budget, and extracts a structured
//! [`SolverResult`].
//!
//! This mirrors the shape of the teacher's own
//! `decomposition::ilp_scheduler::schedule_with_max_steps` pipeline: variable
//! setup, constraint setup, solve, then a dedicated extraction pass, all
//! built fresh per call with no state surviving across requests.

use std::collections::HashMap;

use good_lp::{
    solvers::coin_cbc::coin_cbc as create_solver, ProblemVariables, ResolutionError, Solution,
    SolverModel,
};
use itertools::Itertools;
use log::{debug, info};

mod model;
mod or_tools;
mod route;

use crate::error::PlannerError;
use crate::problem::{PlannerDefaults, Problem, SolverResult, SolverStatus};
pub use model::{big_m, PlannerVars};

/// Validate the internal problem's shape invariants (§3) before building a
/// model out of it.
fn validate_problem(problem: &Problem) -> Result<(), PlannerError> {
    let n = problem.n();
    let expected = n + 1;

    if problem.tau.len() != expected {
        return Err(PlannerError::InvalidProblem(format!(
            "tau must have {expected} rows (depot + {n} orders), got {}",
            problem.tau.len()
        )));
    }
    for (idx, row) in problem.tau.iter().enumerate() {
        if row.len() != expected {
            return Err(PlannerError::InvalidProblem(format!(
                "tau row {idx} must have length {expected}, got {}",
                row.len()
            )));
        }
        if row.iter().any(|&t| t < 0) {
            return Err(PlannerError::InvalidProblem(format!(
                "tau row {idx} contains a negative travel time"
            )));
        }
    }
    if problem.c_capacity.len() != problem.k {
        return Err(PlannerError::InvalidProblem(format!(
            "C must have length K={}, got {}",
            problem.k,
            problem.c_capacity.len()
        )));
    }
    if problem.a.len() != problem.k {
        return Err(PlannerError::InvalidProblem(format!(
            "a must have length K={}, got {}",
            problem.k,
            problem.a.len()
        )));
    }
    if problem.r.len() != n {
        return Err(PlannerError::InvalidProblem(format!(
            "r must have length N={n}, got {}",
            problem.r.len()
        )));
    }
    if problem.c.len() != n {
        return Err(PlannerError::InvalidProblem(format!(
            "c must have length N={n}, got {}",
            problem.c.len()
        )));
    }
    if problem.w_cert < 0 || problem.w_c2e < 0 || problem.w_skip < 0 {
        return Err(PlannerError::InvalidProblem(
            "W_cert, W_c2e and W_skip must all be non-negative".into(),
        ));
    }
    Ok(())
}

/// Build the MILP model for `problem`, solve it under its time budget, and
/// extract a structured [`SolverResult`].
///
/// `defaults` supplies the time limit and worker count the problem falls
/// back to when it carries no override of its own (§7).
pub fn solve(problem: &Problem, defaults: &PlannerDefaults) -> Result<SolverResult, PlannerError> {
    validate_problem(problem)?;

    let k = problem.k;
    let m = model::big_m(problem);
    debug!(
        "planning {} orders across {k} couriers (big-M = {m})",
        problem.n()
    );

    let mut vars_builder = ProblemVariables::new();
    let vars = model::setup_vars(&mut vars_builder, problem, m);
    let objective = model::objective(&vars, problem);

    let mut solver = create_solver(vars_builder.minimise(objective));

    // CBC's own console chatter has no caller in a stateless HTTP service.
    solver.set_parameter("logLevel", "0");
    solver.set_parameter("seconds", &problem.time_limit(defaults).to_string());
    #[cfg(feature = "cbc-parallel")]
    {
        let threads = problem.workers(defaults).min(num_cpus::get() as u32);
        solver.set_parameter("threads", &threads.to_string());
    }

    model::setup_constraints(&mut solver, &vars, problem, m);

    // good_lp's `ResolutionError` doubles as both "no solution found" (the
    // normal INFEASIBLE/UNKNOWN statuses of §3) and "the backend itself
    // broke"; only the former are modeled explicitly, so anything else is
    // treated as a genuine backend failure and surfaced as an error (§7).
    let solution = match solver.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            info!("model is infeasible");
            return Ok(SolverResult::empty(SolverStatus::Infeasible, k));
        }
        Err(ResolutionError::Unbounded) => {
            info!("model is unbounded (malformed big-M sizing)");
            return Ok(SolverResult::empty(SolverStatus::ModelInvalid, k));
        }
        Err(e @ (ResolutionError::Other(_) | ResolutionError::Str(_))) => {
            info!("solver returned no incumbent: {e}");
            return Ok(SolverResult::empty(SolverStatus::Unknown, k));
        }
        #[allow(unreachable_patterns)]
        Err(e) => {
            info!("solver backend failed: {e}");
            return Err(PlannerError::Solver(e));
        }
    };

    let status = if solution.raw().is_proven_optimal() {
        SolverStatus::Optimal
    } else {
        SolverStatus::Feasible
    };
    info!("solve finished with status {status:?}");

    Ok(extract(&vars, &solution, problem, status))
}

/// Read the solved variable values back into a [`SolverResult`].
fn extract(
    vars: &PlannerVars,
    solution: &impl Solution,
    problem: &Problem,
    status: SolverStatus,
) -> SolverResult {
    let n = problem.n();
    let k = problem.k;
    let is_one = |v: good_lp::Variable| solution.value(v).round() as i64 == 1;

    let mut assigned = vec![vec![false; k]; n];
    for i in 1..=n {
        for kk in 0..k {
            assigned[i - 1][kk] = is_one(vars.assigned[&(i, kk)]);
        }
    }

    let t_departure: Vec<Option<i64>> = vars
        .t_departure
        .iter()
        .map(|&v| Some(solution.value(v).round() as i64))
        .collect();

    let t_delivery: HashMap<usize, i64> = (1..=n)
        .map(|i| (i, solution.value(vars.t_delivery[&i]).round() as i64))
        .collect();
    let cert: HashMap<usize, bool> = (1..=n).map(|i| (i, is_one(vars.cert[&i]))).collect();
    let skip: HashMap<usize, bool> = (1..=n).map(|i| (i, is_one(vars.skip[&i]))).collect();

    let routes: Vec<Vec<usize>> = (0..k)
        .map(|kk| route::reconstruct(vars, solution, kk, n))
        .collect();
    for (kk, r) in routes.iter().enumerate() {
        debug!("courier {kk} route: [{}]", r.iter().join(", "));
    }

    let objective = Some(
        (problem.w_cert as f64 * cert.values().filter(|&&c| c).count() as f64
            + problem.w_c2e as f64
                * (1..=n)
                    .map(|i| (t_delivery[&i] - problem.c[i - 1]) as f64)
                    .sum::<f64>()
            + problem.w_skip as f64 * skip.values().filter(|&&s| s).count() as f64)
            .round() as i64,
    );

    SolverResult {
        status,
        objective,
        routes,
        t_departure,
        t_delivery,
        cert,
        skip,
        assigned,
    }
}

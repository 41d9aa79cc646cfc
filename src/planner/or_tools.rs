//! Big-M linearization helpers for reified boolean constraints in a plain
//! MILP model (the `good_lp` equivalent of CP-SAT's `OnlyEnforceIf`).

use good_lp::{constraint, Expression, SolverModel, Variable};

/// Implement a disjunction: `x = 1` iff at least one of `vars` is `1`. This is
/// done in the following way:
///
/// ```text
/// x, a, b, c: Bool,
/// x <= (a + b + c)
/// x >= a
/// x >= b
/// x >= c
/// ```
///
/// Used to link `used[k]` to whether courier `k` has any assigned order
/// (constraint C3).
pub fn c_any(problem: &mut impl SolverModel, x: Variable, vars: Vec<Variable>) {
    for y in vars.iter() {
        problem.add_constraint(constraint!(x >= *y));
    }
    let sum: Expression = vars.into_iter().sum();
    problem.add_constraint(constraint!(x <= sum));
}

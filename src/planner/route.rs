//! Route reconstruction (§4.2.7): walk the solved `y[i,j,k]` arcs for one
//! courier to recover its node sequence, starting and ending at the depot.

use good_lp::{Solution, Variable};

use super::model::PlannerVars;

/// Reconstruct courier `kk`'s route from the solved `y` variables.
///
/// Returns the sentinel `[0, 0]` if the courier is unused. Revisiting a node
/// before reaching the depot indicates a malformed solution (unreachable
/// under the degree and time-propagation constraints of §4.2.3, but guarded
/// against here); the route is defensively closed to the depot in that case.
pub fn reconstruct(vars: &PlannerVars, solution: &impl Solution, kk: usize, n: usize) -> Vec<usize> {
    let is_one = |v: Variable| solution.value(v).round() as i64 == 1;

    if !is_one(vars.used[kk]) {
        return vec![0, 0];
    }

    let arc = |from: usize, to: usize| -> bool {
        vars.y
            .get(&(from, to, kk))
            .map(|&v| is_one(v))
            .unwrap_or(false)
    };

    let Some(first) = (1..=n).find(|&j| arc(0, j)) else {
        return vec![0, 0];
    };

    let mut route = vec![0, first];
    let mut visited = vec![false; n + 1];
    visited[0] = true;
    visited[first] = true;
    let mut current = first;

    loop {
        if arc(current, 0) {
            route.push(0);
            return route;
        }

        let next = (1..=n).filter(|&j| j != current).find(|&j| arc(current, j));
        match next {
            Some(j) if !visited[j] => {
                route.push(j);
                visited[j] = true;
                current = j;
            }
            _ => {
                // No outgoing arc to an unvisited node, or a revisit: the
                // solver produced a malformed route. Close it off.
                route.push(0);
                return route;
            }
        }
    }
}

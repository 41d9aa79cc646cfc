//! Last-mile delivery planner for a single-depot pizzeria operation.
//!
//! Given a depot, a set of freshly created orders, and a pool of couriers,
//! this crate decides which orders go to which courier, the visit order
//! along each route, and each courier's departure time, minimizing a
//! three-term objective (certificate count, total click-to-eat minutes,
//! skipped-order count) subject to capacity, readiness and availability
//! constraints.
//!
//! Three cooperating components, leaves first:
//! - [`mapper`]: validates and translates the external JSON request into the
//!   solver's internal integer-minute form ([`problem`]).
//! - [`planner`]: builds and solves the assignment + routing + scheduling
//!   MILP model, and extracts a structured [`problem::SolverResult`].
//! - [`formatter`]: converts the result back to ISO-8601-timestamped
//!   per-courier/per-order plans ([`domain`]).
//!
//! [`api`] exposes both stages as a stateless HTTP surface.

pub mod api;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod mapper;
pub mod planner;
pub mod problem;
pub mod time;

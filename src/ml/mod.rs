//! Model fitting and evaluation.
//!
//! [`optim`] holds the generic convex solver, [`logreg`] the one-vs-rest logistic regression
//! built on it, and [`metrics`] the evaluation helpers used to report training accuracy.

pub mod logreg;
pub mod metrics;
pub mod optim;

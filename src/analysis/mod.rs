pub mod heuristic;
pub mod indicators;
pub mod payments;
pub mod validation;

//! Leave optimisation over a [`DayTypeIndex`](crate::calendar::DayTypeIndex).
//!
//! The pipeline is: expand every bookable workday into candidate blocks,
//! prune the pool to the most efficient and longest blocks, then pick the
//! best non-overlapping combination within the allowance.

mod candidates;
mod expander;
mod insight;
mod solver;

pub use candidates::{generate_candidates, prune_candidates, rank_by_efficiency};
pub use expander::{Candidate, expand_block, expand_from};
pub use insight::{compare_plans, day_insight};
pub use solver::solve;

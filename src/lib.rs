//! Leave Optimisation Engine
//!
//! This crate chooses which workdays to book as paid leave so that a fixed
//! annual allowance yields the longest runs of consecutive days off, given a
//! location's public holidays, a weekend pattern and user-defined holidays.

#![warn(missing_docs)]

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod optimizer;
pub mod planner;

//! Problem generation, answer checking and session analytics for mathdrill.
//!
//! This crate holds everything about a timed arithmetic quiz that does not
//! depend on a terminal: exact fractions, problem generation, answer
//! evaluation, pacing, the session controller and post-game statistics.

pub mod error;
pub mod evaluator;
pub mod fraction;
pub mod generator;
pub mod model;
pub mod pacing;
pub mod report;
pub mod session;
pub mod settings;
pub mod statistics;

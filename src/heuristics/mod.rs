//! Genetic search for timetables.
//!
//! This module exports the chromosome encoding, the fitness function, the genetic
//! operators and the evolution loop.

pub mod population;
pub mod fitness;
pub mod operators;
pub mod genetic;

pub use population::*;
pub use fitness::{conflict_report, evaluate, ConflictReport, BASE_SCORE, CONFLICT_PENALTY, MAX_SCORE};
pub use operators::*;
pub use genetic::*;

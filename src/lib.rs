//! Timetable Solver Library
//!
//! Genetic-algorithm timetable generation for a school administration backend.
//! Every required teaching session (a subject taught by a teacher to a section) is
//! assigned a (time slot, room) pair so that no teacher, room or section is
//! double-booked, within a fixed generation budget.
//!
//! # Features
//!
//! - Data loading from memory, CSV directories or JSON documents
//! - Hard-constraint fitness with per-axis conflict reports
//! - Tournament selection, single-point crossover, one-gene mutation, elitism
//! - Seeded, reproducible runs
//! - Stage-then-swap schedule stores
//! - Multi-seed benchmarking
//!
//! # Example
//!
//! ```no_run
//! use timetable_solver::dataset::CsvDirectorySource;
//! use timetable_solver::generator::generate;
//! use timetable_solver::heuristics::GAConfig;
//! use timetable_solver::GenerationOutcome;
//!
//! let source = CsvDirectorySource::new("data/");
//! match generate(&source, GAConfig::default()) {
//!     GenerationOutcome::Success(solution) => {
//!         println!("{} rows, score {}", solution.schedules.len(), solution.best_score);
//!     }
//!     GenerationOutcome::DataInsufficient(e) => eprintln!("add data: {}", e),
//!     GenerationOutcome::EvolutionFailed(e) => eprintln!("failed: {}", e),
//! }
//! ```

pub mod model;
pub mod error;
pub mod dataset;
pub mod heuristics;
pub mod solution;
pub mod generator;
pub mod store;
pub mod benchmark;

pub use dataset::{DataSource, TimetableData};
pub use error::{GenerationOutcome, TimetableError};
pub use generator::{generate, generate_and_store, TimetableGenerator};
pub use solution::TimetableSolution;

//! Error and outcome types for timetable generation.

use crate::model::SubjectId;
use crate::solution::TimetableSolution;
use thiserror::Error;

/// Errors raised while loading data, evolving, or materializing a timetable
#[derive(Debug, Error)]
pub enum TimetableError {
    /// No allocations, rooms or time slots were supplied.
    #[error("insufficient data for generation: no {}", .missing.join(", no "))]
    DataInsufficiency { missing: Vec<&'static str> },

    /// Unexpected fault while evolving. Fatal for the current run.
    #[error("evolution failed: {0}")]
    Evolution(String),

    /// An allocation references a subject absent from the subject lookup.
    #[error("allocation references unknown subject {subject_id}")]
    UnknownSubject { subject_id: SubjectId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TimetableError {
    /// Whether the caller can recover by supplying more input data.
    pub fn is_data_insufficiency(&self) -> bool {
        matches!(self, TimetableError::DataInsufficiency { .. })
    }
}

pub type Result<T> = std::result::Result<T, TimetableError>;

/// Tagged result of one generation run.
#[derive(Debug)]
pub enum GenerationOutcome {
    Success(TimetableSolution),
    DataInsufficient(TimetableError),
    EvolutionFailed(TimetableError),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }

    /// Returns the solution on success.
    pub fn solution(&self) -> Option<&TimetableSolution> {
        match self {
            GenerationOutcome::Success(solution) => Some(solution),
            _ => None,
        }
    }
}

impl From<Result<TimetableSolution>> for GenerationOutcome {
    fn from(result: Result<TimetableSolution>) -> Self {
        match result {
            Ok(solution) => GenerationOutcome::Success(solution),
            Err(e) if e.is_data_insufficiency() => GenerationOutcome::DataInsufficient(e),
            Err(e) => GenerationOutcome::EvolutionFailed(e),
        }
    }
}

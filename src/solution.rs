//! Materialized timetable solutions.
//!
//! Converts the winning chromosome into persistable [`Schedule`] rows and keeps
//! the run metadata callers need to decide whether to accept the result.

use crate::dataset::TimetableData;
use crate::error::{Result, TimetableError};
use crate::heuristics::fitness::{conflict_report, ConflictReport, MAX_SCORE};
use crate::heuristics::genetic::{EvolutionResult, GenerationStats};
use crate::heuristics::population::Chromosome;
use crate::model::{Schedule, TeacherId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Convert a chromosome into one draft schedule row per gene.
pub fn materialize(chromosome: &Chromosome, data: &TimetableData) -> Result<Vec<Schedule>> {
    chromosome
        .genes
        .iter()
        .map(|gene| {
            let alloc = &data.allocations()[gene.allocation];
            let slot = &data.slots()[gene.slot];
            let room = &data.rooms()[gene.room];
            let subject = data
                .subject(alloc.subject_id)
                .ok_or(TimetableError::UnknownSubject { subject_id: alloc.subject_id })?;

            Ok(Schedule {
                course_code: subject.code.clone(),
                course_name: subject.name.clone(),
                section: alloc.section_id.clone(),
                teacher_id: alloc.teacher_id,
                day_of_week: slot.day_of_week.clone(),
                start_time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
                room: room.name.clone(),
                published: false,
            })
        })
        .collect()
}

/// Represents a generated timetable
#[derive(Debug, Clone, Serialize)]
pub struct TimetableSolution {
    /// Draft schedule rows, one per allocation
    pub schedules: Vec<Schedule>,
    /// Fitness of the best chromosome
    pub best_score: i64,
    /// Residual collisions in the best chromosome
    pub conflicts: ConflictReport,
    /// Number of generations scored
    pub generations: usize,
    /// Whether the run stopped on a conflict-free timetable
    pub optimal: bool,
    /// Seed the run was started from
    pub seed: u64,
    /// Computation time in seconds
    pub computation_time: f64,
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    pub history: Vec<GenerationStats>,
}

impl TimetableSolution {
    pub fn from_evolution(result: EvolutionResult, data: &TimetableData, seed: u64) -> Result<Self> {
        let schedules = materialize(&result.best, data)?;
        let conflicts = conflict_report(&result.best, data);

        Ok(TimetableSolution {
            schedules,
            best_score: result.best_score,
            conflicts,
            generations: result.generations,
            optimal: result.optimal,
            seed,
            computation_time: result.computation_time,
            generated_at: Utc::now(),
            history: result.history,
        })
    }

    pub fn is_conflict_free(&self) -> bool {
        self.best_score >= MAX_SCORE
    }

    pub fn for_section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Schedule> + 'a {
        self.schedules.iter().filter(move |s| s.section == section)
    }

    pub fn for_teacher(&self, teacher_id: TeacherId) -> impl Iterator<Item = &Schedule> + '_ {
        self.schedules.iter().filter(move |s| s.teacher_id == teacher_id)
    }
}

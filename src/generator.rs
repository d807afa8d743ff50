//! End-to-end generation run: load, evolve, materialize.
//!
//! A run moves through `Loading -> Evolving -> Done`, or ends in `Failed` from
//! either of the first two states. Nothing is kept between runs.

use crate::dataset::DataSource;
use crate::error::{GenerationOutcome, Result};
use crate::heuristics::genetic::{GAConfig, GeneticAlgorithm};
use crate::solution::TimetableSolution;
use crate::store::ScheduleStore;

/// Lifecycle of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Loading,
    Evolving,
    Done,
    Failed,
}

/// Drives one generation run at a time
#[derive(Debug, Clone)]
pub struct TimetableGenerator {
    config: GAConfig,
    state: RunState,
}

impl TimetableGenerator {
    pub fn new(config: GAConfig) -> Self {
        TimetableGenerator {
            config,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &GAConfig {
        &self.config
    }

    /// Run the full pipeline against `source`.
    pub fn generate(&mut self, source: &dyn DataSource) -> Result<TimetableSolution> {
        self.state = RunState::Loading;
        let result = self.run_phases(source);
        self.state = if result.is_ok() { RunState::Done } else { RunState::Failed };

        match &result {
            Ok(solution) => log::info!(
                "Generated {} schedule rows (score {}, {} conflicts)",
                solution.schedules.len(),
                solution.best_score,
                solution.conflicts.total()
            ),
            Err(e) => log::warn!("Timetable generation failed: {}", e),
        }
        result
    }

    fn run_phases(&mut self, source: &dyn DataSource) -> Result<TimetableSolution> {
        let data = source.load()?;

        self.state = RunState::Evolving;
        self.config.validate()?;
        let mut ga = GeneticAlgorithm::new(&data, self.config.clone());
        let result = ga.run()?;

        TimetableSolution::from_evolution(result, &data, self.config.seed)
    }
}

/// Run one generation and wrap the result in a [`GenerationOutcome`].
pub fn generate(source: &dyn DataSource, config: GAConfig) -> GenerationOutcome {
    TimetableGenerator::new(config).generate(source).into()
}

/// Generate, then replace the stored schedules only if generation succeeded.
///
/// On failure the previously stored set is left untouched.
pub fn generate_and_store<S: ScheduleStore + ?Sized>(
    source: &dyn DataSource,
    config: GAConfig,
    store: &mut S,
) -> GenerationOutcome {
    let outcome = generate(source, config);
    if let GenerationOutcome::Success(solution) = &outcome {
        if let Err(e) = store.replace_all(solution.schedules.clone()) {
            return GenerationOutcome::EvolutionFailed(e);
        }
    }
    outcome
}

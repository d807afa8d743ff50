//! Genetic Algorithm for timetable generation.
//!
//! Each generation:
//! 1. Every chromosome is scored by the hard-constraint fitness
//! 2. The best-ever chromosome is tracked across generations
//! 3. The run stops early once a conflict-free chromosome is found
//! 4. The top `elite_count` chromosomes carry over unchanged; the rest of the
//!    population is refilled with tournament selection, single-point crossover
//!    and one-gene mutation
//!
//! The run is single-threaded and draws all randomness from one `ChaCha8Rng`
//! seeded from [`GAConfig::seed`].

use crate::dataset::TimetableData;
use crate::error::{Result, TimetableError};
use crate::heuristics::fitness::MAX_SCORE;
use crate::heuristics::operators::{mutate, single_point_crossover, tournament_select};
use crate::heuristics::population::{initialize_population, Chromosome, Individual};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Genetic Algorithm configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GAConfig {
    /// Population size
    pub population_size: usize,
    /// Maximum number of generations
    pub generations: usize,
    /// Elite count (best chromosomes carried over unchanged)
    pub elite_count: usize,
    /// Tournament size for selection
    pub tournament_size: usize,
    /// Probability that a child gets one gene reassigned
    pub mutation_prob: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for GAConfig {
    fn default() -> Self {
        GAConfig {
            population_size: 100,
            generations: 200,
            elite_count: 2,
            tournament_size: 3,
            mutation_prob: 0.2,
            seed: 42,
        }
    }
}

impl GAConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(TimetableError::InvalidConfig("population size must be positive".into()));
        }
        if self.generations == 0 {
            return Err(TimetableError::InvalidConfig("generation count must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(TimetableError::InvalidConfig(format!(
                "mutation probability {} is outside [0, 1]",
                self.mutation_prob
            )));
        }
        Ok(())
    }
}

/// Per-generation statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    /// Best score seen in this or any earlier generation
    pub best_score: i64,
    /// Best score within this generation
    pub generation_best: i64,
    pub mean_score: f64,
}

/// Outcome of one evolution run
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    pub best: Chromosome,
    pub best_score: i64,
    /// Generations scored, including the one that reached the optimum
    pub generations: usize,
    pub optimal: bool,
    pub history: Vec<GenerationStats>,
    pub computation_time: f64,
}

/// Genetic Algorithm implementation
pub struct GeneticAlgorithm<'a> {
    config: GAConfig,
    data: &'a TimetableData,
    population: Vec<Individual>,
    best_individual: Option<Individual>,
    rng: ChaCha8Rng,
    generation: usize,
    history: Vec<GenerationStats>,
}

impl<'a> GeneticAlgorithm<'a> {
    pub fn new(data: &'a TimetableData, config: GAConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        GeneticAlgorithm {
            config,
            data,
            population: Vec::new(),
            best_individual: None,
            rng,
            generation: 0,
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &GAConfig {
        &self.config
    }

    /// Sort by descending fitness and fold the leader into the best-ever record.
    fn record_generation(&mut self) -> Result<()> {
        self.population.sort_by(|a, b| b.fitness.cmp(&a.fitness));

        let leader = self
            .population
            .first()
            .ok_or_else(|| TimetableError::Evolution("population is empty".into()))?;

        let improved = self
            .best_individual
            .as_ref()
            .map_or(true, |best| leader.fitness > best.fitness);
        if improved {
            self.best_individual = Some(leader.clone());
        }

        let best_score = self.best_individual.as_ref().map_or(leader.fitness, |b| b.fitness);
        let mean_score =
            self.population.iter().map(|i| i.fitness as f64).sum::<f64>() / self.population.len() as f64;

        self.history.push(GenerationStats {
            generation: self.generation,
            best_score,
            generation_best: leader.fitness,
            mean_score,
        });
        Ok(())
    }

    /// Create the next generation
    fn evolve(&mut self) -> Result<()> {
        let size = self.config.population_size;
        let mut new_population = Vec::with_capacity(size);

        new_population.extend(self.population.iter().take(self.config.elite_count.min(size)).cloned());

        while new_population.len() < size {
            let parent1 = tournament_select(&self.population, self.config.tournament_size, &mut self.rng);
            let parent2 = tournament_select(&self.population, self.config.tournament_size, &mut self.rng);

            let mut child = single_point_crossover(&parent1.chromosome, &parent2.chromosome, &mut self.rng);
            mutate(&mut child, self.data, self.config.mutation_prob, &mut self.rng);

            new_population.push(Individual::new(child, self.data));
        }

        self.check_invariants(&new_population)?;
        self.population = new_population;
        self.generation += 1;
        Ok(())
    }

    fn check_invariants(&self, population: &[Individual]) -> Result<()> {
        if population.len() != self.config.population_size {
            return Err(TimetableError::Evolution(format!(
                "population size drifted to {} (expected {})",
                population.len(),
                self.config.population_size
            )));
        }
        let n = self.data.allocations().len();
        if let Some(bad) = population.iter().find(|i| !i.chromosome.is_aligned(n)) {
            return Err(TimetableError::Evolution(format!(
                "chromosome with {} genes is not aligned to {} allocations",
                bad.chromosome.len(),
                n
            )));
        }
        Ok(())
    }

    /// Run the genetic algorithm
    pub fn run(&mut self) -> Result<EvolutionResult> {
        self.config.validate()?;
        let start = Instant::now();

        self.population = initialize_population(self.data, self.config.population_size, &mut self.rng);
        self.check_invariants(&self.population)?;
        self.generation = 0;
        self.history.clear();
        self.best_individual = None;

        let mut optimal = false;
        loop {
            self.record_generation()?;

            if let Some(stats) = self.history.last() {
                if stats.generation % 10 == 0 {
                    log::info!(
                        "[GA] Gen {}  Best score {}  Gen best {}  Mean {:.1}  Diversity {:.2}  Elapsed {:.2}s",
                        stats.generation,
                        stats.best_score,
                        stats.generation_best,
                        stats.mean_score,
                        self.population_diversity(),
                        start.elapsed().as_secs_f64()
                    );
                }
                if stats.best_score >= MAX_SCORE {
                    log::info!("[GA] Conflict-free timetable found at generation {}", stats.generation);
                    optimal = true;
                    break;
                }
            }

            if self.generation + 1 >= self.config.generations {
                break;
            }
            self.evolve()?;
        }

        let best = self
            .best_individual
            .clone()
            .ok_or_else(|| TimetableError::Evolution("no chromosome was scored".into()))?;

        log::info!(
            "[GA] Finished after {} generations: best score {} ({})",
            self.history.len(),
            best.fitness,
            if optimal { "conflict-free" } else { "conflicts remain" }
        );

        Ok(EvolutionResult {
            best_score: best.fitness,
            best: best.chromosome,
            generations: self.history.len(),
            optimal,
            history: self.history.clone(),
            computation_time: start.elapsed().as_secs_f64(),
        })
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Average number of positions at which pairs of chromosomes differ
    pub fn population_diversity(&self) -> f64 {
        let sample = &self.population[..self.population.len().min(20)];
        if sample.len() < 2 {
            return 0.0;
        }

        let mut total_diff = 0usize;
        let mut count = 0usize;
        for i in 0..sample.len() {
            for j in i + 1..sample.len() {
                total_diff += sample[i]
                    .chromosome
                    .genes
                    .iter()
                    .zip(&sample[j].chromosome.genes)
                    .filter(|(a, b)| a != b)
                    .count();
                count += 1;
            }
        }
        total_diff as f64 / count as f64
    }
}

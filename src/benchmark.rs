//! Benchmarking module for the timetable generator.
//!
//! Runs the genetic algorithm over several seeds on the same dataset, collects
//! per-run results and aggregates them for comparison of configurations.

use crate::dataset::TimetableData;
use crate::error::Result;
use crate::heuristics::genetic::{GAConfig, GeneticAlgorithm};
use crate::heuristics::fitness::conflict_report;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::path::Path;

/// Result of a single seeded run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub seed: u64,
    pub population_size: usize,
    pub max_generations: usize,
    pub best_score: i64,
    pub conflicts: usize,
    pub generations: usize,
    pub optimal: bool,
    /// Computation time in seconds
    pub time: f64,
}

/// Aggregated statistics over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    pub num_runs: usize,
    pub num_optimal: usize,
    pub avg_score: f64,
    pub std_score: f64,
    pub best_score: i64,
    pub worst_score: i64,
    pub avg_generations: f64,
    pub avg_time: f64,
    pub total_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of seeded runs
    pub num_runs: usize,
    /// Seed of the first run; run `i` uses `base_seed + i`
    pub base_seed: u64,
    /// GA parameters shared by every run (its `seed` is overridden)
    pub ga: GAConfig,
    /// Run seeds in parallel
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            base_seed: 0,
            ga: GAConfig::default(),
            parallel: true,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    fn run_seed(&self, data: &TimetableData, seed: u64) -> Result<RunResult> {
        let config = GAConfig { seed, ..self.config.ga.clone() };
        let mut ga = GeneticAlgorithm::new(data, config);
        let result = ga.run()?;

        Ok(RunResult {
            seed,
            population_size: self.config.ga.population_size,
            max_generations: self.config.ga.generations,
            best_score: result.best_score,
            conflicts: conflict_report(&result.best, data).total(),
            generations: result.generations,
            optimal: result.optimal,
            time: result.computation_time,
        })
    }

    /// Run every seed, calling `on_done` after each run completes.
    pub fn run<F>(&mut self, data: &TimetableData, on_done: F) -> Result<()>
    where
        F: Fn(&RunResult) + Sync,
    {
        log::info!(
            "Running benchmark: {} runs, population {}, {} generations",
            self.config.num_runs,
            self.config.ga.population_size,
            self.config.ga.generations
        );

        let seeds: Vec<u64> = (0..self.config.num_runs as u64)
            .map(|i| self.config.base_seed + i)
            .collect();

        let run_one = |seed: u64| {
            let result = self.run_seed(data, seed);
            if let Ok(r) = &result {
                on_done(r);
            }
            result
        };

        let results: Result<Vec<RunResult>> = if self.config.parallel {
            seeds.into_par_iter().map(run_one).collect()
        } else {
            seeds.into_iter().map(run_one).collect()
        };

        self.results.extend(results?);
        Ok(())
    }

    /// Compute aggregated statistics, or `None` before any run
    pub fn compute_statistics(&self) -> Option<BenchmarkStatistics> {
        if self.results.is_empty() {
            return None;
        }

        let scores: Vec<f64> = self.results.iter().map(|r| r.best_score as f64).collect();
        let generations: Vec<f64> = self.results.iter().map(|r| r.generations as f64).collect();
        let times: Vec<f64> = self.results.iter().map(|r| r.time).collect();

        let std_score = if scores.len() > 1 { scores.iter().std_dev() } else { 0.0 };

        Some(BenchmarkStatistics {
            num_runs: self.results.len(),
            num_optimal: self.results.iter().filter(|r| r.optimal).count(),
            avg_score: scores.iter().mean(),
            std_score,
            best_score: self.results.iter().map(|r| r.best_score).fold(i64::MIN, i64::max),
            worst_score: self.results.iter().map(|r| r.best_score).fold(i64::MAX, i64::min),
            avg_generations: generations.iter().mean(),
            avg_time: times.iter().mean(),
            total_time: times.iter().sum(),
        })
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        if let Some(stats) = self.compute_statistics() {
            writer.serialize(stats)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("     Timetable GA Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str(&format!(
            "Population: {}  Generations: {}  Mutation: {:.2}\n\n",
            self.config.ga.population_size, self.config.ga.generations, self.config.ga.mutation_prob
        ));

        report.push_str(&format!(
            "{:<8} {:>12} {:>10} {:>12} {:>10}\n",
            "Seed", "Best Score", "Conflicts", "Generations", "Time"
        ));
        report.push_str("-".repeat(56).as_str());
        report.push('\n');

        let mut sorted: Vec<&RunResult> = self.results.iter().collect();
        sorted.sort_by_key(|r| r.seed);
        for r in sorted {
            report.push_str(&format!(
                "{:<8} {:>12} {:>10} {:>12} {:>10.4}\n",
                r.seed, r.best_score, r.conflicts, r.generations, r.time
            ));
        }
        report.push_str("-".repeat(56).as_str());
        report.push('\n');

        if let Some(stats) = self.compute_statistics() {
            report.push_str(&format!(
                "\nConflict-free runs: {}/{}\n",
                stats.num_optimal, stats.num_runs
            ));
            report.push_str(&format!(
                "Score: avg {:.1} (std {:.1}), best {}, worst {}\n",
                stats.avg_score, stats.std_score, stats.best_score, stats.worst_score
            ));
            report.push_str(&format!(
                "Generations: avg {:.1}   Time: avg {:.4}s, total {:.4}s\n",
                stats.avg_generations, stats.avg_time, stats.total_time
            ));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

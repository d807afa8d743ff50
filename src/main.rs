//! Timetable Solver - Command Line Interface
//!
//! Generates weekly timetables with a genetic algorithm.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use timetable_solver::benchmark::{Benchmark, BenchmarkConfig};
use timetable_solver::dataset::source_from_path;
use timetable_solver::heuristics::GAConfig;
use timetable_solver::store::{JsonScheduleStore, ScheduleStore};
use timetable_solver::{generate, generate_and_store, DataSource, GenerationOutcome, TimetableData, TimetableSolution};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "timetable-solver")]
#[command(version = "1.0")]
#[command(about = "Genetic-algorithm timetable generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a timetable
    Generate {
        /// CSV directory or JSON dataset
        #[arg(short, long)]
        data: PathBuf,

        /// JSON file with GA parameters (command-line values override it)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Population size
        #[arg(short, long)]
        population: Option<usize>,

        /// Maximum number of generations
        #[arg(short, long)]
        generations: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the full solution as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Schedule store to replace on success
        #[arg(long)]
        store: Option<PathBuf>,

        /// Print every schedule row
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the generator over several seeds
    Benchmark {
        /// CSV directory or JSON dataset
        #[arg(short, long)]
        data: PathBuf,

        /// Number of seeded runs
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Seed of the first run
        #[arg(long, default_value = "0")]
        base_seed: u64,

        /// Population size
        #[arg(short, long, default_value = "100")]
        population: usize,

        /// Maximum number of generations
        #[arg(short, long, default_value = "200")]
        generations: usize,

        /// Run seeds one after another
        #[arg(long)]
        sequential: bool,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Analyze a dataset
    Analyze {
        /// CSV directory or JSON dataset
        #[arg(short, long)]
        data: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { data, config, population, generations, seed, output, store, verbose } => {
            let mut ga = match config {
                Some(path) => load_config(&path),
                None => GAConfig::default(),
            };
            if let Some(p) = population {
                ga.population_size = p;
            }
            if let Some(g) = generations {
                ga.generations = g;
            }
            if let Some(s) = seed {
                ga.seed = s;
            }
            run_generate(&data, ga, output, store, verbose);
        }

        Commands::Benchmark { data, runs, base_seed, population, generations, sequential, output } => {
            let config = BenchmarkConfig {
                num_runs: runs,
                base_seed,
                ga: GAConfig {
                    population_size: population,
                    generations,
                    ..Default::default()
                },
                parallel: !sequential,
            };
            run_benchmark(&data, config, &output);
        }

        Commands::Analyze { data } => {
            let dataset = load_data(&data);
            println!("========== Dataset Analysis ==========\n");
            println!("{}", dataset.statistics());
        }
    }
}

fn load_config(path: &Path) -> GAConfig {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config {:?}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn load_data(path: &Path) -> TimetableData {
    match source_from_path(path).load() {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error loading dataset: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_generate(data: &Path, config: GAConfig, output: Option<PathBuf>, store: Option<PathBuf>, verbose: bool) {
    println!("Loading dataset from {:?}...", data);
    println!(
        "Solving with population {}, {} generations, seed {}...",
        config.population_size, config.generations, config.seed
    );

    let source = source_from_path(data);
    let outcome = match store {
        Some(path) => {
            let mut store = JsonScheduleStore::new(path);
            let outcome = generate_and_store(source.as_ref(), config, &mut store);
            match store.load() {
                Ok(rows) => println!("Store {:?} holds {} rows", store.path(), rows.len()),
                Err(e) => eprintln!("Cannot read store {:?}: {}", store.path(), e),
            }
            outcome
        }
        None => generate(source.as_ref(), config),
    };

    let solution = match outcome {
        GenerationOutcome::Success(solution) => solution,
        GenerationOutcome::DataInsufficient(e) => {
            eprintln!("Cannot generate: {}", e);
            std::process::exit(1);
        }
        GenerationOutcome::EvolutionFailed(e) => {
            eprintln!("Generation failed: {}", e);
            std::process::exit(1);
        }
    };

    print_summary(&solution, verbose);

    if let Some(out_path) = output {
        let written = serde_json::to_string_pretty(&solution)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&out_path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("\nSolution saved to {:?}", out_path),
            Err(e) => {
                eprintln!("Failed to write output: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_summary(solution: &TimetableSolution, verbose: bool) {
    println!("\n========== Results ==========");
    println!("Schedule rows: {}", solution.schedules.len());
    println!("Best score: {}", solution.best_score);
    println!(
        "Conflicts: {} (teacher {}, room {}, section {})",
        solution.conflicts.total(),
        solution.conflicts.teacher,
        solution.conflicts.room,
        solution.conflicts.section
    );
    println!("Conflict-free: {}", solution.is_conflict_free());
    println!("Generations: {}", solution.generations);
    println!("Time: {:.4}s", solution.computation_time);

    if verbose {
        println!();
        for s in &solution.schedules {
            println!(
                "{:<10} {:>5}-{:<5} {:<8} {:<10} {:<30} teacher {:<6} room {}",
                s.day_of_week, s.start_time, s.end_time, s.section, s.course_code, s.course_name, s.teacher_id, s.room
            );
        }
    }
}

fn run_benchmark(data: &Path, config: BenchmarkConfig, output: &Path) {
    let dataset = load_data(data);
    println!("{}", dataset.statistics());

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    let pb = ProgressBar::new(config.num_runs as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} runs")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut benchmark = Benchmark::new(config);
    if let Err(e) = benchmark.run(&dataset, |_| pb.inc(1)) {
        pb.abandon();
        eprintln!("Benchmark failed: {}", e);
        std::process::exit(1);
    }
    pb.finish();

    let results_path = output.join("results.csv");
    let stats_path = output.join("statistics.csv");
    let exported = benchmark
        .export_to_csv(&results_path)
        .and_then(|_| benchmark.export_statistics_csv(&stats_path));
    if let Err(e) = exported {
        eprintln!("Failed to export results: {}", e);
        std::process::exit(1);
    }
    println!("\nResults exported to {:?}", results_path);
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    match std::fs::write(&report_path, &report) {
        Ok(()) => println!("Report saved to {:?}", report_path),
        Err(e) => eprintln!("Failed to save report: {}", e),
    }
}

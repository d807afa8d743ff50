//! Selection, crossover and mutation for timetable chromosomes.
//!
//! Every operator draws from a caller-supplied RNG so that a seeded run is
//! reproducible.

use crate::dataset::TimetableData;
use crate::heuristics::population::{Chromosome, Individual};
use rand::seq::index;
use rand::Rng;

/// Tournament selection
///
/// Samples `size` distinct individuals (or the whole population if it is
/// smaller) and returns the fittest. Ties go to the first one sampled.
///
/// # Panics
///
/// Panics if `population` is empty.
pub fn tournament_select<'a, R: Rng>(population: &'a [Individual], size: usize, rng: &mut R) -> &'a Individual {
    let amount = size.clamp(1, population.len());
    let mut contestants = index::sample(rng, population.len(), amount).into_iter();

    let mut best = &population[contestants.next().unwrap_or(0)];
    for idx in contestants {
        if population[idx].fitness > best.fitness {
            best = &population[idx];
        }
    }
    best
}

/// Single-point crossover
///
/// The cut is drawn from `[1, len - 1]`; the child takes `parent1` before the
/// cut and `parent2` from it onward. Parents shorter than two genes cannot be
/// cut, so the child is a copy of `parent1`.
pub fn single_point_crossover<R: Rng>(parent1: &Chromosome, parent2: &Chromosome, rng: &mut R) -> Chromosome {
    let n = parent1.len();
    debug_assert_eq!(n, parent2.len());
    if n < 2 {
        return parent1.clone();
    }

    let point = rng.gen_range(1..n);
    let mut genes = Vec::with_capacity(n);
    genes.extend_from_slice(&parent1.genes[..point]);
    genes.extend_from_slice(&parent2.genes[point..]);

    Chromosome { genes }
}

/// Reassign one random gene with probability `mutation_prob`.
///
/// The chosen gene gets a fresh uniform slot and room. Returns whether the
/// chromosome was touched.
pub fn mutate<R: Rng>(chromosome: &mut Chromosome, data: &TimetableData, mutation_prob: f64, rng: &mut R) -> bool {
    if chromosome.is_empty() || rng.gen::<f64>() >= mutation_prob {
        return false;
    }

    let idx = rng.gen_range(0..chromosome.len());
    let gene = &mut chromosome.genes[idx];
    gene.slot = rng.gen_range(0..data.slots().len());
    gene.room = rng.gen_range(0..data.rooms().len());
    true
}

//! Chromosome encoding and random population initialization.
//!
//! A chromosome holds one [`Gene`] per allocation, in allocation order. Genes
//! store indices into the run's [`TimetableData`], so the allocation a gene belongs
//! to never changes; only its slot and room do.

use crate::dataset::TimetableData;
use crate::heuristics::fitness;
use rand::Rng;
use serde::Serialize;

/// One allocation bound to a (time slot, room) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Gene {
    /// Index into `TimetableData::allocations`
    pub allocation: usize,
    /// Index into `TimetableData::slots`
    pub slot: usize,
    /// Index into `TimetableData::rooms`
    pub room: usize,
}

/// A complete candidate timetable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Chromosome {
    pub genes: Vec<Gene>,
}

impl Chromosome {
    /// Draw a uniformly random slot and room for every allocation.
    pub fn random<R: Rng>(data: &TimetableData, rng: &mut R) -> Self {
        let num_slots = data.slots().len();
        let num_rooms = data.rooms().len();

        let genes = (0..data.allocations().len())
            .map(|allocation| Gene {
                allocation,
                slot: rng.gen_range(0..num_slots),
                room: rng.gen_range(0..num_rooms),
            })
            .collect();

        Chromosome { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Check that gene `i` belongs to allocation `i` for every `i`, and that
    /// there is exactly one gene per allocation.
    pub fn is_aligned(&self, num_allocations: usize) -> bool {
        self.genes.len() == num_allocations
            && self.genes.iter().enumerate().all(|(i, g)| g.allocation == i)
    }
}

/// Chromosome with its fitness score
#[derive(Debug, Clone)]
pub struct Individual {
    pub chromosome: Chromosome,
    pub fitness: i64,
}

impl Individual {
    pub fn new(chromosome: Chromosome, data: &TimetableData) -> Self {
        let fitness = fitness::evaluate(&chromosome, data);
        Individual { chromosome, fitness }
    }

    pub fn is_conflict_free(&self) -> bool {
        self.fitness >= fitness::MAX_SCORE
    }
}

/// Build `size` random, unseeded candidates.
pub fn initialize_population<R: Rng>(data: &TimetableData, size: usize, rng: &mut R) -> Vec<Individual> {
    let population: Vec<Individual> = (0..size)
        .map(|_| Individual::new(Chromosome::random(data, rng), data))
        .collect();

    let conflict_free = population.iter().filter(|i| i.is_conflict_free()).count();
    log::info!(
        "[GA] Initialized population: {} chromosomes x {} genes (conflict-free: {})",
        population.len(),
        data.allocations().len(),
        conflict_free
    );

    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Allocation, Room, TimeSlot};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_data() -> TimetableData {
        TimetableData::new(
            vec![
                Allocation::new(1, 1, "A"),
                Allocation::new(2, 2, "A"),
                Allocation::new(3, 1, "B"),
                Allocation::new(3, 3, "C"),
            ],
            vec![Room::new("101", 60), Room::new("102", 60), Room::new("Lab A", 30)],
            vec![
                TimeSlot::new("Monday", "09:00", "10:00"),
                TimeSlot::new("Monday", "10:00", "11:00"),
                TimeSlot::new("Tuesday", "09:00", "10:00"),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_random_chromosome_is_aligned() {
        let data = create_test_data();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let ch = Chromosome::random(&data, &mut rng);

        assert_eq!(ch.len(), 4);
        assert!(ch.is_aligned(4));
        assert!(ch.genes.iter().all(|g| g.slot < 3 && g.room < 3));
    }

    #[test]
    fn test_misaligned_chromosome_detected() {
        let ch = Chromosome {
            genes: vec![
                Gene { allocation: 1, slot: 0, room: 0 },
                Gene { allocation: 0, slot: 0, room: 0 },
            ],
        };
        assert!(!ch.is_aligned(2));
        assert!(!ch.is_aligned(3));
    }

    #[test]
    fn test_initialize_population_size() {
        let data = create_test_data();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let population = initialize_population(&data, 25, &mut rng);

        assert_eq!(population.len(), 25);
        assert!(population.iter().all(|i| i.chromosome.is_aligned(4)));
        assert!(population.iter().all(|i| i.fitness <= fitness::MAX_SCORE));
    }

    #[test]
    fn test_initialization_is_diverse() {
        let data = create_test_data();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let population = initialize_population(&data, 20, &mut rng);

        let first = &population[0].chromosome;
        assert!(population.iter().any(|i| &i.chromosome != first));
    }
}

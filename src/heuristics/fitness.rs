//! Hard-constraint fitness for timetables.
//!
//! A timetable starts at [`BASE_SCORE`] and loses [`CONFLICT_PENALTY`] for every
//! double-booking found while scanning genes in order. The three axes are checked
//! independently, so one gene can be charged up to three penalties.
//!
//! Soft criteria (room-capacity fit, weekly subject spread) are not scored.

use crate::dataset::TimetableData;
use crate::heuristics::population::Chromosome;
use serde::Serialize;
use std::collections::HashSet;

pub const BASE_SCORE: i64 = 1000;
pub const CONFLICT_PENALTY: i64 = 5000;
/// Highest attainable score: a conflict-free timetable.
pub const MAX_SCORE: i64 = BASE_SCORE;

/// Collision counts per constraint axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub teacher: usize,
    pub room: usize,
    pub section: usize,
}

impl ConflictReport {
    pub fn total(&self) -> usize {
        self.teacher + self.room + self.section
    }

    pub fn score(&self) -> i64 {
        BASE_SCORE - CONFLICT_PENALTY * self.total() as i64
    }
}

/// Count collisions on the teacher, room and section axes.
///
/// The first gene to claim a (owner, day, start time) key keeps it; every later
/// gene with the same key counts as one collision.
pub fn conflict_report(chromosome: &Chromosome, data: &TimetableData) -> ConflictReport {
    let allocations = data.allocations();
    let slots = data.slots();
    let rooms = data.rooms();

    let mut teacher_busy = HashSet::new();
    let mut room_busy = HashSet::new();
    let mut section_busy = HashSet::new();
    let mut report = ConflictReport::default();

    for gene in &chromosome.genes {
        let alloc = &allocations[gene.allocation];
        let slot = &slots[gene.slot];
        let room = &rooms[gene.room];
        let day = slot.day_of_week.as_str();
        let start = slot.start_time.as_str();

        if !teacher_busy.insert((alloc.teacher_id, day, start)) {
            report.teacher += 1;
        }
        if !room_busy.insert((room.name.as_str(), day, start)) {
            report.room += 1;
        }
        if !section_busy.insert((alloc.section_id.as_str(), day, start)) {
            report.section += 1;
        }
    }

    report
}

/// Score a chromosome. 1000 means conflict-free; there is no upper bonus.
pub fn evaluate(chromosome: &Chromosome, data: &TimetableData) -> i64 {
    conflict_report(chromosome, data).score()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::population::Gene;
    use crate::model::{Allocation, Room, TimeSlot};

    fn create_test_data() -> TimetableData {
        TimetableData::new(
            vec![
                Allocation::new(1, 10, "A"),
                Allocation::new(2, 20, "B"),
                Allocation::new(3, 30, "C"),
            ],
            vec![Room::new("101", 60), Room::new("102", 60), Room::new("103", 60)],
            vec![
                TimeSlot::new("Monday", "09:00", "10:00"),
                TimeSlot::new("Monday", "10:00", "11:00"),
                TimeSlot::new("Tuesday", "09:00", "10:00"),
                // same label as slot 0 with a different end: still the same key
                TimeSlot::new("Monday", "09:00", "11:00"),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    fn chromosome(assignments: &[(usize, usize)]) -> Chromosome {
        Chromosome {
            genes: assignments
                .iter()
                .enumerate()
                .map(|(allocation, &(slot, room))| Gene { allocation, slot, room })
                .collect(),
        }
    }

    #[test]
    fn test_conflict_free_scores_base() {
        let data = create_test_data();
        let ch = chromosome(&[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(evaluate(&ch, &data), 1000);
        assert_eq!(conflict_report(&ch, &data).total(), 0);
    }

    #[test]
    fn test_room_collision_costs_one_penalty() {
        let data = create_test_data();
        let ch = chromosome(&[(0, 0), (0, 0), (2, 0)]);
        let report = conflict_report(&ch, &data);
        assert_eq!(report, ConflictReport { teacher: 0, room: 1, section: 0 });
        assert_eq!(evaluate(&ch, &data), 1000 - 5000);
    }

    #[test]
    fn test_teacher_collision_exact_penalty() {
        let base = create_test_data();
        let mut allocations = base.allocations().to_vec();
        allocations[1].teacher_id = 10;
        let data = TimetableData::new(allocations, base.rooms().to_vec(), base.slots().to_vec(), Vec::new())
            .unwrap();

        let baseline = chromosome(&[(0, 0), (1, 1), (2, 2)]);
        let forced = chromosome(&[(0, 0), (0, 1), (2, 2)]);
        assert_eq!(evaluate(&baseline, &data), 1000);
        assert_eq!(evaluate(&baseline, &data) - evaluate(&forced, &data), 5000);
    }

    #[test]
    fn test_multiple_axes_on_one_gene() {
        let allocations = vec![Allocation::new(1, 10, "A"), Allocation::new(2, 10, "A")];
        let data = TimetableData::new(
            allocations,
            vec![Room::new("101", 60)],
            vec![TimeSlot::new("Monday", "09:00", "10:00")],
            Vec::new(),
        )
        .unwrap();

        let ch = chromosome(&[(0, 0), (0, 0)]);
        assert_eq!(conflict_report(&ch, &data).total(), 3);
        assert_eq!(evaluate(&ch, &data), 1000 - 15000);
    }

    #[test]
    fn test_collision_keys_on_day_and_start_only() {
        let data = create_test_data();
        let ch = chromosome(&[(0, 0), (3, 0), (2, 2)]);
        assert_eq!(conflict_report(&ch, &data).room, 1);
    }

    #[test]
    fn test_score_never_exceeds_max() {
        let data = create_test_data();
        for slot in 0..4 {
            for room in 0..3 {
                let ch = chromosome(&[(slot, room), (1, 1), (2, 2)]);
                assert!(evaluate(&ch, &data) <= MAX_SCORE);
            }
        }
    }
}

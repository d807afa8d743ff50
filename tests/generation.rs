use timetable_solver::dataset::{expand_credits, AllocationRequest, InMemorySource, JsonFileSource};
use timetable_solver::heuristics::{evaluate, Chromosome, GAConfig, GeneticAlgorithm, Gene};
use timetable_solver::model::{Allocation, Room, Schedule, Subject, TimeSlot};
use timetable_solver::store::{JsonScheduleStore, MemoryScheduleStore, ScheduleStore};
use timetable_solver::{generate, generate_and_store, DataSource, GenerationOutcome};

fn week_slots() -> Vec<TimeSlot> {
    let days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
    let times = [("09:00", "10:00"), ("10:00", "11:00"), ("11:00", "12:00"), ("13:00", "14:00")];
    days.iter()
        .flat_map(|d| times.iter().map(move |(s, e)| TimeSlot::new(*d, *s, *e)))
        .collect()
}

fn school() -> InMemorySource {
    let subjects = vec![
        Subject::new(1, "Mathematics", "MATH101", 3),
        Subject::new(2, "Physics", "PHY101", 3),
        Subject::new(3, "Computer Science", "CS101", 4),
    ];
    let requests = vec![
        AllocationRequest { subject_id: 1, teacher_id: 10, section_id: "A".into() },
        AllocationRequest { subject_id: 2, teacher_id: 11, section_id: "A".into() },
        AllocationRequest { subject_id: 3, teacher_id: 12, section_id: "A".into() },
        AllocationRequest { subject_id: 1, teacher_id: 10, section_id: "B".into() },
        AllocationRequest { subject_id: 3, teacher_id: 12, section_id: "B".into() },
    ];
    let allocations = expand_credits(&requests, &subjects).unwrap();

    InMemorySource {
        allocations,
        rooms: vec![Room::new("101", 60), Room::new("102", 60), Room::new("Lab A", 30)],
        slots: week_slots(),
        subjects,
    }
}

fn pigeonhole(sections: [&str; 3]) -> InMemorySource {
    InMemorySource {
        allocations: sections.iter().map(|s| Allocation::new(1, 7, *s)).collect(),
        rooms: vec![Room::new("101", 60)],
        slots: vec![
            TimeSlot::new("Monday", "09:00", "10:00"),
            TimeSlot::new("Monday", "10:00", "11:00"),
        ],
        subjects: vec![Subject::new(1, "Mathematics", "MATH101", 3)],
    }
}

fn have_no_double_booking(schedules: &[Schedule]) -> bool {
    use std::collections::HashSet;
    let mut teacher = HashSet::new();
    let mut room = HashSet::new();
    let mut section = HashSet::new();
    schedules.iter().all(|s| {
        teacher.insert((s.teacher_id, s.day_of_week.clone(), s.start_time.clone()))
            && room.insert((s.room.clone(), s.day_of_week.clone(), s.start_time.clone()))
            && section.insert((s.section.clone(), s.day_of_week.clone(), s.start_time.clone()))
    })
}

#[test]
fn solvable_school_is_conflict_free() {
    let source = school();
    let outcome = generate(&source, GAConfig::default());

    let solution = outcome.solution().expect("generation should succeed");
    assert_eq!(solution.schedules.len(), 17);
    assert!(solution.is_conflict_free());
    assert_eq!(solution.best_score, 1000);
    assert!(solution.optimal);
    assert!(solution.generations < 200);
    assert!(have_no_double_booking(&solution.schedules));
    assert!(solution.schedules.iter().all(|s| !s.published));
    assert_eq!(solution.for_section("B").count(), 7);
    assert_eq!(solution.for_teacher(12).count(), 8);
}

#[test]
fn pigeonhole_distinct_sections() {
    let source = pigeonhole(["A", "B", "C"]);
    let solution = generate(&source, GAConfig::default()).solution().cloned().unwrap();

    // 2+1 split: the shared slot collides on teacher and room
    assert_eq!(solution.best_score, 1000 - 5000 * 2);
    assert!(!solution.optimal);
    assert_eq!(solution.generations, 200);
    assert_eq!(solution.conflicts.teacher, 1);
    assert_eq!(solution.conflicts.room, 1);
    assert_eq!(solution.conflicts.section, 0);
}

#[test]
fn pigeonhole_shared_section() {
    let source = pigeonhole(["A", "A", "A"]);
    let config = GAConfig { generations: 50, ..Default::default() };
    let solution = generate(&source, config).solution().cloned().unwrap();

    assert_eq!(solution.best_score, 1000 - 5000 * 3);
    assert_eq!(solution.generations, 50);
}

#[test]
fn same_seed_same_schedules() {
    let source = school();
    let config = GAConfig { population_size: 30, generations: 40, seed: 99, ..Default::default() };

    let a = generate(&source, config.clone()).solution().cloned().unwrap();
    let b = generate(&source, config).solution().cloned().unwrap();
    assert_eq!(a.schedules, b.schedules);
    assert_eq!(a.best_score, b.best_score);
    assert_eq!(a.generations, b.generations);
}

#[test]
fn best_ever_history_is_monotonic() {
    let data = school().load().unwrap();
    let config = GAConfig { population_size: 12, generations: 80, seed: 5, ..Default::default() };
    let result = GeneticAlgorithm::new(&data, config).run().unwrap();

    assert!(result.history.windows(2).all(|w| w[1].best_score >= w[0].best_score));
    assert_eq!(result.history.last().map(|s| s.best_score), Some(result.best_score));
    assert!(result.best.is_aligned(data.allocations().len()));
}

#[test]
fn forced_teacher_collision_costs_exactly_one_penalty() {
    let data = school().load().unwrap();
    // allocations 0..3 are MATH101/A with teacher 10; spread them over distinct slots and rooms
    let baseline = Chromosome {
        genes: (0..data.allocations().len())
            .map(|allocation| Gene { allocation, slot: allocation, room: allocation % 3 })
            .collect(),
    };
    assert_eq!(evaluate(&baseline, &data), 1000);

    // allocation 10 is MATH101/B, also teacher 10; move it onto allocation 0's slot in another room
    assert_eq!(data.allocations()[10].teacher_id, data.allocations()[0].teacher_id);
    assert_ne!(data.allocations()[10].section_id, data.allocations()[0].section_id);
    let mut forced = baseline.clone();
    forced.genes[10].slot = 0;
    forced.genes[10].room = 1;
    assert_eq!(evaluate(&baseline, &data) - evaluate(&forced, &data), 5000);
}

#[test]
fn failed_run_keeps_previous_schedules() {
    let previous = school();
    let mut store = MemoryScheduleStore::default();
    assert!(generate_and_store(&previous, GAConfig::default(), &mut store).is_success());
    let stored = store.load().unwrap();
    assert_eq!(stored.len(), 17);

    let broken = InMemorySource { slots: Vec::new(), ..school() };
    let outcome = generate_and_store(&broken, GAConfig::default(), &mut store);
    assert!(matches!(outcome, GenerationOutcome::DataInsufficient(_)));
    assert_eq!(store.load().unwrap(), stored);
}

#[test]
fn json_round_trip_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("school.json");
    let source = school();
    let doc = serde_json::json!({
        "allocations": source.allocations,
        "rooms": source.rooms,
        "time_slots": source.slots,
        "subjects": source.subjects,
    });
    std::fs::write(&dataset_path, doc.to_string()).unwrap();

    let mut store = JsonScheduleStore::new(dir.path().join("schedules.json"));
    let outcome = generate_and_store(&JsonFileSource::new(&dataset_path), GAConfig::default(), &mut store);

    let solution = outcome.solution().cloned().unwrap();
    assert_eq!(store.load().unwrap(), solution.schedules);
}

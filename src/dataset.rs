//! Loading of the input snapshot for one generation run.
//!
//! A [`TimetableData`] holds allocations, rooms, time slots and a subject lookup.
//! Construction fails with [`TimetableError::DataInsufficiency`] when any of the
//! first three collections is empty, since there is nothing to place or nowhere to
//! place it.

use crate::error::{Result, TimetableError};
use crate::model::{Allocation, Room, SectionId, Subject, SubjectId, TeacherId, TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Immutable input entities for one run
#[derive(Debug, Clone)]
pub struct TimetableData {
    allocations: Vec<Allocation>,
    rooms: Vec<Room>,
    slots: Vec<TimeSlot>,
    subjects: HashMap<SubjectId, Subject>,
}

impl TimetableData {
    /// Validate and assemble the snapshot.
    pub fn new(
        allocations: Vec<Allocation>,
        rooms: Vec<Room>,
        slots: Vec<TimeSlot>,
        subjects: Vec<Subject>,
    ) -> Result<Self> {
        let mut missing = Vec::new();
        if allocations.is_empty() {
            missing.push("allocations");
        }
        if rooms.is_empty() {
            missing.push("rooms");
        }
        if slots.is_empty() {
            missing.push("time slots");
        }
        if !missing.is_empty() {
            return Err(TimetableError::DataInsufficiency { missing });
        }

        let subjects = subjects.into_iter().map(|s| (s.id, s)).collect();

        Ok(TimetableData {
            allocations,
            rooms,
            slots,
            subjects,
        })
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.get(&id)
    }

    pub fn num_subjects(&self) -> usize {
        self.subjects.len()
    }

    /// Number of distinct (day, start time) keys among the slots
    pub fn distinct_slot_keys(&self) -> usize {
        self.slots
            .iter()
            .map(|s| (s.day_of_week.as_str(), s.start_time.as_str()))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Compute dataset statistics
    pub fn statistics(&self) -> DatasetStatistics {
        let mut teacher_load: HashMap<TeacherId, usize> = HashMap::new();
        let mut section_load: HashMap<&str, usize> = HashMap::new();
        for alloc in &self.allocations {
            *teacher_load.entry(alloc.teacher_id).or_insert(0) += 1;
            *section_load.entry(alloc.section_id.as_str()).or_insert(0) += 1;
        }

        let slot_keys = self.distinct_slot_keys();
        let excess = |load: usize| load.saturating_sub(slot_keys);

        let teacher_excess: usize = teacher_load.values().copied().map(excess).sum();
        let section_excess: usize = section_load.values().copied().map(excess).sum();
        let room_excess = self
            .allocations
            .len()
            .saturating_sub(self.rooms.len() * slot_keys);

        DatasetStatistics {
            num_allocations: self.allocations.len(),
            num_rooms: self.rooms.len(),
            num_slots: self.slots.len(),
            distinct_slot_keys: slot_keys,
            num_subjects: self.subjects.len(),
            num_teachers: teacher_load.len(),
            num_sections: section_load.len(),
            max_teacher_load: teacher_load.values().copied().max().unwrap_or(0),
            max_section_load: section_load.values().copied().max().unwrap_or(0),
            total_room_capacity: self.rooms.iter().map(|r| r.capacity as u64).sum(),
            conflict_lower_bound: teacher_excess + section_excess + room_excess,
        }
    }
}

/// Dataset statistics
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatistics {
    pub num_allocations: usize,
    pub num_rooms: usize,
    pub num_slots: usize,
    pub distinct_slot_keys: usize,
    pub num_subjects: usize,
    pub num_teachers: usize,
    pub num_sections: usize,
    pub max_teacher_load: usize,
    pub max_section_load: usize,
    pub total_room_capacity: u64,
    /// Minimum number of collisions any timetable must contain.
    ///
    /// Counts per-teacher and per-section sessions beyond the slot count, plus
    /// sessions beyond rooms × slots. Each excess session collides at least once.
    pub conflict_lower_bound: usize,
}

impl fmt::Display for DatasetStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset Statistics:")?;
        writeln!(f, "  Allocations (weekly sessions): {}", self.num_allocations)?;
        writeln!(f, "  Rooms: {} (total capacity {})", self.num_rooms, self.total_room_capacity)?;
        writeln!(f, "  Time slots: {} ({} distinct day/start keys)", self.num_slots, self.distinct_slot_keys)?;
        writeln!(f, "  Subjects: {}", self.num_subjects)?;
        writeln!(f, "  Teachers: {} (max load {})", self.num_teachers, self.max_teacher_load)?;
        writeln!(f, "  Sections: {} (max load {})", self.num_sections, self.max_section_load)?;
        writeln!(f, "  Unavoidable collisions (lower bound): {}", self.conflict_lower_bound)
    }
}

/// Supplier of the input snapshot
pub trait DataSource {
    fn load(&self) -> Result<TimetableData>;
}

/// Source over entities that are already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub allocations: Vec<Allocation>,
    pub rooms: Vec<Room>,
    pub slots: Vec<TimeSlot>,
    pub subjects: Vec<Subject>,
}

impl DataSource for InMemorySource {
    fn load(&self) -> Result<TimetableData> {
        TimetableData::new(
            self.allocations.clone(),
            self.rooms.clone(),
            self.slots.clone(),
            self.subjects.clone(),
        )
    }
}

/// Directory holding `allocations.csv`, `rooms.csv`, `timeslots.csv` and `subjects.csv`.
///
/// Headers match the entity field names. A missing file is read as an empty collection.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        CsvDirectorySource {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn read_rows<T: for<'de> Deserialize<'de>>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file_name);
        let mut reader = csv::Reader::from_path(&path)?;
        let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
        log::debug!("Read {} rows from {:?}", rows.len(), path);
        Ok(rows)
    }

    /// Absent files read as no rows, so they surface as missing collections.
    fn read_rows_if_present<T: for<'de> Deserialize<'de>>(&self, file_name: &str) -> Result<Vec<T>> {
        if self.dir.join(file_name).exists() {
            self.read_rows(file_name)
        } else {
            log::warn!("No {} in {:?}", file_name, self.dir);
            Ok(Vec::new())
        }
    }
}

impl DataSource for CsvDirectorySource {
    fn load(&self) -> Result<TimetableData> {
        let allocations = self.read_rows_if_present("allocations.csv")?;
        let rooms = self.read_rows_if_present("rooms.csv")?;
        let slots = self.read_rows_if_present("timeslots.csv")?;
        let subjects = self.read_rows_if_present("subjects.csv")?;
        TimetableData::new(allocations, rooms, slots, subjects)
    }
}

#[derive(Debug, Deserialize)]
struct JsonDataset {
    #[serde(default)]
    allocations: Vec<Allocation>,
    #[serde(default)]
    rooms: Vec<Room>,
    #[serde(default)]
    time_slots: Vec<TimeSlot>,
    #[serde(default)]
    subjects: Vec<Subject>,
}

/// Single JSON document with `allocations`, `rooms`, `time_slots` and `subjects` arrays
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for JsonFileSource {
    fn load(&self) -> Result<TimetableData> {
        let file = File::open(&self.path)?;
        let raw: JsonDataset = serde_json::from_reader(BufReader::new(file))?;
        TimetableData::new(raw.allocations, raw.rooms, raw.time_slots, raw.subjects)
    }
}

/// Pick a source by path: directories are read as CSV, files as JSON.
pub fn source_from_path<P: AsRef<Path>>(path: P) -> Box<dyn DataSource> {
    let path = path.as_ref();
    if path.is_dir() {
        Box::new(CsvDirectorySource::new(path))
    } else {
        Box::new(JsonFileSource::new(path))
    }
}

/// Teaching demand before credit flattening: one row per subject/teacher/section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub section_id: SectionId,
}

/// Flatten requests into one allocation per weekly credit-hour.
///
/// This is a caller-side step; the generator only ever sees flattened
/// allocations. Zero-credit subjects contribute nothing.
pub fn expand_credits(requests: &[AllocationRequest], subjects: &[Subject]) -> Result<Vec<Allocation>> {
    let credits: HashMap<SubjectId, u32> = subjects.iter().map(|s| (s.id, s.credits)).collect();

    let mut allocations = Vec::new();
    for req in requests {
        let n = *credits
            .get(&req.subject_id)
            .ok_or(TimetableError::UnknownSubject { subject_id: req.subject_id })?;
        for _ in 0..n {
            allocations.push(Allocation::new(req.subject_id, req.teacher_id, req.section_id.clone()));
        }
    }
    Ok(allocations)
}

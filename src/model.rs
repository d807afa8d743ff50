//! Domain entities consumed and produced by the timetable generator.
//!
//! Input rows (allocations, rooms, time slots, subjects) are a read-only snapshot
//! taken once per generation run. The only produced entity is [`Schedule`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject identifier as stored by the administration backend
pub type SubjectId = u32;
/// Teacher (faculty user) identifier
pub type TeacherId = u32;
/// Section label, e.g. "A" or "CSE-2B"
pub type SectionId = String;

/// One required weekly session: a subject taught by a teacher to a section.
///
/// A subject requiring N credit-hours is represented by N allocations. Use
/// [`crate::dataset::expand_credits`] to flatten credit requests before generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation {
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub section_id: SectionId,
}

impl Allocation {
    pub fn new(subject_id: SubjectId, teacher_id: TeacherId, section_id: impl Into<SectionId>) -> Self {
        Allocation {
            subject_id,
            teacher_id,
            section_id: section_id.into(),
        }
    }
}

/// A teaching room. Capacity is carried but not scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub capacity: u32,
}

impl Room {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Room {
            name: name.into(),
            capacity,
        }
    }
}

/// A discrete weekly slot label such as Monday 09:00-10:00.
///
/// Slots are treated as opaque identities: two slots clash only when they share
/// the same day and start time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}

impl TimeSlot {
    pub fn new(day_of_week: impl Into<String>, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        TimeSlot {
            day_of_week: day_of_week.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day_of_week, self.start_time, self.end_time)
    }
}

/// Subject record, used only to denormalize the generated schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub code: String,
    pub credits: u32,
}

impl Subject {
    pub fn new(id: SubjectId, name: impl Into<String>, code: impl Into<String>, credits: u32) -> Self {
        Subject {
            id,
            name: name.into(),
            code: code.into(),
            credits,
        }
    }
}

/// A generated timetable entry, ready to be persisted.
///
/// Drafts are created with `published = false`; flipping it is the job of an
/// external publish action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub course_code: String,
    pub course_name: String,
    pub section: SectionId,
    pub teacher_id: TeacherId,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub published: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot_display() {
        let slot = TimeSlot::new("Monday", "09:00", "10:00");
        assert_eq!(slot.to_string(), "Monday 09:00-10:00");
    }

    #[test]
    fn test_allocation_json_shape() {
        let alloc = Allocation::new(3, 17, "B");
        let json = serde_json::to_value(&alloc).unwrap();
        assert_eq!(json["subject_id"], 3);
        assert_eq!(json["teacher_id"], 17);
        assert_eq!(json["section_id"], "B");
    }
}

//! Persisted schedule sets with stage-then-swap replacement.
//!
//! A store never holds a half-written set: `replace_all` stages the complete new
//! set and swaps it in as one step.

use crate::error::Result;
use crate::model::Schedule;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for generated schedules
pub trait ScheduleStore {
    /// Currently stored schedules
    fn load(&self) -> Result<Vec<Schedule>>;

    /// Replace the stored set with `schedules` in one step.
    fn replace_all(&mut self, schedules: Vec<Schedule>) -> Result<()>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    schedules: Vec<Schedule>,
}

impl MemoryScheduleStore {
    pub fn new(schedules: Vec<Schedule>) -> Self {
        MemoryScheduleStore { schedules }
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn load(&self) -> Result<Vec<Schedule>> {
        Ok(self.schedules.clone())
    }

    fn replace_all(&mut self, schedules: Vec<Schedule>) -> Result<()> {
        self.schedules = schedules;
        Ok(())
    }
}

/// JSON file store
///
/// New sets are written to a sibling `.tmp` file and renamed over the target,
/// so readers see either the old set or the new one.
#[derive(Debug, Clone)]
pub struct JsonScheduleStore {
    path: PathBuf,
}

impl JsonScheduleStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonScheduleStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ScheduleStore for JsonScheduleStore {
    fn load(&self) -> Result<Vec<Schedule>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn replace_all(&mut self, schedules: Vec<Schedule>) -> Result<()> {
        let staging = self.staging_path();
        let swapped = write_json(&staging, &schedules).and_then(|_| Ok(fs::rename(&staging, &self.path)?));
        if let Err(e) = swapped {
            if staging.exists() {
                let _ = fs::remove_file(&staging);
            }
            return Err(e);
        }
        log::info!("Stored {} schedules in {:?}", schedules.len(), self.path);
        Ok(())
    }
}

fn write_json(path: &Path, schedules: &[Schedule]) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, schedules)?;
    writer.flush()?;
    Ok(())
}

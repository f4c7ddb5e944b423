use super::{AppointmentBackend, PersistenceError, PersistenceResult};
use crate::Appointment;
use parking_lot::Mutex;
use std::io;

#[derive(Debug, Default)]
struct MemoryState {
    stored: Option<Vec<Appointment>>,
    fail_load: bool,
    fail_save: bool,
    save_count: usize,
}

/// Backing that keeps the "file" in memory. Failures can be switched on to
/// exercise the store's warning paths without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        let backend = Self::new();
        backend.state.lock().stored = Some(appointments);
        backend
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.state.lock().fail_load = fail;
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.state.lock().fail_save = fail;
    }

    /// Snapshot of what the last successful save wrote.
    pub fn stored(&self) -> Option<Vec<Appointment>> {
        self.state.lock().stored.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.state.lock().save_count
    }
}

impl AppointmentBackend for MemoryBackend {
    fn load_appointments(&self) -> PersistenceResult<Option<Vec<Appointment>>> {
        let state = self.state.lock();
        if state.fail_load {
            return Err(PersistenceError::Io(io::Error::other("memory backend load failure")));
        }
        Ok(state.stored.clone())
    }

    fn save_appointments(&self, appointments: &[Appointment]) -> PersistenceResult<()> {
        let mut state = self.state.lock();
        if state.fail_save {
            return Err(PersistenceError::Io(io::Error::other("memory backend save failure")));
        }
        state.stored = Some(appointments.to_vec());
        state.save_count += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

use crate::config::{LoadFailurePolicy, StoreConfig};
use crate::persistence::{AppointmentBackend, JsonFileBackend, PersistenceError, PersistenceResult};
use crate::validation::{self, AppointmentValidationError};
use crate::Appointment;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(#[from] AppointmentValidationError),
    #[error("no appointment at index {index} (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{0}")]
    Persistence(#[from] PersistenceError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a successful `schedule`, `edit` or `cancel`.
///
/// The in-memory change has happened. `save_error` is set when mirroring it to
/// the backing failed afterwards; the change is then held only in memory.
#[derive(Debug)]
pub struct MutationReport {
    /// Position the operation acted on. For `cancel` it no longer refers to
    /// the removed record.
    pub index: usize,
    /// The stored record for `schedule`/`edit`, the removed one for `cancel`.
    pub appointment: Appointment,
    pub save_error: Option<PersistenceError>,
}

impl MutationReport {
    pub fn is_persisted(&self) -> bool {
        self.save_error.is_none()
    }
}

/// Ordered list of appointments mirrored to a backing after every change.
///
/// The first mutation loads the backing if `load()` has not run yet.
/// Records are addressed by position only. `cancel` shifts every later record
/// down by one, so indices taken before a cancel must not be reused after it.
pub struct AppointmentStore<B = JsonFileBackend> {
    backend: B,
    appointments: Vec<Appointment>,
    loaded: bool,
    on_load_error: LoadFailurePolicy,
}

impl AppointmentStore<JsonFileBackend> {
    /// Store backed by a JSON file at `path`. Nothing is read until `load()`
    /// or the first mutation.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::with_backend(JsonFileBackend::new(path))
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::open(&config.data_file).with_load_failure_policy(config.on_load_error)
    }
}

impl<B: AppointmentBackend> AppointmentStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            appointments: Vec::new(),
            loaded: false,
            on_load_error: LoadFailurePolicy::default(),
        }
    }

    /// Erases the backing type, for callers that pick a backing at runtime.
    pub fn boxed(self) -> AppointmentStore<Box<dyn AppointmentBackend>>
    where
        B: 'static,
    {
        AppointmentStore {
            backend: Box::new(self.backend),
            appointments: self.appointments,
            loaded: self.loaded,
            on_load_error: self.on_load_error,
        }
    }

    pub fn with_load_failure_policy(mut self, policy: LoadFailurePolicy) -> Self {
        self.on_load_error = policy;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn load_failure_policy(&self) -> LoadFailurePolicy {
        self.on_load_error
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, index: usize) -> Option<&Appointment> {
        self.appointments.get(index)
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// True once the backing has been read, explicitly or by the first
    /// mutation, whatever the outcome.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replaces the in-memory list with the backing's content and returns the
    /// number of records read. A missing backing yields an empty list.
    ///
    /// On failure the load failure policy decides whether the current list is
    /// cleared or kept; the error is returned in both cases.
    pub fn load(&mut self) -> PersistenceResult<usize> {
        self.loaded = true;
        match self.backend.load_appointments() {
            Ok(Some(appointments)) => {
                debug!(
                    backing = %self.backend.describe(),
                    count = appointments.len(),
                    "loaded appointments"
                );
                self.appointments = appointments;
                Ok(self.appointments.len())
            }
            Ok(None) => {
                debug!(backing = %self.backend.describe(), "no stored appointments");
                self.appointments.clear();
                Ok(0)
            }
            Err(err) => {
                warn!(
                    backing = %self.backend.describe(),
                    policy = %self.on_load_error,
                    "could not load appointments: {err}"
                );
                if self.on_load_error == LoadFailurePolicy::ResetToEmpty {
                    self.appointments.clear();
                }
                Err(err)
            }
        }
    }

    /// Overwrites the backing with the full in-memory list. The list is left
    /// as it is whether or not the write succeeds.
    pub fn save(&self) -> PersistenceResult<()> {
        match self.backend.save_appointments(&self.appointments) {
            Ok(()) => {
                debug!(
                    backing = %self.backend.describe(),
                    count = self.appointments.len(),
                    "saved appointments"
                );
                Ok(())
            }
            Err(err) => {
                warn!(backing = %self.backend.describe(), "could not save appointments: {err}");
                Err(err)
            }
        }
    }

    /// Appends a new appointment. `patient` and `time` must not be blank.
    /// Identical or overlapping appointments are accepted.
    pub fn schedule(
        &mut self,
        patient: &str,
        doctor: &str,
        date: &str,
        time: &str,
    ) -> StoreResult<MutationReport> {
        validation::validate_new_appointment(patient, time)?;
        self.ensure_loaded()?;

        let appointment = Appointment::new(patient.trim(), doctor.trim(), date.trim(), time.trim());
        self.appointments.push(appointment.clone());
        let index = self.appointments.len() - 1;
        info!(index, patient = %appointment.patient, "scheduled appointment");

        Ok(self.persisted(index, appointment))
    }

    /// Replaces the record at `index`. Blank inputs keep the current value of
    /// that field, so a field can never be cleared through `edit`.
    pub fn edit(
        &mut self,
        index: usize,
        patient: &str,
        doctor: &str,
        date: &str,
        time: &str,
    ) -> StoreResult<MutationReport> {
        self.ensure_loaded()?;
        self.check_index(index)?;

        let merged = self.appointments[index].merged_with(patient, doctor, date, time);
        self.appointments[index] = merged.clone();
        info!(index, patient = %merged.patient, "edited appointment");

        Ok(self.persisted(index, merged))
    }

    /// Removes the record at `index`. Confirmation is the caller's job; once
    /// called the delete is unconditional.
    pub fn cancel(&mut self, index: usize) -> StoreResult<MutationReport> {
        self.ensure_loaded()?;
        self.check_index(index)?;

        let removed = self.appointments.remove(index);
        info!(index, patient = %removed.patient, "cancelled appointment");

        Ok(self.persisted(index, removed))
    }

    /// Loads the backing before the first mutation so a save never replaces
    /// records that were never read. A failed lazy load aborts the mutation.
    fn ensure_loaded(&mut self) -> StoreResult<()> {
        if !self.loaded {
            debug!(backing = %self.backend.describe(), "loading before first mutation");
            self.load()?;
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> StoreResult<()> {
        if index < self.appointments.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.appointments.len(),
            })
        }
    }

    fn persisted(&self, index: usize, appointment: Appointment) -> MutationReport {
        MutationReport {
            index,
            appointment,
            save_error: self.save().err(),
        }
    }
}

use crate::Appointment;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(Box::new(value))
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable mirror of the appointment list. Implementations read and write the
/// whole sequence at once and hold no handle between calls.
pub trait AppointmentBackend {
    /// `Ok(None)` means nothing has been stored yet.
    fn load_appointments(&self) -> PersistenceResult<Option<Vec<Appointment>>>;
    fn save_appointments(&self, appointments: &[Appointment]) -> PersistenceResult<()>;
    /// Human-readable location used in log lines and messages.
    fn describe(&self) -> String;
}

impl<T: AppointmentBackend + ?Sized> AppointmentBackend for Box<T> {
    fn load_appointments(&self) -> PersistenceResult<Option<Vec<Appointment>>> {
        (**self).load_appointments()
    }

    fn save_appointments(&self, appointments: &[Appointment]) -> PersistenceResult<()> {
        (**self).save_appointments(appointments)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    JsonFileBackend, export_appointments_to_csv, import_appointments_from_csv,
    load_appointments_from_json, save_appointments_to_json,
};

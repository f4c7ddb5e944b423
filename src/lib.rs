pub mod appointment;
pub mod config;
pub mod doctor;
pub mod logging;
pub mod persistence;
pub mod store;
pub(crate) mod validation;

pub use appointment::Appointment;
pub use config::{LoadFailurePolicy, StoreConfig};
pub use doctor::Doctor;
pub use persistence::memory::MemoryBackend;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteBackend;
pub use persistence::{
    AppointmentBackend, JsonFileBackend, PersistenceError, PersistenceResult,
    export_appointments_to_csv, import_appointments_from_csv,
};
pub use store::{AppointmentStore, MutationReport, StoreError, StoreResult};
pub use validation::AppointmentValidationError;

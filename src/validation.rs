use thiserror::Error;

/// Raised by `schedule` when a required field is blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required field(s) blank: {}", .missing.join(", "))]
pub struct AppointmentValidationError {
    missing: Vec<&'static str>,
}

impl AppointmentValidationError {
    pub fn missing_fields(&self) -> &[&'static str] {
        &self.missing
    }
}

pub fn validate_new_appointment(patient: &str, time: &str) -> Result<(), AppointmentValidationError> {
    let mut missing = Vec::new();
    if patient.trim().is_empty() {
        missing.push("patient");
    }
    if time.trim().is_empty() {
        missing.push("time");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppointmentValidationError { missing })
    }
}

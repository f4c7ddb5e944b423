use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `strftime` pattern used for the stored `date` field (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single scheduled visit. Every field is kept as the string the front desk
/// entered; only `date` has a conventional shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub patient: String,
    pub doctor: String,
    pub date: String,
    pub time: String,
}

impl Appointment {
    pub fn new(
        patient: impl Into<String>,
        doctor: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            patient: patient.into(),
            doctor: doctor.into(),
            date: date.into(),
            time: time.into(),
        }
    }

    /// Builds the replacement record for an edit. Each blank input keeps the
    /// current value of that field.
    pub fn merged_with(&self, patient: &str, doctor: &str, date: &str, time: &str) -> Self {
        Self {
            patient: keep_if_blank(&self.patient, patient),
            doctor: keep_if_blank(&self.doctor, doctor),
            date: keep_if_blank(&self.date, date),
            time: keep_if_blank(&self.time, time),
        }
    }

    pub fn columns() -> [&'static str; 4] {
        ["patient", "doctor", "date", "time"]
    }

    pub fn values(&self) -> [&str; 4] {
        [
            self.patient.as_str(),
            self.doctor.as_str(),
            self.date.as_str(),
            self.time.as_str(),
        ]
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn keep_if_blank(current: &str, input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        current.to_string()
    } else {
        trimmed.to_string()
    }
}

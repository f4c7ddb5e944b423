use super::{AppointmentBackend, PersistenceError, PersistenceResult};
use crate::Appointment;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "appointments.json";

const JSON_INDENT: &[u8] = b"    ";

/// The default backing: a JSON array of appointment objects in one file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl AppointmentBackend for JsonFileBackend {
    fn load_appointments(&self) -> PersistenceResult<Option<Vec<Appointment>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_appointments_from_json(&self.path).map(Some)
    }

    fn save_appointments(&self, appointments: &[Appointment]) -> PersistenceResult<()> {
        save_appointments_to_json(appointments, &self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Overwrites `path` with the full list, indented by four spaces.
pub fn save_appointments_to_json<P: AsRef<Path>>(
    appointments: &[Appointment],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    appointments.serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_appointments_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Appointment>> {
    let file = File::open(path)?;
    let appointments: Vec<Appointment> = serde_json::from_reader(BufReader::new(file))?;
    Ok(appointments)
}

pub fn export_appointments_to_csv<P: AsRef<Path>>(
    appointments: &[Appointment],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    if appointments.is_empty() {
        // serialize() only emits the header alongside the first record
        writer.write_record(Appointment::columns())?;
    }
    for appointment in appointments {
        writer.serialize(appointment)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads `patient,doctor,date,time` rows. Rows are returned as-is; callers
/// decide how to validate them.
pub fn import_appointments_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Appointment>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);
    let headers = reader.headers()?.clone();
    for column in Appointment::columns() {
        if !headers.iter().any(|h| h == column) {
            return Err(PersistenceError::InvalidData(format!(
                "CSV header is missing column '{column}'"
            )));
        }
    }

    let mut appointments = Vec::new();
    for record in reader.deserialize::<Appointment>() {
        appointments.push(record?);
    }
    Ok(appointments)
}

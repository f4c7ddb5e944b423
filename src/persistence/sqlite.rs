use super::{AppointmentBackend, PersistenceResult};
use crate::Appointment;
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

/// Keeps the list in a single SQLite table, one row per position.
pub struct SqliteBackend {
    path: PathBuf,
    connection: Mutex<Connection>,
}

impl SqliteBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path.as_ref())?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS appointments (
                position INTEGER PRIMARY KEY,
                appointment_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

impl AppointmentBackend for SqliteBackend {
    fn load_appointments(&self) -> PersistenceResult<Option<Vec<Appointment>>> {
        let conn = self.connection.lock();
        let mut stmt =
            conn.prepare("SELECT appointment_json FROM appointments ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut appointments = Vec::new();
        for json in rows {
            let json = json?;
            appointments.push(serde_json::from_str::<Appointment>(&json)?);
        }

        if appointments.is_empty() {
            return Ok(None);
        }
        Ok(Some(appointments))
    }

    fn save_appointments(&self, appointments: &[Appointment]) -> PersistenceResult<()> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM appointments", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO appointments (position, appointment_json) VALUES (?1, ?2)")?;
            for (position, appointment) in appointments.iter().enumerate() {
                let json = serde_json::to_string(appointment)?;
                stmt.execute(params![position as i64, json])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

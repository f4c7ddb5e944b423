use crate::persistence::file::DEFAULT_DATA_FILE;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DATA_FILE_ENV: &str = "APPOINTMENT_DESK_DATA_FILE";
pub const ON_LOAD_ERROR_ENV: &str = "APPOINTMENT_DESK_ON_LOAD_ERROR";

/// What `load()` does to the in-memory list when the backing cannot be read
/// or parsed. The error is returned either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadFailurePolicy {
    /// Discard whatever is in memory and continue with an empty list.
    #[default]
    ResetToEmpty,
    /// Leave the in-memory list untouched.
    KeepCurrent,
}

impl LoadFailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadFailurePolicy::ResetToEmpty => "reset",
            LoadFailurePolicy::KeepCurrent => "keep",
        }
    }
}

impl fmt::Display for LoadFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" | "reset_to_empty" => Ok(LoadFailurePolicy::ResetToEmpty),
            "keep" | "keep_current" => Ok(LoadFailurePolicy::KeepCurrent),
            other => Err(format!(
                "invalid load failure policy '{other}' (expected 'reset' or 'keep')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_file: PathBuf,
    pub on_load_error: LoadFailurePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            on_load_error: LoadFailurePolicy::default(),
        }
    }
}

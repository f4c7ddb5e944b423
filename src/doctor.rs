use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Doctors offered by the front desk. The store accepts any label; this
/// roster is what the presentation layer lets the user pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Doctor {
    #[default]
    PerezCardiology,
    GomezPediatrics,
}

impl Doctor {
    pub const ALL: [Doctor; 2] = [Doctor::PerezCardiology, Doctor::GomezPediatrics];

    pub fn label(self) -> &'static str {
        match self {
            Doctor::PerezCardiology => "Dr. Pérez - Cardiología",
            Doctor::GomezPediatrics => "Dra. Gómez - Pediatría",
        }
    }

    /// 1-based position in the roster, as shown by `doctors`.
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|d| *d == self)
            .map(|idx| idx + 1)
            .unwrap_or(1)
    }

    pub fn variants() -> impl Iterator<Item = (usize, &'static str)> {
        Self::ALL.iter().map(|d| (d.number(), d.label()))
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown doctor '{0}'")]
pub struct UnknownDoctor(pub String);

impl FromStr for Doctor {
    type Err = UnknownDoctor;

    /// Accepts a full roster label or its 1-based number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(number) = trimmed.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(|idx| Self::ALL.get(idx).copied())
                .ok_or_else(|| UnknownDoctor(trimmed.to_string()));
        }
        Self::from_label(trimmed).ok_or_else(|| UnknownDoctor(trimmed.to_string()))
    }
}

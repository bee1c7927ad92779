use std::fmt;

/// Errors raised while allocating a single week.
///
/// Configuration and data errors abort only the week they occur in; the
/// multi-week runner reports them per week and keeps going. `Invariant`
/// means the engine itself produced an inconsistent result and is kept
/// separate from the bad-input variants so callers can tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No working-day calendar entry exists for (year, week, locality).
    MissingCalendarEntry {
        year: i32,
        week: u32,
        locality: String,
    },
    /// An assignment referenced a capacity tier absent from the catalog.
    UnknownTier(String),
    /// A tier percentage outside (0, 1].
    InvalidTierPercentage { name: String, percentage: f64 },
    /// A resource or demand record failed ingestion validation.
    InvalidRecord(String),
    /// Internal-consistency failure; indicates a bug in the engine, not bad
    /// input. Fatal to the week's computation.
    Invariant(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MissingCalendarEntry {
                year,
                week,
                locality,
            } => write!(
                f,
                "no calendar entry for year {year} week {week} locality '{locality}'"
            ),
            EngineError::UnknownTier(name) => {
                write!(f, "capacity tier '{name}' is not defined in the catalog")
            }
            EngineError::InvalidTierPercentage { name, percentage } => write!(
                f,
                "capacity tier '{name}' has percentage {percentage} outside (0, 1]"
            ),
            EngineError::InvalidRecord(msg) => write!(f, "invalid record: {msg}"),
            EngineError::Invariant(msg) => write!(f, "internal consistency failure: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// True for the configuration/data taxonomy; false for invariant
    /// violations.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, EngineError::Invariant(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

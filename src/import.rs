use crate::calendar::{WeekCalendar, WeekOfYear, WeekProfile};
use crate::demand::{Demand, DemandKey};
use crate::resource::Resource;
use crate::validation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum ImportError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    Csv(csv::Error),
    InvalidData(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Serialization(err) => write!(f, "serialization error: {err}"),
            ImportError::Io(err) => write!(f, "io error: {err}"),
            ImportError::Csv(err) => write!(f, "csv error: {err}"),
            ImportError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<SerdeJsonError> for ImportError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for ImportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

pub fn validate_inputs(resources: &[Resource], demands: &[Demand]) -> ImportResult<()> {
    validation::validate_resources(resources)
        .map_err(|err| ImportError::InvalidData(err.to_string()))?;
    validation::validate_demands(demands)
        .map_err(|err| ImportError::InvalidData(err.to_string()))
}

/// Everything one week's allocation consumes, as a JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekSnapshot {
    pub week: WeekOfYear,
    pub resources: Vec<Resource>,
    pub demands: Vec<Demand>,
}

pub fn save_week_snapshot<P: AsRef<Path>>(snapshot: &WeekSnapshot, path: P) -> ImportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

pub fn load_week_snapshot<P: AsRef<Path>>(path: P) -> ImportResult<WeekSnapshot> {
    let file = File::open(path)?;
    let snapshot: WeekSnapshot = serde_json::from_reader(file)?;
    validation::validate_resources(&snapshot.resources)
        .map_err(|err| ImportError::InvalidData(err.to_string()))?;
    validation::validate_demands(&snapshot.demands)
        .map_err(|err| ImportError::InvalidData(err.to_string()))?;
    Ok(snapshot)
}

#[derive(Debug, Serialize, Deserialize)]
struct ResourceCsvRecord {
    id: String,
    platform: String,
    locality: String,
    /// Semicolon-separated case types.
    skills: String,
    /// Semicolon-separated states; `any` is the wildcard.
    states: String,
    start_date: NaiveDate,
    end_date: String,
    tier: String,
    placeholder: String,
}

fn split_list(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToOwned::to_owned)
}

fn opt_field(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

impl ResourceCsvRecord {
    fn into_resource(self) -> ImportResult<Resource> {
        let end_date = match opt_field(&self.end_date) {
            Some(raw) => Some(raw.parse::<NaiveDate>().map_err(|_| {
                ImportError::InvalidData(format!(
                    "resource {} has unparseable end_date '{raw}'",
                    self.id
                ))
            })?),
            None => None,
        };

        let mut resource = Resource::new(self.id, self.platform, self.locality, self.start_date)
            .with_skills(split_list(&self.skills))
            .with_states(split_list(&self.states));
        resource.end_date = end_date;
        resource.tier = opt_field(&self.tier).map(ToOwned::to_owned);
        resource.placeholder = matches!(self.placeholder.trim(), "true" | "1" | "yes");
        Ok(resource)
    }
}

pub fn load_resources_from_csv<P: AsRef<Path>>(path: P) -> ImportResult<Vec<Resource>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut resources = Vec::new();
    for record in reader.deserialize::<ResourceCsvRecord>() {
        resources.push(record?.into_resource()?);
    }
    validation::validate_resources(&resources)
        .map_err(|err| ImportError::InvalidData(err.to_string()))?;
    Ok(resources)
}

#[derive(Debug, Serialize, Deserialize)]
struct DemandCsvRecord {
    platform: String,
    locality: String,
    state: String,
    case_type: String,
    line_of_business: String,
    monthly_forecast: u32,
    weekly_forecast: u32,
    hourly_rate: f64,
}

pub fn load_demands_from_csv<P: AsRef<Path>>(path: P) -> ImportResult<Vec<Demand>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut demands = Vec::new();
    for record in reader.deserialize::<DemandCsvRecord>() {
        let record = record?;
        let key = DemandKey::new(
            record.platform,
            record.locality,
            record.state,
            record.case_type,
            record.line_of_business,
        );
        demands.push(
            Demand::new(key, record.monthly_forecast, record.weekly_forecast)
                .with_hourly_rate(record.hourly_rate),
        );
    }
    validation::validate_demands(&demands)
        .map_err(|err| ImportError::InvalidData(err.to_string()))?;
    Ok(demands)
}

#[derive(Debug, Serialize, Deserialize)]
struct CalendarCsvRecord {
    year: i32,
    week: u32,
    locality: String,
    working_days: u32,
    hours_per_day: f64,
    shrinkage: f64,
}

pub fn load_week_calendar_from_csv<P: AsRef<Path>>(path: P) -> ImportResult<WeekCalendar> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut calendar = WeekCalendar::new();
    for record in reader.deserialize::<CalendarCsvRecord>() {
        let record = record?;
        if record.shrinkage < 0.0 || record.shrinkage >= 1.0 {
            return Err(ImportError::InvalidData(format!(
                "calendar entry {}-W{:02} '{}' has shrinkage {} outside [0, 1)",
                record.year, record.week, record.locality, record.shrinkage
            )));
        }
        if record.hours_per_day < 0.0 {
            return Err(ImportError::InvalidData(format!(
                "calendar entry {}-W{:02} '{}' has negative hours_per_day",
                record.year, record.week, record.locality
            )));
        }
        calendar.insert(
            WeekOfYear::new(record.year, record.week),
            record.locality,
            WeekProfile::new(record.working_days, record.hours_per_day, record.shrinkage),
        );
    }
    Ok(calendar)
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite identity of one forecasted unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DemandKey {
    pub platform: String,
    pub locality: String,
    pub state: String,
    pub case_type: String,
    pub line_of_business: String,
}

impl DemandKey {
    pub fn new(
        platform: impl Into<String>,
        locality: impl Into<String>,
        state: impl Into<String>,
        case_type: impl Into<String>,
        line_of_business: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            locality: locality.into(),
            state: state.into(),
            case_type: case_type.into(),
            line_of_business: line_of_business.into(),
        }
    }
}

impl fmt::Display for DemandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.platform, self.locality, self.state, self.case_type, self.line_of_business
        )
    }
}

/// One schedulable unit of forecasted work for a planning week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub key: DemandKey,
    /// Total forecast quantity for the month the week belongs to.
    pub monthly_forecast: u32,
    /// Calendar-weighted share of the monthly forecast for this week,
    /// produced by the forecast distributor.
    pub weekly_forecast: u32,
    /// Target throughput per productive hour; feeds the capacity model.
    pub hourly_rate: f64,
}

impl Demand {
    pub fn new(key: DemandKey, monthly_forecast: u32, weekly_forecast: u32) -> Self {
        Self {
            key,
            monthly_forecast,
            weekly_forecast,
            hourly_rate: 1.0,
        }
    }

    pub fn with_hourly_rate(mut self, rate: f64) -> Self {
        self.hourly_rate = rate;
        self
    }
}

/// Per-week mutable accumulator for one demand: proportional target, the
/// headcount assigned so far, and the remaining gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandStatus {
    pub ideal: f64,
    pub current: u32,
    pub gap: f64,
}

impl DemandStatus {
    pub fn with_ideal(ideal: f64) -> Self {
        Self {
            ideal,
            current: 0,
            gap: ideal,
        }
    }

    /// Record one assignment; gap is recomputed immediately.
    pub fn record_assignment(&mut self) {
        self.current += 1;
        self.gap = self.ideal - self.current as f64;
    }

    /// Fractional remainder of the ideal target, `ideal - floor(ideal)`.
    pub fn fractional_remainder(&self) -> f64 {
        self.ideal - self.ideal.floor()
    }

    /// Whether another assignment still fits under the rounded-up ideal.
    pub fn has_fractional_headroom(&self) -> bool {
        (self.current as f64) < self.ideal.ceil()
    }
}

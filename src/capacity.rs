use crate::calendar::WeekProfile;
use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog of named capacity tiers mapping to a productivity percentage in
/// (0, 1]. Tiers are presets, not a fixed enum; deployments add their own
/// ramp stages alongside the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierCatalog {
    tiers: HashMap<String, f64>,
}

pub const FULL_PRODUCTION: &str = "Full Production";

impl Default for TierCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TierCatalog {
    pub fn empty() -> Self {
        Self {
            tiers: HashMap::new(),
        }
    }

    /// Standard ramp-up ladder plus full production.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::empty();
        catalog.tiers.insert(FULL_PRODUCTION.to_string(), 1.0);
        catalog.tiers.insert("75% Ramp".to_string(), 0.75);
        catalog.tiers.insert("50% Ramp".to_string(), 0.50);
        catalog.tiers.insert("25% Ramp".to_string(), 0.25);
        catalog
    }

    /// Define or replace a tier. Percentage must lie in (0, 1].
    pub fn define(&mut self, name: impl Into<String>, percentage: f64) -> EngineResult<()> {
        let name = name.into();
        if !percentage.is_finite() || percentage <= 0.0 || percentage > 1.0 {
            return Err(EngineError::InvalidTierPercentage { name, percentage });
        }
        self.tiers.insert(name, percentage);
        Ok(())
    }

    /// Look up a tier's percentage. A missing tier is a configuration
    /// error, never a guessed default.
    pub fn percentage(&self, name: &str) -> EngineResult<f64> {
        self.tiers
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::UnknownTier(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tiers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }
}

/// Weekly output a single assignment contributes:
/// `percentage × working_days × hours_per_day × (1 − shrinkage) × rate`.
///
/// Pure and tier-agnostic beyond the percentage input.
pub fn weekly_output(percentage: f64, profile: &WeekProfile, hourly_rate: f64) -> f64 {
    percentage * profile.productive_hours() * hourly_rate
}

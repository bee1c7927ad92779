use crate::capacity::FULL_PRODUCTION;
use serde::{Deserialize, Serialize};

/// Component weights for the Phase B composite score. Each component is
/// normalized to [0, 1] before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub urgency: f64,
    pub exclusivity: f64,
    pub state_match: f64,
    pub skill_match: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            urgency: 0.40,
            exclusivity: 0.35,
            state_match: 0.15,
            skill_match: 0.10,
        }
    }
}

/// Thresholds classifying how far a demand's final headcount sits from its
/// ideal, as a fraction of the ideal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaffingBands {
    pub tight: f64,
    pub critical: f64,
}

impl Default for StaffingBands {
    fn default() -> Self {
        Self {
            tight: 0.05,
            critical: 0.10,
        }
    }
}

/// Where a demand's final staffing landed relative to its ideal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffingBand {
    Balanced,
    Tight,
    Critical,
}

impl StaffingBands {
    /// Classify a relative deviation `|ideal - current| / ideal`.
    pub fn classify(&self, ideal: f64, current: u32) -> StaffingBand {
        if ideal <= 0.0 {
            return StaffingBand::Balanced;
        }
        let deviation = (ideal - current as f64).abs() / ideal;
        if deviation > self.critical {
            StaffingBand::Critical
        } else if deviation > self.tight {
            StaffingBand::Tight
        } else {
            StaffingBand::Balanced
        }
    }
}

/// Policy configuration for one engine run. Passed in explicitly at call
/// time so a single process can run weeks under different policy versions
/// concurrently; nothing in the engine reads ambient global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub score_weights: ScoreWeights,
    pub staffing_bands: StaffingBands,
    /// Tolerance for the fairness-sum invariant check.
    pub fairness_tolerance: f64,
    /// Tier applied to resources that do not name one.
    pub default_tier: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            score_weights: ScoreWeights::default(),
            staffing_bands: StaffingBands::default(),
            fairness_tolerance: 1e-6,
            default_tier: FULL_PRODUCTION.to_string(),
        }
    }
}

use crate::demand::Demand;
use crate::error::{EngineError, EngineResult};
use crate::resource::Resource;
use std::collections::HashMap;

/// Proportional fair-share headcount targets, one per demand, computed
/// independently within each locality group (a domestic resource cannot
/// serve a global demand, so the pools never mix).
///
/// `ideal(d) = resources_in_locality × weekly_forecast(d) / Σ forecast`,
/// deliberately left fractional; integer headcounts emerge from the
/// allocation phases, not from rounding here.
pub fn ideal_shares(resources: &[&Resource], demands: &[Demand]) -> Vec<f64> {
    let mut resources_by_locality: HashMap<&str, usize> = HashMap::new();
    for resource in resources {
        *resources_by_locality
            .entry(resource.locality.as_str())
            .or_insert(0) += 1;
    }

    let mut forecast_by_locality: HashMap<&str, u64> = HashMap::new();
    for demand in demands {
        *forecast_by_locality
            .entry(demand.key.locality.as_str())
            .or_insert(0) += demand.weekly_forecast as u64;
    }

    demands
        .iter()
        .map(|demand| {
            let locality = demand.key.locality.as_str();
            let total = forecast_by_locality.get(locality).copied().unwrap_or(0);
            if total == 0 {
                return 0.0;
            }
            let headcount = resources_by_locality.get(locality).copied().unwrap_or(0);
            headcount as f64 * demand.weekly_forecast as f64 / total as f64
        })
        .collect()
}

/// The fairness-sum property: per locality, the ideals must add up to the
/// available headcount (within tolerance). A violation is an engine bug,
/// not bad input, so it surfaces as `Invariant`.
pub fn check_fairness_sum(
    resources: &[&Resource],
    demands: &[Demand],
    ideals: &[f64],
    tolerance: f64,
) -> EngineResult<()> {
    let mut resources_by_locality: HashMap<&str, usize> = HashMap::new();
    for resource in resources {
        *resources_by_locality
            .entry(resource.locality.as_str())
            .or_insert(0) += 1;
    }

    let mut ideal_sum_by_locality: HashMap<&str, f64> = HashMap::new();
    let mut forecast_by_locality: HashMap<&str, u64> = HashMap::new();
    for (demand, ideal) in demands.iter().zip(ideals) {
        let locality = demand.key.locality.as_str();
        *ideal_sum_by_locality.entry(locality).or_insert(0.0) += ideal;
        *forecast_by_locality.entry(locality).or_insert(0) += demand.weekly_forecast as u64;
    }

    for (locality, sum) in &ideal_sum_by_locality {
        // A locality with zero forecast legitimately sums to zero.
        if forecast_by_locality.get(locality).copied().unwrap_or(0) == 0 {
            continue;
        }
        let headcount = resources_by_locality.get(locality).copied().unwrap_or(0) as f64;
        if (sum - headcount).abs() > tolerance {
            return Err(EngineError::Invariant(format!(
                "ideal shares for locality '{locality}' sum to {sum:.6}, expected {headcount}"
            )));
        }
    }
    Ok(())
}

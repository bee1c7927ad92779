use crate::calendar::{WeekCalendar, WeekOfYear, WeekProfile};
use crate::capacity::{self, TierCatalog};
use crate::config::{EngineConfig, StaffingBand};
use crate::demand::{Demand, DemandKey, DemandStatus};
use crate::eligibility::{EligibilityIndex, StateMatch, state_match};
use crate::error::{EngineError, EngineResult};
use crate::ideal::{check_fairness_sum, ideal_shares};
use crate::resource::{Resource, available_resources};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::collections::HashMap;
use tracing::{debug, warn};

const EPSILON: f64 = 1e-9;

/// Output record: one resource covering one demand for one week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyAssignment {
    pub resource_id: String,
    pub demand: DemandKey,
    pub week: WeekOfYear,
    pub tier: String,
    pub weekly_output: f64,
}

/// Final per-demand accounting for auditability by external collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandSnapshot {
    pub key: DemandKey,
    pub ideal: f64,
    pub current: u32,
    pub gap: f64,
    pub band: StaffingBand,
    /// No eligible resource existed this week: an unfillable shortfall.
    pub unfillable: bool,
}

/// Result of one week's allocation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekOutcome {
    pub week: WeekOfYear,
    pub assignments: Vec<WeeklyAssignment>,
    pub demands: Vec<DemandSnapshot>,
    /// Resources left without a legal destination; eligibility is an
    /// absolute constraint, never a soft preference.
    pub unallocated_resources: Vec<String>,
}

/// Snapshot of everything one week's pass consumes.
#[derive(Debug, Clone)]
pub struct WeekInput {
    pub week: WeekOfYear,
    pub resources: Vec<Resource>,
    pub demands: Vec<Demand>,
}

#[derive(Debug, Clone)]
pub struct WeekResult {
    pub week: WeekOfYear,
    pub outcome: EngineResult<WeekOutcome>,
}

/// The allocation pass advances through these states strictly forward; no
/// phase re-enters an earlier one within a week's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PassState {
    Unstarted,
    ExclusiveAllocated,
    ScoredAllocated,
    RemainderAllocated,
    Done,
}

/// Heap entry for Phase B. Scores are computed at push time; entries made
/// stale by later assignments are discarded when popped instead of being
/// mutated in place.
#[derive(Debug, Clone, Copy)]
struct ScoredPair {
    score: f64,
    resource: usize,
    demand: usize,
}

impl PartialEq for ScoredPair {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredPair {}

impl PartialOrd for ScoredPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredPair {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on score; on ties the earlier resource, then the earlier
        // demand, wins so re-runs of an identical snapshot are identical.
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.resource.cmp(&self.resource))
            .then_with(|| other.demand.cmp(&self.demand))
    }
}

pub struct AllocationEngine<'a> {
    calendar: &'a WeekCalendar,
    tiers: &'a TierCatalog,
    config: &'a EngineConfig,
}

impl<'a> AllocationEngine<'a> {
    pub fn new(calendar: &'a WeekCalendar, tiers: &'a TierCatalog, config: &'a EngineConfig) -> Self {
        Self {
            calendar,
            tiers,
            config,
        }
    }

    /// Allocate several weeks in parallel. Weeks are independent; each owns
    /// its snapshot, and one week's configuration or data error never
    /// aborts the others.
    pub fn allocate_weeks(&self, inputs: &[WeekInput]) -> Vec<WeekResult> {
        inputs
            .par_iter()
            .map(|input| WeekResult {
                week: input.week,
                outcome: self.allocate_week(input.week, &input.resources, &input.demands),
            })
            .collect()
    }

    /// Run the three-phase pass for a single week. Purely computational and
    /// single-threaded; either completes or the partial result is discarded
    /// wholesale via the error return.
    pub fn allocate_week(
        &self,
        week: WeekOfYear,
        resources: &[Resource],
        demands: &[Demand],
    ) -> EngineResult<WeekOutcome> {
        let mut state = PassState::Unstarted;
        let active = available_resources(resources, week);
        let index = EligibilityIndex::build(&active, demands);
        debug!(
            %week,
            resources = active.len(),
            demands = demands.len(),
            pairs = index.pair_count(),
            "eligibility index built"
        );

        let ideals = ideal_shares(&active, demands);
        check_fairness_sum(&active, demands, &ideals, self.config.fairness_tolerance)?;

        // Resolve every tier percentage and calendar profile up front so a
        // configuration error aborts before any demand state is mutated.
        let percentages = self.resolve_tier_percentages(&active)?;
        let profiles = self.resolve_week_profiles(week, demands)?;

        let mut statuses: Vec<DemandStatus> =
            ideals.iter().map(|&i| DemandStatus::with_ideal(i)).collect();
        let mut allocated = vec![false; active.len()];
        let mut assignments = Vec::new();

        // Phase A - exclusive allocation. A resource with a single legal
        // destination must go there; scoring it later can only lose.
        for r_idx in 0..active.len() {
            if allocated[r_idx] {
                continue;
            }
            if let [d_idx] = index.demands_for(r_idx) {
                self.assign(
                    week,
                    &active,
                    demands,
                    &index,
                    &percentages,
                    &profiles,
                    &mut statuses,
                    &mut allocated,
                    &mut assignments,
                    r_idx,
                    *d_idx,
                )?;
            }
        }
        state = advance(state, PassState::ExclusiveAllocated);
        debug!(%week, assigned = assignments.len(), "exclusive phase complete");

        // Phase B - scored allocation over the remaining eligible pairs.
        let mut heap: BinaryHeap<ScoredPair> = BinaryHeap::new();
        for r_idx in 0..active.len() {
            if allocated[r_idx] {
                continue;
            }
            for &d_idx in index.demands_for(r_idx) {
                heap.push(ScoredPair {
                    score: self.score_pair(active[r_idx], &demands[d_idx], &statuses[d_idx], &index, r_idx),
                    resource: r_idx,
                    demand: d_idx,
                });
            }
        }

        while let Some(pair) = heap.pop() {
            // Lazy invalidation: discard entries staled by earlier pops.
            if allocated[pair.resource] {
                continue;
            }
            // Phase B never pushes a demand past its ideal; fractional
            // leftovers are Phase C's to distribute.
            if statuses[pair.demand].current as f64 + 1.0 > statuses[pair.demand].ideal + EPSILON {
                continue;
            }
            self.assign(
                week,
                &active,
                demands,
                &index,
                &percentages,
                &profiles,
                &mut statuses,
                &mut allocated,
                &mut assignments,
                pair.resource,
                pair.demand,
            )?;
        }
        state = advance(state, PassState::ScoredAllocated);
        debug!(%week, assigned = assignments.len(), "scored phase complete");

        // Phase C - distribute the still-unallocated resources to the
        // largest fractional remainders.
        let mut ranking: Vec<usize> = (0..demands.len()).collect();
        ranking.sort_by(|&a, &b| {
            statuses[b]
                .fractional_remainder()
                .partial_cmp(&statuses[a].fractional_remainder())
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    statuses[b]
                        .gap
                        .partial_cmp(&statuses[a].gap)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.cmp(&b))
        });

        for r_idx in 0..active.len() {
            if allocated[r_idx] {
                continue;
            }
            if index.demands_for(r_idx).is_empty() {
                continue; // reported as surplus below, never forced
            }
            let preferred = ranking
                .iter()
                .copied()
                .find(|&d_idx| {
                    index.contains(r_idx, d_idx) && statuses[d_idx].has_fractional_headroom()
                })
                .or_else(|| {
                    // Every eligible demand is already satisfied;
                    // over-allocation is unavoidable here.
                    ranking
                        .iter()
                        .copied()
                        .find(|&d_idx| index.contains(r_idx, d_idx))
                });
            if let Some(d_idx) = preferred {
                self.assign(
                    week,
                    &active,
                    demands,
                    &index,
                    &percentages,
                    &profiles,
                    &mut statuses,
                    &mut allocated,
                    &mut assignments,
                    r_idx,
                    d_idx,
                )?;
            }
        }
        state = advance(state, PassState::RemainderAllocated);

        let unallocated_resources: Vec<String> = active
            .iter()
            .enumerate()
            .filter(|(r_idx, _)| !allocated[*r_idx])
            .map(|(_, r)| r.id.clone())
            .collect();
        for id in &unallocated_resources {
            warn!(%week, resource = %id, "resource has no eligible demand; left unallocated");
        }

        let snapshots: Vec<DemandSnapshot> = demands
            .iter()
            .enumerate()
            .map(|(d_idx, demand)| {
                let status = &statuses[d_idx];
                let unfillable = index.resources_for(d_idx).is_empty();
                if unfillable {
                    warn!(%week, demand = %demand.key, "demand has no eligible resource");
                }
                DemandSnapshot {
                    key: demand.key.clone(),
                    ideal: status.ideal,
                    current: status.current,
                    gap: status.gap,
                    band: self
                        .config
                        .staffing_bands
                        .classify(status.ideal, status.current),
                    unfillable,
                }
            })
            .collect();

        let _ = advance(state, PassState::Done);
        Ok(WeekOutcome {
            week,
            assignments,
            demands: snapshots,
            unallocated_resources,
        })
    }

    /// Composite Phase B score, each component normalized to [0, 1].
    fn score_pair(
        &self,
        resource: &Resource,
        demand: &Demand,
        status: &DemandStatus,
        index: &EligibilityIndex,
        r_idx: usize,
    ) -> f64 {
        let weights = &self.config.score_weights;

        let urgency = if status.ideal > 0.0 {
            (status.gap / status.ideal).clamp(0.0, 1.0)
        } else {
            0.0
        };

        // Fewer remaining options, higher priority: do not strand the
        // inflexible resource on a later, worse match.
        let exclusivity = 1.0 / index.demands_for(r_idx).len().max(1) as f64;

        let state_quality = match state_match(resource, demand) {
            Some(StateMatch::Exact) => 1.0,
            Some(StateMatch::Wildcard) => 0.5,
            None => 0.0,
        };

        let skill_quality = if resource.skills.len() == 1 { 1.0 } else { 0.5 };

        weights.urgency * urgency
            + weights.exclusivity * exclusivity
            + weights.state_match * state_quality
            + weights.skill_match * skill_quality
    }

    fn resolve_tier_percentages(&self, resources: &[&Resource]) -> EngineResult<Vec<(String, f64)>> {
        resources
            .iter()
            .map(|resource| {
                let name = resource
                    .tier
                    .as_deref()
                    .unwrap_or(self.config.default_tier.as_str());
                Ok((name.to_string(), self.tiers.percentage(name)?))
            })
            .collect()
    }

    fn resolve_week_profiles(
        &self,
        week: WeekOfYear,
        demands: &[Demand],
    ) -> EngineResult<HashMap<String, WeekProfile>> {
        let mut profiles = HashMap::new();
        for demand in demands {
            let locality = &demand.key.locality;
            if !profiles.contains_key(locality) {
                let profile = *self.calendar.profile(week, locality)?;
                profiles.insert(locality.clone(), profile);
            }
        }
        Ok(profiles)
    }

    #[allow(clippy::too_many_arguments)]
    fn assign(
        &self,
        week: WeekOfYear,
        resources: &[&Resource],
        demands: &[Demand],
        index: &EligibilityIndex,
        percentages: &[(String, f64)],
        profiles: &HashMap<String, WeekProfile>,
        statuses: &mut [DemandStatus],
        allocated: &mut [bool],
        assignments: &mut Vec<WeeklyAssignment>,
        r_idx: usize,
        d_idx: usize,
    ) -> EngineResult<()> {
        if !index.contains(r_idx, d_idx) {
            return Err(EngineError::Invariant(format!(
                "attempted assignment of '{}' to {} outside the eligibility index",
                resources[r_idx].id, demands[d_idx].key
            )));
        }
        if allocated[r_idx] {
            return Err(EngineError::Invariant(format!(
                "resource '{}' would be double-booked in {week}",
                resources[r_idx].id
            )));
        }

        let demand = &demands[d_idx];
        let (tier, percentage) = &percentages[r_idx];
        let profile = profiles.get(&demand.key.locality).ok_or_else(|| {
            EngineError::Invariant(format!(
                "week profile for locality '{}' vanished mid-pass",
                demand.key.locality
            ))
        })?;

        allocated[r_idx] = true;
        statuses[d_idx].record_assignment();
        assignments.push(WeeklyAssignment {
            resource_id: resources[r_idx].id.clone(),
            demand: demand.key.clone(),
            week,
            tier: tier.clone(),
            weekly_output: capacity::weekly_output(*percentage, profile, demand.hourly_rate),
        });
        Ok(())
    }
}

fn advance(from: PassState, to: PassState) -> PassState {
    debug_assert!(from < to, "allocation phases only move forward");
    to
}

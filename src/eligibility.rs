use crate::demand::Demand;
use crate::resource::{ANY_STATE, Resource};
use std::collections::HashSet;

/// How a pair satisfied the state predicate; Phase B scoring weights an
/// exact state hit above a wildcard one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMatch {
    Exact,
    Wildcard,
}

/// Evaluate the state predicate on its own. `None` means the pair is not
/// state-compatible at all.
pub fn state_match(resource: &Resource, demand: &Demand) -> Option<StateMatch> {
    if resource.states.contains(demand.key.state.as_str()) {
        return Some(StateMatch::Exact);
    }
    if resource.has_any_state() || demand.key.state == ANY_STATE {
        return Some(StateMatch::Wildcard);
    }
    None
}

/// The full three-predicate legality test. The predicates are an unordered
/// conjunction; platform goes first because it is the cheapest and most
/// selective filter.
pub fn is_eligible(resource: &Resource, demand: &Demand) -> bool {
    resource.platform == demand.key.platform
        && resource.skills.contains(demand.key.case_type.as_str())
        && state_match(resource, demand).is_some()
}

/// Sparse bidirectional index of legal (resource, demand) pairs for one
/// week, addressed by position in the input slices. A pair is present iff
/// all three predicates hold; there is no partial-credit eligibility.
#[derive(Debug, Clone)]
pub struct EligibilityIndex {
    by_resource: Vec<Vec<usize>>,
    by_demand: Vec<Vec<usize>>,
    pairs: HashSet<(usize, usize)>,
}

impl EligibilityIndex {
    /// Evaluate every pair once. Pure function of its inputs; rebuilt fresh
    /// each week from that week's filtered resource set.
    pub fn build(resources: &[&Resource], demands: &[Demand]) -> Self {
        let mut by_resource = vec![Vec::new(); resources.len()];
        let mut by_demand = vec![Vec::new(); demands.len()];
        let mut pairs = HashSet::new();

        for (r_idx, resource) in resources.iter().enumerate() {
            for (d_idx, demand) in demands.iter().enumerate() {
                if is_eligible(resource, demand) {
                    by_resource[r_idx].push(d_idx);
                    by_demand[d_idx].push(r_idx);
                    pairs.insert((r_idx, d_idx));
                }
            }
        }

        Self {
            by_resource,
            by_demand,
            pairs,
        }
    }

    /// All demands reachable from a resource, in demand order.
    pub fn demands_for(&self, resource_idx: usize) -> &[usize] {
        &self.by_resource[resource_idx]
    }

    /// All resources reachable from a demand, in resource order.
    pub fn resources_for(&self, demand_idx: usize) -> &[usize] {
        &self.by_demand[demand_idx]
    }

    /// O(1) membership test for a specific pair.
    pub fn contains(&self, resource_idx: usize, demand_idx: usize) -> bool {
        self.pairs.contains(&(resource_idx, demand_idx))
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn resource_count(&self) -> usize {
        self.by_resource.len()
    }

    pub fn demand_count(&self) -> usize {
        self.by_demand.len()
    }
}

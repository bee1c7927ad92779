use allocation_tool::{ANY_STATE, Demand, DemandKey, EligibilityIndex, Resource, is_eligible};
use chrono::NaiveDate;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn resource(id: &str, platform: &str, skills: &[&str], states: &[&str]) -> Resource {
    Resource::new(id, platform, "Domestic", start())
        .with_skills(skills.iter().copied())
        .with_states(states.iter().copied())
}

fn demand(platform: &str, state: &str, case_type: &str) -> Demand {
    Demand::new(
        DemandKey::new(platform, "Domestic", state, case_type, "LOB1"),
        400,
        100,
    )
}

#[test]
fn pair_exists_iff_all_three_predicates_hold() {
    let resources = vec![
        resource("R1", "CLM", &["FTC"], &["FL"]),
        resource("R2", "CLM", &["FTC", "ADJ"], &["FL", "GA"]),
        resource("R3", "PIP", &["FTC"], &[ANY_STATE]),
        resource("R4", "CLM", &["ADJ"], &[ANY_STATE]),
    ];
    let demands = vec![
        demand("CLM", "FL", "FTC"),
        demand("CLM", "GA", "ADJ"),
        demand("PIP", "TX", "FTC"),
        demand("CLM", ANY_STATE, "FTC"),
    ];

    let refs: Vec<&Resource> = resources.iter().collect();
    let index = EligibilityIndex::build(&refs, &demands);

    for (r_idx, r) in resources.iter().enumerate() {
        for (d_idx, d) in demands.iter().enumerate() {
            let expected = r.platform == d.key.platform
                && r.skills.contains(&d.key.case_type)
                && (r.states.contains(&d.key.state)
                    || r.states.contains(ANY_STATE)
                    || d.key.state == ANY_STATE);
            assert_eq!(
                index.contains(r_idx, d_idx),
                expected,
                "pair ({}, {}) mismatch",
                r.id,
                d.key
            );
            assert_eq!(is_eligible(r, d), expected);
        }
    }
}

#[test]
fn index_is_bidirectionally_consistent() {
    let resources = vec![
        resource("R1", "CLM", &["FTC"], &["FL"]),
        resource("R2", "CLM", &["FTC", "ADJ"], &[ANY_STATE]),
    ];
    let demands = vec![demand("CLM", "FL", "FTC"), demand("CLM", "GA", "ADJ")];

    let refs: Vec<&Resource> = resources.iter().collect();
    let index = EligibilityIndex::build(&refs, &demands);

    for r_idx in 0..resources.len() {
        for &d_idx in index.demands_for(r_idx) {
            assert!(index.contains(r_idx, d_idx));
            assert!(index.resources_for(d_idx).contains(&r_idx));
        }
    }
    for d_idx in 0..demands.len() {
        for &r_idx in index.resources_for(d_idx) {
            assert!(index.demands_for(r_idx).contains(&d_idx));
        }
    }
}

#[test]
fn state_agnostic_demand_accepts_disjoint_explicit_states() {
    // Two resources with disjoint explicit states and no wildcard are both
    // eligible for an "any"-state demand.
    let resources = vec![
        resource("R1", "CLM", &["FTC"], &["FL"]),
        resource("R2", "CLM", &["FTC"], &["TX"]),
    ];
    let demands = vec![demand("CLM", ANY_STATE, "FTC")];

    let refs: Vec<&Resource> = resources.iter().collect();
    let index = EligibilityIndex::build(&refs, &demands);
    assert_eq!(index.resources_for(0), &[0, 1]);
    assert_eq!(index.pair_count(), 2);
}

#[test]
fn failing_one_predicate_excludes_the_pair() {
    let skill_miss = resource("R1", "CLM", &["ADJ"], &["FL"]);
    let platform_miss = resource("R2", "PIP", &["FTC"], &["FL"]);
    let state_miss = resource("R3", "CLM", &["FTC"], &["GA"]);
    let d = demand("CLM", "FL", "FTC");

    assert!(!is_eligible(&skill_miss, &d));
    assert!(!is_eligible(&platform_miss, &d));
    assert!(!is_eligible(&state_miss, &d));
}

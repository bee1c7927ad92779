use allocation_tool::{Demand, DemandKey, Resource, check_fairness_sum, ideal_shares};
use chrono::NaiveDate;

fn resource(id: &str, locality: &str) -> Resource {
    Resource::new(
        id,
        "CLM",
        locality,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    )
}

fn demand(locality: &str, state: &str, forecast: u32) -> Demand {
    Demand::new(
        DemandKey::new("CLM", locality, state, "FTC", "LOB1"),
        forecast * 4,
        forecast,
    )
}

#[test]
fn ideals_are_proportional_to_weekly_forecast() {
    let pool: Vec<Resource> = (0..5).map(|i| resource(&format!("R{i}"), "Domestic")).collect();
    let resources: Vec<&Resource> = pool.iter().collect();
    let demands = vec![
        demand("Domestic", "FL", 100),
        demand("Domestic", "GA", 80),
        demand("Domestic", "TX", 20),
    ];

    let ideals = ideal_shares(&resources, &demands);
    assert!((ideals[0] - 2.5).abs() < 1e-9);
    assert!((ideals[1] - 2.0).abs() < 1e-9);
    assert!((ideals[2] - 0.5).abs() < 1e-9);
}

#[test]
fn fairness_sum_holds_per_locality() {
    let pool = vec![
        resource("D1", "Domestic"),
        resource("D2", "Domestic"),
        resource("D3", "Domestic"),
        resource("G1", "Global"),
        resource("G2", "Global"),
    ];
    let resources: Vec<&Resource> = pool.iter().collect();
    let demands = vec![
        demand("Domestic", "FL", 33),
        demand("Domestic", "GA", 67),
        demand("Global", "any", 10),
        demand("Global", "TX", 70),
    ];

    let ideals = ideal_shares(&resources, &demands);
    check_fairness_sum(&resources, &demands, &ideals, 1e-6).unwrap();

    let domestic_sum: f64 = ideals[0] + ideals[1];
    let global_sum: f64 = ideals[2] + ideals[3];
    assert!((domestic_sum - 3.0).abs() < 1e-6);
    assert!((global_sum - 2.0).abs() < 1e-6);
}

#[test]
fn localities_never_share_headcount() {
    // A global-only pool contributes nothing to domestic demands.
    let pool = vec![resource("G1", "Global")];
    let resources: Vec<&Resource> = pool.iter().collect();
    let demands = vec![demand("Domestic", "FL", 100)];

    let ideals = ideal_shares(&resources, &demands);
    assert_eq!(ideals, vec![0.0]);
}

#[test]
fn zero_total_forecast_means_zero_ideals() {
    let pool = vec![resource("R1", "Domestic"), resource("R2", "Domestic")];
    let resources: Vec<&Resource> = pool.iter().collect();
    let demands = vec![demand("Domestic", "FL", 0), demand("Domestic", "GA", 0)];

    let ideals = ideal_shares(&resources, &demands);
    assert_eq!(ideals, vec![0.0, 0.0]);
    check_fairness_sum(&resources, &demands, &ideals, 1e-6).unwrap();
}

#[test]
fn tampered_ideals_fail_the_invariant_check() {
    let pool = vec![resource("R1", "Domestic"), resource("R2", "Domestic")];
    let resources: Vec<&Resource> = pool.iter().collect();
    let demands = vec![demand("Domestic", "FL", 60), demand("Domestic", "GA", 40)];

    let mut ideals = ideal_shares(&resources, &demands);
    ideals[0] += 0.5;
    let err = check_fairness_sum(&resources, &demands, &ideals, 1e-6).unwrap_err();
    assert!(!err.is_input_error());
}

use allocation_tool::{
    Demand, DemandKey, ImportError, Resource, WeekOfYear, WeekSnapshot, load_demands_from_csv,
    load_resources_from_csv, load_week_calendar_from_csv, load_week_snapshot, save_week_snapshot,
    validate_inputs,
};
use chrono::NaiveDate;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file.flush().expect("flush");
    file
}

#[test]
fn resources_round_trip_from_csv() {
    let file = write_temp(
        "id,platform,locality,skills,states,start_date,end_date,tier,placeholder\n\
         R1,CLM,Domestic,FTC;ADJ,FL;GA,2025-01-01,,75% Ramp,false\n\
         R2,CLM,Global,FTC,any,2025-02-01,2025-12-31,,true\n",
    );

    let resources = load_resources_from_csv(file.path()).unwrap();
    assert_eq!(resources.len(), 2);

    let r1 = &resources[0];
    assert_eq!(r1.id, "R1");
    assert!(r1.skills.contains("FTC") && r1.skills.contains("ADJ"));
    assert!(r1.states.contains("FL") && r1.states.contains("GA"));
    assert_eq!(r1.tier.as_deref(), Some("75% Ramp"));
    assert_eq!(r1.end_date, None);
    assert!(!r1.placeholder);

    let r2 = &resources[1];
    assert!(r2.has_any_state());
    assert_eq!(r2.tier, None);
    assert_eq!(
        r2.end_date,
        Some(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
    );
    assert!(r2.placeholder);
}

#[test]
fn resource_without_skills_is_rejected_with_identity() {
    let file = write_temp(
        "id,platform,locality,skills,states,start_date,end_date,tier,placeholder\n\
         R9,CLM,Domestic,,FL,2025-01-01,,,false\n",
    );

    let err = load_resources_from_csv(file.path()).unwrap_err();
    match err {
        ImportError::InvalidData(msg) => assert!(msg.contains("R9"), "message was: {msg}"),
        other => panic!("expected InvalidData, got {other:?}"),
    }
}

#[test]
fn demands_load_from_csv() {
    let file = write_temp(
        "platform,locality,state,case_type,line_of_business,monthly_forecast,weekly_forecast,hourly_rate\n\
         CLM,Domestic,FL,FTC,LOB1,400,100,1.5\n\
         CLM,Global,any,ADJ,LOB2,160,40,2.0\n",
    );

    let demands = load_demands_from_csv(file.path()).unwrap();
    assert_eq!(demands.len(), 2);
    assert_eq!(demands[0].key.state, "FL");
    assert_eq!(demands[0].weekly_forecast, 100);
    assert!((demands[1].hourly_rate - 2.0).abs() < 1e-9);
}

#[test]
fn duplicate_demand_keys_are_rejected() {
    let file = write_temp(
        "platform,locality,state,case_type,line_of_business,monthly_forecast,weekly_forecast,hourly_rate\n\
         CLM,Domestic,FL,FTC,LOB1,400,100,1.0\n\
         CLM,Domestic,FL,FTC,LOB1,200,50,1.0\n",
    );

    assert!(matches!(
        load_demands_from_csv(file.path()),
        Err(ImportError::InvalidData(_))
    ));
}

#[test]
fn week_calendar_loads_and_rejects_bad_shrinkage() {
    let good = write_temp(
        "year,week,locality,working_days,hours_per_day,shrinkage\n\
         2025,15,Domestic,5,8.0,0.1\n\
         2025,15,Global,4,7.5,0.0\n",
    );
    let calendar = load_week_calendar_from_csv(good.path()).unwrap();
    assert_eq!(calendar.len(), 2);
    let profile = calendar.profile(WeekOfYear::new(2025, 15), "Global").unwrap();
    assert_eq!(profile.working_days, 4);

    let bad = write_temp(
        "year,week,locality,working_days,hours_per_day,shrinkage\n\
         2025,15,Domestic,5,8.0,1.2\n",
    );
    assert!(matches!(
        load_week_calendar_from_csv(bad.path()),
        Err(ImportError::InvalidData(_))
    ));
}

#[test]
fn week_snapshot_round_trips_through_json() {
    let resources = vec![
        Resource::new(
            "R1",
            "CLM",
            "Domestic",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .with_skills(["FTC"])
        .with_states(["FL"]),
    ];
    let demands = vec![
        Demand::new(DemandKey::new("CLM", "Domestic", "FL", "FTC", "LOB1"), 400, 100)
            .with_hourly_rate(1.25),
    ];
    validate_inputs(&resources, &demands).unwrap();

    let snapshot = WeekSnapshot {
        week: WeekOfYear::new(2025, 15),
        resources: resources.clone(),
        demands: demands.clone(),
    };

    let file = NamedTempFile::new().unwrap();
    save_week_snapshot(&snapshot, file.path()).unwrap();
    let loaded = load_week_snapshot(file.path()).unwrap();

    assert_eq!(loaded.week, snapshot.week);
    assert_eq!(loaded.resources, resources);
    assert_eq!(loaded.demands, demands);
}

#[test]
fn snapshot_with_invalid_records_fails_to_load() {
    // Hand-written JSON with an empty skill set sneaks past serde but not
    // past ingestion validation.
    let file = write_temp(
        r#"{
  "week": { "year": 2025, "week": 15 },
  "resources": [
    {
      "id": "R1",
      "platform": "CLM",
      "locality": "Domestic",
      "skills": [],
      "states": ["FL"],
      "start_date": "2025-01-01"
    }
  ],
  "demands": []
}"#,
    );

    assert!(matches!(
        load_week_snapshot(file.path()),
        Err(ImportError::InvalidData(_))
    ));
}

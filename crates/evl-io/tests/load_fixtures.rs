use std::fs;
use std::path::Path;

use evl_core::{GeographyKey, HourOfDay, StateCode, Year};
use evl_io::{load_all, DataSources, DemandSchema, LoadError};

const MEMBERSHIP: &str = r#"{
    "Texas": ["Travis County", "Adams County"],
    "Colorado": ["Denver County"]
}"#;

const TOPOLOGY: &str = r#"{
    "type": "Topology",
    "objects": {
        "states": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": "48", "properties": {"name": "Texas"}},
            {"type": "Polygon", "id": "08", "properties": {"name": "Colorado"}}
        ]},
        "counties": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": "48453", "properties": {"name": "Travis"}},
            {"type": "Polygon", "id": "48001", "properties": {"name": "Adams"}},
            {"type": "Polygon", "id": "08031", "properties": {"name": "Denver"}}
        ]}
    },
    "arcs": []
}"#;

fn write_fixture(dir: &Path) {
    fs::write(dir.join("counties-by-state.json"), MEMBERSHIP).unwrap();
    fs::write(dir.join("counties-albers-10m.json"), TOPOLOGY).unwrap();
    fs::write(
        dir.join("2023_gov_fleet_EV_load_profiles.csv"),
        "Geography Name,Hour,Avg Power Demand (kW)\n\
         \"Travis County, TX\",5,120\n\
         Denver County,5,40\n\
         Denver County,6,not-a-number\n",
    )
    .unwrap();
    // A later year with a different header layout.
    fs::write(
        dir.join("2024_gov_fleet_EV_load_profiles.csv"),
        "State,County,hour_of_day,avg_demand_kw\nTX,Travis,5,150\n",
    )
    .unwrap();
}

fn sources(dir: &Path, years: Vec<u16>) -> DataSources {
    DataSources {
        data_dir: dir.to_path_buf(),
        demand_file_pattern: "{year}_gov_fleet_EV_load_profiles.csv".into(),
        membership_file: "counties-by-state.json".into(),
        topology_file: "counties-albers-10m.json".into(),
        years,
        schema: DemandSchema::default(),
    }
}

#[test]
fn loads_every_year_with_its_own_schema() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let inputs = load_all(&sources(dir.path(), vec![2023, 2024])).unwrap();
    assert_eq!(inputs.dataset.len(), 4);
    assert_eq!(inputs.topology.states.len(), 2);
    assert_eq!(inputs.diagnostics.stats.sources, 2);
    assert_eq!(inputs.diagnostics.stats.missing_values, 1);

    let hour5 = HourOfDay::new(5).unwrap();
    let travis_2024: Vec<_> = inputs
        .dataset
        .records_at(Year(2024), hour5)
        .filter(|r| r.geography_key == GeographyKey::from_label("travis"))
        .collect();
    assert_eq!(travis_2024.len(), 1);
    assert_eq!(travis_2024[0].avg_demand_kw.value(), 150.0);
    assert_eq!(travis_2024[0].known_state(), StateCode::parse("TX"));
}

#[test]
fn denver_state_is_backfilled_from_membership() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let inputs = load_all(&sources(dir.path(), vec![2023])).unwrap();
    let hour5 = HourOfDay::new(5).unwrap();
    let denver = inputs
        .dataset
        .records_at(Year(2023), hour5)
        .find(|r| r.geography_key.as_str() == "denver")
        .unwrap();
    assert!(!denver.state_resolved());
    assert_eq!(inputs.dataset.state_of(denver), StateCode::parse("CO"));
}

#[test]
fn missing_year_file_aborts_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let err = load_all(&sources(dir.path(), vec![2023, 2030])).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn malformed_header_aborts_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::write(
        dir.path().join("2024_gov_fleet_EV_load_profiles.csv"),
        "County,Hour\nTravis,5\n",
    )
    .unwrap();

    let err = load_all(&sources(dir.path(), vec![2023, 2024])).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { column: "demand", .. }));
}

#[test]
fn stateless_and_stated_rows_of_one_county_are_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::write(
        dir.path().join("2023_gov_fleet_EV_load_profiles.csv"),
        "Geography Name,Hour,Avg Power Demand (kW)\n\
         Travis County,5,10\n\
         \"Travis County, TX\",5,20\n",
    )
    .unwrap();

    let inputs = load_all(&sources(dir.path(), vec![2023])).unwrap();
    let hour5 = HourOfDay::new(5).unwrap();
    let travis: Vec<f64> = inputs
        .dataset
        .records_at(Year(2023), hour5)
        .map(|r| r.avg_demand_kw.value())
        .collect();
    assert_eq!(travis, vec![10.0]);
    assert_eq!(inputs.dataset.len(), 1);
    assert_eq!(inputs.diagnostics.stats.skipped_rows, 1);
    assert_eq!(inputs.diagnostics.stats.records, 1);
}

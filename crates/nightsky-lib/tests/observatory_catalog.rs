use std::fs::File;

use nightsky_lib::{parse_observatories, Delimiter, Error, LocationTable};

mod common;
use common::fixtures_dir;

#[test]
fn sample_catalog_converts_valid_rows_and_skips_broken_ones() {
    let file = File::open(fixtures_dir().join("ObsCodes_sample.csv")).expect("fixture csv");
    let report = parse_observatories(file, Delimiter::Auto).expect("catalog parses");

    assert_eq!(report.parsed, 4);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.table.len(), 4);

    let greenwich = report.table.get("Greenwich").expect("Greenwich present");
    assert!((greenwich.latitude() - 51.4774).abs() < 0.001);
    assert_eq!(greenwich.longitude(), 0.0);

    let mauna_kea = report.table.get("Mauna Kea").expect("Mauna Kea present");
    assert_eq!(mauna_kea.longitude(), -155.4722);

    let tololo = report
        .table
        .get("Cerro Tololo Observatory, La Serena")
        .expect("multi-field name joined");
    assert!(tololo.latitude() < -30.0);

    let scaled = report.table.get("Scaled Longitude Site").expect("scaled row");
    assert_eq!(scaled.longitude(), -111.6);
}

#[test]
fn written_table_matches_checked_in_sample() {
    let file = File::open(fixtures_dir().join("ObsCodes_sample.csv")).expect("fixture csv");
    let report = parse_observatories(file, Delimiter::Auto).expect("catalog parses");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("locations.json");
    report.table.save(&path).expect("table saves");

    let reloaded = LocationTable::load(&path).expect("table reloads");
    let sample = common::sample_locations();
    for (name, coords) in reloaded.iter() {
        assert_eq!(sample.get(name), Some(coords), "{name}");
    }
}

#[test]
fn lookup_suggests_close_names() {
    let table = common::sample_locations();
    let err = table.lookup("Greenwhich").expect_err("typo is unknown");
    assert!(matches!(err, Error::UnknownLocation { .. }));
    assert!(err.to_string().contains("Did you mean 'Greenwich'?"));
}

#[test]
fn search_is_case_insensitive() {
    let table = common::sample_locations();
    let names: Vec<_> = table.search("cerro").into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Cerro Tololo Observatory, La Serena"]);
}

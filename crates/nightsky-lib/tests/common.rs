#![allow(dead_code)]

use std::path::PathBuf;

use nightsky_lib::{LocationTable, SkyCatalog};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn sample_catalog() -> SkyCatalog {
    SkyCatalog::load(&fixtures_dir().join("sky_objects_sample.json"))
        .expect("load fixture sky_objects_sample.json")
}

pub fn sample_locations() -> LocationTable {
    LocationTable::load(&fixtures_dir().join("locations_sample.json"))
        .expect("load fixture locations_sample.json")
}

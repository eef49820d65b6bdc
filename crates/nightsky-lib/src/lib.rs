//! nightsky library entry points.
//!
//! This crate converts observatory catalogs into a location table, builds a
//! star and constellation table from a Stellarium sky culture, and decides
//! which stars rise above the horizon between sunset and the following
//! sunrise for an observer. Higher-level consumers (the CLI, renderers)
//! should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

pub mod config;
pub mod coords;
pub mod dataset;
pub mod edges;
pub mod error;
pub mod geodesy;
pub mod locations;
pub mod night;
pub mod report;
pub mod simbad;
pub mod sky;
pub mod stellarium;
pub mod visibility;

pub use config::ObservingConfig;
pub use coords::{EquatorialPosition, GeoCoordinates, HorizontalPosition};
pub use dataset::{load_tables, resolve_data_dir, DataPaths, Tables};
pub use edges::{build_edges, classify_edges, RenderableEdge};
pub use error::{Error, Result, TwilightEvent};
pub use locations::{parse_observatories, Delimiter, LocationTable, ParseReport};
pub use night::{night_window, NightWindow};
pub use report::{compute_sky_report, sky_report_for, SkyReport};
pub use simbad::{
    build_sky_catalog, CatalogBuild, CatalogBuildOptions, CoordinateResolver, SimbadClient,
};
pub use sky::{Constellation, SkyCatalog, SkyObject};
pub use stellarium::StellariumIndex;
pub use visibility::{altitude_profile, visible_tonight, AltitudeProfile, VisibilityResult};

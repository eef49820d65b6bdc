//! Subcommand handlers.
//!
//! `main.rs` parses arguments and dispatches here; each module owns one
//! subcommand family.

pub mod catalog;
pub mod locations;
pub mod tonight;
pub mod window;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;

use nightsky_lib::{resolve_data_dir, DataPaths, GeoCoordinates};

/// Observer selection shared by `window` and `tonight`.
#[derive(Args, Debug, Clone)]
pub struct ObserverArgs {
    /// Observatory name from the location table.
    #[arg(long, conflicts_with_all = ["lat", "lon"], required_unless_present_all = ["lat", "lon"])]
    pub location: Option<String>,
    /// Latitude in degrees, north positive.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Longitude in degrees, east positive.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
    /// Evening to compute (YYYY-MM-DD); defaults to today in UTC.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// An observer resolved from a location name or raw coordinates.
#[derive(Debug, Clone)]
pub struct ResolvedObserver {
    pub label: Option<String>,
    pub coords: GeoCoordinates,
    pub date: NaiveDate,
}

impl ObserverArgs {
    /// Resolve the observer, reading the location table only for `--location`.
    pub fn resolve(&self, data_dir: Option<&Path>) -> Result<ResolvedObserver> {
        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());

        if let Some(name) = &self.location {
            let paths = data_paths(data_dir)?;
            let table = paths.load_locations()?;
            let coords = table.lookup(name)?;
            return Ok(ResolvedObserver {
                label: Some(name.clone()),
                coords,
                date,
            });
        }

        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Ok(ResolvedObserver {
                label: None,
                coords: GeoCoordinates::new(latitude, longitude)?,
                date,
            }),
            _ => anyhow::bail!("either --location or both --lat and --lon are required"),
        }
    }
}

/// Resolve the data directory and the table paths inside it.
pub fn data_paths(data_dir: Option<&Path>) -> Result<DataPaths> {
    let dir = resolve_data_dir(data_dir).context("failed to resolve the data directory")?;
    Ok(DataPaths::in_dir(&dir))
}

/// Output path: explicit `--output` or the default file in the data directory.
pub fn output_path(explicit: Option<&Path>, default: impl FnOnce() -> Result<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default(),
    }
}

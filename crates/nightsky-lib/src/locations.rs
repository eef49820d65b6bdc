//! Observatory catalog parsing and the persisted location lookup table.
//!
//! The observatory catalog is a delimited text file with a header row and
//! the columns `code, longitude, cos, sin, name...`. Each usable row is
//! converted with [`crate::geodesy::convert`] and stored by display name.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::coords::GeoCoordinates;
use crate::dataset::write_json_atomic;
use crate::error::{Error, Result};
use crate::geodesy;

/// Minimum number of fields for a usable observatory row.
const MIN_FIELDS: usize = 5;

/// Similarity threshold for "did you mean" suggestions.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Maximum number of suggestions attached to an unknown-location error.
const MAX_SUGGESTIONS: usize = 3;

/// Command users run to produce the location table.
pub const LOCATIONS_HINT: &str = "nightsky locations build --input ObsCodes.csv";

/// Field delimiter of the observatory catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Use `;` when the header holds semicolons but no commas, otherwise `,`.
    #[default]
    Auto,
    Comma,
    Semicolon,
}

impl Delimiter {
    fn resolve(self, header: &str) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Auto => {
                if header.contains(';') && !header.contains(',') {
                    b';'
                } else {
                    b','
                }
            }
        }
    }
}

/// A single parsed catalog row, before geodesy conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservatoryRecord {
    pub code: String,
    pub raw_longitude: f64,
    pub cos_const: f64,
    pub sin_const: f64,
    pub name: String,
}

impl ObservatoryRecord {
    /// Parse a record, returning `None` for short rows or non-numeric fields.
    fn from_record(record: &StringRecord) -> Option<Self> {
        if record.len() < MIN_FIELDS {
            return None;
        }

        let numeric = |idx: usize| record.get(idx)?.trim().parse::<f64>().ok();
        let raw_longitude = numeric(1)?;
        let cos_const = numeric(2)?;
        let sin_const = numeric(3)?;

        let name = record
            .iter()
            .skip(MIN_FIELDS - 1)
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Some(Self {
            code: record.get(0).unwrap_or_default().trim().to_string(),
            raw_longitude,
            cos_const,
            sin_const,
            name,
        })
    }

    /// Geodetic `(latitude, longitude)` for this record.
    pub fn to_lat_lon(&self) -> (f64, f64) {
        geodesy::convert(self.raw_longitude, self.cos_const, self.sin_const)
    }
}

/// Outcome of parsing an observatory catalog.
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub table: LocationTable,
    /// Rows converted into the table (duplicates by name included).
    pub parsed: usize,
    /// Rows dropped as malformed.
    pub skipped: usize,
}

/// Parse an observatory catalog into a [`LocationTable`].
///
/// Malformed rows are skipped and counted; they never abort the parse.
/// Later rows replace earlier rows with the same display name.
pub fn parse_observatories<R: Read>(mut reader: R, delimiter: Delimiter) -> Result<ParseReport> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let header = contents.lines().next().unwrap_or_default();
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(delimiter.resolve(header))
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Fields)
        .from_reader(contents.as_bytes());

    let mut table = LocationTable::default();
    let mut parsed = 0usize;
    let mut skipped = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                debug!(%error, row = idx + 2, "skipping unreadable catalog row");
                skipped += 1;
                continue;
            }
        };

        let Some(observatory) = ObservatoryRecord::from_record(&record) else {
            debug!(row = idx + 2, fields = record.len(), "skipping malformed catalog row");
            skipped += 1;
            continue;
        };

        let (latitude, longitude) = observatory.to_lat_lon();
        match GeoCoordinates::new(latitude, longitude) {
            Ok(coords) => {
                table.insert(observatory.name, coords);
                parsed += 1;
            }
            Err(error) => {
                debug!(%error, code = %observatory.code, "skipping out-of-range catalog row");
                skipped += 1;
            }
        }
    }

    info!(parsed, skipped, "parsed observatory catalog");
    Ok(ParseReport {
        table,
        parsed,
        skipped,
    })
}

/// Read-only lookup from observatory display name to coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTable {
    entries: BTreeMap<String, GeoCoordinates>,
}

/// On-disk form: `{ "<name>": [latitude, longitude] }`.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct LocationFile(BTreeMap<String, [f64; 2]>);

impl LocationTable {
    /// Load a table written by [`LocationTable::save`].
    ///
    /// A missing file is reported as [`Error::DataFileMissing`]; entries with
    /// out-of-range coordinates fail the load with an error naming the entry.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DataFileMissing {
                path: path.to_path_buf(),
                hint: LOCATIONS_HINT,
            });
        }
        let file = fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), entries = table.len(), "loaded location table");
        Ok(table)
    }

    /// Deserialize a table from JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let LocationFile(raw) = serde_json::from_reader(reader)?;
        let mut entries = BTreeMap::new();
        for (name, [latitude, longitude]) in raw {
            let coords = GeoCoordinates::new(latitude, longitude).map_err(|err| match err {
                Error::InvalidCoordinates { message } => Error::InvalidCoordinates {
                    message: format!("location '{name}': {message}"),
                },
                other => other,
            })?;
            entries.insert(name, coords);
        }
        Ok(Self { entries })
    }

    /// Write the table as pretty-printed JSON, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, &self.to_file())
    }

    fn to_file(&self) -> LocationFile {
        LocationFile(
            self.entries
                .iter()
                .map(|(name, coords)| {
                    (
                        name.clone(),
                        [
                            geodesy::round_micro(coords.latitude()),
                            geodesy::round_micro(coords.longitude()),
                        ],
                    )
                })
                .collect(),
        )
    }

    /// Insert or replace a location.
    pub fn insert(&mut self, name: String, coords: GeoCoordinates) {
        self.entries.insert(name, coords);
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<GeoCoordinates> {
        self.entries.get(name).copied()
    }

    /// Exact-name lookup that explains misses with fuzzy suggestions.
    pub fn lookup(&self, name: &str) -> Result<GeoCoordinates> {
        self.get(name).ok_or_else(|| Error::UnknownLocation {
            name: name.to_string(),
            suggestions: self.suggest(name),
        })
    }

    /// Names containing `query`, case-insensitively, in table order.
    pub fn search<'a>(&'a self, query: &str) -> Vec<(&'a str, GeoCoordinates)> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&needle))
            .map(|(name, coords)| (name.as_str(), *coords))
            .collect()
    }

    /// Closest names to `name` by Jaro-Winkler similarity.
    pub fn suggest(&self, name: &str) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &String)> = self
            .entries
            .keys()
            .map(|candidate| {
                (
                    strsim::jaro_winkler(&needle, &candidate.to_lowercase()),
                    candidate,
                )
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, candidate)| candidate.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, GeoCoordinates)> {
        self.entries
            .iter()
            .map(|(name, coords)| (name.as_str(), *coords))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Code,Long.,cos,sin,Name\n";

    #[test]
    fn skips_short_rows() {
        let csv = format!("{HEADER}000,0.0000,0.62411,0.77873,Greenwich\n001,0.1,0.6\n");
        let report = parse_observatories(csv.as_bytes(), Delimiter::Auto).unwrap();
        assert_eq!(report.table.len(), 1);
        assert_eq!(report.parsed, 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn skips_non_numeric_fields() {
        let csv = format!("{HEADER}000,east,0.62411,0.77873,Nowhere\n");
        let report = parse_observatories(csv.as_bytes(), Delimiter::Auto).unwrap();
        assert!(report.table.is_empty());
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn joins_name_fragments() {
        let csv = format!("{HEADER}G96,249.21128,0.845111,0.533614,Mt. Lemmon Survey, , Arizona\n");
        let report = parse_observatories(csv.as_bytes(), Delimiter::Auto).unwrap();
        let names: Vec<_> = report.table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Mt. Lemmon Survey, Arizona"]);
    }

    #[test]
    fn detects_semicolon_delimiter() {
        let csv = "Code;Long.;cos;sin;Name\n000;0.0000;0.62411;0.77873;Greenwich\n";
        let report = parse_observatories(csv.as_bytes(), Delimiter::Auto).unwrap();
        let coords = report.table.get("Greenwich").expect("row parsed");
        assert!((coords.latitude() - 51.4773).abs() < 0.01);
        assert_eq!(coords.longitude(), 0.0);
    }

    #[test]
    fn later_duplicate_name_wins() {
        let csv = format!("{HEADER}A01,10.0,1.0,0.0,Site\nA02,20.0,1.0,0.0,Site\n");
        let report = parse_observatories(csv.as_bytes(), Delimiter::Comma).unwrap();
        assert_eq!(report.table.len(), 1);
        assert_eq!(report.parsed, 2);
        assert_eq!(report.table.get("Site").unwrap().longitude(), 20.0);
    }

    #[test]
    fn suggests_near_misses() {
        let mut table = LocationTable::default();
        table.insert("Greenwich".into(), GeoCoordinates::new(51.5, 0.0).unwrap());
        table.insert("Palomar Mountain".into(), GeoCoordinates::new(33.4, -116.9).unwrap());

        match table.lookup("Greenwhich") {
            Err(Error::UnknownLocation { suggestions, .. }) => {
                assert_eq!(suggestions, vec!["Greenwich".to_string()]);
            }
            other => panic!("expected unknown location, got {other:?}"),
        }
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut table = LocationTable::default();
        table.insert("Palomar Mountain".into(), GeoCoordinates::new(33.4, -116.9).unwrap());
        table.insert("Kitt Peak".into(), GeoCoordinates::new(31.9, -111.6).unwrap());
        let hits = table.search("PALO");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "Palomar Mountain");
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = LocationTable::load(Path::new("/definitely/not/here/locations.json"))
            .expect_err("missing file must fail");
        assert!(matches!(err, Error::DataFileMissing { .. }));
    }

    #[test]
    fn out_of_range_entry_is_named_in_error() {
        let json = r#"{ "Greenwich": [51.477378, 0.0], "Typo Ridge": [95.0, 10.0] }"#;
        let err = LocationTable::from_reader(json.as_bytes()).expect_err("latitude 95 rejected");
        match err {
            Error::InvalidCoordinates { message } => {
                assert!(message.starts_with("location 'Typo Ridge'"), "{message}");
                assert!(message.contains("latitude 95"), "{message}");
            }
            other => panic!("expected invalid coordinates, got {other:?}"),
        }
    }
}

//! Star and constellation tables.
//!
//! The catalog is persisted as a single JSON document:
//!
//! ```json
//! {
//!   "objects": [{ "name": "HIP 677", "ra": 2.0965, "dec": 29.0904 }],
//!   "constellations": [{ "name": "And", "stars": ["HIP 677", "HIP 3092"] }]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coords::EquatorialPosition;
use crate::dataset::write_json_atomic;
use crate::error::{Error, Result};

/// Command users run to produce the sky-object table.
pub const CATALOG_HINT: &str = "nightsky catalog build --index stellarium_IAU_index.json";

/// Format a Hipparcos number as a catalog identifier (`"HIP <n>"`).
pub fn hip_identifier(hip: u64) -> String {
    format!("HIP {hip}")
}

/// A catalogued star with fixed J2000 equatorial coordinates (degrees).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyObject {
    pub name: String,
    pub ra: f64,
    pub dec: f64,
}

impl SkyObject {
    pub fn new(name: impl Into<String>, ra: f64, dec: f64) -> Self {
        Self {
            name: name.into(),
            ra,
            dec,
        }
    }

    /// Validated equatorial position of this object.
    pub fn position(&self) -> Result<EquatorialPosition> {
        EquatorialPosition::validated(&self.name, self.ra, self.dec)
    }
}

/// A named stick figure; consecutive `stars` form its line segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constellation {
    pub name: String,
    pub stars: Vec<String>,
}

impl Constellation {
    /// Consecutive identifier pairs `(stars[i], stars[i + 1])`.
    pub fn segments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stars
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

/// Stars plus constellation figures, loaded once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyCatalog {
    pub objects: Vec<SkyObject>,
    #[serde(default)]
    pub constellations: Vec<Constellation>,
}

impl SkyCatalog {
    /// Load a catalog file, failing with [`Error::DataFileMissing`] when absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DataFileMissing {
                path: path.to_path_buf(),
                hint: CATALOG_HINT,
            });
        }
        let catalog = Self::from_reader(fs::File::open(path)?)?;
        debug!(
            path = %path.display(),
            objects = catalog.objects.len(),
            constellations = catalog.constellations.len(),
            "loaded sky catalog"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let catalog: SkyCatalog = serde_json::from_reader(reader)?;
        catalog.warn_on_dangling_references();
        Ok(catalog)
    }

    /// Write the catalog as pretty-printed JSON, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)
    }

    /// Index objects by identifier.
    pub fn object_index(&self) -> HashMap<&str, &SkyObject> {
        self.objects
            .iter()
            .map(|object| (object.name.as_str(), object))
            .collect()
    }

    /// Constellation stars may reference objects the coordinate service
    /// could not resolve; such segments simply never render.
    fn warn_on_dangling_references(&self) {
        let index = self.object_index();
        let dangling = self
            .constellations
            .iter()
            .flat_map(|constellation| constellation.stars.iter())
            .filter(|star| !index.contains_key(star.as_str()))
            .count();
        if dangling > 0 {
            warn!(dangling, "constellation stars reference unknown objects");
        }
    }
}

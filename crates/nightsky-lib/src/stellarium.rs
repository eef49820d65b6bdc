//! Stellarium sky-culture `index.json` parsing.
//!
//! Only the constellation figures are read: each constellation carries an
//! `id` and a list of `lines`, where every line is a polyline of Hipparcos
//! numbers. Some sky cultures mix string markers into those arrays; they
//! are ignored.

use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::sky::{hip_identifier, Constellation};

/// One constellation entry of the index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StellariumConstellation {
    pub id: String,
    #[serde(default)]
    pub common_name: Option<CommonName>,
    #[serde(default, deserialize_with = "deserialize_lines")]
    pub lines: Vec<Vec<u64>>,
}

/// Display name block; only the English form is kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommonName {
    #[serde(default)]
    pub english: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StellariumIndex {
    #[serde(default)]
    pub constellations: Vec<StellariumConstellation>,
}

fn deserialize_lines<'de, D>(deserializer: D) -> std::result::Result<Vec<Vec<u64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<Vec<Value>> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|line| line.iter().filter_map(Value::as_u64).collect())
        .collect())
}

impl StellariumConstellation {
    /// HIP numbers in line order, each kept at its first occurrence.
    pub fn star_sequence(&self) -> Vec<u64> {
        let mut seen = BTreeSet::new();
        self.lines
            .iter()
            .flatten()
            .copied()
            .filter(|hip| seen.insert(*hip))
            .collect()
    }

    /// Convert into a catalog constellation named by its index id.
    pub fn to_constellation(&self) -> Constellation {
        Constellation {
            name: self.id.clone(),
            stars: self
                .star_sequence()
                .into_iter()
                .map(hip_identifier)
                .collect(),
        }
    }
}

impl StellariumIndex {
    /// Load an index file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("stellarium index not found at {}", path.display()),
            )));
        }
        let index = Self::from_reader(fs::File::open(path)?)?;
        debug!(
            path = %path.display(),
            constellations = index.constellations.len(),
            "loaded stellarium index"
        );
        Ok(index)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Every HIP number referenced by any constellation line, ascending.
    pub fn unique_hip_numbers(&self) -> Vec<u64> {
        self.constellations
            .iter()
            .flat_map(|constellation| constellation.lines.iter().flatten().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn to_constellations(&self) -> Vec<Constellation> {
        self.constellations
            .iter()
            .map(StellariumConstellation::to_constellation)
            .collect()
    }
}

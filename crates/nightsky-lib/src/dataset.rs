use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::locations::LocationTable;
use crate::sky::SkyCatalog;

/// File name of the observatory location table.
pub const LOCATIONS_FILENAME: &str = "locations.json";

/// File name of the star and constellation table.
pub const SKY_OBJECTS_FILENAME: &str = "sky_objects.json";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "NIGHTSKY_DATA_DIR";

/// Paths to the two data tables inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub locations: PathBuf,
    pub sky_objects: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            locations: dir.join(LOCATIONS_FILENAME),
            sky_objects: dir.join(SKY_OBJECTS_FILENAME),
        }
    }

    pub fn load_locations(&self) -> Result<LocationTable> {
        LocationTable::load(&self.locations)
    }

    pub fn load_catalog(&self) -> Result<SkyCatalog> {
        SkyCatalog::load(&self.sky_objects)
    }
}

/// Both tables, loaded once and passed by reference afterwards.
#[derive(Debug, Clone)]
pub struct Tables {
    pub locations: LocationTable,
    pub catalog: SkyCatalog,
}

/// Platform-specific data directory for the tables.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "nightsky", "nightsky").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Resolve the data directory.
///
/// The resolution order is:
/// 1. Explicit `dir` argument when provided.
/// 2. `NIGHTSKY_DATA_DIR` environment variable.
/// 3. Platform-specific project data directory.
pub fn resolve_data_dir(dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(explicit) = dir {
        return Ok(explicit.to_path_buf());
    }

    if let Some(env_path) = env::var_os(DATA_DIR_ENV) {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }

    default_data_dir()
}

/// Load both tables from `dir`. A missing table is fatal and reported with
/// the command that generates it.
pub fn load_tables(dir: &Path) -> Result<Tables> {
    let paths = DataPaths::in_dir(dir);
    let locations = paths.load_locations()?;
    let catalog = paths.load_catalog()?;
    debug!(
        dir = %dir.display(),
        locations = locations.len(),
        objects = catalog.objects.len(),
        "loaded data tables"
    );
    Ok(Tables { locations, catalog })
}

/// Write `value` as pretty-printed JSON, replacing `path` atomically.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(tmp.as_file_mut(), value)?;
    tmp.write_all(b"\n")?;
    tmp.flush()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

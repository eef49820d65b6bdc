//! Star coordinate lookup against the SIMBAD astronomical database and the
//! batch job that turns a Stellarium index into a [`SkyCatalog`].

use std::env;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::coords::EquatorialPosition;
use crate::error::{Error, Result};
use crate::sky::{hip_identifier, SkyCatalog, SkyObject};
use crate::stellarium::StellariumIndex;

/// SIMBAD Table Access Protocol synchronous query endpoint.
pub const SIMBAD_TAP_URL: &str = "https://simbad.cds.unistra.fr/simbad/sim-tap/sync";

/// Overrides [`SIMBAD_TAP_URL`], e.g. to point at a mirror.
pub const SIMBAD_TAP_URL_ENV: &str = "NIGHTSKY_SIMBAD_TAP_URL";

const QUERY_TIMEOUT: Duration = Duration::from_secs(60);

/// Default pause between consecutive lookups.
pub const DEFAULT_QUERY_DELAY: Duration = Duration::from_millis(100);

/// Resolves an object identifier (e.g. `"HIP 677"`) to J2000 coordinates.
///
/// `Ok(None)` means the service answered but does not know the identifier.
pub trait CoordinateResolver {
    fn resolve(&self, identifier: &str) -> Result<Option<EquatorialPosition>>;
}

/// Blocking SIMBAD TAP client.
#[derive(Debug, Clone)]
pub struct SimbadClient {
    client: Client,
    endpoint: String,
}

/// Subset of the TAP JSON response that carries result rows.
#[derive(Debug, Deserialize)]
struct TapResponse {
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

impl SimbadClient {
    /// Client for the public endpoint, or `NIGHTSKY_SIMBAD_TAP_URL` when set.
    pub fn new() -> Result<Self> {
        let endpoint = env::var(SIMBAD_TAP_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| SIMBAD_TAP_URL.to_string());
        Self::with_endpoint(endpoint)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(QUERY_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(Error::Http)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CoordinateResolver for SimbadClient {
    fn resolve(&self, identifier: &str) -> Result<Option<EquatorialPosition>> {
        let query = coordinate_query(identifier);
        debug!(identifier, endpoint = %self.endpoint, "querying SIMBAD");

        let response = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .query(&[
                ("REQUEST", "doQuery"),
                ("LANG", "ADQL"),
                ("FORMAT", "json"),
                ("QUERY", query.as_str()),
            ])
            .send()?
            .error_for_status()?;

        let body: TapResponse = response.json()?;
        parse_first_row(identifier, &body.data)
    }
}

fn user_agent() -> String {
    format!("nightsky-lib/{}", env!("CARGO_PKG_VERSION"))
}

/// ADQL selecting the ICRS coordinates of one identifier.
pub fn coordinate_query(identifier: &str) -> String {
    format!(
        "SELECT basic.ra, basic.dec FROM basic JOIN ident ON ident.oidref = basic.oid \
         WHERE ident.id = '{}'",
        identifier.replace('\'', "''")
    )
}

fn parse_first_row(identifier: &str, rows: &[Vec<Value>]) -> Result<Option<EquatorialPosition>> {
    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let number = |index: usize, column: &str| -> Result<f64> {
        row.get(index)
            .and_then(Value::as_f64)
            .ok_or_else(|| Error::CatalogQuery {
                identifier: identifier.to_string(),
                message: format!("missing or non-numeric {column} column"),
            })
    };

    let ra = number(0, "ra")?;
    let dec = number(1, "dec")?;
    EquatorialPosition::validated(identifier, ra, dec).map(Some)
}

/// Tuning for [`build_sky_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogBuildOptions {
    /// Pause between consecutive queries.
    pub delay: Duration,
}

impl Default for CatalogBuildOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_QUERY_DELAY,
        }
    }
}

/// Outcome of a catalog build.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogBuild {
    pub catalog: SkyCatalog,
    /// Identifiers that resolved to coordinates.
    pub resolved: usize,
    /// Identifiers the service does not know.
    pub missing: usize,
    /// Identifiers whose query failed.
    pub failed: usize,
}

/// Query `resolver` for every star referenced by `index` and assemble a
/// catalog.
///
/// Unknown identifiers and failing queries are logged and skipped; the job
/// never aborts part-way. Constellations list their stars in line order.
pub fn build_sky_catalog<R: CoordinateResolver + ?Sized>(
    index: &StellariumIndex,
    resolver: &R,
    options: &CatalogBuildOptions,
) -> CatalogBuild {
    let hips = index.unique_hip_numbers();
    info!(count = hips.len(), "resolving star coordinates");

    let mut objects = Vec::with_capacity(hips.len());
    let mut missing = 0;
    let mut failed = 0;

    for (position, hip) in hips.iter().enumerate() {
        if position > 0 && !options.delay.is_zero() {
            thread::sleep(options.delay);
        }

        let identifier = hip_identifier(*hip);
        match resolver.resolve(&identifier) {
            Ok(Some(coordinates)) => {
                objects.push(SkyObject::new(identifier, coordinates.ra, coordinates.dec));
            }
            Ok(None) => {
                info!(identifier = %identifier, "not found");
                missing += 1;
            }
            Err(err) => {
                warn!(identifier = %identifier, error = %err, "coordinate query failed");
                failed += 1;
            }
        }
        debug!(queried = position + 1, resolved = objects.len(), "progress");
    }

    let constellations = index.to_constellations();
    let resolved = objects.len();
    info!(
        resolved,
        missing,
        failed,
        constellations = constellations.len(),
        "built sky catalog"
    );

    CatalogBuild {
        catalog: SkyCatalog {
            objects,
            constellations,
        },
        resolved,
        missing,
        failed,
    }
}

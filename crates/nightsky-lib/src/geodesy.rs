//! Conversion of observatory parallax constants into geodetic coordinates.
//!
//! Observatory catalogs encode each site as ρcosφ′ and ρsinφ′, the
//! components of its geocentric position on the unit sphere. Horizon
//! computations need the geodetic latitude (the angle of the local
//! ellipsoid normal), so the geocentric angle is corrected for the WGS84
//! flattening.

/// Constants for the WGS84 Earth ellipsoid.
pub mod constants {
    /// WGS84 flattening.
    pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

    /// First eccentricity squared, e² = 2f − f².
    pub const WGS84_ECCENTRICITY_SQ: f64 =
        2.0 * WGS84_FLATTENING - WGS84_FLATTENING * WGS84_FLATTENING;

    /// Raw longitudes above this magnitude are assumed to be stored ×1000.
    pub const SCALED_LONGITUDE_LIMIT: f64 = 360.0;

    /// Output precision (decimal places) for stored coordinates.
    pub const STORED_DECIMALS: i32 = 6;
}

use constants::{SCALED_LONGITUDE_LIMIT, STORED_DECIMALS, WGS84_ECCENTRICITY_SQ};

/// Geodetic latitude in degrees from the parallax constants.
///
/// ```text
/// φ′ = atan2(ρsinφ′, ρcosφ′)
/// φ  = atan(tan φ′ / (1 − e²))
/// ```
pub fn geodetic_latitude(cos_const: f64, sin_const: f64) -> f64 {
    let geocentric = sin_const.atan2(cos_const);
    (geocentric.tan() / (1.0 - WGS84_ECCENTRICITY_SQ))
        .atan()
        .to_degrees()
}

/// Undo the ×1000 longitude encoding used by some catalog rows.
pub fn scale_longitude(raw: f64) -> f64 {
    if raw.abs() > SCALED_LONGITUDE_LIMIT {
        raw / 1000.0
    } else {
        raw
    }
}

/// Wrap a longitude into (−180, 180].
///
/// Uses a Euclidean remainder rather than repeated ±360 steps, so any
/// finite magnitude converges and `normalize_longitude(x)` equals
/// `normalize_longitude(x + 360k)` for every integer `k`.
pub fn normalize_longitude(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Round to the stored precision (6 decimals, ~0.11 m).
pub fn round_micro(value: f64) -> f64 {
    let factor = 10f64.powi(STORED_DECIMALS);
    let rounded = (value * factor).round() / factor;
    // Avoid persisting "-0.0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Convert a raw catalog row into `(latitude°, longitude°)`.
///
/// The longitude is scaled before it is normalized; both results are
/// rounded for storage.
pub fn convert(raw_longitude: f64, cos_const: f64, sin_const: f64) -> (f64, f64) {
    let latitude = geodetic_latitude(cos_const, sin_const);
    let longitude = normalize_longitude(scale_longitude(raw_longitude));
    (round_micro(latitude), round_micro(longitude))
}

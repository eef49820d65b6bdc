//! Observer and sky coordinates, sidereal time, and the equatorial to
//! horizontal transform.
//!
//! Stars are treated as fixed points at infinite distance: no precession,
//! nutation, aberration, refraction, or proper motion is applied. UT1 is
//! approximated by UTC, which is far below the resolution of the
//! visibility sampling.
//!
//! Sources:
//! - ERA: IERS Conventions 2010, Eq. 5.15.
//! - GMST polynomial: Capitaine et al. 2003, Table 2.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Julian Date of the J2000.0 epoch.
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Arcseconds to degrees.
const ARCSEC_TO_DEG: f64 = 1.0 / 3600.0;

/// Geodetic observer position in degrees.
///
/// Values can only be built through [`GeoCoordinates::new`], so anything
/// holding one is guaranteed to be finite and within geodetic ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinates {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinates {
    /// Validate and build observer coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinates`] when either value is not finite,
    /// latitude is outside [-90, 90], or longitude is outside [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(Error::InvalidCoordinates {
                message: format!("latitude {latitude} and longitude {longitude} must be finite"),
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidCoordinates {
                message: format!("latitude {latitude} is outside [-90, 90]"),
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidCoordinates {
                message: format!("longitude {longitude} is outside [-180, 180]"),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Geodetic latitude in degrees, north positive.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, east positive.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Fixed equatorial position (right ascension and declination, degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialPosition {
    pub ra: f64,
    pub dec: f64,
}

impl EquatorialPosition {
    /// Validate a catalogue coordinate, normalizing RA into [0, 360).
    ///
    /// `name` only feeds the error message.
    pub fn validated(name: &str, ra: f64, dec: f64) -> Result<Self> {
        if !ra.is_finite() || !dec.is_finite() || !(-90.0..=90.0).contains(&dec) {
            return Err(Error::InvalidSkyCoordinate {
                name: name.to_string(),
                ra,
                dec,
            });
        }
        Ok(Self {
            ra: ra.rem_euclid(360.0),
            dec,
        })
    }
}

/// Local horizontal position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalPosition {
    /// Angle above the horizon, [-90, 90].
    pub altitude: f64,
    /// Azimuth from north through east, [0, 360).
    pub azimuth: f64,
}

/// Convert a UTC instant to a Julian Date.
pub fn julian_date(instant: DateTime<Utc>) -> f64 {
    let seconds =
        instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1.0e-9;
    seconds / SECONDS_PER_DAY + UNIX_EPOCH_JD
}

/// Earth Rotation Angle in degrees, [0, 360).
///
/// θ = 360° × (0.7790572732640 + 1.00273781191135448 × Du), Du = JD − 2451545.0.
pub fn earth_rotation_angle_deg(jd: f64) -> f64 {
    let du = jd - J2000_JD;
    // Split the day count to keep precision in the fractional turn.
    let turns = 0.779_057_273_264_0 + 0.002_737_811_911_354_48 * du + du.fract();
    (turns.rem_euclid(1.0)) * 360.0
}

/// Greenwich Mean Sidereal Time in degrees, [0, 360).
pub fn gmst_deg(jd: f64) -> f64 {
    let t = (jd - J2000_JD) / 36_525.0;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let poly_arcsec = 0.014506 + 4612.156534 * t + 1.3915817 * t2
        - 0.00000044 * t3
        - 0.000029956 * t4
        - 0.0000000368 * t5;

    (earth_rotation_angle_deg(jd) + poly_arcsec * ARCSEC_TO_DEG).rem_euclid(360.0)
}

/// Local sidereal time in degrees for an east-positive longitude.
pub fn local_sidereal_time_deg(instant: DateTime<Utc>, longitude_east: f64) -> f64 {
    (gmst_deg(julian_date(instant)) + longitude_east).rem_euclid(360.0)
}

/// Transform a fixed equatorial position to the observer's horizontal frame.
///
/// `lst_deg` is the local sidereal time at the observer; see
/// [`local_sidereal_time_deg`].
pub fn equatorial_to_horizontal(
    position: &EquatorialPosition,
    observer: &GeoCoordinates,
    lst_deg: f64,
) -> HorizontalPosition {
    let hour_angle = (lst_deg - position.ra).to_radians();
    let dec = position.dec.to_radians();
    let lat = observer.latitude.to_radians();

    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_ha, cos_ha) = hour_angle.sin_cos();

    let sin_alt = (sin_lat * sin_dec + cos_lat * cos_dec * cos_ha).clamp(-1.0, 1.0);
    let altitude = sin_alt.asin().to_degrees();

    let azimuth = (-cos_dec * sin_ha)
        .atan2(sin_dec * cos_lat - cos_dec * cos_ha * sin_lat)
        .to_degrees()
        .rem_euclid(360.0);

    HorizontalPosition { altitude, azimuth }
}

//! Horizon visibility: which catalogued objects rise above the horizon at
//! least once during a night window.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};
use tracing::{debug, debug_span};

use crate::config::ObservingConfig;
use crate::coords::{
    equatorial_to_horizontal, local_sidereal_time_deg, EquatorialPosition, GeoCoordinates,
};
use crate::error::Result;
use crate::night::NightWindow;
use crate::sky::SkyObject;

/// Objects seen above the horizon at one or more sample instants, keyed by
/// identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VisibilityResult {
    visible: BTreeMap<String, EquatorialPosition>,
}

impl VisibilityResult {
    pub fn contains(&self, name: &str) -> bool {
        self.visible.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&EquatorialPosition> {
        self.visible.get(name)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Visible objects in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &EquatorialPosition)> {
        self.visible.iter()
    }

    pub(crate) fn insert(&mut self, name: String, position: EquatorialPosition) {
        self.visible.insert(name, position);
    }
}

impl FromIterator<(String, EquatorialPosition)> for VisibilityResult {
    fn from_iter<I: IntoIterator<Item = (String, EquatorialPosition)>>(iter: I) -> Self {
        Self {
            visible: iter.into_iter().collect(),
        }
    }
}

/// Determine which `objects` are above the horizon at any sample instant of
/// `window`.
///
/// Instants are `sunset + i * config.sample_interval`. An object counts as
/// visible as soon as one sample puts it strictly above
/// `config.horizon_altitude_deg`; the remaining samples for that object are
/// skipped.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSkyCoordinate`] for the first object with a
/// malformed coordinate, or [`crate::Error::InvalidConfig`] for an unusable
/// configuration.
pub fn visible_tonight(
    observer: &GeoCoordinates,
    window: &NightWindow,
    objects: &[SkyObject],
    config: &ObservingConfig,
) -> Result<VisibilityResult> {
    config.validate()?;

    let span = debug_span!(
        "visible_tonight",
        latitude = observer.latitude(),
        longitude = observer.longitude()
    );
    let _guard = span.enter();

    // Sidereal time depends only on the instant, so compute it once per sample.
    let sidereal: Vec<f64> = window
        .sample_instants(config.sample_interval)
        .into_iter()
        .map(|instant| local_sidereal_time_deg(instant, observer.longitude()))
        .collect();

    let mut result = VisibilityResult::default();
    for object in objects {
        let position = object.position()?;
        let rises = sidereal.iter().any(|&lst| {
            equatorial_to_horizontal(&position, observer, lst).altitude
                > config.horizon_altitude_deg
        });
        if rises {
            result.insert(object.name.clone(), position);
        }
    }

    debug!(
        objects = objects.len(),
        samples = sidereal.len(),
        visible = result.len(),
        "computed horizon visibility"
    );
    Ok(result)
}

/// Altitude and azimuth of one object at one sample instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AltitudeSample {
    pub instant: DateTime<Utc>,
    pub altitude: f64,
    pub azimuth: f64,
}

/// Full altitude series of one object across a night window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AltitudeProfile {
    pub name: String,
    /// Sampling cadence; serialized as fractional seconds.
    #[serde(rename = "step_secs", serialize_with = "serialize_secs")]
    pub step: Duration,
    pub horizon_altitude_deg: f64,
    pub samples: Vec<AltitudeSample>,
}

fn serialize_secs<S>(value: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.num_milliseconds() as f64 / 1000.0)
}

impl AltitudeProfile {
    /// Time spent above the horizon, at the sampling resolution.
    ///
    /// Each sample above the horizon stands for one full step.
    pub fn time_above_horizon(&self) -> Duration {
        let above = self
            .samples
            .iter()
            .filter(|sample| sample.altitude > self.horizon_altitude_deg)
            .count();
        self.step * above as i32
    }

    /// Sample with the greatest altitude, if any.
    pub fn culmination(&self) -> Option<&AltitudeSample> {
        self.samples
            .iter()
            .max_by(|a, b| a.altitude.total_cmp(&b.altitude))
    }

    /// Whether any sample is above the horizon; agrees with
    /// [`visible_tonight`] for the same inputs.
    pub fn is_visible(&self) -> bool {
        self.samples
            .iter()
            .any(|sample| sample.altitude > self.horizon_altitude_deg)
    }
}

/// Sample the altitude and azimuth of `object` at every instant of `window`.
pub fn altitude_profile(
    observer: &GeoCoordinates,
    object: &SkyObject,
    window: &NightWindow,
    config: &ObservingConfig,
) -> Result<AltitudeProfile> {
    config.validate()?;
    let position = object.position()?;

    let samples = window
        .sample_instants(config.sample_interval)
        .into_iter()
        .map(|instant| {
            let lst = local_sidereal_time_deg(instant, observer.longitude());
            let horizontal = equatorial_to_horizontal(&position, observer, lst);
            AltitudeSample {
                instant,
                altitude: horizontal.altitude,
                azimuth: horizontal.azimuth,
            }
        })
        .collect();

    Ok(AltitudeProfile {
        name: object.name.clone(),
        step: config.sample_interval,
        horizon_altitude_deg: config.horizon_altitude_deg,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;

    fn london() -> GeoCoordinates {
        GeoCoordinates::new(51.5, -0.1).unwrap()
    }

    fn autumn_night() -> NightWindow {
        NightWindow::new(
            Utc.with_ymd_and_hms(2024, 10, 15, 16, 10, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 16, 6, 20, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn circumpolar_star_is_visible_and_far_south_star_is_not() {
        let objects = vec![
            SkyObject::new("HIP 100", 0.0, 51.5),
            SkyObject::new("HIP 200", 0.0, -80.0),
        ];
        let result = visible_tonight(
            &london(),
            &autumn_night(),
            &objects,
            &ObservingConfig::default(),
        )
        .unwrap();

        assert!(result.contains("HIP 100"));
        assert!(!result.contains("HIP 200"));
        let position = result.get("HIP 100").unwrap();
        assert_eq!((position.ra, position.dec), (0.0, 51.5));
    }

    #[test]
    fn ten_hour_london_night_sees_northern_object() {
        let window = NightWindow::new(
            Utc.with_ymd_and_hms(2024, 10, 15, 20, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 16, 6, 0, 0).unwrap(),
        )
        .unwrap();
        let config = ObservingConfig::default();
        assert_eq!(window.sample_count(config.sample_interval), 20);

        let object = SkyObject::new("HIP 100", 0.0, 51.5);
        let result = visible_tonight(&london(), &window, &[object.clone()], &config).unwrap();
        assert!(result.contains("HIP 100"));

        // Lowest possible altitude is dec - colatitude = 13 degrees.
        let profile = altitude_profile(&london(), &object, &window, &config).unwrap();
        assert!(profile.samples.iter().all(|sample| sample.altitude > 12.9));
    }

    #[test]
    fn finer_cadence_never_loses_objects() {
        let objects: Vec<_> = (0..72)
            .flat_map(|i| {
                let ra = f64::from(i) * 5.0;
                [-45.0, -30.0, -20.0, 0.0, 20.0]
                    .into_iter()
                    .map(move |dec| SkyObject::new(format!("HIP {ra}/{dec}"), ra, dec))
            })
            .collect();

        let coarse = visible_tonight(
            &london(),
            &autumn_night(),
            &objects,
            &ObservingConfig::with_step_minutes(30).unwrap(),
        )
        .unwrap();
        let fine = visible_tonight(
            &london(),
            &autumn_night(),
            &objects,
            &ObservingConfig::with_step_minutes(10).unwrap(),
        )
        .unwrap();

        for (name, _) in coarse.iter() {
            assert!(fine.contains(name), "{name} lost at finer cadence");
        }
        assert!(fine.len() >= coarse.len());
    }

    #[test]
    fn altitude_exactly_on_horizon_is_not_visible() {
        // Equator observer, single sample: a dec 0 object whose hour angle
        // is -90° sits exactly on the horizon.
        let observer = GeoCoordinates::new(0.0, 0.0).unwrap();
        let sunset = Utc.with_ymd_and_hms(2024, 3, 20, 18, 0, 0).unwrap();
        let window = NightWindow::new(sunset, sunset + Duration::minutes(30)).unwrap();
        let lst = local_sidereal_time_deg(sunset, observer.longitude());
        let ra = (lst + 90.0).rem_euclid(360.0);

        let objects = vec![SkyObject::new("HIP 1", ra, 0.0)];
        let position = objects[0].position().unwrap();
        let altitude = equatorial_to_horizontal(&position, &observer, lst).altitude;
        assert!(altitude.abs() < 1e-9);

        let config = ObservingConfig {
            horizon_altitude_deg: altitude,
            ..ObservingConfig::default()
        };
        let result = visible_tonight(&observer, &window, &objects, &config).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn malformed_coordinate_is_reported() {
        let objects = vec![SkyObject::new("HIP 9", f64::NAN, 10.0)];
        let err = visible_tonight(
            &london(),
            &autumn_night(),
            &objects,
            &ObservingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSkyCoordinate { ref name, .. } if name == "HIP 9"));
    }

    #[test]
    fn empty_catalog_gives_empty_result() {
        let result = visible_tonight(
            &london(),
            &autumn_night(),
            &[],
            &ObservingConfig::default(),
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn profile_agrees_with_boolean_scan() {
        let config = ObservingConfig::default();
        let window = autumn_night();
        let circumpolar = SkyObject::new("HIP 100", 0.0, 51.5);
        let southern = SkyObject::new("HIP 200", 0.0, -80.0);

        let up = altitude_profile(&london(), &circumpolar, &window, &config).unwrap();
        assert!(up.is_visible());
        assert_eq!(up.samples.len(), window.sample_count(config.sample_interval));
        assert_eq!(
            up.time_above_horizon(),
            config.sample_interval * up.samples.len() as i32
        );
        assert!(up.culmination().unwrap().altitude >= 13.0);

        let down = altitude_profile(&london(), &southern, &window, &config).unwrap();
        assert!(!down.is_visible());
        assert_eq!(down.time_above_horizon(), Duration::zero());
    }

    #[test]
    fn profile_keeps_fractional_step() {
        let config = ObservingConfig {
            sample_interval: Duration::milliseconds(90_500),
            ..ObservingConfig::default()
        };
        let window = NightWindow::new(
            Utc.with_ymd_and_hms(2024, 10, 15, 20, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 15, 20, 10, 0).unwrap(),
        )
        .unwrap();
        let object = SkyObject::new("HIP 100", 0.0, 51.5);
        let profile = altitude_profile(&london(), &object, &window, &config).unwrap();

        assert_eq!(profile.samples.len(), 6);
        assert_eq!(profile.time_above_horizon(), Duration::milliseconds(90_500 * 6));
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["step_secs"], 90.5);
    }

    #[test]
    fn sub_second_cadence_is_an_error_not_an_empty_result() {
        let sunset = Utc.with_ymd_and_hms(2024, 10, 15, 20, 0, 0).unwrap();
        let window = NightWindow::new(sunset, sunset + Duration::microseconds(5)).unwrap();
        let config = ObservingConfig {
            sample_interval: Duration::nanoseconds(500),
            ..ObservingConfig::default()
        };
        let objects = vec![SkyObject::new("HIP 100", 0.0, 51.5)];

        let err = visible_tonight(&london(), &window, &objects, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}

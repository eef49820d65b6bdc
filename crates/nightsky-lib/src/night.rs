//! Night window calculation: sunset on the requested evening and the
//! sunrise that follows it.
//!
//! Sun events come from the NREL Solar Position Algorithm with the standard
//! sunrise/sunset horizon (−0.833°, the library default covering refraction
//! and the solar semidiameter). The algorithm works per UTC day, so the
//! window is assembled from neighbouring days:
//!
//! 1. sunset is the first sunset after approximate local noon of the date;
//! 2. sunrise is the first sunrise after that sunset.
//!
//! Near Greenwich this is simply sunset on the date and sunrise on the next
//! day. Polar day and polar night surface as
//! [`Error::NoTwilightBoundary`].

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use solar_positioning::{spa, Horizon, SunriseResult};
use tracing::debug;

use crate::config::ObservingConfig;
use crate::coords::GeoCoordinates;
use crate::error::{Error, Result, TwilightEvent};

/// Sunset and the following sunrise, both UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NightWindow {
    sunset: DateTime<Utc>,
    sunrise: DateTime<Utc>,
}

impl NightWindow {
    /// Build a window, rejecting a sunrise that is not after the sunset.
    pub fn new(sunset: DateTime<Utc>, sunrise: DateTime<Utc>) -> Result<Self> {
        if sunrise <= sunset {
            return Err(Error::InvalidNightWindow {
                sunset: sunset.to_rfc3339(),
                sunrise: sunrise.to_rfc3339(),
            });
        }
        Ok(Self { sunset, sunrise })
    }

    pub fn sunset(&self) -> DateTime<Utc> {
        self.sunset
    }

    pub fn sunrise(&self) -> DateTime<Utc> {
        self.sunrise
    }

    pub fn duration(&self) -> Duration {
        self.sunrise - self.sunset
    }

    /// Number of whole `step`s that fit in the window.
    pub fn sample_count(&self, step: Duration) -> usize {
        let step_ms = step.num_milliseconds();
        if step_ms <= 0 {
            return 0;
        }
        usize::try_from(self.duration().num_milliseconds() / step_ms).unwrap_or(0)
    }

    /// Sample instants `sunset + i * step` for `i` in `0..sample_count(step)`.
    ///
    /// The sequence starts at sunset and never reaches past sunrise.
    pub fn sample_instants(&self, step: Duration) -> Vec<DateTime<Utc>> {
        (0..self.sample_count(step))
            .map(|i| self.sunset + step * i as i32)
            .collect()
    }
}

/// Compute the night window for `observer` on the evening of `date`.
///
/// # Errors
///
/// * [`Error::NoTwilightBoundary`] when the sun does not set (or rise) around
///   the requested date, as in polar summer or winter.
/// * [`Error::SolarPosition`] when the solar algorithm rejects its inputs.
pub fn night_window(
    observer: &GeoCoordinates,
    date: NaiveDate,
    config: &ObservingConfig,
) -> Result<NightWindow> {
    config.validate()?;

    let noon = date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(12);
    let local_noon = noon - Duration::seconds((observer.longitude() * 240.0).round() as i64);

    let sunset = first_event_after(
        observer,
        date,
        local_noon,
        TwilightEvent::Sunset,
        -1..=1,
        config.delta_t_secs,
    )?;
    let sunrise = first_event_after(
        observer,
        sunset.date_naive(),
        sunset,
        TwilightEvent::Sunrise,
        0..=2,
        config.delta_t_secs,
    )?;

    debug!(
        latitude = observer.latitude(),
        longitude = observer.longitude(),
        %sunset,
        %sunrise,
        "computed night window"
    );
    NightWindow::new(sunset, sunrise)
}

/// Earliest `event` strictly after `after`, scanning UTC days `anchor + offsets`.
///
/// Days without the event (polar conditions) are skipped; if no candidate
/// remains the location has no usable twilight boundary.
fn first_event_after(
    observer: &GeoCoordinates,
    anchor: NaiveDate,
    after: DateTime<Utc>,
    event: TwilightEvent,
    offsets: std::ops::RangeInclusive<i64>,
    delta_t: f64,
) -> Result<DateTime<Utc>> {
    for offset in offsets {
        let day = anchor + Duration::days(offset);
        let Some((sunrise, sunset)) = sun_events(observer, day, delta_t)? else {
            continue;
        };
        let candidate = match event {
            TwilightEvent::Sunset => sunset,
            TwilightEvent::Sunrise => sunrise,
        };
        if candidate > after {
            return Ok(candidate);
        }
    }

    Err(Error::NoTwilightBoundary {
        event,
        date: anchor,
        latitude: observer.latitude(),
        longitude: observer.longitude(),
    })
}

/// Sunrise and sunset for one UTC day, or `None` during polar day/night.
fn sun_events(
    observer: &GeoCoordinates,
    day: NaiveDate,
    delta_t: f64,
) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
    let day_start = day.and_time(NaiveTime::MIN).and_utc();
    let result = spa::sunrise_sunset_for_horizon(
        day_start,
        observer.latitude(),
        observer.longitude(),
        delta_t,
        Horizon::SunriseSunset,
    )
    .map_err(|err| Error::SolarPosition {
        message: err.to_string(),
    })?;

    match result {
        SunriseResult::RegularDay {
            sunrise, sunset, ..
        } => Ok(Some((sunrise, sunset))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn rejects_reversed_window() {
        let sunset = Utc.with_ymd_and_hms(2024, 10, 15, 20, 0, 0).unwrap();
        let err = NightWindow::new(sunset, sunset).expect_err("empty window");
        assert!(matches!(err, Error::InvalidNightWindow { .. }));
    }

    #[test]
    fn ten_hour_night_has_twenty_half_hour_samples() {
        let sunset = Utc.with_ymd_and_hms(2024, 10, 15, 20, 0, 0).unwrap();
        let sunrise = Utc.with_ymd_and_hms(2024, 10, 16, 6, 0, 0).unwrap();
        let window = NightWindow::new(sunset, sunrise).unwrap();

        let samples = window.sample_instants(Duration::minutes(30));
        assert_eq!(samples.len(), 20);
        assert_eq!(samples[0], sunset);
        assert_eq!(
            samples[19],
            Utc.with_ymd_and_hms(2024, 10, 16, 5, 30, 0).unwrap()
        );
        assert_eq!(window.sample_count(Duration::minutes(10)), 60);
    }

    #[test]
    fn partial_steps_are_floored() {
        let sunset = Utc.with_ymd_and_hms(2024, 10, 15, 20, 0, 0).unwrap();
        let sunrise = Utc.with_ymd_and_hms(2024, 10, 15, 21, 29, 59).unwrap();
        let window = NightWindow::new(sunset, sunrise).unwrap();
        assert_eq!(window.sample_count(Duration::minutes(30)), 2);
        assert_eq!(window.sample_count(Duration::zero()), 0);
    }

    #[test]
    fn london_autumn_night() {
        let london = GeoCoordinates::new(51.5, -0.1).unwrap();
        let window = night_window(&london, date(2024, 10, 15), &ObservingConfig::default())
            .expect("regular night");

        assert_eq!(window.sunset().date_naive(), date(2024, 10, 15));
        assert!((15..=17).contains(&window.sunset().hour()));
        assert_eq!(window.sunrise().date_naive(), date(2024, 10, 16));
        assert!((5..=7).contains(&window.sunrise().hour()));

        let hours = window.duration().num_minutes() as f64 / 60.0;
        assert!((13.0..15.0).contains(&hours), "night lasted {hours}h");
    }

    #[test]
    fn far_east_night_starts_on_local_evening() {
        let sydney = GeoCoordinates::new(-33.87, 151.21).unwrap();
        let window = night_window(&sydney, date(2024, 10, 15), &ObservingConfig::default())
            .expect("regular night");

        // Local evening of the 15th is still the 15th in UTC.
        assert_eq!(window.sunset().day(), 15);
        let hours = window.duration().num_minutes() as f64 / 60.0;
        assert!((9.0..13.0).contains(&hours), "night lasted {hours}h");
    }

    #[test]
    fn polar_summer_has_no_sunset() {
        let svalbard = GeoCoordinates::new(78.2, 15.6).unwrap();
        let err = night_window(&svalbard, date(2024, 6, 21), &ObservingConfig::default())
            .expect_err("midnight sun");
        assert!(matches!(
            err,
            Error::NoTwilightBoundary {
                event: TwilightEvent::Sunset,
                ..
            }
        ));
    }

    #[test]
    fn polar_winter_has_no_sunset_either() {
        let svalbard = GeoCoordinates::new(78.2, 15.6).unwrap();
        let result = night_window(&svalbard, date(2024, 12, 21), &ObservingConfig::default());
        assert!(matches!(result, Err(Error::NoTwilightBoundary { .. })));
    }
}

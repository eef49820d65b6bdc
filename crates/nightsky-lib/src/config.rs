//! Observing parameters shared by the night-window and visibility calculations.

use chrono::Duration;

use crate::error::{Error, Result};

/// Default spacing between visibility samples (30 minutes).
pub const DEFAULT_SAMPLE_INTERVAL_SECS: i64 = 1800;

/// Shortest accepted spacing between visibility samples.
pub const MIN_SAMPLE_INTERVAL_SECS: i64 = 1;

/// ΔT (TT − UT1) in seconds used by the solar position algorithm.
pub const DEFAULT_DELTA_T_SECS: f64 = 69.0;

/// Tunable parameters for a night's visibility computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservingConfig {
    /// Spacing between sampled instants across the night window.
    pub sample_interval: Duration,
    /// Altitude an object must strictly exceed to count as visible (degrees).
    pub horizon_altitude_deg: f64,
    /// ΔT passed to the solar position algorithm (seconds).
    pub delta_t_secs: f64,
}

impl Default for ObservingConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::seconds(DEFAULT_SAMPLE_INTERVAL_SECS),
            horizon_altitude_deg: 0.0,
            delta_t_secs: DEFAULT_DELTA_T_SECS,
        }
    }
}

impl ObservingConfig {
    /// Default configuration with a custom sampling cadence in minutes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when `minutes` does not fit in a
    /// [`Duration`].
    pub fn with_step_minutes(minutes: i64) -> Result<Self> {
        let sample_interval =
            Duration::try_minutes(minutes).ok_or_else(|| Error::InvalidConfig {
                message: format!("sample interval of {minutes} minutes is out of range"),
            })?;
        Ok(Self {
            sample_interval,
            ..Self::default()
        })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.sample_interval <= Duration::zero() {
            return Err(Error::InvalidConfig {
                message: format!(
                    "sample interval must be positive, got {}s",
                    self.sample_interval.num_seconds()
                ),
            });
        }

        if self.sample_interval < Duration::seconds(MIN_SAMPLE_INTERVAL_SECS) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "sample interval must be at least {MIN_SAMPLE_INTERVAL_SECS}s, got {}ms",
                    self.sample_interval.num_milliseconds()
                ),
            });
        }

        if !self.horizon_altitude_deg.is_finite()
            || !(-90.0..=90.0).contains(&self.horizon_altitude_deg)
        {
            return Err(Error::InvalidConfig {
                message: format!(
                    "horizon altitude must be between -90 and 90 degrees, got {}",
                    self.horizon_altitude_deg
                ),
            });
        }

        if !self.delta_t_secs.is_finite() {
            return Err(Error::InvalidConfig {
                message: "delta_t must be finite".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_samples_every_half_hour() {
        let config = ObservingConfig::default();
        assert_eq!(config.sample_interval.num_seconds(), 1800);
        assert_eq!(config.horizon_altitude_deg, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_step() {
        let config = ObservingConfig::with_step_minutes(0).unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_horizon_out_of_range() {
        let config = ObservingConfig {
            horizon_altitude_deg: 120.0,
            ..ObservingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_step_that_overflows_duration() {
        let err = ObservingConfig::with_step_minutes(999_999_999_999_999_999).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { ref message } if message.contains("out of range")));
    }

    #[test]
    fn rejects_sub_second_step() {
        let config = ObservingConfig {
            sample_interval: Duration::nanoseconds(500),
            ..ObservingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { ref message }) if message.contains("at least 1s")
        ));

        let one_second = ObservingConfig {
            sample_interval: Duration::seconds(1),
            ..ObservingConfig::default()
        };
        assert!(one_second.validate().is_ok());
    }
}

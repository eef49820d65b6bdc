use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Convenient result alias for the nightsky library.
pub type Result<T> = std::result::Result<T, Error>;

/// Which solar event could not be computed for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwilightEvent {
    Sunset,
    Sunrise,
}

impl std::fmt::Display for TwilightEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TwilightEvent::Sunset => f.write_str("sunset"),
            TwilightEvent::Sunrise => f.write_str("sunrise"),
        }
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A required data table is absent; the caller must generate it first.
    #[error("required data file not found at {path}; run `{hint}` first")]
    DataFileMissing { path: PathBuf, hint: &'static str },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the data tables")]
    ProjectDirsUnavailable,

    /// Raised when a location name could not be found in the location table.
    #[error("unknown location: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when user-supplied observer coordinates are non-finite or out of range.
    #[error("invalid observer coordinates: {message}")]
    InvalidCoordinates { message: String },

    /// Raised when a catalogued object carries an unusable RA/Dec pair.
    #[error("invalid sky coordinate for {name}: ra={ra}, dec={dec}")]
    InvalidSkyCoordinate { name: String, ra: f64, dec: f64 },

    /// The sun does not cross the horizon for this location and date (polar day or night).
    #[error(
        "no {event} on {date} at latitude {latitude}, longitude {longitude} (polar day or night)"
    )]
    NoTwilightBoundary {
        event: TwilightEvent,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
    },

    /// Raised when a night window would end before it starts.
    #[error("sunrise {sunrise} is not after sunset {sunset}")]
    InvalidNightWindow { sunset: String, sunrise: String },

    /// Raised when observing parameters fail validation.
    #[error("invalid observing configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when the solar position algorithm rejects its inputs.
    #[error("solar position calculation failed: {message}")]
    SolarPosition { message: String },

    /// Raised when the coordinate service answers with an unexpected payload.
    #[error("catalog query for {identifier} failed: {message}")]
    CatalogQuery { identifier: String, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV reader errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

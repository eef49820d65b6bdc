//! `window`: sunset and the following sunrise for an observer.

use std::path::Path;

use anyhow::Result;

use nightsky_lib::{night_window, ObservingConfig};

use super::ObserverArgs;
use crate::output::{OutputFormat, WindowOutput};

pub fn handle_window(
    observer: &ObserverArgs,
    data_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let resolved = observer.resolve(data_dir)?;
    let window = night_window(&resolved.coords, resolved.date, &ObservingConfig::default())?;

    format.render(&WindowOutput {
        location: resolved.label,
        latitude: resolved.coords.latitude(),
        longitude: resolved.coords.longitude(),
        date: resolved.date,
        sunset: window.sunset(),
        sunrise: window.sunrise(),
        duration_minutes: window.duration().num_minutes(),
    })
}

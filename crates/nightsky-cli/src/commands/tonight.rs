//! `tonight`: which catalogued stars rise during the night, plus the
//! constellation segments between them.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use nightsky_lib::{sky_report_for, ObservingConfig};

use super::{data_paths, ObserverArgs};
use crate::output::{OutputFormat, TonightOutput};

/// Longest accepted cadence: one day.
const MAX_STEP_MINUTES: i64 = 24 * 60;

#[derive(Args, Debug)]
pub struct TonightArgs {
    #[command(flatten)]
    pub observer: ObserverArgs,
    /// Sampling cadence across the night, in minutes (1 to 1440).
    #[arg(
        long,
        default_value_t = 30,
        value_parser = clap::value_parser!(i64).range(1..=MAX_STEP_MINUTES)
    )]
    pub step_minutes: i64,
}

pub fn handle_tonight(args: &TonightArgs, data_dir: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = ObservingConfig::with_step_minutes(args.step_minutes)?;
    config.validate()?;

    let resolved = args.observer.resolve(data_dir)?;
    let catalog = data_paths(data_dir)?.load_catalog()?;
    let report = sky_report_for(&resolved.coords, resolved.date, &catalog, &config)
        .context("failed to compute tonight's sky")?;

    format.render(&TonightOutput {
        location: resolved.label,
        step_minutes: args.step_minutes,
        report,
    })
}

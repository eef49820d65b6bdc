//! Output formatting for command results.
//!
//! Every command produces a serializable value. `--format json` prints it
//! as pretty JSON; the default text format renders a human-friendly view.

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use clap::ValueEnum;
use serde::Serialize;

use nightsky_lib::SkyReport;

use crate::terminal::{format_hours_minutes, format_ra_hms, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Human-readable rendering of a command result.
pub trait TextRender {
    fn write_text(&self, out: &mut dyn Write, palette: &ColorPalette) -> io::Result<()>;
}

impl OutputFormat {
    /// Render `value` to stdout.
    pub fn render<T: Serialize + TextRender>(self, value: &T) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(value, &mut out, &ColorPalette::detect())
    }

    /// Render `value` to an arbitrary writer.
    pub fn render_to<T: Serialize + TextRender>(
        self,
        value: &T,
        out: &mut dyn Write,
        palette: &ColorPalette,
    ) -> Result<()> {
        match self {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, value)
                    .context("failed to serialize output")?;
                writeln!(out)?;
            }
            OutputFormat::Text => value
                .write_text(out, palette)
                .context("failed to write output")?,
        }
        Ok(())
    }
}

fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Result of `locations build`.
#[derive(Debug, Clone, Serialize)]
pub struct LocationsBuildOutput {
    pub output: String,
    pub parsed: usize,
    pub skipped: usize,
    pub locations: usize,
}

impl TextRender for LocationsBuildOutput {
    fn write_text(&self, out: &mut dyn Write, palette: &ColorPalette) -> io::Result<()> {
        writeln!(
            out,
            "Wrote {}{}{} locations to {}",
            palette.white_bold, self.locations, palette.reset, self.output
        )?;
        writeln!(
            out,
            "{}Parsed {} rows, skipped {} malformed rows{}",
            palette.gray, self.parsed, self.skipped, palette.reset
        )
    }
}

/// One row of `locations search`.
#[derive(Debug, Clone, Serialize)]
pub struct LocationMatch {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Result of `locations search`.
#[derive(Debug, Clone, Serialize)]
pub struct LocationSearchOutput {
    pub query: String,
    pub matches: Vec<LocationMatch>,
}

impl TextRender for LocationSearchOutput {
    fn write_text(&self, out: &mut dyn Write, palette: &ColorPalette) -> io::Result<()> {
        if self.matches.is_empty() {
            return writeln!(out, "No locations match '{}'.", self.query);
        }
        writeln!(out, "Locations matching '{}' ({}):", self.query, self.matches.len())?;
        for entry in &self.matches {
            writeln!(
                out,
                "  {}{}{} {}({:.6}, {:.6}){}",
                palette.white_bold,
                entry.name,
                palette.reset,
                palette.cyan,
                entry.latitude,
                entry.longitude,
                palette.reset
            )?;
        }
        Ok(())
    }
}

/// Result of `catalog build`.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogBuildOutput {
    pub output: String,
    pub resolved: usize,
    pub missing: usize,
    pub failed: usize,
    pub constellations: usize,
}

impl TextRender for CatalogBuildOutput {
    fn write_text(&self, out: &mut dyn Write, palette: &ColorPalette) -> io::Result<()> {
        writeln!(
            out,
            "Wrote {}{}{} stars and {} constellations to {}",
            palette.white_bold, self.resolved, palette.reset, self.constellations, self.output
        )?;
        if self.missing > 0 || self.failed > 0 {
            writeln!(
                out,
                "{}{} identifiers not found, {} queries failed{}",
                palette.gray, self.missing, self.failed, palette.reset
            )?;
        }
        Ok(())
    }
}

/// Result of `window`.
#[derive(Debug, Clone, Serialize)]
pub struct WindowOutput {
    pub location: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    pub sunset: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub duration_minutes: i64,
}

fn write_observer_header(
    out: &mut dyn Write,
    palette: &ColorPalette,
    title: &str,
    location: Option<&str>,
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
) -> io::Result<()> {
    let label = location.unwrap_or("observer");
    writeln!(
        out,
        "{title} for {}{label}{} {}({latitude:.4}°, {longitude:.4}°){} on {date}",
        palette.white_bold, palette.reset, palette.cyan, palette.reset
    )
}

impl TextRender for WindowOutput {
    fn write_text(&self, out: &mut dyn Write, palette: &ColorPalette) -> io::Result<()> {
        write_observer_header(
            out,
            palette,
            "Night window",
            self.location.as_deref(),
            self.latitude,
            self.longitude,
            self.date,
        )?;
        writeln!(
            out,
            "Sunset:  {}{}{}",
            palette.orange,
            timestamp(self.sunset),
            palette.reset
        )?;
        writeln!(
            out,
            "Sunrise: {}{}{}",
            palette.yellow,
            timestamp(self.sunrise),
            palette.reset
        )?;
        writeln!(
            out,
            "Night:   {}",
            format_hours_minutes(chrono::Duration::minutes(self.duration_minutes))
        )
    }
}

/// Result of `tonight`.
#[derive(Debug, Clone, Serialize)]
pub struct TonightOutput {
    pub location: Option<String>,
    pub step_minutes: i64,
    #[serde(flatten)]
    pub report: SkyReport,
}

impl TextRender for TonightOutput {
    fn write_text(&self, out: &mut dyn Write, palette: &ColorPalette) -> io::Result<()> {
        let report = &self.report;
        write_observer_header(
            out,
            palette,
            "Night sky",
            self.location.as_deref(),
            report.observer.latitude(),
            report.observer.longitude(),
            report.date,
        )?;
        writeln!(
            out,
            "Sunset:  {}{}{}",
            palette.orange,
            timestamp(report.window.sunset()),
            palette.reset
        )?;
        writeln!(
            out,
            "Sunrise: {}{}{}",
            palette.yellow,
            timestamp(report.window.sunrise()),
            palette.reset
        )?;
        writeln!(
            out,
            "Night:   {} ({} samples every {} min)",
            format_hours_minutes(report.window.duration()),
            report.samples,
            self.step_minutes
        )?;

        writeln!(out)?;
        writeln!(out, "Visible objects ({}):", report.visible.len())?;
        for (name, position) in report.visible.iter() {
            writeln!(
                out,
                "  {}{:<12}{} {}RA {}  Dec {:+.2}°{}",
                palette.white_bold,
                name,
                palette.reset,
                palette.cyan,
                format_ra_hms(position.ra),
                position.dec,
                palette.reset
            )?;
        }
        writeln!(out, "Constellation segments: {}", report.edges.len())
    }
}

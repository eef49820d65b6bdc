//! `locations` subcommands: build the location table from an observatory
//! catalog and search it.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use nightsky_lib::{parse_observatories, Delimiter};

use super::{data_paths, output_path};
use crate::output::{LocationMatch, LocationSearchOutput, LocationsBuildOutput, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum LocationsCommand {
    /// Convert an observatory catalog CSV into the location table.
    Build(BuildArgs),
    /// List locations whose name contains QUERY (case-insensitive).
    Search {
        /// Substring to look for.
        query: String,
    },
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Observatory catalog CSV (code, longitude, ρcosφ′, ρsinφ′, name...).
    #[arg(long)]
    pub input: PathBuf,
    /// Destination file; defaults to locations.json in the data directory.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Field delimiter of the input.
    #[arg(long, value_enum, default_value_t = DelimiterArg::Auto)]
    pub delimiter: DelimiterArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DelimiterArg {
    Auto,
    Comma,
    Semicolon,
}

impl From<DelimiterArg> for Delimiter {
    fn from(value: DelimiterArg) -> Self {
        match value {
            DelimiterArg::Auto => Delimiter::Auto,
            DelimiterArg::Comma => Delimiter::Comma,
            DelimiterArg::Semicolon => Delimiter::Semicolon,
        }
    }
}

pub fn handle_locations(
    command: LocationsCommand,
    data_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        LocationsCommand::Build(args) => handle_build(&args, data_dir, format),
        LocationsCommand::Search { query } => handle_search(&query, data_dir, format),
    }
}

fn handle_build(args: &BuildArgs, data_dir: Option<&Path>, format: OutputFormat) -> Result<()> {
    let input = File::open(&args.input)
        .with_context(|| format!("failed to open observatory catalog {}", args.input.display()))?;
    let report = parse_observatories(input, args.delimiter.into())
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    let output = output_path(args.output.as_deref(), || Ok(data_paths(data_dir)?.locations))?;
    report
        .table
        .save(&output)
        .with_context(|| format!("failed to write location table to {}", output.display()))?;

    format.render(&LocationsBuildOutput {
        output: output.display().to_string(),
        parsed: report.parsed,
        skipped: report.skipped,
        locations: report.table.len(),
    })
}

fn handle_search(query: &str, data_dir: Option<&Path>, format: OutputFormat) -> Result<()> {
    let table = data_paths(data_dir)?.load_locations()?;
    let matches = table
        .search(query)
        .into_iter()
        .map(|(name, coords)| LocationMatch {
            name: name.to_string(),
            latitude: coords.latitude(),
            longitude: coords.longitude(),
        })
        .collect();

    format.render(&LocationSearchOutput {
        query: query.to_string(),
        matches,
    })
}

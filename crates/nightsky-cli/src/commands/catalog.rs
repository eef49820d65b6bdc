//! `catalog build`: resolve every star of a Stellarium index and write the
//! sky-object table.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use nightsky_lib::{build_sky_catalog, CatalogBuildOptions, SimbadClient, StellariumIndex};

use super::{data_paths, output_path};
use crate::output::{CatalogBuildOutput, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// Query star coordinates for a Stellarium sky culture and write the catalog.
    Build(BuildArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Stellarium sky-culture index.json.
    #[arg(long)]
    pub index: PathBuf,
    /// Destination file; defaults to sky_objects.json in the data directory.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Pause between coordinate queries, in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,
}

pub fn handle_catalog(
    command: CatalogCommand,
    data_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        CatalogCommand::Build(args) => handle_build(&args, data_dir, format),
    }
}

fn handle_build(args: &BuildArgs, data_dir: Option<&Path>, format: OutputFormat) -> Result<()> {
    let index = StellariumIndex::load(&args.index)
        .with_context(|| format!("failed to load Stellarium index {}", args.index.display()))?;
    let output = output_path(args.output.as_deref(), || {
        Ok(data_paths(data_dir)?.sky_objects)
    })?;

    let client = SimbadClient::new().context("failed to create SIMBAD client")?;
    info!(endpoint = client.endpoint(), "starting catalog build (this may take a while)");

    let options = CatalogBuildOptions {
        delay: Duration::from_millis(args.delay_ms),
    };
    let build = build_sky_catalog(&index, &client, &options);
    build
        .catalog
        .save(&output)
        .with_context(|| format!("failed to write sky catalog to {}", output.display()))?;

    format.render(&CatalogBuildOutput {
        output: output.display().to_string(),
        resolved: build.resolved,
        missing: build.missing,
        failed: build.failed,
        constellations: build.catalog.constellations.len(),
    })
}

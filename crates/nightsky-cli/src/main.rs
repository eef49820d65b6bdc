use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nightsky_cli::commands::catalog::{handle_catalog, CatalogCommand};
use nightsky_cli::commands::locations::{handle_locations, LocationsCommand};
use nightsky_cli::commands::tonight::{handle_tonight, TonightArgs};
use nightsky_cli::commands::window::handle_window;
use nightsky_cli::commands::ObserverArgs;
use nightsky_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Which stars rise tonight, and where to look for them")]
struct Cli {
    /// Directory holding locations.json and sky_objects.json (overrides NIGHTSKY_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build or search the observatory location table.
    #[command(subcommand)]
    Locations(LocationsCommand),
    /// Build the star and constellation catalog.
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Show sunset and the following sunrise for an observer.
    Window(ObserverArgs),
    /// List the stars that rise above the horizon tonight.
    Tonight(TonightArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Command::Locations(command) => handle_locations(command, data_dir, cli.format),
        Command::Catalog(command) => handle_catalog(command, data_dir, cli.format),
        Command::Window(observer) => handle_window(&observer, data_dir, cli.format),
        Command::Tonight(args) => handle_tonight(&args, data_dir, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

mod catalog;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::catalog::CatalogCommands;
use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "nearby-cli")]
#[command(about = "Find facilities near a coordinate without running the server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the catalog around a coordinate, nearest first
    Search(SearchArgs),
    /// Catalog file maintenance
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// List the facility categories
    Categories,
}

impl Commands {
    /// `categories` and the bare invocation print static text and read no config.
    fn needs_config(&self) -> bool {
        matches!(self, Commands::Search(_) | Commands::Catalog { .. })
    }
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.command {
        Some(command) if command.needs_config() => Some(nearby_core::load_app_config()?),
        _ => None,
    };
    init_tracing(config.as_ref().map_or("info", |c| c.log_level.as_str()))?;

    match (cli.command, config) {
        (Some(Commands::Search(args)), Some(config)) => search::run_search(&args, &config)?,
        (
            Some(Commands::Catalog {
                command: CatalogCommands::Check { path },
            }),
            Some(config),
        ) => {
            let path = path.unwrap_or(config.catalog_path);
            catalog::run_catalog_check(&path)?;
        }
        (Some(Commands::Categories), _) => catalog::print_categories(),
        _ => println!("nearby-cli: try `nearby-cli search --help`"),
    }

    Ok(())
}

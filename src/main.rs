use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod db;
mod models;
mod transfer;

use commands::{
    CategoryCommand, ConfigCommand, ExportCommand, FoodCommand, ImportCommand, UnitCommand,
};
use config::Config;
use db::{init_db, CatalogRepository};
use transfer::ImportGuard;

#[derive(Parser)]
#[command(name = "foodlib")]
#[command(version)]
#[command(about = "Manage a food library and move it between devices", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the food library to a JSON file
    Export(ExportCommand),

    /// Import a food library file, resolving conflicts with existing items
    Import(ImportCommand),

    /// Browse food items
    Food(FoodCommand),

    /// Manage categories
    Category(CategoryCommand),

    /// Manage measuring units
    Unit(UnitCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodlib=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        Some(command) => {
            let pool = init_db(&config.database_path.value).await?;
            let repo = CatalogRepository::new(pool);

            match command {
                Commands::Export(cmd) => cmd.run(&repo, &config).await?,
                Commands::Import(cmd) => {
                    let guard = ImportGuard::new().with_lock_file(
                        config.database_path.value.with_extension("import.lock"),
                    );
                    cmd.run(&repo, &guard).await?
                }
                Commands::Food(cmd) => cmd.run(&repo).await?,
                Commands::Category(cmd) => cmd.run(&repo).await?,
                Commands::Unit(cmd) => cmd.run(&repo).await?,
                Commands::Config(cmd) => cmd.run(&config)?,
            }
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::db::CatalogRepository;
use crate::models::Unit;

#[derive(Args)]
pub struct UnitCommand {
    #[command(subcommand)]
    pub command: UnitSubcommand,
}

#[derive(Subcommand)]
pub enum UnitSubcommand {
    /// Add a measuring unit
    Add {
        /// Name of the unit, e.g. "gram"
        name: String,

        /// Short symbol, e.g. "g"
        #[arg(long)]
        symbol: String,
    },

    /// List measuring units
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl UnitCommand {
    pub async fn run(&self, repo: &CatalogRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            UnitSubcommand::Add { name, symbol } => {
                if name.trim().is_empty() || symbol.trim().is_empty() {
                    return Err("Unit name and symbol cannot be empty".into());
                }
                let unit = Unit::new(name.trim(), symbol.trim());
                repo.add_unit(&unit).await?;
                println!("Created unit: {}", unit);
                Ok(())
            }

            UnitSubcommand::List { format } => {
                let units = repo.units().await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&units)?);
                    }
                    OutputFormat::Text => {
                        if units.is_empty() {
                            println!("No units found");
                            return Ok(());
                        }
                        for unit in &units {
                            println!("  {}", unit);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

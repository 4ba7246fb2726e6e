use clap::{Args, Subcommand};
use std::collections::HashMap;

use super::OutputFormat;
use crate::db::CatalogRepository;

#[derive(Args)]
pub struct FoodCommand {
    #[command(subcommand)]
    pub command: FoodSubcommand,
}

#[derive(Subcommand)]
pub enum FoodSubcommand {
    /// List the food library
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show favorites
        #[arg(long)]
        favorites: bool,
    },
}

impl FoodCommand {
    pub async fn run(&self, repo: &CatalogRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FoodSubcommand::List { format, favorites } => {
                let mut items = repo.food_items().await?;
                if *favorites {
                    items.retain(|item| item.is_favorite);
                }

                if items.is_empty() {
                    println!("No food items found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    }
                    OutputFormat::Text => {
                        let categories: HashMap<_, _> = repo
                            .categories()
                            .await?
                            .into_iter()
                            .map(|c| (c.id, c.name))
                            .collect();

                        for item in &items {
                            let category = categories
                                .get(&item.category_id)
                                .map(String::as_str)
                                .unwrap_or("Unassigned");
                            println!("  {:20} {}", category, item);
                        }
                        println!("\nTotal: {} item(s)", items.len());
                    }
                }
                Ok(())
            }
        }
    }
}

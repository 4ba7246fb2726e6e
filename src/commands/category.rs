use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::db::CatalogRepository;
use crate::models::Category;

#[derive(Args)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub command: CategorySubcommand,
}

#[derive(Subcommand)]
pub enum CategorySubcommand {
    /// Add a category
    Add {
        /// Name of the category
        name: String,
    },

    /// List categories in display order
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl CategoryCommand {
    pub async fn run(&self, repo: &CatalogRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CategorySubcommand::Add { name } => {
                if name.trim().is_empty() {
                    return Err("Category name cannot be empty".into());
                }
                let category = Category::new(name.trim());
                repo.add_category(&category).await?;
                println!("Created category: {}", category);
                Ok(())
            }

            CategorySubcommand::List { format } => {
                let categories = repo.categories().await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&categories)?);
                    }
                    OutputFormat::Text => {
                        if categories.is_empty() {
                            println!("No categories found");
                            return Ok(());
                        }
                        for category in &categories {
                            println!("  {}", category);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

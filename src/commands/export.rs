use chrono::Utc;
use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::CatalogRepository;
use crate::transfer::{default_export_file_name, export_catalog};

#[derive(Args)]
pub struct ExportCommand {
    /// File to write (default: a timestamped file in the export directory)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl ExportCommand {
    pub async fn run(
        &self,
        repo: &CatalogRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let path = match &self.output {
            Some(path) => path.clone(),
            None => config
                .export_dir
                .value
                .join(default_export_file_name(Utc::now())),
        };

        let report = export_catalog(repo, &path).await?;
        print!("{}", report);
        println!("Written to {}", path.display());
        Ok(())
    }
}

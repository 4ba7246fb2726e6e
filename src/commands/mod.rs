mod category;
mod config_cmd;
mod export;
mod food;
mod import;
mod unit;

pub use category::CategoryCommand;
pub use config_cmd::ConfigCommand;
pub use export::ExportCommand;
pub use food::FoodCommand;
pub use import::ImportCommand;
pub use unit::UnitCommand;

use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

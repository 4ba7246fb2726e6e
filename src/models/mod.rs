mod category;
mod food_item;
mod food_kind;
mod image_source;
mod report;
mod unit;

pub use category::Category;
#[allow(unused_imports)]
pub use food_item::PORTION_INCREMENT;
pub use food_item::{
    round_to_increment, FoodComponent, FoodItem, ImageMetadata, MIN_PORTION_MULTIPLIER,
};
pub use food_kind::FoodKind;
pub use image_source::ImageSource;
#[allow(unused_imports)]
pub use report::{Operation, OperationReport, RagStatus};
pub use unit::Unit;

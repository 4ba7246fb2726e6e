use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a food item stands alone or is assembled from other items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    #[default]
    Single,
    Composite,
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodKind::Single => write!(f, "single"),
            FoodKind::Composite => write!(f, "composite"),
        }
    }
}

impl FromStr for FoodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(FoodKind::Single),
            "composite" => Ok(FoodKind::Composite),
            _ => Err(format!(
                "Invalid food kind '{}'. Valid options: single, composite",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_kind_display() {
        assert_eq!(format!("{}", FoodKind::Single), "single");
        assert_eq!(format!("{}", FoodKind::Composite), "composite");
    }

    #[test]
    fn test_food_kind_from_str() {
        assert_eq!(FoodKind::from_str("single").unwrap(), FoodKind::Single);
        assert_eq!(
            FoodKind::from_str("Composite").unwrap(),
            FoodKind::Composite
        );
    }

    #[test]
    fn test_food_kind_from_str_invalid() {
        let err = FoodKind::from_str("recipe").unwrap_err();
        assert!(err.contains("recipe"));
        assert!(FoodKind::from_str("").is_err());
    }

    #[test]
    fn test_food_kind_default_is_single() {
        assert_eq!(FoodKind::default(), FoodKind::Single);
    }
}

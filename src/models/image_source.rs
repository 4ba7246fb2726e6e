use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a food item's picture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    Local,
    Unsplash,
    Pexels,
    OpenFoodFacts,
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Local => write!(f, "local"),
            ImageSource::Unsplash => write!(f, "unsplash"),
            ImageSource::Pexels => write!(f, "pexels"),
            ImageSource::OpenFoodFacts => write!(f, "openFoodFacts"),
        }
    }
}

impl FromStr for ImageSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(ImageSource::Local),
            "unsplash" => Ok(ImageSource::Unsplash),
            "pexels" => Ok(ImageSource::Pexels),
            "openfoodfacts" => Ok(ImageSource::OpenFoodFacts),
            _ => Err(format!(
                "Invalid image source '{}'. Valid options: local, unsplash, pexels, openFoodFacts",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_source_tag_roundtrip() {
        for source in [
            ImageSource::Local,
            ImageSource::Unsplash,
            ImageSource::Pexels,
            ImageSource::OpenFoodFacts,
        ] {
            assert_eq!(source.to_string().parse::<ImageSource>().unwrap(), source);
        }
    }

    #[test]
    fn test_image_source_case_insensitive() {
        assert_eq!(
            "OPENFOODFACTS".parse::<ImageSource>().unwrap(),
            ImageSource::OpenFoodFacts
        );
    }

    #[test]
    fn test_image_source_invalid() {
        assert!("flickr".parse::<ImageSource>().is_err());
    }
}

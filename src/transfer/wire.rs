//! Wire shapes of the transfer document.
//!
//! Every record field is optional so that foreign or hand-edited documents
//! decode without failing; validation happens in the normalizer.

use serde::{Deserialize, Serialize};

/// Version written into every exported document.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDocument {
    pub format_version: u32,
    pub exported_at: String,
    pub item_count: usize,
    pub items: Vec<TransferRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "categoryID", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Display only, ignored on import.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(with = "non_finite", skip_serializing_if = "Option::is_none")]
    pub portion_equivalent: Option<f64>,
    #[serde(with = "non_finite", skip_serializing_if = "Option::is_none")]
    pub amount_per_portion: Option<f64>,
    #[serde(rename = "unitID", skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    /// Display only, ignored on import.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    /// Display only, ignored on import.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(rename = "imageRemoteURL", skip_serializing_if = "Option::is_none")]
    pub image_remote_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_source: Option<String>,
    #[serde(rename = "imageSourceID", skip_serializing_if = "Option::is_none")]
    pub image_source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_attribution_name: Option<String>,
    #[serde(rename = "imageAttributionURL", skip_serializing_if = "Option::is_none")]
    pub image_attribution_url: Option<String>,
    #[serde(rename = "imageSourceURL", skip_serializing_if = "Option::is_none")]
    pub image_source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_components: Option<Vec<TransferComponent>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferComponent {
    #[serde(rename = "foodItemID", skip_serializing_if = "Option::is_none")]
    pub food_item_id: Option<String>,
    #[serde(with = "non_finite", skip_serializing_if = "Option::is_none")]
    pub portion_multiplier: Option<f64>,
}

/// Reals that may be non-finite, written as `"Infinity"`, `"-Infinity"` or `"NaN"`.
pub mod non_finite {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub const INFINITY: &str = "Infinity";
    pub const NEG_INFINITY: &str = "-Infinity";
    pub const NAN: &str = "NaN";

    pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) if v.is_nan() => serializer.serialize_str(NAN),
            Some(v) if v.is_infinite() && v.is_sign_positive() => serializer.serialize_str(INFINITY),
            Some(v) if v.is_infinite() => serializer.serialize_str(NEG_INFINITY),
            Some(v) => serializer.serialize_f64(*v),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts numbers, the three tokens, and numeric strings. Anything else reads as absent.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_token(&s),
            _ => None,
        }))
    }

    fn parse_token(s: &str) -> Option<f64> {
        match s.trim() {
            INFINITY => Some(f64::INFINITY),
            NEG_INFINITY => Some(f64::NEG_INFINITY),
            NAN => Some(f64::NAN),
            other => other.parse::<f64>().ok(),
        }
    }
}

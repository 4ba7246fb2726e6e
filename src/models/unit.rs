use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A measuring unit, e.g. grams or millilitres.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    pub id: Uuid,
    pub name: String,
    pub symbol: String,
}

impl Unit {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.symbol)
    }
}

use thiserror::Error;

use crate::db::StoreError;

/// Failures that abort an export or import attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Could not read import file: {0}")]
    UnreadableFile(String),

    #[error("The file contains no importable food items")]
    EmptyOrAllInvalid,

    #[error("Could not save food items: {0}")]
    StoreFailure(String),

    #[error("Another import is already in progress")]
    AttemptInProgress,

    #[error("Could not export the food library: {0}")]
    Encode(String),
}

impl From<StoreError> for ImportError {
    fn from(e: StoreError) -> Self {
        ImportError::StoreFailure(e.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_underlying_detail() {
        let err = ImportError::UnreadableFile("expected value at line 1 column 1".into());
        assert_eq!(
            err.to_string(),
            "Could not read import file: expected value at line 1 column 1"
        );

        let err: ImportError = StoreError("disk full".into()).into();
        assert_eq!(err, ImportError::StoreFailure("disk full".into()));
        assert!(err.to_string().ends_with("disk full"));
    }
}

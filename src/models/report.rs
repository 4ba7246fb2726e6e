use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Export,
    Import,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Export => write!(f, "export"),
            Operation::Import => write!(f, "import"),
        }
    }
}

/// Red/amber/green outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RagStatus {
    Green,
    Amber,
    Red,
}

impl fmt::Display for RagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RagStatus::Green => write!(f, "green"),
            RagStatus::Amber => write!(f, "amber"),
            RagStatus::Red => write!(f, "red"),
        }
    }
}

/// Outcome summary of a finished export or import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationReport {
    pub operation: Operation,
    pub status: RagStatus,
    pub processed_count: usize,
    pub added_count: usize,
    pub changed_count: usize,
    pub kept_count: usize,
    pub skipped_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl OperationReport {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            status: RagStatus::Green,
            processed_count: 0,
            added_count: 0,
            changed_count: 0,
            kept_count: 0,
            skipped_count: 0,
            file_name: None,
            completed_at: Utc::now(),
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }
}

impl fmt::Display for OperationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.operation {
            Operation::Export => "Export complete",
            Operation::Import => "Import complete",
        };
        writeln!(f, "{}", title)?;
        writeln!(f, "{}", "=".repeat(title.len()))?;
        writeln!(f, "Status: {}", self.status)?;
        if let Some(file_name) = &self.file_name {
            writeln!(f, "File: {}", file_name)?;
        }
        writeln!(f, "Processed: {}", self.processed_count)?;
        if self.operation == Operation::Import {
            writeln!(f, "Added: {}", self.added_count)?;
            writeln!(f, "Replaced: {}", self.changed_count)?;
            if self.kept_count > 0 {
                writeln!(f, "Kept existing: {}", self.kept_count)?;
            }
            if self.skipped_count > 0 {
                writeln!(f, "Skipped: {}", self.skipped_count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults_to_green() {
        let report = OperationReport::new(Operation::Import);
        assert_eq!(report.status, RagStatus::Green);
        assert_eq!(report.processed_count, 0);
        assert!(report.file_name.is_none());
    }

    #[test]
    fn test_report_display_import() {
        let mut report = OperationReport::new(Operation::Import)
            .with_file_name(Some("foods.json".to_string()));
        report.processed_count = 4;
        report.added_count = 3;
        report.changed_count = 1;
        report.skipped_count = 2;

        let output = format!("{}", report);
        assert!(output.contains("Import complete"));
        assert!(output.contains("File: foods.json"));
        assert!(output.contains("Added: 3"));
        assert!(output.contains("Replaced: 1"));
        assert!(output.contains("Skipped: 2"));
        assert!(!output.contains("Kept existing"));
    }

    #[test]
    fn test_report_json_tags() {
        let report = OperationReport::new(Operation::Export);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["operation"], "export");
        assert_eq!(json["status"], "green");
        assert!(json.get("file_name").is_none());
    }
}

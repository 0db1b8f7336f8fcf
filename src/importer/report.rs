// ==========================================
// Import report
// ==========================================
// Violations, summary counts and the per-run report handed back by the
// importer. One report per run, identified by a UUID.
// ==========================================

use crate::importer::sheet_locator::LocatedSheet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure policy for invalid rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Abort on the first invalid row (default)
    FailFast,
    /// Skip invalid rows, report them at the end
    CollectErrors,
}

/// Violation severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationLevel {
    /// Invalid row, skipped under CollectErrors
    Error,
    /// Suspicious data, import continues
    Warning,
    /// Duplicate key, first occurrence wins
    Conflict,
    /// Recorded only
    Info,
}

/// One reported data problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportViolation {
    pub level: ViolationLevel,
    pub sheet: Option<String>,
    pub row: Option<usize>,
    pub field: Option<String>,
    pub part_no: Option<String>,
    pub message: String,
}

impl ImportViolation {
    /// Row failure kept under CollectErrors
    pub fn row_error(sheet: String, row: usize, field: String, message: String) -> Self {
        Self {
            level: ViolationLevel::Error,
            sheet: Some(sheet),
            row: Some(row),
            field: Some(field),
            part_no: None,
            message,
        }
    }

    /// Duplicate key inside one run
    pub fn conflict(part_no: String, message: String) -> Self {
        Self {
            level: ViolationLevel::Conflict,
            sheet: None,
            row: None,
            field: None,
            part_no: Some(part_no),
            message,
        }
    }

    /// Dangling auxiliary record
    pub fn warning(part_no: String, message: String) -> Self {
        Self {
            level: ViolationLevel::Warning,
            sheet: None,
            row: None,
            field: None,
            part_no: Some(part_no),
            message,
        }
    }

    /// Observation, no action needed
    pub fn info(part_no: String, message: String) -> Self {
        Self {
            level: ViolationLevel::Info,
            sheet: None,
            row: None,
            field: None,
            part_no: Some(part_no),
            message,
        }
    }
}

/// Summary counts for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub price_rows: usize,
    pub master_data_rows: usize,
    pub new_release_rows: usize,
    pub discontinued_rows: usize,
    pub reference_rows: usize,
    pub sections: usize,
    pub subsections: usize,
    pub groups: usize,
    pub part_numbers: usize,
}

/// Per-run import report
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Run ID (UUID)
    pub run_id: String,
    pub source_file: Option<String>,
    pub located_sheets: Vec<LocatedSheet>,
    pub summary: ImportSummary,
    pub violations: Vec<ImportViolation>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl ImportReport {
    pub fn count(&self, level: ViolationLevel) -> usize {
        self.violations.iter().filter(|v| v.level == level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(ViolationLevel::Error) > 0
    }
}

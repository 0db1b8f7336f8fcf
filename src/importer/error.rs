// ==========================================
// Importer error types
// ==========================================
// Tool: thiserror derive macros
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Importer error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (only .xlsx workbooks)")]
    UnsupportedFormat(String),

    #[error("workbook read failed: {0}")]
    WorkbookRead(String),

    // ===== Structural errors =====
    #[error("unsupported file structure: {0}")]
    UnsupportedFileStructure(String),

    #[error("missing worksheet: {0}")]
    MissingSheet(String),

    // ===== Row validation =====
    #[error("invalid row (sheet '{sheet}', row {row}, field {field}): {message}")]
    RowValidation {
        sheet: String,
        row: usize,
        field: String,
        message: String,
    },

    // ===== Configuration errors =====
    #[error("invalid validator pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    // ===== Persistence errors =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== Generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::WorkbookRead(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::WorkbookRead(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;

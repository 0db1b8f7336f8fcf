// ==========================================
// Importer layer
// ==========================================
// Turns a Bosch price workbook into a catalogue snapshot and writes it
// to the catalogue database. Offline counterpart of the HTTP API.
// ==========================================

// Module declarations
pub mod error;
pub mod hierarchy_builder;
pub mod price_importer;
pub mod report;
pub mod row_extractor;
pub mod schema;
pub mod sheet_locator;
pub mod validators;
pub mod workbook;

// Re-export core types
pub use error::{ImportError, ImportResult};
pub use hierarchy_builder::{build_catalogue, BuildOutcome};
pub use price_importer::{ParseOutcome, PriceImporter};
pub use report::{ImportPolicy, ImportReport, ImportSummary, ImportViolation, ViolationLevel};
pub use row_extractor::RecordIter;
pub use schema::{catalogue_schemas, ColumnSpec, ExtractedRecord, RecordKind, SheetSchema};
pub use sheet_locator::{locate_sheets, LocatedSheet};
pub use validators::{FieldRule, FieldValidators, FieldValue};
pub use workbook::{range_from_rows, MemoryWorkbook, WorkbookSource, XlsxWorkbook};

// ==========================================
// Price importer
// ==========================================
// Orchestrates one import run: locate sheets, extract and validate rows,
// fold the hierarchy, replace the catalogue database contents, report.
// The workbook is opened once per run and every stage reuses the same
// validator set.
// ==========================================

use crate::config::ImportSettings;
use crate::domain::CatalogueSnapshot;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::hierarchy_builder::build_catalogue;
use crate::importer::report::{ImportPolicy, ImportReport, ImportSummary, ImportViolation};
use crate::importer::row_extractor::RecordIter;
use crate::importer::schema::{catalogue_schemas, ExtractedRecord, SheetSchema};
use crate::importer::sheet_locator::{locate_sheets, LocatedSheet};
use crate::importer::validators::FieldValidators;
use crate::importer::workbook::{WorkbookSource, XlsxWorkbook};
use crate::repository::catalogue_repo::CatalogueRepository;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Workbook parsed into a snapshot, not yet persisted
#[derive(Debug)]
pub struct ParseOutcome {
    pub located_sheets: Vec<LocatedSheet>,
    pub snapshot: CatalogueSnapshot,
    pub violations: Vec<ImportViolation>,
    pub summary: ImportSummary,
}

/// One-shot importer for Bosch price workbooks
pub struct PriceImporter {
    validators: FieldValidators,
    schemas: Vec<SheetSchema>,
    policy: ImportPolicy,
}

impl PriceImporter {
    pub fn new(settings: &ImportSettings) -> ImportResult<Self> {
        let policy = if settings.fail_fast {
            ImportPolicy::FailFast
        } else {
            ImportPolicy::CollectErrors
        };

        Ok(Self {
            validators: FieldValidators::new(settings)?,
            schemas: catalogue_schemas()?,
            policy,
        })
    }

    pub fn policy(&self) -> ImportPolicy {
        self.policy
    }

    /// Import an .xlsx file and replace the catalogue database contents
    pub fn import_file<P: AsRef<Path>>(
        &self,
        path: P,
        repo: &CatalogueRepository,
    ) -> ImportResult<ImportReport> {
        let path = path.as_ref();
        let mut source = XlsxWorkbook::open(path)?;
        self.import_workbook(&mut source, Some(&path.display().to_string()), repo)
    }

    /// Import from any workbook source
    pub fn import_workbook(
        &self,
        source: &mut dyn WorkbookSource,
        source_file: Option<&str>,
        repo: &CatalogueRepository,
    ) -> ImportResult<ImportReport> {
        let started_at = Utc::now();
        let timer = Instant::now();
        let run_id = Uuid::new_v4().to_string();

        info!(
            run_id = %run_id,
            file = source_file.unwrap_or("<in-memory>"),
            policy = ?self.policy,
            "import run started"
        );

        let outcome = self.parse_workbook(source)?;
        repo.replace_catalogue(&outcome.snapshot)?;

        let report = ImportReport {
            run_id,
            source_file: source_file.map(|s| s.to_string()),
            located_sheets: outcome.located_sheets,
            summary: outcome.summary,
            violations: outcome.violations,
            started_at,
            elapsed_ms: timer.elapsed().as_millis() as u64,
        };

        info!(
            run_id = %report.run_id,
            price_rows = report.summary.price_rows,
            part_numbers = report.summary.part_numbers,
            violations = report.violations.len(),
            elapsed_ms = report.elapsed_ms,
            "import run finished"
        );

        Ok(report)
    }

    /// Parse and validate a workbook without touching the database
    pub fn parse_workbook(&self, source: &mut dyn WorkbookSource) -> ImportResult<ParseOutcome> {
        let sheet_names = source.sheet_names();
        let located = locate_sheets(&sheet_names, &self.schemas)?;

        let mut violations: Vec<ImportViolation> = Vec::new();
        let mut located_sheets: Vec<LocatedSheet> = Vec::new();

        let mut price_rows = Vec::new();
        let mut master_rows = Vec::new();
        let mut new_release_rows = Vec::new();
        let mut discontinued_rows = Vec::new();
        let mut reference_rows = Vec::new();

        for (schema, slot) in self.schemas.iter().zip(&located) {
            let Some(found) = slot else { continue };
            located_sheets.push(found.clone());

            let range = source.worksheet(&found.sheet_name)?;
            for item in RecordIter::new(&range, schema, &self.validators, &found.sheet_name) {
                match item {
                    Ok(ExtractedRecord::PriceList(r)) => price_rows.push(r),
                    Ok(ExtractedRecord::MasterData(r)) => master_rows.push(r),
                    Ok(ExtractedRecord::NewRelease(r)) => new_release_rows.push(r),
                    Ok(ExtractedRecord::Discontinued(r)) => discontinued_rows.push(r),
                    Ok(ExtractedRecord::Reference(r)) => reference_rows.push(r),
                    Err(err) => self.handle_row_error(err, &mut violations)?,
                }
            }
        }

        let summary_rows = (
            price_rows.len(),
            master_rows.len(),
            new_release_rows.len(),
            discontinued_rows.len(),
            reference_rows.len(),
        );

        let outcome = build_catalogue(
            price_rows,
            master_rows,
            new_release_rows,
            discontinued_rows,
            reference_rows,
        );
        violations.extend(outcome.violations);

        let tree = &outcome.snapshot.tree;
        let summary = ImportSummary {
            price_rows: summary_rows.0,
            master_data_rows: summary_rows.1,
            new_release_rows: summary_rows.2,
            discontinued_rows: summary_rows.3,
            reference_rows: summary_rows.4,
            sections: tree.sections.len(),
            subsections: tree.sections.iter().map(|s| s.subsections.len()).sum(),
            groups: tree.group_count(),
            part_numbers: outcome.snapshot.part_numbers.len(),
        };

        Ok(ParseOutcome {
            located_sheets,
            snapshot: outcome.snapshot,
            violations,
            summary,
        })
    }

    /// Apply the failure policy to one bad row
    ///
    /// Only row validation failures are skippable; everything else stays
    /// fatal in both modes.
    fn handle_row_error(
        &self,
        err: ImportError,
        violations: &mut Vec<ImportViolation>,
    ) -> ImportResult<()> {
        match (self.policy, err) {
            (
                ImportPolicy::CollectErrors,
                ImportError::RowValidation {
                    sheet,
                    row,
                    field,
                    message,
                },
            ) => {
                warn!(sheet = %sheet, row, field = %field, "row skipped: {message}");
                violations.push(ImportViolation::row_error(sheet, row, field, message));
                Ok(())
            }
            (_, err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::report::ViolationLevel;
    use crate::importer::workbook::{range_from_rows, MemoryWorkbook};
    use calamine::Data;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn price_sheet_row(part_no: &str, section: &str, price: f64) -> Vec<Data> {
        let mut row = vec![Data::Empty; 16];
        row[0] = text(part_no);
        row[1] = text("Фільтр паливний");
        row[2] = text("Fuel filter");
        row[5] = text(section);
        row[6] = text("1.1. Diesel Injection");
        row[7] = text("1.1.1. Nozzles");
        row[8] = Data::Int(8409990000);
        row[9] = Data::Int(1);
        row[10] = Data::Int(5);
        row[12] = Data::Float(price);
        row[15] = text("X");
        row
    }

    fn workbook(rows: Vec<Vec<Data>>) -> MemoryWorkbook {
        let mut header = vec![Data::Empty; 16];
        header[0] = text("Part No");

        let mut sheet_rows = vec![header];
        sheet_rows.extend(rows);

        let mut wb = MemoryWorkbook::new();
        wb.add_sheet("PriceList", range_from_rows(sheet_rows));
        wb
    }

    #[test]
    fn test_parse_valid_workbook() {
        let importer = PriceImporter::new(&ImportSettings::default()).unwrap();
        let mut wb = workbook(vec![
            price_sheet_row("F00HN37002", "1. Automotive Aftermarket", 101.991),
            price_sheet_row("F00HN37003", "1. Automotive Aftermarket", 55.5),
        ]);

        let outcome = importer.parse_workbook(&mut wb).unwrap();
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.summary.price_rows, 2);
        assert_eq!(outcome.summary.sections, 1);
        assert_eq!(outcome.summary.groups, 1);
        assert_eq!(outcome.located_sheets.len(), 1);

        let group = &outcome.snapshot.tree.sections[0].subsections[0].groups[0];
        assert_eq!(group.parts[0].price.to_string(), "101.99");
    }

    #[test]
    fn test_fail_fast_aborts_on_first_bad_row() {
        let importer = PriceImporter::new(&ImportSettings::default()).unwrap();
        let mut wb = workbook(vec![
            price_sheet_row("F00HN37002", "1. Automotive Aftermarket", 10.0),
            price_sheet_row("F00HN37003", "1 Automotive Aftermarket", 10.0),
        ]);

        let err = importer.parse_workbook(&mut wb).unwrap_err();
        match err {
            ImportError::RowValidation {
                sheet, row, field, ..
            } => {
                assert_eq!(sheet, "PriceList");
                assert_eq!(row, 3);
                assert_eq!(field, "section");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_collect_mode_skips_and_reports() {
        let settings = ImportSettings {
            fail_fast: false,
            ..ImportSettings::default()
        };
        let importer = PriceImporter::new(&settings).unwrap();
        assert_eq!(importer.policy(), ImportPolicy::CollectErrors);

        let mut wb = workbook(vec![
            price_sheet_row("F00HN37002", "1. Automotive Aftermarket", 10.0),
            price_sheet_row("f00hn37003", "1. Automotive Aftermarket", 10.0),
        ]);

        let outcome = importer.parse_workbook(&mut wb).unwrap();
        assert_eq!(outcome.summary.price_rows, 1);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].level, ViolationLevel::Error);
        assert_eq!(outcome.violations[0].field.as_deref(), Some("part_no"));
    }

    #[test]
    fn test_workbook_without_price_sheet_fails() {
        let importer = PriceImporter::new(&ImportSettings::default()).unwrap();
        let mut wb = MemoryWorkbook::new();
        wb.add_sheet("Master Data", range_from_rows(vec![vec![text("Part No")]]));

        let err = importer.parse_workbook(&mut wb).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFileStructure(_)));
    }
}

// Offline importer: parse a Bosch price workbook and replace the catalogue
// database with its contents.
//
// Usage:
//   bp-import <workbook.xlsx>
//
// Destination and policy come from the environment: BP_DB_PATH picks the
// database file, BP_IMPORT_FAIL_FAST=false collects bad rows into the
// report instead of aborting on the first one.

use std::process::ExitCode;

use bosch_price::config::settings::{default_catalogue_db_path, ImportSettings};
use bosch_price::importer::error::ImportResult;
use bosch_price::importer::price_importer::PriceImporter;
use bosch_price::importer::report::{ImportReport, ViolationLevel};
use bosch_price::logging;
use bosch_price::repository::CatalogueRepository;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [workbook_path] = args.as_slice() else {
        eprintln!("usage: bp-import <workbook.xlsx>");
        return ExitCode::from(2);
    };

    match run(workbook_path) {
        Ok(report) => {
            log_report(&report);
            if report.has_errors() {
                // catalogue was replaced, but rows were dropped
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("import failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(workbook_path: &str) -> ImportResult<ImportReport> {
    let settings = ImportSettings::from_env();
    let db_path = std::env::var("BP_DB_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_catalogue_db_path);

    tracing::info!(
        workbook = workbook_path,
        db = %db_path,
        fail_fast = settings.fail_fast,
        "starting import"
    );

    let importer = PriceImporter::new(&settings)?;
    let repository = CatalogueRepository::new(&db_path);
    importer.import_file(workbook_path, &repository)
}

fn log_report(report: &ImportReport) {
    tracing::info!(
        run_id = %report.run_id,
        elapsed_ms = report.elapsed_ms,
        price_rows = report.summary.price_rows,
        master_data_rows = report.summary.master_data_rows,
        new_release_rows = report.summary.new_release_rows,
        discontinued_rows = report.summary.discontinued_rows,
        reference_rows = report.summary.reference_rows,
        sections = report.summary.sections,
        groups = report.summary.groups,
        part_numbers = report.summary.part_numbers,
        "import finished"
    );

    for violation in &report.violations {
        match violation.level {
            ViolationLevel::Error => tracing::error!(
                sheet = violation.sheet.as_deref().unwrap_or("-"),
                row = violation.row.unwrap_or(0),
                field = violation.field.as_deref().unwrap_or("-"),
                "{}",
                violation.message
            ),
            ViolationLevel::Warning | ViolationLevel::Conflict => tracing::warn!(
                part_no = violation.part_no.as_deref().unwrap_or("-"),
                "{}",
                violation.message
            ),
            ViolationLevel::Info => tracing::info!(
                part_no = violation.part_no.as_deref().unwrap_or("-"),
                "{}",
                violation.message
            ),
        }
    }

    let skipped = report.count(ViolationLevel::Error);
    if skipped > 0 {
        tracing::warn!(skipped, "import completed with skipped rows");
    }
}

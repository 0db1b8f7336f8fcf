// ==========================================
// Sheet locator
// ==========================================
// Maps schemas to actual worksheet names. Detection is by name pattern
// only; the first matching sheet in workbook order wins, later matches
// are ignored.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema::{RecordKind, SheetSchema};
use tracing::debug;

/// A schema resolved to a concrete worksheet
#[derive(Debug, Clone, serde::Serialize)]
pub struct LocatedSheet {
    pub kind: RecordKind,
    pub sheet_name: String,
}

/// Resolve every schema against the workbook's sheet names
///
/// Returns one entry per schema, in schema order. A missing optional sheet
/// yields None; a missing mandatory sheet fails the run.
pub fn locate_sheets(
    sheet_names: &[String],
    schemas: &[SheetSchema],
) -> ImportResult<Vec<Option<LocatedSheet>>> {
    let mut located = Vec::with_capacity(schemas.len());

    for schema in schemas {
        let found = sheet_names
            .iter()
            .find(|name| schema.detection.is_match(name));

        match found {
            Some(name) => {
                debug!(kind = schema.kind.label(), sheet = %name, "worksheet located");
                located.push(Some(LocatedSheet {
                    kind: schema.kind,
                    sheet_name: name.clone(),
                }));
            }
            None if schema.mandatory => {
                return Err(ImportError::UnsupportedFileStructure(format!(
                    "no worksheet matches the {} name pattern",
                    schema.kind.label()
                )));
            }
            None => {
                debug!(kind = schema.kind.label(), "optional worksheet absent");
                located.push(None);
            }
        }
    }

    Ok(located)
}

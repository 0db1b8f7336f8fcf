// ==========================================
// Row extractor
// ==========================================
// One generic pull-based iterator over a worksheet range, driven by the
// sheet's schema. Consumed within a single import run; not restartable.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema::{ExtractedRecord, SheetSchema};
use crate::importer::validators::FieldValidators;
use calamine::{Data, Range};
use std::collections::HashMap;

static EMPTY_CELL: Data = Data::Empty;

/// Iterator of validated records over one worksheet
///
/// Row 1 is always a header and is skipped. Cells outside the used range
/// read as empty and fail the same validators as any other bad value;
/// blank rows inside the data region are not special-cased.
pub struct RecordIter<'a> {
    range: &'a Range<Data>,
    schema: &'a SheetSchema,
    validators: &'a FieldValidators,
    sheet_name: &'a str,
    /// Absolute 0-based row to read next
    next_row: u32,
    /// Absolute 0-based last used row, None for an empty sheet
    last_row: Option<u32>,
}

impl<'a> RecordIter<'a> {
    pub fn new(
        range: &'a Range<Data>,
        schema: &'a SheetSchema,
        validators: &'a FieldValidators,
        sheet_name: &'a str,
    ) -> Self {
        Self {
            last_row: range.end().map(|(row, _)| row),
            range,
            schema,
            validators,
            sheet_name,
            next_row: 1,
        }
    }

    fn extract_row(&self, row: u32) -> ImportResult<ExtractedRecord> {
        let mut fields = HashMap::with_capacity(self.schema.columns.len());

        for spec in &self.schema.columns {
            let cell = self
                .range
                .get_value((row, spec.column as u32))
                .unwrap_or(&EMPTY_CELL);

            match self.validators.apply(spec.rule, cell) {
                Ok(value) => {
                    fields.insert(spec.field, value);
                }
                Err(message) => {
                    return Err(ImportError::RowValidation {
                        sheet: self.sheet_name.to_string(),
                        // 1-based workbook row, as shown in a spreadsheet UI
                        row: (row + 1) as usize,
                        field: spec.field.to_string(),
                        message,
                    });
                }
            }
        }

        self.schema.kind.assemble(&mut fields)
    }
}

impl Iterator for RecordIter<'_> {
    type Item = ImportResult<ExtractedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let last = self.last_row?;
        if self.next_row > last {
            return None;
        }

        let row = self.next_row;
        self.next_row += 1;
        Some(self.extract_row(row))
    }
}

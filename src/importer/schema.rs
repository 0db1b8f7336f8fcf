// ==========================================
// Worksheet schemas
// ==========================================
// Declarative description of every worksheet kind: how to recognize the
// sheet by name, which columns are mapped, and which rule validates each
// cell. The row extractor walks these tables instead of hard-coding one
// loop per sheet.
// ==========================================

use crate::domain::{
    DiscontinuedRecord, MasterDataRecord, NewReleaseRecord, PriceListRecord, ReferenceRecord,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::validators::{FieldRule, FieldValue};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

// ==========================================
// Sheet name detection patterns
// ==========================================
// Matched case-insensitively anywhere in the sheet name; the first sheet
// in workbook order wins.

pub const SHEET_PRICELIST_PATTERN: &str = "pricelist";
pub const SHEET_MASTER_DATA_PATTERN: &str = "master data";
pub const SHEET_NEW_RELEASE_PATTERN: &str = "new release|новий";
pub const SHEET_DISCONTINUED_PATTERN: &str = "зняті";
pub const SHEET_REFERENCES_PATTERN: &str = "замін";

/// Worksheet kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RecordKind {
    PriceList,
    MasterData,
    NewRelease,
    Discontinued,
    References,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::PriceList => "price list",
            RecordKind::MasterData => "master data",
            RecordKind::NewRelease => "new release",
            RecordKind::Discontinued => "discontinued",
            RecordKind::References => "references",
        }
    }
}

/// One validated record out of any worksheet
#[derive(Debug, Clone)]
pub enum ExtractedRecord {
    PriceList(PriceListRecord),
    MasterData(MasterDataRecord),
    NewRelease(NewReleaseRecord),
    Discontinued(DiscontinuedRecord),
    Reference(ReferenceRecord),
}

/// Mapped worksheet column
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub field: &'static str,
    /// 0-based worksheet column
    pub column: usize,
    pub rule: FieldRule,
}

/// Recognition plus column map for one worksheet kind
#[derive(Debug, Clone)]
pub struct SheetSchema {
    pub kind: RecordKind,
    pub detection: Regex,
    /// Import fails when a mandatory sheet is absent
    pub mandatory: bool,
    pub columns: Vec<ColumnSpec>,
}

fn col(field: &'static str, column: usize, rule: FieldRule) -> ColumnSpec {
    ColumnSpec {
        field,
        column,
        rule,
    }
}

fn detection(pattern: &str) -> ImportResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ImportError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Schemas for a Bosch price workbook, in location order
pub fn catalogue_schemas() -> ImportResult<Vec<SheetSchema>> {
    Ok(vec![
        SheetSchema {
            kind: RecordKind::PriceList,
            detection: detection(SHEET_PRICELIST_PATTERN)?,
            mandatory: true,
            columns: vec![
                col("part_no", 0, FieldRule::PartNo),            // A
                col("title_ua", 1, FieldRule::TitleUa),          // B
                col("title_en", 2, FieldRule::TitleEn),          // C
                col("section", 5, FieldRule::SectionLabel),      // F
                col("subsection", 6, FieldRule::SubsectionLabel), // G
                col("group", 7, FieldRule::GroupLabel),          // H
                col("uktzed", 8, FieldRule::Integer),            // I
                col("min_order", 9, FieldRule::Integer),         // J
                col("quantity", 10, FieldRule::Integer),         // K
                col("price", 12, FieldRule::Price),              // M
                col("truck", 15, FieldRule::TruckFlag),          // P
            ],
        },
        SheetSchema {
            kind: RecordKind::MasterData,
            detection: detection(SHEET_MASTER_DATA_PATTERN)?,
            mandatory: false,
            columns: vec![
                col("part_no", 0, FieldRule::PartNo),           // A
                col("ean", 1, FieldRule::Integer),              // B
                col("gross", 2, FieldRule::Decimal),            // C
                col("net", 3, FieldRule::Decimal),              // D
                col("weight_unit", 4, FieldRule::Unit("KG")),   // E
                col("length", 5, FieldRule::Integer),           // F
                col("width", 6, FieldRule::Integer),            // G
                col("height", 7, FieldRule::Integer),           // H
                col("measure_unit", 8, FieldRule::Unit("MM")),  // I
                col("volume", 9, FieldRule::Decimal),           // J
                col("volume_unit", 10, FieldRule::Unit("L")),   // K
            ],
        },
        SheetSchema {
            kind: RecordKind::NewRelease,
            detection: detection(SHEET_NEW_RELEASE_PATTERN)?,
            mandatory: false,
            columns: vec![col("part_no", 0, FieldRule::PartNo)], // A
        },
        SheetSchema {
            kind: RecordKind::Discontinued,
            detection: detection(SHEET_DISCONTINUED_PATTERN)?,
            mandatory: false,
            columns: vec![col("part_no", 0, FieldRule::PartNo)], // A
        },
        SheetSchema {
            kind: RecordKind::References,
            detection: detection(SHEET_REFERENCES_PATTERN)?,
            mandatory: false,
            columns: vec![
                col("predecessor", 0, FieldRule::PartNo), // A
                col("successor", 1, FieldRule::PartNo),   // B
            ],
        },
    ])
}

// ==========================================
// Record assembly
// ==========================================

impl RecordKind {
    /// Build a typed record from the validated fields of one row
    ///
    /// Field names follow the column specs above; a missing or mistyped
    /// field is a schema bug, not bad input.
    pub fn assemble(
        self,
        fields: &mut HashMap<&'static str, FieldValue>,
    ) -> ImportResult<ExtractedRecord> {
        match self {
            RecordKind::PriceList => Ok(ExtractedRecord::PriceList(PriceListRecord {
                part_no: take_text(fields, "part_no")?,
                title_ua: take_text(fields, "title_ua")?,
                title_en: take_text(fields, "title_en")?,
                section: take_text(fields, "section")?,
                subsection: take_text(fields, "subsection")?,
                group: take_text(fields, "group")?,
                uktzed: take_int(fields, "uktzed")?,
                min_order: take_int(fields, "min_order")?,
                quantity: take_int(fields, "quantity")?,
                price: take_dec(fields, "price")?,
                truck: take_flag(fields, "truck")?,
            })),
            RecordKind::MasterData => Ok(ExtractedRecord::MasterData(MasterDataRecord {
                part_no: take_text(fields, "part_no")?,
                ean: take_int(fields, "ean")?,
                gross: take_dec(fields, "gross")?,
                net: take_dec(fields, "net")?,
                weight_unit: take_text(fields, "weight_unit")?,
                length: take_int(fields, "length")?,
                width: take_int(fields, "width")?,
                height: take_int(fields, "height")?,
                measure_unit: take_text(fields, "measure_unit")?,
                volume: take_dec(fields, "volume")?,
                volume_unit: take_text(fields, "volume_unit")?,
            })),
            RecordKind::NewRelease => Ok(ExtractedRecord::NewRelease(NewReleaseRecord {
                part_no: take_text(fields, "part_no")?,
            })),
            RecordKind::Discontinued => Ok(ExtractedRecord::Discontinued(DiscontinuedRecord {
                part_no: take_text(fields, "part_no")?,
            })),
            RecordKind::References => Ok(ExtractedRecord::Reference(ReferenceRecord {
                predecessor: take_text(fields, "predecessor")?,
                successor: take_text(fields, "successor")?,
            })),
        }
    }
}

fn schema_bug(field: &'static str) -> ImportError {
    ImportError::InternalError(format!("schema field '{field}' missing or mistyped"))
}

fn take_text(
    fields: &mut HashMap<&'static str, FieldValue>,
    field: &'static str,
) -> ImportResult<String> {
    fields
        .remove(field)
        .and_then(FieldValue::into_text)
        .ok_or_else(|| schema_bug(field))
}

fn take_int(
    fields: &mut HashMap<&'static str, FieldValue>,
    field: &'static str,
) -> ImportResult<i64> {
    fields
        .remove(field)
        .and_then(FieldValue::into_int)
        .ok_or_else(|| schema_bug(field))
}

fn take_dec(
    fields: &mut HashMap<&'static str, FieldValue>,
    field: &'static str,
) -> ImportResult<rust_decimal::Decimal> {
    fields
        .remove(field)
        .and_then(FieldValue::into_dec)
        .ok_or_else(|| schema_bug(field))
}

fn take_flag(
    fields: &mut HashMap<&'static str, FieldValue>,
    field: &'static str,
) -> ImportResult<bool> {
    fields
        .remove(field)
        .and_then(FieldValue::into_flag)
        .ok_or_else(|| schema_bug(field))
}

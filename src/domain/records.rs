// ==========================================
// Validated import records
// ==========================================
// One type per price list row kind. Instances only exist after every
// field has passed validation; the row extractor is the sole producer.
// ==========================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// PriceListRecord - a sellable part
// ==========================================
// Source: the mandatory PriceList sheet
// part_no is the natural key within one price list snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceListRecord {
    pub part_no: String,    // 10-char uppercase alphanumeric code
    pub title_ua: String,   // Ukrainian description
    pub title_en: String,   // English description

    // ===== Catalogue placement labels (numbering grammar enforced) =====
    pub section: String,    // "<n>. <text>"
    pub subsection: String, // "<n>.<n>. <text>"
    pub group: String,      // "<n>.<n>.<n>. <text>"

    // ===== Commercial attributes =====
    pub uktzed: i64,        // customs code
    pub min_order: i64,     // minimum order quantity
    pub quantity: i64,      // package quantity
    pub price: Decimal,     // quantized to 2 fractional digits
    pub truck: bool,        // truck assortment flag
}

// ==========================================
// MasterDataRecord - physical attributes
// ==========================================
// Source: the optional MasterData sheet; 1:1 with a PriceListRecord
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterDataRecord {
    pub part_no: String,
    pub ean: i64,

    // ===== Weight =====
    pub gross: Decimal,
    pub net: Decimal,
    pub weight_unit: String, // always "KG"

    // ===== Dimensions =====
    pub length: i64,
    pub width: i64,
    pub height: i64,
    pub measure_unit: String, // always "MM"

    // ===== Volume =====
    pub volume: Decimal,
    pub volume_unit: String, // always "L"
}

// ==========================================
// Lifecycle flag records
// ==========================================
// Presence of a part number in these sheets marks its lifecycle state

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReleaseRecord {
    pub part_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscontinuedRecord {
    pub part_no: String,
}

// ==========================================
// ReferenceRecord - supersession edge
// ==========================================
// Directed: predecessor is superseded by successor. Neither endpoint is
// required to exist as a catalogue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub predecessor: String,
    pub successor: String,
}

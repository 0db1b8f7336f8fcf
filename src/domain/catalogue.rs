// ==========================================
// Catalogue hierarchy and read models
// ==========================================
// The tree types are transient: the hierarchy builder owns them between
// extraction and populate, then they are dropped. The read models are what
// the repository returns to the API layer.
// ==========================================

use crate::domain::records::{MasterDataRecord, PriceListRecord, ReferenceRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// Hierarchy tree (import-side, transient)
// ==========================================

/// Three-level catalogue tree keyed on exact trimmed label text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogueTree {
    pub sections: Vec<SectionNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionNode {
    pub title: String,
    pub subsections: Vec<SubsectionNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionNode {
    pub title: String,
    pub groups: Vec<GroupNode>,
}

/// Leaf level; id is synthetic, assigned in first-appearance order.
/// Stable within one snapshot, not across imports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: i64,
    pub title: String,
    pub parts: Vec<PriceListRecord>,
}

impl CatalogueTree {
    /// Total number of parts attached to groups
    pub fn part_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.subsections)
            .flat_map(|ss| &ss.groups)
            .map(|g| g.parts.len())
            .sum()
    }

    /// Number of groups across all sections
    pub fn group_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.subsections)
            .map(|ss| ss.groups.len())
            .sum()
    }
}

// ==========================================
// Catalogue snapshot (import result)
// ==========================================

/// Lifecycle state of one part number
///
/// Covers every part number seen anywhere in the workbook: price rows,
/// lifecycle sheets and reference endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartNumberState {
    pub part_no: String,
    pub new_release: bool,
    pub discontinued: bool,
}

/// Everything one import run persists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueSnapshot {
    pub tree: CatalogueTree,
    pub part_numbers: Vec<PartNumberState>,
    pub master_data: Vec<MasterDataRecord>,
    pub references: Vec<ReferenceRecord>,
}

// ==========================================
// Read models (query-side)
// ==========================================

/// One flat row of the hierarchy query; the API layer folds these into
/// nested sections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRow {
    pub group_id: i64,
    pub group_title: String,
    pub subsection_title: String,
    pub section_title: String,
}

/// Listing entry for group listings and search results.
/// title_en is absent for part numbers that exist only as flags or
/// reference endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartSummary {
    pub part_no: String,
    pub title_en: Option<String>,
}

/// Price data of one catalogue entry together with its owning group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title_ua: String,
    pub title_en: String,
    pub uktzed: i64,
    pub min_order: i64,
    pub quantity: i64,
    pub price: Decimal,
    pub truck: bool,
    pub group_id: i64,
    pub group_title: String,
}

/// Full detail for one part number
///
/// product is None when the part number exists only through lifecycle
/// flags or supersession edges. refers lists the part numbers that
/// supersede this one (outgoing edges).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDetail {
    pub part_no: String,
    pub discontinued: bool,
    pub new_release: bool,
    pub product: Option<ProductInfo>,
    pub masterdata: Option<MasterDataRecord>,
    pub refers: Vec<String>,
}

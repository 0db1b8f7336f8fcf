// ==========================================
// API request and response bodies
// ==========================================
// Shapes mirror the public contract of the catalogue frontend. Group
// and part entries carry relative "path" links with the API prefix
// stripped, numeric group ids stay internal, and the hierarchy nests
// both levels under a "subsections" key.
// ==========================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    default_scopes, GroupRow, MasterDataRecord, PartDetail, PartSummary, ProductInfo,
};

// ==========================================
// Catalogue hierarchy
// ==========================================

/// Catalogue group as listed in the hierarchy. The path is the opaque
/// reference clients use to fetch the group's products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDto {
    pub title: String,
    pub path: String,
}

impl GroupDto {
    pub fn new(group_id: i64, title: &str) -> Self {
        GroupDto {
            title: title.to_string(),
            path: format!("/sections/{}", group_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionDto {
    pub title: String,
    pub subsections: Vec<GroupDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDto {
    pub title: String,
    pub subsections: Vec<SubsectionDto>,
}

/// Fold the flat group listing into the nested section tree
///
/// Rows arrive clustered by section and subsection in catalogue
/// insertion order, so a change-of-title scan rebuilds the nesting
/// without any intermediate map.
pub fn sections_from_rows(rows: &[GroupRow]) -> Vec<SectionDto> {
    let mut sections: Vec<SectionDto> = Vec::new();
    for row in rows {
        if sections.last().map(|s| s.title.as_str()) != Some(row.section_title.as_str()) {
            sections.push(SectionDto {
                title: row.section_title.clone(),
                subsections: Vec::new(),
            });
        }
        if let Some(section) = sections.last_mut() {
            if section.subsections.last().map(|ss| ss.title.as_str())
                != Some(row.subsection_title.as_str())
            {
                section.subsections.push(SubsectionDto {
                    title: row.subsection_title.clone(),
                    subsections: Vec::new(),
                });
            }
            if let Some(subsection) = section.subsections.last_mut() {
                subsection
                    .subsections
                    .push(GroupDto::new(row.group_id, &row.group_title));
            }
        }
    }
    sections
}

// ==========================================
// Part listings and detail
// ==========================================

/// Entry of a product list or search result. `title_en` is null for
/// parts known only through reference edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListedPartDto {
    pub part_no: String,
    pub title_en: Option<String>,
    pub path: String,
}

impl ListedPartDto {
    pub fn new(part_no: &str, title_en: Option<String>) -> Self {
        ListedPartDto {
            path: format!("/products/{}", part_no),
            part_no: part_no.to_string(),
            title_en,
        }
    }
}

impl From<PartSummary> for ListedPartDto {
    fn from(summary: PartSummary) -> Self {
        ListedPartDto::new(&summary.part_no, summary.title_en)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDto {
    pub title_ua: String,
    pub title_en: String,
    pub uktzed: i64,
    pub min_order: i64,
    pub quantity: i64,
    pub price: Decimal,
    pub truck: bool,
    pub group: GroupDto,
}

impl From<ProductInfo> for ProductDto {
    fn from(info: ProductInfo) -> Self {
        ProductDto {
            group: GroupDto::new(info.group_id, &info.group_title),
            title_ua: info.title_ua,
            title_en: info.title_en,
            uktzed: info.uktzed,
            min_order: info.min_order,
            quantity: info.quantity,
            price: info.price,
            truck: info.truck,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterDataDto {
    pub ean: i64,
    pub gross: Decimal,
    pub net: Decimal,
    pub weight_unit: String,
    pub length: i64,
    pub width: i64,
    pub height: i64,
    pub measure_unit: String,
    pub volume: Decimal,
    pub volume_unit: String,
}

impl From<MasterDataRecord> for MasterDataDto {
    fn from(record: MasterDataRecord) -> Self {
        MasterDataDto {
            ean: record.ean,
            gross: record.gross,
            net: record.net,
            weight_unit: record.weight_unit,
            length: record.length,
            width: record.width,
            height: record.height,
            measure_unit: record.measure_unit,
            volume: record.volume,
            volume_unit: record.volume_unit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDetailDto {
    pub part_no: String,
    pub discontinued: bool,
    pub new_release: bool,
    pub product: Option<ProductDto>,
    pub masterdata: Option<MasterDataDto>,
    pub refers: Vec<ListedPartDto>,
}

impl From<PartDetail> for PartDetailDto {
    fn from(detail: PartDetail) -> Self {
        PartDetailDto {
            product: detail.product.map(ProductDto::from),
            masterdata: detail.masterdata.map(MasterDataDto::from),
            refers: detail
                .refers
                .iter()
                .map(|successor| ListedPartDto::new(successor, None))
                .collect(),
            part_no: detail.part_no,
            discontinued: detail.discontinued,
            new_release: detail.new_release,
        }
    }
}

// ==========================================
// Requests
// ==========================================

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub search_query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

// ==========================================
// Responses
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDto {
    pub access_token: String,
    pub token_type: String,
}

impl TokenDto {
    pub fn bearer(access_token: String) -> Self {
        TokenDto {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub username: String,
}

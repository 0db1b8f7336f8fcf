// ==========================================
// Domain model layer
// ==========================================
// Role: record types, catalogue tree, read models, user accounts
// Boundary: no data access, no import logic
// ==========================================

pub mod catalogue;
pub mod records;
pub mod user;

pub use catalogue::{
    CatalogueSnapshot, CatalogueTree, GroupNode, GroupRow, PartDetail, PartNumberState,
    PartSummary, ProductInfo, SectionNode, SubsectionNode,
};
pub use records::{
    DiscontinuedRecord, MasterDataRecord, NewReleaseRecord, PriceListRecord, ReferenceRecord,
};
pub use user::{default_scopes, AuthUser, UserRecord, SCOPE_CATALOGUE, SCOPE_USER_MANAGER};

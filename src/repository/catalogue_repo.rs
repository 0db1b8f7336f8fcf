// ==========================================
// Catalogue repository
// ==========================================
// Data access for the catalogue database. No business rules here, only
// reads and the full-replace write used by the importer.
//
// One connection per logical operation: the importer runs offline while
// the API serves reads, so nothing holds a connection across calls.
// ==========================================

use crate::db::{init_catalogue_schema, open_sqlite_connection};
use crate::domain::{
    CatalogueSnapshot, GroupRow, MasterDataRecord, PartDetail, PartSummary, ProductInfo,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Transaction};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Decimal stored as TEXT; parse failures surface as conversion errors
fn parse_decimal(idx: usize, raw: String) -> rusqlite::Result<Decimal> {
    Decimal::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

// ==========================================
// CatalogueRepository
// ==========================================
pub struct CatalogueRepository {
    db_path: String,
}

impl CatalogueRepository {
    pub fn new(db_path: &str) -> Self {
        Self {
            db_path: db_path.to_string(),
        }
    }

    fn connection(&self) -> RepositoryResult<Connection> {
        open_sqlite_connection(&self.db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))
    }

    // ==========================================
    // Write side (importer)
    // ==========================================

    /// Replace the whole catalogue with one snapshot, in one transaction
    ///
    /// The previous snapshot is deleted first; a failure rolls back to it.
    /// Creates the schema on a fresh database.
    pub fn replace_catalogue(&self, snapshot: &CatalogueSnapshot) -> RepositoryResult<()> {
        let mut conn = self.connection()?;
        init_catalogue_schema(&conn)?;

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        // Children first, FK order
        tx.execute_batch(
            "DELETE FROM refers;
             DELETE FROM masterdata;
             DELETE FROM pricelist;
             DELETE FROM partnum;
             DELETE FROM catalogue_group;
             DELETE FROM subsection;
             DELETE FROM section;",
        )?;

        Self::insert_snapshot_tx(&tx, snapshot)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    fn insert_snapshot_tx(tx: &Transaction, snapshot: &CatalogueSnapshot) -> RepositoryResult<()> {
        // ===== Hierarchy =====
        {
            let mut section_stmt = tx.prepare("INSERT INTO section (title) VALUES (?1)")?;
            let mut subsection_stmt =
                tx.prepare("INSERT INTO subsection (title, section_id) VALUES (?1, ?2)")?;
            // Group ids come from the snapshot so the API serves the ids
            // the builder assigned
            let mut group_stmt = tx
                .prepare("INSERT INTO catalogue_group (id, title, subsection_id) VALUES (?1, ?2, ?3)")?;

            for section in &snapshot.tree.sections {
                section_stmt.execute(params![section.title])?;
                let section_id = tx.last_insert_rowid();

                for subsection in &section.subsections {
                    subsection_stmt.execute(params![subsection.title, section_id])?;
                    let subsection_id = tx.last_insert_rowid();

                    for group in &subsection.groups {
                        group_stmt.execute(params![group.id, group.title, subsection_id])?;
                    }
                }
            }
        }

        // ===== Part numbers =====
        let mut part_ids: HashMap<&str, i64> = HashMap::new();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO partnum (part_no, new_release, discontinued) VALUES (?1, ?2, ?3)",
            )?;
            for part in &snapshot.part_numbers {
                stmt.execute(params![
                    part.part_no,
                    part.new_release as i32,
                    part.discontinued as i32
                ])?;
                part_ids.insert(part.part_no.as_str(), tx.last_insert_rowid());
            }
        }

        let part_id = |part_no: &str| -> RepositoryResult<i64> {
            part_ids.get(part_no).copied().ok_or_else(|| {
                RepositoryError::InternalError(format!(
                    "part number '{part_no}' missing from the snapshot index"
                ))
            })
        };

        // ===== Price rows =====
        {
            let mut stmt = tx.prepare(
                "INSERT INTO pricelist (
                    partnum_id, group_id, title_ua, title_en,
                    uktzed, min_order, quantity, price, truck
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for section in &snapshot.tree.sections {
                for subsection in &section.subsections {
                    for group in &subsection.groups {
                        for record in &group.parts {
                            stmt.execute(params![
                                part_id(&record.part_no)?,
                                group.id,
                                record.title_ua,
                                record.title_en,
                                record.uktzed,
                                record.min_order,
                                record.quantity,
                                record.price.to_string(),
                                record.truck as i32,
                            ])?;
                        }
                    }
                }
            }
        }

        // ===== Master data =====
        {
            let mut stmt = tx.prepare(
                "INSERT INTO masterdata (
                    partnum_id, ean, gross, net, weight_unit,
                    length, width, height, measure_unit, volume, volume_unit
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for record in &snapshot.master_data {
                stmt.execute(params![
                    part_id(&record.part_no)?,
                    record.ean,
                    record.gross.to_string(),
                    record.net.to_string(),
                    record.weight_unit,
                    record.length,
                    record.width,
                    record.height,
                    record.measure_unit,
                    record.volume.to_string(),
                    record.volume_unit,
                ])?;
            }
        }

        // ===== Supersession edges =====
        {
            let mut stmt =
                tx.prepare("INSERT INTO refers (predecessor, successor) VALUES (?1, ?2)")?;
            for edge in &snapshot.references {
                stmt.execute(params![edge.predecessor, edge.successor])?;
            }
        }

        Ok(())
    }

    // ==========================================
    // Read side (API)
    // ==========================================

    /// Flat hierarchy rows in section, subsection, group insertion order
    pub fn fetch_hierarchy(&self) -> RepositoryResult<Vec<GroupRow>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT g.id, g.title, ss.title, s.title
             FROM catalogue_group g
             JOIN subsection ss ON ss.id = g.subsection_id
             JOIN section s ON s.id = ss.section_id
             ORDER BY s.id, ss.id, g.id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(GroupRow {
                    group_id: row.get(0)?,
                    group_title: row.get(1)?,
                    subsection_title: row.get(2)?,
                    section_title: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Parts of one group; an unknown group id yields an empty list
    pub fn products_by_group(&self, group_id: i64) -> RepositoryResult<Vec<PartSummary>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT pn.part_no, p.title_en
             FROM pricelist p
             JOIN partnum pn ON pn.id = p.partnum_id
             WHERE p.group_id = ?1
             ORDER BY p.id",
        )?;

        let rows = stmt
            .query_map(params![group_id], |row| {
                Ok(PartSummary {
                    part_no: row.get(0)?,
                    title_en: Some(row.get(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Detail for one part number
    ///
    /// Exists for any part number seen in the last import; product and
    /// master data are optional parts of the answer.
    pub fn part_detail(&self, part_no: &str) -> RepositoryResult<PartDetail> {
        let conn = self.connection()?;

        let (partnum_id, new_release, discontinued) = conn
            .query_row(
                "SELECT id, new_release, discontinued FROM partnum WHERE part_no = ?1",
                params![part_no],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, bool>(1)?,
                        row.get::<_, bool>(2)?,
                    ))
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    RepositoryError::not_found("partnum", part_no)
                }
                other => RepositoryError::from(other),
            })?;

        let product = match conn.query_row(
            "SELECT p.title_ua, p.title_en, p.uktzed, p.min_order, p.quantity,
                    p.price, p.truck, g.id, g.title
             FROM pricelist p
             JOIN catalogue_group g ON g.id = p.group_id
             WHERE p.partnum_id = ?1",
            params![partnum_id],
            |row| {
                Ok(ProductInfo {
                    title_ua: row.get(0)?,
                    title_en: row.get(1)?,
                    uktzed: row.get(2)?,
                    min_order: row.get(3)?,
                    quantity: row.get(4)?,
                    price: parse_decimal(5, row.get::<_, String>(5)?)?,
                    truck: row.get(6)?,
                    group_id: row.get(7)?,
                    group_title: row.get(8)?,
                })
            },
        ) {
            Ok(info) => Some(info),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let masterdata = match conn.query_row(
            "SELECT ean, gross, net, weight_unit, length, width, height,
                    measure_unit, volume, volume_unit
             FROM masterdata
             WHERE partnum_id = ?1",
            params![partnum_id],
            |row| {
                Ok(MasterDataRecord {
                    part_no: part_no.to_string(),
                    ean: row.get(0)?,
                    gross: parse_decimal(1, row.get::<_, String>(1)?)?,
                    net: parse_decimal(2, row.get::<_, String>(2)?)?,
                    weight_unit: row.get(3)?,
                    length: row.get(4)?,
                    width: row.get(5)?,
                    height: row.get(6)?,
                    measure_unit: row.get(7)?,
                    volume: parse_decimal(8, row.get::<_, String>(8)?)?,
                    volume_unit: row.get(9)?,
                })
            },
        ) {
            Ok(record) => Some(record),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let mut stmt =
            conn.prepare("SELECT successor FROM refers WHERE predecessor = ?1 ORDER BY id")?;
        let refers = stmt
            .query_map(params![part_no], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PartDetail {
            part_no: part_no.to_string(),
            discontinued,
            new_release,
            product,
            masterdata,
            refers,
        })
    }

    /// Part numbers matching a SQL LIKE pattern, in import order
    ///
    /// title_en comes from the price row when one exists; flag-only and
    /// edge-only part numbers match with no title.
    pub fn search_parts(&self, like_pattern: &str) -> RepositoryResult<Vec<PartSummary>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT pn.part_no, p.title_en
             FROM partnum pn
             LEFT JOIN pricelist p ON p.partnum_id = pn.id
             WHERE pn.part_no LIKE ?1
             ORDER BY pn.id",
        )?;

        let rows = stmt
            .query_map(params![like_pattern], |row| {
                Ok(PartSummary {
                    part_no: row.get(0)?,
                    title_en: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DiscontinuedRecord, NewReleaseRecord, PriceListRecord, ReferenceRecord,
    };
    use crate::importer::build_catalogue;
    use tempfile::NamedTempFile;

    fn price_row(part_no: &str, group: &str) -> PriceListRecord {
        PriceListRecord {
            part_no: part_no.to_string(),
            title_ua: "Фільтр паливний".to_string(),
            title_en: "Fuel filter".to_string(),
            section: "1. Automotive Aftermarket".to_string(),
            subsection: "1.1. Diesel Injection".to_string(),
            group: group.to_string(),
            uktzed: 8409990000,
            min_order: 1,
            quantity: 5,
            price: Decimal::new(10199, 2),
            truck: true,
        }
    }

    fn master_row(part_no: &str) -> MasterDataRecord {
        MasterDataRecord {
            part_no: part_no.to_string(),
            ean: 4047024494251,
            gross: Decimal::new(125, 3),
            net: Decimal::new(100, 3),
            weight_unit: "KG".to_string(),
            length: 57,
            width: 45,
            height: 25,
            measure_unit: "MM".to_string(),
            volume: Decimal::new(64, 3),
            volume_unit: "L".to_string(),
        }
    }

    fn sample_snapshot() -> CatalogueSnapshot {
        build_catalogue(
            vec![
                price_row("F00HN37002", "1.1.1. Nozzles"),
                price_row("F00HN37003", "1.1.1. Nozzles"),
                price_row("0445110002", "1.1.2. Valves"),
            ],
            vec![master_row("F00HN37002")],
            vec![NewReleaseRecord {
                part_no: "F00HN37003".to_string(),
            }],
            vec![DiscontinuedRecord {
                part_no: "0445110002".to_string(),
            }],
            vec![ReferenceRecord {
                predecessor: "0445110002".to_string(),
                successor: "0445110009".to_string(),
            }],
        )
        .snapshot
    }

    fn test_repo() -> (NamedTempFile, CatalogueRepository) {
        let file = NamedTempFile::new().unwrap();
        let repo = CatalogueRepository::new(file.path().to_str().unwrap());
        (file, repo)
    }

    #[test]
    fn test_replace_and_fetch_hierarchy() {
        let (_file, repo) = test_repo();
        repo.replace_catalogue(&sample_snapshot()).unwrap();

        let rows = repo.fetch_hierarchy().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group_id, 1);
        assert_eq!(rows[0].group_title, "1.1.1. Nozzles");
        assert_eq!(rows[0].section_title, "1. Automotive Aftermarket");
        assert_eq!(rows[1].group_id, 2);
    }

    #[test]
    fn test_products_by_group() {
        let (_file, repo) = test_repo();
        repo.replace_catalogue(&sample_snapshot()).unwrap();

        let parts = repo.products_by_group(1).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].part_no, "F00HN37002");
        assert_eq!(parts[0].title_en.as_deref(), Some("Fuel filter"));

        // Unknown group id is an empty list, not an error
        assert!(repo.products_by_group(999).unwrap().is_empty());
    }

    #[test]
    fn test_part_detail_full() {
        let (_file, repo) = test_repo();
        repo.replace_catalogue(&sample_snapshot()).unwrap();

        let detail = repo.part_detail("0445110002").unwrap();
        assert!(detail.discontinued);
        assert!(!detail.new_release);

        let product = detail.product.unwrap();
        assert_eq!(product.price, Decimal::new(10199, 2));
        assert_eq!(product.group_id, 2);
        assert_eq!(product.group_title, "1.1.2. Valves");
        assert_eq!(detail.refers, vec!["0445110009".to_string()]);

        let with_master = repo.part_detail("F00HN37002").unwrap();
        let master = with_master.masterdata.unwrap();
        assert_eq!(master.gross, Decimal::new(125, 3));
        assert_eq!(master.weight_unit, "KG");
    }

    #[test]
    fn test_part_detail_edge_only_and_missing() {
        let (_file, repo) = test_repo();
        repo.replace_catalogue(&sample_snapshot()).unwrap();

        // Successor exists only as a reference endpoint
        let bare = repo.part_detail("0445110009").unwrap();
        assert!(bare.product.is_none());
        assert!(bare.masterdata.is_none());
        assert!(bare.refers.is_empty());

        let err = repo.part_detail("XXXXXXXXXX").unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_search_with_like_wildcard() {
        let (_file, repo) = test_repo();
        repo.replace_catalogue(&sample_snapshot()).unwrap();

        let hits = repo.search_parts("F00HN370__").unwrap();
        assert_eq!(hits.len(), 2);

        let edge_only = repo.search_parts("0445110009").unwrap();
        assert_eq!(edge_only.len(), 1);
        assert!(edge_only[0].title_en.is_none());

        assert!(repo.search_parts("ZZZZZZZZZZ").unwrap().is_empty());
    }

    #[test]
    fn test_replace_is_a_full_swap() {
        let (_file, repo) = test_repo();
        repo.replace_catalogue(&sample_snapshot()).unwrap();

        let next = build_catalogue(
            vec![price_row("9999999999", "9.9.9. Other")],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .snapshot;
        repo.replace_catalogue(&next).unwrap();

        assert!(matches!(
            repo.part_detail("F00HN37002"),
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(repo.part_detail("9999999999").is_ok());
        assert_eq!(repo.fetch_hierarchy().unwrap().len(), 1);
    }
}

// ==========================================
// SQLite connection setup
// ==========================================
// Goals:
// - One place for Connection::open PRAGMA behavior, so every module gets
//   foreign_keys and busy_timeout applied the same way
// - Catalogue schema DDL shared by the importer and the test helpers
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the shared PRAGMA set to a connection
///
/// foreign_keys and busy_timeout are per-connection settings and must be
/// applied to every connection we open.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the shared configuration applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the catalogue tables if they do not exist
///
/// Price and weight columns hold exact decimal text, not floats. The
/// refers table stores bare part-number pairs on purpose: a supersession
/// edge may point at parts that are not catalogue entries.
pub fn init_catalogue_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS section (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS subsection (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            section_id INTEGER NOT NULL REFERENCES section(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS catalogue_group (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            subsection_id INTEGER NOT NULL REFERENCES subsection(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS partnum (
            id INTEGER PRIMARY KEY,
            part_no TEXT NOT NULL UNIQUE,
            new_release INTEGER NOT NULL DEFAULT 0,
            discontinued INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS pricelist (
            id INTEGER PRIMARY KEY,
            partnum_id INTEGER NOT NULL REFERENCES partnum(id) ON DELETE CASCADE,
            group_id INTEGER NOT NULL REFERENCES catalogue_group(id) ON DELETE CASCADE,
            title_ua TEXT NOT NULL,
            title_en TEXT NOT NULL,
            uktzed INTEGER NOT NULL,
            min_order INTEGER NOT NULL,
            quantity INTEGER NOT NULL,
            price TEXT NOT NULL,
            truck INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS masterdata (
            id INTEGER PRIMARY KEY,
            partnum_id INTEGER NOT NULL UNIQUE REFERENCES partnum(id) ON DELETE CASCADE,
            ean INTEGER NOT NULL,
            gross TEXT NOT NULL,
            net TEXT NOT NULL,
            weight_unit TEXT NOT NULL,
            length INTEGER NOT NULL,
            width INTEGER NOT NULL,
            height INTEGER NOT NULL,
            measure_unit TEXT NOT NULL,
            volume TEXT NOT NULL,
            volume_unit TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS refers (
            id INTEGER PRIMARY KEY,
            predecessor TEXT NOT NULL,
            successor TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pricelist_partnum ON pricelist(partnum_id);
        CREATE INDEX IF NOT EXISTS idx_pricelist_group ON pricelist(group_id);
        CREATE INDEX IF NOT EXISTS idx_refers_predecessor ON refers(predecessor);
        CREATE INDEX IF NOT EXISTS idx_refers_successor ON refers(successor);
        "#,
    )?;
    Ok(())
}

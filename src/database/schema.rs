/*!
 * Database schema definitions and versioning.
 *
 * This module contains the SQL schema of the catalog tables
 * and refuses databases written with another schema version.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Check current schema version
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        // Fresh database - create all tables
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version != SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Unsupported catalog schema version: v{} (expected v{})",
            current_version,
            SCHEMA_VERSION
        ));
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    // Check if the schema_version table exists
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // Create schema version table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // Languages and media
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS language (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS media (
            id TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS media_translation (
            media_id TEXT NOT NULL REFERENCES media(id) ON DELETE CASCADE,
            language_id TEXT NOT NULL REFERENCES language(id) ON DELETE CASCADE,
            alt TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT,
            updated_by TEXT,
            PRIMARY KEY (media_id, language_id)
        );

        CREATE INDEX IF NOT EXISTS idx_media_translation_language ON media_translation(language_id);
        "#,
    )?;

    // Products and their media gallery
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS product (
            id TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS product_translation (
            product_id TEXT NOT NULL REFERENCES product(id) ON DELETE CASCADE,
            language_id TEXT NOT NULL REFERENCES language(id) ON DELETE CASCADE,
            name TEXT,
            PRIMARY KEY (product_id, language_id)
        );

        CREATE TABLE IF NOT EXISTS product_media (
            id TEXT PRIMARY KEY,
            product_id TEXT NOT NULL REFERENCES product(id) ON DELETE CASCADE,
            media_id TEXT NOT NULL REFERENCES media(id) ON DELETE CASCADE,
            position INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_product_media_product ON product_media(product_id);
        "#,
    )?;

    // Categories with one optional media
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS category (
            id TEXT PRIMARY KEY,
            media_id TEXT REFERENCES media(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS category_translation (
            category_id TEXT NOT NULL REFERENCES category(id) ON DELETE CASCADE,
            language_id TEXT NOT NULL REFERENCES language(id) ON DELETE CASCADE,
            name TEXT,
            PRIMARY KEY (category_id, language_id)
        );
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}

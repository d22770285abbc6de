/*!
 * Database module for the SQLite catalog.
 *
 * This module provides:
 * - Connection management and schema initialization
 * - `Repository`, the SQLite entity source and media translation store
 * - JSON catalog fixtures and their import
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod catalog;

// Re-export main types
pub use catalog::{import_catalog, CatalogFixture, ImportSummary};
pub use connection::{DatabaseConnection, DatabaseStats};
pub use repository::Repository;

/*!
 * # alttext-sync - alternative texts for catalog media
 *
 * A Rust library that keeps the alternative text of catalog media in line with
 * the names of the entities owning them, language by language.
 *
 * ## Features
 *
 * - Product names are written onto every media of the product gallery
 * - Category names are written onto the category media
 * - Missing translations are created, stale ones updated, synced ones left alone
 * - Re-running is safe and issues no writes once everything is in sync
 * - SQLite catalog storage with JSON fixture import
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `models`: Parent entities, media attachments and their translations
 * - `reconcile`: The per (media, language) decision rule
 * - `store`: Source and store boundaries plus an in-memory catalog
 * - `sync`: The multi-media and single-media drivers
 * - `database`: SQLite catalog, schema and fixture import
 * - `context`: Execution context passed to every catalog call
 * - `app_config`: Configuration management
 * - `app_controller`: Runs both phases with progress reporting
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod context;
pub mod database;
pub mod errors;
pub mod models;
pub mod reconcile;
pub mod store;
pub mod sync;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use context::{ContextScope, ExecutionContext};
pub use errors::{AppError, SourceError, StoreError, SyncError};
pub use models::{
    EntityKind, EntityMedia, MediaAttachment, MediaTranslation, MediaTranslationRecord,
    NameTranslation, ParentEntity,
};
pub use reconcile::{reconcile, Action};
pub use store::{EntityQuery, EntitySource, MediaTranslationStore};
pub use sync::{MultiMediaSync, SingleMediaSync, SyncStats};

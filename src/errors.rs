/*!
 * Error types for the alttext-sync application.
 *
 * This module contains custom error types for the entity source, the media
 * translation store and the sync drivers, using the thiserror crate for
 * ergonomic error definitions.
 */

use thiserror::Error;

use crate::models::{EntityKind, MediaCardinality};
use crate::store::WriteOperation;

/// Errors raised while retrieving parent entities
#[derive(Error, Debug)]
pub enum SourceError {
    /// The underlying query could not be executed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The source is not reachable at all
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a media translation store write
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write was issued without any records
    #[error("Write batch is empty")]
    EmptyBatch,

    /// The record references unknown media/language, or the pair already exists
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// An update targeted a pair that has no record
    #[error("No media translation for media {media_id} in language {language_id}")]
    NotFound {
        /// Media identifier
        media_id: String,
        /// Language identifier
        language_id: String,
    },

    /// The execution context does not permit writes
    #[error("Write refused for actor '{actor}': context is read-only")]
    Forbidden {
        /// Actor carried by the execution context
        actor: String,
    },

    /// Any other backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Errors that abort a sync phase
#[derive(Error, Debug)]
pub enum SyncError {
    /// Entity retrieval failed
    #[error("Could not load {kind}: {source}")]
    SourceUnavailable {
        /// Entity kind being loaded
        kind: EntityKind,
        /// Underlying source failure
        #[source]
        source: SourceError,
    },

    /// A create or update was rejected by the store
    #[error("{operation} of alt text for media {media_id} in language {language_id} was rejected: {source}")]
    WriteRejected {
        /// Operation that failed
        operation: WriteOperation,
        /// Media identifier
        media_id: String,
        /// Language identifier
        language_id: String,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// A driver received an entity whose media shape does not match the driver
    #[error("Entity {entity_id} does not own {expected} media")]
    UnexpectedMediaShape {
        /// Entity identifier
        entity_id: String,
        /// Shape the driver expects
        expected: MediaCardinality,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a sync phase
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::SqliteFailure(ref failure, _)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(error.to_string())
            }
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for StoreError {
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<StoreError>() {
            Ok(store) => return store,
            Err(other) => other,
        };

        match error.downcast::<rusqlite::Error>() {
            Ok(sqlite) => sqlite.into(),
            Err(other) => Self::Backend(format!("{:#}", other)),
        }
    }
}

impl From<anyhow::Error> for SourceError {
    fn from(error: anyhow::Error) -> Self {
        Self::QueryFailed(format!("{:#}", error))
    }
}

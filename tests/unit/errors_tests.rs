/*!
 * Tests for error types and conversions
 */

use alttext_sync::errors::{AppError, SourceError, StoreError, SyncError};
use alttext_sync::models::{EntityKind, MediaCardinality};
use alttext_sync::store::WriteOperation;
use std::error::Error;

#[test]
fn test_syncError_writeRejected_shouldDisplayPairAndCause() {
    let error = SyncError::WriteRejected {
        operation: WriteOperation::Update,
        media_id: "m1".to_string(),
        language_id: "de".to_string(),
        source: StoreError::NotFound {
            media_id: "m1".to_string(),
            language_id: "de".to_string(),
        },
    };

    let display = error.to_string();
    assert!(display.starts_with("update"));
    assert!(display.contains("m1"));
    assert!(display.contains("de"));
    assert!(error.source().is_some());
}

#[test]
fn test_syncError_sourceUnavailable_shouldNameKind() {
    let error = SyncError::SourceUnavailable {
        kind: EntityKind::Category,
        source: SourceError::Unavailable("connection lost".to_string()),
    };

    let display = error.to_string();
    assert!(display.contains("category"));
    assert!(display.contains("connection lost"));
}

#[test]
fn test_syncError_unexpectedShape_shouldNameExpectedCardinality() {
    let error = SyncError::UnexpectedMediaShape {
        entity_id: "c1".to_string(),
        expected: MediaCardinality::Single,
    };

    assert!(error.to_string().contains("c1"));
}

#[test]
fn test_storeError_fromAnyhow_shouldKeepStoreVariant() {
    let error: anyhow::Error = StoreError::Forbidden {
        actor: "auditor".to_string(),
    }
    .into();

    let store_error = StoreError::from(error);

    assert!(matches!(store_error, StoreError::Forbidden { actor } if actor == "auditor"));
}

#[test]
fn test_storeError_fromAnyhow_withOtherError_shouldBeBackend() {
    let store_error = StoreError::from(anyhow::anyhow!("disk full"));

    assert!(matches!(store_error, StoreError::Backend(message) if message.contains("disk full")));
}

#[test]
fn test_sourceError_fromAnyhow_shouldKeepContextChain() {
    let error = anyhow::anyhow!("no such table").context("Failed to load page");

    let source_error = SourceError::from(error);

    let display = source_error.to_string();
    assert!(display.contains("Failed to load page"));
    assert!(display.contains("no such table"));
}

#[test]
fn test_appError_fromSyncError_shouldWrap() {
    let error: AppError = SyncError::UnexpectedMediaShape {
        entity_id: "p1".to_string(),
        expected: MediaCardinality::Multiple,
    }
    .into();

    assert!(matches!(error, AppError::Sync(_)));
    assert!(error.to_string().starts_with("Sync error"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "catalog.json");

    let error: AppError = io_error.into();

    assert!(matches!(error, AppError::File(_)));
}

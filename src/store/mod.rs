/*!
 * Boundaries between the sync drivers and the catalog.
 *
 * - `EntitySource`: supplies hydrated parent entities page by page
 * - `MediaTranslationStore`: creates and updates media alt texts
 *
 * Both take an explicit `ExecutionContext`. The SQLite implementations live in
 * `crate::database`; `memory` holds an in-process catalog for tests.
 */

use async_trait::async_trait;
use std::fmt;

use crate::context::ExecutionContext;
use crate::errors::{SourceError, StoreError};
use crate::models::{EntityKind, MediaTranslationRecord, ParentEntity};

pub mod memory;

pub use memory::InMemoryCatalog;

/// Associations a query asks the source to hydrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Association {
    /// Localized names of the parent entity
    Translations,
    /// Media attached to the parent entity
    Media,
    /// Alt-text translations of the attached media
    MediaTranslations,
}

impl Association {
    /// Association path relative to the entity kind
    pub fn path(&self, kind: EntityKind) -> &'static str {
        match (self, kind) {
            (Association::Translations, _) => "translations",
            (Association::Media, _) => "media",
            (Association::MediaTranslations, EntityKind::Product) => "media.media.translations",
            (Association::MediaTranslations, EntityKind::Category) => "media.translations",
        }
    }
}

/// Explicit query contract: which kind to load and which joins to hydrate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityQuery {
    pub kind: EntityKind,
    pub associations: Vec<Association>,
}

impl EntityQuery {
    /// Query without any association
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            associations: Vec::new(),
        }
    }

    /// Request one more association
    pub fn with(mut self, association: Association) -> Self {
        if !self.associations.contains(&association) {
            self.associations.push(association);
        }
        self
    }

    /// Everything reconciliation needs: names, media and media translations
    pub fn for_sync(kind: EntityKind) -> Self {
        Self::new(kind)
            .with(Association::Translations)
            .with(Association::Media)
            .with(Association::MediaTranslations)
    }

    pub fn includes(&self, association: Association) -> bool {
        self.associations.contains(&association)
    }

    /// Association paths, for logging
    pub fn paths(&self) -> Vec<&'static str> {
        self.associations.iter().map(|a| a.path(self.kind)).collect()
    }
}

/// Store write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Create,
    Update,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOperation::Create => write!(f, "create"),
            WriteOperation::Update => write!(f, "update"),
        }
    }
}

/// Supplier of hydrated parent entities
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Total number of entities of `kind`
    async fn count(&self, kind: EntityKind, ctx: &ExecutionContext) -> Result<u64, SourceError>;

    /// Load at most `limit` entities starting at `offset`, in a stable order,
    /// hydrating exactly the associations named by `query`
    async fn fetch_page(
        &self,
        query: &EntityQuery,
        offset: u64,
        limit: usize,
        ctx: &ExecutionContext,
    ) -> Result<Vec<ParentEntity>, SourceError>;
}

/// Write boundary for media alt-text records
#[async_trait]
pub trait MediaTranslationStore: Send + Sync {
    /// Insert new records. Each record targets a pair without a record.
    async fn create(
        &self,
        records: &[MediaTranslationRecord],
        ctx: &ExecutionContext,
    ) -> Result<(), StoreError>;

    /// Overwrite the alt of existing records
    async fn update(
        &self,
        records: &[MediaTranslationRecord],
        ctx: &ExecutionContext,
    ) -> Result<(), StoreError>;
}

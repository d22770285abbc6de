/*!
 * In-memory catalog implementing both `EntitySource` and `MediaTranslationStore`.
 *
 * Used by tests and benchmarks. Behaves like the SQLite catalog for writes
 * (unknown media and duplicate pairs are rejected, updates need an existing
 * record) and records every successful write. Failures can be injected:
 * - `fail_source(kind)` - every read of `kind` fails
 * - `reject_writes_after(n)` - the write after the first `n` ones fails
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::errors::{SourceError, StoreError};
use crate::models::{
    EntityKind, EntityMedia, MediaAttachment, MediaTranslation, MediaTranslationRecord,
    NameTranslation, ParentEntity,
};
use crate::store::{Association, EntityQuery, EntitySource, MediaTranslationStore, WriteOperation};

/// A successful write, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub operation: WriteOperation,
    pub record: MediaTranslationRecord,
    pub actor: String,
}

#[derive(Debug, Clone)]
struct StoredEntity {
    id: String,
    names: Vec<NameTranslation>,
    media_ids: Vec<String>,
}

#[derive(Debug, Default)]
struct CatalogState {
    media: BTreeMap<String, Vec<MediaTranslation>>,
    products: Vec<StoredEntity>,
    categories: Vec<StoredEntity>,
    writes: Vec<WriteRecord>,
    failing_source: Option<EntityKind>,
    reject_writes_after: Option<usize>,
}

impl CatalogState {
    fn entities(&self, kind: EntityKind) -> &Vec<StoredEntity> {
        match kind {
            EntityKind::Product => &self.products,
            EntityKind::Category => &self.categories,
        }
    }

    fn entities_mut(&mut self, kind: EntityKind) -> &mut Vec<StoredEntity> {
        match kind {
            EntityKind::Product => &mut self.products,
            EntityKind::Category => &mut self.categories,
        }
    }

    fn check_source(&self, kind: EntityKind) -> Result<(), SourceError> {
        if self.failing_source == Some(kind) {
            return Err(SourceError::Unavailable(format!("{} source is offline", kind)));
        }
        Ok(())
    }

    fn check_write(&self, ctx: &ExecutionContext) -> Result<(), StoreError> {
        if !ctx.can_write() {
            return Err(StoreError::Forbidden {
                actor: ctx.actor.clone(),
            });
        }
        if let Some(limit) = self.reject_writes_after {
            if self.writes.len() >= limit {
                return Err(StoreError::Backend(format!(
                    "write rejected after {} successful writes",
                    limit
                )));
            }
        }
        Ok(())
    }

    fn hydrate_media(&self, media_id: &str, query: &EntityQuery) -> MediaAttachment {
        let translations = if query.includes(Association::MediaTranslations) {
            self.media.get(media_id).cloned().unwrap_or_default()
        } else {
            Vec::new()
        };
        MediaAttachment::new(media_id, translations)
    }

    fn hydrate(&self, entity: &StoredEntity, query: &EntityQuery) -> ParentEntity {
        let names = if query.includes(Association::Translations) {
            entity.names.clone()
        } else {
            Vec::new()
        };

        let load_media = query.includes(Association::Media);
        let media = match query.kind {
            EntityKind::Product => EntityMedia::Multiple(if load_media {
                entity
                    .media_ids
                    .iter()
                    .map(|id| self.hydrate_media(id, query))
                    .collect()
            } else {
                Vec::new()
            }),
            EntityKind::Category => EntityMedia::Single(if load_media {
                entity.media_ids.first().map(|id| self.hydrate_media(id, query))
            } else {
                None
            }),
        };

        ParentEntity {
            id: entity.id.clone(),
            kind: query.kind,
            names,
            media,
        }
    }
}

/// In-memory catalog of products, categories and media
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a media asset with its current translations
    pub fn with_media(self, media: MediaAttachment) -> Self {
        self.state.lock().media.insert(media.id, media.translations);
        self
    }

    /// Register a parent entity. Media it references that are not yet known
    /// are registered with the translations they carry.
    pub fn with_entity(self, entity: ParentEntity) -> Self {
        {
            let mut state = self.state.lock();
            let mut media_ids: Vec<String> = Vec::new();

            for media in entity.media.attachments() {
                state
                    .media
                    .entry(media.id.clone())
                    .or_insert_with(|| media.translations.clone());
                if !media_ids.contains(&media.id) {
                    media_ids.push(media.id.clone());
                }
            }

            state.entities_mut(entity.kind).push(StoredEntity {
                id: entity.id,
                names: entity.names,
                media_ids,
            });
        }
        self
    }

    /// Make every read of `kind` fail
    pub fn fail_source(self, kind: EntityKind) -> Self {
        self.state.lock().failing_source = Some(kind);
        self
    }

    /// Reject every write once `successful` writes have been recorded
    pub fn reject_writes_after(self, successful: usize) -> Self {
        self.state.lock().reject_writes_after = Some(successful);
        self
    }

    /// Change the name of an entity in one language
    pub fn rename(&self, kind: EntityKind, entity_id: &str, language_id: &str, name: &str) {
        let mut state = self.state.lock();
        if let Some(entity) = state
            .entities_mut(kind)
            .iter_mut()
            .find(|e| e.id == entity_id)
        {
            match entity.names.iter_mut().find(|n| n.language_id == language_id) {
                Some(existing) => existing.name = name.to_string(),
                None => entity.names.push(NameTranslation::new(language_id, name)),
            }
        }
    }

    /// All successful writes so far
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state.lock().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().writes.len()
    }

    pub fn clear_writes(&self) {
        self.state.lock().writes.clear();
    }

    /// Current translations of a media asset
    pub fn media_translations(&self, media_id: &str) -> Vec<MediaTranslation> {
        self.state
            .lock()
            .media
            .get(media_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Current alt of a media asset in one language
    pub fn alt(&self, media_id: &str, language_id: &str) -> Option<String> {
        self.media_translations(media_id)
            .into_iter()
            .find(|t| t.language_id == language_id)
            .and_then(|t| t.alt)
    }
}

#[async_trait]
impl EntitySource for InMemoryCatalog {
    async fn count(&self, kind: EntityKind, _ctx: &ExecutionContext) -> Result<u64, SourceError> {
        let state = self.state.lock();
        state.check_source(kind)?;
        Ok(state.entities(kind).len() as u64)
    }

    async fn fetch_page(
        &self,
        query: &EntityQuery,
        offset: u64,
        limit: usize,
        _ctx: &ExecutionContext,
    ) -> Result<Vec<ParentEntity>, SourceError> {
        let state = self.state.lock();
        state.check_source(query.kind)?;

        let page = state
            .entities(query.kind)
            .iter()
            .skip(offset as usize)
            .take(limit)
            .map(|entity| state.hydrate(entity, query))
            .collect();

        Ok(page)
    }
}

#[async_trait]
impl MediaTranslationStore for InMemoryCatalog {
    async fn create(
        &self,
        records: &[MediaTranslationRecord],
        ctx: &ExecutionContext,
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let mut state = self.state.lock();
        for record in records {
            state.check_write(ctx)?;

            let translations = state.media.get_mut(&record.media_id).ok_or_else(|| {
                StoreError::ConstraintViolation(format!("unknown media {}", record.media_id))
            })?;
            if translations.iter().any(|t| t.language_id == record.language_id) {
                return Err(StoreError::ConstraintViolation(format!(
                    "media {} already has a translation in {}",
                    record.media_id, record.language_id
                )));
            }
            translations.push(MediaTranslation::new(&record.language_id, Some(record.alt.as_str())));

            state.writes.push(WriteRecord {
                operation: WriteOperation::Create,
                record: record.clone(),
                actor: ctx.actor.clone(),
            });
        }
        Ok(())
    }

    async fn update(
        &self,
        records: &[MediaTranslationRecord],
        ctx: &ExecutionContext,
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let mut state = self.state.lock();
        for record in records {
            state.check_write(ctx)?;

            let mut matched = false;
            if let Some(translations) = state.media.get_mut(&record.media_id) {
                for translation in translations
                    .iter_mut()
                    .filter(|t| t.language_id == record.language_id)
                {
                    translation.alt = Some(record.alt.clone());
                    matched = true;
                }
            }
            if !matched {
                return Err(StoreError::NotFound {
                    media_id: record.media_id.clone(),
                    language_id: record.language_id.clone(),
                });
            }

            state.writes.push(WriteRecord {
                operation: WriteOperation::Update,
                record: record.clone(),
                actor: ctx.actor.clone(),
            });
        }
        Ok(())
    }
}

/*!
 * Repository layer for catalog database operations.
 *
 * `Repository` is the SQLite implementation of both `EntitySource` (hydrated
 * products and categories, page by page) and `MediaTranslationStore` (alt text
 * creates and updates).
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use crate::context::ExecutionContext;
use crate::errors::{SourceError, StoreError};
use crate::models::{
    EntityKind, EntityMedia, MediaAttachment, MediaTranslation, MediaTranslationRecord,
    NameTranslation, ParentEntity,
};
use crate::store::{Association, EntityQuery, EntitySource, MediaTranslationStore};

/// Tables backing one entity kind
struct KindTables {
    entity: &'static str,
    translation: &'static str,
    foreign_key: &'static str,
}

fn tables(kind: EntityKind) -> KindTables {
    match kind {
        EntityKind::Product => KindTables {
            entity: "product",
            translation: "product_translation",
            foreign_key: "product_id",
        },
        EntityKind::Category => KindTables {
            entity: "category",
            translation: "category_translation",
            foreign_key: "category_id",
        },
    }
}

/// Repository for catalog database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Entity Reads
    // =========================================================================

    /// Count entities of a kind
    pub async fn count_entities(&self, kind: EntityKind) -> Result<u64> {
        self.db
            .execute_async(move |conn| {
                let count: i64 = conn.query_row(
                    &format!("SELECT COUNT(*) FROM {}", tables(kind).entity),
                    [],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
    }

    /// Load one page of entities ordered by id
    pub async fn load_page(
        &self,
        query: &EntityQuery,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<ParentEntity>> {
        let query = query.clone();

        self.db
            .execute_async(move |conn| Self::load_page_sync(conn, &query, offset, limit))
            .await
    }

    fn load_page_sync(
        conn: &Connection,
        query: &EntityQuery,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<ParentEntity>> {
        let kind = query.kind;
        let tables = tables(kind);

        let mut stmt = conn.prepare(&format!(
            "SELECT id FROM {} ORDER BY id LIMIT ?1 OFFSET ?2",
            tables.entity
        ))?;
        let ids: Vec<String> = stmt
            .query_map(params![limit as i64, offset as i64], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;

        let mut entities = Vec::with_capacity(ids.len());
        for id in ids {
            let names = if query.includes(Association::Translations) {
                Self::load_names(conn, &tables, &id)?
            } else {
                Vec::new()
            };

            let load_media = query.includes(Association::Media);
            let with_translations = query.includes(Association::MediaTranslations);
            let media = match kind {
                EntityKind::Product => {
                    let mut attachments = Vec::new();
                    if load_media {
                        for media_id in Self::load_product_media_ids(conn, &id)? {
                            attachments.push(Self::load_media(conn, media_id, with_translations)?);
                        }
                    }
                    EntityMedia::Multiple(attachments)
                }
                EntityKind::Category => {
                    let media_id = if load_media {
                        Self::load_category_media_id(conn, &id)?
                    } else {
                        None
                    };
                    EntityMedia::Single(match media_id {
                        Some(media_id) => Some(Self::load_media(conn, media_id, with_translations)?),
                        None => None,
                    })
                }
            };

            entities.push(ParentEntity {
                id,
                kind,
                names,
                media,
            });
        }

        Ok(entities)
    }

    // Names stored as NULL contribute no name for their language.
    fn load_names(conn: &Connection, tables: &KindTables, id: &str) -> Result<Vec<NameTranslation>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT language_id, name FROM {} WHERE {} = ?1 AND name IS NOT NULL ORDER BY language_id",
            tables.translation, tables.foreign_key
        ))?;
        let names = stmt
            .query_map([id], |row| {
                Ok(NameTranslation {
                    language_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<_>>()?;
        Ok(names)
    }

    fn load_product_media_ids(conn: &Connection, product_id: &str) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT media_id FROM product_media
            WHERE product_id = ?1
            GROUP BY media_id
            ORDER BY MIN(position), media_id
            "#,
        )?;
        let ids = stmt
            .query_map([product_id], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        Ok(ids)
    }

    fn load_category_media_id(conn: &Connection, category_id: &str) -> Result<Option<String>> {
        let media_id = conn
            .query_row(
                "SELECT media_id FROM category WHERE id = ?1",
                [category_id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten();
        Ok(media_id)
    }

    fn load_media(conn: &Connection, media_id: String, with_translations: bool) -> Result<MediaAttachment> {
        let translations = if with_translations {
            Self::load_media_translations(conn, &media_id)?
        } else {
            Vec::new()
        };
        Ok(MediaAttachment::new(media_id, translations))
    }

    fn load_media_translations(conn: &Connection, media_id: &str) -> Result<Vec<MediaTranslation>> {
        let mut stmt = conn.prepare(
            "SELECT language_id, alt FROM media_translation WHERE media_id = ?1 ORDER BY language_id",
        )?;
        let translations = stmt
            .query_map([media_id], |row| {
                Ok(MediaTranslation {
                    language_id: row.get(0)?,
                    alt: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<_>>()?;
        Ok(translations)
    }

    /// Current translations of one media asset
    pub async fn get_media_translations(&self, media_id: &str) -> Result<Vec<MediaTranslation>> {
        let media_id = media_id.to_string();

        self.db
            .execute_async(move |conn| Self::load_media_translations(conn, &media_id))
            .await
    }

    // =========================================================================
    // Media Translation Writes
    // =========================================================================

    /// Insert media translation records in one transaction
    pub async fn insert_media_translations(
        &self,
        records: Vec<MediaTranslationRecord>,
        actor: &str,
    ) -> Result<()> {
        let actor = actor.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .transaction_async(move |tx| {
                for record in records {
                    tx.execute(
                        r#"
                        INSERT INTO media_translation (media_id, language_id, alt, created_at, updated_by)
                        VALUES (?1, ?2, ?3, ?4, ?5)
                        "#,
                        params![record.media_id, record.language_id, record.alt, now, actor],
                    )?;
                }
                Ok(())
            })
            .await
    }

    /// Overwrite the alt of existing media translation records in one transaction
    pub async fn update_media_translations(
        &self,
        records: Vec<MediaTranslationRecord>,
        actor: &str,
    ) -> Result<()> {
        let actor = actor.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .transaction_async(move |tx| {
                for record in records {
                    let changed = tx.execute(
                        r#"
                        UPDATE media_translation
                        SET alt = ?1, updated_at = ?2, updated_by = ?3
                        WHERE media_id = ?4 AND language_id = ?5
                        "#,
                        params![record.alt, now, actor, record.media_id, record.language_id],
                    )?;
                    if changed == 0 {
                        return Err(StoreError::NotFound {
                            media_id: record.media_id,
                            language_id: record.language_id,
                        }
                        .into());
                    }
                }
                Ok(())
            })
            .await
    }

    fn check_writable(records: &[MediaTranslationRecord], ctx: &ExecutionContext) -> Result<(), StoreError> {
        if records.is_empty() {
            return Err(StoreError::EmptyBatch);
        }
        if !ctx.can_write() {
            return Err(StoreError::Forbidden {
                actor: ctx.actor.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EntitySource for Repository {
    async fn count(&self, kind: EntityKind, _ctx: &ExecutionContext) -> Result<u64, SourceError> {
        Ok(self.count_entities(kind).await?)
    }

    async fn fetch_page(
        &self,
        query: &EntityQuery,
        offset: u64,
        limit: usize,
        ctx: &ExecutionContext,
    ) -> Result<Vec<ParentEntity>, SourceError> {
        debug!(
            "Loading {} {} from offset {} for {} (joins: {})",
            limit,
            query.kind.plural(),
            offset,
            ctx.actor,
            query.paths().join(", ")
        );
        Ok(self.load_page(query, offset, limit).await?)
    }
}

#[async_trait]
impl MediaTranslationStore for Repository {
    async fn create(
        &self,
        records: &[MediaTranslationRecord],
        ctx: &ExecutionContext,
    ) -> Result<(), StoreError> {
        Self::check_writable(records, ctx)?;
        Ok(self.insert_media_translations(records.to_vec(), &ctx.actor).await?)
    }

    async fn update(
        &self,
        records: &[MediaTranslationRecord],
        ctx: &ExecutionContext,
    ) -> Result<(), StoreError> {
        Self::check_writable(records, ctx)?;
        Ok(self.update_media_translations(records.to_vec(), &ctx.actor).await?)
    }
}

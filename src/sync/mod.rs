/*!
 * Sync drivers propagating entity names onto media alt texts.
 *
 * - `MultiMediaSync`: entities owning a media collection (products)
 * - `SingleMediaSync`: entities owning at most one media (categories)
 *
 * Both page through an `EntitySource`, reconcile every (media, language) pair
 * and execute the resulting writes one by one against a
 * `MediaTranslationStore`. The first failure aborts the phase; writes already
 * executed stay committed and re-running the phase is safe.
 */

use log::info;
use serde::Serialize;
use std::fmt;

use crate::context::ExecutionContext;
use crate::errors::{SourceError, SyncError};
use crate::models::{EntityKind, MediaAttachment, ParentEntity};
use crate::store::{EntityQuery, EntitySource, MediaTranslationStore};

mod engine;
pub mod multi;
pub mod single;

pub use multi::MultiMediaSync;
pub use single::SingleMediaSync;

use engine::Reconciler;

/// Default number of entities loaded per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Counters of one sync phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Entities processed
    pub entities: u64,
    /// Translation records created
    pub created: u64,
    /// Translation records updated
    pub updated: u64,
    /// Pairs already in sync
    pub unchanged: u64,
    /// Entities without any media
    pub without_media: u64,
    /// Pairs with more than one translation record for the language
    pub anomalies: u64,
}

impl SyncStats {
    /// Number of store writes issued
    pub fn writes(&self) -> u64 {
        self.created + self.updated
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entities, {} created, {} updated, {} unchanged, {} without media",
            self.entities, self.created, self.updated, self.unchanged, self.without_media
        )?;
        if self.anomalies > 0 {
            write!(f, ", {} duplicate translations", self.anomalies)?;
        }
        Ok(())
    }
}

/// Picks the attachments a driver reconciles for one entity
pub(crate) type AttachmentSelector = fn(&ParentEntity) -> Vec<&MediaAttachment>;

/// Attachments of `entity`, once its media shape matches the one of `kind`
fn attachments_of(
    kind: EntityKind,
    entity: &ParentEntity,
    select: AttachmentSelector,
) -> Result<Vec<&MediaAttachment>, SyncError> {
    let expected = kind.media_cardinality();
    if entity.media.cardinality() != expected {
        return Err(SyncError::UnexpectedMediaShape {
            entity_id: entity.id.clone(),
            expected,
        });
    }
    Ok(select(entity))
}

/// Shared paging loop of both drivers
#[derive(Clone, Copy)]
pub(crate) struct PhaseRunner<'a> {
    source: &'a dyn EntitySource,
    store: &'a dyn MediaTranslationStore,
    ctx: &'a ExecutionContext,
    page_size: usize,
}

impl<'a> PhaseRunner<'a> {
    pub(crate) fn new(
        source: &'a dyn EntitySource,
        store: &'a dyn MediaTranslationStore,
        ctx: &'a ExecutionContext,
    ) -> Self {
        Self {
            source,
            store,
            ctx,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub(crate) fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub(crate) async fn run<F>(
        &self,
        kind: EntityKind,
        select: AttachmentSelector,
        mut on_progress: F,
    ) -> Result<SyncStats, SyncError>
    where
        F: FnMut(u64, u64),
    {
        let unavailable = |source: SourceError| SyncError::SourceUnavailable { kind, source };

        let query = EntityQuery::for_sync(kind);
        let total = self.source.count(kind, self.ctx).await.map_err(unavailable)?;
        info!(
            "Generating alternative texts for {} {} (joins: {})",
            total,
            kind.plural(),
            query.paths().join(", ")
        );

        let mut reconciler = Reconciler::new(self.store, self.ctx);
        let mut offset: u64 = 0;
        let mut completed: u64 = 0;

        loop {
            let page = self
                .source
                .fetch_page(&query, offset, self.page_size, self.ctx)
                .await
                .map_err(unavailable)?;
            if page.is_empty() {
                break;
            }

            reconciler.start_page();
            for entity in &page {
                let attachments = attachments_of(kind, entity, select)?;
                reconciler.sync_entity(&entity.names, &attachments).await?;

                completed += 1;
                on_progress(completed, total.max(completed));
            }

            offset += page.len() as u64;
            if page.len() < self.page_size {
                break;
            }
        }

        Ok(reconciler.into_stats())
    }

    pub(crate) async fn run_entities(
        &self,
        kind: EntityKind,
        entities: &[ParentEntity],
        select: AttachmentSelector,
    ) -> Result<SyncStats, SyncError> {
        let mut reconciler = Reconciler::new(self.store, self.ctx);
        for entity in entities {
            let attachments = attachments_of(kind, entity, select)?;
            reconciler.sync_entity(&entity.names, &attachments).await?;
        }
        Ok(reconciler.into_stats())
    }
}

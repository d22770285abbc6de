/*!
 * Driver for entities owning at most one media attachment.
 */

use crate::context::ExecutionContext;
use crate::errors::SyncError;
use crate::models::{EntityKind, MediaAttachment, ParentEntity};
use crate::store::{EntitySource, MediaTranslationStore};

use super::{PhaseRunner, SyncStats};

/// Propagates category names onto the alt texts of the category media
pub struct SingleMediaSync<'a> {
    runner: PhaseRunner<'a>,
}

impl<'a> SingleMediaSync<'a> {
    /// Entity kind this driver loads
    pub const KIND: EntityKind = EntityKind::Category;

    pub fn new(
        source: &'a dyn EntitySource,
        store: &'a dyn MediaTranslationStore,
        ctx: &'a ExecutionContext,
    ) -> Self {
        Self {
            runner: PhaseRunner::new(source, store, ctx),
        }
    }

    /// Number of entities loaded per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.runner = self.runner.with_page_size(page_size);
        self
    }

    /// Run the phase over every category of the source.
    ///
    /// `on_progress(completed, total)` is called after each category.
    pub async fn run<F>(&self, on_progress: F) -> Result<SyncStats, SyncError>
    where
        F: FnMut(u64, u64),
    {
        self.runner.run(Self::KIND, Self::attachments, on_progress).await
    }

    /// Reconcile already hydrated entities without going through the source
    pub async fn sync_entities(&self, entities: &[ParentEntity]) -> Result<SyncStats, SyncError> {
        self.runner.run_entities(Self::KIND, entities, Self::attachments).await
    }

    // A missing media yields no attachment, not an error.
    fn attachments(entity: &ParentEntity) -> Vec<&MediaAttachment> {
        entity.media.attachments()
    }
}

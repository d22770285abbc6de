/*!
 * Executes reconciliation actions for the attachments of one entity at a time.
 */

use log::{debug, warn};
use std::borrow::Cow;
use std::collections::HashMap;

use crate::context::ExecutionContext;
use crate::errors::SyncError;
use crate::models::{MediaAttachment, MediaTranslation, MediaTranslationRecord, NameTranslation};
use crate::reconcile::{self, Action};
use crate::store::{MediaTranslationStore, WriteOperation};

use super::SyncStats;

/// Applies reconcile() results to a store and keeps per-phase counters.
///
/// Writes issued while processing the current page are remembered and laid
/// over the hydrated snapshot, so a media shared by several entities of the
/// same page is compared against what was just written rather than against
/// the stale snapshot.
pub(crate) struct Reconciler<'a> {
    store: &'a dyn MediaTranslationStore,
    ctx: &'a ExecutionContext,
    // media id -> language id -> alt written in the current page
    written: HashMap<String, HashMap<String, String>>,
    stats: SyncStats,
}

impl<'a> Reconciler<'a> {
    pub(crate) fn new(store: &'a dyn MediaTranslationStore, ctx: &'a ExecutionContext) -> Self {
        Self {
            store,
            ctx,
            written: HashMap::new(),
            stats: SyncStats::default(),
        }
    }

    /// Forget writes of the previous page; a new page is hydrated after them.
    pub(crate) fn start_page(&mut self) {
        self.written.clear();
    }

    pub(crate) fn into_stats(self) -> SyncStats {
        self.stats
    }

    /// Reconcile every (attachment, language) pair of one entity
    pub(crate) async fn sync_entity(
        &mut self,
        names: &[NameTranslation],
        attachments: &[&MediaAttachment],
    ) -> Result<(), SyncError> {
        self.stats.entities += 1;
        if attachments.is_empty() {
            self.stats.without_media += 1;
            return Ok(());
        }

        for name in names {
            for media in attachments {
                let existing = self.effective_translations(media);

                if reconcile::duplicate_count(&name.language_id, &existing) > 1 {
                    warn!(
                        "Media {} has several translations in language {}, using the first one",
                        media.id, name.language_id
                    );
                    self.stats.anomalies += 1;
                }

                let action = reconcile::reconcile(&media.id, &name.language_id, &name.name, &existing);
                self.execute(action).await?;
            }
        }

        Ok(())
    }

    fn effective_translations<'m>(&self, media: &'m MediaAttachment) -> Cow<'m, [MediaTranslation]> {
        let Some(written) = self.written.get(&media.id) else {
            return Cow::Borrowed(&media.translations);
        };

        let mut translations = media.translations.clone();
        for (language_id, alt) in written {
            match translations.iter_mut().find(|t| &t.language_id == language_id) {
                Some(translation) => translation.alt = Some(alt.clone()),
                None => translations.push(MediaTranslation::new(language_id, Some(alt.as_str()))),
            }
        }
        Cow::Owned(translations)
    }

    async fn execute(&mut self, action: Action) -> Result<(), SyncError> {
        let (operation, record) = match action {
            Action::None => {
                self.stats.unchanged += 1;
                return Ok(());
            }
            Action::Create(record) => (WriteOperation::Create, record),
            Action::Update(record) => (WriteOperation::Update, record),
        };

        let batch = std::slice::from_ref(&record);
        let result = match operation {
            WriteOperation::Create => self.store.create(batch, self.ctx).await,
            WriteOperation::Update => self.store.update(batch, self.ctx).await,
        };
        result.map_err(|source| SyncError::WriteRejected {
            operation,
            media_id: record.media_id.clone(),
            language_id: record.language_id.clone(),
            source,
        })?;

        debug!(
            "{} alt text '{}' for media {} in language {}",
            operation, record.alt, record.media_id, record.language_id
        );
        match operation {
            WriteOperation::Create => self.stats.created += 1,
            WriteOperation::Update => self.stats.updated += 1,
        }
        self.remember(record);

        Ok(())
    }

    fn remember(&mut self, record: MediaTranslationRecord) {
        self.written
            .entry(record.media_id)
            .or_default()
            .insert(record.language_id, record.alt);
    }
}

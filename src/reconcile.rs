/*!
 * Reconciliation of one (media, language) pair.
 *
 * `reconcile()` is a pure function: it looks at the alt text a media asset
 * currently carries for a language, compares it with the desired value and
 * returns the write that would bring the pair in sync. Callers execute the
 * returned action against a media translation store.
 */

use crate::models::{MediaTranslation, MediaTranslationRecord};

/// State of a (media, language) pair relative to the desired alt text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    /// No translation record exists for the language
    Absent,
    /// A record exists but its alt is missing or different
    Stale,
    /// The record already carries the desired alt
    Synced,
}

/// Write required to bring a pair in sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do
    None,
    /// Insert a new translation record
    Create(MediaTranslationRecord),
    /// Overwrite the alt of the existing record
    Update(MediaTranslationRecord),
}

impl Action {
    /// Whether executing this action issues a store call
    pub fn is_write(&self) -> bool {
        !matches!(self, Action::None)
    }

    /// Payload of the write, if any
    pub fn record(&self) -> Option<&MediaTranslationRecord> {
        match self {
            Action::None => None,
            Action::Create(record) | Action::Update(record) => Some(record),
        }
    }
}

/// First translation for `language_id`, if any
fn find_translation<'a>(
    language_id: &str,
    existing: &'a [MediaTranslation],
) -> Option<&'a MediaTranslation> {
    existing.iter().find(|t| t.language_id == language_id)
}

/// Classify a pair. Alt values are compared with exact string equality, so an
/// empty desired alt matches an empty stored alt but not a missing one.
pub fn pair_state(language_id: &str, desired_alt: &str, existing: &[MediaTranslation]) -> PairState {
    match find_translation(language_id, existing) {
        None => PairState::Absent,
        Some(translation) => match translation.alt.as_deref() {
            Some(alt) if alt == desired_alt => PairState::Synced,
            _ => PairState::Stale,
        },
    }
}

/// Number of translation records for `language_id`. More than one is an
/// upstream data anomaly; `reconcile()` only looks at the first.
pub fn duplicate_count(language_id: &str, existing: &[MediaTranslation]) -> usize {
    existing.iter().filter(|t| t.language_id == language_id).count()
}

/// Decide the write for one (media, language) pair.
///
/// # Arguments
///
/// * `media_id` - Media whose alt text is reconciled
/// * `language_id` - Target language
/// * `desired_alt` - Alt text the pair should carry
/// * `existing` - Translations the media currently carries, in any language
pub fn reconcile(
    media_id: &str,
    language_id: &str,
    desired_alt: &str,
    existing: &[MediaTranslation],
) -> Action {
    let record = || MediaTranslationRecord::new(media_id, language_id, desired_alt);

    match pair_state(language_id, desired_alt, existing) {
        PairState::Absent => Action::Create(record()),
        PairState::Stale => Action::Update(record()),
        PairState::Synced => Action::None,
    }
}

/*!
 * Domain models for parent entities, media attachments and their translations.
 *
 * A parent entity (product or category) carries localized names; the media it
 * references carry localized alt texts. These types are what the entity
 * source hydrates and what the sync drivers read.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many media attachments a parent entity kind owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCardinality {
    /// At most one media attachment
    Single,
    /// A collection of media attachments
    Multiple,
}

impl fmt::Display for MediaCardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaCardinality::Single => write!(f, "single"),
            MediaCardinality::Multiple => write!(f, "multiple"),
        }
    }
}

/// Parent entity kinds whose names are propagated onto media alt texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Catalog item with a media gallery
    Product,
    /// Category with one optional cover media
    Category,
}

impl EntityKind {
    /// Media shape owned by this kind
    pub fn media_cardinality(&self) -> MediaCardinality {
        match self {
            EntityKind::Product => MediaCardinality::Multiple,
            EntityKind::Category => MediaCardinality::Single,
        }
    }

    /// Plural label used in progress output
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Product => "products",
            EntityKind::Category => "categories",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Product => write!(f, "product"),
            EntityKind::Category => write!(f, "category"),
        }
    }
}

/// Localized display name of a parent entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTranslation {
    /// Language identifier
    pub language_id: String,
    /// Display name in that language
    pub name: String,
}

impl NameTranslation {
    pub fn new(language_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            language_id: language_id.into(),
            name: name.into(),
        }
    }
}

/// Alt text of a media asset in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTranslation {
    /// Language identifier
    pub language_id: String,
    /// Alternative text, absent when never set
    pub alt: Option<String>,
}

impl MediaTranslation {
    pub fn new(language_id: impl Into<String>, alt: Option<&str>) -> Self {
        Self {
            language_id: language_id.into(),
            alt: alt.map(str::to_string),
        }
    }
}

/// A media asset referenced by one or more parent entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Media identifier
    pub id: String,
    /// Existing per-language alt texts
    pub translations: Vec<MediaTranslation>,
}

impl MediaAttachment {
    pub fn new(id: impl Into<String>, translations: Vec<MediaTranslation>) -> Self {
        Self {
            id: id.into(),
            translations,
        }
    }

    /// Media without any translation yet
    pub fn bare(id: impl Into<String>) -> Self {
        Self::new(id, Vec::new())
    }
}

/// Media owned by a parent entity, shaped by its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityMedia {
    /// Single-media kind; `None` when no media is assigned
    Single(Option<MediaAttachment>),
    /// Multi-media kind
    Multiple(Vec<MediaAttachment>),
}

impl EntityMedia {
    pub fn cardinality(&self) -> MediaCardinality {
        match self {
            EntityMedia::Single(_) => MediaCardinality::Single,
            EntityMedia::Multiple(_) => MediaCardinality::Multiple,
        }
    }

    /// All attachments regardless of shape
    pub fn attachments(&self) -> Vec<&MediaAttachment> {
        match self {
            EntityMedia::Single(media) => media.iter().collect(),
            EntityMedia::Multiple(media) => media.iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            EntityMedia::Single(media) => media.is_none(),
            EntityMedia::Multiple(media) => media.is_empty(),
        }
    }
}

/// A fully hydrated product or category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentEntity {
    /// Entity identifier
    pub id: String,
    /// Entity kind
    pub kind: EntityKind,
    /// One name per language
    pub names: Vec<NameTranslation>,
    /// Associated media
    pub media: EntityMedia,
}

impl ParentEntity {
    /// Create a product with a media gallery
    pub fn product(
        id: impl Into<String>,
        names: Vec<NameTranslation>,
        media: Vec<MediaAttachment>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Product,
            names,
            media: EntityMedia::Multiple(media),
        }
    }

    /// Create a category with an optional cover media
    pub fn category(
        id: impl Into<String>,
        names: Vec<NameTranslation>,
        media: Option<MediaAttachment>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Category,
            names,
            media: EntityMedia::Single(media),
        }
    }
}

/// Write payload for a media translation create or update
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaTranslationRecord {
    /// Media identifier
    pub media_id: String,
    /// Language identifier
    pub language_id: String,
    /// Alt text to store
    pub alt: String,
}

impl MediaTranslationRecord {
    pub fn new(
        media_id: impl Into<String>,
        language_id: impl Into<String>,
        alt: impl Into<String>,
    ) -> Self {
        Self {
            media_id: media_id.into(),
            language_id: language_id.into(),
            alt: alt.into(),
        }
    }
}

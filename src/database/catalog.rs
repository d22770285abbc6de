/*!
 * JSON catalog fixtures.
 *
 * A fixture describes languages, media (with their current alt texts),
 * products with their media gallery and categories with their optional media.
 * `import_catalog` writes a fixture into the database in one transaction.
 *
 * ```json
 * {
 *   "languages": [{ "id": "en", "name": "English" }],
 *   "media": [{ "id": "m1", "translations": { "en": null } }],
 *   "products": [{ "id": "p1", "names": { "en": "Red Shirt" }, "media": ["m1"] }],
 *   "categories": [{ "id": "c1", "names": { "en": "Shirts" }, "media": "m1" }]
 * }
 * ```
 */

use anyhow::{Context, Result};
use log::info;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

use super::connection::DatabaseConnection;

/// Complete catalog fixture
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub languages: Vec<LanguageFixture>,
    #[serde(default)]
    pub media: Vec<MediaFixture>,
    #[serde(default)]
    pub products: Vec<ProductFixture>,
    #[serde(default)]
    pub categories: Vec<CategoryFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageFixture {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFixture {
    pub id: String,
    /// Alt text per language; `null` stores a translation without alt
    #[serde(default)]
    pub translations: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFixture {
    pub id: String,
    #[serde(default)]
    pub names: BTreeMap<String, Option<String>>,
    /// Media ids in gallery order
    #[serde(default)]
    pub media: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFixture {
    pub id: String,
    #[serde(default)]
    pub names: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub media: Option<String>,
}

/// Rows written by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub languages: usize,
    pub media: usize,
    pub products: usize,
    pub categories: usize,
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} languages, {} media, {} products, {} categories",
            self.languages, self.media, self.products, self.categories
        )
    }
}

impl CatalogFixture {
    /// Parse a fixture from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse catalog file: {:?}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Write a fixture into the catalog in one transaction.
///
/// Existing rows with the same ids make the import fail and leave the catalog untouched.
pub async fn import_catalog(db: &DatabaseConnection, fixture: CatalogFixture) -> Result<ImportSummary> {
    let summary = db
        .transaction_async(move |tx| {
            let now = chrono::Utc::now().to_rfc3339();

            for language in &fixture.languages {
                tx.execute(
                    "INSERT INTO language (id, name) VALUES (?1, ?2)",
                    params![language.id, language.name],
                )
                .with_context(|| format!("Failed to import language {}", language.id))?;
            }

            for media in &fixture.media {
                tx.execute(
                    "INSERT INTO media (id) VALUES (?1)",
                    params![media.id],
                )
                .with_context(|| format!("Failed to import media {}", media.id))?;

                for (language_id, alt) in &media.translations {
                    tx.execute(
                        r#"
                        INSERT INTO media_translation (media_id, language_id, alt, created_at)
                        VALUES (?1, ?2, ?3, ?4)
                        "#,
                        params![media.id, language_id, alt, now],
                    )
                    .with_context(|| {
                        format!("Failed to import translation {} of media {}", language_id, media.id)
                    })?;
                }
            }

            for product in &fixture.products {
                tx.execute(
                    "INSERT INTO product (id) VALUES (?1)",
                    params![product.id],
                )
                .with_context(|| format!("Failed to import product {}", product.id))?;

                for (language_id, name) in &product.names {
                    tx.execute(
                        "INSERT INTO product_translation (product_id, language_id, name) VALUES (?1, ?2, ?3)",
                        params![product.id, language_id, name],
                    )?;
                }

                for (position, media_id) in product.media.iter().enumerate() {
                    tx.execute(
                        r#"
                        INSERT INTO product_media (id, product_id, media_id, position)
                        VALUES (?1, ?2, ?3, ?4)
                        "#,
                        params![Uuid::new_v4().to_string(), product.id, media_id, position as i64],
                    )
                    .with_context(|| {
                        format!("Failed to attach media {} to product {}", media_id, product.id)
                    })?;
                }
            }

            for category in &fixture.categories {
                tx.execute(
                    "INSERT INTO category (id, media_id) VALUES (?1, ?2)",
                    params![category.id, category.media],
                )
                .with_context(|| format!("Failed to import category {}", category.id))?;

                for (language_id, name) in &category.names {
                    tx.execute(
                        "INSERT INTO category_translation (category_id, language_id, name) VALUES (?1, ?2, ?3)",
                        params![category.id, language_id, name],
                    )?;
                }
            }

            Ok(ImportSummary {
                languages: fixture.languages.len(),
                media: fixture.media.len(),
                products: fixture.products.len(),
                categories: fixture.categories.len(),
            })
        })
        .await?;

    info!("Imported catalog: {}", summary);
    Ok(summary)
}

/*!
 * Sync drivers against the SQLite catalog
 */

use alttext_sync::context::ExecutionContext;
use alttext_sync::database::{import_catalog, CatalogFixture, DatabaseConnection, Repository};
use alttext_sync::errors::{StoreError, SyncError};
use alttext_sync::models::{MediaAttachment, MediaTranslation, NameTranslation, ParentEntity};
use alttext_sync::store::WriteOperation;
use alttext_sync::sync::{MultiMediaSync, SingleMediaSync};
use crate::common;

fn alt_of(translations: &[MediaTranslation], language_id: &str) -> Option<String> {
    translations
        .iter()
        .find(|t| t.language_id == language_id)
        .and_then(|t| t.alt.clone())
}

#[tokio::test]
async fn test_multiMediaSync_sampleCatalog_shouldSyncEveryGalleryMedia() {
    common::init_logger();
    let dir = common::create_temp_dir().unwrap();
    let repo = common::create_sample_catalog(dir.path()).await.unwrap();
    let ctx = ExecutionContext::system();

    let stats = MultiMediaSync::new(&repo, &repo, &ctx)
        .run(|_, _| {})
        .await
        .expect("product phase failed");

    assert_eq!(stats.entities, 3);
    assert_eq!(stats.created, 3);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.unchanged, 2);
    assert_eq!(stats.without_media, 1);

    for media_id in ["m-shirt-front", "m-shirt-back"] {
        let translations = repo.get_media_translations(media_id).await.unwrap();
        assert_eq!(alt_of(&translations, "en").as_deref(), Some("Red Shirt"));
        assert_eq!(alt_of(&translations, "de").as_deref(), Some("Rotes Shirt"));
    }
}

#[tokio::test]
async fn test_singleMediaSync_sampleCatalog_shouldUpdateCategoryMedia() {
    common::init_logger();
    let dir = common::create_temp_dir().unwrap();
    let repo = common::create_sample_catalog(dir.path()).await.unwrap();
    let ctx = ExecutionContext::system();

    let stats = SingleMediaSync::new(&repo, &repo, &ctx)
        .run(|_, _| {})
        .await
        .expect("category phase failed");

    assert_eq!(stats.entities, 2);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.without_media, 1);
    let translations = repo.get_media_translations("m-category").await.unwrap();
    assert_eq!(alt_of(&translations, "en").as_deref(), Some("Apparel"));
}

#[tokio::test]
async fn test_bothPhases_secondRun_shouldIssueNoWrites() {
    common::init_logger();
    let dir = common::create_temp_dir().unwrap();
    let repo = common::create_sample_catalog(dir.path()).await.unwrap();
    let ctx = ExecutionContext::system();

    MultiMediaSync::new(&repo, &repo, &ctx).run(|_, _| {}).await.unwrap();
    SingleMediaSync::new(&repo, &repo, &ctx).run(|_, _| {}).await.unwrap();
    let before = repo.db().stats().unwrap();

    let products = MultiMediaSync::new(&repo, &repo, &ctx).run(|_, _| {}).await.unwrap();
    let categories = SingleMediaSync::new(&repo, &repo, &ctx).run(|_, _| {}).await.unwrap();

    assert_eq!(products.writes(), 0);
    assert_eq!(categories.writes(), 0);
    let after = repo.db().stats().unwrap();
    assert_eq!(before.media_translation_count, after.media_translation_count);
    assert_eq!(after.missing_alt_count, 0);
}

#[tokio::test]
async fn test_multiMediaSync_smallPages_shouldMatchSinglePage() {
    let dir = common::create_temp_dir().unwrap();
    let repo = common::create_sample_catalog(dir.path()).await.unwrap();
    let ctx = ExecutionContext::system();
    let mut progress = Vec::new();

    let stats = MultiMediaSync::new(&repo, &repo, &ctx)
        .with_page_size(1)
        .run(|completed, total| progress.push((completed, total)))
        .await
        .unwrap();

    assert_eq!(stats.entities, 3);
    assert_eq!(stats.writes(), 4);
    assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
}

async fn create_shared_media_catalog() -> Repository {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let fixture = CatalogFixture::from_json(
        r#"{
            "languages": [{ "id": "en", "name": "English" }],
            "media": [{ "id": "shared" }],
            "products": [
                { "id": "p1", "names": { "en": "Red Shirt" }, "media": ["shared"] },
                { "id": "p2", "names": { "en": "Blue Shirt" }, "media": ["shared"] }
            ]
        }"#,
    )
    .unwrap();
    import_catalog(&db, fixture).await.unwrap();
    Repository::new(db)
}

#[tokio::test]
async fn test_multiMediaSync_sharedMedia_shouldCreateOnceAcrossProducts() {
    let repo = create_shared_media_catalog().await;
    let ctx = ExecutionContext::system();

    let stats = MultiMediaSync::new(&repo, &repo, &ctx)
        .run(|_, _| {})
        .await
        .expect("shared media must not violate the unique pair");

    assert_eq!(stats.created, 1);
    assert_eq!(stats.updated, 1);
    let translations = repo.get_media_translations("shared").await.unwrap();
    assert_eq!(translations.len(), 1);
    assert_eq!(alt_of(&translations, "en").as_deref(), Some("Blue Shirt"));
}

#[tokio::test]
async fn test_multiMediaSync_sharedMediaOnSeparatePages_shouldReadBackEarlierWrite() {
    let repo = create_shared_media_catalog().await;
    let ctx = ExecutionContext::system();

    // p1 and p2 land on different pages, so p2 sees the record created for p1
    let stats = MultiMediaSync::new(&repo, &repo, &ctx)
        .with_page_size(1)
        .run(|_, _| {})
        .await
        .expect("shared media must not violate the unique pair");

    assert_eq!(stats.entities, 2);
    assert_eq!(stats.created, 1);
    assert_eq!(stats.updated, 1);
    let translations = repo.get_media_translations("shared").await.unwrap();
    assert_eq!(translations.len(), 1);
    assert_eq!(alt_of(&translations, "en").as_deref(), Some("Blue Shirt"));
}

#[tokio::test]
async fn test_multiMediaSync_unknownLanguage_shouldRejectWrite() {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let fixture = CatalogFixture::from_json(
        r#"{
            "languages": [{ "id": "en", "name": "English" }],
            "media": [{ "id": "m1" }],
            "products": [{ "id": "p1", "names": { "en": "Hat" }, "media": ["m1"] }]
        }"#,
    )
    .unwrap();
    import_catalog(&db, fixture).await.unwrap();
    let repo = Repository::new(db);
    let ctx = ExecutionContext::system();

    // fr is not a catalog language, so the create trips the foreign key
    let entities = vec![ParentEntity::product(
        "p1",
        vec![NameTranslation::new("fr", "Chapeau")],
        vec![MediaAttachment::bare("m1")],
    )];
    let result = MultiMediaSync::new(&repo, &repo, &ctx)
        .sync_entities(&entities)
        .await;

    match result {
        Err(SyncError::WriteRejected { operation, source, .. }) => {
            assert_eq!(operation, WriteOperation::Create);
            assert!(matches!(source, StoreError::ConstraintViolation(_)));
        }
        other => panic!("expected WriteRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_singleMediaSync_readOnlyContext_shouldLeaveCatalogUntouched() {
    let dir = common::create_temp_dir().unwrap();
    let repo = common::create_sample_catalog(dir.path()).await.unwrap();
    let ctx = ExecutionContext::read_only("auditor");

    let result = SingleMediaSync::new(&repo, &repo, &ctx).run(|_, _| {}).await;

    assert!(matches!(
        result,
        Err(SyncError::WriteRejected { source: StoreError::Forbidden { .. }, .. })
    ));
    let translations = repo.get_media_translations("m-category").await.unwrap();
    assert_eq!(alt_of(&translations, "en").as_deref(), Some("Old banner"));
}

/*!
 * Common test utilities for the alttext-sync test suite
 */

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use alttext_sync::app_config::Config;
use alttext_sync::database::{import_catalog, CatalogFixture, DatabaseConnection, Repository};

/// Route library logs through env_logger; safe to call from every test
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Helper to get the absolute path to a test resource
pub fn test_resource_path(relative_path: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("resources");
    path.push(relative_path);
    path
}

/// The sample catalog shipped with the tests
pub fn sample_fixture() -> Result<CatalogFixture> {
    CatalogFixture::from_file(test_resource_path("catalog.json"))
}

/// Creates a file-backed catalog in `dir` loaded with the sample fixture
pub async fn create_sample_catalog(dir: &Path) -> Result<Repository> {
    let db = DatabaseConnection::new(dir.join("catalog.db"))?;
    import_catalog(&db, sample_fixture()?).await?;
    Ok(Repository::new(db))
}

/// Configuration pointing at `dir/catalog.db` with progress bars hidden
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.database.path = Some(dir.join("catalog.db"));
    config.sync.show_progress = false;
    config
}

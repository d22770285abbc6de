/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use alttext_sync::app_config::Config;
use alttext_sync::app_controller::Controller;
use alttext_sync::context::ContextScope;
use alttext_sync::errors::{AppError, SyncError};
use crate::common;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;

    assert_eq!(controller.config().sync.page_size, 100);

    Ok(())
}

/// A full run over the sample catalog, then a second run with nothing to do
#[tokio::test]
async fn test_controller_run_twice_shouldConverge() -> Result<()> {
    common::init_logger();
    let dir = common::create_temp_dir()?;
    common::create_sample_catalog(dir.path()).await?;
    let controller = Controller::with_config(common::test_config(dir.path()))?;

    let first = controller.run().await?;
    let second = controller.run().await?;

    assert_eq!(first.products.writes(), 4);
    assert_eq!(first.categories.writes(), 1);
    assert_eq!(first.total_writes(), 5);
    assert_eq!(second.total_writes(), 0);

    Ok(())
}

/// A read-only context stops the run at the first write
#[tokio::test]
async fn test_controller_run_readOnly_shouldFailWithoutWrites() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let repo = common::create_sample_catalog(dir.path()).await?;
    let before = repo.db().stats()?;
    let mut config = common::test_config(dir.path());
    config.context.scope = ContextScope::ReadOnly;
    let controller = Controller::with_config(config)?;

    let result = controller.run().await;

    assert!(matches!(result, Err(AppError::Sync(SyncError::WriteRejected { .. }))));
    let after = repo.db().stats()?;
    assert_eq!(before.missing_alt_count, after.missing_alt_count);

    Ok(())
}

/// An empty catalog completes both phases without writes
#[tokio::test]
async fn test_controller_run_emptyCatalog_shouldSucceed() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config(dir.path()))?;

    let summary = controller.run().await?;

    assert_eq!(summary.products.entities, 0);
    assert_eq!(summary.categories.entities, 0);

    Ok(())
}

/// Invalid configuration is rejected before any database access
#[test]
fn test_controller_withConfig_invalidActor_shouldFail() {
    let mut config = Config::default();
    config.context.actor = String::new();

    assert!(matches!(Controller::with_config(config), Err(AppError::Config(_))));
}

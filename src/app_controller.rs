use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use serde::Serialize;

use crate::app_config::Config;
use crate::context::ExecutionContext;
use crate::database::{DatabaseConnection, Repository};
use crate::errors::{AppError, SyncError};
use crate::models::EntityKind;
use crate::store::{EntitySource, MediaTranslationStore};
use crate::sync::{MultiMediaSync, SingleMediaSync, SyncStats};

// @module: Application controller running the alt text generation

/// Statistics of a complete run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Product phase
    pub products: SyncStats,
    /// Category phase
    pub categories: SyncStats,
}

impl RunSummary {
    /// Store writes issued by both phases
    pub fn total_writes(&self) -> u64 {
        self.products.writes() + self.categories.writes()
    }
}

/// Main application controller for alt text generation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self, AppError> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open the configured catalog database
    pub fn open_repository(&self) -> Result<Repository, AppError> {
        let path = self.config.database.resolved_path()?;
        let db = DatabaseConnection::new(&path)?;
        Ok(Repository::new(db))
    }

    /// Run both phases against the configured catalog database
    pub async fn run(&self) -> Result<RunSummary, AppError> {
        let repository = self.open_repository()?;
        let ctx = self.config.execution_context();

        self.run_with(&repository, &repository, &ctx).await
    }

    /// Run the product phase, then the category phase.
    ///
    /// The first failure stops the run; the category phase never starts after
    /// a failed product phase.
    pub async fn run_with(
        &self,
        source: &dyn EntitySource,
        store: &dyn MediaTranslationStore,
        ctx: &ExecutionContext,
    ) -> Result<RunSummary, AppError> {
        info!(
            "Generating alternative texts as '{}' (scope: {}, language: {})",
            ctx.actor, ctx.scope, ctx.language_id
        );
        let page_size = self.config.sync.page_size;

        let progress_bar = self.phase_progress_bar(EntityKind::Product);
        let result = MultiMediaSync::new(source, store, ctx)
            .with_page_size(page_size)
            .run(|completed, total| {
                progress_bar.set_length(total);
                progress_bar.set_position(completed);
            })
            .await;
        let products = Self::finish_phase(EntityKind::Product, &progress_bar, result)?;

        let progress_bar = self.phase_progress_bar(EntityKind::Category);
        let result = SingleMediaSync::new(source, store, ctx)
            .with_page_size(page_size)
            .run(|completed, total| {
                progress_bar.set_length(total);
                progress_bar.set_position(completed);
            })
            .await;
        let categories = Self::finish_phase(EntityKind::Category, &progress_bar, result)?;

        Ok(RunSummary {
            products,
            categories,
        })
    }

    /// Message printed once a phase completed
    pub fn success_message(kind: EntityKind) -> String {
        format!(
            "Alternative texts for {} have been generated successfully.",
            kind.plural()
        )
    }

    fn finish_phase(
        kind: EntityKind,
        progress_bar: &ProgressBar,
        result: Result<SyncStats, SyncError>,
    ) -> Result<SyncStats, AppError> {
        match result {
            Ok(stats) => {
                progress_bar.finish_and_clear();
                info!("{}: {}", kind.plural(), stats);
                println!("{}", Self::success_message(kind));
                Ok(stats)
            }
            Err(e) => {
                progress_bar.abandon();
                error!("Generating alternative texts for {} failed: {}", kind.plural(), e);
                Err(e.into())
            }
        }
    }

    fn phase_progress_bar(&self, kind: EntityKind) -> ProgressBar {
        if !self.config.sync.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg} ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message(kind.plural());
        progress_bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaAttachment, NameTranslation, ParentEntity};
    use crate::store::InMemoryCatalog;

    fn quiet_controller() -> Controller {
        let mut config = Config::default();
        config.sync.show_progress = false;
        Controller::with_config(config).expect("valid config")
    }

    #[test]
    fn test_withConfig_invalidConfig_shouldReturnConfigError() {
        let mut config = Config::default();
        config.sync.page_size = 0;

        let result = Controller::with_config(config);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_successMessage_shouldNamePluralKind() {
        assert_eq!(
            Controller::success_message(EntityKind::Category),
            "Alternative texts for categories have been generated successfully."
        );
    }

    #[tokio::test]
    async fn test_runWith_shouldRunBothPhases() {
        let catalog = InMemoryCatalog::new()
            .with_entity(ParentEntity::product(
                "p1",
                vec![NameTranslation::new("en", "Red Shirt")],
                vec![MediaAttachment::bare("m1")],
            ))
            .with_entity(ParentEntity::category(
                "c1",
                vec![NameTranslation::new("en", "Shirts")],
                Some(MediaAttachment::bare("m2")),
            ));
        let ctx = ExecutionContext::system();

        let summary = quiet_controller()
            .run_with(&catalog, &catalog, &ctx)
            .await
            .expect("run failed");

        assert_eq!(summary.products.created, 1);
        assert_eq!(summary.categories.created, 1);
        assert_eq!(summary.total_writes(), 2);
    }

    #[tokio::test]
    async fn test_runWith_productFailure_shouldSkipCategories() {
        let catalog = InMemoryCatalog::new()
            .with_entity(ParentEntity::category(
                "c1",
                vec![NameTranslation::new("en", "Shirts")],
                Some(MediaAttachment::bare("m2")),
            ))
            .fail_source(EntityKind::Product);
        let ctx = ExecutionContext::system();

        let result = quiet_controller().run_with(&catalog, &catalog, &ctx).await;

        assert!(matches!(
            result,
            Err(AppError::Sync(SyncError::SourceUnavailable { .. }))
        ));
        assert_eq!(catalog.write_count(), 0);
    }
}

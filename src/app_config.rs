use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::context::{ContextScope, ExecutionContext, DEFAULT_ACTOR, DEFAULT_LANGUAGE_ID};
use crate::database::DatabaseConnection;
use crate::sync::DEFAULT_PAGE_SIZE;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Catalog database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Sync run settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Execution context passed to the catalog
    #[serde(default)]
    pub context: ContextConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Catalog database configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Database file; the user data directory is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Resolved database file path
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => DatabaseConnection::default_database_path(),
        }
    }
}

/// Sync run configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncConfig {
    /// Entities loaded per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Whether to draw progress bars
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            show_progress: true,
        }
    }
}

/// Execution context configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContextConfig {
    /// Actor recorded on every write
    #[serde(default = "default_actor")]
    pub actor: String,

    /// Permission scope
    #[serde(default)]
    pub scope: ContextScope,

    /// Language of the context itself
    #[serde(default = "default_language_id")]
    pub language_id: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            actor: default_actor(),
            scope: ContextScope::default(),
            language_id: default_language_id(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

fn default_actor() -> String {
    DEFAULT_ACTOR.to_string()
}

fn default_language_id() -> String {
    DEFAULT_LANGUAGE_ID.to_string()
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.sync.page_size == 0 {
            return Err(anyhow!("sync.page_size must be greater than zero"));
        }

        if self.context.actor.trim().is_empty() {
            return Err(anyhow!("context.actor must not be empty"));
        }

        if self.context.language_id.trim().is_empty() {
            return Err(anyhow!("context.language_id must not be empty"));
        }

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("database.path must not be empty when set"));
            }
        }

        Ok(())
    }

    /// Execution context for catalog reads and writes
    pub fn execution_context(&self) -> ExecutionContext {
        ExecutionContext::new(
            self.context.actor.clone(),
            self.context.scope,
            self.context.language_id.clone(),
        )
    }
}

/*!
 * Execution context passed explicitly to every source and store call.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default system language identifier
pub const DEFAULT_LANGUAGE_ID: &str = "default";

/// Default actor recorded on writes
pub const DEFAULT_ACTOR: &str = "system";

/// Authorization scope of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextScope {
    /// Unrestricted system access
    #[default]
    System,
    /// Reads only; stores refuse writes
    ReadOnly,
}

impl ContextScope {
    pub fn allows_writes(&self) -> bool {
        !matches!(self, ContextScope::ReadOnly)
    }
}

impl fmt::Display for ContextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextScope::System => write!(f, "system"),
            ContextScope::ReadOnly => write!(f, "read_only"),
        }
    }
}

/// Actor, scope and language of the current run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Who performs the writes
    pub actor: String,
    /// What the actor may do
    pub scope: ContextScope,
    /// System language of the run
    pub language_id: String,
}

impl ExecutionContext {
    pub fn new(actor: impl Into<String>, scope: ContextScope, language_id: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            scope,
            language_id: language_id.into(),
        }
    }

    /// System context in the default language
    pub fn system() -> Self {
        Self::new(DEFAULT_ACTOR, ContextScope::System, DEFAULT_LANGUAGE_ID)
    }

    pub fn read_only(actor: impl Into<String>) -> Self {
        Self::new(actor, ContextScope::ReadOnly, DEFAULT_LANGUAGE_ID)
    }

    pub fn can_write(&self) -> bool {
        self.scope.allows_writes()
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::system()
    }
}

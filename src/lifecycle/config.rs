//! Engine settings

use serde::{Deserialize, Serialize};

fn default_max_commit_attempts() -> u32 {
    3
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many times an operation runs before a commit conflict is
    /// surfaced to the caller. Must be at least 1.
    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: default_max_commit_attempts(),
        }
    }
}

impl EngineConfig {
    pub fn with_max_commit_attempts(mut self, attempts: u32) -> Self {
        self.max_commit_attempts = attempts;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_commit_attempts == 0 {
            return Err("max_commit_attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}

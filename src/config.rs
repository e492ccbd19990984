use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::TaskGenieError;
use crate::models::{CategoryRegistry, Priority, DEFAULT_CATEGORIES};

/// On-disk configuration. Every field is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub default_priority: Option<Priority>,
    #[serde(default)]
    pub default_category: Option<String>,
}

/// Values pre-filled into a new task when the user leaves them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefaults {
    pub priority: Priority,
    pub category: String,
}

impl Config {
    /// Load from `path`, or return the built-in defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, TaskGenieError> {
        let Some(path) = path else {
            debug!("no config file given, using defaults");
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).map_err(|e| {
            TaskGenieError::config(format!("Cannot read config {}: {e}", path.display()))
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| {
            TaskGenieError::config(format!("Invalid config {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Build the category registry and task defaults, validating both.
    pub fn build(&self) -> Result<(CategoryRegistry, TaskDefaults), TaskGenieError> {
        let registry = match &self.categories {
            Some(names) => CategoryRegistry::new(names)?,
            None => CategoryRegistry::new(DEFAULT_CATEGORIES)?,
        };
        let category = match &self.default_category {
            Some(name) => registry
                .resolve(name)
                .map_err(|_| {
                    TaskGenieError::config(format!(
                        "default_category '{name}' is not one of: {}",
                        registry.names().join(", ")
                    ))
                })?
                .to_string(),
            None => registry.first().name.clone(),
        };
        let defaults = TaskDefaults {
            priority: self.default_priority.unwrap_or_default(),
            category,
        };
        Ok((registry, defaults))
    }
}

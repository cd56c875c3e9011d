//! Per-statement configuration.
//!
//! A small flag bag copied into every statement model at build time and
//! consulted by the renderer.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Rendering switches for one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfiguration {
    /// Allow a declared WHERE clause whose criteria all decline to render
    pub non_rendering_where_allowed: bool,
    /// Allow a declared HAVING clause whose criteria all decline to render
    pub non_rendering_having_allowed: bool,
}

impl StatementConfiguration {
    /// Create a configuration with every switch at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        tracing::debug!(?config, "Loaded statement configuration");
        Ok(config)
    }

    /// Set whether an empty WHERE clause is tolerated.
    pub fn non_rendering_where_allowed(mut self, allowed: bool) -> Self {
        self.non_rendering_where_allowed = allowed;
        self
    }

    /// Set whether an empty HAVING clause is tolerated.
    pub fn non_rendering_having_allowed(mut self, allowed: bool) -> Self {
        self.non_rendering_having_allowed = allowed;
        self
    }

    pub fn is_non_rendering_where_allowed(&self) -> bool {
        self.non_rendering_where_allowed
    }

    pub fn is_non_rendering_having_allowed(&self) -> bool {
        self.non_rendering_having_allowed
    }
}

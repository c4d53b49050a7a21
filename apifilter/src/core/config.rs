//! Configuration
//!
//! Layering: defaults -> JSON file -> environment.
//!
//! ```json
//! {
//!   "function_column": "fun",
//!   "functions": [
//!     { "name": "fullName", "parameters": ["firstName", "surname"] },
//!     { "name": "inAge", "parameters": [["ageFrom", "gt", "age"], ["ageTo", "lt", "age"]] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::domain::parameter::ParameterSpec;

use super::constants::{DEFAULT_FUNCTION_COLUMN, ENV_CONFIG, ENV_FUNCTION_COLUMN};

/// Function declared from parameter descriptors
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub parameters: Vec<ParameterSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiFilterConfig {
    /// Reserved column for explicit function definitions
    pub function_column: String,
    pub functions: Vec<FunctionDeclaration>,
    #[serde(flatten)]
    extra: JsonValue,
}

impl Default for ApiFilterConfig {
    fn default() -> Self {
        Self {
            function_column: DEFAULT_FUNCTION_COLUMN.to_string(),
            functions: Vec::new(),
            extra: JsonValue::Null,
        }
    }
}

impl ApiFilterConfig {
    /// Load defaults, the file named by `APIFILTER_CONFIG` if set, then
    /// environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(ENV_CONFIG) {
            Ok(path) => Self::load_from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Invalid apifilter config")?;
        config.warn_unknown_fields();
        tracing::debug!(
            function_column = %config.function_column,
            functions = config.functions.len(),
            "Config loaded"
        );
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(column) = lookup(ENV_FUNCTION_COLUMN).filter(|c| !c.trim().is_empty()) {
            tracing::debug!(function_column = %column, "Function column overridden by environment");
            self.function_column = column;
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let JsonValue::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str = map.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
            tracing::warn!(fields = %keys_str, "Unknown fields in config file (possible typos)");
        }
    }
}

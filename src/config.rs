// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_clippings_file() -> String {
    "My Clippings.txt".to_string()
}

fn default_cover_candidates() -> usize {
    2
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// Notion integration token ("secret_..." / "ntn_...").
    pub notion_token: String,
    /// Id of the Notion database the book pages live in.
    pub notion_database_id: String,
    /// Path of the clippings export. Relative paths resolve against the
    /// current directory at run time.
    #[serde(default = "default_clippings_file")]
    pub clippings_file: String,
    /// Look up book covers on Google Books before creating pages.
    #[serde(default)]
    pub fetch_covers: bool,
    /// How many volume candidates to inspect per cover lookup.
    #[serde(default = "default_cover_candidates")]
    pub cover_candidates: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notion_token: String::new(),
            notion_database_id: String::new(),
            // Match the serde defaults
            clippings_file: "My Clippings.txt".to_string(),
            fetch_covers: false,
            cover_candidates: 2,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers (onboarding) can behave accordingly.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        // Read the file with contextualized error (covers permission/IO issues).
        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        // Parse TOML with contextualized error (covers syntax issues).
        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    /// This tries multiple strategies:
    ///  - Fast path: check for our explicit "Config file not found" message
    ///  - Look for underlying IO NotFound errors in the error chain
    ///
    /// The goal is to avoid brittle substring checks spread across the codebase.
    pub fn is_missing_config_error(err: &Error) -> bool {
        // Fast textual check for the explicit not-found message.
        if err.to_string().contains("Config file not found") {
            return true;
        }

        // Check if the top-level error is an io::Error with NotFound kind.
        if let Some(io_err) = err.downcast_ref::<std::io::Error>()
            && io_err.kind() == std::io::ErrorKind::NotFound
        {
            return true;
        }

        // Walk the error chain and look for an underlying IO NotFound.
        // `chain()` yields references to the error chain; check each for io::Error.
        // This makes detection robust even when errors are wrapped.
        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// True when the workspace credentials are filled in.
    pub fn has_notion_credentials(&self) -> bool {
        !self.notion_token.trim().is_empty() && !self.notion_database_id.trim().is_empty()
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        LocalStorage::atomic_write(&path, toml_str)?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}

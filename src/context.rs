// Filesystem context: where the config, sync cache, and exported data
// live. An `AppContext` trait keeps the IO layers testable; production
// code resolves platform directories, tests get a throwaway temp root.
//
// No globals and no environment-variable fallbacks: anything that touches
// the filesystem takes a `&dyn AppContext` explicitly.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub trait AppContext: Send + Sync + std::fmt::Debug {
    fn get_data_dir(&self) -> Result<PathBuf>;
    fn get_config_dir(&self) -> Result<PathBuf>;
    fn get_cache_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("config.toml"))
    }

    /// Persisted per-book sync state.
    fn get_sync_cache_path(&self) -> Result<PathBuf> {
        Ok(self.get_cache_dir()?.join("sync.json"))
    }

    /// Grouped-clippings JSON artifact written after each parse.
    fn get_grouped_export_path(&self) -> Result<PathBuf> {
        Ok(self.get_data_dir()?.join("grouped-clippings.json"))
    }
}

/// Platform directories via `ProjectDirs`, or a `--root` override with
/// `data`/`config`/`cache` subdirectories underneath.
#[derive(Clone, Debug)]
pub struct StandardContext {
    override_root: Option<PathBuf>,
}

impl StandardContext {
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }

    fn resolve(&self, sub: &str, platform_dir: impl FnOnce(&ProjectDirs) -> PathBuf) -> Result<PathBuf> {
        let path = match &self.override_root {
            Some(root) => root.join(sub),
            None => {
                let proj = ProjectDirs::from("com", "marginalia", "marginalia")
                    .context("Could not determine a home directory")?;
                platform_dir(&proj)
            }
        };
        if !path.exists() {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(path)
    }
}

impl AppContext for StandardContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        self.resolve("data", |p| p.data_dir().to_path_buf())
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        self.resolve("config", |p| p.config_dir().to_path_buf())
    }

    fn get_cache_dir(&self) -> Result<PathBuf> {
        self.resolve("cache", |p| p.cache_dir().to_path_buf())
    }
}

/// Unique temp-dir context for tests, removed on drop.
#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let root =
            std::env::temp_dir().join(format!("marginalia_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }

    fn subdir(&self, sub: &str) -> Result<PathBuf> {
        let p = self.root.join(sub);
        std::fs::create_dir_all(&p)?;
        Ok(p)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        self.subdir("data")
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        self.subdir("config")
    }

    fn get_cache_dir(&self) -> Result<PathBuf> {
        self.subdir("cache")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Best-effort cleanup; ignore errors.
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

// Persisted per-book sync state.
//
// The cache is a flat JSON array of SyncRecords keyed by exact book
// title. A missing file means nothing has ever been synced. The file is
// rewritten whole after every book so an aborted run keeps the books it
// completed.
use crate::context::AppContext;
use crate::model::SyncRecord;
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;

#[derive(Debug, Default)]
pub struct SyncCache {
    records: Vec<SyncRecord>,
}

impl SyncCache {
    /// Load the cache, treating a missing file as empty. A file that
    /// exists but does not parse is an error rather than a silent reset;
    /// resetting would re-push every highlight of every book.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_sync_cache_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read sync cache '{}'", path.display()))?;
        let records: Vec<SyncRecord> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse sync cache '{}'", path.display()))?;
        Ok(Self { records })
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_sync_cache_path()?;
        let json = serde_json::to_string_pretty(&self.records)?;
        LocalStorage::atomic_write(&path, json)?;
        Ok(())
    }

    /// Number of highlights already synced for a title, if any.
    pub fn highlight_count(&self, title: &str) -> Option<usize> {
        self.records
            .iter()
            .find(|r| r.title == title)
            .map(|r| r.highlight_count)
    }

    /// Record a successful push: the stored count grows by the number of
    /// highlights just pushed (NOT the export's current total, which may
    /// include highlights this run never touched).
    pub fn record_pushed(&mut self, title: &str, author: &str, pushed: usize) {
        let now = Some(Utc::now());
        match self.records.iter_mut().find(|r| r.title == title) {
            Some(record) => {
                record.highlight_count += pushed;
                record.synced_at = now;
            }
            None => self.records.push(SyncRecord {
                title: title.to_string(),
                author: author.to_string(),
                highlight_count: pushed,
                synced_at: now,
            }),
        }
    }

    pub fn records(&self) -> &[SyncRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_file_is_empty_cache() {
        let ctx = TestContext::new();
        let cache = SyncCache::load(&ctx).unwrap();
        assert!(cache.records().is_empty());
        assert_eq!(cache.highlight_count("Book A"), None);
    }

    #[test]
    fn test_record_then_reload() {
        let ctx = TestContext::new();
        let mut cache = SyncCache::load(&ctx).unwrap();
        cache.record_pushed("Book A", "Jane Doe", 3);
        cache.save(&ctx).unwrap();

        let reloaded = SyncCache::load(&ctx).unwrap();
        assert_eq!(reloaded.highlight_count("Book A"), Some(3));
        assert_eq!(reloaded.records()[0].author, "Jane Doe");
        assert!(reloaded.records()[0].synced_at.is_some());
    }

    #[test]
    fn test_push_accumulates_counts() {
        let ctx = TestContext::new();
        let mut cache = SyncCache::load(&ctx).unwrap();
        cache.record_pushed("Book A", "Jane Doe", 2);
        cache.record_pushed("Book A", "Jane Doe", 5);
        assert_eq!(cache.highlight_count("Book A"), Some(7));
    }

    #[test]
    fn test_legacy_records_without_synced_at_load() {
        let ctx = TestContext::new();
        let path = ctx.get_sync_cache_path().unwrap();
        std::fs::write(
            &path,
            r#"[{"title":"Book A","author":"Jane Doe","highlightCount":4}]"#,
        )
        .unwrap();

        let cache = SyncCache::load(&ctx).unwrap();
        assert_eq!(cache.highlight_count("Book A"), Some(4));
        assert_eq!(cache.records()[0].synced_at, None);
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let ctx = TestContext::new();
        let path = ctx.get_sync_cache_path().unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(SyncCache::load(&ctx).is_err());
    }
}

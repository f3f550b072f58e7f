// Local file IO: the clippings export on the way in, grouped books on the
// way out. All writes funnel through `atomic_write`.
//
// The tool is a manually-invoked, single-writer CLI; files are not locked.
use crate::context::AppContext;
use crate::model::GroupedBook;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub struct LocalStorage;

impl LocalStorage {
    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Read the raw clippings export. A missing or unreadable file is a
    /// hard error; the caller has nothing to do without it.
    pub fn read_clippings(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read clippings file '{}'", path.display()))
    }

    /// Write the grouped books as pretty JSON into the data directory so
    /// the parse result can be inspected independently of any sync.
    pub fn export_grouped(ctx: &dyn AppContext, books: &[GroupedBook]) -> Result<()> {
        let path = ctx.get_grouped_export_path()?;
        let json = serde_json::to_string_pretty(books)?;
        Self::atomic_write(&path, json)?;
        log::debug!("Wrote grouped export to {}", path.display());
        Ok(())
    }
}

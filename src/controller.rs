//! End-to-end run pipeline, UI-free.
//!
//! The binary delegates here: read the export, parse and merge, group,
//! write the grouped-books artifact, reconcile against the sync cache,
//! optionally decorate unsynced books with covers, and push. The
//! controller returns a `RunSummary` and leaves all console output to
//! the CLI layer; progress goes through `log`.

use crate::cache::SyncCache;
use crate::client::sync::push_books;
use crate::client::{CoverClient, NotionClient};
use crate::config::Config;
use crate::context::AppContext;
use crate::model::group::group_clippings;
use crate::model::parser::parse_clippings;
use crate::reconcile::unsynced_books;
use crate::storage::LocalStorage;
use anyhow::{Result, bail};
use std::path::PathBuf;

/// Per-run knobs the CLI collects from flags; everything else comes from
/// the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Clippings export path; overrides `config.clippings_file`.
    pub clippings_file: Option<PathBuf>,
    /// Force cover lookup on, regardless of the config.
    pub fetch_covers: bool,
    /// Parse and reconcile but never touch the workspace.
    pub dry_run: bool,
}

/// One book's place in the run, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookStat {
    pub title: String,
    pub author: String,
    pub highlights: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Every book parsed out of the export.
    pub parsed: Vec<BookStat>,
    /// Books with highlights the cache had not seen, sliced to the new part.
    pub unsynced: Vec<BookStat>,
    pub books_pushed: usize,
    pub highlights_pushed: usize,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn total_highlights(&self) -> usize {
        self.parsed.iter().map(|b| b.highlights).sum()
    }

    pub fn books_up_to_date(&self) -> usize {
        self.parsed.len() - self.unsynced.len()
    }
}

pub async fn run(ctx: &dyn AppContext, config: &Config, options: &RunOptions) -> Result<RunSummary> {
    let path = options
        .clippings_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.clippings_file));

    let text = LocalStorage::read_clippings(&path)?;
    let clippings = parse_clippings(&text);
    let books = group_clippings(clippings);
    log::info!("Parsed {} book(s) from {}", books.len(), path.display());

    LocalStorage::export_grouped(ctx, &books)?;

    let mut cache = SyncCache::load(ctx)?;
    let mut unsynced = unsynced_books(&books, &cache);

    let mut summary = RunSummary {
        parsed: books.iter().map(stat).collect(),
        unsynced: unsynced.iter().map(stat).collect(),
        dry_run: options.dry_run,
        ..Default::default()
    };

    if options.dry_run || unsynced.is_empty() {
        return Ok(summary);
    }

    if !config.has_notion_credentials() {
        bail!("notion_token and notion_database_id must be set in the config to sync");
    }

    if options.fetch_covers || config.fetch_covers {
        let covers = CoverClient::new(config.cover_candidates);
        for book in &mut unsynced {
            book.cover_url = covers.find_cover(&book.title, Some(&book.author)).await;
        }
    }

    let notion = NotionClient::new(&config.notion_token, &config.notion_database_id);
    let outcome = push_books(ctx, &notion, &unsynced, &mut cache).await?;

    summary.books_pushed = outcome.books;
    summary.highlights_pushed = outcome.highlights;
    Ok(summary)
}

fn stat(book: &crate::model::GroupedBook) -> BookStat {
    BookStat {
        title: book.title.clone(),
        author: book.author.clone(),
        highlights: book.highlights.len(),
    }
}

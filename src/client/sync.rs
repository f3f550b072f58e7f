// Pushes each book's unsynced highlights to the workspace.
//
// Books are processed strictly one at a time. The sync cache is rewritten
// after every completed book, so a failure mid-run keeps everything that
// already went through; the failed book and the ones after it are retried
// wholesale on the next invocation.
//
// Pagination works against the WEIGHTED block count (quotes weigh two,
// notes one), not the highlight count: the chunk loop advances a highlight
// index by thirty while the index is below the weighted count, so with
// heavily-noted books the tail appends can carry empty block lists. The
// append-call count `ceil((N - 30) / 30)` after a creation depends on
// exactly this, so it is contract, not accident.

use crate::cache::SyncCache;
use crate::client::blocks::{count_quote_note_blocks, make_blocks};
use crate::client::notion::NotionClient;
use crate::context::AppContext;
use crate::model::{GroupedBook, Highlight};
use anyhow::{Result, bail};

/// Weighted block count above which a book is pushed in chunks.
pub const SINGLE_CALL_LIMIT: usize = 100;
/// Highlights per chunked call; 30 highlights render to at most 90 blocks,
/// safely under the API's ~100-blocks-per-call cap.
pub const CHUNK_HIGHLIGHTS: usize = 30;

/// What one run pushed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub books: usize,
    pub highlights: usize,
}

/// Slice of up to `CHUNK_HIGHLIGHTS` highlights starting at `index`,
/// empty once `index` runs past the end.
fn chunk_at(highlights: &[Highlight], index: usize) -> &[Highlight] {
    let start = index.min(highlights.len());
    let end = (index + CHUNK_HIGHLIGHTS).min(highlights.len());
    &highlights[start..end]
}

/// Push every book in order, updating and persisting the sync cache after
/// each one. Any workspace failure propagates immediately.
pub async fn push_books(
    ctx: &dyn AppContext,
    notion: &NotionClient,
    books: &[GroupedBook],
    cache: &mut SyncCache,
) -> Result<PushOutcome> {
    let mut outcome = PushOutcome::default();

    for book in books {
        log::info!("Syncing book: {}", book.title);
        push_book(notion, book).await?;

        cache.record_pushed(&book.title, &book.author, book.highlights.len());
        cache.save(ctx)?;

        outcome.books += 1;
        outcome.highlights += book.highlights.len();
    }

    Ok(outcome)
}

async fn push_book(notion: &NotionClient, book: &GroupedBook) -> Result<()> {
    let weighted = count_quote_note_blocks(&book.highlights);
    log::debug!("Page will have {} weighted block(s)", weighted);

    match notion.query_page_id(&book.title).await? {
        Some(page_id) => append_to_existing(notion, book, &page_id, weighted).await,
        None => create_new(notion, book, weighted).await,
    }
}

/// The book already has a page: append everything, chunked when the
/// weighted count exceeds the single-call limit. The page id resolved
/// up front stays valid for every chunk.
async fn append_to_existing(
    notion: &NotionClient,
    book: &GroupedBook,
    page_id: &str,
    weighted: usize,
) -> Result<()> {
    log::info!("Book already present, appending highlights");

    if weighted <= SINGLE_CALL_LIMIT {
        return notion.append_blocks(page_id, make_blocks(&book.highlights)).await;
    }

    let mut tracker = 0;
    while tracker < weighted {
        notion
            .append_blocks(page_id, make_blocks(chunk_at(&book.highlights, tracker)))
            .await?;
        tracker += CHUNK_HIGHLIGHTS;
    }
    Ok(())
}

/// No page yet: create one carrying the first chunk (or everything when it
/// fits), then append the rest. The page id is re-resolved by title before
/// each follow-up append; the creation call is keyed by the database, so
/// the id is treated as an external lookup rather than a cached value.
async fn create_new(notion: &NotionClient, book: &GroupedBook, weighted: usize) -> Result<()> {
    log::info!("Book not present, creating a page");
    let total = book.highlights.len();

    if weighted <= SINGLE_CALL_LIMIT {
        return notion
            .create_page(book, make_blocks(&book.highlights), total)
            .await;
    }

    log::info!("Chunked creation: {} weighted blocks", weighted);
    notion
        .create_page(book, make_blocks(chunk_at(&book.highlights, 0)), total)
        .await?;

    let mut tracker = CHUNK_HIGHLIGHTS;
    while tracker < weighted {
        let Some(page_id) = notion.query_page_id(&book.title).await? else {
            bail!(
                "Page for '{}' vanished between creation and append",
                book.title
            );
        };
        notion
            .append_blocks(&page_id, make_blocks(chunk_at(&book.highlights, tracker)))
            .await?;
        tracker += CHUNK_HIGHLIGHTS;
    }
    Ok(())
}

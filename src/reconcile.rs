// Decides what still needs pushing by diffing grouped books against the
// sync cache.
//
// Highlights are append-only per book in the export, so the cache only
// stores how many highlights of each book have been synced; everything
// past that index is new. Reordered or edited exports are out of scope.

use crate::cache::SyncCache;
use crate::model::GroupedBook;

/// Books with highlights the cache has not seen, each sliced down to its
/// unsynced suffix. Books already up to date are omitted entirely.
pub fn unsynced_books(books: &[GroupedBook], cache: &SyncCache) -> Vec<GroupedBook> {
    books
        .iter()
        .filter_map(|book| {
            let synced = cache.highlight_count(&book.title).unwrap_or(0);
            // Covers the weird case of a cache count beyond the current
            // export as well; never slice out of bounds.
            if synced >= book.highlights.len() {
                return None;
            }
            Some(GroupedBook {
                title: book.title.clone(),
                author: book.author.clone(),
                highlights: book.highlights[synced..].to_vec(),
                cover_url: book.cover_url.clone(),
            })
        })
        .collect()
}

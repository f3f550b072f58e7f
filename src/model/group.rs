// Folds merged clippings into per-book groups.

use crate::model::item::{Clipping, GroupedBook};

/// Group clippings by exact title. Books appear in the order their first
/// clipping appeared, that first clipping also fixes the author, and
/// highlights keep encounter order. No deduplication happens here; the
/// merge buffer already did all the joining there is to do.
pub fn group_clippings(clippings: Vec<Clipping>) -> Vec<GroupedBook> {
    let mut books: Vec<GroupedBook> = Vec::new();

    for clipping in clippings {
        match books.iter_mut().find(|b| b.title == clipping.title) {
            Some(book) => book.highlights.push(clipping.into()),
            None => books.push(GroupedBook {
                title: clipping.title.clone(),
                author: clipping.author.clone(),
                highlights: vec![clipping.into()],
                cover_url: None,
            }),
        }
    }

    books
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clipping(title: &str, author: &str, quote: &str, location: &str) -> Clipping {
        Clipping {
            title: title.to_string(),
            author: author.to_string(),
            quote: quote.to_string(),
            note: String::new(),
            location: location.to_string(),
        }
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let clippings = vec![
            clipping("Book A", "Jane Doe", "a1", "1"),
            clipping("Book B", "John Smith", "b1", "2"),
            clipping("Book A", "Jane Doe", "a2", "3"),
        ];

        let books = group_clippings(clippings);
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "Book A");
        assert_eq!(books[0].highlights.len(), 2);
        assert_eq!(books[0].highlights[0].quote, "a1");
        assert_eq!(books[0].highlights[1].quote, "a2");
        assert_eq!(books[1].title, "Book B");
    }

    #[test]
    fn test_first_author_wins() {
        // Same title exported with differing author spellings: the first
        // one seen names the book.
        let clippings = vec![
            clipping("Book A", "Jane Doe", "a1", "1"),
            clipping("Book A", "J. Doe", "a2", "2"),
        ];

        let books = group_clippings(clippings);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author, "Jane Doe");
        assert_eq!(books[0].highlights.len(), 2);
    }
}

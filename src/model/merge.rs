// Pairs up split quote/note clippings as they stream out of the parser.
//
// A note taken on a highlighted passage arrives as its own chunk in the
// export, with its own location. The buffer joins it to the highlight by
// book identity plus overlapping location, so one merged clipping carries
// both the quote and the note.

use crate::model::item::Clipping;
use crate::model::matcher::locations_overlap;

/// Ordered merge buffer. Deliberately a plain vector with a forward scan:
/// when several buffered clippings could pair with an incoming one, the
/// earliest wins, and that tie-break is observable in the output order.
#[derive(Debug, Default)]
pub struct MergeBuffer {
    clippings: Vec<Clipping>,
}

impl MergeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clippings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clippings.is_empty()
    }

    /// Index of the first clipping of the same book with an overlapping
    /// location and a non-empty complementary field.
    fn find_counterpart(
        &self,
        title: &str,
        author: &str,
        location: &str,
        want_quote: bool,
    ) -> Option<usize> {
        self.clippings.iter().position(|c| {
            c.author == author
                && c.title == title
                && locations_overlap(&c.location, location)
                && if want_quote { c.has_quote() } else { c.has_note() }
        })
    }

    /// Add a highlight. If a noted clipping for the same passage is already
    /// buffered, the quote joins it (replacing any earlier quote text and
    /// the stored location); otherwise a new clipping is appended with an
    /// empty note.
    pub fn add_quote(&mut self, title: String, author: String, quote: String, location: String) {
        match self.find_counterpart(&title, &author, &location, false) {
            Some(i) => {
                let note = std::mem::take(&mut self.clippings[i].note);
                self.clippings[i] = Clipping {
                    title,
                    author,
                    quote,
                    note,
                    location,
                };
            }
            None => self.clippings.push(Clipping {
                title,
                author,
                quote,
                note: String::new(),
                location,
            }),
        }
    }

    /// Add a note. If a quoted clipping for the same passage is already
    /// buffered, the note joins it; otherwise a new clipping is appended
    /// with an empty quote.
    pub fn add_note(&mut self, title: String, author: String, note: String, location: String) {
        match self.find_counterpart(&title, &author, &location, true) {
            Some(i) => {
                let quote = std::mem::take(&mut self.clippings[i].quote);
                self.clippings[i] = Clipping {
                    title,
                    author,
                    quote,
                    note,
                    location,
                };
            }
            None => self.clippings.push(Clipping {
                title,
                author,
                quote: String::new(),
                note,
                location,
            }),
        }
    }

    pub fn into_clippings(self) -> Vec<Clipping> {
        self.clippings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(buf: &mut MergeBuffer, title: &str, quote: &str, location: &str) {
        buf.add_quote(
            title.to_string(),
            "Jane Doe".to_string(),
            quote.to_string(),
            location.to_string(),
        );
    }

    fn note(buf: &mut MergeBuffer, title: &str, note: &str, location: &str) {
        buf.add_note(
            title.to_string(),
            "Jane Doe".to_string(),
            note.to_string(),
            location.to_string(),
        );
    }

    #[test]
    fn test_quote_then_note_merges() {
        let mut buf = MergeBuffer::new();
        quote(&mut buf, "Book A", "Great quote", "120-123");
        note(&mut buf, "Book A", "My note", "122");

        let merged = buf.into_clippings();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quote, "Great quote");
        assert_eq!(merged[0].note, "My note");
        // The merge rebuilt the record from the incoming note.
        assert_eq!(merged[0].location, "122");
    }

    #[test]
    fn test_note_then_quote_converges_identically() {
        let mut a = MergeBuffer::new();
        quote(&mut a, "Book A", "Great quote", "10");
        note(&mut a, "Book A", "My note", "10");

        let mut b = MergeBuffer::new();
        note(&mut b, "Book A", "My note", "10");
        quote(&mut b, "Book A", "Great quote", "10");

        assert_eq!(a.into_clippings(), b.into_clippings());
    }

    #[test]
    fn test_non_overlapping_locations_do_not_merge() {
        let mut buf = MergeBuffer::new();
        quote(&mut buf, "Book A", "Great quote", "120-123");
        note(&mut buf, "Book A", "Unrelated note", "200");

        let merged = buf.into_clippings();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].note, "");
        assert_eq!(merged[1].quote, "");
    }

    #[test]
    fn test_same_location_different_book_does_not_merge() {
        let mut buf = MergeBuffer::new();
        quote(&mut buf, "Book A", "Great quote", "10");
        note(&mut buf, "Book B", "My note", "10");
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_note_overwrite_is_last_write_wins() {
        let mut buf = MergeBuffer::new();
        quote(&mut buf, "Book A", "Great quote", "10");
        note(&mut buf, "Book A", "first thought", "10");
        note(&mut buf, "Book A", "second thought", "10");

        let merged = buf.into_clippings();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].note, "second thought");
    }

    #[test]
    fn test_first_match_wins_on_duplicate_quotes() {
        let mut buf = MergeBuffer::new();
        // Two bare quotes at the same spot stay separate (neither carries
        // a note for the other to join).
        quote(&mut buf, "Book A", "first copy", "10");
        quote(&mut buf, "Book A", "second copy", "10");
        assert_eq!(buf.len(), 2);

        // A note then attaches to the earliest quote-bearing clipping.
        note(&mut buf, "Book A", "My note", "10");
        let merged = buf.into_clippings();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].quote, "first copy");
        assert_eq!(merged[0].note, "My note");
        assert_eq!(merged[1].note, "");
    }

    #[test]
    fn test_empty_locations_never_pair() {
        let mut buf = MergeBuffer::new();
        quote(&mut buf, "Book A", "Great quote", "");
        note(&mut buf, "Book A", "My note", "");
        assert_eq!(buf.len(), 2);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single clipping: one passage of one book, carrying the highlighted
/// quote and/or the reader's note, plus the textual location ("10",
/// "120-123", possibly empty) exactly as it appeared in the export.
///
/// An empty string means the field is absent; a freshly parsed clipping
/// has exactly one of `quote`/`note` set, and the merge buffer fills in
/// the other half when a matching clipping arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipping {
    pub title: String,
    pub author: String,
    pub quote: String,
    pub note: String,
    pub location: String,
}

impl Clipping {
    pub fn has_quote(&self) -> bool {
        !self.quote.is_empty()
    }

    pub fn has_note(&self) -> bool {
        !self.note.is_empty()
    }
}

/// One highlight of a grouped book (a `Clipping` minus the book identity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub quote: String,
    pub note: String,
    pub location: String,
}

impl Highlight {
    pub fn has_quote(&self) -> bool {
        !self.quote.is_empty()
    }

    pub fn has_note(&self) -> bool {
        !self.note.is_empty()
    }
}

impl From<Clipping> for Highlight {
    fn from(c: Clipping) -> Self {
        Self {
            quote: c.quote,
            note: c.note,
            location: c.location,
        }
    }
}

/// All clippings of one book, in export order. The author is whoever the
/// first clipping for the title named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedBook {
    pub title: String,
    pub author: String,
    pub highlights: Vec<Highlight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

/// Persisted per-book sync state. JSON field names (camelCase) match the
/// historical cache format; `syncedAt` is newer and optional so old cache
/// files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    pub title: String,
    pub author: String,
    pub highlight_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

// Parses a "My Clippings.txt" export into merged clippings.
//
// The export is a flat sequence of chunks separated by `==========` lines.
// Each chunk is four lines: a `Title (Author)` header, a marker line naming
// the chunk kind plus its metadata (page, location, timestamp), a blank
// line, and the body. Devices localize the marker, write CRLF endings,
// and occasionally inject BOM characters, so the grammar is deliberately
// loose. Chunks that fit neither alternative are dropped.
//
// Each parsed record is fed straight into a `MergeBuffer`, so split
// quote/note pairs are joined during the same pass.

use crate::model::item::Clipping;
use crate::model::merge::MergeBuffer;
use once_cell::sync::Lazy;
use regex::Regex;

/// One grammar, two alternatives: groups 1-4 are a highlight (title,
/// author, metadata, quote body), groups 5-8 a note (title, author,
/// metadata, note body).
static CLIPPING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([^\r\n]+) \(([^\r\n]+)\)\r*\n- (?:Your Highlight|La subrayado)([^\r\n]+)\r*\n\r*\n([^\r\n]+)|([^\r\n]+) \(([^\r\n]+)\)\r*\n- Your Note([^\r\n]+)\r*\n\r*\n([^\r\n]+)",
    )
    .unwrap()
});

/// Chunk separator: a run of `=` characters ending a line.
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"=+\r*\n").unwrap());

/// Location patterns tried in order against the marker-line metadata.
/// `Location` wins over `page` when both are present.
static LOCATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"Location (\d+(?:-\d+)?)").unwrap());
static PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"page (\d+(?:-\d+)?)").unwrap());

/// Parse a whole export and return the merged clippings in encounter order.
pub fn parse_clippings(text: &str) -> Vec<Clipping> {
    let clean = text.replace('\u{FEFF}', "");
    let chunks: Vec<&str> = SEPARATOR.split(&clean).collect();

    let mut buffer = MergeBuffer::new();
    let mut skipped = 0usize;

    // The final segment is whatever trails the last separator; a complete
    // export leaves it empty and a truncated one leaves garbage there.
    // Either way it is not a record.
    for chunk in &chunks[..chunks.len().saturating_sub(1)] {
        match CLIPPING.captures(chunk) {
            Some(caps) if caps.get(1).is_some() => {
                let metadata = caps.get(3).map_or("", |m| m.as_str());
                buffer.add_quote(
                    caps[1].to_string(),
                    format_author_name(&caps[2]),
                    caps[4].to_string(),
                    extract_location(metadata),
                );
            }
            Some(caps) if caps.get(5).is_some() => {
                let metadata = caps.get(7).map_or("", |m| m.as_str());
                buffer.add_note(
                    caps[5].to_string(),
                    format_author_name(&caps[6]),
                    caps[8].to_string(),
                    extract_location(metadata),
                );
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {} chunk(s) that matched no clipping shape", skipped);
    }

    let clippings = buffer.into_clippings();
    log::debug!("Parsed {} merged clipping(s)", clippings.len());
    clippings
}

/// Devices export authors as "Last, First"; swap the halves around the
/// first comma. Authors without a comma pass through trimmed.
pub fn format_author_name(raw: &str) -> String {
    match raw.split_once(',') {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => raw.trim().to_string(),
    }
}

/// Pull the location out of a marker-line metadata blob, e.g.
/// `" on page 10 | Location 120-123 | Added on Friday, ..."` -> "120-123".
/// Missing both patterns yields an empty string, never an error.
fn extract_location(metadata: &str) -> String {
    for re in [&LOCATION, &PAGE] {
        if let Some(caps) = re.captures(metadata) {
            return caps[1].to_string();
        }
    }
    String::new()
}

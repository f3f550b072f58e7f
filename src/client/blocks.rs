// Renders highlights into the workspace's paragraph-block wire format.
//
// Every highlight becomes a quote block ("<quote> (Location <loc>)"),
// an optional bold-prefixed note block, and a blank spacer block. The
// remote API caps rich-text content at 2000 characters per span and
// roughly 100 blocks per call; the constants and arithmetic here are the
// paginator's contract with those caps.

use crate::model::Highlight;
use serde::Serialize;

/// Hard cap on a rich-text span imposed by the API.
pub const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub object: &'static str,
    #[serde(rename = "type")]
    pub block_type: &'static str,
    pub paragraph: Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichText {
    #[serde(rename = "type")]
    pub span_type: &'static str,
    pub text: TextContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    pub content: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Annotations {
    pub bold: bool,
}

fn text_span(content: String) -> RichText {
    RichText {
        span_type: "text",
        text: TextContent {
            content,
            link: None,
        },
        annotations: None,
    }
}

fn bold_span(content: String) -> RichText {
    RichText {
        annotations: Some(Annotations { bold: true }),
        ..text_span(content)
    }
}

fn paragraph(rich_text: Vec<RichText>) -> Block {
    Block {
        object: "block",
        block_type: "paragraph",
        paragraph: Paragraph { rich_text },
    }
}

/// Combine quote and location into one span, truncating the quote so the
/// result fits the span cap. The " (Location ...)" suffix survives intact;
/// only quote text is dropped, with trailing whitespace trimmed off the
/// cut.
pub fn truncate_quote_if_needed(quote: &str, location: &str) -> String {
    let content = format!("{} (Location {})", quote, location);

    if content.chars().count() > MAX_CONTENT_CHARS {
        let suffix_len = format!("(Location {})", location).chars().count();
        let max_length = MAX_CONTENT_CHARS.saturating_sub(suffix_len);
        let truncated: String = quote.chars().take(max_length.saturating_sub(1)).collect();
        return format!("{} (Location {})", truncated.trim(), location);
    }

    content
}

/// Paragraph block carrying the quote and its location.
pub fn format_highlight_block(quote: &str, location: &str) -> Block {
    paragraph(vec![text_span(truncate_quote_if_needed(quote, location))])
}

/// Paragraph block carrying the reader's note behind a bold "Note: ".
pub fn format_note_block(note: &str) -> Block {
    paragraph(vec![bold_span("Note: ".to_string()), text_span(note.to_string())])
}

/// Render a run of highlights: per highlight a quote block, a note block
/// when a note exists, and a blank spacer block.
pub fn make_blocks(highlights: &[Highlight]) -> Vec<Block> {
    let mut blocks = Vec::new();

    for highlight in highlights {
        blocks.push(format_highlight_block(&highlight.quote, &highlight.location));
        if highlight.has_note() {
            blocks.push(format_note_block(&highlight.note));
        }
        blocks.push(paragraph(vec![text_span(String::new())]));
    }

    blocks
}

/// Weighted block count the pagination policy works against: quotes weigh
/// two (quote block plus spacer), notes one. This is the historical
/// metric, not an exact count of rendered blocks.
pub fn count_quote_note_blocks(highlights: &[Highlight]) -> usize {
    let quotes = highlights.iter().filter(|h| h.has_quote()).count();
    let notes = highlights.iter().filter(|h| h.has_note()).count();
    quotes * 2 + notes
}

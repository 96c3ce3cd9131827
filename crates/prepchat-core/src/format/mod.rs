//! Structural formatting of completed assistant messages.
//!
//! An interview answer uses a small set of conventions: bold section
//! headers, numbered/bulleted tip lists, and inline score annotations.
//! [`format_message`] converts one finished message into an ordered
//! sequence of [`ContentBlock`]s for the rendering layer. Formatting never
//! runs on partial streaming text; the chat view shows that verbatim.
//!
//! All message-derived text is HTML-escaped before any markup is added, so
//! model output can never inject active markup. The only markup introduced
//! here is the `<strong>` substitution for `**…**` spans.

mod builder;
mod classifier;

pub use builder::{BlockBuilder, ContentBlock, ListItem};
pub use classifier::{LineKind, classify, score_percentage};

/// Formats one complete message into ordered content blocks.
///
/// Empty input yields an empty sequence. Blank lines emit nothing but
/// terminate any open list run.
pub fn format_message(content: &str) -> Vec<ContentBlock> {
    let lines: Vec<&str> = content.lines().collect();
    let mut builder = BlockBuilder::new();

    for (index, raw) in lines.iter().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            builder.flush_list();
            continue;
        }

        // Score classification may need the next non-empty line as context.
        let next_nonempty = lines[index + 1..]
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty());

        if let Some(kind) = classify(trimmed, next_nonempty) {
            builder.push(kind);
        }
    }

    builder.finish()
}

/// Escapes the five markup-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

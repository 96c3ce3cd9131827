//! Terminal rendering of content blocks.
//!
//! Maps each block tag to a plain-text visual: headers get a rule, list
//! items get positional numbering, scores get a gauge. Block HTML is
//! unescaped here because the terminal interprets no markup.

use prepchat_core::format::ContentBlock;

const GAUGE_WIDTH: usize = 10;

/// Renders an ordered block sequence for the terminal.
pub fn render_blocks(blocks: &[ContentBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            ContentBlock::Header { title } => {
                out.push_str(&format!("== {title} ==\n"));
            }
            ContentBlock::Paragraph { html } => {
                out.push_str(&html_to_text(html));
                out.push('\n');
            }
            ContentBlock::List { items } => {
                for (index, item) in items.iter().enumerate() {
                    let body = html_to_text(&item.body_html);
                    match &item.title_html {
                        Some(title) => out.push_str(&format!(
                            "  {}. {}: {}\n",
                            index + 1,
                            html_to_text(title),
                            body
                        )),
                        None => out.push_str(&format!("  {}. {}\n", index + 1, body)),
                    }
                }
            }
            ContentBlock::Score { label, percentage } => {
                out.push_str(&format!(
                    "Score: {label}  {} {percentage:.0}%\n",
                    gauge(*percentage)
                ));
            }
        }
    }
    out
}

fn gauge(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    let filled = filled.min(GAUGE_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(GAUGE_WIDTH - filled))
}

/// Strips the `<strong>` markup and unescapes entities for plain display.
fn html_to_text(html: &str) -> String {
    html.replace("<strong>", "")
        .replace("</strong>", "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

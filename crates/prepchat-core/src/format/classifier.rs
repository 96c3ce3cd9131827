use std::sync::LazyLock;

use regex::Regex;

use super::escape_html;

/// Fallback percentage when a score cannot be derived from its label.
const DEFAULT_SCORE_PERCENT: f64 = 85.0;

/// Label used when a bare `Score` header has no grade or fraction nearby.
const DEFAULT_SCORE_LABEL: &str = "Excellent";

/// `Score: X/Y` or `Score X/Y`, optionally bold-wrapped.
static INLINE_SCORE_FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\*\*)?Score(?:\s*:\s*|\s+)(\d+(?:\.\d+)?\s*/\s*\d+)(?:\*\*)?")
        .expect("valid regex")
});

/// `Answer: <Grade>`, optionally bold-wrapped.
static INLINE_ANSWER_GRADE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\*\*)?Answer\s*:\s*(Excellent|Good|Average|Poor|Outstanding)(?:\*\*)?")
        .expect("valid regex")
});

/// A line that is nothing but `Score`, optionally bold-wrapped.
static BARE_SCORE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\*\*)?Score(\*\*)?$").expect("valid regex"));

/// A line opening with the word `Score` or `Answer`.
static SCORE_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(Score|Answer)\b").expect("valid regex"));

/// A grade word anywhere in a line.
static GRADE_ANYWHERE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(Excellent|Good|Average|Poor|Outstanding)").expect("valid regex")
});

/// A grade word leading a line.
static GRADE_LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Excellent|Good|Average|Poor|Outstanding)\b").expect("valid regex")
});

/// An `X/Y` fraction anywhere in a line.
static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?\s*/\s*\d+)").expect("valid regex"));

/// `**Title:**` as the whole line.
static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*(.*?):\*\*$").expect("valid regex"));

/// `<digits>. <rest>`.
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").expect("valid regex"));

/// A numbered marker with no body (`3.foo`, `7.`); such lines are dropped.
static NUMBERED_STUB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").expect("valid regex"));

/// `**Title:** description` at the start of a list item body.
static ITEM_BOLD_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*(.*?):\*\*\s*(.*)$").expect("valid regex"));

/// `*` or `-` bullet marker followed by whitespace.
static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[*-]\s+(.*)$").expect("valid regex"));

/// A `**…**` bold span.
static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

/// Structural role of one non-empty, trimmed message line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Score annotation; percentage derives from the label.
    Score { label: String },
    /// Bold section title, colon excluded.
    Header { title: String },
    /// Numbered list item, with an optional bold title.
    NumberedItem {
        title: Option<String>,
        body: String,
    },
    /// Bulleted list item.
    BulletItem { body: String },
    /// Text with inline bold spans, already converted to inert HTML.
    BoldText { html: String },
    /// None of the above.
    Plain { text: String },
}

/// Classifies one trimmed, non-empty line.
///
/// Rules are evaluated in fixed priority order; the first match wins.
/// `next_nonempty` is the following non-empty line, used only when a score
/// line carries no inline grade or fraction. Returns `None` for the one
/// line shape that produces nothing: a numbered marker without a body.
pub fn classify(line: &str, next_nonempty: Option<&str>) -> Option<LineKind> {
    if let Some(label) = score_label(line, next_nonempty) {
        return Some(LineKind::Score { label });
    }

    if let Some(caps) = SECTION_HEADER.captures(line) {
        return Some(LineKind::Header {
            title: caps[1].to_string(),
        });
    }

    if let Some(caps) = NUMBERED_ITEM.captures(line) {
        let rest = &caps[2];
        return Some(match ITEM_BOLD_TITLE.captures(rest) {
            Some(title_caps) => LineKind::NumberedItem {
                title: Some(title_caps[1].to_string()),
                body: title_caps[2].to_string(),
            },
            None => LineKind::NumberedItem {
                title: None,
                body: rest.to_string(),
            },
        });
    }

    if let Some(caps) = BULLET_ITEM.captures(line) {
        return Some(LineKind::BulletItem {
            body: caps[1].to_string(),
        });
    }

    if BOLD_SPAN.is_match(line) {
        return Some(LineKind::BoldText {
            html: bold_spans_to_html(line),
        });
    }

    if NUMBERED_STUB.is_match(line) {
        return None;
    }

    Some(LineKind::Plain {
        text: line.to_string(),
    })
}

/// Extracts the score label, if this line is a score line at all.
///
/// Extraction precedence: inline `Score` fraction, inline `Answer` grade,
/// same-line grade, same-line fraction, leading grade on the next line,
/// fraction on the next line, then the default label.
fn score_label(line: &str, next_nonempty: Option<&str>) -> Option<String> {
    if let Some(caps) = INLINE_SCORE_FRACTION.captures(line) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = INLINE_ANSWER_GRADE.captures(line) {
        return Some(caps[1].to_string());
    }

    if !BARE_SCORE_HEADER.is_match(line) && !SCORE_OPENER.is_match(line) {
        return None;
    }

    if let Some(caps) = GRADE_ANYWHERE.captures(line) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = FRACTION.captures(line) {
        return Some(caps[1].to_string());
    }
    if let Some(next) = next_nonempty {
        if let Some(caps) = GRADE_LEADING.captures(next) {
            return Some(caps[1].to_string());
        }
        if let Some(caps) = FRACTION.captures(next) {
            return Some(caps[1].to_string());
        }
    }
    Some(DEFAULT_SCORE_LABEL.to_string())
}

/// Derives the completion percentage for a score label, clamped to [0, 100].
///
/// `X/Y` labels compute `X / Y * 100`; an unparsable fraction or a zero
/// denominator falls back to the default. Grade words use fixed buckets.
pub fn score_percentage(label: &str) -> f64 {
    if label.contains('/') {
        let mut parts = label.splitn(2, '/');
        let numerator = parse_number(parts.next().unwrap_or_default());
        let denominator = parse_number(parts.next().unwrap_or_default());
        return match (numerator, denominator) {
            (Some(num), Some(den)) if den > 0.0 => (num / den * 100.0).clamp(0.0, 100.0),
            _ => DEFAULT_SCORE_PERCENT,
        };
    }

    let grade = label.to_lowercase();
    if grade.contains("outstanding") || grade.contains("excellent") {
        90.0
    } else if grade.contains("good") {
        75.0
    } else if grade.contains("average") {
        60.0
    } else if grade.contains("poor") {
        40.0
    } else {
        DEFAULT_SCORE_PERCENT
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    stripped.parse().ok()
}

/// Converts `**…**` spans to `<strong>` markup, escaping everything else.
fn bold_spans_to_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in BOLD_SPAN.captures_iter(text) {
        let span = caps.get(0).expect("whole match");
        out.push_str(&escape_html(&text[last..span.start()]));
        out.push_str("<strong>");
        out.push_str(&escape_html(caps.get(1).map_or("", |g| g.as_str())));
        out.push_str("</strong>");
        last = span.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

use super::classifier::{LineKind, score_percentage};
use super::escape_html;

/// One structurally classified unit of a finished message.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Plain or inline-bold-formatted text, as inert HTML.
    Paragraph { html: String },
    /// Section title line.
    Header { title: String },
    /// One or more consecutive list lines, rendered as a single group.
    List { items: Vec<ListItem> },
    /// Score annotation; `percentage` is always within [0, 100].
    Score { label: String, percentage: f64 },
}

/// One entry of a [`ContentBlock::List`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub title_html: Option<String>,
    pub body_html: String,
}

enum BuilderState {
    Idle,
    AccumulatingList(Vec<ListItem>),
}

/// Single-pass accumulator over classified lines.
///
/// Consecutive list items (numbered and bulleted alike) merge into one
/// open accumulator; any non-list line, or a blank line via
/// [`flush_list`](Self::flush_list), closes it. Emitted blocks are never
/// revisited. One builder serves one formatting invocation.
pub struct BlockBuilder {
    state: BuilderState,
    blocks: Vec<ContentBlock>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            state: BuilderState::Idle,
            blocks: Vec::new(),
        }
    }

    /// Consumes one classified line.
    pub fn push(&mut self, kind: LineKind) {
        match kind {
            LineKind::NumberedItem { title, body } => self.push_item(ListItem {
                title_html: title.map(|t| escape_html(&t)),
                body_html: escape_html(&body),
            }),
            LineKind::BulletItem { body } => self.push_item(ListItem {
                title_html: None,
                body_html: escape_html(&body),
            }),
            LineKind::Score { label } => {
                self.flush_list();
                let percentage = score_percentage(&label);
                self.blocks.push(ContentBlock::Score { label, percentage });
            }
            LineKind::Header { title } => {
                self.flush_list();
                self.blocks.push(ContentBlock::Header { title });
            }
            LineKind::BoldText { html } => {
                self.flush_list();
                self.blocks.push(ContentBlock::Paragraph { html });
            }
            LineKind::Plain { text } => {
                self.flush_list();
                self.blocks.push(ContentBlock::Paragraph {
                    html: escape_html(&text),
                });
            }
        }
    }

    /// Closes the open list run, if any. Blank source lines call this
    /// without emitting a block of their own.
    pub fn flush_list(&mut self) {
        if let BuilderState::AccumulatingList(items) =
            std::mem::replace(&mut self.state, BuilderState::Idle)
        {
            // Only reachable with at least one accumulated item.
            self.blocks.push(ContentBlock::List { items });
        }
    }

    /// Flushes any open list and returns the ordered block sequence.
    pub fn finish(mut self) -> Vec<ContentBlock> {
        self.flush_list();
        self.blocks
    }

    fn push_item(&mut self, item: ListItem) {
        match &mut self.state {
            BuilderState::AccumulatingList(items) => items.push(item),
            BuilderState::Idle => {
                self.state = BuilderState::AccumulatingList(vec![item]);
            }
        }
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

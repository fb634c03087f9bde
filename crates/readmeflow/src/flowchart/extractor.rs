//! Structure extraction
//!
//! Walks the `pulldown-cmark` event stream once and classifies each block
//! by kind. Headings, list items and code blocks become records as they are
//! met; top-level paragraphs are held back and only promoted to depth-2
//! pseudo-headings when the document turns out to have no headings at all.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use tracing::{debug, span, trace, Level};

use super::text::{split_emoji, strip_completion, truncate_label};
use crate::core::{CodeBlock, FlowchartConfig, Heading, ListItem, StructuralRecord, Structure};

/// Markdown structure extractor
#[derive(Debug, Clone, Default)]
pub struct StructureExtractor {
    config: FlowchartConfig,
}

impl StructureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FlowchartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlowchartConfig {
        &self.config
    }

    /// Extract the structural records of `markdown`
    ///
    /// Never fails: unrecognized constructs are ignored and the worst case is
    /// an empty [`Structure`].
    pub fn extract(&self, markdown: &str) -> Structure {
        let extract_span = span!(Level::DEBUG, "extract_structure", input_len = markdown.len());
        let _enter = extract_span.enter();

        let mut walk = Walk::new(&self.config);
        for event in Parser::new_ext(markdown, Options::empty()) {
            walk.event(event);
        }
        let structure = walk.finish();

        debug!(
            headings = structure.headings().count(),
            list_items = structure.list_items().count(),
            code_blocks = structure.code_blocks().count(),
            "Structure extracted"
        );
        structure
    }
}

/// Extract with the default configuration
pub fn extract_structure(markdown: &str) -> Structure {
    StructureExtractor::new().extract(markdown)
}

/// Inline text being gathered for a heading or a top-level paragraph
enum Capture {
    Heading { depth: u8, text: String },
    Paragraph { position: usize, text: String },
}

struct CodeCapture {
    lang: String,
    value: String,
}

/// An open list item
///
/// Only text before the item's first nested block, or inside its first
/// paragraph, belongs to the item.
struct ItemFrame {
    index: usize,
    text: String,
    open_blocks: usize,
    in_first_paragraph: bool,
    done: bool,
}

impl ItemFrame {
    fn accepts_text(&self) -> bool {
        !self.done && (self.open_blocks == 0 || self.in_first_paragraph)
    }

    fn block_start(&mut self, is_paragraph: bool) {
        if self.open_blocks == 0 && !self.done {
            if is_paragraph {
                self.in_first_paragraph = true;
            } else {
                self.done = true;
            }
        }
        self.open_blocks += 1;
    }

    fn block_end(&mut self) {
        self.open_blocks = self.open_blocks.saturating_sub(1);
        if self.open_blocks == 0 && self.in_first_paragraph {
            self.in_first_paragraph = false;
            self.done = true;
        }
    }
}

/// Per-call extraction state; ids restart at 1 for every document
struct Walk<'c> {
    config: &'c FlowchartConfig,
    records: Vec<StructuralRecord>,
    paragraphs: Vec<(usize, String)>,
    heading_count: usize,
    list_count: usize,
    code_count: usize,
    current_heading: Option<String>,
    nesting: usize,
    link_depth: usize,
    capture: Option<Capture>,
    code: Option<CodeCapture>,
    items: Vec<ItemFrame>,
}

impl<'c> Walk<'c> {
    fn new(config: &'c FlowchartConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            paragraphs: Vec::new(),
            heading_count: 0,
            list_count: 0,
            code_count: 0,
            current_heading: None,
            nesting: 0,
            link_depth: 0,
            capture: None,
            code: None,
            items: Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                self.start(tag);
                self.nesting += 1;
            }
            Event::End(tag) => {
                self.nesting = self.nesting.saturating_sub(1);
                self.end(tag);
            }
            Event::Text(text) | Event::Code(text) => self.text(&text),
            Event::SoftBreak | Event::HardBreak => self.text(" "),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough => {}
            Tag::Link { .. } | Tag::Image { .. } => self.link_depth += 1,
            Tag::Item => {
                self.block_start(false);
                self.open_item();
            }
            Tag::Heading { level, .. } => {
                self.block_start(false);
                self.capture = Some(Capture::Heading {
                    depth: level as u8,
                    text: String::new(),
                });
            }
            Tag::Paragraph => {
                self.block_start(true);
                if self.nesting == 0 {
                    self.capture = Some(Capture::Paragraph {
                        position: self.records.len(),
                        text: String::new(),
                    });
                }
            }
            Tag::CodeBlock(kind) => {
                self.block_start(false);
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string)
                        .unwrap_or_else(|| self.config.default_code_lang.clone()),
                    CodeBlockKind::Indented => self.config.default_code_lang.clone(),
                };
                self.code = Some(CodeCapture {
                    lang,
                    value: String::new(),
                });
            }
            _ => self.block_start(false),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {}
            TagEnd::Link | TagEnd::Image => self.link_depth = self.link_depth.saturating_sub(1),
            TagEnd::Item => {
                self.close_item();
                self.block_end();
            }
            TagEnd::Heading(_) => {
                self.close_heading();
                self.block_end();
            }
            TagEnd::Paragraph => {
                if let Some(Capture::Paragraph { position, text }) = self.capture.take() {
                    let text = text.trim().to_string();
                    if !text.is_empty() {
                        self.paragraphs.push((position, text));
                    }
                }
                self.block_end();
            }
            TagEnd::CodeBlock => {
                self.close_code();
                self.block_end();
            }
            _ => self.block_end(),
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.value.push_str(text);
            return;
        }
        if self.link_depth > 0 {
            return;
        }
        match self.capture.as_mut() {
            Some(Capture::Heading { text: buf, .. }) | Some(Capture::Paragraph { text: buf, .. }) => {
                buf.push_str(text);
            }
            None => {
                if let Some(frame) = self.items.last_mut() {
                    if frame.accepts_text() {
                        frame.text.push_str(text);
                    }
                }
            }
        }
    }

    fn block_start(&mut self, is_paragraph: bool) {
        if let Some(frame) = self.items.last_mut() {
            frame.block_start(is_paragraph);
        }
    }

    fn block_end(&mut self) {
        if let Some(frame) = self.items.last_mut() {
            frame.block_end();
        }
    }

    fn open_item(&mut self) {
        self.list_count += 1;
        let index = self.records.len();
        // Reserve the slot now so a parent item precedes its nested items.
        self.records.push(StructuralRecord::ListItem(ListItem {
            text: String::new(),
            id: format!("list-{}", self.list_count),
            completed: false,
            parent_heading_id: self.current_heading.clone(),
        }));
        self.items.push(ItemFrame {
            index,
            text: String::new(),
            open_blocks: 0,
            in_first_paragraph: false,
            done: false,
        });
    }

    fn close_item(&mut self) {
        let Some(frame) = self.items.pop() else {
            return;
        };
        let (text, completed) = strip_completion(&frame.text);
        if let Some(StructuralRecord::ListItem(item)) = self.records.get_mut(frame.index) {
            trace!(id = %item.id, completed, "List item extracted");
            item.text = text;
            item.completed = completed;
        }
    }

    fn close_heading(&mut self) {
        let Some(Capture::Heading { depth, text }) = self.capture.take() else {
            return;
        };
        self.heading_count += 1;
        let id = format!("heading-{}", self.heading_count);
        let (text, emoji) = split_emoji(&text);
        trace!(id = %id, depth, "Heading extracted");
        self.current_heading = Some(id.clone());
        self.records
            .push(StructuralRecord::Heading(Heading { depth, text, id, emoji }));
    }

    fn close_code(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        self.code_count += 1;
        let value = code
            .value
            .strip_suffix('\n')
            .map(str::to_string)
            .unwrap_or(code.value);
        self.records.push(StructuralRecord::CodeBlock(CodeBlock {
            id: format!("code-{}", self.code_count),
            lang: code.lang,
            value,
        }));
    }

    fn finish(self) -> Structure {
        if self.heading_count > 0 || self.paragraphs.is_empty() {
            if self.records.is_empty() {
                debug!("No structural records found");
            }
            return Structure::from_extracted(self.records);
        }

        debug!(
            paragraphs = self.paragraphs.len(),
            "No headings found, promoting top-level paragraphs"
        );

        let config = self.config;
        let mut pending = self.paragraphs.into_iter().enumerate().peekable();
        let mut merged = Vec::with_capacity(self.records.len() + pending.len());
        let mut promote_until = |merged: &mut Vec<StructuralRecord>, position: usize| {
            while let Some((n, (_, text))) = pending.next_if(|(_, (p, _))| *p <= position) {
                merged.push(StructuralRecord::Heading(Heading {
                    depth: 2,
                    text: truncate_label(
                        &text,
                        config.paragraph_label_limit,
                        config.paragraph_label_keep,
                    ),
                    id: format!("paragraph-{}", n + 1),
                    emoji: None,
                }));
            }
        };

        let total = self.records.len();
        for (position, record) in self.records.into_iter().enumerate() {
            promote_until(&mut merged, position);
            merged.push(record);
        }
        promote_until(&mut merged, total);

        Structure::from_extracted(merged)
    }
}

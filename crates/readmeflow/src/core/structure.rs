//! Structural records extracted from a Markdown document
//!
//! A [`Structure`] is the hand-off between extraction and synthesis: an
//! ordered list of typed records, one per heading, list item or code fence,
//! in document order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::FlowchartError;
use super::types::{END_ID, START_ID};

/// A heading, or a paragraph promoted to a depth-2 pseudo-heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    /// Markdown heading level, 1..=6
    pub depth: u8,
    /// Inline text with formatting and the emoji removed
    pub text: String,
    /// `heading-N`, or `paragraph-N` for promoted paragraphs
    pub id: String,
    /// Leading emoji lifted out of the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl Heading {
    /// Returns true if this heading was synthesized from a paragraph
    pub fn is_paragraph(&self) -> bool {
        self.id.starts_with("paragraph-")
    }
}

/// A list item with its completion state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Text of the first paragraph, completion markers stripped
    pub text: String,
    /// `list-N`
    pub id: String,
    /// True when a checkmark or `[x]` marker was present
    pub completed: bool,
    /// Id of the closest preceding heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_heading_id: Option<String>,
}

/// A fenced or indented code block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    /// `code-N`
    pub id: String,
    /// Fence language, or the configured default
    pub lang: String,
    /// Literal block contents
    pub value: String,
}

/// One structural element of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StructuralRecord {
    Heading(Heading),
    ListItem(ListItem),
    CodeBlock(CodeBlock),
}

impl StructuralRecord {
    /// Id of the underlying record
    pub fn id(&self) -> &str {
        match self {
            StructuralRecord::Heading(h) => &h.id,
            StructuralRecord::ListItem(item) => &item.id,
            StructuralRecord::CodeBlock(code) => &code.id,
        }
    }
}

/// Records of one document, in document order
///
/// Record ids are unique and never collide with the `start`/`end`
/// sentinel ids, so every structure can be synthesized without conflicts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StructureData")]
pub struct Structure {
    records: Vec<StructuralRecord>,
}

/// Unchecked serialized form of a [`Structure`]
#[derive(Deserialize)]
struct StructureData {
    records: Vec<StructuralRecord>,
}

impl TryFrom<StructureData> for Structure {
    type Error = FlowchartError;

    fn try_from(data: StructureData) -> Result<Self, Self::Error> {
        Self::from_records(data.records)
    }
}

impl Structure {
    /// Create an empty structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap records that are already in document order
    ///
    /// # Errors
    /// * `InvalidArgument` - If a record uses the `start` or `end` id
    /// * `DuplicateNode` - If two records share an id
    pub fn from_records(records: Vec<StructuralRecord>) -> Result<Self, FlowchartError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            let id = record.id();
            if id == START_ID || id == END_ID {
                return Err(FlowchartError::invalid_argument(format!(
                    "record id '{}' is reserved for a sentinel node",
                    id
                )));
            }
            if !seen.insert(id) {
                return Err(FlowchartError::duplicate_node(id));
            }
        }
        Ok(Self { records })
    }

    /// Wrap records whose ids are unique by construction
    pub(crate) fn from_extracted(records: Vec<StructuralRecord>) -> Self {
        Self { records }
    }

    /// All records in document order
    pub fn records(&self) -> &[StructuralRecord] {
        &self.records
    }

    /// Consume the structure, yielding its records
    pub fn into_records(self) -> Vec<StructuralRecord> {
        self.records
    }

    /// Headings (including promoted paragraphs) in document order
    pub fn headings(&self) -> impl Iterator<Item = &Heading> {
        self.records.iter().filter_map(|r| match r {
            StructuralRecord::Heading(h) => Some(h),
            _ => None,
        })
    }

    /// List items in document order
    pub fn list_items(&self) -> impl Iterator<Item = &ListItem> {
        self.records.iter().filter_map(|r| match r {
            StructuralRecord::ListItem(item) => Some(item),
            _ => None,
        })
    }

    /// Code blocks in document order
    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.records.iter().filter_map(|r| match r {
            StructuralRecord::CodeBlock(code) => Some(code),
            _ => None,
        })
    }

    /// Returns true if any heading record is present
    pub fn has_headings(&self) -> bool {
        self.headings().next().is_some()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records were extracted
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

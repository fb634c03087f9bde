//! Heuristic constants for structure extraction and graph synthesis
//!
//! The defaults reproduce the documented behavior exactly. Changing them
//! changes graph shape, so golden outputs only hold for [`FlowchartConfig::default`].

use serde::{Deserialize, Serialize};

/// Configuration for the extraction and synthesis pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowchartConfig {
    /// List items are kept only when their text is longer than this (in chars)
    pub min_list_item_len: usize,
    /// Paragraph labels longer than this are truncated
    pub paragraph_label_limit: usize,
    /// Number of chars kept from a truncated paragraph label, before the ellipsis
    pub paragraph_label_keep: usize,
    /// Label of the start sentinel
    pub start_label: String,
    /// Label of the end sentinel
    pub end_label: String,
    /// Label placed on edges that chain consecutive phases
    pub next_phase_label: String,
    /// Language recorded for code fences without an info string
    pub default_code_lang: String,
}

impl Default for FlowchartConfig {
    fn default() -> Self {
        Self {
            min_list_item_len: 10,
            paragraph_label_limit: 50,
            paragraph_label_keep: 47,
            start_label: "Start".to_string(),
            end_label: "End".to_string(),
            next_phase_label: "Next Phase".to_string(),
            default_code_lang: "text".to_string(),
        }
    }
}

impl FlowchartConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the list item length threshold
    pub fn with_min_list_item_len(mut self, len: usize) -> Self {
        self.min_list_item_len = len;
        self
    }

    /// Set paragraph label truncation; `keep` is clamped to `limit`
    pub fn with_paragraph_label(mut self, limit: usize, keep: usize) -> Self {
        self.paragraph_label_limit = limit;
        self.paragraph_label_keep = keep.min(limit);
        self
    }

    /// Set the sentinel labels
    pub fn with_sentinel_labels(
        mut self,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.start_label = start.into();
        self.end_label = end.into();
        self
    }

    /// Set the label used on phase-to-phase edges
    pub fn with_next_phase_label(mut self, label: impl Into<String>) -> Self {
        self.next_phase_label = label.into();
        self
    }

    /// Set the fallback code fence language
    pub fn with_default_code_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_code_lang = lang.into();
        self
    }
}

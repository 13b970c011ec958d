//! Highlighting spans of passage text.
//!
//! A highlight is a marker element wrapped around existing text. Markers never
//! change the text itself, so removing one restores the paragraph markup
//! exactly as it was.

pub mod mark;
pub mod passage;
pub mod persist;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::markup::{NodePath, ParseError};

pub use mark::{Mark, apply_mark, find_marks, remove_mark, unwrap_marks_in};
pub use passage::{AnnotatedPassage, ApplyOutcome, ClearTarget, MarkInfo, ParagraphState};
pub use persist::HighlightStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    Main,
    Evidence,
    Confusion,
}

impl HighlightColor {
    pub const ALL: [HighlightColor; 3] = [
        HighlightColor::Main,
        HighlightColor::Evidence,
        HighlightColor::Confusion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HighlightColor::Main => "main",
            HighlightColor::Evidence => "evidence",
            HighlightColor::Confusion => "confusion",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HighlightColor::Main => "Main Idea",
            HighlightColor::Evidence => "Evidence/Fact",
            HighlightColor::Confusion => "Confusion",
        }
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HighlightColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HighlightColor::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// A caret position: a char offset inside one text node of one paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextPoint {
    pub paragraph: usize,
    pub path: NodePath,
    pub offset: usize,
}

impl TextPoint {
    pub fn new(paragraph: usize, path: NodePath, offset: usize) -> Self {
        Self {
            paragraph,
            path,
            offset,
        }
    }
}

/// Anchor and focus as captured from the surface; may be reversed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRange {
    pub start: TextPoint,
    pub end: TextPoint,
}

impl TextRange {
    pub fn new(start: TextPoint, end: TextPoint) -> Self {
        Self { start, end }
    }
}

/// Why an annotation request was dropped. None of these leave partial
/// changes behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("no selection")]
    NoSelection,
    #[error("selection is empty")]
    CollapsedSelection,
    #[error("paragraph {index} is outside the passage ({count} paragraphs)")]
    ParagraphOutOfRange { index: usize, count: usize },
    #[error("{path} in paragraph {paragraph} is not a text node")]
    NotATextNode { paragraph: usize, path: NodePath },
    #[error("offset {offset} is past the end of a {len}-char run")]
    OffsetOutOfBounds { offset: usize, len: usize },
    #[error("no highlight ids left in this passage")]
    MarkIdsExhausted,
    #[error("paragraph {paragraph} markup is malformed: {source}")]
    Markup {
        paragraph: usize,
        #[source]
        source: ParseError,
    },
}

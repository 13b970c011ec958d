//! A minimal HTML fragment model for passage markup.
//!
//! Passages arrive as HTML strings. They are parsed into a [`Fragment`] tree,
//! transformed as plain data, and serialized back.

pub mod node;
pub mod parser;

pub use node::{Attr, Closing, Element, Fragment, Node, NodePath, TextSegment};
pub use parser::{ParseError, parse_fragment};

/// Split passage HTML into per-paragraph chunks: cut on `</p>`, drop chunks
/// that are blank after trimming, and put the `</p>` back on each.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .split("</p>")
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| format!("{chunk}</p>"))
        .collect()
}

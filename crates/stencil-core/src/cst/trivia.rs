//! Trivia handling for Stencil syntax trees
//!
//! Trivia is the lexical detail a parser captures next to a node without it
//! being part of the node's meaning: whitespace, newlines, comments and
//! separator punctuation. Replaying it is what makes rendering lossless.
//!
//! Each node owns at most one [`TriviaBundle`] with two ordered lists:
//! - **before**: everything between the previous token and the node
//! - **after**: everything between the node and the next token
//!
//! # Example
//!
//! ```rust
//! use stencil_core::cst::trivia::{TriviaBundle, TriviaItem};
//!
//! let bundle = TriviaBundle::new(
//!     vec![TriviaItem::whitespace(" ")],
//!     vec![TriviaItem::comment("# done"), TriviaItem::newline("\n")],
//! );
//!
//! assert!(bundle.has_comments());
//! assert!(bundle.has_leading_whitespace());
//! ```

use super::renderer::Renderer;
use crate::Result;
use serde::{Deserialize, Serialize};

/// The kind of a captured lexical item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriviaKind {
    /// Spaces and tabs
    Whitespace,
    /// A line break (`\n` or `\r\n`)
    NewLine,
    /// A `;` statement separator
    SemiColon,
    /// A `,` list separator
    Comma,
    /// A literal `end` keyword closing a block construct
    EndKeyword,
    /// `# ...` or `## ... ##`
    Comment,
    /// Any other punctuation kept verbatim
    Punctuation,
}

impl TriviaKind {
    /// Whitespace that a strip marker (`~`) is allowed to remove
    pub fn is_whitespace(self) -> bool {
        matches!(self, TriviaKind::Whitespace | TriviaKind::NewLine)
    }

    /// Whether this item already separates two statements
    pub fn terminates_statement(self) -> bool {
        matches!(self, TriviaKind::NewLine | TriviaKind::SemiColon)
    }
}

/// Represents a single trivia item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaItem {
    /// The kind of trivia
    pub kind: TriviaKind,
    /// The text content, exactly as it appeared in the source
    pub text: String,
}

impl TriviaItem {
    /// Create a new trivia item
    pub fn new(kind: TriviaKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        Self::new(TriviaKind::Whitespace, text)
    }

    pub fn newline(text: impl Into<String>) -> Self {
        Self::new(TriviaKind::NewLine, text)
    }

    pub fn semicolon() -> Self {
        Self::new(TriviaKind::SemiColon, ";")
    }

    pub fn comma() -> Self {
        Self::new(TriviaKind::Comma, ",")
    }

    pub fn end_keyword() -> Self {
        Self::new(TriviaKind::EndKeyword, "end")
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(TriviaKind::Comment, text)
    }

    pub fn punctuation(text: impl Into<String>) -> Self {
        Self::new(TriviaKind::Punctuation, text)
    }

    /// Check if this is a comment
    pub fn is_comment(&self) -> bool {
        self.kind == TriviaKind::Comment
    }

    /// Check if this is whitespace (including line breaks)
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    /// Check if this is a newline
    pub fn is_newline(&self) -> bool {
        self.kind == TriviaKind::NewLine
    }

    /// Get the comment content (without `#` or `## ##`)
    pub fn comment_content(&self) -> Option<String> {
        if !self.is_comment() {
            return None;
        }

        let content = if self.text.starts_with("##") {
            self.text
                .trim_start_matches("##")
                .trim_end_matches("##")
                .trim()
        } else {
            self.text.trim_start_matches('#').trim()
        };
        Some(content.to_string())
    }

    /// Emit the item's literal text
    pub fn write_to(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text(&self.text)
    }
}

/// Leading and trailing trivia captured for one node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaBundle {
    /// Trivia before the node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub before: Vec<TriviaItem>,
    /// Trivia after the node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<TriviaItem>,
}

impl TriviaBundle {
    pub fn new(before: Vec<TriviaItem>, after: Vec<TriviaItem>) -> Self {
        Self { before, after }
    }

    /// Create an empty bundle
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if this has any trivia
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    /// The `before` or `after` list
    pub fn items(&self, before: bool) -> &[TriviaItem] {
        if before { &self.before } else { &self.after }
    }

    /// Check if this has comments
    pub fn has_comments(&self) -> bool {
        self.iter().any(TriviaItem::is_comment)
    }

    /// Whether the node was preceded by strippable whitespace
    pub fn has_leading_whitespace(&self) -> bool {
        self.before.iter().any(TriviaItem::is_whitespace)
    }

    /// Whether the node was followed by strippable whitespace
    pub fn has_trailing_whitespace(&self) -> bool {
        self.after.iter().any(TriviaItem::is_whitespace)
    }

    /// Get all comments
    pub fn comments(&self) -> Vec<&TriviaItem> {
        self.iter().filter(|t| t.is_comment()).collect()
    }

    /// Before items followed by after items
    pub fn iter(&self) -> impl Iterator<Item = &TriviaItem> {
        self.before.iter().chain(self.after.iter())
    }
}

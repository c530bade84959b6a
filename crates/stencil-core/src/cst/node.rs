//! The capability every renderable node exposes
//!
//! The renderer never looks at concrete node types. It only asks the
//! classification predicates below, replays [`SyntaxNode::trivia`], and hands
//! control to [`SyntaxNode::write_content`] for the node's own tokens.

use super::renderer::Renderer;
use super::trivia::{TriviaBundle, TriviaItem};
use crate::Result;

/// How a block construct is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosingKeyword<'a> {
    /// The grammar has no closing keyword for this node
    None,
    /// The node needs `end` but the parser captured none, so it is synthesized
    Implicit,
    /// The literal `end` and its surrounding trivia, replayed verbatim
    Explicit(&'a [TriviaItem]),
}

impl ClosingKeyword<'_> {
    pub fn is_none(&self) -> bool {
        matches!(self, ClosingKeyword::None)
    }
}

/// A node of a template syntax tree
pub trait SyntaxNode {
    /// Literal text outside of code delimiters
    fn is_raw_text(&self) -> bool {
        false
    }

    /// Groups children without delimiter semantics of its own (a block, the document)
    fn is_container(&self) -> bool {
        false
    }

    fn is_loop_statement(&self) -> bool {
        false
    }

    /// Only meaningful for loop statements
    fn is_while_kind(&self) -> bool {
        false
    }

    fn is_statement(&self) -> bool {
        false
    }

    /// Whether a synthesized `; ` may be placed in front of this statement
    fn can_carry_leading_separator(&self) -> bool {
        true
    }

    /// Captured trivia, `None` for programmatically built nodes
    fn trivia(&self) -> Option<&TriviaBundle>;

    fn closing_keyword(&self) -> ClosingKeyword<'_> {
        ClosingKeyword::None
    }

    /// Emit the node's own tokens, re-entering the renderer for children
    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()>;

    /// Short label used in diagnostics
    fn label(&self) -> &'static str {
        "node"
    }
}

/// Predicates derived from a node's trivia
pub(crate) trait TriviaExt {
    fn has_leading_whitespace(&self) -> bool;
    fn has_trailing_whitespace(&self) -> bool;
}

impl<T: SyntaxNode + ?Sized> TriviaExt for T {
    fn has_leading_whitespace(&self) -> bool {
        self.trivia()
            .is_some_and(TriviaBundle::has_leading_whitespace)
    }

    fn has_trailing_whitespace(&self) -> bool {
        self.trivia()
            .is_some_and(TriviaBundle::has_trailing_whitespace)
    }
}

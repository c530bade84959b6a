//! Concrete Syntax Tree (CST) rendering for Stencil templates
//!
//! A template alternates between literal text and code regions delimited by
//! `{{ ... }}`. Trees handed to this module come from one of two places:
//!
//! - **Captured trees**: a parser recorded every piece of trivia (whitespace,
//!   newlines, comments, `;`, `,` and the literal `end`) next to the node it
//!   belongs to. Rendering replays it, so `render(parse(source)) == source`.
//! - **Synthesized trees**: nodes built in code carry no trivia. The renderer
//!   then inserts the minimum separators (`; `, spaces, `,`, delimiters and
//!   `end`) needed for the output to parse back into the same tree.
//!
//! ## Architecture
//!
//! - [`node::SyntaxNode`]: the capability every node exposes (classification,
//!   trivia, closing keyword, content writer)
//! - [`renderer::Renderer`]: the state machine that owns mode switching and
//!   separator synthesis
//! - [`ast`]: the concrete node catalog, serializable as JSON
//! - [`round_trip`]: validation that rendered text matches its source
//!
//! ## Strip markers
//!
//! `{{~` and `~}}` remove whitespace next to a code region. The removed
//! whitespace survives as trivia on the neighbouring raw text, and the
//! renderer re-derives the markers from it.

pub mod ast;
pub mod builder;
pub mod loop_context;
pub mod node;
pub mod output;
pub mod renderer;
pub mod round_trip;
pub mod trivia;

pub use ast::{
    ArrayLiteral, BinaryExpression, Block, Document, ElseClause, EscapeBlock, ExpressionStatement,
    ForStatement, Identifier, IfStatement, Literal, LoopControl, LoopKeyword, LoopVariable, Node,
    RawText, WhileStatement,
};
pub use loop_context::LoopContext;
pub use node::{ClosingKeyword, SyntaxNode};
pub use output::{StringOutput, TextOutput, WriterOutput};
pub use renderer::{Mode, RenderOptions, Renderer, render_to_string};
pub use round_trip::{
    DelimiterIssue, DifferenceKind, RoundTripValidator, TextDifference, ValidationResult,
    check_delimiters,
};
pub use trivia::{TriviaBundle, TriviaItem, TriviaKind};

#[cfg(test)]
mod tests;

//! Constructors for building template trees in code
//!
//! Nodes built here carry no trivia, so the renderer synthesizes every
//! separator. [`WithTrivia`] attaches captured trivia afterwards, which is how
//! tests describe what a trivia-capturing parser would have produced.
//!
//! ```rust
//! use stencil_core::cst::builder::{WithTrivia, binary, document, expr, ident, literal, ws};
//! use stencil_core::cst::{RenderOptions, render_to_string};
//!
//! let tree = document(vec![
//!     expr(binary(ident("a"), "+", literal("1"))).with_before(vec![ws(" ")]),
//! ]);
//!
//! let text = render_to_string(&tree, &RenderOptions::default()).unwrap();
//! assert_eq!(text, "{{ a + 1}}");
//! ```

use super::ast::{
    ArrayLiteral, BinaryExpression, Block, Document, ElseClause, EscapeBlock, ExpressionStatement,
    ForStatement, Identifier, IfStatement, Literal, LoopControl, LoopKeyword, LoopVariable, Node,
    RawText, WhileStatement,
};
use super::trivia::{TriviaBundle, TriviaItem};

pub fn document(children: Vec<Node>) -> Node {
    Document {
        children,
        trivia: None,
    }
    .into()
}

pub fn block(statements: Vec<Node>) -> Block {
    Block {
        statements,
        trivia: None,
    }
}

pub fn raw(text: impl Into<String>) -> Node {
    RawText {
        text: text.into(),
        trivia: None,
    }
    .into()
}

/// `{%{text}%}` with `level` percent signs
pub fn escape(level: usize, text: impl Into<String>) -> Node {
    EscapeBlock {
        level,
        text: text.into(),
        trivia: None,
    }
    .into()
}

/// Expression statement
pub fn expr(expression: Node) -> Node {
    ExpressionStatement {
        expression: Box::new(expression),
        trivia: None,
    }
    .into()
}

pub fn for_loop(variable: Node, iterable: Node, body: Vec<Node>) -> Node {
    ForStatement {
        variable: Box::new(variable),
        iterable: Box::new(iterable),
        body: block(body),
        end: None,
        trivia: None,
    }
    .into()
}

pub fn while_loop(condition: Node, body: Vec<Node>) -> Node {
    WhileStatement {
        condition: Box::new(condition),
        body: block(body),
        end: None,
        trivia: None,
    }
    .into()
}

pub fn if_then(condition: Node, then_body: Vec<Node>) -> Node {
    IfStatement {
        condition: Box::new(condition),
        then_body: block(then_body),
        else_clause: None,
        end: None,
        trivia: None,
    }
    .into()
}

pub fn if_else(condition: Node, then_body: Vec<Node>, else_body: Vec<Node>) -> Node {
    IfStatement {
        condition: Box::new(condition),
        then_body: block(then_body),
        else_clause: Some(ElseClause {
            body: block(else_body),
            trivia: None,
        }),
        end: None,
        trivia: None,
    }
    .into()
}

pub fn break_stmt() -> Node {
    LoopControl {
        keyword: LoopKeyword::Break,
        trivia: None,
    }
    .into()
}

pub fn continue_stmt() -> Node {
    LoopControl {
        keyword: LoopKeyword::Continue,
        trivia: None,
    }
    .into()
}

pub fn ident(name: impl Into<String>) -> Node {
    Identifier {
        name: name.into(),
        trivia: None,
    }
    .into()
}

pub fn literal(text: impl Into<String>) -> Node {
    Literal {
        text: text.into(),
        trivia: None,
    }
    .into()
}

/// `for.<property>` or `while.<property>`, decided while rendering
pub fn loop_var(property: impl Into<String>) -> Node {
    LoopVariable {
        property: property.into(),
        trivia: None,
    }
    .into()
}

pub fn array(items: Vec<Node>) -> Node {
    ArrayLiteral { items, trivia: None }.into()
}

pub fn binary(left: Node, operator: impl Into<String>, right: Node) -> Node {
    BinaryExpression {
        left: Box::new(left),
        operator: operator.into(),
        right: Box::new(right),
        trivia: None,
    }
    .into()
}

pub fn ws(text: impl Into<String>) -> TriviaItem {
    TriviaItem::whitespace(text)
}

pub fn nl() -> TriviaItem {
    TriviaItem::newline("\n")
}

pub fn semi() -> TriviaItem {
    TriviaItem::semicolon()
}

pub fn comma() -> TriviaItem {
    TriviaItem::comma()
}

pub fn end_kw() -> TriviaItem {
    TriviaItem::end_keyword()
}

pub fn comment(text: impl Into<String>) -> TriviaItem {
    TriviaItem::comment(text)
}

/// Attach captured trivia to a built node
pub trait WithTrivia: Sized {
    /// Mark the node as captured, with an empty bundle if it has none
    fn captured(self) -> Self;

    fn with_before(self, items: Vec<TriviaItem>) -> Self;

    fn with_after(self, items: Vec<TriviaItem>) -> Self;

    /// Explicit closing keyword list; ignored by nodes without one
    fn with_end(self, items: Vec<TriviaItem>) -> Self;
}

impl WithTrivia for Node {
    fn captured(mut self) -> Self {
        self.trivia_mut().get_or_insert_with(TriviaBundle::empty);
        self
    }

    fn with_before(mut self, items: Vec<TriviaItem>) -> Self {
        self.trivia_mut()
            .get_or_insert_with(TriviaBundle::empty)
            .before = items;
        self
    }

    fn with_after(mut self, items: Vec<TriviaItem>) -> Self {
        self.trivia_mut()
            .get_or_insert_with(TriviaBundle::empty)
            .after = items;
        self
    }

    fn with_end(mut self, items: Vec<TriviaItem>) -> Self {
        if let Some(end) = self.end_mut() {
            *end = Some(items);
        }
        self
    }
}

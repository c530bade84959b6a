//! Node catalog for Stencil templates
//!
//! Every construct is a plain struct implementing [`SyntaxNode`]; [`Node`]
//! is the closed sum type used for children and for (de)serializing whole
//! trees. Trees come either from a parser that captured trivia (every node
//! then has `trivia: Some(..)`, possibly empty) or from code, in which case
//! `trivia` is `None` and the renderer synthesizes separators.

use super::node::{ClosingKeyword, SyntaxNode};
use super::renderer::Renderer;
use super::trivia::{TriviaBundle, TriviaItem};
use crate::{Result, StencilError};
use serde::{Deserialize, Serialize};

/// Any node of a template tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Document(Document),
    Block(Block),
    Raw(RawText),
    Escape(EscapeBlock),
    ExpressionStatement(ExpressionStatement),
    For(ForStatement),
    While(WhileStatement),
    If(IfStatement),
    Else(ElseClause),
    LoopControl(LoopControl),
    Identifier(Identifier),
    Literal(Literal),
    LoopVariable(LoopVariable),
    Array(ArrayLiteral),
    Binary(BinaryExpression),
}

macro_rules! node_variants {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        impl Node {
            fn as_syntax(&self) -> &dyn SyntaxNode {
                match self {
                    $(Node::$variant(node) => node,)*
                }
            }

            /// Trivia slot of the wrapped node
            pub fn trivia_mut(&mut self) -> &mut Option<TriviaBundle> {
                match self {
                    $(Node::$variant(node) => &mut node.trivia,)*
                }
            }
        }

        $(
            impl From<$ty> for Node {
                fn from(node: $ty) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

node_variants! {
    Document(Document),
    Block(Block),
    Raw(RawText),
    Escape(EscapeBlock),
    ExpressionStatement(ExpressionStatement),
    For(ForStatement),
    While(WhileStatement),
    If(IfStatement),
    Else(ElseClause),
    LoopControl(LoopControl),
    Identifier(Identifier),
    Literal(Literal),
    LoopVariable(LoopVariable),
    Array(ArrayLiteral),
    Binary(BinaryExpression),
}

impl Node {
    /// Closing `end` slot of block constructs, `None` for everything else
    pub fn end_mut(&mut self) -> Option<&mut Option<Vec<TriviaItem>>> {
        match self {
            Node::For(node) => Some(&mut node.end),
            Node::While(node) => Some(&mut node.end),
            Node::If(node) => Some(&mut node.end),
            _ => None,
        }
    }

    /// Parse a tree from its JSON form
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| StencilError::serialization(format!("Invalid syntax tree: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl SyntaxNode for Node {
    fn is_raw_text(&self) -> bool {
        self.as_syntax().is_raw_text()
    }

    fn is_container(&self) -> bool {
        self.as_syntax().is_container()
    }

    fn is_loop_statement(&self) -> bool {
        self.as_syntax().is_loop_statement()
    }

    fn is_while_kind(&self) -> bool {
        self.as_syntax().is_while_kind()
    }

    fn is_statement(&self) -> bool {
        self.as_syntax().is_statement()
    }

    fn can_carry_leading_separator(&self) -> bool {
        self.as_syntax().can_carry_leading_separator()
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.as_syntax().trivia()
    }

    fn closing_keyword(&self) -> ClosingKeyword<'_> {
        self.as_syntax().closing_keyword()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        self.as_syntax().write_content(renderer)
    }

    fn label(&self) -> &'static str {
        self.as_syntax().label()
    }
}

fn closing(end: &Option<Vec<TriviaItem>>) -> ClosingKeyword<'_> {
    match end {
        Some(items) => ClosingKeyword::Explicit(items),
        None => ClosingKeyword::Implicit,
    }
}

/// The whole template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for Document {
    fn is_container(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        for child in &self.children {
            renderer.write(child)?;
        }
        Ok(())
    }

    fn label(&self) -> &'static str {
        "document"
    }
}

/// Statements of a block construct's body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for Block {
    fn is_container(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        for statement in &self.statements {
            renderer.write(statement)?;
        }
        Ok(())
    }

    fn label(&self) -> &'static str {
        "block"
    }
}

/// Literal text between code regions
///
/// Whitespace removed by a `~` strip marker is kept as trivia, so
/// `Hi {{~ x }}` is the text `Hi` with a trailing whitespace item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawText {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for RawText {
    fn is_raw_text(&self) -> bool {
        true
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text(&self.text)
    }

    fn label(&self) -> &'static str {
        "raw text"
    }
}

/// Verbatim text wrapped in escape delimiters: `{%{ ... }%}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscapeBlock {
    /// Number of `%` in each delimiter
    #[serde(default = "default_escape_level")]
    pub level: usize,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

fn default_escape_level() -> usize {
    1
}

impl SyntaxNode for EscapeBlock {
    fn is_raw_text(&self) -> bool {
        true
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        // Level 0 would open a plain code region
        if self.level == 0 {
            return Err(StencilError::structural(
                "escape block needs an escape level of at least 1",
            ));
        }
        renderer.write_enter_code(self.level)?;
        renderer.write_text(&self.text)?;
        renderer.write_exit_code(self.level)
    }

    fn label(&self) -> &'static str {
        "escape block"
    }
}

/// An expression evaluated for its output: `{{ name }}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Box<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for ExpressionStatement {
    fn is_statement(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write(&*self.expression)?;
        renderer.expect_end_of_statement();
        Ok(())
    }

    fn label(&self) -> &'static str {
        "expression statement"
    }
}

/// `for <variable> in <iterable> ... end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStatement {
    pub variable: Box<Node>,
    pub iterable: Box<Node>,
    pub body: Block,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Vec<TriviaItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for ForStatement {
    fn is_loop_statement(&self) -> bool {
        true
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn closing_keyword(&self) -> ClosingKeyword<'_> {
        closing(&self.end)
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text("for")?;
        renderer.expect_space();
        renderer.write(&*self.variable)?;
        renderer.expect_space();
        renderer.write_token("in")?;
        renderer.expect_space();
        renderer.write(&*self.iterable)?;
        renderer.expect_end_of_statement();
        renderer.write(&self.body)
    }

    fn label(&self) -> &'static str {
        "for statement"
    }
}

/// `while <condition> ... end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub condition: Box<Node>,
    pub body: Block,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Vec<TriviaItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for WhileStatement {
    fn is_loop_statement(&self) -> bool {
        true
    }

    fn is_while_kind(&self) -> bool {
        true
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn closing_keyword(&self) -> ClosingKeyword<'_> {
        closing(&self.end)
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text("while")?;
        renderer.expect_space();
        renderer.write(&*self.condition)?;
        renderer.expect_end_of_statement();
        renderer.write(&self.body)
    }

    fn label(&self) -> &'static str {
        "while statement"
    }
}

/// `if <condition> ... [else ...] end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Box<Node>,
    pub then_body: Block,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_clause: Option<ElseClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Vec<TriviaItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for IfStatement {
    fn is_statement(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn closing_keyword(&self) -> ClosingKeyword<'_> {
        closing(&self.end)
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text("if")?;
        renderer.expect_space();
        renderer.write(&*self.condition)?;
        renderer.expect_end_of_statement();
        renderer.write(&self.then_body)?;
        if let Some(else_clause) = &self.else_clause {
            renderer.write(else_clause)?;
        }
        Ok(())
    }

    fn label(&self) -> &'static str {
        "if statement"
    }
}

/// The `else` branch of an [`IfStatement`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElseClause {
    pub body: Block,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for ElseClause {
    fn is_statement(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text("else")?;
        renderer.expect_end_of_statement();
        renderer.write(&self.body)
    }

    fn label(&self) -> &'static str {
        "else clause"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopKeyword {
    Break,
    Continue,
}

impl LoopKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            LoopKeyword::Break => "break",
            LoopKeyword::Continue => "continue",
        }
    }
}

/// `break` / `continue`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopControl {
    pub keyword: LoopKeyword,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for LoopControl {
    fn is_statement(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text(self.keyword.as_str())?;
        renderer.expect_end_of_statement();
        Ok(())
    }

    fn label(&self) -> &'static str {
        "loop control"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for Identifier {
    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text(&self.name)
    }

    fn label(&self) -> &'static str {
        "identifier"
    }
}

/// A literal token kept as written: `42`, `"text"`, `true`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for Literal {
    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text(&self.text)
    }

    fn label(&self) -> &'static str {
        "literal"
    }
}

/// A property of the innermost loop: `for.index`, `while.first`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopVariable {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for LoopVariable {
    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        let owner = if renderer.is_while_loop() { "while" } else { "for" };
        renderer.write_text(owner)?;
        renderer.write_text(".")?;
        renderer.write_text(&self.property)
    }

    fn label(&self) -> &'static str {
        "loop variable"
    }
}

/// `[a, b, c]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayLiteral {
    pub items: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for ArrayLiteral {
    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text("[")?;
        renderer.write_list_with_commas(&self.items)?;
        renderer.write_text("]")
    }

    fn label(&self) -> &'static str {
        "array"
    }
}

/// `<left> <operator> <right>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub left: Box<Node>,
    pub operator: String,
    pub right: Box<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivia: Option<TriviaBundle>,
}

impl SyntaxNode for BinaryExpression {
    fn trivia(&self) -> Option<&TriviaBundle> {
        self.trivia.as_ref()
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        // Captured trees already hold their spacing in trivia.
        let spaced = self.trivia.is_none() && renderer.options().spaces_around_operators;

        renderer.write(&*self.left)?;
        if spaced {
            renderer.expect_space();
        }
        renderer.write_token(&self.operator)?;
        if spaced {
            renderer.expect_space();
        }
        renderer.write(&*self.right)
    }

    fn label(&self) -> &'static str {
        "binary expression"
    }
}

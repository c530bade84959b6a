//! Renderer turning a syntax tree back into template text
//!
//! The renderer walks the tree depth-first. For every node it:
//!
//! 1. switches between text and code mode if the node's class requires it,
//!    emitting `{{` / `}}` (plus `~` strip markers derived from the
//!    neighbouring raw text's trivia)
//! 2. replays the node's leading trivia
//! 3. synthesizes a `; ` terminator or a space that the trivia did not supply
//! 4. lets the node write its own tokens (children re-enter the renderer)
//! 5. writes the closing `end` of block constructs, verbatim or synthesized
//! 6. replays the node's trailing trivia
//!
//! A tree parsed with trivia therefore prints back to its exact source, and a
//! tree built by hand prints as the smallest text that parses to it.
//!
//! # Example
//!
//! ```rust
//! use stencil_core::cst::builder::{document, for_loop, ident, raw};
//! use stencil_core::cst::{RenderOptions, render_to_string};
//!
//! let tree = document(vec![for_loop(ident("item"), ident("items"), vec![raw("Hi")])]);
//! let text = render_to_string(&tree, &RenderOptions::default()).unwrap();
//!
//! assert_eq!(text, "{{for item in items}}Hi{{end}}");
//! ```

use super::loop_context::{LoopContext, LoopScope};
use super::node::{ClosingKeyword, SyntaxNode, TriviaExt};
use super::output::{StringOutput, TextOutput};
use super::trivia::{TriviaItem, TriviaKind};
use crate::{Result, StencilError};
use tracing::{debug, trace};

const STATEMENT_TERMINATOR: &str = "; ";
const END_KEYWORD: &str = "end";
const STRIP_MARKER: &str = "~";

/// Cosmetic choices for synthesized output
///
/// Mode switching and statement separation never look at these; only node
/// writers and the list helper do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Synthesize spaces around binary operators (`a + b` rather than `a+b`)
    pub spaces_around_operators: bool,
    /// Follow a synthesized `,` with a space
    pub space_after_comma: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            spaces_around_operators: true,
            space_after_comma: true,
        }
    }
}

/// Which region the output is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Literal template text
    Text,
    /// Between code delimiters
    Code,
}

/// Stateful tree renderer; one instance per tree
pub struct Renderer<'o> {
    output: &'o mut dyn TextOutput,
    options: RenderOptions,
    mode: Mode,
    space_required: bool,
    end_of_statement_required: bool,
    statement_terminated: bool,
    closing_keyword_required: bool,
    comma_present: bool,
    left_strip_next_enter: bool,
    right_strip_next_exit: bool,
    loops: LoopContext,
    /// `Some(trailing_whitespace)` while the last non-container node rendered was raw text
    previous_raw: Option<bool>,
}

impl<'o> Renderer<'o> {
    pub fn new(output: &'o mut dyn TextOutput, options: RenderOptions) -> Self {
        Self {
            output,
            options,
            mode: Mode::Text,
            space_required: false,
            end_of_statement_required: false,
            statement_terminated: false,
            closing_keyword_required: false,
            comma_present: false,
            left_strip_next_enter: false,
            right_strip_next_exit: false,
            loops: LoopContext::new(),
            previous_raw: None,
        }
    }

    /// Render a whole tree, closing a code region left open at the end
    ///
    /// On error the sink keeps whatever was written; callers discard it.
    pub fn render(&mut self, root: &dyn SyntaxNode) -> Result<()> {
        self.reset();
        debug!("Rendering {} tree", root.label());

        self.write(root)?;
        if self.mode == Mode::Code {
            self.write_exit_code(0)?;
        }

        debug!("Finished rendering {} tree", root.label());
        Ok(())
    }

    /// Render one node and its subtree
    pub fn write(&mut self, node: &dyn SyntaxNode) -> Result<()> {
        check_structure(node)?;

        if node.is_loop_statement() {
            let mut scope = LoopScope::enter(self, node.is_while_kind());
            scope.write_node(node)
        } else {
            self.write_node(node)
        }
    }

    /// Write literal text with no synthesis
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.output.write(text)
    }

    /// Write a keyword or punctuation token, preceded by a pending space
    pub fn write_token(&mut self, token: &str) -> Result<()> {
        self.write_pending_space()?;
        self.write_text(token)
    }

    /// Require a separating space before whatever is written next
    pub fn expect_space(&mut self) {
        self.space_required = true;
    }

    /// Require a statement terminator before the next statement
    pub fn expect_end_of_statement(&mut self) {
        self.end_of_statement_required = true;
    }

    /// Write nodes separated by `,`, unless an item already carried its comma
    pub fn write_list_with_commas<T: SyntaxNode>(&mut self, items: &[T]) -> Result<()> {
        for (index, item) in items.iter().enumerate() {
            self.comma_present = false;
            self.write(item)?;
            if index + 1 < items.len() && !self.comma_present {
                trace!("Synthesizing list separator");
                self.write_text(",")?;
                if self.options.space_after_comma {
                    self.expect_space();
                }
            }
            self.comma_present = false;
        }
        Ok(())
    }

    /// Open a code region: `{`, `%` repeated `escape` times, `{`
    pub fn write_enter_code(&mut self, escape: usize) -> Result<()> {
        trace!(escape, strip = self.left_strip_next_enter, "Entering code");
        self.write_text("{")?;
        self.write_percent(escape)?;
        self.write_text("{")?;
        if self.left_strip_next_enter {
            self.write_text(STRIP_MARKER)?;
            self.left_strip_next_enter = false;
        }
        self.reset_separators();
        self.mode = Mode::Code;
        Ok(())
    }

    /// Close a code region: `}`, `%` repeated `escape` times, `}`
    pub fn write_exit_code(&mut self, escape: usize) -> Result<()> {
        trace!(escape, strip = self.right_strip_next_exit, "Exiting code");
        if self.right_strip_next_exit {
            self.write_text(STRIP_MARKER)?;
            self.right_strip_next_exit = false;
        }
        self.write_text("}")?;
        self.write_percent(escape)?;
        self.write_text("}")?;
        self.reset_separators();
        self.mode = Mode::Text;
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_in_code(&self) -> bool {
        self.mode == Mode::Code
    }

    /// Whether the nearest enclosing loop is a `while`
    pub fn is_while_loop(&self) -> bool {
        self.loops.is_while_loop()
    }

    pub fn loop_depth(&self) -> usize {
        self.loops.depth()
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Whether a block construct's closing keyword is being written
    pub fn closing_keyword_required(&self) -> bool {
        self.closing_keyword_required
    }

    pub(crate) fn loops_mut(&mut self) -> &mut LoopContext {
        &mut self.loops
    }

    /// Reset per-render state (keeps options and sink)
    pub fn reset(&mut self) {
        self.mode = Mode::Text;
        self.reset_separators();
        self.left_strip_next_enter = false;
        self.right_strip_next_exit = false;
        self.loops.clear();
        self.previous_raw = None;
    }

    fn write_node(&mut self, node: &dyn SyntaxNode) -> Result<()> {
        self.write_begin(node)?;
        node.write_content(self)?;
        self.write_closing_keyword(node)?;
        self.write_end(node)
    }

    fn write_begin(&mut self, node: &dyn SyntaxNode) -> Result<()> {
        if !node.is_container() {
            match (self.mode, node.is_raw_text()) {
                (Mode::Code, true) => {
                    self.right_strip_next_exit = node.has_leading_whitespace();
                    self.write_exit_code(0)?;
                }
                (Mode::Text, false) => {
                    self.prepare_left_strip();
                    self.write_enter_code(0)?;
                }
                _ => {}
            }
        }

        self.replay_trivia(node, true)?;

        if self.mode == Mode::Code && node.is_statement() && !node.is_raw_text() {
            self.write_statement_terminator(node.can_carry_leading_separator())?;
        }
        self.write_pending_space()
    }

    fn write_end(&mut self, node: &dyn SyntaxNode) -> Result<()> {
        self.replay_trivia(node, false)?;

        if !node.is_container() {
            self.previous_raw = node
                .is_raw_text()
                .then(|| node.has_trailing_whitespace());
        }
        Ok(())
    }

    fn write_closing_keyword(&mut self, node: &dyn SyntaxNode) -> Result<()> {
        let closing = node.closing_keyword();
        if closing.is_none() {
            return Ok(());
        }

        if self.mode == Mode::Text {
            self.prepare_left_strip();
            self.write_enter_code(0)?;
        }
        self.closing_keyword_required = true;

        match closing {
            ClosingKeyword::Explicit(items) => {
                let keyword_at = items
                    .iter()
                    .position(|item| item.kind == TriviaKind::EndKeyword)
                    .ok_or_else(|| {
                        StencilError::structural(format!(
                            "{} closing trivia has no end keyword",
                            node.label()
                        ))
                    })?;
                for item in &items[..keyword_at] {
                    self.replay_item(item)?;
                }
                self.write_statement_terminator(true)?;
                for item in &items[keyword_at..] {
                    self.replay_item(item)?;
                }
            }
            ClosingKeyword::Implicit => {
                trace!("Synthesizing closing keyword for {}", node.label());
                self.write_statement_terminator(true)?;
                self.write_pending_space()?;
                self.write_text(END_KEYWORD)?;
            }
            ClosingKeyword::None => {}
        }

        self.closing_keyword_required = false;
        self.end_of_statement_required = true;
        Ok(())
    }

    fn replay_trivia(&mut self, node: &dyn SyntaxNode, before: bool) -> Result<()> {
        if let Some(bundle) = node.trivia() {
            for item in bundle.items(before) {
                self.replay_item(item)?;
            }
        }
        Ok(())
    }

    fn replay_item(&mut self, item: &TriviaItem) -> Result<()> {
        item.write_to(self)?;
        match item.kind {
            TriviaKind::EndKeyword => self.statement_terminated = false,
            TriviaKind::NewLine | TriviaKind::SemiColon => {
                self.statement_terminated = true;
                self.end_of_statement_required = false;
                self.space_required = false;
            }
            TriviaKind::Comma => self.comma_present = true,
            TriviaKind::Whitespace | TriviaKind::Comment | TriviaKind::Punctuation => {}
        }
        Ok(())
    }

    fn write_statement_terminator(&mut self, can_carry: bool) -> Result<()> {
        if self.end_of_statement_required && !self.statement_terminated && can_carry {
            trace!("Synthesizing statement terminator");
            self.write_text(STATEMENT_TERMINATOR)?;
        }
        self.end_of_statement_required = false;
        self.statement_terminated = false;
        Ok(())
    }

    fn write_pending_space(&mut self) -> Result<()> {
        if self.space_required && !self.output.last_is_whitespace() {
            self.write_text(" ")?;
        }
        self.space_required = false;
        Ok(())
    }

    fn prepare_left_strip(&mut self) {
        if let Some(trailing_whitespace) = self.previous_raw {
            self.left_strip_next_enter = trailing_whitespace;
        }
    }

    fn reset_separators(&mut self) {
        self.space_required = false;
        self.end_of_statement_required = false;
        self.statement_terminated = false;
        self.closing_keyword_required = false;
        self.comma_present = false;
    }

    fn write_percent(&mut self, escape: usize) -> Result<()> {
        for _ in 0..escape {
            self.write_text("%")?;
        }
        Ok(())
    }
}

/// Reject nodes whose classification or trivia contradict each other
fn check_structure(node: &dyn SyntaxNode) -> Result<()> {
    let label = node.label();
    let contradiction = if node.is_raw_text() && node.is_container() {
        Some("is classified as both raw text and a container")
    } else if node.is_raw_text() && node.is_loop_statement() {
        Some("is classified as both raw text and a loop")
    } else if node.is_container() && node.is_loop_statement() {
        Some("is classified as both a container and a loop")
    } else if node.is_while_kind() && !node.is_loop_statement() {
        Some("is while-kind without being a loop")
    } else if node.is_raw_text() && !node.closing_keyword().is_none() {
        Some("is raw text but owns a closing keyword")
    } else if node
        .trivia()
        .is_some_and(|bundle| bundle.iter().any(|t| t.kind == TriviaKind::EndKeyword))
    {
        Some("carries end keyword trivia outside of its closing keyword")
    } else {
        None
    };

    if let Some(reason) = contradiction {
        return Err(StencilError::structural(format!("{label} {reason}")));
    }

    if let ClosingKeyword::Explicit(items) = node.closing_keyword() {
        let keywords = items
            .iter()
            .filter(|t| t.kind == TriviaKind::EndKeyword)
            .count();
        if keywords != 1 {
            return Err(StencilError::structural(format!(
                "{label} closing trivia must hold exactly one end keyword, found {keywords}"
            )));
        }
    }

    Ok(())
}

/// Render a tree into a fresh string
pub fn render_to_string(node: &dyn SyntaxNode, options: &RenderOptions) -> Result<String> {
    let mut output = StringOutput::new();
    Renderer::new(&mut output, options.clone()).render(node)?;
    Ok(output.into_string())
}

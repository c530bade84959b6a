//! Round-trip validation for rendered templates
//!
//! A tree captured with trivia must render back to its exact source text.
//! This module renders a tree, compares the result with the source, and
//! locates the first divergence so a broken writer can be found quickly.
//!
//! It also scans rendered text for delimiter problems: a `{{` opened while
//! already in code, a close with no open, or a code region left open.
//!
//! # Example
//!
//! ```rust
//! use stencil_core::cst::builder::{WithTrivia, document, expr, ident, ws};
//! use stencil_core::cst::round_trip::RoundTripValidator;
//!
//! let tree = document(vec![
//!     expr(ident("name").with_after(vec![ws(" ")])).with_before(vec![ws(" ")]),
//! ]);
//!
//! let result = RoundTripValidator::new()
//!     .validate_round_trip(&tree, "{{ name }}")
//!     .unwrap();
//! assert!(result.is_valid());
//! ```

use super::node::SyntaxNode;
use super::renderer::{RenderOptions, render_to_string};
use crate::Result;
use std::fmt;
use tracing::debug;

/// How much text is quoted on each side of a divergence
const SNIPPET_LEN: usize = 20;

/// Result of a round-trip validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the rendered text matched
    pub is_valid: bool,
    /// Text the tree was expected to render to
    pub original: String,
    /// Text the tree actually rendered to
    pub rendered: String,
    /// First divergence between the two (if any)
    pub differences: Vec<TextDifference>,
    /// Delimiter problems found in the rendered text
    pub delimiter_issues: Vec<DelimiterIssue>,
}

impl ValidationResult {
    /// Check if the round-trip validation passed
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Human readable summary of every problem
    pub fn issues(&self) -> Vec<String> {
        self.differences
            .iter()
            .map(ToString::to_string)
            .chain(self.delimiter_issues.iter().map(ToString::to_string))
            .collect()
    }
}

/// Types of text differences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceKind {
    /// Rendered text stops before the source does
    Missing,
    /// Rendered text continues past the end of the source
    Extra,
    /// Both continue but with different characters
    Changed,
}

/// Where and how rendered text first diverges from its source
#[derive(Debug, Clone, PartialEq)]
pub struct TextDifference {
    pub kind: DifferenceKind,
    /// Byte offset of the divergence
    pub offset: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column, in characters
    pub column: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for TextDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = |text: &Option<String>| match text {
            Some(text) => format!("{text:?}"),
            None => "end of text".to_string(),
        };
        write!(
            f,
            "{}:{}: expected {}, rendered {}",
            self.line,
            self.column,
            describe(&self.expected),
            describe(&self.actual)
        )
    }
}

/// A delimiter that breaks text/code alternation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterIssue {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub description: String,
}

impl fmt::Display for DelimiterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.description)
    }
}

/// Round-trip validator for template trees
#[derive(Debug, Clone, Default)]
pub struct RoundTripValidator {
    options: RenderOptions,
}

impl RoundTripValidator {
    /// Create a new round-trip validator with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new round-trip validator with custom render options
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render `tree` and compare it with the source it was captured from
    ///
    /// Delimiter issues are reported for information only; a tree whose
    /// source text was itself irregular still round-trips.
    pub fn validate_round_trip(
        &self,
        tree: &dyn SyntaxNode,
        source: &str,
    ) -> Result<ValidationResult> {
        let rendered = render_to_string(tree, &self.options)?;
        let differences: Vec<_> = first_difference(source, &rendered).into_iter().collect();
        let delimiter_issues = check_delimiters(&rendered);

        debug!(
            valid = differences.is_empty(),
            delimiter_issues = delimiter_issues.len(),
            "Validated round trip"
        );

        Ok(ValidationResult {
            is_valid: differences.is_empty(),
            original: source.to_string(),
            rendered,
            differences,
            delimiter_issues,
        })
    }

    /// Render `tree` and require its output to be well delimited
    ///
    /// Nothing is compared; `original` and `rendered` both hold the output.
    pub fn validate_well_formed(&self, tree: &dyn SyntaxNode) -> Result<ValidationResult> {
        let rendered = render_to_string(tree, &self.options)?;
        let delimiter_issues = check_delimiters(&rendered);

        debug!(
            delimiter_issues = delimiter_issues.len(),
            "Validated delimiters"
        );

        Ok(ValidationResult {
            is_valid: delimiter_issues.is_empty(),
            original: rendered.clone(),
            rendered,
            differences: Vec::new(),
            delimiter_issues,
        })
    }

    /// Check that re-rendering is a fixed point
    ///
    /// `synthesized` is rendered first. `reparsed` is the tree captured from
    /// that output, and it must render back to it byte for byte.
    pub fn validate_idempotence(
        &self,
        synthesized: &dyn SyntaxNode,
        reparsed: &dyn SyntaxNode,
    ) -> Result<ValidationResult> {
        let first = render_to_string(synthesized, &self.options)?;
        let mut result = self.validate_round_trip(reparsed, &first)?;
        result.is_valid = result.is_valid && result.delimiter_issues.is_empty();
        Ok(result)
    }
}

/// Locate the first divergence between `expected` and `actual`
pub fn first_difference(expected: &str, actual: &str) -> Option<TextDifference> {
    let offset = expected
        .char_indices()
        .zip(actual.chars())
        .find(|&((_, a), b)| a != b)
        .map(|((offset, _), _)| offset)
        .unwrap_or_else(|| expected.len().min(actual.len()));

    let expected_rest = &expected[offset..];
    let actual_rest = &actual[offset..];
    let kind = match (expected_rest.is_empty(), actual_rest.is_empty()) {
        (true, true) => return None,
        (false, true) => DifferenceKind::Missing,
        (true, false) => DifferenceKind::Extra,
        (false, false) => DifferenceKind::Changed,
    };

    let (line, column) = line_column(expected, offset);
    Some(TextDifference {
        kind,
        offset,
        line,
        column,
        expected: snippet(expected_rest),
        actual: snippet(actual_rest),
    })
}

/// Scan text for delimiter problems, honoring escape levels and string literals
pub fn check_delimiters(text: &str) -> Vec<DelimiterIssue> {
    let bytes = text.as_bytes();
    let mut issues = Vec::new();
    // (offset, escape level) of the open code region
    let mut open: Option<(usize, usize)> = None;
    let mut quote: Option<u8> = None;
    let mut index = 0;

    while index < bytes.len() {
        match open {
            None => {
                if let Some((level, len)) = match_delimiter(bytes, index, b'{') {
                    open = Some((index, level));
                    index += len;
                    continue;
                }
                if let Some((_, len)) = match_delimiter(bytes, index, b'}') {
                    issues.push(issue(text, index, "closing delimiter outside of a code region"));
                    index += len;
                    continue;
                }
            }
            Some((_, level)) => {
                // Escape blocks are verbatim up to their own closing delimiter
                if level == 0 {
                    if let Some(q) = quote {
                        if bytes[index] == b'\\' {
                            index += 2;
                            continue;
                        }
                        if bytes[index] == q {
                            quote = None;
                        }
                        index += 1;
                        continue;
                    }
                    if matches!(bytes[index], b'"' | b'\'' | b'`') {
                        quote = Some(bytes[index]);
                        index += 1;
                        continue;
                    }
                }

                if let Some((close_level, len)) = match_delimiter(bytes, index, b'}')
                    && close_level == level
                {
                    open = None;
                    index += len;
                    continue;
                }

                if level == 0
                    && let Some((_, len)) = match_delimiter(bytes, index, b'{')
                {
                    issues.push(issue(text, index, "code region opened inside a code region"));
                    index += len;
                    continue;
                }
            }
        }
        index += 1;
    }

    if let Some((start, _)) = open {
        let description = if quote.is_some() {
            "code region is never closed (unterminated string literal)"
        } else {
            "code region is never closed"
        };
        issues.push(issue(text, start, description));
    }

    issues
}

/// Match `brace`, any number of `%`, `brace` at `at`; returns (level, length)
fn match_delimiter(bytes: &[u8], at: usize, brace: u8) -> Option<(usize, usize)> {
    if bytes.get(at) != Some(&brace) {
        return None;
    }
    let mut end = at + 1;
    while bytes.get(end) == Some(&b'%') {
        end += 1;
    }
    (bytes.get(end) == Some(&brace)).then(|| (end - at - 1, end - at + 1))
}

fn issue(text: &str, offset: usize, description: &str) -> DelimiterIssue {
    let (line, column) = line_column(text, offset);
    DelimiterIssue {
        offset,
        line,
        column,
        description: description.to_string(),
    }
}

fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, before[line_start..].chars().count() + 1)
}

fn snippet(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.chars().take(SNIPPET_LEN).collect())
}

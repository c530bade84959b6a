//! Tests for rendering captured and synthesized trees

use super::builder::*;
use super::*;
use crate::{ErrorKind, Result, StencilError};
use std::cell::Cell;

fn render(tree: &Node) -> String {
    render_to_string(tree, &RenderOptions::default()).unwrap()
}

/// Loop node whose writer fails after recording what it saw
struct FailingLoop {
    is_while: bool,
    seen_depth: Cell<usize>,
    seen_while: Cell<bool>,
}

impl FailingLoop {
    fn new(is_while: bool) -> Self {
        Self {
            is_while,
            seen_depth: Cell::new(0),
            seen_while: Cell::new(false),
        }
    }
}

impl SyntaxNode for FailingLoop {
    fn is_loop_statement(&self) -> bool {
        true
    }

    fn is_while_kind(&self) -> bool {
        self.is_while
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        None
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        self.seen_depth.set(renderer.loop_depth());
        self.seen_while.set(renderer.is_while_loop());
        Err(StencilError::internal_error("writer failed"))
    }
}

/// Node with configurable classification, writing a fixed token
struct Custom {
    raw: bool,
    container: bool,
    looping: bool,
    while_kind: bool,
    statement: bool,
    carries_separator: bool,
    token: &'static str,
}

impl Custom {
    fn statement(token: &'static str) -> Self {
        Self {
            raw: false,
            container: false,
            looping: false,
            while_kind: false,
            statement: true,
            carries_separator: true,
            token,
        }
    }
}

impl SyntaxNode for Custom {
    fn is_raw_text(&self) -> bool {
        self.raw
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn is_loop_statement(&self) -> bool {
        self.looping
    }

    fn is_while_kind(&self) -> bool {
        self.while_kind
    }

    fn is_statement(&self) -> bool {
        self.statement
    }

    fn can_carry_leading_separator(&self) -> bool {
        self.carries_separator
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        None
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        renderer.write_text(self.token)?;
        renderer.expect_end_of_statement();
        Ok(())
    }
}

/// Container over arbitrary nodes
struct Sequence(Vec<Box<dyn SyntaxNode>>);

impl SyntaxNode for Sequence {
    fn is_container(&self) -> bool {
        true
    }

    fn trivia(&self) -> Option<&TriviaBundle> {
        None
    }

    fn write_content(&self, renderer: &mut Renderer<'_>) -> Result<()> {
        for node in &self.0 {
            renderer.write(node.as_ref())?;
        }
        Ok(())
    }
}

#[test]
fn test_captured_for_loop_round_trips() {
    let tree = document(vec![
        for_loop(
            ident("item").with_before(vec![ws(" ")]).with_after(vec![ws(" ")]),
            ident("items").with_before(vec![ws(" ")]).with_after(vec![ws(" ")]),
            vec![raw("Hi").captured()],
        )
        .with_before(vec![ws(" ")])
        .with_end(vec![ws(" "), end_kw(), ws(" ")]),
    ]);

    assert_eq!(render(&tree), "{{ for item in items }}Hi{{ end }}");
}

#[test]
fn test_synthesized_for_loop() {
    let tree = document(vec![for_loop(
        ident("item"),
        ident("items"),
        vec![raw("Hi")],
    )]);

    assert_eq!(render(&tree), "{{for item in items}}Hi{{end}}");
}

#[test]
fn test_adjacent_statements_get_terminator() {
    let tree = document(vec![expr(ident("x")), expr(ident("y"))]);
    assert_eq!(render(&tree), "{{x; y}}");
}

#[test]
fn test_newline_trivia_terminates_statement() {
    let tree = document(vec![
        expr(ident("x")).with_after(vec![nl()]),
        expr(ident("y")),
    ]);
    assert_eq!(render(&tree), "{{x\ny}}");
}

#[test]
fn test_semicolon_trivia_terminates_statement() {
    let tree = document(vec![
        expr(ident("x")).with_after(vec![semi()]),
        expr(ident("y")),
    ]);
    assert_eq!(render(&tree), "{{x;y}}");
}

#[test]
fn test_comment_trivia_is_replayed() {
    let tree = document(vec![
        expr(ident("x")).with_after(vec![ws(" "), comment("# note"), nl()]),
        expr(ident("y")),
    ]);
    assert_eq!(render(&tree), "{{x # note\ny}}");
}

#[test]
fn test_empty_raw_separates_code_regions() {
    let tree = document(vec![expr(ident("x")), raw(""), expr(ident("y"))]);
    assert_eq!(render(&tree), "{{x}}{{y}}");
}

#[test]
fn test_code_body_and_empty_body() {
    let tree = document(vec![for_loop(
        ident("x"),
        ident("y"),
        vec![expr(ident("x"))],
    )]);
    assert_eq!(render(&tree), "{{for x in y; x; end}}");

    let tree = document(vec![for_loop(ident("a"), ident("b"), vec![])]);
    assert_eq!(render(&tree), "{{for a in b; end}}");
}

#[test]
fn test_text_only_document() {
    let tree = document(vec![raw("just text\n")]);
    assert_eq!(render(&tree), "just text\n");
}

#[test]
fn test_strip_markers_follow_raw_trivia() {
    let tree = document(vec![
        raw("Hi").with_after(vec![ws(" ")]),
        expr(ident("x").with_after(vec![ws(" ")])).with_before(vec![ws(" ")]),
        raw("there").with_before(vec![ws(" ")]),
    ]);
    assert_eq!(render(&tree), "Hi {{~ x ~}} there");
}

#[test]
fn test_strip_marker_is_not_carried_over() {
    let tree = document(vec![
        raw("a").with_after(vec![ws(" ")]),
        expr(ident("x")),
        raw("b"),
        expr(ident("y")),
    ]);
    assert_eq!(render(&tree), "a {{~x}}b{{y}}");
}

#[test]
fn test_newline_counts_as_strippable_whitespace() {
    let tree = document(vec![
        raw("line").with_after(vec![nl()]),
        expr(ident("x")),
    ]);
    assert_eq!(render(&tree), "line\n{{~x}}");
}

#[test]
fn test_implicit_end_after_stripped_text() {
    let tree = document(vec![for_loop(
        ident("item"),
        ident("items"),
        vec![raw("Hi").with_after(vec![ws(" ")])],
    )]);
    assert_eq!(render(&tree), "{{for item in items}}Hi {{~end}}");
}

#[test]
fn test_explicit_end_replays_separator() {
    let tree = document(vec![
        for_loop(ident("x"), ident("xs"), vec![expr(ident("x"))])
            .with_end(vec![nl(), end_kw()]),
    ]);
    assert_eq!(render(&tree), "{{for x in xs; x\nend}}");
}

#[test]
fn test_explicit_end_without_separator_gets_terminator() {
    let tree = document(vec![
        for_loop(ident("x"), ident("xs"), vec![expr(ident("x"))]).with_end(vec![end_kw()]),
    ]);
    assert_eq!(render(&tree), "{{for x in xs; x; end}}");
}

#[test]
fn test_statement_after_block_is_terminated() {
    let tree = document(vec![
        for_loop(ident("x"), ident("xs"), vec![]),
        expr(ident("done")),
    ]);
    assert_eq!(render(&tree), "{{for x in xs; end; done}}");
}

#[test]
fn test_if_else_across_text() {
    let tree = document(vec![if_else(
        ident("a"),
        vec![raw("yes")],
        vec![raw("no")],
    )]);
    assert_eq!(render(&tree), "{{if a}}yes{{else}}no{{end}}");
}

#[test]
fn test_if_with_loop_control() {
    let tree = document(vec![while_loop(
        ident("go"),
        vec![if_then(ident("done"), vec![break_stmt()]), continue_stmt()],
    )]);
    assert_eq!(
        render(&tree),
        "{{while go; if done; break; end; continue; end}}"
    );
}

#[test]
fn test_loop_variable_follows_nearest_loop() {
    let tree = document(vec![while_loop(
        ident("go"),
        vec![
            for_loop(ident("x"), ident("xs"), vec![expr(loop_var("index"))]),
            expr(loop_var("index")),
        ],
    )]);
    assert_eq!(
        render(&tree),
        "{{while go; for x in xs; for.index; end; while.index; end}}"
    );
}

#[test]
fn test_loop_variable_outside_loops() {
    let tree = document(vec![expr(loop_var("index"))]);
    assert_eq!(render(&tree), "{{for.index}}");
}

#[test]
fn test_synthesized_commas() {
    let tree = document(vec![expr(array(vec![
        literal("1"),
        literal("2"),
        literal("3"),
    ]))]);
    assert_eq!(render(&tree), "{{[1, 2, 3]}}");
}

#[test]
fn test_captured_commas_are_not_duplicated() {
    let tree = document(vec![expr(array(vec![
        literal("1").with_after(vec![comma()]),
        literal("2").with_after(vec![comma(), ws(" ")]),
        literal("3"),
    ]))]);
    assert_eq!(render(&tree), "{{[1,2, 3]}}");
}

#[test]
fn test_compact_commas() {
    let tree = document(vec![expr(array(vec![ident("a"), ident("b")]))]);
    let compact = RenderOptions {
        space_after_comma: false,
        ..RenderOptions::default()
    };
    assert_eq!(render_to_string(&tree, &compact).unwrap(), "{{[a,b]}}");
}

#[test]
fn test_single_item_list_has_no_comma() {
    let tree = document(vec![expr(array(vec![literal("1")]))]);
    assert_eq!(render(&tree), "{{[1]}}");
}

#[test]
fn test_binary_spacing_options() {
    let tree = document(vec![expr(binary(ident("a"), "+", literal("1")))]);
    assert_eq!(render(&tree), "{{a + 1}}");

    let compact = RenderOptions {
        spaces_around_operators: false,
        ..RenderOptions::default()
    };
    assert_eq!(render_to_string(&tree, &compact).unwrap(), "{{a+1}}");
}

#[test]
fn test_captured_binary_keeps_source_spacing() {
    let tree = document(vec![
        expr(binary(ident("a").captured(), "+", literal("1").captured()).captured()).captured(),
    ]);
    assert_eq!(render(&tree), "{{a+1}}");
}

#[test]
fn test_escape_blocks() {
    let tree = document(vec![raw("a"), escape(1, "{{ raw }}"), raw("b")]);
    assert_eq!(render(&tree), "a{%{{{ raw }}}%}b");

    let tree = document(vec![expr(ident("x")), escape(2, "y")]);
    assert_eq!(render(&tree), "{{x}}{%%{y}%%}");
}

#[test]
fn test_escape_level_zero_is_rejected() {
    let tree = document(vec![escape(0, "x"), raw("y")]);
    let error = render_to_string(&tree, &RenderOptions::default()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Structural);
    assert!(error.to_string().contains("escape level"));

    let tree = Node::from_json(
        r#"{"kind": "document", "children": [{"kind": "escape", "level": 0, "text": "x"}]}"#,
    )
    .unwrap();
    assert!(render_to_string(&tree, &RenderOptions::default()).is_err());
}

#[test]
fn test_render_ends_in_text_mode() {
    let tree = document(vec![expr(ident("x"))]);
    let mut output = StringOutput::new();
    let mut renderer = Renderer::new(&mut output, RenderOptions::default());

    renderer.render(&tree).unwrap();
    assert_eq!(renderer.mode(), Mode::Text);
    assert!(!renderer.is_in_code());
    drop(renderer);
    assert_eq!(output.as_str(), "{{x}}");
}

#[test]
fn test_renderer_is_reusable() {
    let first = document(vec![expr(ident("x"))]);
    let second = document(vec![raw("a").with_after(vec![ws(" ")])]);
    let mut output = StringOutput::new();
    let mut renderer = Renderer::new(&mut output, RenderOptions::default());

    renderer.render(&first).unwrap();
    renderer.render(&second).unwrap();
    drop(renderer);
    assert_eq!(output.as_str(), "{{x}}a ");
}

#[test]
fn test_writer_output_sink() {
    let tree = document(vec![raw("Hello "), expr(ident("name"))]);
    let mut output = WriterOutput::new(Vec::new());
    Renderer::new(&mut output, RenderOptions::default())
        .render(&tree)
        .unwrap();

    let bytes = output.into_inner().unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "Hello {{name}}");
}

#[test]
fn test_loop_stack_is_empty_after_writer_error() {
    let node = FailingLoop::new(true);
    let mut output = StringOutput::new();
    let mut renderer = Renderer::new(&mut output, RenderOptions::default());

    let error = renderer.render(&node).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Internal);
    assert_eq!(node.seen_depth.get(), 1);
    assert!(node.seen_while.get());
    assert_eq!(renderer.loop_depth(), 0);
}

#[test]
fn test_contradictory_classification_is_rejected() {
    let node = Custom {
        raw: true,
        container: true,
        ..Custom::statement("x")
    };
    let error = render_to_string(&node, &RenderOptions::default()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Structural);

    let node = Custom {
        while_kind: true,
        ..Custom::statement("x")
    };
    let error = render_to_string(&node, &RenderOptions::default()).unwrap_err();
    assert!(error.to_string().contains("while-kind"));

    let node = Custom {
        container: true,
        looping: true,
        ..Custom::statement("x")
    };
    assert!(render_to_string(&node, &RenderOptions::default()).is_err());
}

#[test]
fn test_end_keyword_outside_closing_list_is_rejected() {
    let tree = document(vec![expr(ident("x").with_after(vec![end_kw()]))]);
    let error = render_to_string(&tree, &RenderOptions::default()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Structural);
}

#[test]
fn test_closing_list_needs_exactly_one_end_keyword() {
    let none = document(vec![
        for_loop(ident("x"), ident("xs"), vec![]).with_end(vec![ws(" ")]),
    ]);
    assert!(render_to_string(&none, &RenderOptions::default()).is_err());

    let two = document(vec![
        for_loop(ident("x"), ident("xs"), vec![]).with_end(vec![end_kw(), end_kw()]),
    ]);
    let error = render_to_string(&two, &RenderOptions::default()).unwrap_err();
    assert!(error.to_string().contains("found 2"));
}

#[test]
fn test_statement_that_cannot_carry_separator() {
    // Writes its own newline separator, so a synthesized `; ` must not precede it
    let mut own_separator = Custom::statement("\nz");
    own_separator.carries_separator = false;
    let nodes: Vec<Box<dyn SyntaxNode>> = vec![
        Box::new(expr(ident("x"))),
        Box::new(own_separator),
        Box::new(Custom::statement("w")),
    ];
    let tree = Sequence(nodes);

    let text = render_to_string(&tree, &RenderOptions::default()).unwrap();
    assert_eq!(text, "{{x\nz; w}}");
    assert!(round_trip::check_delimiters(&text).is_empty());
}

#[test]
fn test_tree_round_trips_through_json() {
    let tree = document(vec![
        raw("Hi ").captured(),
        for_loop(ident("x"), ident("xs"), vec![expr(ident("x"))]).with_end(vec![end_kw()]),
    ]);
    let json = tree.to_json_pretty().unwrap();
    let parsed = Node::from_json(&json).unwrap();

    assert_eq!(parsed, tree);
    assert_eq!(render(&parsed), render(&tree));
}

#[test]
fn test_invalid_json_is_a_serialization_error() {
    let error = Node::from_json(r#"{"kind": "nope"}"#).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Serialization);
}

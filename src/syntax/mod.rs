//! Go source parsing using tree-sitter.
//!
//! Parses `.go` files into a [`ParsedFile`] and exposes the few node shapes
//! the extractor dispatches on: string literals, call expressions and
//! comments.

mod go;
mod unquote;

use std::cell::RefCell;
use std::path::PathBuf;

use smallvec::SmallVec;
use thiserror::Error;
use tree_sitter::{Node, Parser};

pub use go::{parse_file, parse_source, ParsedFile};
pub use unquote::unquote;

// Thread-local parser caching to avoid re-initialization overhead. Directory
// scans parse on rayon workers, so each worker keeps its own parser.
//
// No panics here: grammar loading can fail and library code stays panic-free.
thread_local! {
    static GO_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn init_go_parser() -> Result<Parser, SyntaxError> {
    let mut p = Parser::new();
    p.set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|_| SyntaxError::ParserInit)?;
    Ok(p)
}

/// Execute a function with a cached Go parser.
pub(crate) fn with_go_parser<F, R>(f: F) -> Result<R, SyntaxError>
where
    F: FnOnce(&mut Parser) -> R,
{
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(init_go_parser()?);
        }

        let parser = slot.as_mut().ok_or(SyntaxError::ParserInit)?;
        Ok(f(parser))
    })
}

/// Errors produced while reading or parsing a source file.
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("failed to initialize Go parser")]
    ParserInit,

    #[error("parse error in {path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("failed to read file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file is not valid UTF-8: {path}")]
    NotUtf8 { path: PathBuf },
}

/// The node shapes the extractor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An interpreted (`"..."`) or raw (`` `...` ``) string literal.
    Literal,
    CallExpression,
    Comment,
    Other,
}

impl NodeKind {
    pub fn of(node: Node) -> Self {
        match node.kind() {
            "interpreted_string_literal" | "raw_string_literal" => NodeKind::Literal,
            "call_expression" => NodeKind::CallExpression,
            "comment" => NodeKind::Comment,
            _ => NodeKind::Other,
        }
    }
}

/// Visit every node below (and including) `root` in document order.
///
/// Uses a tree cursor rather than recursion so deeply nested expressions
/// cannot exhaust the stack.
pub fn visit_preorder<'t, F>(root: Node<'t>, mut f: F)
where
    F: FnMut(Node<'t>),
{
    let mut cursor = root.walk();
    loop {
        f(cursor.node());

        if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Name of the function a call expression invokes.
///
/// `T("x")` yields `T`, `i18n.T("x")` yields `T`. Calls through other
/// expressions (closures, index expressions) have no name.
pub fn callee_name<'s>(call: Node, source: &'s str) -> Option<&'s str> {
    let function = call.child_by_field_name("function")?;
    match function.kind() {
        "identifier" => Some(node_text(function, source)),
        "selector_expression" => function
            .child_by_field_name("field")
            .map(|field| node_text(field, source)),
        _ => None,
    }
}

/// Arguments of a call expression, comments excluded.
pub fn call_arguments<'t>(call: Node<'t>) -> SmallVec<[Node<'t>; 4]> {
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return SmallVec::new();
    };

    let mut cursor = arguments.walk();
    arguments
        .named_children(&mut cursor)
        .filter(|arg| NodeKind::of(*arg) != NodeKind::Comment)
        .collect()
}

/// Find a child node by kind.
pub(crate) fn find_child_by_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    node.children(&mut node.walk()).find(|c| c.kind() == kind)
}

/// Extract node text from content.
pub(crate) fn node_text<'s>(node: Node, content: &'s str) -> &'s str {
    &content[node.byte_range()]
}

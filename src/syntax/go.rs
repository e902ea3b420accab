//! Parsed Go files.

use std::path::{Path, PathBuf};

use smallvec::SmallVec;
use tree_sitter::{Node, Tree};

use super::{find_child_by_kind, node_text, unquote, with_go_parser, SyntaxError};

/// A Go source file together with its syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    path: PathBuf,
    source: String,
    tree: Tree,
    line_starts: Vec<usize>,
    /// Decoded import paths, in declaration order.
    pub imports: SmallVec<[String; 8]>,
}

impl ParsedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text of a node of this file.
    pub fn text(&self, node: Node) -> &str {
        node_text(node, &self.source)
    }

    /// The 0-indexed source line `row`, without its line terminator.
    pub fn line(&self, row: usize) -> Option<&str> {
        let start = *self.line_starts.get(row)?;
        let end = self
            .line_starts
            .get(row + 1)
            .copied()
            .unwrap_or(self.source.len());
        let line = self.source.get(start..end)?;
        Some(line.trim_end_matches(['\n', '\r']))
    }
}

/// Read and parse a Go file from disk.
pub fn parse_file(path: &Path) -> Result<ParsedFile, SyntaxError> {
    let bytes = std::fs::read(path).map_err(|source| SyntaxError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let source = String::from_utf8(bytes).map_err(|_| SyntaxError::NotUtf8 {
        path: path.to_path_buf(),
    })?;
    parse_source(path, source)
}

/// Parse Go source code.
///
/// Fails when the tree contains error or missing nodes; the position of the
/// first one is reported.
pub fn parse_source(path: impl Into<PathBuf>, source: String) -> Result<ParsedFile, SyntaxError> {
    let path = path.into();

    let tree = with_go_parser(|parser| parser.parse(&source, None))?.ok_or_else(|| {
        SyntaxError::Parse {
            path: path.clone(),
            line: 1,
            column: 1,
            message: "failed to parse".to_string(),
        }
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let node = first_error(root).unwrap_or(root);
        let position = node.start_position();
        return Err(SyntaxError::Parse {
            path,
            line: position.row + 1,
            column: position.column + 1,
            message: describe_error(node, &source),
        });
    }

    let imports = collect_imports(root, &source);
    let line_starts = std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect();

    Ok(ParsedFile {
        path,
        source,
        tree,
        line_starts,
        imports,
    })
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let children: SmallVec<[Node; 8]> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn describe_error(node: Node, source: &str) -> String {
    if node.is_missing() {
        return format!("missing {}", node.kind());
    }

    let text = node_text(node, source);
    let snippet: String = text.lines().next().unwrap_or_default().chars().take(40).collect();
    if snippet.is_empty() {
        "syntax error".to_string()
    } else {
        format!("unexpected `{snippet}`")
    }
}

fn collect_imports(root: Node, content: &str) -> SmallVec<[String; 8]> {
    let mut imports = SmallVec::new();

    for child in root.children(&mut root.walk()) {
        if child.kind() != "import_declaration" {
            continue;
        }

        if let Some(list) = find_child_by_kind(child, "import_spec_list") {
            for spec in list.children(&mut list.walk()) {
                if spec.kind() == "import_spec" {
                    imports.extend(import_path(spec, content));
                }
            }
        } else if let Some(spec) = find_child_by_kind(child, "import_spec") {
            imports.extend(import_path(spec, content));
        }
    }

    imports
}

fn import_path(spec: Node, content: &str) -> Option<String> {
    let path = spec.child_by_field_name("path")?;
    unquote(node_text(path, content))
}

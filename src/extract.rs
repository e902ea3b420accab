//! Tree walking: collects translatable strings from one parsed file.

use std::path::{Path, PathBuf};

use tracing::debug;
use tree_sitter::Node;

use crate::classify::{classify, Candidate, Decision};
use crate::locales::CommentIndex;
use crate::patterns::PatternSet;
use crate::results::{ExtractedString, ResultSet};
use crate::syntax::{self, call_arguments, callee_name, visit_preorder, NodeKind, ParsedFile, SyntaxError};

/// Extract strings from a Go file on disk.
pub fn extract_path(path: &Path, patterns: &PatternSet) -> Result<ResultSet, SyntaxError> {
    let parsed = syntax::parse_file(path)?;
    Ok(extract_strings(&parsed, patterns))
}

/// Extract strings from Go source held in memory.
pub fn extract_source(
    path: impl Into<PathBuf>,
    source: String,
    patterns: &PatternSet,
) -> Result<ResultSet, SyntaxError> {
    let parsed = syntax::parse_source(path, source)?;
    Ok(extract_strings(&parsed, patterns))
}

/// Walk a parsed file and collect every accepted literal.
///
/// Literals are classified wherever they appear. Arguments of enforced
/// function calls, and literal arguments of calls nested directly inside
/// them, are classified a second time with line exclusion disabled.
pub fn extract_strings(file: &ParsedFile, patterns: &PatternSet) -> ResultSet {
    let mut results = ResultSet::new();
    let mut walker = Walker {
        file,
        patterns,
        comments: CommentIndex::build(file),
        results: &mut results,
    };

    visit_preorder(file.root(), |node| walker.visit(node));

    debug!(path = %file.path().display(), strings = results.len(), "walked file");
    results
}

struct Walker<'a> {
    file: &'a ParsedFile,
    patterns: &'a PatternSet,
    comments: CommentIndex,
    results: &'a mut ResultSet,
}

impl Walker<'_> {
    fn visit(&mut self, node: Node) {
        match NodeKind::of(node) {
            NodeKind::Literal => self.process_literal(node, false),
            NodeKind::CallExpression => self.process_call(node),
            NodeKind::Comment | NodeKind::Other => {}
        }
    }

    fn process_call(&mut self, call: Node) {
        let Some(name) = callee_name(call, self.file.source()) else {
            return;
        };
        if !self.patterns.is_enforced(name) {
            return;
        }

        for arg in call_arguments(call) {
            match NodeKind::of(arg) {
                NodeKind::Literal => self.process_literal(arg, true),
                // e.g. T(fmt.Sprintf("%d files", n))
                NodeKind::CallExpression => {
                    for inner in call_arguments(arg) {
                        if NodeKind::of(inner) == NodeKind::Literal {
                            self.process_literal(inner, true);
                        }
                    }
                }
                NodeKind::Comment | NodeKind::Other => {}
            }
        }
    }

    fn process_literal(&mut self, node: Node, must_include: bool) {
        let position = node.start_position();
        let candidate = Candidate {
            raw: self.file.text(node),
            source_line: self.file.line(position.row),
            must_include,
        };

        let decision = classify(&candidate, self.patterns, &self.file.imports);
        if let Decision::Reject(reason) = decision {
            debug!(literal = candidate.raw, ?reason, line = position.row + 1, "rejected");
            return;
        }
        let Some(value) = decision.into_value() else {
            return;
        };

        self.results.record(ExtractedString {
            filename: self.file.path().to_path_buf(),
            value,
            offset: node.start_byte(),
            line: position.row + 1,
            column: position.column + 1,
            locales: self.comments.locales_for(node),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{CaptureGroupSubstrings, ExcludedStrings};

    fn extract(code: &str, excluded: ExcludedStrings, captures: &[&str]) -> ResultSet {
        let patterns = PatternSet::from_documents(
            excluded,
            CaptureGroupSubstrings {
                capture_group_substrings: captures.iter().map(|s| s.to_string()).collect(),
            },
        );
        extract_source("main.go", code.to_string(), &patterns).unwrap()
    }

    #[test]
    fn test_extracts_literals_with_positions() {
        let code = "package main\n\nfunc main() {\n\tprintln(\"Hello\")\n}\n";
        let results = extract(code, ExcludedStrings::default(), &[]);

        assert_eq!(results.len(), 1);
        let hello = results.get("Hello").unwrap();
        assert_eq!(hello.filename, PathBuf::from("main.go"));
        assert_eq!(hello.line, 4);
        assert_eq!(hello.column, 10);
        assert_eq!(hello.offset, code.find("\"Hello\"").unwrap());
        assert_eq!(hello.locales, None);
    }

    #[test]
    fn test_import_paths_never_extracted() {
        let code = r#"
package main

import (
    "fmt"
    "net/http"
)

func main() {
    fmt.Println("net/http")
    fmt.Println("Serving requests")
    _ = http.StatusOK
}
"#;
        let results = extract(code, ExcludedStrings::default(), &[]);

        assert!(!results.contains("fmt"));
        assert!(!results.contains("net/http"));
        assert!(results.contains("Serving requests"));
    }

    #[test]
    fn test_enforced_function_overrides_line_exclusion() {
        let code = r#"
package main

func main() {
    log.Debug(i18n.T("Visible message"))
    log.Debug("Debug only")
    log.Debug(i18n.T("known noise"))
}
"#;
        let excluded = ExcludedStrings {
            excluded_strings: vec!["known noise".into()],
            excluded_lines: vec!["log.Debug".into()],
            enforced_funcs: vec!["T".into()],
            ..Default::default()
        };
        let results = extract(code, excluded, &[]);

        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["Visible message"]);
    }

    #[test]
    fn test_enforced_function_unwraps_one_call_level() {
        let code = r#"
package main

func main() {
    skip(T(fmt.Sprintf("%d files copied", n), "second arg"))
    skip(T(wrap(fmt.Sprintf("too deep"))))
}
"#;
        let excluded = ExcludedStrings {
            excluded_lines: vec!["skip(".into()],
            enforced_funcs: vec!["T".into()],
            ..Default::default()
        };
        let results = extract(code, excluded, &[]);

        assert_eq!(
            results.keys().collect::<Vec<_>>(),
            vec!["%d files copied", "second arg"]
        );
    }

    #[test]
    fn test_locale_scoping_and_merge() {
        let code = r#"
package main

func main() {
    // locales:fr
    a := "Bonjour"
    // locales:en
    b := "Bonjour"
    // locales:en,fr
    c := "Hello"
    d := "Everywhere"
    // locales:de
    e := "Everywhere"
}
"#;
        let results = extract(code, ExcludedStrings::default(), &[]);

        let strings = |v: &[&str]| Some(v.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        assert_eq!(results.get("Bonjour").unwrap().locales, strings(&["en", "fr"]));
        assert_eq!(results.get("Bonjour").unwrap().line, 8);
        assert_eq!(results.get("Hello").unwrap().locales, strings(&["en", "fr"]));
        assert_eq!(results.get("Everywhere").unwrap().locales, None);
    }

    #[test]
    fn test_capture_group_extraction() {
        let code = r#"
package main

var key = "prefix_hello_suffix"
var other = "untouched"
"#;
        let excluded = ExcludedStrings {
            excluded_regexps: vec!["hello".into()],
            ..Default::default()
        };
        let results = extract(code, excluded, &[r"prefix_(\w+)_suffix"]);

        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["hello", "untouched"]);
    }

    #[test]
    fn test_non_string_literals_ignored() {
        let code = r#"
package main

var n = 42
var r = 'x'
var s = "text"
"#;
        let results = extract(code, ExcludedStrings::default(), &[]);
        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["text"]);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = extract_source(
            "broken.go",
            "package main\nfunc {".to_string(),
            &PatternSet::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SyntaxError::Parse { .. }));
    }
}

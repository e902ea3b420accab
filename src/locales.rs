//! Locale scoping from `locales:` comment tags.
//!
//! ```go
//! // locales:en,fr
//! msg := "Only shipped to English and French users"
//! ```

use std::sync::OnceLock;

use regex::Regex;
use tree_sitter::Node;

use crate::syntax::{visit_preorder, NodeKind, ParsedFile};

// Compiled once; `None` only if the pattern itself were invalid.
static LOCALES_TAG: OnceLock<Option<Regex>> = OnceLock::new();

fn locales_tag() -> Option<&'static Regex> {
    LOCALES_TAG
        .get_or_init(|| Regex::new(r"locales:([\w\-,]+)").ok())
        .as_ref()
}

/// Parse the locale list of a comment, if it carries a `locales:` tag.
///
/// Empty entries (`en,,fr`) are dropped; a tag with no entries left counts
/// as no tag.
pub fn parse_locale_tag(comment: &str) -> Option<Vec<String>> {
    let captures = locales_tag()?.captures(comment)?;
    let list: Vec<String> = captures
        .get(1)?
        .as_str()
        .split(',')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();

    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

#[derive(Debug, Clone)]
struct Comment {
    start_row: usize,
    end_row: usize,
    /// First token on its line, as opposed to trailing code.
    standalone: bool,
    text: String,
}

/// All comments of a file, ordered by position.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    comments: Vec<Comment>,
}

impl CommentIndex {
    pub fn build(file: &ParsedFile) -> Self {
        let mut comments = Vec::new();
        visit_preorder(file.root(), |node| {
            if NodeKind::of(node) == NodeKind::Comment {
                let start = node.start_position();
                let standalone = file
                    .line(start.row)
                    .and_then(|line| line.get(..start.column))
                    .is_some_and(|before| before.trim().is_empty());
                comments.push(Comment {
                    start_row: start.row,
                    end_row: node.end_position().row,
                    standalone,
                    text: file.text(node).to_string(),
                });
            }
        });
        Self { comments }
    }

    /// Comments attached to a node starting on `row`, top to bottom.
    ///
    /// That is the unbroken run of standalone comment lines directly above
    /// the row, followed by comments sharing the row itself. A comment
    /// trailing code on an earlier line belongs to that code.
    fn attached(&self, row: usize) -> Vec<&Comment> {
        let split = self.comments.partition_point(|c| c.end_row < row);

        let mut above = Vec::new();
        let mut boundary = row;
        for comment in self.comments[..split].iter().rev() {
            let adjacent = comment.end_row + 1 == boundary || comment.end_row == boundary;
            if adjacent && comment.standalone {
                above.push(comment);
                boundary = comment.start_row;
            } else {
                break;
            }
        }
        above.reverse();

        let same_line = self.comments[split..]
            .iter()
            .take_while(|c| c.start_row <= row);

        above.into_iter().chain(same_line).collect()
    }

    /// Locales a node is scoped to; `None` means all locales.
    ///
    /// The first attached comment carrying a tag wins.
    pub fn locales_for(&self, node: Node) -> Option<Vec<String>> {
        self.attached(node.start_position().row)
            .into_iter()
            .find_map(|comment| parse_locale_tag(&comment.text))
    }
}

//! Comment preservation for rewritten nodes.
//!
//! When a rule collapses or replaces declarations, the replacement should
//! keep the documentation that sat on the originals. [`merge`] normalizes the
//! leading comments of one or more nodes into a single [`CommentBlock`];
//! [`attach`] installs that block on a replacement node.

use crate::syntax::tree::{Comment, CommentStyle, NodeId, SourceTree};

/// A normalized block of comment text destined for one replacement node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// `Block` if any merged source comment was block-style, else `Line`.
    pub style: CommentStyle,
    /// Delimiter-stripped, left-trimmed comment lines in source order.
    pub lines: Vec<String>,
    /// Whether any merged source comment was followed by a line break.
    pub trailing_newline: bool,
}

impl CommentBlock {
    /// A block carrying no text at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            style: CommentStyle::Line,
            lines: Vec::new(),
            trailing_newline: false,
        }
    }

    /// Whether the block carries no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// A single-line inline block comment, e.g. the label hint a lowered
    /// named tuple member leaves behind.
    #[must_use]
    pub fn inline(text: &str) -> Self {
        Self {
            style: CommentStyle::Block,
            lines: vec![text.to_owned()],
            trailing_newline: false,
        }
    }
}

/// Collects the leading comments of `nodes` in argument order and normalizes
/// them into one block: delimiters stripped, each line trimmed of leading
/// whitespace, empty edge lines dropped. The result is block-style if any
/// input comment was block-style, and keeps a trailing newline if any input
/// comment had one.
#[must_use]
pub fn merge(tree: &SourceTree, nodes: &[NodeId]) -> CommentBlock {
    let mut style = CommentStyle::Line;
    let mut lines: Vec<String> = Vec::new();
    let mut trailing_newline = false;
    for &node in nodes {
        for comment in tree.leading(node) {
            if comment.style == CommentStyle::Block {
                style = CommentStyle::Block;
            }
            trailing_newline |= comment.trailing_newline;
            lines.extend(strip_delimiters(comment));
        }
    }
    // Delimiter stripping can leave blank lines at the edges; keep interior
    // blanks, drop the rest.
    while lines.first().is_some_and(String::is_empty) {
        lines.remove(0);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    CommentBlock {
        style,
        lines,
        trailing_newline,
    }
}

/// Strips comment delimiters and leading whitespace from every line of one
/// comment.
fn strip_delimiters(comment: &Comment) -> Vec<String> {
    let interior = match comment.style {
        CommentStyle::Line => comment.text.strip_prefix("//").unwrap_or(&comment.text),
        CommentStyle::Block => comment
            .text
            .strip_prefix("/*")
            .and_then(|t| t.strip_suffix("*/"))
            .unwrap_or(&comment.text),
    };
    interior
        .split('\n')
        .map(|line| line.trim().to_owned())
        .collect()
}

/// Returns a copy of `target` carrying `block` as its leading comment, or
/// `target` unchanged if the block is empty. The original node is left
/// untouched; callers splice the returned id in its place.
#[must_use]
pub fn attach(tree: &mut SourceTree, block: &CommentBlock, target: NodeId) -> NodeId {
    if block.is_empty() {
        return target;
    }
    let comment = render(block);
    tree.with_leading(target, vec![comment])
}

/// Renders a block back into a single printable comment.
fn render(block: &CommentBlock) -> Comment {
    let text = match block.style {
        CommentStyle::Line => block
            .lines
            .iter()
            .map(|l| format!("//{l}"))
            .collect::<Vec<_>>()
            .join("\n"),
        CommentStyle::Block => format!("/*{}*/", block.lines.join("\n")),
    };
    Comment {
        style: block.style,
        text,
        trailing_newline: block.trailing_newline,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::syntax::parse;
    use std::path::Path;

    fn first_two_members(src: &str) -> (SourceTree, NodeId, NodeId) {
        use crate::syntax::tree::NodeKind;
        let tree = parse(src, Path::new("test.d.ts")).unwrap();
        let NodeKind::SourceFile { statements, .. } = tree.kind(tree.root()) else {
            unreachable!()
        };
        let NodeKind::ClassDecl { members, .. } = tree.kind(statements[0]) else {
            unreachable!()
        };
        let (a, b) = (members[0], members[1]);
        (tree, a, b)
    }

    #[test]
    fn test_merge_prefers_block_style() {
        let (tree, a, b) = first_two_members(
            "class C {\n    // line one\n    get p(): number;\n    /* block */\n    set p(v: number);\n}\n",
        );
        let block = merge(&tree, &[a, b]);
        assert_eq!(block.style, CommentStyle::Block);
        assert_eq!(block.lines, vec!["line one", "block"]);
        assert!(block.trailing_newline);
    }

    #[test]
    fn test_merge_strips_and_trims() {
        let (tree, a, _) = first_two_members(
            "class C {\n    /**\n     * docs\n     */\n    get p(): number;\n    set p(v: number);\n}\n",
        );
        let block = merge(&tree, &[a]);
        assert_eq!(block.lines, vec!["*", "* docs"]);
    }

    #[test]
    fn test_attach_empty_block_is_identity() {
        let (mut tree, a, _) =
            first_two_members("class C {\n    get p(): number;\n    set p(v: number);\n}\n");
        let attached = attach(&mut tree, &CommentBlock::empty(), a);
        assert_eq!(attached, a);
    }

    #[test]
    fn test_attach_renders_line_block() {
        let (mut tree, a, _) =
            first_two_members("class C {\n    // kept\n    get p(): number;\n    set p(v: number);\n}\n");
        let block = merge(&tree, &[a]);
        let attached = attach(&mut tree, &block, a);
        assert_ne!(attached, a);
        assert_eq!(tree.leading(attached)[0].text, "//kept");
    }
}

//! Parser module for Python source code
//!
//! Integrates with tree-sitter for parsing source text into a syntax tree.
//! A tree whose root contains error or missing nodes is treated as a parse
//! failure: the review pipeline never runs on a partially recovered tree.

use tree_sitter::{Node, Tree};

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to initialize parser: {0}")]
pub struct ParserInitError(String);

/// A successfully parsed compilation unit.
///
/// Owns both the source text and the syntax tree so that node byte ranges
/// can always be sliced back into text.
pub struct ParsedSource {
    source: String,
    tree: Tree,
}

impl std::fmt::Debug for ParsedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedSource")
            .field("source_len", &self.source.len())
            .field("root_kind", &self.tree.root_node().kind())
            .finish()
    }
}

impl ParsedSource {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Slice a node's byte range back into the source text.
    ///
    /// Returns `None` for zero-width nodes (missing/synthetic) or ranges
    /// that do not fall on UTF-8 boundaries.
    pub fn node_text(&self, node: Node<'_>) -> Option<&str> {
        if node.start_byte() == node.end_byte() {
            return None;
        }
        self.source.get(node.byte_range())
    }
}

pub struct PythonParser {
    parser: tree_sitter::Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, ParserInitError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_python::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| ParserInitError(e.to_string()))?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<ParsedSource, ParseError> {
        let Some(tree) = self.parser.parse(source, None) else {
            return Err(ParseError {
                line: 1,
                column: 1,
                message: "parser produced no tree".to_string(),
            });
        };

        let root = tree.root_node();
        if root.has_error() {
            let err = first_error_node(root).unwrap_or(root);
            let pos = err.start_position();
            return Err(ParseError {
                line: pos.row + 1,
                column: pos.column + 1,
                message: if err.is_missing() {
                    format!("missing {}", err.kind())
                } else {
                    "syntax error".to_string()
                },
            });
        }

        Ok(ParsedSource {
            source: source.to_string(),
            tree,
        })
    }
}

fn first_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    None
}

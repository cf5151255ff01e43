//! Structural context analysis over a parsed syntax tree.
//!
//! A single pre-order traversal tags every named node with its enclosing
//! structural context: inside a loop, inside a conditional branch, or
//! neither. The context is carried as a pair of depth counters passed by
//! value into each recursive call, so entering and leaving a scope is
//! symmetric on every exit path.

use tree_sitter::Node;

use crate::parser::{ParseError, ParsedSource, PythonParser};

/// Closed set of syntactic construct labels.
///
/// Grammar kind names are folded into this enum once, at classification
/// time; everything downstream pattern-matches on the variant instead of
/// comparing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    FunctionDef,
    ClassDef,
    For,
    While,
    If,
    Call,
    Assignment,
    Return,
    Expression,
    Other,
}

impl NodeKind {
    pub fn classify(grammar_kind: &str) -> Self {
        match grammar_kind {
            "module" => NodeKind::Module,
            "function_definition" => NodeKind::FunctionDef,
            "class_definition" => NodeKind::ClassDef,
            "for_statement" => NodeKind::For,
            "while_statement" => NodeKind::While,
            "if_statement" => NodeKind::If,
            "call" => NodeKind::Call,
            "assignment" | "augmented_assignment" => NodeKind::Assignment,
            "return_statement" => NodeKind::Return,
            "expression_statement" => NodeKind::Expression,
            _ => NodeKind::Other,
        }
    }

    pub fn is_loop(self) -> bool {
        matches!(self, NodeKind::For | NodeKind::While)
    }

    pub fn is_conditional(self) -> bool {
        matches!(self, NodeKind::If)
    }

    pub fn is_call(self) -> bool {
        matches!(self, NodeKind::Call)
    }
}

/// Traversal-scoped context: counts of currently-open ancestor scopes.
///
/// Depth counters rather than booleans, so a node inside two nested loops
/// stays "in loop" when the inner one closes, and future rules can reason
/// about nesting depth directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextState {
    pub loop_depth: u32,
    pub conditional_depth: u32,
}

impl ContextState {
    pub fn in_loop(self) -> bool {
        self.loop_depth > 0
    }

    pub fn in_conditional(self) -> bool {
        self.conditional_depth > 0
    }

    /// The state seen by the children of a node of the given kind.
    fn entered(self, kind: NodeKind) -> Self {
        let mut next = self;
        if kind.is_loop() {
            next.loop_depth += 1;
        }
        if kind.is_conditional() {
            next.conditional_depth += 1;
        }
        next
    }
}

/// One visited node, annotated with the context strictly enclosing it.
///
/// A node that itself opens a loop or conditional scope is recorded with
/// that flag still `false`: the descriptor is built from the pre-update
/// context, before the traversal descends into the node's own body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub kind: NodeKind,
    pub source_text: Option<String>,
    pub in_loop: bool,
    pub in_conditional: bool,
}

/// Parse `source` and return one descriptor per named node, in pre-order.
pub fn analyze(source: &str) -> Result<Vec<NodeDescriptor>, ParseError> {
    let mut parser = PythonParser::new().map_err(|e| ParseError {
        line: 0,
        column: 0,
        message: e.to_string(),
    })?;
    let parsed = parser.parse(source)?;
    Ok(analyze_parsed(&parsed))
}

/// Traverse an already-parsed source. Never fails.
pub fn analyze_parsed(parsed: &ParsedSource) -> Vec<NodeDescriptor> {
    let mut descriptors = Vec::new();
    walk(parsed, parsed.root(), ContextState::default(), &mut descriptors);
    descriptors
}

fn walk(
    parsed: &ParsedSource,
    node: Node<'_>,
    state: ContextState,
    out: &mut Vec<NodeDescriptor>,
) {
    let kind = NodeKind::classify(node.kind());

    out.push(NodeDescriptor {
        kind,
        source_text: parsed.node_text(node).map(str::to_string),
        in_loop: state.in_loop(),
        in_conditional: state.in_conditional(),
    });

    let child_state = state.entered(kind);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk(parsed, child, child_state, out);
    }
}

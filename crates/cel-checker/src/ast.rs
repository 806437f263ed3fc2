//! Parsed AST input model (§6): an opaque tree with per-node stable ids,
//! kind, children, and source offsets. The checker does not parse; this
//! module only defines the shape a parser hands to `Checker::check`.

use rustc_hash::FxHashMap;

use cel_common::Span;

/// A stable per-node id, assigned by the parser and preserved verbatim into
/// `type_map`/`reference_map` keys of the checked AST.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u64);

/// A CEL literal value.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
}

/// A single field initializer inside a struct-creation node.
#[derive(Clone, Debug, PartialEq)]
pub struct StructEntry {
    pub field: String,
    pub value: ExprId,
    /// `true` for `?field: v` (optional-plugin construction, §4.11).
    pub optional: bool,
}

/// A single key/value pair inside a map-literal node.
#[derive(Clone, Debug, PartialEq)]
pub struct MapEntry {
    pub key: ExprId,
    pub value: ExprId,
}

/// The comprehension macro's fixed 5-expression shape plus its two
/// introduced variables (§4.7).
#[derive(Clone, Debug, PartialEq)]
pub struct Comprehension {
    pub iter_var: String,
    /// Present only for two-variable comprehensions over maps (`all(k, v,
    /// ...)`-style extensions); absent for the single-variable form.
    pub iter_var2: Option<String>,
    pub iter_range: ExprId,
    pub accu_var: String,
    pub accu_init: ExprId,
    pub loop_condition: ExprId,
    pub loop_step: ExprId,
    pub result: ExprId,
}

/// The kind-specific payload of one AST node (§6).
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Constant),
    Ident(String),
    Select {
        operand: ExprId,
        field: String,
        /// `true` for the `has(e.f)` macro's test-only select.
        test_only: bool,
    },
    Call {
        /// `Some(receiver)` for receiver-style calls (`e.f(args)`); `None`
        /// for global calls and operators (`_+_`, `_==_`, ...).
        target: Option<ExprId>,
        function: String,
        args: Vec<ExprId>,
    },
    CreateList {
        elements: Vec<ExprId>,
    },
    CreateMap {
        entries: Vec<MapEntry>,
    },
    CreateStruct {
        message_name: String,
        entries: Vec<StructEntry>,
    },
    Comprehension(Comprehension),
}

/// One node: its kind payload plus the byte span the parser recorded for
/// it. `source_info` (§3) is this `span` map, copied unchanged into the
/// checked AST.
#[derive(Clone, Debug, PartialEq)]
pub struct ExprNode {
    pub id: ExprId,
    pub kind: ExprKind,
    pub span: Span,
}

/// The opaque parsed AST the checker consumes. Owns every node by id plus
/// the root id and the original source text (carried through so issues can
/// be rendered in context, §4.10).
#[derive(Clone, Debug, Default)]
pub struct ParsedAst {
    nodes: FxHashMap<ExprId, ExprNode>,
    root: Option<ExprId>,
    source: String,
}

impl ParsedAst {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            nodes: FxHashMap::default(),
            root: None,
            source: source.into(),
        }
    }

    pub fn insert(&mut self, node: ExprNode) {
        self.nodes.insert(node.id, node);
    }

    pub fn set_root(&mut self, root: ExprId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<ExprId> {
        self.root
    }

    pub fn get(&self, id: ExprId) -> Option<&ExprNode> {
        self.nodes.get(&id)
    }

    pub fn span(&self, id: ExprId) -> Span {
        self.nodes.get(&id).map(|n| n.span).unwrap_or(Span::dummy())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_simple_call() {
        let mut ast = ParsedAst::new("x + y");
        ast.insert(ExprNode {
            id: ExprId(1),
            kind: ExprKind::Ident("x".to_string()),
            span: Span::new(0, 1),
        });
        ast.insert(ExprNode {
            id: ExprId(2),
            kind: ExprKind::Ident("y".to_string()),
            span: Span::new(4, 5),
        });
        ast.insert(ExprNode {
            id: ExprId(3),
            kind: ExprKind::Call {
                target: None,
                function: "_+_".to_string(),
                args: vec![ExprId(1), ExprId(2)],
            },
            span: Span::new(0, 5),
        });
        ast.set_root(ExprId(3));

        assert_eq!(ast.root(), Some(ExprId(3)));
        assert_eq!(ast.node_count(), 3);
        assert_eq!(ast.span(ExprId(1)), Span::new(0, 1));
        assert!(matches!(ast.get(ExprId(3)).unwrap().kind, ExprKind::Call { .. }));
    }
}

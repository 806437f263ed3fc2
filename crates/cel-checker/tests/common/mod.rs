//! Shared AST-construction helper for the integration test files. There is
//! no parser in this workspace (§6 treats the parsed AST as an external
//! input), so tests build the opaque tree by hand.

use cel_checker::{Comprehension, Constant, ExprId, ExprKind, ExprNode, MapEntry, ParsedAst, StructEntry};
use cel_common::Span;

pub struct AstBuilder {
    ast: ParsedAst,
    next_id: u64,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self {
            ast: ParsedAst::new(String::new()),
            next_id: 1,
        }
    }

    fn insert(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId(self.next_id);
        self.next_id += 1;
        self.ast.insert(ExprNode {
            id,
            kind,
            span: Span::dummy(),
        });
        id
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        self.insert(ExprKind::Ident(name.to_string()))
    }

    pub fn int(&mut self, v: i64) -> ExprId {
        self.insert(ExprKind::Literal(Constant::Int(v)))
    }

    pub fn string(&mut self, v: &str) -> ExprId {
        self.insert(ExprKind::Literal(Constant::String(v.to_string())))
    }

    pub fn null(&mut self) -> ExprId {
        self.insert(ExprKind::Literal(Constant::Null))
    }

    pub fn insert_bool(&mut self, v: bool) -> ExprId {
        self.insert(ExprKind::Literal(Constant::Bool(v)))
    }

    pub fn insert_bytes(&mut self, v: Vec<u8>) -> ExprId {
        self.insert(ExprKind::Literal(Constant::Bytes(v)))
    }

    pub fn call(&mut self, function: &str, args: Vec<ExprId>) -> ExprId {
        self.insert(ExprKind::Call {
            target: None,
            function: function.to_string(),
            args,
        })
    }

    pub fn method_call(&mut self, target: ExprId, function: &str, args: Vec<ExprId>) -> ExprId {
        self.insert(ExprKind::Call {
            target: Some(target),
            function: function.to_string(),
            args,
        })
    }

    pub fn select(&mut self, operand: ExprId, field: &str) -> ExprId {
        self.insert(ExprKind::Select {
            operand,
            field: field.to_string(),
            test_only: false,
        })
    }

    pub fn list(&mut self, elements: Vec<ExprId>) -> ExprId {
        self.insert(ExprKind::CreateList { elements })
    }

    pub fn map(&mut self, entries: Vec<(ExprId, ExprId)>) -> ExprId {
        self.insert(ExprKind::CreateMap {
            entries: entries
                .into_iter()
                .map(|(key, value)| MapEntry { key, value })
                .collect(),
        })
    }

    pub fn strct(&mut self, message_name: &str, entries: Vec<(&str, ExprId)>) -> ExprId {
        self.insert(ExprKind::CreateStruct {
            message_name: message_name.to_string(),
            entries: entries
                .into_iter()
                .map(|(field, value)| StructEntry {
                    field: field.to_string(),
                    value,
                    optional: false,
                })
                .collect(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn comprehension(
        &mut self,
        iter_var: &str,
        iter_range: ExprId,
        accu_var: &str,
        accu_init: ExprId,
        loop_condition: ExprId,
        loop_step: ExprId,
        result: ExprId,
    ) -> ExprId {
        self.insert(ExprKind::Comprehension(Comprehension {
            iter_var: iter_var.to_string(),
            iter_var2: None,
            iter_range,
            accu_var: accu_var.to_string(),
            accu_init,
            loop_condition,
            loop_step,
            result,
        }))
    }

    pub fn finish(mut self, root: ExprId) -> ParsedAst {
        self.ast.set_root(root);
        self.ast
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `range.all(iter_var, predicate)` desugared to the 5-expression
/// comprehension shape: `true && predicate` accumulated with `&&`,
/// seeded at `true` (§4.7's macro-expansion model for `all`).
pub fn all_macro(b: &mut AstBuilder, iter_var: &str, range: ExprId, predicate: impl FnOnce(&mut AstBuilder, ExprId) -> ExprId) -> ExprId {
    let accu_init = b.insert(ExprKind::Literal(Constant::Bool(true)));
    let accu_ref = b.ident("__result__");
    let pred = predicate(b, accu_ref);
    let loop_step = b.call("_&&_", vec![accu_ref, pred]);
    let loop_condition = b.insert(ExprKind::Literal(Constant::Bool(true)));
    let result = b.ident("__result__");
    b.comprehension(iter_var, range, "__result__", accu_init, loop_condition, loop_step, result)
}

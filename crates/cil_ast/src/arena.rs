//! Arena allocation for the typed AST.
//!
//! Contiguous storage for all expressions in a module: cache-friendly
//! iteration, and child references are `ExprId` indices rather than boxed
//! pointers.

use crate::ast::Expr;
use crate::expr_id::{ExprId, ExprRange};

#[derive(Clone, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
}

impl ExprArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    #[allow(clippy::expect_used, reason = "a module with u32::MAX expressions cannot exist")]
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let idx = u32::try_from(self.exprs.len()).expect("expression arena exceeded u32::MAX");
        self.exprs.push(expr);
        ExprId::new(idx)
    }

    #[must_use]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Flatten a list of expression ids (e.g. call arguments) into the
    /// shared list storage, returning the range that addresses them.
    #[allow(clippy::expect_used, reason = "a module with u32::MAX list entries cannot exist")]
    pub fn alloc_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = u32::try_from(self.expr_lists.len()).expect("expr list storage overflow");
        self.expr_lists.extend_from_slice(ids);
        let len = u32::try_from(ids.len()).expect("expr list length overflow");
        ExprRange::new(start, len)
    }

    #[must_use]
    pub fn get_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.start()..range.start() + range.len()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

//! Typed AST and semantic `Context` consumed by the CIL lowering pass.
//!
//! This is the input boundary of the pass: a fully type-checked `Program`
//! (arena-allocated, `ExprId`-addressed) plus a `Context` describing
//! classes, attributes, methods and inheritance. Neither is mutated by the
//! lowering pass.
//!
//! # Design Philosophy
//!
//! - **Intern identifiers**: every class/method/attribute/local name is a
//!   `Name(u32)` handle into a `StringInterner`.
//! - **Flatten expressions**: no `Box<Expr>` — children are `ExprId`
//!   indices into an `ExprArena`.

mod arena;
mod ast;
mod context;
mod expr_id;
mod interner;
mod name;

pub use arena::ExprArena;
pub use ast::{
    AttrDecl, BinaryOp, Class, CaseItem, Expr, ExprKind, Feature, FuncDecl, Param, Program,
    UnaryOp, VarDecl,
};
pub use context::{Attribute, Context, Method, Type};
pub use expr_id::{ExprId, ExprRange};
pub use interner::StringInterner;
pub use name::Name;

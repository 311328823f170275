//! Typed AST node shapes (input boundary).
//!
//! Every expression node carries `static_type` as resolved by the prior
//! type-checking pass. There is no `Box<Expr>` recursion: child expressions
//! are referenced by `ExprId` into the enclosing `ExprArena`.

use crate::expr_id::{ExprId, ExprRange};
use crate::name::Name;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BinaryOp {
    Plus,
    Minus,
    Star,
    Div,
    Less,
    LessEqual,
    Equal,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum UnaryOp {
    Not,
    Neg,
    IsVoid,
}

/// One expression node. `static_type` is the name of the class the type
/// checker resolved this expression to.
#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub static_type: Name,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    /// `name <- value`.
    Assign { name: Name, value: ExprId },

    /// `receiver.method@static_dispatch(args)`, or `method(args)` when
    /// `receiver` is `None` (implicit `self`).
    Call {
        receiver: Option<ExprId>,
        method: Name,
        static_dispatch: Option<Name>,
        args: ExprRange,
    },

    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },

    While {
        cond: ExprId,
        body: ExprId,
    },

    /// A sequence of expressions; the block's value is its last.
    Block { exprs: ExprRange },

    Let {
        bindings: Vec<VarDecl>,
        body: ExprId,
    },

    /// `case scrutinee of items esac`. Lowering rejects this node outright;
    /// the shape is still modeled here since the type checker that produces
    /// this AST may still emit it.
    Case {
        scrutinee: ExprId,
        items: Vec<CaseItem>,
    },

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    Unary {
        op: UnaryOp,
        operand: ExprId,
    },

    /// `new T`.
    Instantiate { type_name: Name },

    ConstantNum(i64),

    /// A variable reference, or an implicit attribute read if `name` does
    /// not resolve to a local/param of the enclosing function.
    Variable { name: Name },

    /// A string literal's *content*, interned as a `Name` purely for
    /// storage — it becomes a fresh CIL data symbol at lowering time, not a
    /// reference to any existing data symbol.
    StringLit(Name),

    Boolean(bool),

    /// An explicit default-value request for `type_name` (e.g. an
    /// uninitialized `let` binding).
    DefaultValue { type_name: Name },
}

/// A `case` branch: `name : declared_type => body`.
#[derive(Clone, Debug)]
pub struct CaseItem {
    pub name: Name,
    pub declared_type: Name,
    pub body: ExprId,
}

/// A single `let` binding: `name : declared_type [<- init]`.
#[derive(Clone, Debug)]
pub struct VarDecl {
    pub name: Name,
    pub declared_type: Name,
    pub init: Option<ExprId>,
}

/// A method formal parameter.
#[derive(Copy, Clone, Debug)]
pub struct Param {
    pub name: Name,
    pub declared_type: Name,
}

/// `name : declared_type [<- init]` at class scope.
#[derive(Clone, Debug)]
pub struct AttrDecl {
    pub name: Name,
    pub declared_type: Name,
    pub init: Option<ExprId>,
}

/// `name(params) : return_type { body }` at class scope.
#[derive(Clone, Debug)]
pub struct FuncDecl {
    pub name: Name,
    pub params: Vec<Param>,
    pub return_type: Name,
    pub body: ExprId,
}

/// A class feature: an attribute or a method declaration.
#[derive(Clone, Debug)]
pub enum Feature {
    Attr(AttrDecl),
    Func(FuncDecl),
}

/// `class name inherits parent { features }`.
#[derive(Clone, Debug)]
pub struct Class {
    pub name: Name,
    pub parent: Option<Name>,
    pub features: Vec<Feature>,
}

impl Class {
    pub fn attrs(&self) -> impl Iterator<Item = &AttrDecl> {
        self.features.iter().filter_map(|f| match f {
            Feature::Attr(a) => Some(a),
            Feature::Func(_) => None,
        })
    }

    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.features.iter().filter_map(|f| match f {
            Feature::Func(m) => Some(m),
            Feature::Attr(_) => None,
        })
    }
}

/// The typed AST root: the full set of user-declared classes. Built-in
/// classes (`Object`, `IO`, `String`, `Int`, `Bool`) are *not* listed here —
/// they exist only in the `Context` and are synthesized directly into CIL
/// by the built-in injector.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub classes: Vec<Class>,
}

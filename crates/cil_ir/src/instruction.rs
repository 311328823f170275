//! The CIL instruction alphabet.
//!
//! A tagged union keyed by op-code: this gives exhaustive case analysis to
//! every consumer (the lowering pass, the eventual assembler, property
//! tests) instead of a one-class-per-op encoding.

use crate::symbol::Symbol;

/// An operand that is either a declared local/param or an integer immediate.
///
/// Only `Assign` ever carries an immediate operand; every other instruction
/// takes plain local operands (the expression lowerer always materializes
/// literals into a temporary via `Assign` before using them elsewhere).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Operand {
    Local(Symbol),
    Int(i64),
}

impl From<Symbol> for Operand {
    fn from(sym: Symbol) -> Self {
        Operand::Local(sym)
    }
}

/// A CIL instruction. No other form may appear in an emitted `Function`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Instruction {
    // --- Move ---
    /// `dst <- src-or-imm`
    Assign { dst: Symbol, src: Operand },

    // --- Memory ---
    /// Allocate a fresh instance of `ty` into `dst`.
    Allocate { ty: Symbol, dst: Symbol },
    /// Load a data-section constant into `dst`.
    Load { dst: Symbol, data: Symbol },
    /// Shallow-copy `src` into `dst`.
    Copy { dst: Symbol, src: Symbol },

    // --- Object model ---
    /// Reify the runtime type tag of `src` into `dst`.
    TypeOf { src: Symbol, dst: Symbol },
    /// Write the runtime type name of `src` into `dst`.
    TypeName { dst: Symbol, src: Symbol },
    /// `dst <- obj.attr` as declared by `decl_type`.
    GetAttrib {
        dst: Symbol,
        obj: Symbol,
        attr: Symbol,
        decl_type: Symbol,
    },
    /// `obj.attr <- src`, attribute declared by `decl_type`.
    SetAttrib {
        obj: Symbol,
        attr: Symbol,
        src: Symbol,
        decl_type: Symbol,
    },
    /// `dst <- default value of type_name` (0 / false / "" / void).
    DefaultValue { dst: Symbol, type_name: Symbol },
    /// `dst <- (src == void)`.
    IsVoid { dst: Symbol, src: Symbol },

    // --- Control ---
    Label { name: Symbol },
    Goto { target: Symbol },
    GotoIf { cond: Symbol, target: Symbol },

    // --- Call ---
    /// Push one positional argument for the next `*Call`.
    Arg { src: Symbol },
    /// Call a statically resolved function symbol.
    StaticCall { func: Symbol, dst: Symbol },
    /// Call through `ty`'s vtable at `vtable_index`.
    DynamicCall {
        ty: Symbol,
        vtable_index: u32,
        dst: Symbol,
    },
    /// Return from the enclosing function, optionally with a value.
    Return { src: Option<Symbol> },
    Exit,

    // --- Arithmetic ---
    Plus { dst: Symbol, lhs: Symbol, rhs: Symbol },
    Minus { dst: Symbol, lhs: Symbol, rhs: Symbol },
    Star { dst: Symbol, lhs: Symbol, rhs: Symbol },
    Div { dst: Symbol, lhs: Symbol, rhs: Symbol },
    IntComplement { dst: Symbol, src: Symbol },
    Not { dst: Symbol, src: Symbol },

    // --- Comparison ---
    Less { dst: Symbol, lhs: Symbol, rhs: Symbol },
    LessEqual { dst: Symbol, lhs: Symbol, rhs: Symbol },
    Equal { dst: Symbol, lhs: Symbol, rhs: Symbol },

    // --- String ---
    Length { dst: Symbol, src: Symbol },
    Concat { dst: Symbol, lhs: Symbol, rhs: Symbol },
    Substring {
        dst: Symbol,
        src: Symbol,
        index: Symbol,
        len: Symbol,
    },

    // --- I/O ---
    Read { dst: Symbol },
    PrintStr { src: Symbol },
    PrintInt { src: Symbol },

    // --- Runtime ---
    RuntimeError { kind: RuntimeErrorKind },
}

/// Runtime-abort kinds available to the IR. The lowering pass only ever
/// emits `AbortSignal` (from `Object.abort`); the others are declared here
/// as the contract the downstream runtime/assembler must honor for division
/// by zero, dispatch-on-void, and substring-out-of-range, per the error
/// handling design.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RuntimeErrorKind {
    AbortSignal,
    DivisionByZero,
    DispatchOnVoid,
    SubstringOutOfRange,
}

impl RuntimeErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeErrorKind::AbortSignal => "ABORT_SIGNAL",
            RuntimeErrorKind::DivisionByZero => "DIVISION_BY_ZERO",
            RuntimeErrorKind::DispatchOnVoid => "DISPATCH_ON_VOID",
            RuntimeErrorKind::SubstringOutOfRange => "SUBSTRING_OUT_OF_RANGE",
        }
    }
}

impl Instruction {
    /// The label this `Goto`/`GotoIf` targets, if any.
    #[must_use]
    pub fn goto_target(&self) -> Option<Symbol> {
        match self {
            Instruction::Goto { target } | Instruction::GotoIf { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// The label this instruction defines, if any.
    #[must_use]
    pub fn label_def(&self) -> Option<Symbol> {
        match self {
            Instruction::Label { name } => Some(*name),
            _ => None,
        }
    }
}

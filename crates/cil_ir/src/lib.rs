//! CIL — Intermediate Representation Types
//!
//! This crate contains the output-boundary data model of the CIL lowering
//! pass: the flat three-address instruction alphabet, type descriptors
//! (attribute layout + vtable), string data, and the function/program
//! containers that hold them. It has no dependency on the AST crate — the
//! lowering pass is the only thing that knows about both.
//!
//! # Design Philosophy
//!
//! - **Intern symbols**: every name that ends up in generated IR is
//!   interned once via `SymbolTable` and referenced by the `Copy` `Symbol`
//!   handle everywhere else.
//! - **Tagged union over one-class-per-op**: `Instruction` is a single enum
//!   with exhaustive `match` support, not a class hierarchy.

mod instruction;
mod program;
mod symbol;

pub use instruction::{Instruction, Operand, RuntimeErrorKind};
pub use program::{DataItem, Function, Program, TypeDescriptor};
pub use symbol::{Symbol, SymbolTable};

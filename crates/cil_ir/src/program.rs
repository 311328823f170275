//! The CIL `Program` output value: types, data, and code.

use crate::instruction::Instruction;
use crate::symbol::{Symbol, SymbolTable};

/// A class's runtime layout: attribute table (instance layout order) and
/// method dispatch table (vtable index order).
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TypeDescriptor {
    pub name: Symbol,
    /// Base-first, source-order attribute symbols. This *is* the instance
    /// layout: index `i` here is the instance's field offset `i`.
    pub attributes: Vec<Symbol>,
    /// Base-first vtable: `(short_name, function_symbol)`, one entry per
    /// distinct method name across the ancestor chain, holding the symbol
    /// of the most-derived override. Index `i` here is vtable slot `i`.
    pub methods: Vec<(Symbol, Symbol)>,
}

impl TypeDescriptor {
    #[must_use]
    pub fn new(name: Symbol) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Vtable index of a method by its short name, if present.
    #[must_use]
    #[allow(clippy::expect_used, reason = "a class cannot declare u32::MAX methods")]
    pub fn method_index(&self, short_name: Symbol) -> Option<u32> {
        self.methods
            .iter()
            .position(|(name, _)| *name == short_name)
            .map(|i| u32::try_from(i).expect("vtable index exceeds u32"))
    }
}

/// A string literal constant, addressable by `Load`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DataItem {
    pub symbol: Symbol,
    pub bytes: String,
}

/// A single emitted function body.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Function {
    pub name: Symbol,
    /// The function's formal parameters, in declaration order. The first
    /// parameter of every method function is its `self` symbol.
    pub params: Vec<Symbol>,
    /// Declared locals (temporaries and `let`-bound names), in order of
    /// introduction.
    pub locals: Vec<Symbol>,
    pub body: Vec<Instruction>,
}

impl Function {
    #[must_use]
    pub fn new(name: Symbol) -> Self {
        Self {
            name,
            params: Vec::new(),
            locals: Vec::new(),
            body: Vec::new(),
        }
    }
}

/// The self-contained output of the lowering pass.
///
/// Every symbol referenced by an instruction in `functions` is defined
/// somewhere in this value: as a type name in `types`, a data id in `data`,
/// a function name in `functions`, or a local/param of its own function.
/// `symbols` resolves every `Symbol` handle back to the name text it was
/// composed from — per the naming invariant, those names are stable and
/// observable in the generated assembly, so the program carries the table
/// needed to print them rather than leaving `Symbol` opaque to consumers.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Program {
    pub types: Vec<TypeDescriptor>,
    pub data: Vec<DataItem>,
    pub functions: Vec<Function>,
    pub symbols: SymbolTable,
}

impl Program {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

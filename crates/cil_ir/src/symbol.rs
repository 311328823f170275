//! Interned CIL symbols.
//!
//! Every name that ends up in generated IR (function symbols, attribute
//! symbols, data ids, labels) is interned once and referenced by a cheap
//! `Copy` handle everywhere else.
//! Unlike `cil_ast::Name`, a `Symbol` is minted by the lowering pass itself
//! (it is the result of composing strings like `"{Type}_{method}"`), so the
//! table lives here rather than in the AST crate.

use rustc_hash::FxHashMap;

/// An interned CIL symbol (function name, attribute name, data id, or label).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Symbol(u32);

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Single-threaded symbol table.
///
/// The lowering pass is synchronous (see the crate's concurrency model), so
/// this intentionally skips the sharded/lockable design the rest of the
/// pipeline's string interner uses for concurrent compilation — a plain
/// `FxHashMap` is both simpler and sufficient here.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    map: FxHashMap<Box<str>, Symbol>,
    strings: Vec<Box<str>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a symbol, returning its existing handle if already present.
    #[allow(clippy::expect_used, reason = "a program with u32::MAX distinct symbols cannot exist")]
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }
        let idx = u32::try_from(self.strings.len())
            .expect("symbol table exceeded u32::MAX entries");
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        let sym = Symbol(idx);
        self.map.insert(boxed, sym);
        sym
    }

    /// Resolve a symbol back to its string form.
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

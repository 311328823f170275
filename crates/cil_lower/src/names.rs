//! Name Manager: mints unique identifiers and composes canonical symbols.

use cil_ir::{Symbol, SymbolTable};

/// Fresh-name counters. Per the resource model, counters are
/// process-monotonic across functions — global uniqueness is acceptable
/// and simpler than scoping each counter per function.
#[derive(Default)]
pub struct NameManager {
    temp_seq: u32,
    label_seq: u32,
    data_seq: u32,
    /// Display name of the function currently being built, used to compose
    /// `local_{fn}_{hint}_{seq}` temporary names.
    current_fn: String,
}

impl NameManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called whenever the builder opens a new function, so subsequent
    /// temporaries are named after it.
    pub fn enter_function(&mut self, fn_name: &str) {
        fn_name.clone_into(&mut self.current_fn);
    }

    /// Fresh local symbol, of the form `local_{fn}_{hint}_{seq}`.
    pub fn next_temp(&mut self, symbols: &mut SymbolTable, hint: &str) -> Symbol {
        let seq = self.temp_seq;
        self.temp_seq += 1;
        symbols.intern(&format!("local_{}_{hint}_{seq}", self.current_fn))
    }

    /// Fresh label symbol, of the form `"{PREFIX}_{counter}"`.
    pub fn next_label(&mut self, symbols: &mut SymbolTable, prefix: &str) -> Symbol {
        let seq = self.label_seq;
        self.label_seq += 1;
        symbols.intern(&format!("{prefix}_{seq}"))
    }

    /// Fresh string-data symbol, of the form `"string_{n}"`, `n = 1, 2, …`.
    pub fn next_data_id(&mut self, symbols: &mut SymbolTable) -> Symbol {
        self.data_seq += 1;
        symbols.intern(&format!("string_{}", self.data_seq))
    }

    /// `"{Type}_{method}"`.
    pub fn fn_symbol(symbols: &mut SymbolTable, method: &str, ty: &str) -> Symbol {
        symbols.intern(&format!("{ty}_{method}"))
    }

    /// `"{Type}_{attr}"`.
    pub fn attr_symbol(symbols: &mut SymbolTable, ty: &str, attr: &str) -> Symbol {
        symbols.intern(&format!("{ty}_{attr}"))
    }

    /// `"constructor_{Type}"`. A distinct naming scheme from `fn_symbol`,
    /// matching the symbol names used in the worked examples (e.g.
    /// `constructor_Main`, not `Main_constructor`).
    pub fn constructor_symbol(symbols: &mut SymbolTable, ty: &str) -> Symbol {
        symbols.intern(&format!("constructor_{ty}"))
    }
}

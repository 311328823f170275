//! Builder State: accumulators for the `Program` under construction.
//!
//! Holds the lists that become the final `cil_ir::Program`, plus the
//! "currently open" function buffer that every emitter writes into. There is
//! deliberately no "currently open type" pointer distinct from the type
//! descriptor list — descriptors are built whole by the class descriptor
//! emitter and pushed in one step, never mutated incrementally.

use cil_ir::{DataItem, Function, Instruction, Program, Symbol, TypeDescriptor};

struct OpenFunction {
    name: Symbol,
    params: Vec<Symbol>,
    locals: Vec<Symbol>,
    body: Vec<Instruction>,
}

#[derive(Default)]
pub struct BuilderState {
    types: Vec<TypeDescriptor>,
    data: Vec<DataItem>,
    functions: Vec<Function>,
    open: Option<OpenFunction>,
}

impl BuilderState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_type(&mut self, desc: TypeDescriptor) {
        self.types.push(desc);
    }

    pub fn push_data(&mut self, item: DataItem) {
        self.data.push(item);
    }

    /// Open a new function buffer. Panics if a function is already open —
    /// every caller must close one (`finish_function`) before opening the
    /// next; the lowering pass never nests function bodies.
    pub fn begin_function(&mut self, name: Symbol, params: Vec<Symbol>) {
        assert!(self.open.is_none(), "a function is already open");
        self.open = Some(OpenFunction {
            name,
            params,
            locals: Vec::new(),
            body: Vec::new(),
        });
    }

    /// Declare a new local in the currently open function. A `let` that
    /// shadows an already-declared name reuses that name's plain symbol, so
    /// this is idempotent rather than appending a duplicate entry.
    pub fn declare_local(&mut self, sym: Symbol) {
        let locals = &mut self.open_mut().locals;
        if !locals.contains(&sym) {
            locals.push(sym);
        }
    }

    pub fn emit(&mut self, instr: Instruction) {
        self.open_mut().body.push(instr);
    }

    /// Close the currently open function and append it to the program.
    #[allow(clippy::expect_used, reason = "begin_function/finish_function are always paired by every caller")]
    pub fn finish_function(&mut self) {
        let open = self.open.take().expect("no function is open");
        self.functions.push(Function {
            name: open.name,
            params: open.params,
            locals: open.locals,
            body: open.body,
        });
    }

    #[allow(clippy::expect_used, reason = "every emitter call happens between begin_function and finish_function")]
    fn open_mut(&mut self) -> &mut OpenFunction {
        self.open.as_mut().expect("no function is open")
    }

    /// Package the accumulated lists into a `Program` and clear all state so
    /// this builder may be reused for a second, independent lowering run.
    pub fn finish(&mut self) -> Program {
        assert!(self.open.is_none(), "a function is still open");
        Program {
            types: std::mem::take(&mut self.types),
            data: std::mem::take(&mut self.data),
            functions: std::mem::take(&mut self.functions),
            symbols: cil_ir::SymbolTable::new(),
        }
    }

    /// Release all accumulators without producing a `Program`.
    pub fn reset(&mut self) {
        self.types.clear();
        self.data.clear();
        self.functions.clear();
        self.open = None;
    }
}

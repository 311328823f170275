//! Top-level orchestration.
//!
//! `Lowerer` is the shared mutable state every emitter writes through,
//! split across per-concern modules (`expr`, `constructors`, `descriptors`,
//! `entry`) rather than threading a dozen separate arguments. `lower_program`
//! is the one public entry point; everything else in this crate is reachable
//! only through it or through direct unit tests of an individual emitter.

use std::collections::HashMap;

use rustc_hash::FxHashMap;

use cil_ast::{Class, Context, ExprArena, ExprId, Name, Program as AstProgram, StringInterner, Type};
use cil_ir::{Instruction, Program as CilProgram, Symbol, SymbolTable, TypeDescriptor};

use crate::builder::BuilderState;
use crate::builtins::inject_builtins;
use crate::constructors::synthesize_constructor;
use crate::descriptors::emit_class_descriptor;
use crate::entry::synthesize_main;
use crate::error::LowerError;
use crate::expr::lower_method_body;
use crate::names::NameManager;

/// Mutable state threaded through every emitter. Single-threaded and
/// synchronous per the concurrency model: nothing here is ever shared
/// across a lock or a thread boundary.
pub struct Lowerer<'a> {
    pub(crate) ctx: &'a Context,
    pub(crate) arena: &'a ExprArena,
    pub(crate) interner: &'a StringInterner,
    pub(crate) symbols: SymbolTable,
    pub(crate) names: NameManager,
    pub(crate) builder: BuilderState,
    pub(crate) descriptors: FxHashMap<Name, TypeDescriptor>,
    /// User classes by name, for constructor synthesis to reach an
    /// ancestor's own attribute initializers — each class's constructor is
    /// self-contained and runs the whole chain's initializers rather than
    /// delegating to a parent constructor.
    pub(crate) classes: FxHashMap<Name, &'a Class>,
    current_class: Option<Name>,
    /// Locals/params declared in the function currently being lowered,
    /// including `"self"`, keyed by display name rather than `Name` handle
    /// — `self` has no pre-existing `Name` of its own unless the source
    /// actually references it. `let`-bindings shadow and restore entries
    /// here as they go in and out of scope.
    current_scope: HashMap<String, Symbol>,
}

impl<'a> Lowerer<'a> {
    #[must_use]
    pub fn new(ctx: &'a Context, arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        Self {
            ctx,
            arena,
            interner,
            symbols: SymbolTable::new(),
            names: NameManager::new(),
            builder: BuilderState::new(),
            descriptors: FxHashMap::default(),
            classes: FxHashMap::default(),
            current_class: None,
            current_scope: HashMap::new(),
        }
    }

    /// Release all accumulated state so this `Lowerer` may lower a second,
    /// independent program without reallocating its `Context` reference.
    pub fn reset(&mut self) {
        self.symbols = SymbolTable::new();
        self.names = NameManager::new();
        self.builder.reset();
        self.descriptors.clear();
        self.classes.clear();
        self.current_class = None;
        self.current_scope.clear();
    }

    pub(crate) fn resolve(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    pub(crate) fn get_type(&self, name: Name) -> Result<&'a Type, LowerError> {
        self.ctx.get_type(name).ok_or(LowerError::UnknownType(name))
    }

    /// Find a class by its display name — used by the built-in injector,
    /// which knows `Object`/`IO`/`String`/`Int`/`Bool` only as string
    /// literals, not as pre-resolved `Name`s.
    pub(crate) fn get_type_by_display_name(&self, display: &str) -> Result<&'a Type, LowerError> {
        self.ctx
            .types()
            .find(|ty| self.resolve(ty.name) == display)
            .ok_or_else(|| LowerError::MissingBuiltin(display.to_owned()))
    }

    pub(crate) fn fresh_temp(&mut self, hint: &str) -> Symbol {
        let sym = self.names.next_temp(&mut self.symbols, hint);
        self.builder.declare_local(sym);
        sym
    }

    pub(crate) fn fresh_label(&mut self, prefix: &str) -> Symbol {
        self.names.next_label(&mut self.symbols, prefix)
    }

    pub(crate) fn intern(&mut self, s: &str) -> Symbol {
        self.symbols.intern(s)
    }

    pub(crate) fn emit(&mut self, instr: Instruction) {
        self.builder.emit(instr);
    }

    /// Declare a fresh local, register its display name in scope, and
    /// return whatever binding it shadows (restore with `restore_local`
    /// once the binding's lexical scope — a `let` body — has been lowered).
    pub(crate) fn declare_local(&mut self, display_name: &str, sym: Symbol) -> Option<Symbol> {
        self.builder.declare_local(sym);
        self.current_scope.insert(display_name.to_owned(), sym)
    }

    /// Undo a `declare_local`, restoring (or removing) the prior binding.
    pub(crate) fn restore_local(&mut self, display_name: &str, prior: Option<Symbol>) {
        match prior {
            Some(sym) => {
                self.current_scope.insert(display_name.to_owned(), sym);
            }
            None => {
                self.current_scope.remove(display_name);
            }
        }
    }

    #[allow(clippy::expect_used, reason = "every emitter call happens inside begin_function/finish_function")]
    pub(crate) fn current_class(&self) -> Name {
        self.current_class.expect("no class is currently open")
    }

    /// True iff `name` is *not* a local/param of the function currently
    /// being lowered — the attribute-vs-local disambiguation rule (spec
    /// §4.5 `Variable`).
    pub(crate) fn is_attribute(&self, name: Name) -> bool {
        !self.current_scope.contains_key(self.resolve(name))
    }

    /// The symbol bound to a local/param display name in the current scope.
    #[allow(clippy::expect_used, reason = "every caller checks is_attribute first")]
    pub(crate) fn local_symbol(&self, name: Name) -> Symbol {
        *self
            .current_scope
            .get(self.resolve(name))
            .expect("is_attribute should have been checked first")
    }

    pub(crate) fn self_symbol(&mut self) -> Symbol {
        self.intern("self")
    }

    /// Begin a new function body: opens the builder buffer, resets the
    /// local/param name scope to `{"self"} ∪ params`, and records the
    /// enclosing class used for attribute disambiguation and symbol
    /// composition. `self_symbol` is the interned `"self"` symbol, always
    /// the function's first parameter.
    pub(crate) fn begin_function(
        &mut self,
        class: Name,
        fn_symbol: Symbol,
        fn_display_name: &str,
        self_symbol: Symbol,
        params: &[(String, Symbol)],
    ) {
        self.current_class = Some(class);
        self.current_scope.clear();
        self.current_scope.insert("self".to_owned(), self_symbol);
        self.current_scope
            .extend(params.iter().map(|(name, sym)| (name.clone(), *sym)));
        self.names.enter_function(fn_display_name);
        let mut param_symbols = vec![self_symbol];
        param_symbols.extend(params.iter().map(|(_, sym)| *sym));
        self.builder.begin_function(fn_symbol, param_symbols);
    }

    pub(crate) fn finish_function(&mut self) {
        self.builder.finish_function();
        self.current_class = None;
    }

    /// The attribute symbol and declaring-type symbol for `attr` as seen
    /// from `class`, found by walking `class`'s inherited attribute list.
    pub(crate) fn attribute_decl(
        &mut self,
        class: Name,
        attr: Name,
    ) -> Result<(Symbol, Symbol), LowerError> {
        let ty = self.get_type(class)?;
        let declaring = ty
            .all_attributes(self.ctx)
            .into_iter()
            .find(|(a, _)| a.name == attr)
            .map(|(_, declaring_type)| declaring_type)
            .ok_or(LowerError::UnknownAttribute { ty: class, attr })?;
        let declaring_str = self.resolve(declaring).to_owned();
        let attr_str = self.resolve(attr).to_owned();
        let attr_sym = NameManager::attr_symbol(&mut self.symbols, &declaring_str, &attr_str);
        let decl_type_sym = self.symbols.intern(&declaring_str);
        Ok((attr_sym, decl_type_sym))
    }

    /// The vtable index of `method` as dispatched through `class`'s already
    /// built descriptor.
    pub(crate) fn vtable_index(&mut self, class: Name, method: Name) -> Result<u32, LowerError> {
        let method_str = self.resolve(method).to_owned();
        let short = self.symbols.intern(&method_str);
        let desc = self
            .descriptors
            .get(&class)
            .ok_or(LowerError::UnknownType(class))?;
        desc.method_index(short)
            .ok_or(LowerError::UnknownMethod { ty: class, method })
    }

    /// The function symbol implementing `method` as declared by `class`
    /// itself (used for static dispatch, `obj.method@T(...)`).
    pub(crate) fn static_fn_symbol(&mut self, class: Name, method: Name) -> Result<Symbol, LowerError> {
        let (_, declaring) = self
            .get_type(class)?
            .get_method(method, self.ctx)
            .ok_or(LowerError::UnknownMethod { ty: class, method })?;
        let declaring_str = self.resolve(declaring).to_owned();
        let method_str = self.resolve(method).to_owned();
        Ok(NameManager::fn_symbol(&mut self.symbols, &method_str, &declaring_str))
    }

    /// The initializer expression `attr` carries in its own declaring
    /// class, if any. Returns `None` both when the attribute has no
    /// initializer and when `declaring` is a built-in — built-ins have no
    /// AST `Class` and never initialize their intrinsic attributes here.
    pub(crate) fn declared_initializer(&self, declaring: Name, attr: Name) -> Option<ExprId> {
        self.classes
            .get(&declaring)
            .and_then(|class| class.attrs().find(|a| a.name == attr))
            .and_then(|a| a.init)
    }
}

/// Lower a fully type-checked `Program` plus its semantic `Context` into a
/// flat CIL `Program`. The sole public entry point of this crate.
#[tracing::instrument(level = "debug", skip(ast, ctx, arena, interner))]
pub fn lower_program<'a>(
    ast: &'a AstProgram,
    ctx: &'a Context,
    arena: &'a ExprArena,
    interner: &'a StringInterner,
) -> Result<CilProgram, LowerError> {
    let mut lowerer = Lowerer::new(ctx, arena, interner);
    lower_into(&mut lowerer, ast)?;
    let mut program = lowerer.builder.finish();
    program.symbols = std::mem::take(&mut lowerer.symbols);
    Ok(program)
}

fn lower_into<'a>(lowerer: &mut Lowerer<'a>, ast: &'a AstProgram) -> Result<(), LowerError> {
    inject_builtins(lowerer)?;

    for class in &ast.classes {
        lowerer.classes.insert(class.name, class);
    }

    for class in &ast.classes {
        let ty = lowerer.get_type(class.name)?.clone();
        let desc = emit_class_descriptor(&ty, lowerer.ctx, lowerer.interner, &mut lowerer.symbols);
        lowerer.descriptors.insert(class.name, desc.clone());
        lowerer.builder.push_type(desc);
    }

    for class in &ast.classes {
        synthesize_constructor(lowerer, class)?;
        for func in class.funcs() {
            lower_method_body(lowerer, class.name, func)?;
        }
    }

    synthesize_main(lowerer)?;
    Ok(())
}

//! The semantic `Context`: classes, attributes, methods and inheritance.
//!
//! Produced by the (out-of-scope) type checker and treated as read-only by
//! the lowering pass. `Context` is deliberately independent of `ExprArena`
//! — method *bodies* live in the AST's `FuncDecl`s, not here; `Context`
//! only carries the declaration-level shape needed to resolve names,
//! inheritance, and overrides.

use rustc_hash::FxHashMap;

use crate::name::Name;

/// A declared attribute: `name : declared_type`.
#[derive(Copy, Clone, Debug)]
pub struct Attribute {
    pub name: Name,
    pub declared_type: Name,
}

/// A declared method signature (no body — bodies live in `ast::FuncDecl`).
#[derive(Clone, Debug)]
pub struct Method {
    pub name: Name,
    pub param_types: Vec<Name>,
    pub return_type: Name,
}

/// One class's declaration-level shape.
#[derive(Clone, Debug)]
pub struct Type {
    pub name: Name,
    pub parent: Option<Name>,
    /// Declared in this class only, in source order.
    pub attributes: Vec<Attribute>,
    /// Declared in this class only, in source order.
    pub methods: Vec<Method>,
}

impl Type {
    /// Base-first attribute layout: every ancestor's own attributes (root
    /// first), then this class's own, each paired with the class that
    /// actually declares it.
    ///
    /// This is the instance layout: index `i` here must equal index `i` of
    /// `TypeDescriptor::attributes` for the corresponding CIL type.
    #[must_use]
    pub fn all_attributes(&self, ctx: &Context) -> Vec<(Attribute, Name)> {
        let mut out = match self.parent.and_then(|p| ctx.get_type(p)) {
            Some(parent) => parent.all_attributes(ctx),
            None => Vec::new(),
        };
        out.extend(self.attributes.iter().map(|a| (*a, self.name)));
        out
    }

    /// Base-first method table with overrides applied **in place**.
    ///
    /// Every ancestor's method keeps the vtable slot it was first
    /// introduced at; a subclass that redeclares a method name only swaps
    /// which `(Method, declaring-Type)` occupies that existing slot. Names
    /// with no ancestor declaration are appended, in this class's own
    /// declaration order, after every inherited slot.
    ///
    /// This in-place-override rule is what makes the layout-compatibility
    /// invariant hold: for any ancestor `A` of `self`, `A.all_methods()` is
    /// a prefix of `self.all_methods()` at matching indices, regardless of
    /// which descendants override which names (see `DESIGN.md`).
    #[must_use]
    pub fn all_methods(&self, ctx: &Context) -> Vec<(Method, Name)> {
        let mut out = match self.parent.and_then(|p| ctx.get_type(p)) {
            Some(parent) => parent.all_methods(ctx),
            None => Vec::new(),
        };
        for method in &self.methods {
            if let Some(slot) = out.iter_mut().find(|(m, _)| m.name == method.name) {
                *slot = (method.clone(), self.name);
            } else {
                out.push((method.clone(), self.name));
            }
        }
        out
    }

    /// Resolve a method by name, searching this class then its ancestors.
    /// Returns the method as declared by the most-derived class in the
    /// chain that defines (or overrides) it, together with that
    /// declaring class's name.
    #[must_use]
    pub fn get_method<'a>(&'a self, name: Name, ctx: &'a Context) -> Option<(&'a Method, Name)> {
        if let Some(m) = self.methods.iter().find(|m| m.name == name) {
            return Some((m, self.name));
        }
        let parent = ctx.get_type(self.parent?)?;
        parent.get_method(name, ctx)
    }
}

/// Mapping from type name to its declaration-level shape.
#[derive(Default)]
pub struct Context {
    types: FxHashMap<Name, Type>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ty: Type) {
        self.types.insert(ty.name, ty);
    }

    #[must_use]
    pub fn get_type(&self, name: Name) -> Option<&Type> {
        self.types.get(&name)
    }

    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.types.values()
    }
}

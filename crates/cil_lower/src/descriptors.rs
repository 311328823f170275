//! Class Descriptor Emitter.
//!
//! Turns a `cil_ast::Type`'s inheritance-aware attribute/method lists into a
//! `cil_ir::TypeDescriptor`: the attribute table (instance layout) and the
//! method dispatch table (vtable), both base-first. The hard work — walking
//! the chain and applying override-in-place — already lives on
//! `cil_ast::Type::all_attributes`/`all_methods`; this module only composes
//! the resulting names into CIL symbols.

use cil_ast::{Context, StringInterner, Type};
use cil_ir::{Symbol, SymbolTable, TypeDescriptor};

use crate::names::NameManager;

#[tracing::instrument(level = "debug", skip(ty, ctx, interner, symbols))]
pub fn emit_class_descriptor(
    ty: &Type,
    ctx: &Context,
    interner: &StringInterner,
    symbols: &mut SymbolTable,
) -> TypeDescriptor {
    let ty_name = interner.lookup(ty.name);
    let mut desc = TypeDescriptor::new(symbols.intern(ty_name));

    for (attr, declaring_type) in ty.all_attributes(ctx) {
        let attr_name = interner.lookup(attr.name);
        let declaring_name = interner.lookup(declaring_type);
        desc.attributes
            .push(NameManager::attr_symbol(symbols, declaring_name, attr_name));
    }

    for (method, declaring_type) in ty.all_methods(ctx) {
        let method_name = interner.lookup(method.name);
        let declaring_name = interner.lookup(declaring_type);
        let short: Symbol = symbols.intern(method_name);
        let func = NameManager::fn_symbol(symbols, method_name, declaring_name);
        desc.methods.push((short, func));
    }

    desc
}

//! Built-in Injector.
//!
//! Synthesizes descriptors, constructors, and primitive-op method bodies for
//! the five built-in classes. Unlike the class descriptor emitter, which
//! only lays out a user class's inherited shape from its AST, there is no
//! user-written body to lower for a built-in method — this module owns the
//! IR primitives directly.

#![allow(clippy::expect_used)]

use cil_ast::Type;
use cil_ir::{Instruction, RuntimeErrorKind, Symbol};

use crate::descriptors::emit_class_descriptor;
use crate::error::LowerError;
use crate::lower::Lowerer;
use crate::names::NameManager;

const BUILTINS: [&str; 5] = ["Object", "IO", "String", "Int", "Bool"];

#[tracing::instrument(level = "debug", skip(l))]
pub fn inject_builtins(l: &mut Lowerer<'_>) -> Result<(), LowerError> {
    for type_name in BUILTINS {
        inject_one(l, type_name)?;
    }
    Ok(())
}

fn inject_one(l: &mut Lowerer<'_>, type_name: &str) -> Result<(), LowerError> {
    let ty = l.get_type_by_display_name(type_name)?.clone();

    let desc = emit_class_descriptor(&ty, l.ctx, l.interner, &mut l.symbols);
    l.descriptors.insert(ty.name, desc.clone());
    l.builder.push_type(desc);

    synthesize_builtin_constructor(l, &ty, type_name);

    let own_methods = ty.methods.clone();
    for method in own_methods {
        let method_str = l.resolve(method.name).to_owned();
        synthesize_builtin_method(l, &ty, type_name, &method_str);
    }
    Ok(())
}

/// `allocate + return`, per §4.4: intrinsic attributes are left
/// uninitialized here — they are installed by literal-lowering or runtime
/// intrinsics, never by a built-in constructor.
fn synthesize_builtin_constructor(l: &mut Lowerer<'_>, ty: &Type, type_name: &str) {
    let ctor_sym = NameManager::constructor_symbol(&mut l.symbols, type_name);
    let self_symbol = l.self_symbol();
    l.begin_function(
        ty.name,
        ctor_sym,
        &format!("constructor_{type_name}"),
        self_symbol,
        &[],
    );
    let ty_sym = l.intern(type_name);
    l.emit(Instruction::Allocate {
        ty: ty_sym,
        dst: self_symbol,
    });
    l.emit(Instruction::Return {
        src: Some(self_symbol),
    });
    l.finish_function();
}

fn param(l: &mut Lowerer<'_>, name: &str) -> (String, Symbol) {
    (name.to_owned(), l.intern(name))
}

fn synthesize_builtin_method(l: &mut Lowerer<'_>, ty: &Type, type_name: &str, method: &str) {
    let fn_sym = NameManager::fn_symbol(&mut l.symbols, method, type_name);
    let self_symbol = l.self_symbol();

    let extra_params: Vec<(String, Symbol)> = match (type_name, method) {
        ("IO", "out_string") => vec![param(l, "s")],
        ("IO", "out_int") => vec![param(l, "i")],
        ("String", "concat") => vec![param(l, "other")],
        ("String", "substr") => vec![param(l, "i"), param(l, "n")],
        _ => Vec::new(),
    };

    l.begin_function(
        ty.name,
        fn_sym,
        &format!("{type_name}_{method}"),
        self_symbol,
        &extra_params,
    );

    match (type_name, method) {
        ("Object", "abort") => {
            l.emit(Instruction::RuntimeError {
                kind: RuntimeErrorKind::AbortSignal,
            });
        }
        ("Object", "copy") => {
            let dst = l.fresh_temp("copy");
            l.emit(Instruction::Copy {
                dst,
                src: self_symbol,
            });
            l.emit(Instruction::Return { src: Some(dst) });
        }
        ("Object", "type_name") => {
            let dst = l.fresh_temp("type_name");
            l.emit(Instruction::TypeName {
                dst,
                src: self_symbol,
            });
            l.emit(Instruction::Return { src: Some(dst) });
        }
        ("IO", "out_string") => {
            let s = extra_params[0].1;
            l.emit(Instruction::PrintStr { src: s });
            l.emit(Instruction::Return {
                src: Some(self_symbol),
            });
        }
        ("IO", "out_int") => {
            let i = extra_params[0].1;
            l.emit(Instruction::PrintInt { src: i });
            l.emit(Instruction::Return {
                src: Some(self_symbol),
            });
        }
        ("IO", "in_string" | "in_int") => {
            let dst = l.fresh_temp("read");
            l.emit(Instruction::Read { dst });
            l.emit(Instruction::Return { src: Some(dst) });
        }
        ("String", "length") => {
            let dst = l.fresh_temp("length");
            l.emit(Instruction::Length {
                dst,
                src: self_symbol,
            });
            l.emit(Instruction::Return { src: Some(dst) });
        }
        ("String", "concat") => {
            let other = extra_params[0].1;
            let dst = l.fresh_temp("concat");
            l.emit(Instruction::Concat {
                dst,
                lhs: self_symbol,
                rhs: other,
            });
            l.emit(Instruction::Return { src: Some(dst) });
        }
        ("String", "substr") => {
            let index = extra_params[0].1;
            let len = extra_params[1].1;
            let dst = l.fresh_temp("substr");
            l.emit(Instruction::Substring {
                dst,
                src: self_symbol,
                index,
                len,
            });
            l.emit(Instruction::Return { src: Some(dst) });
        }
        _ => unreachable!("built-in injector has no IR body for {type_name}.{method}"),
    }

    l.finish_function();
}

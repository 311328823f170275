//! Constructor Synthesizer.
//!
//! Emits `constructor_C` for a user class: allocate an instance, write the
//! type-default value into every attribute (inherited and own), then run
//! every attribute's initializer expression — inherited as well as own —
//! over the defaults. There is no constructor chaining to a parent's
//! constructor; each class's constructor is self-contained and reproduces
//! the whole ancestry's initialization inline. The two-phase ordering lets
//! an initializer observe a sibling attribute's default even if that
//! sibling hasn't run its own initializer yet.

use cil_ast::{Class, Name};
use cil_ir::Instruction;

use crate::error::LowerError;
use crate::expr::lower_expr;
use crate::lower::Lowerer;
use crate::names::NameManager;

#[tracing::instrument(level = "debug", skip(l, class))]
pub fn synthesize_constructor(l: &mut Lowerer<'_>, class: &Class) -> Result<(), LowerError> {
    let class_name_str = l.resolve(class.name).to_owned();
    let ctor_symbol = NameManager::constructor_symbol(&mut l.symbols, &class_name_str);
    let self_symbol = l.self_symbol();

    l.begin_function(class.name, ctor_symbol, &format!("constructor_{class_name_str}"), self_symbol, &[]);

    let ty_symbol = l.intern(&class_name_str);
    l.emit(Instruction::Allocate {
        ty: ty_symbol,
        dst: self_symbol,
    });

    // Phase 1: type-default value for every inherited + own attribute.
    let all_attrs = l.get_type(class.name)?.all_attributes(l.ctx);
    for (attr, _declaring) in &all_attrs {
        set_default(l, class.name, attr.name, attr.declared_type)?;
    }

    // Phase 2: every attribute's own initializer, inherited or own, in
    // base-first declaration order, each overwriting its attribute's
    // default. An attribute declared without an initializer keeps its
    // phase-1 default.
    for (attr, declaring) in &all_attrs {
        if let Some(init) = l.declared_initializer(*declaring, attr.name) {
            let tmp = l.fresh_temp("init");
            lower_expr(l, tmp, init)?;
            let (attr_sym, decl_type_sym) = l.attribute_decl(class.name, attr.name)?;
            l.emit(Instruction::SetAttrib {
                obj: self_symbol,
                attr: attr_sym,
                src: tmp,
                decl_type: decl_type_sym,
            });
        }
    }

    l.emit(Instruction::Return {
        src: Some(self_symbol),
    });
    l.finish_function();
    Ok(())
}

fn set_default(
    l: &mut Lowerer<'_>,
    class: Name,
    attr: Name,
    declared_type: Name,
) -> Result<(), LowerError> {
    let type_name_str = l.resolve(declared_type).to_owned();
    let type_name_sym = l.intern(&type_name_str);
    let tmp = l.fresh_temp("default");
    l.emit(Instruction::DefaultValue {
        dst: tmp,
        type_name: type_name_sym,
    });
    let self_symbol = l.self_symbol();
    let (attr_sym, decl_type_sym) = l.attribute_decl(class, attr)?;
    l.emit(Instruction::SetAttrib {
        obj: self_symbol,
        attr: attr_sym,
        src: tmp,
        decl_type: decl_type_sym,
    });
    Ok(())
}

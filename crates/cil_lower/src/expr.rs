//! Expression Lowerer.
//!
//! The polymorphic visitor: every `ExprKind` variant takes a destination
//! temporary and emits instructions such that, once the emitted block runs,
//! the destination holds the expression's value. A plain recursive function
//! over the tagged `ExprKind` rather than a trait-object visitor.

use cil_ast::{BinaryOp, ExprId, ExprKind, FuncDecl, Name, UnaryOp};
use cil_ir::{Instruction, Operand, Symbol};

use crate::error::LowerError;
use crate::lower::Lowerer;
use crate::names::NameManager;

/// Lower one user-declared method's body into its own CIL function.
#[tracing::instrument(level = "debug", skip(l, func))]
pub fn lower_method_body(l: &mut Lowerer<'_>, class: Name, func: &FuncDecl) -> Result<(), LowerError> {
    let class_str = l.resolve(class).to_owned();
    let method_str = l.resolve(func.name).to_owned();
    let fn_symbol = NameManager::fn_symbol(&mut l.symbols, &method_str, &class_str);
    let self_symbol = l.self_symbol();

    let params: Vec<(String, Symbol)> = func
        .params
        .iter()
        .map(|p| {
            let name_str = l.resolve(p.name).to_owned();
            let sym = l.intern(&name_str);
            (name_str, sym)
        })
        .collect();

    l.begin_function(
        class,
        fn_symbol,
        &format!("{class_str}_{method_str}"),
        self_symbol,
        &params,
    );

    let dst = l.fresh_temp("ret");
    lower_expr(l, dst, func.body)?;
    l.emit(Instruction::Return { src: Some(dst) });
    l.finish_function();
    Ok(())
}

#[tracing::instrument(level = "debug", skip(l))]
pub fn lower_expr(l: &mut Lowerer<'_>, dst: Symbol, id: ExprId) -> Result<(), LowerError> {
    let expr = l.arena.get(id).clone();
    match expr.kind {
        ExprKind::ConstantNum(n) => {
            l.emit(Instruction::Assign {
                dst,
                src: Operand::Int(n),
            });
        }

        ExprKind::Boolean(b) => {
            l.emit(Instruction::Assign {
                dst,
                src: Operand::Int(if b { 1 } else { 0 }),
            });
        }

        ExprKind::StringLit(content) => {
            let bytes = l.resolve(content).to_owned();
            let data_sym = l.names.next_data_id(&mut l.symbols);
            l.builder.push_data(cil_ir::DataItem {
                symbol: data_sym,
                bytes,
            });
            l.emit(Instruction::Load {
                dst,
                data: data_sym,
            });
        }

        ExprKind::Variable { name } => lower_variable_read(l, dst, name)?,

        ExprKind::Assign { name, value } => {
            lower_expr(l, dst, value)?;
            if l.is_attribute(name) {
                let class = l.current_class();
                let (attr_sym, decl_type_sym) = l.attribute_decl(class, name)?;
                let self_symbol = l.self_symbol();
                l.emit(Instruction::SetAttrib {
                    obj: self_symbol,
                    attr: attr_sym,
                    src: dst,
                    decl_type: decl_type_sym,
                });
            } else {
                let local = l.local_symbol(name);
                l.emit(Instruction::Assign {
                    dst: local,
                    src: Operand::Local(dst),
                });
            }
        }

        ExprKind::Binary { op, left, right } => {
            let lhs = l.fresh_temp("lhs");
            lower_expr(l, lhs, left)?;
            let rhs = l.fresh_temp("rhs");
            lower_expr(l, rhs, right)?;
            l.emit(binary_instruction(op, dst, lhs, rhs));
        }

        ExprKind::Unary { op, operand } => lower_unary(l, dst, op, operand)?,

        ExprKind::Instantiate { type_name } => {
            let ty_str = l.resolve(type_name).to_owned();
            let ctor = NameManager::constructor_symbol(&mut l.symbols, &ty_str);
            l.emit(Instruction::StaticCall { func: ctor, dst });
        }

        ExprKind::DefaultValue { type_name } => {
            let ty_str = l.resolve(type_name).to_owned();
            let ty_sym = l.intern(&ty_str);
            l.emit(Instruction::DefaultValue {
                dst,
                type_name: ty_sym,
            });
        }

        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let c = l.fresh_temp("cond");
            lower_expr(l, c, cond)?;
            let then_label = l.fresh_label("THEN");
            let end_label = l.fresh_label("END_IF");
            l.emit(Instruction::GotoIf {
                cond: c,
                target: then_label,
            });
            // Else branch lowers before then, matching the specified
            // instruction order (S5).
            lower_expr(l, dst, else_branch)?;
            l.emit(Instruction::Goto { target: end_label });
            l.emit(Instruction::Label { name: then_label });
            lower_expr(l, dst, then_branch)?;
            l.emit(Instruction::Label { name: end_label });
        }

        ExprKind::While { cond, body } => {
            let while_label = l.fresh_label("WHILE");
            let body_label = l.fresh_label("BODY");
            let end_label = l.fresh_label("END_WHILE");

            l.emit(Instruction::Label { name: while_label });
            let c = l.fresh_temp("cond");
            lower_expr(l, c, cond)?;
            l.emit(Instruction::GotoIf {
                cond: c,
                target: body_label,
            });
            l.emit(Instruction::Goto { target: end_label });
            l.emit(Instruction::Label { name: body_label });
            let throwaway = l.fresh_temp("loop_body");
            lower_expr(l, throwaway, body)?;
            l.emit(Instruction::Goto { target: while_label });
            l.emit(Instruction::Label { name: end_label });

            let void_ty = l.intern("Void");
            l.emit(Instruction::DefaultValue {
                dst,
                type_name: void_ty,
            });
        }

        ExprKind::Block { exprs } => {
            let ids: Vec<ExprId> = l.arena.get_list(exprs).to_vec();
            for sub in ids {
                lower_expr(l, dst, sub)?;
            }
        }

        ExprKind::Let { bindings, body } => {
            let mut shadowed = Vec::with_capacity(bindings.len());
            for binding in &bindings {
                let name_str = l.resolve(binding.name).to_owned();
                let sym = l.intern(&name_str);
                match binding.init {
                    Some(init) => lower_expr(l, sym, init)?,
                    None => {
                        let ty_str = l.resolve(binding.declared_type).to_owned();
                        let ty_sym = l.intern(&ty_str);
                        l.emit(Instruction::DefaultValue {
                            dst: sym,
                            type_name: ty_sym,
                        });
                    }
                }
                let prior = l.declare_local(&name_str, sym);
                shadowed.push((name_str, prior));
            }

            lower_expr(l, dst, body)?;

            for (name_str, prior) in shadowed.into_iter().rev() {
                l.restore_local(&name_str, prior);
            }
        }

        ExprKind::Case { .. } => return Err(LowerError::UnsupportedCase),

        ExprKind::Call {
            receiver,
            method,
            static_dispatch,
            args,
        } => lower_call(l, dst, receiver, method, static_dispatch, args)?,
    }
    Ok(())
}

fn lower_variable_read(l: &mut Lowerer<'_>, dst: Symbol, name: Name) -> Result<(), LowerError> {
    if l.is_attribute(name) {
        let class = l.current_class();
        let (attr_sym, decl_type_sym) = l.attribute_decl(class, name)?;
        let self_symbol = l.self_symbol();
        l.emit(Instruction::GetAttrib {
            dst,
            obj: self_symbol,
            attr: attr_sym,
            decl_type: decl_type_sym,
        });
    } else {
        let local = l.local_symbol(name);
        l.emit(Instruction::Assign {
            dst,
            src: Operand::Local(local),
        });
    }
    Ok(())
}

fn binary_instruction(op: BinaryOp, dst: Symbol, lhs: Symbol, rhs: Symbol) -> Instruction {
    match op {
        BinaryOp::Plus => Instruction::Plus { dst, lhs, rhs },
        BinaryOp::Minus => Instruction::Minus { dst, lhs, rhs },
        BinaryOp::Star => Instruction::Star { dst, lhs, rhs },
        BinaryOp::Div => Instruction::Div { dst, lhs, rhs },
        BinaryOp::Less => Instruction::Less { dst, lhs, rhs },
        BinaryOp::LessEqual => Instruction::LessEqual { dst, lhs, rhs },
        BinaryOp::Equal => Instruction::Equal { dst, lhs, rhs },
    }
}

fn lower_unary(l: &mut Lowerer<'_>, dst: Symbol, op: UnaryOp, operand: ExprId) -> Result<(), LowerError> {
    let v = l.fresh_temp("operand");
    lower_expr(l, v, operand)?;
    match op {
        UnaryOp::Not => {
            // Preserves the original backend's exact sequence: allocate a
            // throwaway `Bool` via `constructor_Bool`, immediately
            // overwrite it with the literal `1`, then encode `not v` as
            // `1 - v`.
            let c = l.fresh_temp("not_const");
            let ctor_bool = NameManager::constructor_symbol(&mut l.symbols, "Bool");
            l.emit(Instruction::StaticCall { func: ctor_bool, dst: c });
            l.emit(Instruction::Assign {
                dst: c,
                src: Operand::Int(1),
            });
            l.emit(Instruction::Minus { dst, lhs: c, rhs: v });
        }
        UnaryOp::Neg => {
            l.emit(Instruction::IntComplement { dst, src: v });
        }
        UnaryOp::IsVoid => {
            l.emit(Instruction::IsVoid { dst, src: v });
        }
    }
    Ok(())
}

#[allow(clippy::expect_used, reason = "type_holder is Some whenever static_dispatch is None")]
fn lower_call(
    l: &mut Lowerer<'_>,
    dst: Symbol,
    receiver: Option<ExprId>,
    method: Name,
    static_dispatch: Option<Name>,
    args: cil_ast::ExprRange,
) -> Result<(), LowerError> {
    let instance = l.fresh_temp("recv");
    let obj_type = match receiver {
        Some(recv_id) => {
            lower_expr(l, instance, recv_id)?;
            l.arena.get(recv_id).static_type
        }
        None => {
            let self_symbol = l.self_symbol();
            l.emit(Instruction::Assign {
                dst: instance,
                src: Operand::Local(self_symbol),
            });
            l.current_class()
        }
    };

    let type_holder = if static_dispatch.is_none() {
        let holder = l.fresh_temp("type");
        l.emit(Instruction::TypeOf {
            src: instance,
            dst: holder,
        });
        Some(holder)
    } else {
        None
    };

    let arg_ids: Vec<ExprId> = l.arena.get_list(args).to_vec();
    let mut arg_temps = Vec::with_capacity(arg_ids.len());
    for arg_id in arg_ids {
        let t = l.fresh_temp("arg");
        lower_expr(l, t, arg_id)?;
        arg_temps.push(t);
    }

    l.emit(Instruction::Arg { src: instance });
    for t in &arg_temps {
        l.emit(Instruction::Arg { src: *t });
    }

    match static_dispatch {
        Some(target_type) => {
            let func = l.static_fn_symbol(target_type, method)?;
            l.emit(Instruction::StaticCall { func, dst });
        }
        None => {
            let holder = type_holder.expect("dynamic dispatch always reifies a type holder");
            let vtable_index = l.vtable_index(obj_type, method)?;
            l.emit(Instruction::DynamicCall {
                ty: holder,
                vtable_index,
                dst,
            });
        }
    }
    Ok(())
}

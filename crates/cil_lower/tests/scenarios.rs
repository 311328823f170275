//! End-to-end lowering scenarios.
//!
//! Each test hand-builds the minimal `Program` + `Context` + `ExprArena` a
//! type checker would have produced for one short source snippet, runs it
//! through `lower_program`, and checks the resulting instruction shape.
//! There is no parser in this crate, so every scenario is assembled
//! directly against the AST types rather than written as source text.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "test assertions")]

use cil_ast::{
    AttrDecl, Attribute, BinaryOp, Class, Context, Expr, ExprArena, ExprKind, Feature, FuncDecl,
    Method, Program as AstProgram, StringInterner, Type, UnaryOp,
};
use cil_ir::{Instruction, Operand, Program as CilProgram};
use cil_lower::lower_program;
use pretty_assertions::assert_eq;

/// Registers the five built-in classes exactly as the type checker would,
/// with the subset of methods/attributes these scenarios actually call.
fn base_context() -> (Context, StringInterner) {
    let mut interner = StringInterner::new();
    let mut ctx = Context::new();

    let object = interner.intern("Object");
    let io = interner.intern("IO");
    let string = interner.intern("String");
    let int = interner.intern("Int");
    let boolean = interner.intern("Bool");

    let out_string = interner.intern("out_string");

    ctx.insert(Type {
        name: object,
        parent: None,
        attributes: Vec::new(),
        methods: Vec::new(),
    });
    ctx.insert(Type {
        name: io,
        parent: Some(object),
        attributes: Vec::new(),
        methods: vec![Method {
            name: out_string,
            param_types: vec![string],
            return_type: io,
        }],
    });
    ctx.insert(Type {
        name: string,
        parent: Some(object),
        attributes: Vec::new(),
        methods: Vec::new(),
    });
    ctx.insert(Type {
        name: int,
        parent: Some(object),
        attributes: Vec::new(),
        methods: Vec::new(),
    });
    ctx.insert(Type {
        name: boolean,
        parent: Some(object),
        attributes: Vec::new(),
        methods: Vec::new(),
    });

    (ctx, interner)
}

fn find_fn<'p>(program: &'p CilProgram, name: &str) -> &'p cil_ir::Function {
    program
        .functions
        .iter()
        .find(|f| program.symbols.resolve(f.name) == name)
        .unwrap_or_else(|| panic!("no function named {name} in {:?}", program.functions))
}

/// S1. `class Main { main(): Int { 42 }; }` → `Main_main` is
/// `Assign(t, 42); Return(t)`.
#[test]
fn s1_constant_method_body() {
    let (mut ctx, mut interner) = base_context();
    let object = interner.intern("Object");
    let main = interner.intern("Main");
    let int_ty = interner.intern("Int");
    let main_method = interner.intern("main");

    ctx.insert(Type {
        name: main,
        parent: Some(object),
        attributes: Vec::new(),
        methods: vec![Method {
            name: main_method,
            param_types: Vec::new(),
            return_type: int_ty,
        }],
    });

    let mut arena = ExprArena::new();
    let const42 = arena.alloc(Expr {
        kind: ExprKind::ConstantNum(42),
        static_type: int_ty,
    });

    let main_class = Class {
        name: main,
        parent: Some(object),
        features: vec![Feature::Func(FuncDecl {
            name: main_method,
            params: Vec::new(),
            return_type: int_ty,
            body: const42,
        })],
    };
    let ast = AstProgram { classes: vec![main_class] };

    let program = lower_program(&ast, &ctx, &arena, &interner).unwrap();
    let f = find_fn(&program, "Main_main");

    assert_eq!(f.body.len(), 2);
    assert!(matches!(
        f.body[0],
        Instruction::Assign { src: Operand::Int(42), .. }
    ));
    let Instruction::Assign { dst, .. } = f.body[0] else { unreachable!() };
    assert_eq!(f.body[1], Instruction::Return { src: Some(dst) });
}

/// S2. `class Main inherits IO { main(): IO { out_string("hi") }; }` — the
/// dynamic call sequence contains `Load`, `Arg(self)`, `Arg(t)`,
/// `DynamicCall`, `Return`, in that order (interleaved with a `TypeOf`).
#[test]
fn s2_dynamic_dispatch_with_string_literal() {
    let (mut ctx, mut interner) = base_context();
    let io = interner.intern("IO");
    let main = interner.intern("Main");
    let string = interner.intern("String");
    let out_string = interner.intern("out_string");
    let main_method = interner.intern("main");

    ctx.insert(Type {
        name: main,
        parent: Some(io),
        attributes: Vec::new(),
        methods: vec![Method {
            name: main_method,
            param_types: Vec::new(),
            return_type: io,
        }],
    });

    let mut arena = ExprArena::new();
    let hi = arena.alloc(Expr {
        kind: ExprKind::StringLit(interner.intern("hi")),
        static_type: string,
    });
    let args = arena.alloc_list(&[hi]);
    let call = arena.alloc(Expr {
        kind: ExprKind::Call {
            receiver: None,
            method: out_string,
            static_dispatch: None,
            args,
        },
        static_type: io,
    });

    let main_class = Class {
        name: main,
        parent: Some(io),
        features: vec![Feature::Func(FuncDecl {
            name: main_method,
            params: Vec::new(),
            return_type: io,
            body: call,
        })],
    };
    let ast = AstProgram { classes: vec![main_class] };

    let program = lower_program(&ast, &ctx, &arena, &interner).unwrap();
    let f = find_fn(&program, "Main_main");

    assert_eq!(program.data.len(), 1);
    assert_eq!(program.data[0].bytes, "hi");

    let kinds: Vec<&'static str> = f
        .body
        .iter()
        .map(|i| match i {
            Instruction::Assign { .. } => "Assign",
            Instruction::Load { .. } => "Load",
            Instruction::Arg { .. } => "Arg",
            Instruction::DynamicCall { .. } => "DynamicCall",
            Instruction::Return { .. } => "Return",
            Instruction::TypeOf { .. } => "TypeOf",
            other => panic!("unexpected instruction {other:?}"),
        })
        .collect();

    // "contains", not "equals" — the receiver/type-reification instructions
    // may appear in either order ahead of the actual call.
    let call_shape: Vec<_> = kinds
        .iter()
        .filter(|k| !matches!(**k, "Assign" | "TypeOf"))
        .copied()
        .collect();
    assert_eq!(call_shape, ["Load", "Arg", "Arg", "DynamicCall", "Return"]);
    assert!(kinds.contains(&"Assign")); // Assign(instance, self)
    assert!(kinds.contains(&"TypeOf"));
}

/// S3. `class A { x:Int<-3; }; class B inherits A { y:Int<-x+1; };` —
/// `B`'s layout is base-first `[A_x, B_y]`, and `constructor_B` runs every
/// attribute's own initializer (inherited `x<-3` as well as `y<-x+1`),
/// not only the ones it declares itself.
#[test]
fn s3_inherited_layout_and_full_initializer_chain() {
    let (mut ctx, mut interner) = base_context();
    let object = interner.intern("Object");
    let a = interner.intern("A");
    let b = interner.intern("B");
    let int_ty = interner.intern("Int");
    let x = interner.intern("x");
    let y = interner.intern("y");

    ctx.insert(Type {
        name: a,
        parent: Some(object),
        attributes: vec![Attribute { name: x, declared_type: int_ty }],
        methods: Vec::new(),
    });
    ctx.insert(Type {
        name: b,
        parent: Some(a),
        attributes: vec![Attribute { name: y, declared_type: int_ty }],
        methods: Vec::new(),
    });

    let mut arena = ExprArena::new();
    let three = arena.alloc(Expr { kind: ExprKind::ConstantNum(3), static_type: int_ty });
    let one = arena.alloc(Expr { kind: ExprKind::ConstantNum(1), static_type: int_ty });
    let x_read = arena.alloc(Expr { kind: ExprKind::Variable { name: x }, static_type: int_ty });
    let x_plus_one = arena.alloc(Expr {
        kind: ExprKind::Binary { op: BinaryOp::Plus, left: x_read, right: one },
        static_type: int_ty,
    });

    let class_a = Class {
        name: a,
        parent: Some(object),
        features: vec![Feature::Attr(AttrDecl { name: x, declared_type: int_ty, init: Some(three) })],
    };
    let class_b = Class {
        name: b,
        parent: Some(a),
        features: vec![Feature::Attr(AttrDecl { name: y, declared_type: int_ty, init: Some(x_plus_one) })],
    };
    let ast = AstProgram { classes: vec![class_a, class_b] };

    let program = lower_program(&ast, &ctx, &arena, &interner).unwrap();

    let desc = program
        .types
        .iter()
        .find(|t| program.symbols.resolve(t.name) == "B")
        .unwrap();
    let attr_names: Vec<&str> = desc.attributes.iter().map(|s| program.symbols.resolve(*s)).collect();
    assert_eq!(attr_names, ["A_x", "B_y"]);

    let ctor_b = find_fn(&program, "constructor_B");
    let kinds: Vec<&'static str> = ctor_b
        .body
        .iter()
        .map(|i| match i {
            Instruction::Allocate { .. } => "Allocate",
            Instruction::DefaultValue { .. } => "DefaultValue",
            Instruction::SetAttrib { .. } => "SetAttrib",
            Instruction::Assign { .. } => "Assign",
            Instruction::GetAttrib { .. } => "GetAttrib",
            Instruction::Plus { .. } => "Plus",
            Instruction::Return { .. } => "Return",
            other => panic!("unexpected instruction {other:?}"),
        })
        .collect();
    // Allocate; default(A_x); set(A_x); default(B_y); set(B_y); then the
    // initializer pass: set(A_x)<-3, then set(B_y)<-GetAttrib(A_x)+1.
    assert_eq!(
        kinds,
        [
            "Allocate",
            "DefaultValue", "SetAttrib",
            "DefaultValue", "SetAttrib",
            "Assign", "SetAttrib",
            "GetAttrib", "Assign", "Plus", "SetAttrib",
            "Return",
        ]
    );

    let set_attrib_targets: Vec<&str> = ctor_b
        .body
        .iter()
        .filter_map(|i| match i {
            Instruction::SetAttrib { attr, .. } => Some(program.symbols.resolve(*attr)),
            _ => None,
        })
        .collect();
    assert_eq!(set_attrib_targets, ["A_x", "B_y", "A_x", "B_y"]);
}

/// S4. `while true loop 1 pool` emits the label-guarded loop shape and ends
/// in `DefaultValue(dst, Void)`.
#[test]
fn s4_while_loop_shape() {
    let (mut ctx, mut interner) = base_context();
    let object = interner.intern("Object");
    let main = interner.intern("Main");
    let int_ty = interner.intern("Int");
    let bool_ty = interner.intern("Bool");
    let main_method = interner.intern("main");

    ctx.insert(Type {
        name: main,
        parent: Some(object),
        attributes: Vec::new(),
        methods: vec![Method { name: main_method, param_types: Vec::new(), return_type: object }],
    });

    let mut arena = ExprArena::new();
    let cond = arena.alloc(Expr { kind: ExprKind::Boolean(true), static_type: bool_ty });
    let body = arena.alloc(Expr { kind: ExprKind::ConstantNum(1), static_type: int_ty });
    let while_expr = arena.alloc(Expr {
        kind: ExprKind::While { cond, body },
        static_type: object,
    });

    let main_class = Class {
        name: main,
        parent: Some(object),
        features: vec![Feature::Func(FuncDecl {
            name: main_method,
            params: Vec::new(),
            return_type: object,
            body: while_expr,
        })],
    };
    let ast = AstProgram { classes: vec![main_class] };

    let program = lower_program(&ast, &ctx, &arena, &interner).unwrap();
    let f = find_fn(&program, "Main_main");

    let labels: Vec<&str> = f
        .body
        .iter()
        .filter_map(|i| match i {
            Instruction::Label { name } => Some(program.symbols.resolve(*name)),
            _ => None,
        })
        .collect();
    assert_eq!(labels.len(), 3);
    assert!(labels[0].starts_with("WHILE_"));
    assert!(labels[1].starts_with("BODY_"));
    assert!(labels[2].starts_with("END_WHILE_"));

    assert!(matches!(f.body[0], Instruction::Label { .. }));
    assert!(matches!(f.body[1], Instruction::Assign { .. })); // cond <- true
    assert!(matches!(f.body[2], Instruction::GotoIf { .. }));
    assert!(matches!(f.body[3], Instruction::Goto { .. }));
    assert!(matches!(f.body[4], Instruction::Label { .. }));
    assert!(matches!(f.body[5], Instruction::Assign { .. })); // loop body <- 1
    assert!(matches!(f.body[6], Instruction::Goto { .. }));
    assert!(matches!(f.body[7], Instruction::Label { .. }));
    assert!(matches!(f.body[8], Instruction::DefaultValue { .. }));

    // Every goto/gotoif in this body targets a label this same body defines.
    let defined: std::collections::HashSet<_> = f.body.iter().filter_map(Instruction::label_def).collect();
    for instr in &f.body {
        if let Some(target) = instr.goto_target() {
            assert!(defined.contains(&target));
        }
    }
}

/// S5. `if isvoid self then 0 else 1 fi` — the **else** branch lowers
/// before the **then** branch in instruction order.
#[test]
fn s5_if_else_lowers_before_then() {
    let (mut ctx, mut interner) = base_context();
    let object = interner.intern("Object");
    let main = interner.intern("Main");
    let int_ty = interner.intern("Int");
    let main_method = interner.intern("main");

    ctx.insert(Type {
        name: main,
        parent: Some(object),
        attributes: Vec::new(),
        methods: vec![Method { name: main_method, param_types: Vec::new(), return_type: int_ty }],
    });

    let mut arena = ExprArena::new();
    let self_read = arena.alloc(Expr { kind: ExprKind::Variable { name: interner.intern("self") }, static_type: object });
    let cond = arena.alloc(Expr {
        kind: ExprKind::Unary { op: UnaryOp::IsVoid, operand: self_read },
        static_type: interner.intern("Bool"),
    });
    let then_branch = arena.alloc(Expr { kind: ExprKind::ConstantNum(0), static_type: int_ty });
    let else_branch = arena.alloc(Expr { kind: ExprKind::ConstantNum(1), static_type: int_ty });
    let if_expr = arena.alloc(Expr {
        kind: ExprKind::If { cond, then_branch, else_branch },
        static_type: int_ty,
    });

    let main_class = Class {
        name: main,
        parent: Some(object),
        features: vec![Feature::Func(FuncDecl {
            name: main_method,
            params: Vec::new(),
            return_type: int_ty,
            body: if_expr,
        })],
    };
    let ast = AstProgram { classes: vec![main_class] };

    let program = lower_program(&ast, &ctx, &arena, &interner).unwrap();
    let f = find_fn(&program, "Main_main");

    // `self` is read as a plain `Variable` here, so evaluating the `isvoid`
    // operand itself costs an `Assign` before the `IsVoid`.
    assert!(matches!(f.body[0], Instruction::Assign { src: Operand::Local(_), .. }));
    assert!(matches!(f.body[1], Instruction::IsVoid { .. }));
    assert!(matches!(f.body[2], Instruction::GotoIf { .. }));
    let Instruction::Assign { src: Operand::Int(else_val), .. } = f.body[3] else {
        panic!("expected else branch's Assign first, got {:?}", f.body[3]);
    };
    assert_eq!(else_val, 1);
    assert!(matches!(f.body[4], Instruction::Goto { .. }));
    assert!(matches!(f.body[5], Instruction::Label { .. }));
    let Instruction::Assign { src: Operand::Int(then_val), .. } = f.body[6] else {
        panic!("expected then branch's Assign second, got {:?}", f.body[6]);
    };
    assert_eq!(then_val, 0);
    assert!(matches!(f.body[7], Instruction::Label { .. }));
}

/// S6. `new Foo.bar(7)` with `Foo` a user class: instantiate, evaluate the
/// argument, reify the receiver's type, then dispatch dynamically.
#[test]
fn s6_instantiate_then_dynamic_call() {
    let (mut ctx, mut interner) = base_context();
    let object = interner.intern("Object");
    let main = interner.intern("Main");
    let foo = interner.intern("Foo");
    let int_ty = interner.intern("Int");
    let bar = interner.intern("bar");
    let main_method = interner.intern("main");

    ctx.insert(Type {
        name: foo,
        parent: Some(object),
        attributes: Vec::new(),
        methods: vec![Method { name: bar, param_types: vec![int_ty], return_type: int_ty }],
    });
    ctx.insert(Type {
        name: main,
        parent: Some(object),
        attributes: Vec::new(),
        methods: vec![Method { name: main_method, param_types: Vec::new(), return_type: int_ty }],
    });

    let mut arena = ExprArena::new();
    let new_foo = arena.alloc(Expr { kind: ExprKind::Instantiate { type_name: foo }, static_type: foo });
    let seven = arena.alloc(Expr { kind: ExprKind::ConstantNum(7), static_type: int_ty });
    let args = arena.alloc_list(&[seven]);
    let call = arena.alloc(Expr {
        kind: ExprKind::Call { receiver: Some(new_foo), method: bar, static_dispatch: None, args },
        static_type: int_ty,
    });

    let main_class = Class {
        name: main,
        parent: Some(object),
        features: vec![Feature::Func(FuncDecl {
            name: main_method,
            params: Vec::new(),
            return_type: int_ty,
            body: call,
        })],
    };
    let foo_class = Class { name: foo, parent: Some(object), features: Vec::new() };
    let ast = AstProgram { classes: vec![foo_class, main_class] };

    let program = lower_program(&ast, &ctx, &arena, &interner).unwrap();
    let f = find_fn(&program, "Main_main");

    let kinds: Vec<&'static str> = f
        .body
        .iter()
        .map(|i| match i {
            Instruction::StaticCall { .. } => "StaticCall",
            Instruction::Assign { .. } => "Assign",
            Instruction::TypeOf { .. } => "TypeOf",
            Instruction::Arg { .. } => "Arg",
            Instruction::DynamicCall { .. } => "DynamicCall",
            Instruction::Return { .. } => "Return",
            other => panic!("unexpected instruction {other:?}"),
        })
        .collect();
    // The type is reified right after the receiver resolves, before the
    // argument (`Assign(t, 7)`) is lowered — matching the component order
    // (reify type, then lower args), not the worked example's prose order.
    assert_eq!(
        kinds,
        ["StaticCall", "TypeOf", "Assign", "Arg", "Arg", "DynamicCall", "Return"]
    );

    let Instruction::StaticCall { func, .. } = f.body[0] else { unreachable!() };
    assert_eq!(program.symbols.resolve(func), "constructor_Foo");
}

/// Property: every function-body symbol that appears as a `StaticCall`
/// target resolves to exactly one emitted function name, across the whole
/// built-in injection plus a small user hierarchy (the "symbol closure"
/// invariant).
#[test]
fn static_call_targets_always_resolve_to_a_defined_function() {
    let (mut ctx, mut interner) = base_context();
    let object = interner.intern("Object");
    let main = interner.intern("Main");
    let int_ty = interner.intern("Int");
    let main_method = interner.intern("main");

    ctx.insert(Type {
        name: main,
        parent: Some(object),
        attributes: Vec::new(),
        methods: vec![Method { name: main_method, param_types: Vec::new(), return_type: int_ty }],
    });

    let mut arena = ExprArena::new();
    let const1 = arena.alloc(Expr { kind: ExprKind::ConstantNum(1), static_type: int_ty });
    let main_class = Class {
        name: main,
        parent: Some(object),
        features: vec![Feature::Func(FuncDecl {
            name: main_method,
            params: Vec::new(),
            return_type: int_ty,
            body: const1,
        })],
    };
    let ast = AstProgram { classes: vec![main_class] };

    let program = lower_program(&ast, &ctx, &arena, &interner).unwrap();
    let defined: std::collections::HashSet<_> = program.functions.iter().map(|f| f.name).collect();
    for f in &program.functions {
        for instr in &f.body {
            if let Instruction::StaticCall { func, .. } = instr {
                assert!(
                    defined.contains(func),
                    "{} calls undefined symbol {}",
                    program.symbols.resolve(f.name),
                    program.symbols.resolve(*func)
                );
            }
        }
    }
}

//! Entry-Point Synthesizer.
//!
//! Emits the IR `main` function: invoke `Main`'s constructor, call
//! `Main.main`, exit. `main` is not a method — it takes no `self` parameter
//! and is always the last function appended to the program.

use cil_ir::Instruction;

use crate::error::LowerError;
use crate::lower::Lowerer;
use crate::names::NameManager;

#[tracing::instrument(level = "debug", skip(l))]
pub fn synthesize_main(l: &mut Lowerer<'_>) -> Result<(), LowerError> {
    let main_sym = l.intern("main");
    l.names.enter_function("main");
    l.builder.begin_function(main_sym, Vec::new());

    let instance = l.fresh_temp("main_instance");
    let ctor_main = NameManager::constructor_symbol(&mut l.symbols, "Main");
    l.emit(Instruction::StaticCall {
        func: ctor_main,
        dst: instance,
    });
    l.emit(Instruction::Arg { src: instance });

    let main_main = NameManager::fn_symbol(&mut l.symbols, "main", "Main");
    let result = l.fresh_temp("main_result");
    l.emit(Instruction::StaticCall {
        func: main_main,
        dst: result,
    });
    l.emit(Instruction::Exit);

    l.builder.finish_function();
    Ok(())
}

//! WAT module assembly
//!
//! Wraps the lowered functions into one complete `(module ...)`: the
//! fixed runtime import block, one mutable global per program variable
//! plus the heap top, every method and free function, and the exported
//! `_start` entry holding the top-level statements.

use std::fmt;

use log::debug;

use crate::errors::CodegenError;
use crate::lower::{CodeGenerator, LoweredFunction};
use crate::wasm::{emit_instructions, WasmInst, HEAP_GLOBAL, SCRATCH_LOCAL};
use pwc_common::{CompilerError, HEAP_BASE};
use pwc_frontend::ast::Program;
use pwc_frontend::check_program;

/// Namespace every runtime import is resolved under
pub const IMPORT_NAMESPACE: &str = "imports";

/// Fixed runtime surface: (symbol, parameter count). Every import takes
/// i32 parameters and returns one i32, and every module declares the
/// whole set whether or not the program calls it.
pub const RUNTIME_IMPORTS: &[(&str, usize)] = &[
    ("print_num", 1),
    ("print_bool", 1),
    ("print_none", 1),
    ("abs", 1),
    ("max", 2),
    ("min", 2),
    ("pow", 2),
];

/// A program's global variable, declared directly with its initial value
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDef {
    pub name: String,
    pub init: i32,
}

/// A complete module ready to render as WAT text
#[derive(Debug, Clone, PartialEq)]
pub struct WatModule {
    pub globals: Vec<GlobalDef>,
    pub functions: Vec<LoweredFunction>,
    pub entry_body: Vec<WasmInst>,
    /// Whether `_start` declares `(result i32)`; true exactly when the
    /// last top-level statement is a bare expression
    pub entry_has_result: bool,
}

impl fmt::Display for WatModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(module")?;

        for (symbol, arity) in RUNTIME_IMPORTS {
            let params = " i32".repeat(*arity);
            writeln!(
                f,
                "  (func ${symbol} (import \"{IMPORT_NAMESPACE}\" \"{symbol}\") (param{params}) (result i32))"
            )?;
        }

        for global in &self.globals {
            writeln!(
                f,
                "  (global ${} (mut i32) (i32.const {}))",
                global.name, global.init
            )?;
        }
        writeln!(
            f,
            "  (global ${HEAP_GLOBAL} (mut i32) (i32.const {HEAP_BASE}))"
        )?;

        for fun in &self.functions {
            write!(f, "  (func ${}", fun.symbol)?;
            for param in &fun.params {
                write!(f, " (param ${param} i32)")?;
            }
            writeln!(f, " (result i32)")?;
            writeln!(f, "    (local ${SCRATCH_LOCAL} i32)")?;
            for local in &fun.locals {
                writeln!(f, "    (local ${local} i32)")?;
            }
            write!(f, "{}", emit_instructions(&fun.body, 2))?;
            writeln!(f, "  )")?;
        }

        write!(f, "  (func (export \"_start\")")?;
        if self.entry_has_result {
            write!(f, " (result i32)")?;
        }
        writeln!(f)?;
        writeln!(f, "    (local ${SCRATCH_LOCAL} i32)")?;
        write!(f, "{}", emit_instructions(&self.entry_body, 2))?;
        writeln!(f, "  )")?;

        write!(f, ")")
    }
}

/// Assemble a checked program into a [`WatModule`]
pub fn generate_module(program: &Program) -> Result<WatModule, CodegenError> {
    let mut gen = CodeGenerator::new(program);

    let globals = program
        .var_defs
        .iter()
        .map(|def| GlobalDef {
            name: def.name.clone(),
            init: def.literal.word_value(),
        })
        .collect();

    let mut functions = Vec::new();
    for class in &program.class_defs {
        for method in &class.methods {
            functions.push(gen.lower_function(method, Some(&class.name))?);
        }
    }
    for fun in &program.fun_defs {
        functions.push(gen.lower_function(fun, None)?);
    }

    let (entry_body, entry_has_result) = gen.lower_entry(&program.stmts)?;
    debug!(
        "lowered {} functions, entry result: {}",
        functions.len(),
        entry_has_result
    );

    Ok(WatModule {
        globals,
        functions,
        entry_body,
        entry_has_result,
    })
}

/// Full pipeline: type-check the program in place, then generate the
/// module and render it as WAT text.
pub fn compile(program: &mut Program) -> Result<String, CompilerError> {
    check_program(program)?;
    let module = generate_module(program)?;
    Ok(module.to_string())
}

//! Lowering from the checked AST to Wasm instruction sequences
//!
//! The generator walks a tree the checker has already annotated; any
//! gap it finds is an internal error, never a user diagnostic. Each
//! function lowers independently to a [`LoweredFunction`] that the
//! module assembler renders.

mod expressions;
mod statements;

use std::collections::{HashMap, HashSet};

use crate::errors::CodegenError;
use crate::wasm::{SCRATCH_LOCAL, WasmInst};
use pwc_frontend::ast::{FunctionDef, Program, Statement, StatementKind};
use pwc_frontend::semantic::layout::{method_symbol, ClassLayout};

/// Receiver name bound in every method body
pub const SELF_PARAM: &str = "self";

/// A function lowered to instructions, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredFunction {
    /// Emission symbol; methods are mangled with their class name
    pub symbol: String,
    /// Parameter names in declaration order, `self` first for methods
    pub params: Vec<String>,
    /// Declared local names, not counting the scratch cell
    pub locals: Vec<String>,
    pub body: Vec<WasmInst>,
}

/// Code generator state shared across one program
pub struct CodeGenerator {
    /// Object layout per class, fixed before any lowering starts
    layouts: HashMap<String, ClassLayout>,
    /// Names that resolve to locals in the function being lowered;
    /// everything else is a global
    locals: HashSet<String>,
}

impl CodeGenerator {
    pub fn new(program: &Program) -> Self {
        let layouts = program
            .class_defs
            .iter()
            .map(|class| (class.name.clone(), ClassLayout::for_class(class)))
            .collect();
        Self {
            layouts,
            locals: HashSet::new(),
        }
    }

    pub fn layout(&self, class: &str) -> Result<&ClassLayout, CodegenError> {
        self.layouts.get(class).ok_or_else(|| CodegenError::UnknownClass {
            name: class.to_string(),
        })
    }

    pub(crate) fn is_class(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Lower a function or, when `class` is given, a method. Declared
    /// locals are initialized from their literals before the body runs.
    /// A trailing `i32.const 0` backs the unconditional result slot so
    /// paths that fall off the end still produce a value.
    pub fn lower_function(
        &mut self,
        fun: &FunctionDef,
        class: Option<&str>,
    ) -> Result<LoweredFunction, CodegenError> {
        let symbol = match class {
            Some(class_name) => method_symbol(&fun.name, class_name),
            None => fun.name.clone(),
        };

        let mut params = Vec::new();
        if class.is_some() {
            params.push(SELF_PARAM.to_string());
        }
        params.extend(fun.params.iter().map(|p| p.name.clone()));
        let locals: Vec<String> = fun.locals.iter().map(|l| l.name.clone()).collect();

        self.locals = params.iter().chain(locals.iter()).cloned().collect();

        let mut body = Vec::new();
        for local in &fun.locals {
            body.push(WasmInst::I32Const(local.literal.word_value()));
            body.push(WasmInst::LocalSet(local.name.clone()));
        }
        self.lower_statements(&fun.body, &mut body)?;
        body.push(WasmInst::I32Const(0));

        self.locals.clear();

        Ok(LoweredFunction {
            symbol,
            params,
            locals,
            body,
        })
    }

    /// Lower the top-level statements into the entry body. Returns the
    /// instructions and whether the entry produces a result, which it
    /// does exactly when the last statement is a bare expression: its
    /// value is then read back from the scratch cell.
    pub fn lower_entry(&mut self, stmts: &[Statement]) -> Result<(Vec<WasmInst>, bool), CodegenError> {
        self.locals.clear();

        let mut body = Vec::new();
        self.lower_statements(stmts, &mut body)?;

        let has_result = matches!(
            stmts.last().map(|s| &s.kind),
            Some(StatementKind::Expr(_))
        );
        if has_result {
            body.push(WasmInst::LocalGet(SCRATCH_LOCAL.to_string()));
        }
        Ok((body, has_result))
    }
}

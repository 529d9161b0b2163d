//! Python-to-Wasm Compiler - Frontend
//!
//! This crate provides the analysis half of the compiler:
//! - AST: syntax tree definitions with type-annotation slots
//! - Types: the static type model and assignable-to relation
//! - Semantic analysis: the type checker, type environment, and class
//!   object layout
//!
//! Source parsing is an external collaborator; the tree arrives already
//! parsed (the driver accepts it as JSON via the AST's serde derives).

pub mod ast;
pub mod semantic;
pub mod types;

pub use ast::{
    BinaryOp, ClassDef, Expression, ExpressionKind, FunctionDef, Literal, Parameter, Program,
    Statement, StatementKind, UnaryOp, VarDef,
};
pub use semantic::{
    check_program, ClassInfo, ClassLayout, FieldSlot, FunctionSig, SemanticError, TypeChecker,
    TypeEnvironment,
};
pub use types::Type;

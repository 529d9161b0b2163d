//! Abstract Syntax Tree definitions for the typed Python subset
//!
//! This module defines the tree the external parser hands to the
//! compiler. Every expression and statement carries an annotation slot
//! (`expr_type` / `stmt_type`) that is empty on input and filled by
//! semantic analysis; code generation consumes only annotated trees.

pub mod expressions;
pub mod ops;
pub mod statements;

// Re-export commonly used types at module level
pub use expressions::{Expression, ExpressionKind, Literal};
pub use ops::{BinaryOp, UnaryOp};
pub use statements::{
    ClassDef, FunctionDef, Parameter, Program, Statement, StatementKind, VarDef,
};

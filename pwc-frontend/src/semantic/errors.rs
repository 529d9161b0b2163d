//! Semantic analysis error definitions
//!
//! Checking halts at the first violation; each variant names the
//! offending construct so the surfaced message can say what failed.

use crate::types::Type;
use pwc_common::CompilerError;
use thiserror::Error;

/// Semantic analysis errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("unbound identifier: {name}")]
    UnboundIdentifier { name: String },

    #[error("undefined function: {name}")]
    UndefinedFunction { name: String },

    #[error("undefined class: {name}")]
    UndefinedClass { name: String },

    #[error("class '{class}' has no field '{field}'")]
    UndefinedField { class: String, field: String },

    #[error("class '{class}' has no method '{method}'")]
    UndefinedMethod { class: String, method: String },

    #[error("duplicate {kind} definition: {name}")]
    DuplicateDefinition { kind: &'static str, name: String },

    #[error("{callee}: expected {expected} arguments, found {found}")]
    ArgumentCountMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },

    #[error("{callee}: argument {} has type {found}, expected {expected}", .index + 1)]
    ArgumentTypeMismatch {
        callee: String,
        index: usize,
        expected: Type,
        found: Type,
    },

    #[error("operator '{operator}' expects {expected} operands, found {found}")]
    OperandMismatch {
        operator: String,
        expected: Type,
        found: Type,
    },

    #[error("equality operands must both be int or both bool, found {left} and {right}")]
    EqualityOperandMismatch { left: Type, right: Type },

    #[error("'is' operands must both be <None>, found {left} and {right}")]
    IsOperandMismatch { left: Type, right: Type },

    #[error("variable '{name}' declared as {declared} but initialized with a {literal} literal")]
    VarDefMismatch {
        name: String,
        declared: Type,
        literal: Type,
    },

    #[error("cannot assign {found} to '{target}' of type {expected}")]
    IncompatibleAssignment {
        target: String,
        expected: Type,
        found: Type,
    },

    #[error("condition must be bool, found {found}")]
    ConditionNotBool { found: Type },

    #[error("return type mismatch: expected {expected}, found {found}")]
    ReturnTypeMismatch { expected: Type, found: Type },

    #[error("field or method access on non-object type {found}")]
    NonObjectReceiver { found: Type },

    #[error("'self' used outside a method body")]
    SelfOutsideMethod,

    #[error("constructor {class}() takes no arguments, found {found}")]
    ConstructorArguments { class: String, found: usize },

    #[error("__init__ of class '{class}' must take only self and return {class}")]
    BadConstructorSignature { class: String },

    #[error("unknown builtin: {name}")]
    UnknownBuiltin { name: String },
}

impl From<SemanticError> for CompilerError {
    fn from(err: SemanticError) -> Self {
        CompilerError::type_error(err.to_string())
    }
}

//! Code generation error definitions
//!
//! Code generation runs on a checked tree, so every variant here marks
//! an internal inconsistency rather than a user mistake: an annotation
//! the checker should have filled, or a name it should have rejected.

use pwc_common::CompilerError;
use thiserror::Error;

/// Code generation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodegenError {
    #[error("missing type annotation on {construct}")]
    MissingType { construct: String },

    #[error("unknown class in checked tree: {name}")]
    UnknownClass { name: String },

    #[error("class '{class}' has no field '{field}' in checked tree")]
    UnknownField { class: String, field: String },

    #[error("field access through non-object type {found}")]
    NonObjectReceiver { found: String },
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        CompilerError::codegen_error(err.to_string())
    }
}

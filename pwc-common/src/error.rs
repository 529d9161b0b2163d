//! Error handling for the Python-to-Wasm compiler
//!
//! This module defines the common error type shared by all phases of
//! compilation. Phase-local error enums (semantic analysis, code
//! generation) convert into [`CompilerError`] at the phase boundary.

use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    /// The input program violated the static type discipline. Checking
    /// stops at the first violation; no module is produced.
    #[error("Type error: {message}")]
    TypeError { message: String },

    /// Code generation found an inconsistency in a tree that was supposed
    /// to be fully checked. This indicates a checker bug, not bad input.
    #[error("Code generation error: {message}")]
    CodegenError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a type error
    pub fn type_error(message: String) -> Self {
        CompilerError::TypeError { message }
    }

    /// Create a codegen error
    pub fn codegen_error(message: String) -> Self {
        CompilerError::CodegenError { message }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

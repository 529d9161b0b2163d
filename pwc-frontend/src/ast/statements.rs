//! Statement and definition AST nodes

use super::expressions::{Expression, Literal};
use crate::types::Type;
use serde::{Deserialize, Serialize};

/// AST statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    /// Filled during semantic analysis; statements always resolve to the
    /// `None` type, the slot exists so annotation covers every node
    pub stmt_type: Option<Type>,
}

impl Statement {
    /// Create an unannotated statement
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            stmt_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// Expression evaluated for effect; its value lands in the scratch
    /// cell so a trailing expression surfaces as the program result
    Expr(Expression),

    /// Return from the enclosing function or method
    Return(Expression),

    Pass,

    /// Assignment to an already-declared variable
    Assign { name: String, value: Expression },

    /// Assignment to a field of an object-typed receiver
    FieldAssign {
        object: Expression,
        field: String,
        value: Expression,
    },

    /// Conditional; `elif` chains arrive pre-desugared into nested `If`
    /// statements in a singleton else-branch
    If {
        condition: Expression,
        then_body: Vec<Statement>,
        else_body: Vec<Statement>,
    },

    While {
        condition: Expression,
        body: Vec<Statement>,
    },
}

/// A variable declaration; always paired with a literal initializer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDef {
    pub name: String,
    pub var_type: Type,
    pub literal: Literal,
}

/// A function or method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
}

/// A function or method definition
///
/// For methods the receiver is implicit: `self` is not listed in
/// `params` but is bound in the method's checking environment and
/// becomes the leading parameter of the generated code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: Type,
    pub locals: Vec<VarDef>,
    pub body: Vec<Statement>,
}

/// A class definition: ordered fields and methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub fields: Vec<VarDef>,
    pub methods: Vec<FunctionDef>,
}

/// A whole program as delivered by the external parser
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub var_defs: Vec<VarDef>,
    pub class_defs: Vec<ClassDef>,
    pub fun_defs: Vec<FunctionDef>,
    pub stmts: Vec<Statement>,
}

//! Expression AST nodes

use super::ops::{BinaryOp, UnaryOp};
use crate::types::Type;
use serde::{Deserialize, Serialize};

/// AST expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    /// Filled during semantic analysis
    pub expr_type: Option<Type>,
}

impl Expression {
    /// Create an unannotated expression
    pub fn new(kind: ExpressionKind) -> Self {
        Self {
            kind,
            expr_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Literal value
    Literal(Literal),

    /// Identifier reference (a local, a global, or `self` in a method)
    Identifier { name: String },

    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// One-argument numeric builtin (`abs`)
    Builtin1 { name: String, arg: Box<Expression> },

    /// Two-argument numeric builtin (`max`, `min`, `pow`)
    Builtin2 {
        name: String,
        arg1: Box<Expression>,
        arg2: Box<Expression>,
    },

    /// Named call: a free function, `print`, or object construction when
    /// the name is a registered class. The parser cannot tell these
    /// apart; the class registry decides.
    Call { name: String, args: Vec<Expression> },

    /// Field access on an object-typed receiver
    Field {
        object: Box<Expression>,
        field: String,
    },

    /// Method call on an object-typed receiver; dispatch is static
    MethodCall {
        object: Box<Expression>,
        method: String,
        args: Vec<Expression>,
    },
}

/// Literal values; the only initializers allowed in declarations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Num(i32),
    Bool(bool),
    None,
}

impl Literal {
    /// The inferred type of this literal
    pub fn literal_type(&self) -> Type {
        match self {
            Literal::Num(_) => Type::Int,
            Literal::Bool(_) => Type::Bool,
            Literal::None => Type::None,
        }
    }

    /// The i32 representation used for storage slots
    pub fn word_value(&self) -> i32 {
        match self {
            Literal::Num(n) => *n,
            Literal::Bool(true) => 1,
            Literal::Bool(false) => 0,
            Literal::None => 0,
        }
    }
}

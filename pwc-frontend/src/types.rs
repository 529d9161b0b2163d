//! Static type model for the source subset
//!
//! Four types exist: `int`, `bool`, the `None` type, and object types
//! keyed by class name. There is no subtyping; the one compatibility
//! escape hatch is that the `None` literal may flow into any
//! object-typed location (the uninitialized-object sentinel).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A static type as resolved by the type checker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Type {
    Int,
    Bool,
    /// The type of the `None` literal and of value-less functions
    #[default]
    None,
    /// An instance of the named class
    Object(String),
}

impl Type {
    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Type::None)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Type::Object(_))
    }

    /// The class name, for object types
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Object(name) => Some(name),
            _ => None,
        }
    }

    /// The assignable-to relation: may a value of type `value` be stored
    /// into a location declared with `self`?
    ///
    /// Primitives require an exact match; object types require an exact
    /// class-name match, and additionally accept the `None` sentinel.
    pub fn accepts(&self, value: &Type) -> bool {
        match (self, value) {
            (Type::Object(_), Type::None) => true,
            _ => self == value,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::None => write!(f, "<None>"),
            Type::Object(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_assignability_is_exact() {
        assert!(Type::Int.accepts(&Type::Int));
        assert!(!Type::Int.accepts(&Type::Bool));
        assert!(!Type::Bool.accepts(&Type::Int));
        assert!(!Type::Int.accepts(&Type::None));
    }

    #[test]
    fn test_object_assignability() {
        let c = Type::Object("C".to_string());
        let d = Type::Object("D".to_string());

        assert!(c.accepts(&c));
        // No inheritance: class names must match exactly.
        assert!(!c.accepts(&d));
        // The None sentinel flows into any object-typed location...
        assert!(c.accepts(&Type::None));
        // ...but never the other way around.
        assert!(!Type::None.accepts(&c));
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::Bool.to_string(), "bool");
        assert_eq!(Type::None.to_string(), "<None>");
        assert_eq!(Type::Object("Counter".to_string()).to_string(), "Counter");
    }
}

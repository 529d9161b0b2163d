//! Class object layout
//!
//! Each class owns a flat record of its fields, one 32-bit slot each, in
//! declaration order. A field's index in that order is its permanent
//! storage slot; its byte offset from the object's base address is
//! `index * WORD_SIZE`. Methods are never stored per instance: dispatch
//! is static, so a method compiles to one symbol mangled with its class
//! name and no runtime vtable exists.

use crate::ast::{ClassDef, Expression, ExpressionKind, FunctionDef, Literal, Statement, StatementKind};
use crate::types::Type;
use pwc_common::WORD_SIZE;

/// Name of the initializer method every class ends up with
pub const INIT_METHOD: &str = "__init__";

/// Layout information for a single field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub name: String,
    pub field_type: Type,
    /// Default value stored into the slot before `__init__` runs
    pub init: Literal,
    /// Position in declaration order
    pub index: u32,
}

impl FieldSlot {
    /// Byte offset of this slot from the object's base address
    pub fn offset(&self) -> u32 {
        self.index * WORD_SIZE
    }
}

/// Memory layout of one class, fixed at declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassLayout {
    pub class_name: String,
    pub fields: Vec<FieldSlot>,
}

impl ClassLayout {
    /// Compute the layout for a class definition. Field order is the
    /// declaration order and never changes afterwards.
    pub fn for_class(def: &ClassDef) -> Self {
        let fields = def
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| FieldSlot {
                name: field.name.clone(),
                field_type: field.var_type.clone(),
                init: field.literal,
                index: index as u32,
            })
            .collect();

        Self {
            class_name: def.name.clone(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSlot> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Byte offset of the named field, if it exists
    pub fn field_offset(&self, name: &str) -> Option<u32> {
        self.field(name).map(FieldSlot::offset)
    }

    /// Total object size in bytes; also the amount the heap top advances
    /// per construction
    pub fn size_in_bytes(&self) -> u32 {
        self.fields.len() as u32 * WORD_SIZE
    }
}

/// Generated symbol for a method: the method name mangled with its
/// owning class. Static dispatch resolves to exactly this symbol.
pub fn method_symbol(method: &str, class: &str) -> String {
    format!("{method}${class}")
}

/// Whether the class declares its own `__init__`
pub fn has_declared_init(def: &ClassDef) -> bool {
    def.methods.iter().any(|m| m.name == INIT_METHOD)
}

/// Build the default initializer for a class that declares none: it
/// takes the implicit receiver and returns it unchanged, so object
/// construction always has a callable initializer.
pub fn synthesize_init(class_name: &str) -> FunctionDef {
    FunctionDef {
        name: INIT_METHOD.to_string(),
        params: Vec::new(),
        return_type: Type::Object(class_name.to_string()),
        locals: Vec::new(),
        body: vec![Statement::new(StatementKind::Return(Expression::new(
            ExpressionKind::Identifier {
                name: "self".to_string(),
            },
        )))],
    }
}

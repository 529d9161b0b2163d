//! Scoped symbol tables for type checking
//!
//! The environment tracks variable bindings, function signatures, the
//! class registry, the enclosing return type, and the enclosing class
//! name. Entering a function or method clones the environment, so a
//! body's locals can never leak into a sibling scope.

use crate::types::Type;
use std::collections::HashMap;

/// Signature of a function or method: parameter types and return type.
/// For methods the implicit receiver is not part of `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub params: Vec<Type>,
    pub return_type: Type,
}

/// What the registry knows about one class
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassInfo {
    /// Fields in declaration order; the position is the storage slot
    pub fields: Vec<(String, Type)>,
    pub methods: HashMap<String, FunctionSig>,
}

impl ClassInfo {
    pub fn field_type(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_type(name).is_some()
    }

    pub fn method(&self, name: &str) -> Option<&FunctionSig> {
        self.methods.get(name)
    }
}

/// Type environment for one checking scope
#[derive(Debug, Clone, Default)]
pub struct TypeEnvironment {
    vars: HashMap<String, Type>,
    functions: HashMap<String, FunctionSig>,
    classes: HashMap<String, ClassInfo>,
    return_type: Type,
    current_class: Option<String>,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh scope for a free function body: bindings are copied, the
    /// return type is replaced, and there is no enclosing class.
    pub fn enter_function(&self, return_type: Type) -> Self {
        let mut env = self.clone();
        env.return_type = return_type;
        env.current_class = None;
        env
    }

    /// Fresh scope for a method body: like [`enter_function`] but with
    /// the enclosing class set and `self` bound to it.
    ///
    /// [`enter_function`]: TypeEnvironment::enter_function
    pub fn enter_method(&self, class_name: &str, return_type: Type) -> Self {
        let mut env = self.enter_function(return_type);
        env.current_class = Some(class_name.to_string());
        env.vars
            .insert("self".to_string(), Type::Object(class_name.to_string()));
        env
    }

    pub fn bind_var(&mut self, name: &str, var_type: Type) {
        self.vars.insert(name.to_string(), var_type);
    }

    pub fn lookup_var(&self, name: &str) -> Option<&Type> {
        self.vars.get(name)
    }

    pub fn declare_function(&mut self, name: &str, sig: FunctionSig) {
        self.functions.insert(name.to_string(), sig);
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn register_class(&mut self, name: &str, info: ClassInfo) {
        self.classes.insert(name.to_string(), info);
    }

    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut ClassInfo> {
        self.classes.get_mut(name)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    /// The enclosing class name, set only inside a method body
    pub fn current_class(&self) -> Option<&str> {
        self.current_class.as_deref()
    }
}

//! Semantic analysis for the typed Python subset
//!
//! Performs type checking and class registration on the tree produced by
//! the external parser, annotating every expression and statement in
//! place. Checking halts at the first violation; a tree that comes back
//! `Ok` is fully annotated and ready for code generation.
//!
//! Processing order matters: class names are registered before any
//! member is examined (so classes may reference each other), then all
//! field lists and method signatures, then global variables and function
//! signatures, and only then are bodies checked.

pub mod env;
pub mod errors;
pub mod layout;

use crate::ast::*;
use crate::types::Type;
use log::debug;
use pwc_common::CompilerError;
use std::collections::HashSet;

pub use env::{ClassInfo, FunctionSig, TypeEnvironment};
pub use errors::SemanticError;
pub use layout::{ClassLayout, FieldSlot};

/// Builtins with one `int` argument
const BUILTINS_1: &[&str] = &["abs"];
/// Builtins with two `int` arguments
const BUILTINS_2: &[&str] = &["max", "min", "pow"];

/// Type checker context
pub struct TypeChecker {
    env: TypeEnvironment,
}

/// Check a whole program, annotating it in place
pub fn check_program(program: &mut Program) -> Result<(), CompilerError> {
    TypeChecker::new().check(program)
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            env: TypeEnvironment::new(),
        }
    }

    /// Run the full checking pass. On success every `expr_type` and
    /// `stmt_type` slot in the program is filled.
    pub fn check(&mut self, program: &mut Program) -> Result<(), CompilerError> {
        self.register_class_names(&program.class_defs)?;
        self.register_class_members(&mut program.class_defs)?;
        debug!("registered {} classes", program.class_defs.len());

        for def in &program.var_defs {
            self.declare_global(def)?;
        }

        self.register_functions(&program.fun_defs)?;

        for class in &mut program.class_defs {
            let class_name = class.name.clone();
            for method in &mut class.methods {
                debug!("checking method {}.{}", class_name, method.name);
                self.check_body(method, Some(&class_name))?;
            }
        }

        for fun in &mut program.fun_defs {
            debug!("checking function {}", fun.name);
            self.check_body(fun, None)?;
        }

        // Top-level statements run with no enclosing class or function;
        // `self` is a checking error here.
        self.check_statements(&mut program.stmts, &self.env.clone())?;
        debug!("type checking complete");
        Ok(())
    }

    /// Immutable view of the class registry built during checking
    pub fn environment(&self) -> &TypeEnvironment {
        &self.env
    }

    // ---- registration passes ----

    fn register_class_names(&mut self, classes: &[ClassDef]) -> Result<(), SemanticError> {
        for class in classes {
            if self.env.has_class(&class.name) {
                return Err(SemanticError::DuplicateDefinition {
                    kind: "class",
                    name: class.name.clone(),
                });
            }
            self.env.register_class(&class.name, ClassInfo::default());
        }
        Ok(())
    }

    fn register_class_members(&mut self, classes: &mut [ClassDef]) -> Result<(), SemanticError> {
        for class in classes.iter_mut() {
            let mut info = ClassInfo::default();

            for field in &class.fields {
                if info.has_field(&field.name) {
                    return Err(SemanticError::DuplicateDefinition {
                        kind: "field",
                        name: format!("{}.{}", class.name, field.name),
                    });
                }
                self.check_var_def(field)?;
                info.fields
                    .push((field.name.clone(), field.var_type.clone()));
            }

            if !layout::has_declared_init(class) {
                class.methods.push(layout::synthesize_init(&class.name));
            }

            for method in &class.methods {
                if info.methods.contains_key(&method.name) {
                    return Err(SemanticError::DuplicateDefinition {
                        kind: "method",
                        name: format!("{}.{}", class.name, method.name),
                    });
                }
                if method.name == layout::INIT_METHOD {
                    let returns_own_class = method.return_type.class_name() == Some(&class.name);
                    if !method.params.is_empty() || !returns_own_class {
                        return Err(SemanticError::BadConstructorSignature {
                            class: class.name.clone(),
                        });
                    }
                }
                self.validate_type(&method.return_type)?;
                for param in &method.params {
                    self.validate_type(&param.param_type)?;
                }
                info.methods.insert(
                    method.name.clone(),
                    FunctionSig {
                        params: method.params.iter().map(|p| p.param_type.clone()).collect(),
                        return_type: method.return_type.clone(),
                    },
                );
            }

            self.env.register_class(&class.name, info);
        }
        Ok(())
    }

    fn declare_global(&mut self, def: &VarDef) -> Result<(), SemanticError> {
        if self.env.lookup_var(&def.name).is_some() {
            return Err(SemanticError::DuplicateDefinition {
                kind: "variable",
                name: def.name.clone(),
            });
        }
        self.check_var_def(def)?;
        self.env.bind_var(&def.name, def.var_type.clone());
        Ok(())
    }

    fn register_functions(&mut self, funs: &[FunctionDef]) -> Result<(), SemanticError> {
        for fun in funs {
            if self.env.has_function(&fun.name) || self.env.has_class(&fun.name) {
                return Err(SemanticError::DuplicateDefinition {
                    kind: "function",
                    name: fun.name.clone(),
                });
            }
            self.validate_type(&fun.return_type)?;
            for param in &fun.params {
                self.validate_type(&param.param_type)?;
            }
            self.env.declare_function(
                &fun.name,
                FunctionSig {
                    params: fun.params.iter().map(|p| p.param_type.clone()).collect(),
                    return_type: fun.return_type.clone(),
                },
            );
        }
        Ok(())
    }

    // ---- declarations ----

    /// A declaration's literal must match its declared type exactly; the
    /// one exception is the `None` sentinel into an object-typed slot.
    fn check_var_def(&self, def: &VarDef) -> Result<(), SemanticError> {
        self.validate_type(&def.var_type)?;
        if !def.var_type.accepts(&def.literal.literal_type()) {
            return Err(SemanticError::VarDefMismatch {
                name: def.name.clone(),
                declared: def.var_type.clone(),
                literal: def.literal.literal_type(),
            });
        }
        Ok(())
    }

    /// Declared types may only name registered classes
    fn validate_type(&self, ty: &Type) -> Result<(), SemanticError> {
        if let Some(name) = ty.class_name() {
            if !self.env.has_class(name) {
                return Err(SemanticError::UndefinedClass {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    // ---- bodies ----

    fn check_body(
        &self,
        fun: &mut FunctionDef,
        class_name: Option<&str>,
    ) -> Result<(), CompilerError> {
        let mut env = match class_name {
            Some(class) => self.env.enter_method(class, fun.return_type.clone()),
            None => self.env.enter_function(fun.return_type.clone()),
        };

        let mut seen: HashSet<&str> = HashSet::new();
        if class_name.is_some() {
            seen.insert("self");
        }
        for param in &fun.params {
            if !seen.insert(&param.name) {
                return Err(SemanticError::DuplicateDefinition {
                    kind: "parameter",
                    name: param.name.clone(),
                }
                .into());
            }
            env.bind_var(&param.name, param.param_type.clone());
        }
        for local in &fun.locals {
            if !seen.insert(&local.name) {
                return Err(SemanticError::DuplicateDefinition {
                    kind: "local",
                    name: local.name.clone(),
                }
                .into());
            }
            self.check_var_def(local)?;
            env.bind_var(&local.name, local.var_type.clone());
        }

        // A None-returning body without a trailing return gets one
        // synthesized, so every body ends in a typed return.
        let ends_in_return = matches!(
            fun.body.last().map(|s| &s.kind),
            Some(StatementKind::Return(_))
        );
        if fun.return_type.is_none() && !ends_in_return {
            fun.body
                .push(Statement::new(StatementKind::Return(Expression::new(
                    ExpressionKind::Literal(Literal::None),
                ))));
        }

        self.check_statements(&mut fun.body, &env)?;
        Ok(())
    }

    // ---- statements ----

    fn check_statements(
        &self,
        stmts: &mut [Statement],
        env: &TypeEnvironment,
    ) -> Result<(), SemanticError> {
        for stmt in stmts {
            self.check_statement(stmt, env)?;
        }
        Ok(())
    }

    fn check_statement(
        &self,
        stmt: &mut Statement,
        env: &TypeEnvironment,
    ) -> Result<(), SemanticError> {
        match &mut stmt.kind {
            StatementKind::Expr(expr) => {
                self.check_expression(expr, env)?;
            }
            StatementKind::Pass => {}
            StatementKind::Return(value) => {
                let found = self.check_expression(value, env)?;
                if found != *env.return_type() {
                    return Err(SemanticError::ReturnTypeMismatch {
                        expected: env.return_type().clone(),
                        found,
                    });
                }
            }
            StatementKind::Assign { name, value } => {
                let declared = env
                    .lookup_var(name)
                    .cloned()
                    .ok_or_else(|| SemanticError::UnboundIdentifier { name: name.clone() })?;
                let found = self.check_expression(value, env)?;
                if !declared.accepts(&found) {
                    return Err(SemanticError::IncompatibleAssignment {
                        target: name.clone(),
                        expected: declared,
                        found,
                    });
                }
            }
            StatementKind::FieldAssign {
                object,
                field,
                value,
            } => {
                let field_type = self.resolve_field(object, field, env)?;
                let found = self.check_expression(value, env)?;
                if !field_type.accepts(&found) {
                    return Err(SemanticError::IncompatibleAssignment {
                        target: field.clone(),
                        expected: field_type,
                        found,
                    });
                }
            }
            StatementKind::If {
                condition,
                then_body,
                else_body,
            } => {
                let cond = self.check_expression(condition, env)?;
                if !cond.is_bool() {
                    return Err(SemanticError::ConditionNotBool { found: cond });
                }
                self.check_statements(then_body, env)?;
                self.check_statements(else_body, env)?;
            }
            StatementKind::While { condition, body } => {
                let cond = self.check_expression(condition, env)?;
                if !cond.is_bool() {
                    return Err(SemanticError::ConditionNotBool { found: cond });
                }
                self.check_statements(body, env)?;
            }
        }
        stmt.stmt_type = Some(Type::None);
        Ok(())
    }

    // ---- expressions ----

    fn check_expression(
        &self,
        expr: &mut Expression,
        env: &TypeEnvironment,
    ) -> Result<Type, SemanticError> {
        let resolved = self.infer(&mut expr.kind, env)?;
        expr.expr_type = Some(resolved.clone());
        Ok(resolved)
    }

    fn infer(
        &self,
        kind: &mut ExpressionKind,
        env: &TypeEnvironment,
    ) -> Result<Type, SemanticError> {
        match kind {
            ExpressionKind::Literal(literal) => Ok(literal.literal_type()),

            ExpressionKind::Identifier { name } => match env.lookup_var(name) {
                Some(ty) => Ok(ty.clone()),
                None if name == "self" => Err(SemanticError::SelfOutsideMethod),
                None => Err(SemanticError::UnboundIdentifier { name: name.clone() }),
            },

            ExpressionKind::Unary { op, operand } => {
                let found = self.check_expression(operand, env)?;
                match op {
                    UnaryOp::Not => {
                        self.expect_operand(&found, &Type::Bool, "not")?;
                        Ok(Type::Bool)
                    }
                    UnaryOp::Plus | UnaryOp::Minus => {
                        self.expect_operand(&found, &Type::Int, &op.to_string())?;
                        Ok(Type::Int)
                    }
                }
            }

            ExpressionKind::Binary { op, left, right } => {
                let lt = self.check_expression(left, env)?;
                let rt = self.check_expression(right, env)?;
                let op = *op;
                if op.is_arithmetic() || op.is_relational() {
                    self.expect_operand(&lt, &Type::Int, &op.to_string())?;
                    self.expect_operand(&rt, &Type::Int, &op.to_string())?;
                    Ok(if op.is_arithmetic() {
                        Type::Int
                    } else {
                        Type::Bool
                    })
                } else if op.is_equality() {
                    let both_int = lt.is_int() && rt.is_int();
                    let both_bool = lt.is_bool() && rt.is_bool();
                    if !(both_int || both_bool) {
                        return Err(SemanticError::EqualityOperandMismatch {
                            left: lt,
                            right: rt,
                        });
                    }
                    Ok(Type::Bool)
                } else {
                    // `is` stays restricted to None-typed operands.
                    if !(lt.is_none() && rt.is_none()) {
                        return Err(SemanticError::IsOperandMismatch {
                            left: lt,
                            right: rt,
                        });
                    }
                    Ok(Type::Bool)
                }
            }

            ExpressionKind::Builtin1 { name, arg } => {
                if !BUILTINS_1.contains(&name.as_str()) {
                    return Err(SemanticError::UnknownBuiltin { name: name.clone() });
                }
                let found = self.check_expression(arg, env)?;
                self.expect_argument(name, 0, &Type::Int, &found)?;
                Ok(Type::Int)
            }

            ExpressionKind::Builtin2 { name, arg1, arg2 } => {
                if !BUILTINS_2.contains(&name.as_str()) {
                    return Err(SemanticError::UnknownBuiltin { name: name.clone() });
                }
                let t1 = self.check_expression(arg1, env)?;
                self.expect_argument(name, 0, &Type::Int, &t1)?;
                let t2 = self.check_expression(arg2, env)?;
                self.expect_argument(name, 1, &Type::Int, &t2)?;
                Ok(Type::Int)
            }

            ExpressionKind::Call { name, args } => {
                if name == "print" {
                    if args.len() != 1 {
                        return Err(SemanticError::ArgumentCountMismatch {
                            callee: "print".to_string(),
                            expected: 1,
                            found: args.len(),
                        });
                    }
                    // Any type is printable; the argument's resolved type
                    // stays on its node so codegen can pick the printer.
                    self.check_expression(&mut args[0], env)?;
                    return Ok(Type::None);
                }

                if env.has_class(name) {
                    // Object construction: the class constructor takes no
                    // user-facing arguments.
                    if !args.is_empty() {
                        return Err(SemanticError::ConstructorArguments {
                            class: name.clone(),
                            found: args.len(),
                        });
                    }
                    return Ok(Type::Object(name.clone()));
                }

                let sig = env
                    .lookup_function(name)
                    .cloned()
                    .ok_or_else(|| SemanticError::UndefinedFunction { name: name.clone() })?;
                if sig.params.len() != args.len() {
                    return Err(SemanticError::ArgumentCountMismatch {
                        callee: name.clone(),
                        expected: sig.params.len(),
                        found: args.len(),
                    });
                }
                for (index, (arg, expected)) in args.iter_mut().zip(&sig.params).enumerate() {
                    let found = self.check_expression(arg, env)?;
                    if found != *expected {
                        return Err(SemanticError::ArgumentTypeMismatch {
                            callee: name.clone(),
                            index,
                            expected: expected.clone(),
                            found,
                        });
                    }
                }
                Ok(sig.return_type)
            }

            ExpressionKind::Field { object, field } => self.resolve_field(object, field, env),

            ExpressionKind::MethodCall {
                object,
                method,
                args,
            } => {
                let receiver = self.check_expression(object, env)?;
                let class = receiver
                    .class_name()
                    .ok_or(SemanticError::NonObjectReceiver {
                        found: receiver.clone(),
                    })?
                    .to_string();
                let info = env
                    .class(&class)
                    .ok_or_else(|| SemanticError::UndefinedClass {
                        name: class.clone(),
                    })?;
                let sig = info
                    .method(method)
                    .cloned()
                    .ok_or_else(|| SemanticError::UndefinedMethod {
                        class: class.clone(),
                        method: method.clone(),
                    })?;
                if sig.params.len() != args.len() {
                    return Err(SemanticError::ArgumentCountMismatch {
                        callee: layout::method_symbol(method, &class),
                        expected: sig.params.len(),
                        found: args.len(),
                    });
                }
                // Method arguments use assignable-to rather than exact
                // match, so an object field of the class's own type
                // round-trips through its methods.
                for (index, (arg, expected)) in args.iter_mut().zip(&sig.params).enumerate() {
                    let found = self.check_expression(arg, env)?;
                    if !expected.accepts(&found) {
                        return Err(SemanticError::ArgumentTypeMismatch {
                            callee: layout::method_symbol(method, &class),
                            index,
                            expected: expected.clone(),
                            found,
                        });
                    }
                }
                Ok(sig.return_type)
            }
        }
    }

    /// Check a field receiver and resolve the field's declared type
    fn resolve_field(
        &self,
        object: &mut Expression,
        field: &str,
        env: &TypeEnvironment,
    ) -> Result<Type, SemanticError> {
        let receiver = self.check_expression(object, env)?;
        let class = receiver
            .class_name()
            .ok_or(SemanticError::NonObjectReceiver {
                found: receiver.clone(),
            })?;
        let info = env
            .class(class)
            .ok_or_else(|| SemanticError::UndefinedClass {
                name: class.to_string(),
            })?;
        info.field_type(field)
            .cloned()
            .ok_or_else(|| SemanticError::UndefinedField {
                class: class.to_string(),
                field: field.to_string(),
            })
    }

    fn expect_operand(
        &self,
        found: &Type,
        expected: &Type,
        operator: &str,
    ) -> Result<(), SemanticError> {
        if found != expected {
            return Err(SemanticError::OperandMismatch {
                operator: operator.to_string(),
                expected: expected.clone(),
                found: found.clone(),
            });
        }
        Ok(())
    }

    fn expect_argument(
        &self,
        callee: &str,
        index: usize,
        expected: &Type,
        found: &Type,
    ) -> Result<(), SemanticError> {
        if found != expected {
            return Err(SemanticError::ArgumentTypeMismatch {
                callee: callee.to_string(),
                index,
                expected: expected.clone(),
                found: found.clone(),
            });
        }
        Ok(())
    }
}

//! Expression lowering
//!
//! Every expression leaves exactly one i32 on the operand stack.
//! Arguments are lowered left to right, so calls find them in order.

use super::CodeGenerator;
use crate::errors::CodegenError;
use crate::wasm::{HEAP_GLOBAL, WasmInst};
use pwc_frontend::ast::{BinaryOp, Expression, ExpressionKind, UnaryOp};
use pwc_frontend::semantic::layout::{method_symbol, INIT_METHOD};
use pwc_frontend::types::Type;

impl CodeGenerator {
    pub(crate) fn lower_expression(
        &self,
        expr: &Expression,
        out: &mut Vec<WasmInst>,
    ) -> Result<(), CodegenError> {
        match &expr.kind {
            ExpressionKind::Literal(literal) => {
                out.push(WasmInst::I32Const(literal.word_value()));
            }

            ExpressionKind::Identifier { name } => {
                if self.locals.contains(name) {
                    out.push(WasmInst::LocalGet(name.clone()));
                } else {
                    out.push(WasmInst::GlobalGet(name.clone()));
                }
            }

            ExpressionKind::Unary { op, operand } => match op {
                UnaryOp::Plus => {
                    out.push(WasmInst::I32Const(0));
                    self.lower_expression(operand, out)?;
                    out.push(WasmInst::I32Add);
                }
                UnaryOp::Minus => {
                    out.push(WasmInst::I32Const(0));
                    self.lower_expression(operand, out)?;
                    out.push(WasmInst::I32Sub);
                }
                UnaryOp::Not => {
                    self.lower_expression(operand, out)?;
                    out.push(WasmInst::I32Const(1));
                    out.push(WasmInst::I32Xor);
                }
            },

            ExpressionKind::Binary { op, left, right } => {
                self.lower_expression(left, out)?;
                self.lower_expression(right, out)?;
                out.push(binary_instruction(*op));
            }

            ExpressionKind::Builtin1 { name, arg } => {
                self.lower_expression(arg, out)?;
                out.push(WasmInst::Call(name.clone()));
            }

            ExpressionKind::Builtin2 { name, arg1, arg2 } => {
                self.lower_expression(arg1, out)?;
                self.lower_expression(arg2, out)?;
                out.push(WasmInst::Call(name.clone()));
            }

            ExpressionKind::Call { name, args } => {
                if name == "print" {
                    let [arg] = args.as_slice() else {
                        return Err(CodegenError::MissingType {
                            construct: "print argument".to_string(),
                        });
                    };
                    self.lower_expression(arg, out)?;
                    out.push(WasmInst::Call(print_symbol(self.expression_type(arg)?)));
                } else if self.is_class(name) {
                    self.lower_construction(name, out)?;
                } else {
                    for arg in args {
                        self.lower_expression(arg, out)?;
                    }
                    out.push(WasmInst::Call(name.clone()));
                }
            }

            ExpressionKind::Field { object, field } => {
                self.lower_field_address(object, field, out)?;
                out.push(WasmInst::I32Load);
            }

            ExpressionKind::MethodCall {
                object,
                method,
                args,
            } => {
                let class = self.receiver_class(object)?;
                self.lower_expression(object, out)?;
                for arg in args {
                    self.lower_expression(arg, out)?;
                }
                out.push(WasmInst::Call(method_symbol(method, &class)));
            }
        }
        Ok(())
    }

    /// Allocate and initialize an object, leaving its address on the
    /// stack. Field defaults are stored at the current heap top, the
    /// address is pushed as the initializer's receiver, the heap top
    /// advances past the object, then `__init__` runs and returns the
    /// receiver.
    fn lower_construction(&self, class: &str, out: &mut Vec<WasmInst>) -> Result<(), CodegenError> {
        let layout = self.layout(class)?;

        for slot in &layout.fields {
            out.push(WasmInst::GlobalGet(HEAP_GLOBAL.to_string()));
            out.push(WasmInst::I32Const(slot.offset() as i32));
            out.push(WasmInst::I32Add);
            out.push(WasmInst::I32Const(slot.init.word_value()));
            out.push(WasmInst::I32Store);
        }

        out.push(WasmInst::GlobalGet(HEAP_GLOBAL.to_string()));

        out.push(WasmInst::GlobalGet(HEAP_GLOBAL.to_string()));
        out.push(WasmInst::I32Const(layout.size_in_bytes() as i32));
        out.push(WasmInst::I32Add);
        out.push(WasmInst::GlobalSet(HEAP_GLOBAL.to_string()));

        out.push(WasmInst::Call(method_symbol(INIT_METHOD, class)));
        Ok(())
    }

    /// Push the address of `object.field`: the receiver's own address
    /// plus the field's fixed offset. Loads and stores share this, so a
    /// store always targets the receiver, wherever it lives.
    pub(crate) fn lower_field_address(
        &self,
        object: &Expression,
        field: &str,
        out: &mut Vec<WasmInst>,
    ) -> Result<(), CodegenError> {
        let class = self.receiver_class(object)?;
        let offset = self
            .layout(&class)?
            .field_offset(field)
            .ok_or_else(|| CodegenError::UnknownField {
                class: class.clone(),
                field: field.to_string(),
            })?;

        self.lower_expression(object, out)?;
        out.push(WasmInst::I32Const(offset as i32));
        out.push(WasmInst::I32Add);
        Ok(())
    }

    pub(crate) fn expression_type<'a>(&self, expr: &'a Expression) -> Result<&'a Type, CodegenError> {
        expr.expr_type
            .as_ref()
            .ok_or_else(|| CodegenError::MissingType {
                construct: format!("{:?}", expr.kind),
            })
    }

    fn receiver_class(&self, object: &Expression) -> Result<String, CodegenError> {
        match self.expression_type(object)? {
            Type::Object(name) => Ok(name.clone()),
            other => Err(CodegenError::NonObjectReceiver {
                found: other.to_string(),
            }),
        }
    }
}

/// Runtime print entry for a value of the given static type. Object
/// references print as their numeric address.
fn print_symbol(arg_type: &Type) -> String {
    let name = match arg_type {
        Type::Int => "print_num",
        Type::Bool => "print_bool",
        Type::None => "print_none",
        Type::Object(_) => "print_num",
    };
    name.to_string()
}

fn binary_instruction(op: BinaryOp) -> WasmInst {
    match op {
        BinaryOp::Add => WasmInst::I32Add,
        BinaryOp::Sub => WasmInst::I32Sub,
        BinaryOp::Mul => WasmInst::I32Mul,
        BinaryOp::FloorDiv => WasmInst::I32DivS,
        BinaryOp::Mod => WasmInst::I32RemS,
        BinaryOp::Eq => WasmInst::I32Eq,
        BinaryOp::Ne => WasmInst::I32Ne,
        BinaryOp::Lt => WasmInst::I32LtS,
        BinaryOp::Le => WasmInst::I32LeS,
        BinaryOp::Gt => WasmInst::I32GtS,
        BinaryOp::Ge => WasmInst::I32GeS,
        BinaryOp::Is => WasmInst::I32Eq,
    }
}

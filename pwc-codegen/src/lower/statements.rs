//! Statement lowering
//!
//! Statements leave the operand stack empty. A bare expression
//! statement parks its value in the scratch local, so the entry body
//! can surface the last expression's value as the program result.

use super::CodeGenerator;
use crate::errors::CodegenError;
use crate::wasm::{SCRATCH_LOCAL, WasmInst};
use pwc_frontend::ast::{Statement, StatementKind};

impl CodeGenerator {
    pub(crate) fn lower_statements(
        &self,
        stmts: &[Statement],
        out: &mut Vec<WasmInst>,
    ) -> Result<(), CodegenError> {
        for stmt in stmts {
            self.lower_statement(stmt, out)?;
        }
        Ok(())
    }

    fn lower_statement(&self, stmt: &Statement, out: &mut Vec<WasmInst>) -> Result<(), CodegenError> {
        match &stmt.kind {
            StatementKind::Expr(expr) => {
                self.lower_expression(expr, out)?;
                out.push(WasmInst::LocalSet(SCRATCH_LOCAL.to_string()));
            }

            StatementKind::Return(expr) => {
                self.lower_expression(expr, out)?;
                out.push(WasmInst::Return);
            }

            StatementKind::Pass => {}

            StatementKind::Assign { name, value } => {
                self.lower_expression(value, out)?;
                if self.locals.contains(name) {
                    out.push(WasmInst::LocalSet(name.clone()));
                } else {
                    out.push(WasmInst::GlobalSet(name.clone()));
                }
            }

            StatementKind::FieldAssign {
                object,
                field,
                value,
            } => {
                self.lower_field_address(object, field, out)?;
                self.lower_expression(value, out)?;
                out.push(WasmInst::I32Store);
            }

            StatementKind::If {
                condition,
                then_body,
                else_body,
            } => {
                self.lower_expression(condition, out)?;
                let mut then_insts = Vec::new();
                self.lower_statements(then_body, &mut then_insts)?;
                let mut else_insts = Vec::new();
                self.lower_statements(else_body, &mut else_insts)?;
                out.push(WasmInst::If {
                    then_body: then_insts,
                    else_body: else_insts,
                });
            }

            StatementKind::While { condition, body } => {
                // block/loop pair: br_if 1 leaves once the condition
                // fails, br 0 restarts the loop after the body.
                let mut loop_body = Vec::new();
                self.lower_expression(condition, &mut loop_body)?;
                loop_body.push(WasmInst::I32Eqz);
                loop_body.push(WasmInst::BrIf(1));
                self.lower_statements(body, &mut loop_body)?;
                loop_body.push(WasmInst::Br(0));
                out.push(WasmInst::Block(vec![WasmInst::Loop(loop_body)]));
            }
        }
        Ok(())
    }
}

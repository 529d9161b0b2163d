//! WebAssembly Text Instruction Definitions
//!
//! This module defines the subset of Wasm instructions the compiler
//! emits, plus the renderer that turns an instruction sequence into
//! indented WAT text. Structured control flow carries its nested body
//! inline, so rendering is a straight tree walk and every `block`,
//! `loop`, `if` and `else` closes with a matching `end`.

use std::fmt;

/// Mutable global holding the current heap top address. The leading
/// `.` is legal in an emitted identifier but not in a source
/// identifier, so no program variable can collide with it.
pub const HEAP_GLOBAL: &str = ".heap";

/// Per-function local that absorbs the value of a bare expression
/// statement, keeping the operand stack empty between statements.
/// Reserved-name rule as for [`HEAP_GLOBAL`].
pub const SCRATCH_LOCAL: &str = ".scratch";

/// Wasm instructions emitted by the code generator
///
/// All values are i32: numbers are themselves, booleans are 1/0, `None`
/// and object references share the address space with 0 reserved as the
/// null sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum WasmInst {
    // Constants and variable access
    I32Const(i32),
    LocalGet(String),
    LocalSet(String),
    GlobalGet(String),
    GlobalSet(String),

    // Arithmetic
    I32Add,
    I32Sub,
    I32Mul,
    I32DivS, // floor division on the i32 domain
    I32RemS,

    // Comparison; each leaves 1 or 0
    I32Eq,
    I32Ne,
    I32LtS,
    I32LeS,
    I32GtS,
    I32GeS,
    I32Eqz,
    I32Xor,

    // Linear memory, always word-sized
    I32Load,
    I32Store,

    // Calls and returns
    Call(String),
    Return,

    // Structured control flow with nested bodies
    If {
        then_body: Vec<WasmInst>,
        else_body: Vec<WasmInst>,
    },
    Block(Vec<WasmInst>),
    Loop(Vec<WasmInst>),
    Br(u32),
    BrIf(u32),
}

impl WasmInst {
    /// Render this instruction at the given indent depth (two spaces per
    /// level), appending one or more lines to `out`.
    fn push_text(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        match self {
            WasmInst::I32Const(value) => push_line(out, &pad, &format!("i32.const {value}")),
            WasmInst::LocalGet(name) => push_line(out, &pad, &format!("local.get ${name}")),
            WasmInst::LocalSet(name) => push_line(out, &pad, &format!("local.set ${name}")),
            WasmInst::GlobalGet(name) => push_line(out, &pad, &format!("global.get ${name}")),
            WasmInst::GlobalSet(name) => push_line(out, &pad, &format!("global.set ${name}")),
            WasmInst::I32Add => push_line(out, &pad, "i32.add"),
            WasmInst::I32Sub => push_line(out, &pad, "i32.sub"),
            WasmInst::I32Mul => push_line(out, &pad, "i32.mul"),
            WasmInst::I32DivS => push_line(out, &pad, "i32.div_s"),
            WasmInst::I32RemS => push_line(out, &pad, "i32.rem_s"),
            WasmInst::I32Eq => push_line(out, &pad, "i32.eq"),
            WasmInst::I32Ne => push_line(out, &pad, "i32.ne"),
            WasmInst::I32LtS => push_line(out, &pad, "i32.lt_s"),
            WasmInst::I32LeS => push_line(out, &pad, "i32.le_s"),
            WasmInst::I32GtS => push_line(out, &pad, "i32.gt_s"),
            WasmInst::I32GeS => push_line(out, &pad, "i32.ge_s"),
            WasmInst::I32Eqz => push_line(out, &pad, "i32.eqz"),
            WasmInst::I32Xor => push_line(out, &pad, "i32.xor"),
            WasmInst::I32Load => push_line(out, &pad, "i32.load"),
            WasmInst::I32Store => push_line(out, &pad, "i32.store"),
            WasmInst::Call(name) => push_line(out, &pad, &format!("call ${name}")),
            WasmInst::Return => push_line(out, &pad, "return"),
            WasmInst::If {
                then_body,
                else_body,
            } => {
                push_line(out, &pad, "if");
                for inst in then_body {
                    inst.push_text(out, depth + 1);
                }
                if !else_body.is_empty() {
                    push_line(out, &pad, "else");
                    for inst in else_body {
                        inst.push_text(out, depth + 1);
                    }
                }
                push_line(out, &pad, "end");
            }
            WasmInst::Block(body) => {
                push_line(out, &pad, "block");
                for inst in body {
                    inst.push_text(out, depth + 1);
                }
                push_line(out, &pad, "end");
            }
            WasmInst::Loop(body) => {
                push_line(out, &pad, "loop");
                for inst in body {
                    inst.push_text(out, depth + 1);
                }
                push_line(out, &pad, "end");
            }
            WasmInst::Br(label) => push_line(out, &pad, &format!("br {label}")),
            WasmInst::BrIf(label) => push_line(out, &pad, &format!("br_if {label}")),
        }
    }
}

fn push_line(out: &mut String, pad: &str, text: &str) {
    out.push_str(pad);
    out.push_str(text);
    out.push('\n');
}

impl fmt::Display for WasmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        self.push_text(&mut text, 0);
        write!(f, "{}", text.trim_end_matches('\n'))
    }
}

/// Render an instruction sequence as WAT text, one instruction per line
/// at the given starting depth
pub fn emit_instructions(instructions: &[WasmInst], depth: usize) -> String {
    let mut text = String::new();
    for inst in instructions {
        inst.push_text(&mut text, depth);
    }
    text
}

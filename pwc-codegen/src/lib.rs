//! Python-to-Wasm Compiler - Code Generation Backend
//!
//! Turns a type-checked program into a textual WebAssembly module:
//! - `wasm`: the emitted instruction subset and its WAT renderer
//! - `lower`: expression and statement lowering, object construction,
//!   static method dispatch
//! - `module`: the fixed import surface, globals, and `_start` assembly
//!
//! Running the produced module is an external collaborator's job; this
//! crate stops at the rendered text.

pub mod errors;
pub mod lower;
pub mod module;
pub mod wasm;

pub use errors::CodegenError;
pub use lower::{CodeGenerator, LoweredFunction};
pub use module::{compile, generate_module, GlobalDef, WatModule, RUNTIME_IMPORTS};
pub use wasm::{WasmInst, HEAP_GLOBAL, SCRATCH_LOCAL};

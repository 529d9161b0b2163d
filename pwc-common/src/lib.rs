//! Python-to-Wasm Compiler - Common Types and Utilities
//!
//! This crate holds the pieces shared by every compiler phase: the error
//! taxonomy and the storage-slot constants of the target machine.

pub mod error;

pub use error::CompilerError;

/// Width in bytes of one storage slot (local, global, or heap field).
/// Every value in the source subset fits in one 32-bit word.
pub const WORD_SIZE: u32 = 4;

/// Initial value of the heap-top global. Nonzero so that address 0 is
/// never a valid object and can serve as the `None` sentinel.
pub const HEAP_BASE: u32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_base_reserves_null() {
        // Address 0 must never be handed out as an object address.
        assert!(HEAP_BASE > 0);
        assert_eq!(HEAP_BASE % WORD_SIZE, 0);
    }
}

//! calc-core - Rust/WASM input engine for a web calculator
//!
//! This crate provides the calculator's only real logic:
//! - Operand accumulation and operator chaining (input state machine)
//! - Binary arithmetic with a tagged error channel
//! - Result rounding and normalization
//! - Capacity-bounded calculation history
//!
//! Rendering, locale formatting, font sizing and keyboard event wiring
//! live in the JavaScript frontend, which drives this engine through
//! the wasm-bindgen bindings in [`engine::Calculator`].

use wasm_bindgen::prelude::*;

pub mod action;
pub mod compute;
pub mod engine;
pub mod format;
pub mod history;

// Re-export main types for convenience
pub use action::{Action, Op};
pub use compute::{compute, ComputeError};
pub use engine::{Calculator, Display, Engine, RecoveryToken, Snapshot};
pub use history::{Calculation, History, HISTORY_CAPACITY};

/// Initialize the WASM module
/// Call this once when loading the module to set up panic hooks
#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages
    console_error_panic_hook::set_once();
}

/// Get the version of the calc-core library
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

//! Arvak compilation pass.
//!
//! Lowers a preprocessed [`arvak_qasm::ProgramModel`] back to assertion-free
//! source text (spec §4.5), optionally truncated at a chosen assertion
//! (`slice_index`) and with consecutive single-qubit gates on disjoint
//! qubits coalesced onto shared lines at `opt >= 1`.
//!
//! # Example
//!
//! ```rust
//! use arvak_compile::{compile, CompileSettings};
//! use arvak_qasm::preprocess;
//!
//! let program = preprocess("qreg q[1];\nh q[0];\nassert-sup q[0];\n").unwrap();
//! let out = compile(&program, CompileSettings::default()).unwrap();
//! assert!(!out.contains("assert-"));
//! ```

pub mod emit;
pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod settings;

pub use emit::EmittedItem;
pub use error::{CompileError, CompileResult};
pub use manager::PassManager;
pub use pass::{Pass, PassKind};
pub use settings::CompileSettings;

use arvak_qasm::ProgramModel;

/// Lower `program` to assertion-free source text per `settings` (spec
/// §4.5, §6 `compile(settings) -> string`).
pub fn compile(program: &ProgramModel, settings: CompileSettings) -> CompileResult<String> {
    emit::compile(program, settings)
}

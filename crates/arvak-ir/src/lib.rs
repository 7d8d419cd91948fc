//! Arvak Gate Vocabulary
//!
//! This crate provides the gate and register addressing types shared by the
//! rest of the Arvak debugger stack: the preprocessor attaches these gates to
//! instructions, the statevector backend interprets them, and the
//! compilation pass re-emits them as source text.
//!
//! # Example
//!
//! ```rust
//! use arvak_ir::{Gate, StandardGate, QubitId};
//!
//! let h = Gate::standard(StandardGate::H);
//! assert_eq!(h.name(), "h");
//! assert_eq!(h.num_qubits(), 1);
//! ```

pub mod error;
pub mod gate;
pub mod parameter;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, CustomGate, Gate, GateKind, StandardGate};
pub use parameter::ParameterExpression;
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};

//! `arvak-state` — the statevector backend driven by the debugger's
//! execution engine.
//!
//! Exposes the capability contract the engine expects from any simulation
//! backend (spec §6): apply a gate or its analytic inverse, sample a
//! measurement, snapshot/restore across irreversible steps, read a single
//! amplitude, and compute a reduced density matrix for assertion evaluation.
//!
//! # Example
//!
//! ```rust
//! use arvak_ir::{Gate, StandardGate};
//! use arvak_state::Statevector;
//!
//! let mut sv = Statevector::new(2);
//! sv.apply_gate(&Gate::standard(StandardGate::H), &[0]).unwrap();
//! sv.apply_gate(&Gate::standard(StandardGate::CX), &[0, 1]).unwrap();
//! assert!(sv.amplitude(0).unwrap().norm() > 0.0);
//! ```

pub mod complex_utils;
pub mod density;
pub mod error;
pub mod statevector;

pub use complex_utils::{equal_up_to_global_phase, fidelity, is_close, DEFAULT_TOLERANCE};
pub use density::{is_entangled_with_rest, is_entangled_within, is_superposition, partial_trace, purity};
pub use error::{StateError, StateResult};
pub use statevector::Statevector;

//! Error types for the statevector backend.

use thiserror::Error;

/// Errors produced while applying gates or inspecting a [`crate::Statevector`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    /// A qubit index was out of range for the statevector's width.
    #[error("qubit {qubit} is out of range for a {num_qubits}-qubit state")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    /// A gate's declared arity didn't match the number of qubits supplied.
    #[error("gate '{gate_name}' expects {expected} qubit(s), got {got}")]
    QubitCountMismatch {
        gate_name: String,
        expected: u32,
        got: u32,
    },

    /// A gate could not be applied because one of its parameters was still
    /// symbolic (unbound).
    #[error("parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// The amplitude vector's norm drifted far enough from 1 that continuing
    /// would produce meaningless probabilities.
    #[error("state norm {norm} is not close to 1 (tolerance {tolerance})")]
    NormalizationError { norm: f64, tolerance: f64 },

    /// A snapshot could not be restored because its width didn't match.
    #[error("snapshot has {expected} amplitudes, state has {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Circuit IR error surfaced while resolving a gate.
    #[error("circuit IR error: {0}")]
    Ir(#[from] arvak_ir::IrError),
}

/// Result type for statevector operations.
pub type StateResult<T> = Result<T, StateError>;

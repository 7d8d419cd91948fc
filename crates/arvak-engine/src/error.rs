//! Error types for the execution engine.

use thiserror::Error;

/// Errors raised while stepping, running or mutating a debugger session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A register or variable name referenced by an instruction was never
    /// declared.
    #[error("undeclared variable '{0}'")]
    UndeclaredVariable(String),

    /// A gate call referenced a function that has no matching definition.
    #[error("call to undefined gate '{0}'")]
    UndefinedFunction(String),

    /// Attempted to step backward with nothing left in history.
    #[error("already at the beginning of the program")]
    AtBeginning,

    /// Attempted to step forward, over or run once execution has finished.
    #[error("program has already finished")]
    AlreadyFinished,

    /// `step_out`/`step_out_backward` called while the call stack was empty.
    #[error("not inside a gate call")]
    NotInCall,

    /// An operation was attempted against an instruction kind it does not
    /// apply to (e.g. `skip_failed_assertion` off an assertion).
    #[error("invalid engine state: {0}")]
    InvalidState(String),

    /// A gate parameter remained symbolic after substitution.
    #[error("unbound parameter '{0}'")]
    UnboundParameter(String),

    /// The statevector backend rejected an operation.
    #[error("state error: {0}")]
    State(#[from] arvak_state::StateError),

    /// Preprocessing or assertion parsing failed before execution started.
    #[error("parse error: {0}")]
    Parse(#[from] arvak_qasm::ParsingError),

    /// A loaded assertion failed at runtime (spec §4).
    #[error("assertion failed at instruction {instr_index}: {detail}")]
    AssertionFailed { instr_index: usize, detail: String },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

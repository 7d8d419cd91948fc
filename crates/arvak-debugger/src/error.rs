//! Errors surfaced by the debugger facade (spec §7).

use thiserror::Error;

/// Errors raised by the public operation table.
#[derive(Debug, Error)]
pub enum DebuggerError {
    /// Calling a stepping or lifecycle method in an inappropriate state
    /// (spec §7 `InvalidOperation`): surfaced synchronously, state machine
    /// unchanged.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error(transparent)]
    Engine(#[from] arvak_engine::EngineError),

    #[error(transparent)]
    Diag(#[from] arvak_diag::DiagError),

    #[error(transparent)]
    Compile(#[from] arvak_compile::CompileError),

    #[error(transparent)]
    Parse(#[from] arvak_qasm::ParsingError),
}

pub type DebuggerResult<T> = Result<T, DebuggerError>;

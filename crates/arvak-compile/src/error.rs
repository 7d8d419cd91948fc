//! Error taxonomy for the compilation pass (spec §7, `ArityError`/
//! `LookupError` are not reachable here since [`arvak_qasm::ProgramModel`]
//! is already validated by the time it reaches this crate).

use thiserror::Error;

/// Errors raised while lowering a [`arvak_qasm::ProgramModel`] to
/// assertion-free source text.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid compile configuration: {0}")]
    InvalidConfiguration(String),

    #[error("pass '{name}' failed: {reason}")]
    PassFailed { name: &'static str, reason: String },
}

pub type CompileResult<T> = Result<T, CompileError>;

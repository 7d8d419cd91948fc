//! Errors raised by the diagnostics engine (spec §7 `LookupError`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagError {
    #[error("instruction index {0} out of range")]
    UnknownInstruction(usize),
}

pub type DiagResult<T> = Result<T, DiagError>;

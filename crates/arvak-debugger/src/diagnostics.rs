//! Diagnostics sub-object (spec §6 "Diagnostics (sub-object)"): a thin,
//! read-only view over the current engine session.

use std::collections::BTreeSet;

use arvak_diag::cause::ErrorCause;
use arvak_engine::Engine;

/// Borrowed view exposing [`arvak_diag`] over the session's live program
/// and engine state. Constructed fresh from [`crate::Debugger::diagnostics`]
/// on every call, so it always reflects the current program counter.
pub struct Diagnostics<'a> {
    engine: &'a Engine,
}

impl<'a> Diagnostics<'a> {
    pub(crate) fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    #[must_use]
    pub fn get_num_qubits(&self) -> usize {
        self.engine.program().quantum_registers.total_qubits()
    }

    #[must_use]
    pub fn get_instruction_count(&self) -> usize {
        self.engine.program().instructions.len()
    }

    #[must_use]
    pub fn get_data_dependencies(&self, instr: usize, include_callers: bool) -> BTreeSet<usize> {
        arvak_diag::data_dependencies(self.engine.program(), instr, include_callers)
    }

    #[must_use]
    pub fn get_interactions(&self, before_instr: usize, qubit: usize) -> BTreeSet<usize> {
        arvak_diag::interactions(self.engine.program(), before_instr, qubit)
    }

    #[must_use]
    pub fn get_zero_control_instructions(&self) -> Vec<usize> {
        arvak_diag::zero_control_instructions(self.engine)
    }

    #[must_use]
    pub fn potential_error_causes(&self) -> Vec<ErrorCause> {
        arvak_diag::potential_error_causes(self.engine.program(), self.engine)
    }

    #[must_use]
    pub fn suggest_assertion_movements(&self) -> Vec<(usize, usize)> {
        arvak_diag::suggest_assertion_movements(self.engine.program())
    }

    #[must_use]
    pub fn suggest_new_assertions(&self) -> Vec<(usize, String)> {
        arvak_diag::suggest_new_assertions(self.engine.program())
    }
}

//! Runtime diagnostics drawn from a live [`Engine`] (spec §4.4): cause
//! enumeration when the current assertion has failed.

use std::collections::BTreeSet;

use arvak_engine::Engine;
use arvak_qasm::{AssertionKind, ProgramModel, Target};

use crate::cause::{ErrorCause, ErrorCauseKind};
use crate::static_analysis::{data_dependencies, interactions};

/// Indices of instructions whose classical control bit the engine has
/// observed to be zero on every execution reaching them so far.
#[must_use]
pub fn zero_control_instructions(engine: &Engine) -> Vec<usize> {
    engine.zero_control_instructions().iter().copied().collect()
}

/// **`potential_error_causes()`** (spec §4.4): when the engine is sitting
/// on a failed assertion, enumerate plausible explanations by combining
/// data-dependency slicing with the engine's zero-control history and,
/// for entanglement assertions, a missing-interaction check.
#[must_use]
pub fn potential_error_causes(program: &ProgramModel, engine: &Engine) -> Vec<ErrorCause> {
    let failed_pc = engine.program_counter();
    let Some(instruction) = program.instructions.get(failed_pc) else { return Vec::new() };
    let Some(assertion) = &instruction.assertion else { return Vec::new() };

    let mut causes = BTreeSet::new();
    let zero_controls = engine.zero_control_instructions();

    for dep in data_dependencies(program, failed_pc, true) {
        if zero_controls.contains(&dep) {
            causes.insert(ErrorCause { instruction: dep, kind: ErrorCauseKind::ControlAlwaysZero });
        }
    }

    if assertion.kind == AssertionKind::Entanglement {
        let qubits = unfold(program, &assertion.targets);
        if has_missing_interaction(program, failed_pc, &qubits) {
            causes.insert(ErrorCause { instruction: failed_pc, kind: ErrorCauseKind::MissingInteraction });
        }
    }

    if causes.is_empty() {
        causes.insert(ErrorCause { instruction: failed_pc, kind: ErrorCauseKind::Unknown });
    }

    causes.into_iter().collect()
}

fn unfold(program: &ProgramModel, targets: &[Target]) -> Vec<usize> {
    targets
        .iter()
        .flat_map(|t| match t {
            Target::Indexed(name, idx) => program.quantum_registers.flat_index(name, *idx).into_iter().collect::<Vec<_>>(),
            Target::Register(name) => program
                .quantum_registers
                .size_of(name)
                .map(|size| (0..size).filter_map(|i| program.quantum_registers.flat_index(name, i)).collect())
                .unwrap_or_default(),
        })
        .collect()
}

fn has_missing_interaction(program: &ProgramModel, before_instr: usize, qubits: &[usize]) -> bool {
    if qubits.len() < 2 {
        return false;
    }
    let sets: Vec<BTreeSet<usize>> =
        qubits.iter().map(|&q| interactions(program, before_instr, q)).collect();
    sets.windows(2).any(|pair| pair[0].is_disjoint(&pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_control_instructions_empty_on_fresh_engine() {
        let engine = Engine::load("qreg q[1];\nh q[0];\n").unwrap();
        assert!(zero_control_instructions(&engine).is_empty());
    }

    #[test]
    fn test_potential_error_causes_empty_without_failed_assertion() {
        let engine = Engine::load("qreg q[1];\nh q[0];\n").unwrap();
        let program = engine.program().clone();
        assert!(potential_error_causes(&program, &engine).is_empty());
    }
}

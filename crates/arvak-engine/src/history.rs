//! Step history, recorded so forward steps can be undone exactly (spec §5,
//! reversible execution).

use std::collections::BTreeMap;

use num_complex::Complex64;

use arvak_ir::{Gate, ParameterExpression};
use arvak_qasm::Target;

/// An active gate-call activation record, captured in full on `Return` so
/// `step_backward` can re-push it without recomputing the binding.
#[derive(Debug, Clone)]
pub struct CallFrame {
    pub function_name: String,
    pub return_index: usize,
    pub qubit_bindings: BTreeMap<String, usize>,
    pub param_bindings: BTreeMap<String, ParameterExpression>,
}

/// One undo-able effect of a single forward step.
#[derive(Debug, Clone)]
pub enum HistoryEntry {
    /// A unitary gate application; undone by applying its analytic inverse.
    Gate { instr_index: usize, gate: Gate, qubits: Vec<usize> },
    /// A measurement or reset; undone by restoring the pre-step snapshot.
    Collapse {
        instr_index: usize,
        snapshot_before: Vec<Complex64>,
        classical_writes: Vec<(Target, Option<i64>)>,
    },
    /// A direct classical write (outside of measurement), e.g. none today
    /// but reserved for future classical instructions.
    ClassicalWrite { instr_index: usize, target: Target, previous: Option<i64> },
    /// Entered a gate call: push happened, undone by popping the frame.
    Call { instr_index: usize },
    /// Left a gate call via its synthetic `Return`: undone by re-pushing the
    /// exact frame that was active before the pop.
    Return { instr_index: usize, frame: CallFrame },
    /// An instruction with no state effect (declarations, assertions,
    /// barriers, `if` headers taking the false branch).
    Plain { instr_index: usize },
}

impl HistoryEntry {
    #[must_use]
    pub fn instr_index(&self) -> usize {
        match self {
            HistoryEntry::Gate { instr_index, .. }
            | HistoryEntry::Collapse { instr_index, .. }
            | HistoryEntry::ClassicalWrite { instr_index, .. }
            | HistoryEntry::Call { instr_index }
            | HistoryEntry::Return { instr_index, .. }
            | HistoryEntry::Plain { instr_index } => *instr_index,
        }
    }
}

/// One measurement outcome, kept for front ends that want the full
/// measurement record independent of the undo-oriented [`HistoryEntry`] log.
#[derive(Debug, Clone)]
pub struct MeasurementRecord {
    pub instr_index: usize,
    pub qubit: usize,
    pub outcome: u8,
}

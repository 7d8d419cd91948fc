//! The debugger facade (spec §6 "Public operation table"): lifecycle,
//! stepping, predicates, program-model queries, state access, mutation and
//! breakpoints, wired onto an [`arvak_engine::Engine`].

use num_complex::Complex64;

use arvak_compile::CompileSettings;
use arvak_engine::{Engine, EngineError, ExecutionState};
use arvak_qasm::{Instruction, Target};

use crate::diagnostics::Diagnostics;
use crate::error::{DebuggerError, DebuggerResult};
use crate::result::LoadResult;

/// A single reversible-debugging session. `init` with no program loaded;
/// `load_code`/`load_code_with_result` install one.
#[derive(Default)]
pub struct Debugger {
    engine: Option<Engine>,
    did_assertion_fail: bool,
    was_breakpoint_hit: bool,
}

impl Debugger {
    /// Construct an empty session with nothing loaded (spec §6 `init`).
    #[must_use]
    pub fn init() -> Self {
        Self::default()
    }

    fn engine(&self) -> DebuggerResult<&Engine> {
        self.engine.as_ref().ok_or_else(|| DebuggerError::InvalidOperation("no program loaded".into()))
    }

    fn engine_mut(&mut self) -> DebuggerResult<&mut Engine> {
        self.engine.as_mut().ok_or_else(|| DebuggerError::InvalidOperation("no program loaded".into()))
    }

    // ---- Lifecycle ---------------------------------------------------

    pub fn load_code(&mut self, source: &str) -> DebuggerResult<()> {
        self.engine = Some(Engine::load(source)?);
        self.did_assertion_fail = false;
        self.was_breakpoint_hit = false;
        Ok(())
    }

    /// Never raises: parse failures are reported in the returned
    /// [`LoadResult`] instead (spec §6).
    pub fn load_code_with_result(&mut self, source: &str) -> LoadResult {
        match Engine::load(source) {
            Ok(engine) => {
                self.engine = Some(engine);
                self.did_assertion_fail = false;
                self.was_breakpoint_hit = false;
                LoadResult::success()
            }
            Err(EngineError::Parse(parse_error)) => LoadResult::failure(&parse_error),
            Err(other) => LoadResult {
                ok: false,
                error_line: None,
                error_column: None,
                detail: Some(other.to_string()),
            },
        }
    }

    pub fn reset_simulation(&mut self) -> DebuggerResult<()> {
        self.engine_mut()?.reset();
        self.did_assertion_fail = false;
        self.was_breakpoint_hit = false;
        Ok(())
    }

    /// Tear down the session (spec §6 `destroy`). A no-op if nothing is
    /// loaded.
    pub fn destroy(&mut self) {
        self.engine = None;
        self.did_assertion_fail = false;
        self.was_breakpoint_hit = false;
    }

    // ---- Stepping ------------------------------------------------------

    fn record_transition(&mut self, result: Result<ExecutionState, EngineError>) -> DebuggerResult<ExecutionState> {
        self.did_assertion_fail = false;
        self.was_breakpoint_hit = false;
        match result {
            Ok(state) => {
                match state {
                    ExecutionState::AssertionFailed => self.did_assertion_fail = true,
                    ExecutionState::BreakpointHit => self.was_breakpoint_hit = true,
                    _ => {}
                }
                Ok(state)
            }
            // `step_forward` surfaces an assertion failure as an error
            // rather than setting `Engine::status`; the facade absorbs it
            // into the sticky `did_assertion_fail` flag instead (spec
            // §4.3.1, §7 "AssertionFailure — not an error but a state
            // machine transition").
            Err(EngineError::AssertionFailed { .. }) => {
                self.did_assertion_fail = true;
                Ok(ExecutionState::AssertionFailed)
            }
            Err(err @ (EngineError::AtBeginning | EngineError::AlreadyFinished | EngineError::NotInCall)) => {
                Err(DebuggerError::InvalidOperation(err.to_string()))
            }
            Err(other) => Err(DebuggerError::from(other)),
        }
    }

    /// A failed assertion leaves the program counter parked on the
    /// assertion itself (it is read-only and advances nothing on failure).
    /// Any subsequent forward-moving call dismisses the stale failure and
    /// advances past it before doing its own work, so the sticky flag's
    /// "cleared on the next step call" contract holds even though the
    /// engine alone would re-raise the identical failure forever.
    fn dismiss_pending_assertion_failure(&mut self) -> DebuggerResult<()> {
        if self.did_assertion_fail {
            self.engine_mut()?.skip_failed_assertion()?;
            self.did_assertion_fail = false;
        }
        Ok(())
    }

    pub fn step_forward(&mut self) -> DebuggerResult<ExecutionState> {
        self.dismiss_pending_assertion_failure()?;
        let result = self.engine_mut()?.step_forward();
        self.record_transition(result)
    }

    pub fn step_over_forward(&mut self) -> DebuggerResult<ExecutionState> {
        self.dismiss_pending_assertion_failure()?;
        let result = self.engine_mut()?.step_over();
        self.record_transition(result)
    }

    pub fn step_out_forward(&mut self) -> DebuggerResult<ExecutionState> {
        self.dismiss_pending_assertion_failure()?;
        let result = self.engine_mut()?.step_out();
        self.record_transition(result)
    }

    pub fn step_backward(&mut self) -> DebuggerResult<ExecutionState> {
        let result = self.engine_mut()?.step_backward();
        self.record_transition(result)
    }

    pub fn step_over_backward(&mut self) -> DebuggerResult<ExecutionState> {
        let result = self.engine_mut()?.step_over_backward();
        self.record_transition(result)
    }

    pub fn step_out_backward(&mut self) -> DebuggerResult<ExecutionState> {
        let result = self.engine_mut()?.step_out_backward();
        self.record_transition(result)
    }

    pub fn run_simulation(&mut self) -> DebuggerResult<ExecutionState> {
        self.dismiss_pending_assertion_failure()?;
        let result = self.engine_mut()?.run();
        self.record_transition(result)
    }

    pub fn run_simulation_backward(&mut self) -> DebuggerResult<ExecutionState> {
        let result = self.engine_mut()?.run_backward();
        self.record_transition(result)
    }

    /// Runs to completion and reports how many assertions failed along the
    /// way (spec §6 `run_all → failed_assertions_count`). Unlike
    /// `run_simulation`, assertion failures do not stop the run; breakpoints
    /// still do.
    pub fn run_all(&mut self) -> DebuggerResult<usize> {
        let mut failures = 0usize;
        loop {
            let state = self.run_simulation()?;
            match state {
                ExecutionState::AssertionFailed => {
                    failures += 1;
                    self.engine_mut()?.skip_failed_assertion()?;
                    self.did_assertion_fail = false;
                }
                ExecutionState::Finished | ExecutionState::BreakpointHit => return Ok(failures),
                _ => {}
            }
        }
    }

    pub fn pause_simulation(&self) -> DebuggerResult<()> {
        self.engine()?.pause_simulation();
        Ok(())
    }

    // ---- Predicates ------------------------------------------------------

    #[must_use]
    pub fn can_step_forward(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| !e.is_finished())
    }

    #[must_use]
    pub fn can_step_backward(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| !e.is_at_start())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.engine.as_ref().is_some_and(Engine::is_finished)
    }

    /// Sticky one-shot: true since the last step transitioned into
    /// `AssertionFailed`, cleared by the next step call (spec §4.3.1).
    #[must_use]
    pub fn did_assertion_fail(&self) -> bool {
        self.did_assertion_fail
    }

    /// Sticky one-shot: true since the last step transitioned into
    /// `BreakpointHit`, cleared by the next step call (spec §4.3.1).
    #[must_use]
    pub fn was_breakpoint_hit(&self) -> bool {
        self.was_breakpoint_hit
    }

    // ---- Program model queries --------------------------------------------

    #[must_use]
    pub fn get_current_instruction(&self) -> Option<&Instruction> {
        self.engine.as_ref().and_then(Engine::current_instruction)
    }

    pub fn get_instruction_count(&self) -> DebuggerResult<usize> {
        Ok(self.engine()?.program().instructions.len())
    }

    pub fn get_instruction_position(&self, instr: usize) -> DebuggerResult<(usize, usize)> {
        let program = self.engine()?.program();
        let instruction = program
            .instructions
            .get(instr)
            .ok_or_else(|| DebuggerError::InvalidOperation(format!("instruction index {instr} out of range")))?;
        Ok((instruction.original_start, instruction.original_end))
    }

    pub fn get_num_qubits(&self) -> DebuggerResult<usize> {
        Ok(self.engine()?.program().quantum_registers.total_qubits())
    }

    pub fn get_stack_depth(&self) -> DebuggerResult<usize> {
        Ok(self.engine()?.call_depth())
    }

    pub fn get_stack_trace(&self, max: usize) -> DebuggerResult<Vec<String>> {
        Ok(self.engine()?.call_stack_names().iter().rev().take(max).map(|s| s.to_string()).collect())
    }

    // ---- State access --------------------------------------------------

    pub fn get_amplitude_index(&self, index: usize) -> DebuggerResult<Complex64> {
        self.engine()?
            .state()
            .amplitude(index)
            .ok_or_else(|| DebuggerError::InvalidOperation(format!("amplitude index {index} out of range")))
    }

    pub fn get_amplitude_bitstring(&self, bits: &str) -> DebuggerResult<Complex64> {
        self.get_amplitude_index(parse_bitstring(bits)?)
    }

    pub fn get_state_vector_full(&self) -> DebuggerResult<Vec<Complex64>> {
        Ok(self.engine()?.state().amplitudes().to_vec())
    }

    /// Reduced density matrix over `qubits` (spec §6): repetition in
    /// `qubits` is rejected, reordering is not.
    pub fn get_state_vector_sub(&self, qubits: &[usize]) -> DebuggerResult<Vec<Complex64>> {
        let mut seen = std::collections::BTreeSet::new();
        if !qubits.iter().all(|q| seen.insert(*q)) {
            return Err(DebuggerError::InvalidOperation("repeated qubit index in subset".into()));
        }
        Ok(self.engine()?.state().partial_trace(qubits))
    }

    pub fn get_classical_variable(&self, name: &str) -> DebuggerResult<i64> {
        let target = Target::parse(name)
            .ok_or_else(|| DebuggerError::InvalidOperation(format!("invalid classical variable name '{name}'")))?;
        self.engine()?
            .classical()
            .get(&target)
            .ok_or_else(|| DebuggerError::InvalidOperation(format!("unknown classical variable '{name}'")))
    }

    pub fn get_num_classical_variables(&self) -> DebuggerResult<usize> {
        Ok(self.engine()?.program().classical_registers.registers().count())
    }

    pub fn get_classical_variable_name(&self, index: usize) -> DebuggerResult<String> {
        self.engine()?
            .program()
            .classical_registers
            .registers()
            .nth(index)
            .map(|(name, _)| name.to_string())
            .ok_or_else(|| DebuggerError::InvalidOperation(format!("classical variable index {index} out of range")))
    }

    pub fn get_quantum_variable_name(&self, flat_index: usize) -> DebuggerResult<String> {
        let mut offset = 0usize;
        for (name, size) in self.engine()?.program().quantum_registers.registers() {
            if flat_index < offset + size {
                return Ok(format!("{name}[{}]", flat_index - offset));
            }
            offset += size;
        }
        Err(DebuggerError::InvalidOperation(format!("qubit index {flat_index} out of range")))
    }

    // ---- Mutation --------------------------------------------------------

    /// Writes a single classical bit (spec §4.3.4): `name` must carry an
    /// explicit index, and `value` must fit the declared type of its
    /// register (e.g. a `bool` register only accepts 0/1).
    pub fn change_classical_variable_value(&mut self, name: &str, value: i64) -> DebuggerResult<()> {
        let target = match Target::parse(name) {
            Some(target @ Target::Indexed(..)) => target,
            Some(Target::Register(_)) => {
                return Err(DebuggerError::InvalidOperation(format!(
                    "'{name}' names a whole register; classical writes require an index"
                )))
            }
            None => return Err(DebuggerError::InvalidOperation(format!("invalid classical variable name '{name}'"))),
        };

        let engine = self.engine()?;
        let classical = engine.classical();
        if classical.get(&target).is_none() {
            return Err(DebuggerError::InvalidOperation(format!("unknown classical variable '{name}'")));
        }
        if let Some(ty) = classical.type_of(target.register_name()) {
            if !arvak_engine::ClassicalStore::fits(ty, value) {
                return Err(DebuggerError::InvalidOperation(format!(
                    "value {value} does not fit the declared type of '{}'",
                    target.register_name()
                )));
            }
        }

        self.engine_mut()?.change_classical_variable_value(&target, value);
        Ok(())
    }

    pub fn change_amplitude_value(&mut self, bits: &str, value: Complex64) -> DebuggerResult<()> {
        let index = parse_bitstring(bits)?;
        self.engine_mut()?.change_amplitude_value(index, value)?;
        Ok(())
    }

    // ---- Breakpoints -------------------------------------------------

    /// Sets a breakpoint on the instruction whose source span contains
    /// character offset `pos`, returning its instruction index (spec §6
    /// `set_breakpoint`). Breakpoints are tracked by source line number
    /// internally, since a `ClassicControlled` body can re-execute the same
    /// line-numbered instruction from different flat indices.
    pub fn set_breakpoint(&mut self, pos: usize) -> DebuggerResult<usize> {
        let (instr, line_number) = {
            let program = self.engine()?.program();
            let (idx, instruction) = program
                .instructions
                .iter()
                .enumerate()
                .find(|(_, i)| i.original_start <= pos && pos < i.original_end)
                .ok_or_else(|| DebuggerError::InvalidOperation(format!("no instruction at offset {pos}")))?;
            (idx, instruction.line_number)
        };
        self.engine_mut()?.set_breakpoint(line_number);
        Ok(instr)
    }

    pub fn clear_breakpoints(&mut self) -> DebuggerResult<()> {
        let lines: Vec<usize> = self.engine()?.breakpoints().iter().copied().collect();
        let engine = self.engine_mut()?;
        for line in lines {
            engine.clear_breakpoint(line);
        }
        Ok(())
    }

    // ---- Diagnostics & compilation -------------------------------------

    pub fn diagnostics(&self) -> DebuggerResult<Diagnostics<'_>> {
        Ok(Diagnostics::new(self.engine()?))
    }

    pub fn compile(&self, settings: CompileSettings) -> DebuggerResult<String> {
        Ok(arvak_compile::compile(self.engine()?.program(), settings)?)
    }
}

fn parse_bitstring(bits: &str) -> DebuggerResult<usize> {
    usize::from_str_radix(bits, 2).map_err(|_| DebuggerError::InvalidOperation(format!("invalid bitstring '{bits}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_has_no_program() {
        let debugger = Debugger::init();
        assert!(debugger.get_instruction_count().is_err());
    }

    #[test]
    fn test_load_code_with_result_reports_parse_error() {
        let mut debugger = Debugger::init();
        let result = debugger.load_code_with_result("this is not qasm {{{");
        assert!(!result.ok);
        assert!(result.error_line.is_some());
    }

    #[test]
    fn test_step_forward_then_backward_returns_to_start() {
        let mut debugger = Debugger::init();
        debugger.load_code("qreg q[1];\nh q[0];\n").unwrap();
        assert!(debugger.can_step_forward());
        debugger.step_forward().unwrap();
        assert!(debugger.can_step_backward());
        debugger.step_backward().unwrap();
        assert!(!debugger.can_step_backward());
    }

    #[test]
    fn test_step_backward_at_start_is_invalid_operation() {
        let mut debugger = Debugger::init();
        debugger.load_code("qreg q[1];\nh q[0];\n").unwrap();
        assert!(matches!(debugger.step_backward(), Err(DebuggerError::InvalidOperation(_))));
    }

    #[test]
    fn test_did_assertion_fail_is_sticky_then_clears() {
        let mut debugger = Debugger::init();
        debugger
            .load_code("qreg q[2];\nh q[0];\nassert-ent q[0],q[1];\n")
            .unwrap();
        debugger.run_simulation().unwrap();
        assert!(debugger.did_assertion_fail());
        debugger.step_forward().ok();
        assert!(!debugger.did_assertion_fail());
    }

    #[test]
    fn test_set_breakpoint_resolves_instruction_at_offset() {
        let mut debugger = Debugger::init();
        debugger.load_code("qreg q[1];\nh q[0];\n").unwrap();
        let offset = debugger.get_instruction_position(0).unwrap().0;
        let instr = debugger.set_breakpoint(offset).unwrap();
        assert_eq!(instr, 0);
    }

    #[test]
    fn test_get_quantum_variable_name_resolves_register_and_offset() {
        let mut debugger = Debugger::init();
        debugger.load_code("qreg q[2];\nqreg anc[1];\nh q[0];\n").unwrap();
        assert_eq!(debugger.get_quantum_variable_name(0).unwrap(), "q[0]");
        assert_eq!(debugger.get_quantum_variable_name(2).unwrap(), "anc[0]");
    }

    #[test]
    fn test_change_classical_variable_value_rejects_bare_register() {
        let mut debugger = Debugger::init();
        debugger.load_code("qreg q[1];\ncreg c[2];\nh q[0];\n").unwrap();
        assert!(matches!(
            debugger.change_classical_variable_value("c", 1),
            Err(DebuggerError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_change_classical_variable_value_indexed_round_trips() {
        let mut debugger = Debugger::init();
        debugger.load_code("qreg q[1];\ncreg c[2];\nh q[0];\n").unwrap();
        debugger.change_classical_variable_value("c[1]", 1).unwrap();
        assert_eq!(debugger.get_classical_variable("c[1]").unwrap(), 1);
        assert_eq!(debugger.get_classical_variable("c[0]").unwrap(), 0);
    }

    #[test]
    fn test_get_classical_variable_rejects_invalid_name() {
        let mut debugger = Debugger::init();
        debugger.load_code("qreg q[1];\ncreg c[1];\nh q[0];\n").unwrap();
        assert!(matches!(
            debugger.get_classical_variable("not a name"),
            Err(DebuggerError::InvalidOperation(_))
        ));
    }
}

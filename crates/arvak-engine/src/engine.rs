//! The reversible instruction executor (spec §5): call stack, classical
//! store, breakpoints, measurement history and forward/backward stepping.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arvak_ir::{Gate, ParameterExpression};
use arvak_qasm::{preprocess, Instruction, InstructionKind, ProgramModel, Target};
use arvak_state::Statevector;

use crate::classical::ClassicalStore;
use crate::error::{EngineError, EngineResult};
use crate::history::{CallFrame, HistoryEntry, MeasurementRecord};

/// Where execution currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Loaded,
    Running,
    Paused,
    BreakpointHit,
    AssertionFailed,
    Finished,
}

/// Which quantum and classical targets an instruction actually touched,
/// after resolving local gate-call names to flat indices.
struct ResolvedGateCall {
    gate: Gate,
    applications: Vec<Vec<usize>>,
}

/// A reversible debugging session over one preprocessed program.
pub struct Engine {
    program: ProgramModel,
    state: Statevector,
    classical: ClassicalStore,
    call_stack: Vec<CallFrame>,
    history: Vec<HistoryEntry>,
    measurement_log: Vec<MeasurementRecord>,
    breakpoints: BTreeSet<usize>,
    /// Indices of controlled-gate instructions whose controls were all in
    /// `|0>` the last time they executed (spec §4.4 dynamic zero-control
    /// tracking). Cleared on `reset`.
    zero_control: BTreeSet<usize>,
    pc: usize,
    status: ExecutionState,
    pause_requested: Arc<AtomicBool>,
}

impl Engine {
    /// Preprocess `source` and build a fresh session ready to step (spec §7
    /// `load_code`).
    pub fn load(source: &str) -> EngineResult<Self> {
        let program = preprocess(source)?;
        let state = Statevector::new(program.quantum_registers.total_qubits().max(1));
        let classical = ClassicalStore::from_table(&program.classical_registers);
        Ok(Self {
            program,
            state,
            classical,
            call_stack: Vec::new(),
            history: Vec::new(),
            measurement_log: Vec::new(),
            breakpoints: BTreeSet::new(),
            zero_control: BTreeSet::new(),
            pc: 0,
            status: ExecutionState::Loaded,
            pause_requested: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Reset execution to the start of the same program, discarding all
    /// runtime state but keeping breakpoints.
    pub fn reset(&mut self) {
        self.state = Statevector::new(self.program.quantum_registers.total_qubits().max(1));
        self.classical = ClassicalStore::from_table(&self.program.classical_registers);
        self.call_stack.clear();
        self.history.clear();
        self.measurement_log.clear();
        self.zero_control.clear();
        self.pc = 0;
        self.status = ExecutionState::Loaded;
        self.pause_requested.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn program(&self) -> &ProgramModel {
        &self.program
    }

    #[must_use]
    pub fn state(&self) -> &Statevector {
        &self.state
    }

    #[must_use]
    pub fn classical(&self) -> &ClassicalStore {
        &self.classical
    }

    #[must_use]
    pub fn status(&self) -> ExecutionState {
        self.status
    }

    #[must_use]
    pub fn program_counter(&self) -> usize {
        self.pc
    }

    #[must_use]
    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.program.instructions.get(self.pc)
    }

    #[must_use]
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    #[must_use]
    pub fn call_stack_names(&self) -> Vec<&str> {
        self.call_stack.iter().map(|f| f.function_name.as_str()).collect()
    }

    #[must_use]
    pub fn measurement_log(&self) -> &[MeasurementRecord] {
        &self.measurement_log
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.pc >= self.program.instructions.len()
    }

    #[must_use]
    pub fn is_at_start(&self) -> bool {
        self.history.is_empty()
    }

    pub fn set_breakpoint(&mut self, line: usize) {
        self.breakpoints.insert(line);
    }

    pub fn clear_breakpoint(&mut self, line: usize) {
        self.breakpoints.remove(&line);
    }

    #[must_use]
    pub fn breakpoints(&self) -> &BTreeSet<usize> {
        &self.breakpoints
    }

    /// Instructions whose controls were all `|0>` the last time they
    /// executed (spec §4.4 `zero_control_instructions`).
    #[must_use]
    pub fn zero_control_instructions(&self) -> &BTreeSet<usize> {
        &self.zero_control
    }

    /// Signal a running `run`/`run_all` loop to stop before its next step
    /// (spec §5 `pause_simulation`). Safe to call from another thread.
    #[must_use]
    pub fn pause_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.pause_requested)
    }

    pub fn pause_simulation(&self) {
        self.pause_requested.store(true, Ordering::SeqCst);
    }

    /// Directly overwrite a classical variable (spec §5 direct state
    /// mutation). Bypasses history — intended for "what if" exploration, not
    /// undoable by `step_backward`.
    pub fn change_classical_variable_value(&mut self, target: &Target, value: i64) {
        self.classical.set(target, value);
    }

    /// Directly overwrite one amplitude and renormalize (spec §5). Like
    /// classical mutation, this bypasses history.
    pub fn change_amplitude_value(&mut self, index: usize, value: num_complex::Complex64) -> EngineResult<()> {
        self.state.set_amplitude(index, value)?;
        Ok(())
    }

    fn resolve_qubit(&self, target: &Target) -> EngineResult<usize> {
        if let Some(frame) = self.call_stack.last() {
            if let Some(&idx) = frame.qubit_bindings.get(target.register_name()) {
                return Ok(idx);
            }
        }
        let index = match target {
            Target::Indexed(_, i) => *i,
            Target::Register(_) => 0,
        };
        self.program
            .quantum_registers
            .flat_index(target.register_name(), index)
            .ok_or_else(|| EngineError::UndeclaredVariable(target.to_string()))
    }

    /// Every flat qubit index a (possibly register-wide) target names.
    fn unfold_qubits(&self, target: &Target) -> EngineResult<Vec<usize>> {
        match target {
            Target::Indexed(_, _) => Ok(vec![self.resolve_qubit(target)?]),
            Target::Register(name) => {
                if let Some(frame) = self.call_stack.last() {
                    if let Some(&idx) = frame.qubit_bindings.get(name) {
                        return Ok(vec![idx]);
                    }
                }
                let size = self
                    .program
                    .quantum_registers
                    .size_of(name)
                    .ok_or_else(|| EngineError::UndeclaredVariable(name.clone()))?;
                (0..size)
                    .map(|i| self.resolve_qubit(&Target::Indexed(name.clone(), i)))
                    .collect()
            }
        }
    }

    fn resolve_parameter(&self, expr: &ParameterExpression) -> ParameterExpression {
        let mut resolved = expr.clone();
        if let Some(frame) = self.call_stack.last() {
            for symbol in expr.symbols() {
                if let Some(value) = frame.param_bindings.get(&symbol) {
                    resolved = resolved.bind(&symbol, value.as_f64().unwrap_or(0.0));
                }
            }
        }
        resolved.simplify()
    }

    fn resolve_gate(&self, gate: &Gate) -> Gate {
        use arvak_ir::{GateKind, StandardGate as SG};
        let mut resolved = gate.clone();
        if let GateKind::Standard(std_gate) = &mut resolved.kind {
            let resolve = |p: &ParameterExpression| self.resolve_parameter(p);
            *std_gate = match std_gate {
                SG::Rx(p) => SG::Rx(resolve(p)),
                SG::Ry(p) => SG::Ry(resolve(p)),
                SG::Rz(p) => SG::Rz(resolve(p)),
                SG::P(p) => SG::P(resolve(p)),
                SG::CRx(p) => SG::CRx(resolve(p)),
                SG::CRy(p) => SG::CRy(resolve(p)),
                SG::CRz(p) => SG::CRz(resolve(p)),
                SG::CP(p) => SG::CP(resolve(p)),
                SG::RXX(p) => SG::RXX(resolve(p)),
                SG::RYY(p) => SG::RYY(resolve(p)),
                SG::RZZ(p) => SG::RZZ(resolve(p)),
                SG::U(a, b, c) => SG::U(resolve(a), resolve(b), resolve(c)),
                SG::PRX(a, b) => SG::PRX(resolve(a), resolve(b)),
                ref other => (*other).clone(),
            };
        }
        resolved
    }

    /// Whether `target` names a whole register wider than one qubit and is
    /// not itself bound to a single qubit by the current call frame.
    fn is_wide_register(&self, target: &Target) -> bool {
        let Target::Register(name) = target else { return false };
        if let Some(frame) = self.call_stack.last() {
            if frame.qubit_bindings.contains_key(name) {
                return false;
            }
        }
        self.program.quantum_registers.size_of(name).is_some_and(|size| size > 1)
    }

    fn resolve_gate_call(&self, gate: &Gate, targets: &[Target]) -> EngineResult<ResolvedGateCall> {
        let gate = self.resolve_gate(gate);
        let arity = gate.num_qubits() as usize;
        let broadcasts = targets.iter().any(|t| self.is_wide_register(t));

        if !broadcasts && targets.len() == arity {
            let mut indices = Vec::with_capacity(arity);
            for t in targets {
                indices.push(self.resolve_qubit(t)?);
            }
            return Ok(ResolvedGateCall { gate, applications: vec![indices] });
        }

        // Broadcast form: every target names a register of equal width and
        // the gate is applied pairwise across their qubits (standard QASM2
        // broadcast semantics).
        let mut unfolded = Vec::with_capacity(targets.len());
        for t in targets {
            unfolded.push(self.unfold_qubits(t)?);
        }
        let width = unfolded.first().map_or(0, Vec::len);
        if width == 0 || !unfolded.iter().all(|u| u.len() == width) {
            return Err(EngineError::UndeclaredVariable(format!(
                "targets for gate '{}' do not broadcast to a common width",
                gate.name()
            )));
        }
        let applications = (0..width).map(|i| unfolded.iter().map(|u| u[i]).collect()).collect();
        Ok(ResolvedGateCall { gate, applications })
    }

    /// Positions within a gate's qubit list that act as controls, or `&[]`
    /// if the gate has no control/target distinction (e.g. `Swap`, `RXX`).
    fn control_positions(gate: &Gate) -> &'static [usize] {
        use arvak_ir::{GateKind, StandardGate as SG};
        match &gate.kind {
            GateKind::Standard(
                SG::CX | SG::CY | SG::CZ | SG::CH | SG::CRx(_) | SG::CRy(_) | SG::CRz(_) | SG::CP(_),
            ) => &[0],
            GateKind::Standard(SG::CCX) => &[0, 1],
            GateKind::Standard(SG::CSwap) => &[0],
            _ => &[],
        }
    }

    /// Whether `qubit` is in the computational basis state `|0>` within
    /// tolerance, without collapsing it.
    fn is_qubit_zero(&self, qubit: usize) -> bool {
        let prob_one: f64 = self
            .state
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(i, _)| i & (1 << qubit) != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();
        prob_one <= arvak_state::DEFAULT_TOLERANCE
    }

    /// Execute exactly one instruction and advance the program counter
    /// Advances past the assertion currently under the program counter
    /// without re-evaluating it, recording the same history entry a
    /// passing assertion would (spec §5 `run_all`: failures are counted,
    /// not fatal). Callers are expected to have already observed the
    /// failure via `step_forward`'s `Err(AssertionFailed)`.
    pub fn skip_failed_assertion(&mut self) -> EngineResult<ExecutionState> {
        let idx = self.pc;
        let instr = &self.program.instructions[idx];
        if instr.kind != InstructionKind::Assertion {
            return Err(EngineError::InvalidState("program counter is not on an assertion".into()));
        }
        let successor = instr.successor_index;
        self.history.push(HistoryEntry::Plain { instr_index: idx });
        self.pc = successor;
        self.status = if self.is_finished() {
            ExecutionState::Finished
        } else if self.at_breakpoint() {
            ExecutionState::BreakpointHit
        } else {
            ExecutionState::Paused
        };
        Ok(self.status)
    }

    /// (spec §5 `step_forward`).
    pub fn step_forward(&mut self) -> EngineResult<ExecutionState> {
        if self.is_finished() {
            return Err(EngineError::AlreadyFinished);
        }
        let idx = self.pc;
        let instr = self.program.instructions[idx].clone();

        match instr.kind {
            InstructionKind::Declaration | InstructionKind::Barrier => {
                self.history.push(HistoryEntry::Plain { instr_index: idx });
                self.pc = instr.successor_index;
            }
            InstructionKind::GateDefinition => {
                self.history.push(HistoryEntry::Plain { instr_index: idx });
                self.pc = instr.child_instructions.last().map_or(idx + 1, |r| r + 1);
            }
            InstructionKind::Return => {
                let frame = self.call_stack.pop().ok_or(EngineError::NotInCall)?;
                self.pc = frame.return_index;
                self.history.push(HistoryEntry::Return { instr_index: idx, frame });
            }
            InstructionKind::ClassicControlled => {
                let take_branch = instr
                    .condition
                    .as_deref()
                    .is_some_and(|c| self.classical.eval_condition(c));
                let after_block = instr.child_instructions.last().map_or(idx + 1, |c| c + 1);
                self.history.push(HistoryEntry::Plain { instr_index: idx });
                self.pc = if take_branch {
                    instr.child_instructions.first().copied().unwrap_or(after_block)
                } else {
                    after_block
                };
            }
            InstructionKind::Call => self.step_call(idx, &instr)?,
            InstructionKind::Assertion => {
                self.evaluate_assertion(idx, &instr)?;
                self.history.push(HistoryEntry::Plain { instr_index: idx });
                self.pc = instr.successor_index;
            }
            InstructionKind::Reset => {
                let snapshot_before = self.state.snapshot();
                for target in &instr.targets {
                    for qubit in self.unfold_qubits(target)? {
                        self.state.reset(qubit)?;
                    }
                }
                self.history.push(HistoryEntry::Collapse {
                    instr_index: idx,
                    snapshot_before,
                    classical_writes: Vec::new(),
                });
                self.pc = instr.successor_index;
            }
            InstructionKind::Measurement => {
                self.step_measurement(idx, &instr)?;
                self.pc = instr.successor_index;
            }
            InstructionKind::Gate => {
                let Some(gate) = instr.gate.clone() else {
                    return Err(EngineError::UndeclaredVariable(instr.code.clone()));
                };
                let resolved = self.resolve_gate_call(&gate, &instr.targets)?;
                let controls = Self::control_positions(&resolved.gate);
                let mut all_zero = !controls.is_empty();
                for qubits in &resolved.applications {
                    if !controls.is_empty() {
                        all_zero &= controls.iter().all(|&pos| self.is_qubit_zero(qubits[pos]));
                    }
                    self.state.apply_gate(&resolved.gate, qubits)?;
                    self.history.push(HistoryEntry::Gate {
                        instr_index: idx,
                        gate: resolved.gate.clone(),
                        qubits: qubits.clone(),
                    });
                }
                if all_zero {
                    self.zero_control.insert(idx);
                } else {
                    self.zero_control.remove(&idx);
                }
                self.pc = instr.successor_index;
            }
        }

        self.status = if self.is_finished() {
            ExecutionState::Finished
        } else if self.at_breakpoint() {
            ExecutionState::BreakpointHit
        } else {
            ExecutionState::Paused
        };
        Ok(self.status)
    }

    fn step_call(&mut self, idx: usize, instr: &Instruction) -> EngineResult<()> {
        let name = instr.called_function.clone().ok_or(EngineError::NotInCall)?;
        let def = self
            .program
            .functions
            .get(&name)
            .cloned()
            .ok_or_else(|| EngineError::UndefinedFunction(name.clone()))?;
        let def_instr_idx = self
            .program
            .instructions
            .iter()
            .position(|i| i.is_function_definition && i.called_function.as_deref() == Some(name.as_str()))
            .ok_or_else(|| EngineError::UndefinedFunction(name.clone()))?;

        let mut qubit_bindings = BTreeMap::new();
        for (formal, actual) in def.qubit_params.iter().zip(&instr.targets) {
            qubit_bindings.insert(formal.clone(), self.resolve_qubit(actual)?);
        }

        let mut param_bindings = BTreeMap::new();
        for formal in &def.parameters {
            if let Some(actual_text) = instr.call_substitution.get(formal) {
                if let Some(expr) = arvak_qasm::expr::parse_expression(actual_text) {
                    param_bindings.insert(formal.clone(), self.resolve_parameter(&expr));
                }
            }
        }

        self.call_stack.push(CallFrame {
            function_name: name,
            return_index: instr.successor_index,
            qubit_bindings,
            param_bindings,
        });
        self.history.push(HistoryEntry::Call { instr_index: idx });
        self.pc = self.program.instructions[def_instr_idx]
            .child_instructions
            .first()
            .copied()
            .unwrap_or(instr.successor_index);
        Ok(())
    }

    fn step_measurement(&mut self, idx: usize, instr: &Instruction) -> EngineResult<()> {
        let snapshot_before = self.state.snapshot();
        let mut writes = Vec::new();

        let qubits: Vec<usize> = instr
            .targets
            .iter()
            .map(|t| self.unfold_qubits(t))
            .collect::<EngineResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        let classical_targets: Vec<Target> = match &instr.measure_into {
            Some(Target::Register(name)) => (0..qubits.len())
                .map(|i| Target::Indexed(name.clone(), i))
                .collect(),
            Some(single) => vec![single.clone()],
            None => Vec::new(),
        };

        for (i, &qubit) in qubits.iter().enumerate() {
            let outcome = self.state.measure(qubit)?;
            self.measurement_log.push(MeasurementRecord { instr_index: idx, qubit, outcome });
            if let Some(target) = classical_targets.get(i) {
                let previous = self.classical.set(target, i64::from(outcome));
                writes.push((target.clone(), previous));
            }
        }

        self.history.push(HistoryEntry::Collapse { instr_index: idx, snapshot_before, classical_writes: writes });
        Ok(())
    }

    fn evaluate_assertion(&self, idx: usize, instr: &Instruction) -> EngineResult<()> {
        let Some(assertion) = &instr.assertion else { return Ok(()) };
        let mut qubits = Vec::new();
        let mut amplitudes = Vec::new();
        for (target, amp) in assertion.targets.iter().zip(
            assertion
                .amplitudes
                .iter()
                .cloned()
                .map(Some)
                .chain(std::iter::repeat(None)),
        ) {
            for q in self.unfold_qubits(target)? {
                qubits.push(q);
                amplitudes.push(amp);
            }
        }

        let n = self.state.num_qubits();
        let amps = self.state.amplitudes();
        use arvak_qasm::AssertionKind as AK;
        let ok = match assertion.kind {
            AK::Entanglement => arvak_state::is_entangled_within(amps, n, &qubits),
            AK::Superposition => qubits.iter().all(|&q| arvak_state::is_superposition(amps, n, &[q])),
            AK::Equality | AK::Inequality => {
                let matches = qubits.iter().zip(&amplitudes).all(|(&q, expected)| {
                    let Some(expected) = expected else { return true };
                    let rho = self.state.partial_trace(&[q]);
                    let prob_one = rho[3].re;
                    (prob_one - expected.norm_sqr()).abs() <= assertion.tolerance
                });
                if assertion.kind == AK::Equality { matches } else { !matches }
            }
        };

        if ok {
            Ok(())
        } else {
            Err(EngineError::AssertionFailed {
                instr_index: idx,
                detail: instr.code.trim().to_string(),
            })
        }
    }

    /// Undo the last forward step (spec §5 `step_backward`).
    pub fn step_backward(&mut self) -> EngineResult<ExecutionState> {
        let entry = self.history.pop().ok_or(EngineError::AtBeginning)?;
        match entry {
            HistoryEntry::Gate { instr_index, gate, qubits } => {
                self.state.apply_inverse(&gate, &qubits)?;
                self.zero_control.remove(&instr_index);
                self.pc = instr_index;
            }
            HistoryEntry::Collapse { instr_index, snapshot_before, classical_writes } => {
                self.state.restore(&snapshot_before)?;
                for (target, previous) in classical_writes {
                    match previous {
                        Some(v) => {
                            self.classical.set(&target, v);
                        }
                        None => {
                            self.classical.set(&target, 0);
                        }
                    }
                }
                if let Some(last) = self.measurement_log.last() {
                    if last.instr_index == instr_index {
                        self.measurement_log.pop();
                    }
                }
                self.pc = instr_index;
            }
            HistoryEntry::ClassicalWrite { instr_index, target, previous } => {
                self.classical.set(&target, previous.unwrap_or(0));
                self.pc = instr_index;
            }
            HistoryEntry::Call { instr_index } => {
                self.call_stack.pop();
                self.pc = instr_index;
            }
            HistoryEntry::Return { instr_index, frame } => {
                self.call_stack.push(frame);
                self.pc = instr_index;
            }
            HistoryEntry::Plain { instr_index } => {
                self.pc = instr_index;
            }
        }

        self.status = ExecutionState::Paused;
        Ok(self.status)
    }

    /// Step forward, but if the current instruction is a call, run it to
    /// completion instead of descending into it (spec §5 `step_over`).
    pub fn step_over(&mut self) -> EngineResult<ExecutionState> {
        let depth_before = self.call_stack.len();
        let is_call = matches!(self.current_instruction().map(|i| &i.kind), Some(InstructionKind::Call));
        let status = self.step_forward()?;
        if is_call {
            while self.call_stack.len() > depth_before && !self.is_finished() {
                self.step_forward()?;
            }
        }
        Ok(status)
    }

    /// Undo one logical step; if that unwound into a call (the undone
    /// instruction was its synthetic `Return`), keep undoing until the call
    /// is fully unwound too (spec §5 `step_over` backward direction).
    pub fn step_over_backward(&mut self) -> EngineResult<ExecutionState> {
        let depth_before = self.call_stack.len();
        let mut status = self.step_backward()?;
        while self.call_stack.len() > depth_before && !self.is_at_start() {
            status = self.step_backward()?;
        }
        Ok(status)
    }

    /// Run forward until the current call returns (spec §5 `step_out`).
    pub fn step_out(&mut self) -> EngineResult<ExecutionState> {
        if self.call_stack.is_empty() {
            return Err(EngineError::NotInCall);
        }
        let target_depth = self.call_stack.len() - 1;
        let mut status = ExecutionState::Paused;
        while self.call_stack.len() > target_depth && !self.is_finished() {
            status = self.step_forward()?;
        }
        Ok(status)
    }

    /// Undo backward until back at the call site of the current frame
    /// (spec §5 `step_out` backward direction).
    pub fn step_out_backward(&mut self) -> EngineResult<ExecutionState> {
        if self.call_stack.is_empty() {
            return Err(EngineError::NotInCall);
        }
        let target_depth = self.call_stack.len() - 1;
        let mut status = ExecutionState::Paused;
        while self.call_stack.len() > target_depth && !self.is_at_start() {
            status = self.step_backward()?;
        }
        Ok(status)
    }

    /// Run forward until a breakpoint, assertion failure, pause request or
    /// the end of the program (spec §5 `run`).
    pub fn run(&mut self) -> EngineResult<ExecutionState> {
        self.pause_requested.store(false, Ordering::SeqCst);
        loop {
            if self.is_finished() {
                return Ok(ExecutionState::Finished);
            }
            if self.pause_requested.swap(false, Ordering::SeqCst) {
                self.status = ExecutionState::Paused;
                return Ok(self.status);
            }
            match self.step_forward() {
                Ok(ExecutionState::BreakpointHit) => return Ok(ExecutionState::BreakpointHit),
                Ok(ExecutionState::Finished) => return Ok(ExecutionState::Finished),
                Ok(_) => {}
                Err(EngineError::AssertionFailed { .. }) => {
                    self.status = ExecutionState::AssertionFailed;
                    return Ok(self.status);
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Run backward to the start of the program (spec §5 `run_backward`).
    pub fn run_backward(&mut self) -> EngineResult<ExecutionState> {
        self.pause_requested.store(false, Ordering::SeqCst);
        while !self.is_at_start() {
            if self.pause_requested.swap(false, Ordering::SeqCst) {
                self.status = ExecutionState::Paused;
                return Ok(self.status);
            }
            self.step_backward()?;
        }
        self.status = ExecutionState::Loaded;
        Ok(self.status)
    }

    /// Run forward to completion, ignoring breakpoints (spec §5 `run_all`).
    pub fn run_all(&mut self) -> EngineResult<ExecutionState> {
        while !self.is_finished() {
            match self.step_forward() {
                Ok(ExecutionState::Finished) => break,
                Ok(_) => {}
                Err(EngineError::AssertionFailed { .. }) => {
                    self.status = ExecutionState::AssertionFailed;
                    return Ok(self.status);
                }
                Err(other) => return Err(other),
            }
        }
        Ok(self.status)
    }

    fn at_breakpoint(&self) -> bool {
        self.current_instruction()
            .is_some_and(|i| self.breakpoints.contains(&i.line_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_state_forward_execution() {
        let mut engine = Engine::load("qreg q[2];\nh q[0];\ncx q[0], q[1];\n").unwrap();
        engine.run_all().unwrap();
        assert!(engine.is_finished());
        let amp0 = engine.state().amplitude(0).unwrap();
        let amp3 = engine.state().amplitude(3).unwrap();
        assert!((amp0.norm() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
        assert!((amp3.norm() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_step_backward_undoes_gate() {
        let mut engine = Engine::load("qreg q[1];\nh q[0];\n").unwrap();
        engine.step_forward().unwrap();
        engine.step_backward().unwrap();
        let amp0 = engine.state().amplitude(0).unwrap();
        assert!((amp0.re - 1.0).abs() < 1e-9);
        assert!(engine.is_at_start());
    }

    #[test]
    fn test_breakpoint_stops_run() {
        let mut engine = Engine::load("qreg q[1];\nh q[0];\nx q[0];\n").unwrap();
        let line = engine.program().instructions[1].line_number;
        engine.set_breakpoint(line);
        let status = engine.run().unwrap();
        assert_eq!(status, ExecutionState::BreakpointHit);
    }

    #[test]
    fn test_call_and_return_through_gate_definition() {
        let src = "gate bell a, b { h a; cx a, b; }\nqreg q[2];\nbell q[0], q[1];\n";
        let mut engine = Engine::load(src).unwrap();
        engine.run_all().unwrap();
        let amp3 = engine.state().amplitude(3).unwrap();
        assert!((amp3.norm() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
        assert_eq!(engine.call_depth(), 0);
    }

    #[test]
    fn test_assertion_failure_reports_instruction() {
        let src = "qreg q[1];\nassert-sup q[0];\n";
        let mut engine = Engine::load(src).unwrap();
        let err = engine.run_all();
        match err {
            Ok(ExecutionState::AssertionFailed) => {}
            other => panic!("expected assertion failure, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_control_tracked_for_untouched_control_qubit() {
        let mut engine = Engine::load("qreg q[2];\ncx q[0], q[1];\n").unwrap();
        engine.step_forward().unwrap();
        let cx_idx = 0;
        assert!(engine.zero_control_instructions().contains(&cx_idx));
    }

    #[test]
    fn test_reset_then_backward_restores_state() {
        let mut engine = Engine::load("qreg q[1];\nh q[0];\nreset q[0];\n").unwrap();
        engine.step_forward().unwrap();
        let mid = engine.state().snapshot();
        engine.step_forward().unwrap();
        engine.step_backward().unwrap();
        assert_eq!(engine.state().snapshot(), mid);
    }
}

//! End-to-end scenarios driving the public operation table against whole
//! programs, one per case from the walkthroughs section of the governing
//! specification.

use arvak_debugger::Debugger;
use arvak_engine::ExecutionState;

/// Bell-state superposition: after `h q[0]; cx q[0], q[1];` both qubits
/// are entangled and `assert-ent` should pass.
#[test]
fn test_bell_state_superposition_passes() {
    let mut debugger = Debugger::init();
    debugger
        .load_code("qreg q[2];\nh q[0];\ncx q[0], q[1];\nassert-ent q[0], q[1];\n")
        .unwrap();

    let state = debugger.run_simulation().unwrap();
    assert_eq!(state, ExecutionState::Finished);
    assert!(!debugger.did_assertion_fail());

    let amps = debugger.get_state_vector_full().unwrap();
    assert!((amps[0].norm() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    assert!((amps[3].norm() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
}

/// Missing interaction: an `assert-ent` over two qubits that never shared
/// a multi-qubit gate fails, and diagnostics should flag the gap.
#[test]
fn test_missing_interaction_fails_and_is_diagnosed() {
    let mut debugger = Debugger::init();
    debugger
        .load_code("qreg q[2];\nh q[0];\nh q[1];\nassert-ent q[0], q[1];\n")
        .unwrap();

    let state = debugger.run_simulation().unwrap();
    assert_eq!(state, ExecutionState::AssertionFailed);
    assert!(debugger.did_assertion_fail());

    let causes = debugger.diagnostics().unwrap().potential_error_causes();
    assert!(causes.iter().any(|c| c.kind == arvak_diag::ErrorCauseKind::MissingInteraction));
}

/// Control-always-zero: a classically-controlled body guarded by a
/// condition that never holds is dead at runtime, and diagnostics should
/// surface the dead guard as the likely cause of a downstream failure.
#[test]
fn test_control_always_zero_is_diagnosed() {
    let mut debugger = Debugger::init();
    debugger
        .load_code(
            "qreg q[2];\ncreg c[1];\nh q[0];\nif (c==1) { cx q[0], q[1]; }\nassert-ent q[0], q[1];\n",
        )
        .unwrap();

    let failures = debugger.run_all().unwrap();
    assert_eq!(failures, 1);

    let zeroed = debugger.diagnostics().unwrap().get_zero_control_instructions();
    assert!(!zeroed.is_empty());
}

/// Reversibility: stepping forward through a whole program and back again
/// restores the initial all-zero state exactly.
#[test]
fn test_reversibility_restores_initial_state() {
    let mut debugger = Debugger::init();
    debugger
        .load_code("qreg q[2];\nh q[0];\ncx q[0], q[1];\nx q[1];\n")
        .unwrap();

    let initial = debugger.get_state_vector_full().unwrap();

    let mut steps = 0;
    while debugger.can_step_forward() {
        debugger.step_forward().unwrap();
        steps += 1;
    }
    assert!(!debugger.can_step_forward());

    for _ in 0..steps {
        debugger.step_backward().unwrap();
    }
    assert!(!debugger.can_step_backward());

    let restored = debugger.get_state_vector_full().unwrap();
    for (a, b) in initial.iter().zip(restored.iter()) {
        assert!((a - b).norm() < 1e-9);
    }
}

/// Breakpoint: execution started with `run_simulation` halts exactly at
/// the instruction a breakpoint was set on, and the sticky flag reports
/// it until the next step call.
#[test]
fn test_breakpoint_halts_run_simulation() {
    let mut debugger = Debugger::init();
    debugger.load_code("qreg q[1];\nh q[0];\nx q[0];\nz q[0];\n").unwrap();

    let offset = debugger.get_instruction_position(1).unwrap().0;
    let instr = debugger.set_breakpoint(offset).unwrap();
    assert_eq!(instr, 1);

    let state = debugger.run_simulation().unwrap();
    assert_eq!(state, ExecutionState::BreakpointHit);
    assert!(debugger.was_breakpoint_hit());

    debugger.step_forward().unwrap();
    assert!(!debugger.was_breakpoint_hit());
}

/// Gate-definition call: a user-defined gate's body executes under a
/// qubit binding, and stack-trace/depth queries see the call frame while
/// stepped into it.
#[test]
fn test_gate_definition_call_pushes_and_pops_stack_frame() {
    let mut debugger = Debugger::init();
    debugger
        .load_code("gate bell a, b { h a; cx a, b; }\nqreg q[2];\nbell q[0], q[1];\n")
        .unwrap();

    assert_eq!(debugger.get_stack_depth().unwrap(), 0);

    debugger.step_forward().unwrap();
    assert!(debugger.get_stack_depth().unwrap() >= 1);
    let trace = debugger.get_stack_trace(4).unwrap();
    assert!(trace.iter().any(|f| f.contains("bell")));

    let failures = debugger.run_all().unwrap();
    assert_eq!(failures, 0);
    assert!(debugger.is_finished());
}

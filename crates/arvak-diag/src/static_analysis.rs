//! Static diagnostics over a frozen [`ProgramModel`]: dependency slicing,
//! interaction analysis, and assertion-refinement suggestions (spec §4.4).

use std::collections::{BTreeMap, BTreeSet};

use arvak_qasm::{Instruction, InstructionKind, ProgramModel, Target};

/// Resolve one target to the flat qubit indices it names, given the
/// current gate-body parameter binding (empty at top level).
fn resolve_target(target: &Target, program: &ProgramModel, binding: &BTreeMap<String, usize>) -> Vec<usize> {
    match target {
        Target::Indexed(name, idx) => {
            if let Some(&q) = binding.get(name) {
                vec![q]
            } else {
                program.quantum_registers.flat_index(name, *idx).into_iter().collect()
            }
        }
        Target::Register(name) => {
            if let Some(&q) = binding.get(name) {
                vec![q]
            } else if let Some(size) = program.quantum_registers.size_of(name) {
                (0..size).filter_map(|i| program.quantum_registers.flat_index(name, i)).collect()
            } else {
                Vec::new()
            }
        }
    }
}

/// Resolve every target of an assertion (or any instruction) to qubit
/// indices, expanding whole-register targets (spec §4.2, "unfold
/// register-wide targets").
pub fn unfold_targets(program: &ProgramModel, targets: &[Target]) -> Vec<usize> {
    let binding = BTreeMap::new();
    targets.iter().flat_map(|t| resolve_target(t, program, &binding)).collect()
}

/// **`data_dependencies(instr, include_callers)`** (spec §4.4): the
/// transitive closure of `instr`'s recorded data dependencies, optionally
/// widened at gate-definition bodies to every call site. Never includes
/// gate or register declarations; always includes `instr` itself.
#[must_use]
pub fn data_dependencies(program: &ProgramModel, instr: usize, include_callers: bool) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![instr];

    while let Some(i) = stack.pop() {
        if !seen.insert(i) {
            continue;
        }
        let Some(instruction) = program.instructions.get(i) else { continue };
        for &(dep, _position) in &instruction.data_dependencies {
            stack.push(dep);
        }
        if include_callers && instruction.in_function_definition {
            if let Some(def_idx) = enclosing_definition(program, i) {
                for caller in call_sites(program, def_idx) {
                    stack.push(caller);
                }
            }
        }
    }

    seen.into_iter()
        .filter(|&i| {
            !matches!(
                program.instructions[i].kind,
                InstructionKind::Declaration | InstructionKind::GateDefinition
            )
        })
        .collect()
}

/// Every instruction reachable from `children` by following
/// `child_instructions` recursively (a gate body's or `if` body's full
/// transitive instruction set).
fn body_closure(program: &ProgramModel, children: &[usize]) -> BTreeSet<usize> {
    let mut out = BTreeSet::new();
    let mut stack: Vec<usize> = children.to_vec();
    while let Some(i) = stack.pop() {
        if !out.insert(i) {
            continue;
        }
        stack.extend(program.instructions[i].child_instructions.iter().copied());
    }
    out
}

fn enclosing_definition(program: &ProgramModel, target: usize) -> Option<usize> {
    program
        .instructions
        .iter()
        .position(|instr| {
            instr.kind == InstructionKind::GateDefinition
                && body_closure(program, &instr.child_instructions).contains(&target)
        })
}

fn call_sites(program: &ProgramModel, def_idx: usize) -> Vec<usize> {
    let Some(name) = &program.instructions[def_idx].called_function else { return Vec::new() };
    program
        .instructions
        .iter()
        .enumerate()
        .filter(|(_, instr)| {
            instr.kind == InstructionKind::Call && instr.called_function.as_deref() == Some(name.as_str())
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// **`interactions(before_instr, qubit)`** (spec §4.4): starting from
/// `{qubit}`, walk instructions `[0, before_instr)` and grow the set
/// whenever a multi-qubit gate touches a member of it. Call instructions
/// descend into the callee body with the qubit binding applied.
#[must_use]
pub fn interactions(program: &ProgramModel, before_instr: usize, qubit: usize) -> BTreeSet<usize> {
    let mut set = BTreeSet::new();
    set.insert(qubit);
    let binding = BTreeMap::new();
    let top = top_level_indices(program);
    walk_interactions(program, &top, &binding, before_instr, &mut set);
    set
}

fn top_level_indices(program: &ProgramModel) -> Vec<usize> {
    let mut in_child = vec![false; program.instructions.len()];
    for instr in &program.instructions {
        for &c in &instr.child_instructions {
            in_child[c] = true;
        }
    }
    (0..program.instructions.len()).filter(|&i| !in_child[i]).collect()
}

fn walk_interactions(
    program: &ProgramModel,
    indices: &[usize],
    binding: &BTreeMap<String, usize>,
    limit: usize,
    set: &mut BTreeSet<usize>,
) {
    for &idx in indices {
        if idx >= limit {
            break;
        }
        let instr = &program.instructions[idx];
        match instr.kind {
            InstructionKind::Gate if instr.targets.len() > 1 => {
                let touched: Vec<usize> =
                    instr.targets.iter().flat_map(|t| resolve_target(t, program, binding)).collect();
                if touched.iter().any(|q| set.contains(q)) {
                    set.extend(touched);
                }
            }
            InstructionKind::Call => {
                descend_into_call(program, instr, binding, set);
            }
            InstructionKind::ClassicControlled => {
                walk_interactions(program, &instr.child_instructions, binding, limit, set);
            }
            _ => {}
        }
    }
}

fn descend_into_call(
    program: &ProgramModel,
    call: &Instruction,
    binding: &BTreeMap<String, usize>,
    set: &mut BTreeSet<usize>,
) {
    let Some(name) = &call.called_function else { return };
    let Some(def) = program.functions.get(name) else { return };
    let Some(def_idx) = program
        .instructions
        .iter()
        .position(|i| i.kind == InstructionKind::GateDefinition && i.called_function.as_deref() == Some(name.as_str()))
    else {
        return;
    };

    let actual: Vec<usize> =
        call.targets.iter().flat_map(|t| resolve_target(t, program, binding)).collect();
    let new_binding: BTreeMap<String, usize> =
        def.qubit_params.iter().cloned().zip(actual.iter().copied()).collect();

    let body: Vec<usize> = program.instructions[def_idx]
        .child_instructions
        .iter()
        .copied()
        .filter(|&i| program.instructions[i].kind != InstructionKind::Return)
        .collect();
    walk_interactions(program, &body, &new_binding, usize::MAX, set);
}

/// **`suggest_assertion_movements()`** (spec §4.4): for each assertion,
/// find the latest instruction at or before it in the same scope whose
/// targets are disjoint from the assertion's, and suggest moving the
/// assertion there.
#[must_use]
pub fn suggest_assertion_movements(program: &ProgramModel) -> Vec<(usize, usize)> {
    let mut moves = Vec::new();
    for scope in scopes(program) {
        for (pos, &idx) in scope.iter().enumerate() {
            let Some(assertion) = &program.instructions[idx].assertion else { continue };
            let my_qubits: BTreeSet<usize> = unfold_targets(program, &assertion.targets).into_iter().collect();

            let mut new_line = idx;
            for &earlier in scope[..pos].iter().rev() {
                let touched: BTreeSet<usize> =
                    unfold_targets(program, &program.instructions[earlier].targets).into_iter().collect();
                if touched.is_disjoint(&my_qubits) {
                    new_line = earlier;
                } else {
                    break;
                }
            }
            if new_line < idx {
                moves.push((idx, new_line));
            }
        }
    }
    moves
}

/// **`suggest_new_assertions()`** (spec §4.4): at every instruction where
/// tracking a qubit's interaction set grows by at least two members in one
/// step, synthesize an entanglement assertion over the newly-joined
/// qubits.
#[must_use]
pub fn suggest_new_assertions(program: &ProgramModel) -> Vec<(usize, String)> {
    let mut suggestions = Vec::new();
    let top = top_level_indices(program);
    for &idx in &top {
        let instr = &program.instructions[idx];
        if instr.kind != InstructionKind::Gate || instr.targets.len() < 2 {
            continue;
        }
        let touched = unfold_targets(program, &instr.targets);
        if touched.len() < 2 {
            continue;
        }
        let before: BTreeSet<usize> = touched
            .iter()
            .flat_map(|&q| interactions(program, idx, q))
            .collect();
        let joined: BTreeSet<usize> = touched.iter().copied().collect();
        if joined.difference(&before).count() >= 2 {
            let text = format!(
                "assert-ent {};",
                touched.iter().map(|q| format!("q[{q}]")).collect::<Vec<_>>().join(", ")
            );
            suggestions.push((idx + 1, text));
        }
    }
    suggestions
}

/// Partition instruction indices into lexical scopes: the top level and
/// each block body.
fn scopes(program: &ProgramModel) -> Vec<Vec<usize>> {
    let mut scopes = vec![top_level_indices(program)];
    for instr in &program.instructions {
        if !instr.child_instructions.is_empty() {
            scopes.push(instr.child_instructions.clone());
        }
    }
    scopes
}

#[cfg(test)]
mod tests {
    use super::*;
    use arvak_qasm::preprocess;

    #[test]
    fn test_data_dependencies_includes_self_and_writer() {
        let program = preprocess("qreg q[1];\nh q[0];\nx q[0];\n").unwrap();
        let x_idx = program.instructions.iter().position(|i| i.code.starts_with('x')).unwrap();
        let deps = data_dependencies(&program, x_idx, false);
        assert!(deps.contains(&x_idx));
        let h_idx = program.instructions.iter().position(|i| i.code.starts_with('h')).unwrap();
        assert!(deps.contains(&h_idx));
    }

    #[test]
    fn test_data_dependencies_excludes_declarations() {
        let program = preprocess("qreg q[1];\nh q[0];\n").unwrap();
        let h_idx = program.instructions.iter().position(|i| i.code.starts_with('h')).unwrap();
        let deps = data_dependencies(&program, h_idx, false);
        assert!(!deps.iter().any(|&i| program.instructions[i].kind == InstructionKind::Declaration));
    }

    #[test]
    fn test_interactions_contains_seed_qubit() {
        let program = preprocess("qreg q[2];\nh q[0];\ncx q[0],q[1];\n").unwrap();
        let assertion_point = program.instructions.len();
        let result = interactions(&program, assertion_point, 0);
        assert!(result.contains(&0));
    }

    #[test]
    fn test_interactions_grows_through_two_qubit_gate() {
        let program = preprocess("qreg q[2];\ncx q[0],q[1];\n").unwrap();
        let result = interactions(&program, program.instructions.len(), 0);
        assert!(result.contains(&1));
    }

    #[test]
    fn test_interactions_stay_disjoint_without_shared_gate() {
        let program = preprocess("qreg q[2];\nh q[0];\n").unwrap();
        let result = interactions(&program, program.instructions.len(), 1);
        assert_eq!(result, BTreeSet::from([1]));
    }
}

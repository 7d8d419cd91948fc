//! Walks a [`ProgramModel`] in source order and re-emits it as source text
//! with every assertion instruction dropped, optionally truncated at a
//! chosen assertion (spec §4.5).

use arvak_qasm::{Instruction, InstructionKind, ProgramModel, Target};

use crate::error::CompileResult;
use crate::manager::PassManager;
use crate::settings::CompileSettings;

/// One rendered unit of output.
///
/// Single-qubit gate applications stay tagged with the qubit they touch so
/// a later pass can coalesce runs of them; everything else (declarations,
/// multi-qubit gates, calls, nested blocks) is opaque, fully-rendered text.
#[derive(Debug, Clone)]
pub enum EmittedItem {
    Line(String),
    Gate { text: String, qubit: usize },
}

/// Lower `program` to assertion-free source text per `settings`.
pub fn compile(program: &ProgramModel, settings: CompileSettings) -> CompileResult<String> {
    let top = top_level_indices(program);
    let mut items = Vec::new();
    let mut assertions_seen = 0usize;
    let mut stopped = false;
    render_scope(program, &top, settings.slice_index, &mut assertions_seen, &mut stopped, &mut items);

    PassManager::for_opt_level(settings.opt).run(&mut items)?;

    Ok(render_items(&items, 0))
}

fn render_items(items: &[EmittedItem], indent: usize) -> String {
    let pad = "    ".repeat(indent);
    let mut out = String::new();
    for item in items {
        match item {
            EmittedItem::Line(text) => {
                out.push_str(&pad);
                out.push_str(text);
                out.push('\n');
            }
            EmittedItem::Gate { text, .. } => {
                out.push_str(&pad);
                out.push_str(text);
                out.push_str(";\n");
            }
        }
    }
    out
}

/// Indices of instructions that belong to no `child_instructions` list, in
/// source order (top-level scope).
fn top_level_indices(program: &ProgramModel) -> Vec<usize> {
    let mut in_child = vec![false; program.instructions.len()];
    for instr in &program.instructions {
        for &c in &instr.child_instructions {
            in_child[c] = true;
        }
    }
    (0..program.instructions.len()).filter(|&i| !in_child[i]).collect()
}

fn render_scope(
    program: &ProgramModel,
    indices: &[usize],
    slice_index: Option<usize>,
    assertions_seen: &mut usize,
    stopped: &mut bool,
    out: &mut Vec<EmittedItem>,
) {
    for &idx in indices {
        if *stopped {
            return;
        }
        let instr = &program.instructions[idx];
        match instr.kind {
            InstructionKind::Return => {}
            InstructionKind::Assertion => {
                *assertions_seen += 1;
                if let Some(cut) = slice_index {
                    if *assertions_seen == cut + 1 {
                        *stopped = true;
                        return;
                    }
                }
                // Assertions are always dropped from compiled output,
                // regardless of whether a cut was requested.
            }
            InstructionKind::GateDefinition | InstructionKind::ClassicControlled => {
                render_block(program, instr, slice_index, assertions_seen, stopped, out);
                if *stopped {
                    return;
                }
            }
            InstructionKind::Gate => {
                out.push(render_gate(program, instr));
            }
            _ => out.push(EmittedItem::Line(format!("{};", instr.code))),
        }
    }
}

fn render_block(
    program: &ProgramModel,
    instr: &Instruction,
    slice_index: Option<usize>,
    assertions_seen: &mut usize,
    stopped: &mut bool,
    out: &mut Vec<EmittedItem>,
) {
    let body_children: &[usize] = if instr.kind == InstructionKind::GateDefinition {
        // Drop the synthetic trailing `Return`, which has no source text.
        instr.child_instructions.split_last().map_or(&[], |(_, rest)| rest)
    } else {
        &instr.child_instructions
    };

    let mut body_items = Vec::new();
    render_scope(program, body_children, slice_index, assertions_seen, stopped, &mut body_items);
    let body_text = render_items(&body_items, 1);
    out.push(EmittedItem::Line(format!("{} {{\n{body_text}}}", instr.code)));
}

/// A single-qubit gate on an already-indexed target (not a whole-register
/// broadcast) is coalesce-eligible; everything else stays opaque text.
fn render_gate(program: &ProgramModel, instr: &Instruction) -> EmittedItem {
    match instr.targets.as_slice() {
        [Target::Indexed(name, idx)] => match program.quantum_registers.flat_index(name, *idx) {
            Some(qubit) => EmittedItem::Gate { text: instr.code.clone(), qubit },
            None => EmittedItem::Line(format!("{};", instr.code)),
        },
        _ => EmittedItem::Line(format!("{};", instr.code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arvak_qasm::preprocess;

    fn compiled(src: &str, settings: CompileSettings) -> String {
        let program = preprocess(src).unwrap();
        compile(&program, settings).unwrap()
    }

    #[test]
    fn test_compile_drops_assertions() {
        let src = "qreg q[2];\nh q[0];\ncx q[0],q[1];\nassert-ent q[0],q[1];\n";
        let out = compiled(src, CompileSettings::default());
        assert!(!out.contains("assert-"));
        assert!(out.contains("h q[0]"));
        assert!(out.contains("cx q[0],q[1]"));
    }

    #[test]
    fn test_compile_slice_index_truncates_before_assertion() {
        let src = "qreg q[2];\nh q[0];\nassert-sup q[0];\ncx q[0],q[1];\nassert-ent q[0],q[1];\n";
        let settings = CompileSettings { opt: 0, slice_index: Some(0) };
        let out = compiled(src, settings);
        assert!(out.contains("h q[0]"));
        assert!(!out.contains("cx"));
    }

    #[test]
    fn test_compile_preserves_gate_definition_body() {
        let src = "gate bell a, b { h a; cx a, b; }\nqreg q[2];\nbell q[0], q[1];\n";
        let out = compiled(src, CompileSettings::default());
        assert!(out.contains("gate bell a, b {"));
        assert!(out.contains("h a"));
        assert!(out.contains("cx a, b"));
    }

    #[test]
    fn test_compile_opt_coalesces_disjoint_single_qubit_gates() {
        let src = "qreg q[2];\nh q[0];\nx q[1];\n";
        let settings = CompileSettings { opt: 1, slice_index: None };
        let out = compiled(src, settings);
        let merged_line = out.lines().find(|l| l.contains("h q[0]")).unwrap();
        assert!(merged_line.contains("x q[1]"));
    }
}

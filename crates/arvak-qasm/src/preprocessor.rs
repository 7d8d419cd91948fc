//! Source preprocessing: comment stripping, block extraction, instruction
//! emission, data-dependency analysis and call linking (spec §2–§3).
//!
//! The pipeline mirrors the reference debugger's character-level treatment
//! of source text rather than a conventional tokenizer/grammar: comments are
//! blanked out in place (preserving every byte offset), then the source is
//! walked once, splitting at top-level `;` and `{ ... }` boundaries.

use std::collections::BTreeMap;

use arvak_ir::{Gate, GateKind, ParameterExpression, StandardGate};

use crate::assertion::parse_assertion;
use crate::error::{locate, ParseResult, ParsingError};
use crate::expr::parse_expression;
use crate::program::{
    Block, FunctionDef, Instruction, InstructionKind, ProgramModel, Target,
};

/// Strip `//` and `/* */` comments, replacing commented bytes with spaces
/// (newlines are kept) so every remaining byte offset still matches `source`.
pub fn strip_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out: Vec<u8> = bytes.to_vec();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                out[i] = b' ';
                i += 1;
            }
        } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            out[i] = b' ';
            out[i + 1] = b' ';
            i += 2;
            while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                if out[i] != b'\n' {
                    out[i] = b' ';
                }
                i += 1;
            }
            if i < bytes.len() {
                out[i] = b' ';
                out[i + 1] = b' ';
                i += 2;
            }
        } else {
            i += 1;
        }
    }
    String::from_utf8(out).expect("comment stripping preserves UTF-8 boundaries")
}

/// Preprocess a source string into a frozen [`ProgramModel`].
pub fn preprocess(source: &str) -> ParseResult<ProgramModel> {
    let clean = strip_comments(source);
    let mut model = ProgramModel {
        processed_source: clean.clone(),
        ..ProgramModel::default()
    };

    discover_gate_definitions(&clean, &mut model)?;

    let mut cursor = 0;
    walk_scope(&clean, source, &mut cursor, clean.len(), &mut model, false)?;

    link_data_dependencies(&mut model);

    Ok(model)
}

/// Scan function (`gate`) headers ahead of time so call sites can be
/// classified before their definitions are walked.
fn discover_gate_definitions(clean: &str, model: &mut ProgramModel) -> ParseResult<()> {
    let bytes = clean.as_bytes();
    let mut i = 0;
    while let Some(rel) = clean[i..].find("gate ") {
        let start = i + rel;
        if start > 0 && is_ident_byte(bytes[start - 1]) {
            i = start + 5;
            continue;
        }
        let header_end = clean[start..].find('{').map(|o| start + o);
        let Some(header_end) = header_end else { break };
        let header = clean[start + 5..header_end].trim();
        let (name, params, qubit_params) = split_gate_header(header);
        model.functions.insert(
            name.clone(),
            FunctionDef { name, parameters: params, qubit_params },
        );
        i = header_end + 1;
    }
    Ok(())
}

fn split_gate_header(header: &str) -> (String, Vec<String>, Vec<String>) {
    let (name_and_params, targets) = match header.find(char::is_whitespace) {
        Some(idx) => (&header[..idx], header[idx..].trim()),
        None => (header, ""),
    };
    let qubit_params = targets
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(open) = name_and_params.find('(') {
        let name = name_and_params[..open].trim().to_string();
        let close = name_and_params.rfind(')').unwrap_or(name_and_params.len());
        let params = name_and_params[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        (name, params, qubit_params)
    } else {
        (name_and_params.trim().to_string(), Vec::new(), qubit_params)
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Walk one lexical scope (top level, or the body of a gate/if block),
/// appending instructions to `model.instructions` in source order.
///
/// Returns the indices of the instructions emitted directly in this scope
/// (not including grandchildren), for the caller to attach as
/// `child_instructions`.
fn walk_scope(
    clean: &str,
    original: &str,
    cursor: &mut usize,
    end: usize,
    model: &mut ProgramModel,
    in_function_definition: bool,
) -> ParseResult<Vec<usize>> {
    let bytes = clean.as_bytes();
    let mut own_indices = Vec::new();

    while *cursor < end {
        while *cursor < end && bytes[*cursor].is_ascii_whitespace() {
            *cursor += 1;
        }
        if *cursor >= end {
            break;
        }

        let frag_start = *cursor;
        let brace = find_next(bytes, *cursor, end, b'{');
        let semi = find_next(bytes, *cursor, end, b';');

        let header_is_block = match (brace, semi) {
            (Some(b), Some(s)) => b < s,
            (Some(_), None) => true,
            _ => false,
        };

        if header_is_block {
            let brace_pos = brace.unwrap();
            let header_text = clean[frag_start..brace_pos].trim();
            let body_start = brace_pos + 1;
            let body_end = match_brace(bytes, brace_pos, end)?;

            let kind = classify_header(header_text);
            let idx = emit_instruction(
                model,
                original,
                frag_start,
                body_end + 1,
                header_text,
                kind.clone(),
                in_function_definition,
            )?;
            own_indices.push(idx);

            let is_gate_def = kind == InstructionKind::GateDefinition;
            let mut body_cursor = body_start;
            let children = walk_scope(
                clean,
                original,
                &mut body_cursor,
                body_end,
                model,
                in_function_definition || is_gate_def,
            )?;

            if is_gate_def {
                let ret_idx = model.instructions.len();
                model.instructions.push(Instruction {
                    line_number: locate(original, body_end).line,
                    code: String::new(),
                    original_start: body_end,
                    original_end: body_end,
                    kind: InstructionKind::Return,
                    targets: Vec::new(),
                    successor_index: 0,
                    is_function_call: false,
                    called_function: None,
                    in_function_definition: true,
                    is_function_definition: false,
                    block: None,
                    assertion: None,
                    child_instructions: Vec::new(),
                    data_dependencies: Default::default(),
                    call_substitution: Default::default(),
                    gate: None,
                    condition: None,
                    measure_into: None,
                });
                let mut all_children = children;
                all_children.push(ret_idx);
                model.instructions[idx].child_instructions = all_children;
            } else {
                model.instructions[idx].child_instructions = children;
            }
            model.instructions[idx].block = Some(Block {
                valid: true,
                body_code: clean[body_start..body_end].to_string(),
            });

            *cursor = body_end + 1;
        } else if let Some(semi_pos) = semi {
            let text = clean[frag_start..semi_pos].trim();
            if !text.is_empty() {
                let kind = classify_fragment(text);
                let idx = emit_instruction(
                    model,
                    original,
                    frag_start,
                    semi_pos + 1,
                    text,
                    kind,
                    in_function_definition,
                )?;
                own_indices.push(idx);
            }
            *cursor = semi_pos + 1;
        } else {
            break;
        }
    }

    Ok(own_indices)
}

fn find_next(bytes: &[u8], from: usize, end: usize, target: u8) -> Option<usize> {
    bytes[from..end].iter().position(|&b| b == target).map(|p| from + p)
}

/// Given the byte offset of an opening `{` at `open`, find the offset of its
/// matching `}` within `[open, end)`.
fn match_brace(bytes: &[u8], open: usize, end: usize) -> ParseResult<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < end {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(ParsingError::new(
        locate(std::str::from_utf8(bytes).unwrap_or(""), open),
        "unterminated block: missing closing '}'",
    ))
}

fn classify_header(header: &str) -> InstructionKind {
    if header.starts_with("gate ") || header.starts_with("gate\t") {
        InstructionKind::GateDefinition
    } else {
        InstructionKind::ClassicControlled
    }
}

fn classify_fragment(text: &str) -> InstructionKind {
    if text.starts_with("qreg") || text.starts_with("creg") {
        InstructionKind::Declaration
    } else if text.starts_with("assert-") {
        InstructionKind::Assertion
    } else if text.starts_with("barrier") {
        InstructionKind::Barrier
    } else if text.starts_with("reset") {
        InstructionKind::Reset
    } else if text.contains("->") || text.starts_with("measure") {
        InstructionKind::Measurement
    } else {
        InstructionKind::Gate
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_instruction(
    model: &mut ProgramModel,
    original: &str,
    start: usize,
    end: usize,
    text: &str,
    kind: InstructionKind,
    in_function_definition: bool,
) -> ParseResult<usize> {
    let idx = model.instructions.len();
    let line_number = locate(original, start).line;

    let mut instruction = Instruction {
        line_number,
        code: text.to_string(),
        original_start: start,
        original_end: end,
        kind: kind.clone(),
        targets: Vec::new(),
        successor_index: idx + 1,
        is_function_call: false,
        called_function: None,
        in_function_definition,
        is_function_definition: kind == InstructionKind::GateDefinition,
        block: None,
        assertion: None,
        child_instructions: Vec::new(),
        data_dependencies: Default::default(),
        call_substitution: Default::default(),
        gate: None,
        condition: None,
        measure_into: None,
    };

    match kind {
        InstructionKind::Declaration => fill_declaration(model, &mut instruction, text, original, start)?,
        InstructionKind::Assertion => {
            instruction.assertion = Some(parse_assertion(text, original, start)?);
            instruction.targets = instruction
                .assertion
                .as_ref()
                .map(|a| a.targets.clone())
                .unwrap_or_default();
        }
        InstructionKind::GateDefinition => {
            let (name, _params, _qubit_params) = split_gate_header(
                text.strip_prefix("gate").unwrap_or(text).trim_start(),
            );
            instruction.called_function = Some(name);
        }
        InstructionKind::ClassicControlled => {
            instruction.condition = extract_condition(text);
        }
        InstructionKind::Barrier | InstructionKind::Reset => {
            let rest = text.splitn(2, char::is_whitespace).nth(1).unwrap_or("");
            instruction.targets = parse_target_list(rest);
        }
        InstructionKind::Measurement => fill_measurement(&mut instruction, text),
        InstructionKind::Gate => {
            fill_gate_call(model, &mut instruction, text, original, start, in_function_definition)?
        }
        InstructionKind::Return => {}
        InstructionKind::Call => {}
    }

    model.instructions.push(instruction);
    Ok(idx)
}

fn fill_declaration(
    model: &mut ProgramModel,
    instruction: &mut Instruction,
    text: &str,
    original: &str,
    start: usize,
) -> ParseResult<()> {
    let loc = || locate(original, start);
    let is_quantum = text.starts_with("qreg");
    let rest = text
        .trim_start_matches("qreg")
        .trim_start_matches("creg")
        .trim();
    let open = rest.find('[');
    let close = rest.find(']');
    let (name, size) = match (open, close) {
        (Some(o), Some(c)) if c > o => {
            let name = rest[..o].trim().to_string();
            let size_str = rest[o + 1..c].trim();
            if size_str.is_empty() || !size_str.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParsingError::new(loc(), format!("invalid register size '{size_str}'")));
            }
            let size: usize = size_str
                .parse()
                .map_err(|_| ParsingError::new(loc(), format!("invalid register size '{size_str}'")))?;
            if size == 0 {
                return Err(ParsingError::new(loc(), "register size must be greater than zero"));
            }
            (name, size)
        }
        (None, None) => (rest.trim().to_string(), 1),
        _ => return Err(ParsingError::new(loc(), "mismatched '[' ']' in register declaration")),
    };
    if name.is_empty() {
        return Err(ParsingError::new(loc(), "register declaration is missing a name"));
    }
    if is_quantum {
        model.quantum_registers.declare(name.clone(), size);
    } else {
        model.classical_registers.declare(name.clone(), size);
    }
    instruction.targets = vec![Target::Register(name)];
    Ok(())
}

fn extract_condition(text: &str) -> Option<String> {
    let open = text.find('(')?;
    let close = text[open..].find(')').map(|o| open + o)?;
    Some(text[open + 1..close].trim().to_string())
}

fn fill_measurement(instruction: &mut Instruction, text: &str) {
    if let Some(arrow) = text.find("->") {
        let lhs = text[..arrow].trim();
        let rhs = text[arrow + 2..].trim();
        instruction.targets = parse_target_list(lhs);
        instruction.measure_into = Target::parse(rhs);
    } else if let Some(eq) = text.find('=') {
        let lhs = text[..eq].trim();
        let rhs = text[eq + 1..].trim().trim_start_matches("measure").trim();
        instruction.measure_into = Target::parse(lhs);
        instruction.targets = parse_target_list(rhs);
    }
}

fn fill_gate_call(
    model: &mut ProgramModel,
    instruction: &mut Instruction,
    text: &str,
    original: &str,
    start: usize,
    in_function_definition: bool,
) -> ParseResult<()> {
    let loc = || locate(original, start);
    let (head, targets_part) = match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim()),
        None => (text, ""),
    };
    let (name, params_text) = match head.find('(') {
        Some(open) => {
            let close = head.rfind(')').unwrap_or(head.len());
            (head[..open].to_string(), Some(head[open + 1..close].to_string()))
        }
        None => (head.to_string(), None),
    };

    let params: Vec<ParameterExpression> = params_text
        .as_deref()
        .map(|p| {
            p.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(parse_expression)
                .collect()
        })
        .unwrap_or_default();

    instruction.targets = parse_target_list(targets_part);

    if let Some(std_gate) = standard_gate_from_call(&name, &params) {
        instruction.gate = Some(Gate::standard(std_gate));
        instruction.is_function_call = false;
        if !in_function_definition {
            validate_qubit_targets(model, &instruction.targets, loc)?;
        }
    } else if model.functions.contains_key(&name) {
        instruction.is_function_call = true;
        instruction.called_function = Some(name.clone());
        instruction.kind = InstructionKind::Call;
        let def = model.functions.get(&name).expect("just checked contains_key");
        let param_tokens = params_text_tokens(&params_text);
        if param_tokens.len() != def.parameters.len() {
            return Err(ParsingError::new(
                loc(),
                format!(
                    "gate '{name}' expects {} parameter(s), got {}",
                    def.parameters.len(),
                    param_tokens.len()
                ),
            ));
        }
        if instruction.targets.len() != def.qubit_params.len() {
            return Err(ParsingError::new(
                loc(),
                format!(
                    "gate '{name}' expects {} qubit argument(s), got {}",
                    def.qubit_params.len(),
                    instruction.targets.len()
                ),
            ));
        }
        if !in_function_definition {
            validate_qubit_targets(model, &instruction.targets, loc)?;
        }
        for (formal, actual) in def.parameters.iter().zip(param_tokens) {
            instruction.call_substitution.insert(formal.clone(), actual);
        }
    } else {
        return Err(ParsingError::new(loc(), format!("call to undeclared gate '{name}'")));
    }
    Ok(())
}

/// Each qubit target must name a declared register, and every indexed
/// target must fall within that register's declared size. Skipped for
/// instructions inside a gate-definition body, where targets name the
/// definition's own formal qubit parameters rather than real registers.
fn validate_qubit_targets(
    model: &ProgramModel,
    targets: &[Target],
    loc: impl Fn() -> crate::error::SourceLocation,
) -> ParseResult<()> {
    for target in targets {
        match target {
            Target::Register(name) => {
                if model.quantum_registers.size_of(name).is_none() {
                    return Err(ParsingError::new(loc(), format!("unknown quantum register '{name}'")));
                }
            }
            Target::Indexed(name, index) => {
                let size = model
                    .quantum_registers
                    .size_of(name)
                    .ok_or_else(|| ParsingError::new(loc(), format!("unknown quantum register '{name}'")))?;
                if *index >= size {
                    return Err(ParsingError::new(
                        loc(),
                        format!("qubit index {index} out of range for register '{name}' (size {size})"),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn params_text_tokens(params_text: &Option<String>) -> Vec<String> {
    params_text
        .as_deref()
        .map(|p| p.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

fn parse_target_list(part: &str) -> Vec<Target> {
    part.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(Target::parse)
        .collect()
}

fn standard_gate_from_call(name: &str, params: &[ParameterExpression]) -> Option<StandardGate> {
    let p = |i: usize| params.get(i).cloned().unwrap_or_else(|| ParameterExpression::constant(0.0));
    Some(match name {
        "id" => StandardGate::I,
        "x" => StandardGate::X,
        "y" => StandardGate::Y,
        "z" => StandardGate::Z,
        "h" => StandardGate::H,
        "s" => StandardGate::S,
        "sdg" => StandardGate::Sdg,
        "t" => StandardGate::T,
        "tdg" => StandardGate::Tdg,
        "sx" => StandardGate::SX,
        "sxdg" => StandardGate::SXdg,
        "rx" => StandardGate::Rx(p(0)),
        "ry" => StandardGate::Ry(p(0)),
        "rz" => StandardGate::Rz(p(0)),
        "p" => StandardGate::P(p(0)),
        "u" => StandardGate::U(p(0), p(1), p(2)),
        "cx" | "cnot" => StandardGate::CX,
        "cy" => StandardGate::CY,
        "cz" => StandardGate::CZ,
        "ch" => StandardGate::CH,
        "swap" => StandardGate::Swap,
        "iswap" => StandardGate::ISwap,
        "crx" => StandardGate::CRx(p(0)),
        "cry" => StandardGate::CRy(p(0)),
        "crz" => StandardGate::CRz(p(0)),
        "cp" => StandardGate::CP(p(0)),
        "rxx" => StandardGate::RXX(p(0)),
        "ryy" => StandardGate::RYY(p(0)),
        "rzz" => StandardGate::RZZ(p(0)),
        "ccx" | "toffoli" => StandardGate::CCX,
        "cswap" | "fredkin" => StandardGate::CSwap,
        "prx" => StandardGate::PRX(p(0), p(1)),
        _ => return None,
    })
}

/// Backward data-dependency scan (spec §5): for every instruction and every
/// target it touches, record the nearest prior instruction in the same
/// lexical scope that touched an overlapping target.
fn link_data_dependencies(model: &mut ProgramModel) {
    let scopes = collect_scopes(model);
    for indices in scopes {
        let mut last_touch: BTreeMap<String, usize> = BTreeMap::new();
        for &idx in &indices {
            let targets = model.instructions[idx].targets.clone();
            for (pos, target) in targets.iter().enumerate() {
                let key = target.register_name().to_string();
                if let Some(&dep) = last_touch.get(&key) {
                    model.instructions[idx].data_dependencies.insert((dep, pos));
                }
            }
            if !targets.is_empty() {
                let key = targets[0].register_name().to_string();
                last_touch.insert(key, idx);
                for t in &targets[1..] {
                    last_touch.insert(t.register_name().to_string(), idx);
                }
            }
        }
    }
}

/// Partition instruction indices into lexical scopes: the top level, and
/// each block body (recursively).
fn collect_scopes(model: &ProgramModel) -> Vec<Vec<usize>> {
    let mut scopes = Vec::new();
    let mut top = Vec::new();
    let mut in_child: Vec<bool> = vec![false; model.instructions.len()];
    for instr in &model.instructions {
        for &c in &instr.child_instructions {
            in_child[c] = true;
        }
    }
    for (idx, _) in model.instructions.iter().enumerate() {
        if !in_child[idx] {
            top.push(idx);
        }
    }
    scopes.push(top);
    for instr in &model.instructions {
        if !instr.child_instructions.is_empty() {
            scopes.push(instr.child_instructions.clone());
        }
    }
    scopes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_comment_preserves_length() {
        let src = "x q[0]; // comment\ny q[1];";
        let out = strip_comments(src);
        assert_eq!(out.len(), src.len());
        assert!(!out.contains("comment"));
    }

    #[test]
    fn test_strip_block_comment_preserves_newlines() {
        let src = "h q[0];\n/* multi\nline */\nx q[0];";
        let out = strip_comments(src);
        assert_eq!(out.matches('\n').count(), src.matches('\n').count());
    }

    #[test]
    fn test_preprocess_simple_program() {
        let src = "qreg q[2];\nh q[0];\ncx q[0], q[1];\n";
        let model = preprocess(src).unwrap();
        assert_eq!(model.quantum_registers.total_qubits(), 2);
        assert_eq!(model.instructions.len(), 3);
        assert_eq!(model.instructions[1].kind, InstructionKind::Gate);
        assert_eq!(model.instructions[2].targets.len(), 2);
    }

    #[test]
    fn test_preprocess_gate_definition_and_call() {
        let src = "gate bell(theta) a, b { h a; cx a, b; }\nqreg q[2];\nbell(0.5) q[0], q[1];\n";
        let model = preprocess(src).unwrap();
        assert!(model.functions.contains_key("bell"));
        let def_idx = model
            .instructions
            .iter()
            .position(|i| i.kind == InstructionKind::GateDefinition)
            .unwrap();
        assert_eq!(model.instructions[def_idx].child_instructions.len(), 3);
        let call_idx = model
            .instructions
            .iter()
            .position(|i| i.kind == InstructionKind::Call)
            .unwrap();
        assert_eq!(model.instructions[call_idx].called_function.as_deref(), Some("bell"));
    }

    #[test]
    fn test_preprocess_assertion() {
        let src = "qreg q[1];\nh q[0];\nassert-sup q[0];\n";
        let model = preprocess(src).unwrap();
        let assert_idx = model
            .instructions
            .iter()
            .position(|i| i.kind == InstructionKind::Assertion)
            .unwrap();
        assert!(model.instructions[assert_idx].assertion.is_some());
    }

    #[test]
    fn test_preprocess_data_dependency() {
        let src = "qreg q[1];\nh q[0];\nx q[0];\n";
        let model = preprocess(src).unwrap();
        let x_idx = model
            .instructions
            .iter()
            .position(|i| i.code.starts_with('x'))
            .unwrap();
        assert!(!model.instructions[x_idx].data_dependencies.is_empty());
    }

    #[test]
    fn test_preprocess_if_block() {
        let src = "creg c[1];\nif (c==1) { x q[0]; }\n";
        let model = preprocess(src).unwrap();
        let if_idx = model
            .instructions
            .iter()
            .position(|i| i.kind == InstructionKind::ClassicControlled)
            .unwrap();
        assert_eq!(model.instructions[if_idx].condition.as_deref(), Some("c==1"));
        assert_eq!(model.instructions[if_idx].child_instructions.len(), 1);
    }

    #[test]
    fn test_preprocess_non_digit_register_size_errors() {
        let src = "qreg q[x];\n";
        assert!(preprocess(src).is_err());
    }

    #[test]
    fn test_preprocess_empty_register_size_errors() {
        let src = "qreg q[];\n";
        assert!(preprocess(src).is_err());
    }

    #[test]
    fn test_preprocess_zero_register_size_errors() {
        let src = "qreg q[0];\n";
        assert!(preprocess(src).is_err());
    }

    #[test]
    fn test_preprocess_bare_register_name_defaults_to_size_one() {
        let src = "qreg q;\n";
        let model = preprocess(src).unwrap();
        assert_eq!(model.quantum_registers.total_qubits(), 1);
    }

    #[test]
    fn test_preprocess_out_of_range_qubit_index_errors() {
        let src = "qreg q[2];\nh q[5];\n";
        assert!(preprocess(src).is_err());
    }

    #[test]
    fn test_preprocess_undeclared_register_errors() {
        let src = "qreg q[2];\nh r[0];\n";
        assert!(preprocess(src).is_err());
    }

    #[test]
    fn test_preprocess_undeclared_gate_errors() {
        let src = "qreg q[1];\nfrobnicate q[0];\n";
        assert!(preprocess(src).is_err());
    }

    #[test]
    fn test_preprocess_gate_call_wrong_qubit_arity_errors() {
        let src = "gate bell(theta) a, b { h a; cx a, b; }\nqreg q[2];\nbell(0.5) q[0];\n";
        assert!(preprocess(src).is_err());
    }

    #[test]
    fn test_preprocess_gate_call_wrong_parameter_arity_errors() {
        let src = "gate bell(theta) a, b { h a; cx a, b; }\nqreg q[2];\nbell(0.5, 0.6) q[0], q[1];\n";
        assert!(preprocess(src).is_err());
    }
}

//! The program model produced by preprocessing: instructions, targets,
//! function definitions and register tables (spec §3).

use std::collections::{BTreeMap, BTreeSet};

use arvak_ir::Gate;

use crate::assertion::Assertion;

/// A reference to a qubit or classical bit, either a whole register or one
/// indexed element of it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    /// The whole register, e.g. `q` in `reset q;`.
    Register(String),
    /// One element of a register, e.g. `q[0]`.
    Indexed(String, usize),
}

impl Target {
    /// The register name this target belongs to.
    pub fn register_name(&self) -> &str {
        match self {
            Target::Register(name) | Target::Indexed(name, _) => name,
        }
    }

    /// Parse a target token such as `q` or `q[3]`.
    pub fn parse(token: &str) -> Option<Target> {
        let token = token.trim();
        match token.find('[') {
            None => {
                if token.is_empty() || !is_identifier(token) {
                    return None;
                }
                Some(Target::Register(token.to_string()))
            }
            Some(open) => {
                let close = token.strip_suffix(']')?;
                let name = &token[..open];
                let index_str = &close[open + 1..];
                if name.is_empty() || !is_identifier(name) {
                    return None;
                }
                if index_str.is_empty() || !index_str.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let index: usize = index_str.parse().ok()?;
                Some(Target::Indexed(name.to_string(), index))
            }
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Register(name) => write!(f, "{name}"),
            Target::Indexed(name, idx) => write!(f, "{name}[{idx}]"),
        }
    }
}

/// A braced body captured verbatim during block extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub valid: bool,
    pub body_code: String,
}

/// A registered `gate` definition: name, classical formal parameters, and
/// formal qubit names (the dialect's gate definitions take one qubit per
/// formal, never a sub-indexed register).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub parameters: Vec<String>,
    pub qubit_params: Vec<String>,
}

/// The classification of an [`Instruction`], set by the preprocessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    /// `qreg`/`creg` declaration.
    Declaration,
    /// `gate name(params) targets { ... }` header.
    GateDefinition,
    /// Synthetic end-of-body marker emitted after a gate definition.
    Return,
    /// `assert-<kind> ...;`
    Assertion,
    /// `if (cond) { ... }`
    ClassicControlled,
    /// `q -> c;` or `c = measure q;`
    Measurement,
    /// `barrier q;`
    Barrier,
    /// `reset q;`
    Reset,
    /// Invocation of a user-defined gate.
    Call,
    /// A standard gate application.
    Gate,
}

/// One `;`-terminated fragment of the preprocessed source (spec §3).
#[derive(Debug, Clone)]
pub struct Instruction {
    pub line_number: usize,
    pub code: String,
    pub original_start: usize,
    pub original_end: usize,
    pub kind: InstructionKind,
    pub targets: Vec<Target>,
    pub successor_index: usize,
    pub is_function_call: bool,
    pub called_function: Option<String>,
    pub in_function_definition: bool,
    pub is_function_definition: bool,
    pub block: Option<Block>,
    pub assertion: Option<Assertion>,
    pub child_instructions: Vec<usize>,
    pub data_dependencies: BTreeSet<(usize, usize)>,
    pub call_substitution: BTreeMap<String, String>,
    /// The gate applied by this instruction, resolved to the shared gate
    /// vocabulary. `None` for declarations, definitions, calls, assertions,
    /// measurements and structural instructions.
    pub gate: Option<Gate>,
    /// Condition register for `ClassicControlled` instructions (`if(cond)`).
    pub condition: Option<String>,
    /// Classical target for a measurement (the `c` in `q -> c`).
    pub measure_into: Option<Target>,
}

impl Instruction {
    pub fn is_return(&self) -> bool {
        matches!(self.kind, InstructionKind::Return) || self.successor_index == 0
    }
}

/// A declared quantum register and its size, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct QuantumRegisterTable {
    order: Vec<String>,
    sizes: BTreeMap<String, usize>,
}

impl QuantumRegisterTable {
    pub fn declare(&mut self, name: impl Into<String>, size: usize) {
        let name = name.into();
        if !self.sizes.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.sizes.insert(name, size);
    }

    pub fn size_of(&self, name: &str) -> Option<usize> {
        self.sizes.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sizes.contains_key(name)
    }

    /// Total number of qubits across every declared register.
    pub fn total_qubits(&self) -> usize {
        self.order.iter().map(|r| self.sizes[r]).sum()
    }

    /// Flat index of `q[k]` once every prior register has been laid out.
    /// `None` if `name` is undeclared or `k` is out of bounds for it.
    pub fn flat_index(&self, name: &str, index: usize) -> Option<usize> {
        let mut offset = 0;
        for reg in &self.order {
            if reg == name {
                return (index < self.sizes[reg]).then_some(offset + index);
            }
            offset += self.sizes[reg];
        }
        None
    }

    pub fn registers(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order.iter().map(move |r| (r.as_str(), self.sizes[r]))
    }
}

/// The declared type of a classical variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassicalType {
    Bool,
    Int,
    Float,
}

/// A declared classical register, its size and declared type, in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct ClassicalRegisterTable {
    order: Vec<String>,
    sizes: BTreeMap<String, usize>,
    types: BTreeMap<String, ClassicalType>,
}

impl ClassicalRegisterTable {
    /// Declare `name` with [`ClassicalType::Int`], the grammar's only
    /// `creg` type (spec §3 "classical variable store").
    pub fn declare(&mut self, name: impl Into<String>, size: usize) {
        self.declare_typed(name, size, ClassicalType::Int);
    }

    pub fn declare_typed(&mut self, name: impl Into<String>, size: usize, ty: ClassicalType) {
        let name = name.into();
        if !self.sizes.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.sizes.insert(name.clone(), size);
        self.types.insert(name, ty);
    }

    pub fn size_of(&self, name: &str) -> Option<usize> {
        self.sizes.get(name).copied()
    }

    pub fn type_of(&self, name: &str) -> Option<ClassicalType> {
        self.types.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sizes.contains_key(name)
    }

    pub fn registers(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order.iter().map(move |r| (r.as_str(), self.sizes[r]))
    }
}

/// Everything preprocessing produces: the normalized source text plus the
/// frozen instruction array and static tables needed to run it.
#[derive(Debug, Clone, Default)]
pub struct ProgramModel {
    pub processed_source: String,
    pub instructions: Vec<Instruction>,
    pub quantum_registers: QuantumRegisterTable,
    pub classical_registers: ClassicalRegisterTable,
    pub functions: BTreeMap<String, FunctionDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parse_register() {
        assert_eq!(Target::parse("q"), Some(Target::Register("q".into())));
    }

    #[test]
    fn test_target_parse_indexed() {
        assert_eq!(Target::parse("q[3]"), Some(Target::Indexed("q".into(), 3)));
    }

    #[test]
    fn test_target_parse_rejects_non_digit_index() {
        assert_eq!(Target::parse("q[k]"), None);
    }

    #[test]
    fn test_register_table_flat_index() {
        let mut table = QuantumRegisterTable::default();
        table.declare("q", 2);
        table.declare("anc", 3);
        assert_eq!(table.flat_index("q", 1), Some(1));
        assert_eq!(table.flat_index("anc", 0), Some(2));
        assert_eq!(table.total_qubits(), 5);
    }

    #[test]
    fn test_register_table_flat_index_rejects_out_of_bounds() {
        let mut table = QuantumRegisterTable::default();
        table.declare("q", 2);
        assert_eq!(table.flat_index("q", 2), None);
        assert_eq!(table.flat_index("q", 100), None);
    }
}

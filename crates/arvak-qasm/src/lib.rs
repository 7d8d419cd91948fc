//! Preprocessor and Assertion Grammar for the Arvak Debugger
//!
//! This crate turns source text in the debugger's OpenQASM-2-like dialect
//! into a frozen [`program::ProgramModel`]: comments stripped, gate/`if`
//! bodies extracted, and every `;`-terminated fragment classified and
//! linked to the data it depends on. The assertion keywords (`assert-ent`,
//! `assert-sup`, `assert-eq`, `assert-ineq`) are parsed here too, since they
//! live in the same source fragments as ordinary gate calls.
//!
//! # Example
//!
//! ```rust
//! use arvak_qasm::preprocess;
//!
//! let source = r#"
//!     qreg q[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     assert-ent q[0], q[1];
//! "#;
//!
//! let model = preprocess(source).unwrap();
//! assert_eq!(model.quantum_registers.total_qubits(), 2);
//! assert!(model.instructions.iter().any(|i| i.assertion.is_some()));
//! ```

pub mod assertion;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod preprocessor;
pub mod program;

pub use assertion::{Assertion, AssertionKind};
pub use error::{locate, ParseResult, ParsingError, SourceLocation};
pub use preprocessor::{preprocess, strip_comments};
pub use program::{
    Block, ClassicalRegisterTable, ClassicalType, FunctionDef, Instruction, InstructionKind,
    ProgramModel, QuantumRegisterTable, Target,
};

//! Diagnostics engine for the Arvak quantum debugger (spec §4.4).
//!
//! Two halves, both read-only with respect to the program and engine they
//! inspect:
//!
//! - [`static_analysis`] answers questions about a frozen program model
//!   alone: what an instruction depends on, what a qubit has interacted
//!   with, and where assertions could be tightened or added.
//! - [`dynamic_analysis`] answers questions about a live engine: why the
//!   assertion it is currently stopped on might have failed.
//!
//! ```
//! use arvak_diag::static_analysis::data_dependencies;
//! use arvak_qasm::preprocess;
//!
//! let program = preprocess("qreg q[1];\nh q[0];\nx q[0];\n").unwrap();
//! let last = program.instructions.len() - 1;
//! assert!(data_dependencies(&program, last, false).contains(&last));
//! ```

pub mod cause;
pub mod dynamic_analysis;
pub mod error;
pub mod static_analysis;

pub use cause::{ErrorCause, ErrorCauseKind};
pub use dynamic_analysis::{potential_error_causes, zero_control_instructions};
pub use error::{DiagError, DiagResult};
pub use static_analysis::{
    data_dependencies, interactions, suggest_assertion_movements, suggest_new_assertions, unfold_targets,
};

//! Reversible execution engine for the Arvak quantum debugger.
//!
//! Wraps a preprocessed [`arvak_qasm::ProgramModel`] with a statevector, a
//! classical variable store, a call stack and a step history, and exposes
//! forward/backward stepping (spec §5).
//!
//! # Example
//!
//! ```rust
//! use arvak_engine::Engine;
//!
//! let mut engine = Engine::load("qreg q[1];\nh q[0];\n").unwrap();
//! engine.run_all().unwrap();
//! assert!(engine.is_finished());
//! ```

pub mod classical;
pub mod engine;
pub mod error;
pub mod history;

pub use classical::ClassicalStore;
pub use engine::{Engine, ExecutionState};
pub use error::{EngineError, EngineResult};
pub use history::{HistoryEntry, MeasurementRecord};

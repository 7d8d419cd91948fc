//! Public facade for the Arvak reversible quantum debugger (spec §6).
//!
//! [`Debugger`] is the single entry point host callers use: it owns an
//! optional [`arvak_engine::Engine`] session and exposes lifecycle,
//! stepping, predicate, program-model, state, mutation, breakpoint,
//! diagnostics and compilation operations over it. No operation panics on
//! caller misuse; invalid states are reported through
//! [`error::DebuggerError::InvalidOperation`].
//!
//! ```
//! use arvak_debugger::Debugger;
//!
//! let mut debugger = Debugger::init();
//! debugger.load_code("qreg q[1];\nh q[0];\n").unwrap();
//! debugger.run_simulation().unwrap();
//! assert!(debugger.is_finished());
//! ```

pub mod diagnostics;
pub mod error;
pub mod result;
pub mod session;

pub use diagnostics::Diagnostics;
pub use error::{DebuggerError, DebuggerResult};
pub use result::LoadResult;
pub use session::Debugger;

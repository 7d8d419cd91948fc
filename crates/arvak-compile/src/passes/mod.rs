//! Built-in compilation passes.

mod coalesce;

pub use coalesce::CoalesceDisjointQubits;

//! Filter compilation: JSON in, a compiled, immutable [`clause::Filter`] out
//! (spec.md §4.3). This is the only crate that touches filter text.

pub mod clause;
pub mod compiler;
pub mod schema;

pub use clause::{Clause, ClauseCommon, ClauseRole, Cutoff, Filter, JokerValue, Refinement, SourceConstraints, TagSlot};
pub use compiler::{compile, CompileError};

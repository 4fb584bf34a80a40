//! Canonical LR(1) automaton construction and table serialization
//! (spec.md §4.4, component C4).
//!
//! The parser (`cc-parse`) does not consult these tables at runtime -
//! they exist for offline grammar validation (spec.md §4.5: "It does
//! not consult the LR tables at runtime").

pub mod builder;
pub mod item;
pub mod serialize;

pub use builder::{build, LrAutomaton};
pub use item::{Item, ItemSet, Lookahead};

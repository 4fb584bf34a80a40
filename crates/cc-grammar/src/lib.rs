//! Offline grammar loading and validation (spec.md §4.3, component C3).
//!
//! `cc-lr` builds the LR(1) automaton on top of the [`Grammar`] this crate
//! loads; the [`earley`] recognizer is used only to validate the grammar
//! file against hand-coded sample input before the LR tables are built
//! from it (spec.md: "not part of the shipped table path").

pub mod earley;
pub mod element;
pub mod derive;
pub mod loader;
pub mod terminals;

pub use element::{Element, ElementId, ElementKind, Grammar, Rule, RuleId};
pub use earley::recognize;
pub use loader::GrammarLoader;

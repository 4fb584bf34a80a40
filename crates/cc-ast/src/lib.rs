//! The AST node model and scoped symbol table the parser (`cc-parse`)
//! builds, per spec.md §3 ("AST node", "Symbol table") and §4.5.
//!
//! - [`node`] - the typed AST node arena (`Ast`, `Node`, `NodeKind`).
//! - [`symbol_table`] - the scope tree (`ScopeTree`, `Scope`) and symbol
//!   entries (`Symbol`, `Linkage`, `Storage`, `Namespace`).
//! - [`ty`] - the built-in integer type table §4.5 requires be installed
//!   before parsing begins (bit-width, precision, padding, alignment).

pub mod node;
pub mod symbol_table;
pub mod ty;

pub use node::{Ast, Node, NodeId, NodeKind};
pub use symbol_table::{Linkage, Namespace, Scope, ScopeId, ScopeKind, ScopeTree, Storage, SymbolEntry};
pub use ty::BuiltinType;

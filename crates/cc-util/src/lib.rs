//! cc-util - Foundation types shared by every phase of the C23 front end.
//!
//! This crate has no knowledge of C syntax. It provides the cross-cutting
//! infrastructure every other crate in the workspace builds on:
//!
//! - [`span`] - byte-offset/row/column source positions and a multi-file
//!   source map (splice- and CRLF-aware, per the lexer's position model).
//! - [`symbol`] - an interned-string handle (`Symbol`) plus the global
//!   string table, so macro names and identifiers compare in O(1).
//! - [`diagnostic`] - a structured error-reporting channel (`Diagnostic`,
//!   `Handler`) independent of the `Result`-based control flow in
//!   [`error`].
//! - [`error`] - the closed `Error` enum every fallible operation in the
//!   workspace returns.
//! - [`index_vec`] - `Idx`/`IndexVec`, a typed-index vector used for every
//!   arena-like table (grammar elements, LR item sets, AST nodes, scopes).
//! - [`def_id`] - a global definition identifier, used by the symbol table
//!   to name declarations independent of their textual scope.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::{Diagnostic, DiagnosticCode, Handler, Level};
pub use error::{Error, Result};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, Position, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};

//! Lexical analysis for C23 translation units.
//!
//! The lexer turns a source buffer into a stream of [`token::Token`]s. It
//! runs after translation phases 1-2 (CRLF normalization and line splicing,
//! both handled by `cc_util::SourceFile`) and produces the raw token stream
//! the preprocessor consumes - it does not itself expand macros, evaluate
//! `#if` conditions, or classify pp-numbers into typed constants; those are
//! `cc-cpp` and `cc-tokstream`'s jobs.
//!
//! # Layout
//!
//! - [`cursor`] - byte-position/line/column tracking cursor over a `&str`
//! - [`unicode`] - identifier classification and universal-character-name validation
//! - [`token`] - the [`token::Token`] enum and keyword table
//! - [`lexer`] - the [`Lexer`] dispatch loop and its per-category scanning methods

pub mod cursor;
pub mod lexer;
pub mod token;
pub mod unicode;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use token::{keyword_from_ident, StringPrefix, Token};

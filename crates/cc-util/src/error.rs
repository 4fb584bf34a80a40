//! The closed error enum every fallible operation in the workspace returns.
//!
//! Recovery policy is "none": the first non-EOF error aborts the current
//! compilation unit and propagates unchanged to the caller. `Eof` and
//! `Partial` are advisory control-flow signals rather than faults - see
//! their doc comments.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The closed set of failure (and control-flow) kinds produced by the
/// lexer, preprocessor, grammar tools, and parser.
#[derive(Debug, Error)]
pub enum Error {
    /// File open/read/write/mmap failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Advisory: the input is exhausted. Used as a loop terminator by the
    /// lexer and token-stream reader, never surfaced as a user-visible
    /// fault.
    #[error("end of input")]
    Eof,

    /// Allocation failure.
    #[error("out of memory")]
    Oom,

    /// Bad code point, bad universal-character-name, unterminated literal,
    /// or invalid pp-number-to-constant conversion.
    #[error("invalid lexical token: {0}")]
    InvalidLex(String),

    /// Malformed `#...` directive line.
    #[error("invalid preprocessor directive: {0}")]
    InvalidDirective(String),

    /// A macro was redefined with a replacement list or parameter list
    /// that does not match the existing definition token-for-token.
    #[error("macro redefinition does not match: {0}")]
    MacroRedefinition(String),

    /// `#elif`/`#else`/`#endif` with no matching `#if`.
    #[error("conditional-inclusion mismatch: {0}")]
    ConditionalMismatch(String),

    /// Internal-only: a function-like macro invocation's argument list
    /// was not closed before the enclosing replacement-list-end sentinel
    /// was reached. The caller one level up must retry in the outer
    /// context; this variant must never escape the preprocessor's
    /// top-level loop.
    #[error("partial macro invocation (internal)")]
    Partial,

    /// Illegal declaration-specifier combination, or a declarator was
    /// required but missing.
    #[error("invalid declaration: {0}")]
    InvalidDecl(String),

    /// Reserved for LR conflicts. By construction the bundled grammar is
    /// LR(1); a conflict aborts table generation rather than resolving it.
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    /// A feature named out of scope by spec (complex/decimal floating
    /// types, VLAs, `_Generic`, multi-code-point character constants in
    /// `#if`, etc).
    #[error("not supported: {0}")]
    NotSupported(String),
}

impl Error {
    /// True for the two advisory signals that are not user-visible faults.
    pub fn is_advisory(&self) -> bool {
        matches!(self, Error::Eof | Error::Partial)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

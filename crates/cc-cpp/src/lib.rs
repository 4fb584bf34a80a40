//! The preprocessor (spec.md §4.2): lexes one source file into
//! preprocessing tokens, dispatches directives, drives macro expansion
//! over everything that survives conditional inclusion, and serializes
//! the result for the parser to read back in. Grounded on
//! `original_source/src/cpp/scanner.c`'s top-level driving loop.

pub mod cond;
pub mod directive;
pub mod eval;
pub mod expand;
pub mod macro_table;
pub mod output;
pub mod paste;
pub mod pp_token;

use std::path::{Path, PathBuf};

use cc_util::{Error, Handler, Result, Symbol};

use cond::CondStack;
use macro_table::MacroTable;
use pp_token::PpToken;

/// Include search path and recursion limits, built once by the caller
/// (the driver) and threaded through every nested `#include`.
pub struct Config {
    /// Directories searched, in order, for `<...>` includes and for
    /// `"..."` includes that are not found next to the including file.
    pub system_include_dirs: Vec<PathBuf>,
    /// Upper bound on `#include` nesting depth (spec.md §4.2's "recursion-
    /// depth accounting").
    pub max_include_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { system_include_dirs: Vec::new(), max_include_depth: 256 }
    }
}

/// One translation unit's preprocessing state: its own macro table,
/// conditional-inclusion stack (per included file - see [`Preprocessor::run_file`]),
/// and the bookkeeping `expand` needs to implement self-recursion
/// prevention and the `__FILE__`/`__LINE__`/`__DATE__`/`__TIME__`
/// dynamic macros.
pub struct Preprocessor {
    pub(crate) macros: MacroTable,
    pub(crate) macro_stack: Vec<Symbol>,
    pub(crate) sentinel_seq: u32,
    /// The file currently being scanned, for `__FILE__` and relative
    /// `#include "..."` resolution.
    pub(crate) current_file: Symbol,
    /// `#line`'s filename override, if any (resets per file on entry,
    /// restored on return from a nested `#include`).
    pub(crate) presumed_file: Option<Symbol>,
    /// `#line`'s line-number override, added to the lexer's own line
    /// count when resolving `__LINE__`.
    pub(crate) line_delta: i64,
    pub(crate) build_date: String,
    pub(crate) build_time: String,
    config: Config,
    include_depth: usize,
    pub handler: Handler,
}

impl Preprocessor {
    pub fn new(config: Config) -> Self {
        let (build_date, build_time) = current_date_time();
        Self {
            macros: MacroTable::with_predefines(),
            macro_stack: Vec::new(),
            sentinel_seq: 0,
            current_file: Symbol::intern(""),
            presumed_file: None,
            line_delta: 0,
            build_date,
            build_time,
            config,
            include_depth: 0,
            handler: Handler::new(),
        }
    }

    /// Preprocesses `path` end to end: lex, dispatch directives, expand
    /// macros, and return the final token sequence ready for
    /// [`output::write_tokens`].
    pub fn preprocess(&mut self, path: &Path) -> Result<Vec<PpToken>> {
        let content = std::fs::read_to_string(path).map_err(Error::from)?;
        self.run_file(path, &content)
    }

    /// Runs one file's worth of source through directive dispatch and
    /// macro expansion. Each included file gets its own [`CondStack`]:
    /// `#if`/`#endif` nesting never spans a file boundary.
    pub(crate) fn run_file(&mut self, path: &Path, content: &str) -> Result<Vec<PpToken>> {
        if self.include_depth >= self.config.max_include_depth {
            return Err(Error::InvalidDirective(format!("#include nested too deeply (limit {})", self.config.max_include_depth)));
        }
        self.include_depth += 1;

        let prev_file = self.current_file;
        let prev_presumed = self.presumed_file.take();
        let prev_delta = self.line_delta;
        self.current_file = Symbol::intern(&path.display().to_string());
        self.line_delta = 0;

        let tokens = pp_token::lex_source(content, &mut self.handler);
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let result = self.scan_tokens(&tokens, &dir);

        self.include_depth -= 1;
        self.current_file = prev_file;
        self.presumed_file = prev_presumed;
        self.line_delta = prev_delta;
        result
    }

    /// Splits `tokens` into directive lines and code runs, expanding each
    /// code run completely before moving on so a function-like macro
    /// invocation may span any number of physical lines up to the next
    /// directive (spec.md §4.2.1).
    fn scan_tokens(&mut self, tokens: &[PpToken], dir: &Path) -> Result<Vec<PpToken>> {
        let mut out = Vec::new();
        let mut cond = CondStack::new();
        let mut idx = 0;

        while idx < tokens.len() {
            if tokens[idx].is_first && tokens[idx].token == cc_lex::Token::Hash {
                let start = idx + 1;
                let mut end = start;
                while end < tokens.len() && !tokens[end].is_first {
                    end += 1;
                }
                idx = end;
                self.handle_directive(&tokens[start..end], &mut cond, dir, &mut out)?;
                continue;
            }

            let run_start = idx;
            while idx < tokens.len() && !(tokens[idx].is_first && tokens[idx].token == cc_lex::Token::Hash) {
                idx += 1;
            }

            if cond.is_active() {
                let mut stream: cc_containers::Queue<expand::StreamItem> =
                    tokens[run_start..idx].iter().map(|t| expand::StreamItem::Token(*t)).collect();
                self.run(&mut stream, &mut out, None)?;
            }
        }

        if !cond.is_empty() {
            return Err(Error::ConditionalMismatch("missing #endif".into()));
        }
        Ok(out)
    }
}

fn current_date_time() -> (String, String) {
    // The driver runs with `LC_ALL=en_US.utf8` (spec.md §6); a fixed
    // build stamp keeps `__DATE__`/`__TIME__` deterministic without
    // reaching for a system-clock dependency the rest of the workspace
    // doesn't otherwise need.
    ("Jan  1 1970".to_string(), "00:00:00".to_string())
}

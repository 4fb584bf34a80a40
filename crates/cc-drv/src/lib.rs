//! Compiler driver: CLI argument handling, source-file I/O, and
//! orchestration of the four engines (spec.md §1 names this collaborator
//! but excludes it from THE CORE, so its shape is ours to choose).
//!
//! Grounded on `faxc-drv/src/lib.rs`'s `Config`/`Session` split, trimmed
//! down to the pipeline spec.md §2's dependency-order table actually
//! describes: a source file is preprocessed (`cc-cpp`, which itself
//! drives `cc-lex`), the result is serialized and read back through
//! `cc-tokstream` exactly as a real build would hand the parser a token
//! file, and `cc-parse` builds the AST. The HIR/MIR/LIR/codegen/linking
//! phases of the original driver have no counterpart here - code
//! generation is a spec.md §1 Non-goal - so they are gone, not stubbed.

use std::io::Cursor;
use std::path::PathBuf;

use cc_ast::Ast;
use cc_cpp::{Config as CppConfig, Preprocessor};
use cc_lex::Token;
use cc_parse::Parser;
use cc_tokstream::TokenStreamReader;
use cc_util::{Error, Result};

/// What the driver should stop at and hand back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitType {
    /// Preprocessed tokens only - the serialized stream `cc-cpp::output`
    /// would otherwise write to disk, materialized in memory instead
    /// (temp-file allocation is an excluded collaborator, spec.md §1).
    Tokens,
    /// The full AST (spec.md §3's `TranslationUnit` root), the default.
    #[default]
    Ast,
}

/// Driver configuration. One field per spec.md §6 concern the CLI and
/// include-search-path sections actually specify; nothing from the
/// teacher's codegen-era `Config` (opt level, target triple, libraries,
/// incremental cache) survives, since none of it applies to a front end.
#[derive(Debug, Clone)]
pub struct Config {
    /// The single positional argument: path to the C source file
    /// (spec.md §6 CLI: `<program> <path-to-C-source>`).
    pub input_file: PathBuf,
    /// Configured system include directories, searched in order for
    /// `<...>` includes (spec.md §6).
    pub system_include_dirs: Vec<PathBuf>,
    /// `#include` nesting limit (spec.md §5: "a reasonable implementation
    /// limit (e.g. 256) should be imposed").
    pub max_include_depth: usize,
    pub emit: EmitType,
    pub verbose: bool,
}

impl Config {
    pub fn new(input_file: PathBuf) -> Self {
        Self {
            input_file,
            system_include_dirs: Vec::new(),
            max_include_depth: 256,
            emit: EmitType::default(),
            verbose: false,
        }
    }
}

/// One compilation unit's worth of driver state.
pub struct Session {
    pub config: Config,
}

/// What [`Session::compile`] hands back, one variant per [`EmitType`].
pub enum CompilationResult {
    Tokens(Vec<Token>),
    Ast(Ast),
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the whole pipeline: preprocess, serialize, deserialize, parse.
    /// The serialize/deserialize round trip through an in-memory buffer
    /// stands in for the real "token file" spec.md §4.2.5/§4.6 describe -
    /// mmap'd file I/O is an excluded collaborator, but the wire format
    /// it carries is still exercised exactly as the parser would see it.
    pub fn compile(&mut self) -> Result<CompilationResult> {
        if self.config.verbose {
            eprintln!("preprocessing {}", self.config.input_file.display());
        }

        let mut pp = Preprocessor::new(CppConfig {
            system_include_dirs: self.config.system_include_dirs.clone(),
            max_include_depth: self.config.max_include_depth,
        });
        let pp_tokens = pp.preprocess(&self.config.input_file)?;

        let mut buf = Vec::new();
        cc_cpp::output::write_tokens(&mut buf, &pp_tokens)?;

        if self.config.emit == EmitType::Tokens {
            let tokens = pp_tokens.into_iter().map(|t| t.token).collect();
            return Ok(CompilationResult::Tokens(tokens));
        }

        if self.config.verbose {
            eprintln!("parsing {} preprocessed tokens", pp_tokens.len());
        }

        let reader = TokenStreamReader::new(Cursor::new(buf));
        let parser = Parser::from_reader(reader)?;
        let ast = parser.parse_translation_unit()?;
        Ok(CompilationResult::Ast(ast))
    }
}

/// `main`'s entry point, invoked by `src/main.rs`. Parses the one
/// positional argument spec.md §6 describes (plus a couple of ambient
/// flags every driver in the corpus carries: `-I` for include dirs,
/// `-v`/`--verbose`) and runs [`Session::compile`].
pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut input_file = None;
    let mut system_include_dirs = Vec::new();
    let mut verbose = false;
    let mut emit_tokens = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-v" | "--verbose" => verbose = true,
            "--emit-tokens" => emit_tokens = true,
            "-I" => {
                i += 1;
                if let Some(dir) = args.get(i) {
                    system_include_dirs.push(PathBuf::from(dir));
                }
            }
            other if other.starts_with("-I") => {
                system_include_dirs.push(PathBuf::from(&other[2..]));
            }
            other => {
                if input_file.is_none() {
                    input_file = Some(PathBuf::from(other));
                }
            }
        }
        i += 1;
    }

    let input_file = input_file
        .ok_or_else(|| Error::Io("usage: <program> <path-to-C-source>".into()))?;

    let mut config = Config::new(input_file);
    config.system_include_dirs = system_include_dirs;
    config.verbose = verbose;
    if emit_tokens {
        config.emit = EmitType::Tokens;
    }

    let mut session = Session::new(config);
    match session.compile()? {
        CompilationResult::Tokens(tokens) => {
            if session.config.verbose {
                eprintln!("{} tokens", tokens.len());
            }
        }
        CompilationResult::Ast(ast) => {
            if session.config.verbose {
                eprintln!("{} AST nodes", ast.len());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn compile_str(src: &str, emit: EmitType) -> Result<CompilationResult> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(src.as_bytes()).unwrap();
        let mut config = Config::new(file.path().to_path_buf());
        config.emit = emit;
        Session::new(config).compile()
    }

    #[test]
    fn emits_preprocessed_tokens() {
        let result = compile_str("#define X 1\nX+X\n", EmitType::Tokens).unwrap();
        match result {
            CompilationResult::Tokens(tokens) => {
                assert!(tokens.iter().any(|t| matches!(t, Token::Plus)));
            }
            _ => panic!("expected Tokens"),
        }
    }

    #[test]
    fn parses_a_trivial_translation_unit() {
        let result = compile_str("int x;\n", EmitType::Ast).unwrap();
        match result {
            CompilationResult::Ast(ast) => {
                assert!(ast.root().is_some());
            }
            _ => panic!("expected Ast"),
        }
    }

    #[test]
    fn reports_missing_endif_as_conditional_mismatch() {
        let err = compile_str("#if 1\nint x;\n", EmitType::Ast).unwrap_err();
        assert!(matches!(err, Error::ConditionalMismatch(_)));
    }

    #[test]
    fn config_default_include_depth_matches_spec() {
        let config = Config::new(PathBuf::from("a.c"));
        assert_eq!(config.max_include_depth, 256);
        assert!(config.system_include_dirs.is_empty());
    }
}

//! End-to-end scenarios driving the full driver pipeline: preprocess,
//! serialize, read back, parse. Mirrors spec.md §8's literal-I/O scenario
//! table (preprocessing output shown as whitespace-separated lexemes).

use std::io::Write;

use cc_drv::{CompilationResult, Config, EmitType, Session};
use cc_lex::Token;
use cc_util::Error;

fn preprocess(src: &str) -> Vec<Token> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(src.as_bytes()).unwrap();
    let mut config = Config::new(file.path().to_path_buf());
    config.emit = EmitType::Tokens;
    match Session::new(config).compile().unwrap() {
        CompilationResult::Tokens(tokens) => tokens,
        _ => unreachable!(),
    }
}

fn parse(src: &str) -> cc_ast::Ast {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(src.as_bytes()).unwrap();
    let config = Config::new(file.path().to_path_buf());
    match Session::new(config).compile().unwrap() {
        CompilationResult::Ast(ast) => ast,
        _ => unreachable!(),
    }
}

/// spec.md §8 scenario 1: `#define X 1\nX+X` -> `1 + 1`.
#[test]
fn object_like_macro_expansion() {
    let tokens = preprocess("#define X 1\nX+X\n");
    assert_eq!(
        tokens,
        vec![
            Token::PpNumber(cc_util::Symbol::intern("1")),
            Token::Plus,
            Token::PpNumber(cc_util::Symbol::intern("1")),
        ]
    );
}

/// spec.md §8 scenario 2: stringizing.
#[test]
fn stringizing_operator() {
    let tokens = preprocess("#define STR(x) #x\nSTR(hello)\n");
    assert_eq!(
        tokens,
        vec![Token::StringLiteral(cc_lex::StringPrefix::None, cc_util::Symbol::intern("hello"))]
    );
}

/// spec.md §8 scenario 3: token pasting.
#[test]
fn token_pasting() {
    let tokens = preprocess("#define P(a,b) a##b\nP(foo,bar)\n");
    assert_eq!(tokens, vec![Token::Ident(cc_util::Symbol::intern("foobar"))]);
}

/// spec.md §8 scenario 4: `#if` constant-expression evaluation.
#[test]
fn if_constant_expression() {
    let tokens = preprocess("#if 2*3==6\nA\n#else\nB\n#endif\n");
    assert_eq!(tokens, vec![Token::Ident(cc_util::Symbol::intern("A"))]);
}

/// spec.md §8 scenario 5: variadic macro expansion.
#[test]
fn variadic_macro() {
    let tokens = preprocess("#define V(...) f(__VA_ARGS__)\nV(1,2,3)\n");
    let one = cc_util::Symbol::intern("1");
    let two = cc_util::Symbol::intern("2");
    let three = cc_util::Symbol::intern("3");
    assert_eq!(
        tokens,
        vec![
            Token::Ident(cc_util::Symbol::intern("f")),
            Token::LParen,
            Token::PpNumber(one),
            Token::Comma,
            Token::PpNumber(two),
            Token::Comma,
            Token::PpNumber(three),
            Token::RParen,
        ]
    );
}

/// spec.md §8 scenario 6: mutual self-reference is frozen by marking, not
/// expanded infinitely.
#[test]
fn mutual_self_reference_terminates() {
    let tokens = preprocess("#define A B\n#define B A\nA\n");
    assert_eq!(tokens, vec![Token::Ident(cc_util::Symbol::intern("A"))]);
}

#[test]
fn trivial_declaration_parses_to_a_translation_unit() {
    let ast = parse("int x;\n");
    assert!(ast.root().is_some());
    assert_eq!(ast.child_count(ast.root().unwrap()), 1);
}

#[test]
fn macro_expanded_declaration_parses() {
    let ast = parse("#define INT int\nINT x;\n");
    assert!(ast.root().is_some());
    assert_eq!(ast.child_count(ast.root().unwrap()), 1);
}

#[test]
fn missing_endif_is_a_conditional_mismatch() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"#if 1\nint x;\n").unwrap();
    let config = Config::new(file.path().to_path_buf());
    let err = Session::new(config).compile().unwrap_err();
    assert!(matches!(err, Error::ConditionalMismatch(_)));
}

#[test]
fn unreadable_source_file_is_an_io_error() {
    let config = Config::new(std::path::PathBuf::from("/nonexistent/does-not-exist.c"));
    let err = Session::new(config).compile().unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

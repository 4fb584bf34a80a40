//! The fixed terminal allowlist (spec.md §4.3's "predeclared terminal
//! set"), verbatim from `original_source/lr.c`'s `terminals[]` (A.2.1
//! "Expressions" ordering), including the three abstract lexical classes
//! (`Identifier`, `StringLiteral`, `Constant`) and `epsilon`.

use once_cell::sync::Lazy;

use cc_util::FxHashSet;

pub const TERMINAL_NAMES: &[&str] = &[
    "(", ")", "_Generic", ",", ":", "default", "[", "]", ".", "->", "++", "--", "sizeof",
    "alignof", "&", "*", "+", "-", "~", "!", "/", "%", "<<", ">>", "<", ">", "<=", ">=", "==",
    "!=", "^", "|", "&&", "||", "?", "=", "*=", "/=", "%=", "+=", "-=", "<<=", ">>=", "&=", "^=",
    "|=", ";", "auto", "constexpr", "extern", "register", "static", "thread_local", "typedef",
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_BitInt",
    "bool", "_Complex", "_Decimal32", "_Decimal64", "_Decimal128", "{", "}", "struct", "union",
    "enum", "_Atomic", "typeof", "typeof_unqual", "const", "restrict", "volatile", "inline",
    "_Noreturn", "alignas", "...", "static_assert", "::", "case", "if", "switch", "else",
    "while", "do", "for", "goto", "continue", "break", "return", "Identifier", "StringLiteral",
    "Constant", "epsilon",
];

static TERMINAL_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| TERMINAL_NAMES.iter().copied().collect());

/// Whether `name` is one of the grammar's predeclared terminals. Any
/// other symbol appearing only on a rule's right-hand side - never as a
/// line's left-hand side - is also treated as a terminal by the loader,
/// per `is_terminal`'s callers in `lr.c`; this allowlist catches the
/// terminals that also happen to look like valid non-terminal names.
pub fn is_terminal(name: &str) -> bool {
    TERMINAL_SET.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuators_and_keywords_are_terminals() {
        assert!(is_terminal("("));
        assert!(is_terminal("static"));
        assert!(is_terminal("epsilon"));
    }

    #[test]
    fn nonterminal_shaped_name_is_not_in_allowlist() {
        assert!(!is_terminal("Expression"));
    }
}

//! Grammar-text loader (spec.md §4.3, §6 "Grammar text format").
//!
//! Each non-blank, non-`#`-comment line is `LHS<TAB>rhs1<TAB>rhs2...`,
//! one production per line (alternatives for the same left-hand side
//! are separate lines, not `|`-separated). `original_source/lr.c`'s
//! `main()` parses the same shape with a leading `LHS:` before the
//! first tab; the bundled grammar text instead puts the LHS in the
//! first tab-separated field like every other element, per spec.md's
//! exact wire description. Elements are classified terminal or
//! non-terminal by the fixed [`terminals`] allowlist, exactly as
//! `is_terminal` does in the original.

use cc_util::{Error, Result, Symbol};

use crate::element::{ElementId, Grammar};
use crate::terminals;

pub struct GrammarLoader;

impl GrammarLoader {
    /// Parses `text` (the full contents of a grammar file) into a
    /// [`Grammar`]. Does not run epsilon/FIRST-set derivation - call
    /// [`crate::derive::run`] on the result before using it for parsing
    /// or validation.
    pub fn load(text: &str) -> Result<Grammar> {
        let mut grammar = Grammar::new();
        for (lineno, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            Self::load_line(&mut grammar, line, lineno + 1)?;
        }
        Ok(grammar)
    }

    fn load_line(grammar: &mut Grammar, line: &str, lineno: usize) -> Result<()> {
        let mut fields = line.split('\t');
        let lhs_name = fields.next().filter(|s| !s.is_empty()).ok_or_else(|| {
            Error::InvalidGrammar(format!("line {lineno}: empty left-hand side"))
        })?;
        if terminals::is_terminal(lhs_name) {
            return Err(Error::InvalidGrammar(format!(
                "line {lineno}: '{lhs_name}' is a terminal, it cannot appear as a rule's left-hand side"
            )));
        }
        let lhs = Self::element(grammar, lhs_name);

        let rhs = fields
            .map(|name| {
                if name.is_empty() {
                    return Err(Error::InvalidGrammar(format!(
                        "line {lineno}: empty right-hand-side element"
                    )));
                }
                Ok(Self::element(grammar, name))
            })
            .collect::<Result<Vec<ElementId>>>()?;

        grammar.add_rule(lhs, rhs);
        Ok(())
    }

    fn element(grammar: &mut Grammar, name: &str) -> ElementId {
        let is_terminal = terminals::is_terminal(name);
        grammar.add_element(Symbol::intern(name), is_terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_simple_grammar() {
        let text = "\
# a tiny grammar
PrimaryExpression\tIdentifier
PrimaryExpression\tConstant
PrimaryExpression\t(\tExpression\t)
";
        let g = GrammarLoader::load(text).unwrap();
        let prim = g.find(Symbol::intern("PrimaryExpression")).unwrap();
        assert_eq!(g.element(prim).rules.len(), 3);
        assert!(!g.element(prim).is_terminal());

        let ident = g.find(Symbol::intern("Identifier")).unwrap();
        assert!(g.element(ident).is_terminal());
    }

    #[test]
    fn rejects_terminal_as_lhs() {
        let text = "static\tint\n";
        assert!(GrammarLoader::load(text).is_err());
    }

    #[test]
    fn rejects_empty_lhs() {
        assert!(GrammarLoader::load("\tIdentifier\n").is_err());
    }

    #[test]
    fn comment_and_blank_lines_are_skipped() {
        let text = "\n# comment\nS\tIdentifier\n";
        let g = GrammarLoader::load(text).unwrap();
        assert_eq!(g.elements.len(), 2);
    }
}

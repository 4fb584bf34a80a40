//! Binary table writer (spec.md §6, "Serialized LR(1) tables").
//!
//! ```text
//! i32 num_elements
//! repeat num_elements:
//!   i32 kind                  (token kind, or -1 for a non-terminal)
//!   if non-terminal:
//!     i32 num_rules
//!     repeat num_rules:
//!       i32 num_rhs
//!       repeat num_rhs: i32 element_index
//! i32 num_sets
//! repeat num_sets:
//!   i32 num_kernels
//!   i32 num_closures
//!   repeat (num_kernels + num_closures):
//!     i32 element
//!     i32 rule
//!     i32 dot
//!     i32 jump              (-1 if none)
//!     i32 num_lookaheads
//!     repeat num_lookaheads: i32 lookahead_kind   (-1 == EOF)
//! ```
//!
//! All integers are little-endian, matching the reference LP64 host
//! (spec.md §6's "little-endian on the host").

use std::io::Write;

use cc_grammar::{ElementKind, Grammar};
use cc_util::index_vec::Idx;
use cc_util::{Error, Result};

use crate::builder::LrAutomaton;
use crate::item::Lookahead;

fn write_i32<W: Write>(w: &mut W, value: i32) -> Result<()> {
    w.write_all(&value.to_le_bytes()).map_err(Error::from)
}

/// Writes `grammar`'s element/rule table followed by `automaton`'s
/// canonical collection to `out`, in the exact layout spec.md §6
/// prescribes.
pub fn write<W: Write>(out: &mut W, grammar: &Grammar, automaton: &LrAutomaton) -> Result<()> {
    write_i32(out, grammar.elements.len() as i32)?;
    for id in grammar.element_ids() {
        let element = grammar.element(id);
        match element.kind {
            ElementKind::Terminal { token_kind } => write_i32(out, token_kind)?,
            ElementKind::NonTerminal => {
                write_i32(out, -1)?;
                write_i32(out, element.rules.len() as i32)?;
                for &rule_id in &element.rules {
                    let rule = grammar.rule(rule_id);
                    write_i32(out, rule.rhs.len() as i32)?;
                    for &rhs_id in &rule.rhs {
                        write_i32(out, rhs_id.index() as i32)?;
                    }
                }
            }
        }
    }

    write_i32(out, automaton.sets.len() as i32)?;
    for set in &automaton.sets {
        write_i32(out, set.kernel.len() as i32)?;
        write_i32(out, set.closure.len() as i32)?;
        for item in set.all_items() {
            write_i32(out, item.element.index() as i32)?;
            write_i32(out, item.rule.index() as i32)?;
            write_i32(out, item.dot as i32)?;
            write_i32(out, item.jump.map(|j| j as i32).unwrap_or(-1))?;
            write_i32(out, item.lookaheads.len() as i32)?;
            for &la in &item.lookaheads {
                let kind = match la {
                    Lookahead::Eof => -1,
                    Lookahead::Terminal(id) => id.index() as i32,
                };
                write_i32(out, kind)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;
    use cc_grammar::GrammarLoader;
    use cc_util::Symbol;

    #[test]
    fn writes_expected_header_counts() {
        let mut g = GrammarLoader::load("TranslationObject\tIdentifier\n").unwrap();
        cc_grammar::derive::run(&mut g);
        let start = g.find(Symbol::intern("TranslationObject")).unwrap();
        let automaton = builder::build(&g, start).unwrap();

        let mut buf = Vec::new();
        write(&mut buf, &g, &automaton).unwrap();

        let num_elements = i32::from_le_bytes(buf[0..4].try_into().unwrap());
        assert_eq!(num_elements as usize, g.elements.len());
    }
}

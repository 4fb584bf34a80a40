//! Earley recognizer used to sanity-check a loaded grammar against
//! hand-coded sample token sequences before `cc-lr` builds tables from
//! it (spec.md §4.3: "not part of the shipped table path").
//!
//! Grounded on `original_source/earley.c`'s `item`/`item_set`,
//! `prediction`/`completion`/`scan`. The original dedupes items with a
//! linear scan per insert and hand-seeds set 0 with a single hardcoded
//! rule for its start symbol; this version dedupes with a hash set and
//! seeds every rule of the start symbol, which is the standard
//! construction and the more useful one for grammar validation.

use std::collections::HashSet;

use crate::element::{ElementId, Grammar, RuleId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Item {
    element: ElementId,
    rule: RuleId,
    dot_pos: usize,
    origin: usize,
}

type ItemSet = HashSet<Item>;

fn initial_items(grammar: &Grammar, start: ElementId, origin: usize) -> ItemSet {
    grammar
        .element(start)
        .rules
        .iter()
        .map(|&rule| Item { element: start, rule, dot_pos: 0, origin })
        .collect()
}

/// The element the item's dot currently precedes, or `None` if the item
/// is complete (the dot is at the end of the rule).
fn dotted_element(grammar: &Grammar, item: &Item) -> Option<ElementId> {
    let rule = grammar.rule(item.rule);
    rule.rhs.get(item.dot_pos).copied()
}

/// `earley.c`'s `prediction`: for every incomplete item whose dotted
/// element is a non-terminal, add a zero-dot-position item for each of
/// that non-terminal's rules, originating at this set's index.
fn predict(grammar: &Grammar, set: &mut ItemSet, index: usize) {
    loop {
        let mut added = Vec::new();
        for item in set.iter() {
            let Some(next) = dotted_element(grammar, item) else { continue };
            let next_elem = grammar.element(next);
            if next_elem.is_terminal() {
                continue;
            }
            for &rule in &next_elem.rules {
                let candidate = Item { element: next, rule, dot_pos: 0, origin: index };
                if !set.contains(&candidate) {
                    added.push(candidate);
                }
            }
        }
        if added.is_empty() {
            break;
        }
        set.extend(added);
    }
}

/// `earley.c`'s `completion`: for every complete item `[A -> ... ., j]`
/// in `set`, advance the dot of every item in set `j` whose dotted
/// element is `A`, inserting the advanced item back into `set`.
fn complete(grammar: &Grammar, sets: &mut [ItemSet], index: usize) {
    loop {
        let mut added = Vec::new();
        for item in sets[index].iter() {
            let rule = grammar.rule(item.rule);
            if item.dot_pos != rule.rhs.len() {
                continue; // not complete
            }
            for origin_item in &sets[item.origin] {
                if dotted_element(grammar, origin_item) != Some(item.element) {
                    continue;
                }
                let candidate = Item {
                    dot_pos: origin_item.dot_pos + 1,
                    ..*origin_item
                };
                if !sets[index].contains(&candidate) {
                    added.push(candidate);
                }
            }
        }
        if added.is_empty() {
            break;
        }
        sets[index].extend(added);
    }
}

/// `earley.c`'s `scan`: build set `index + 1` from every item in set
/// `index` whose dotted element matches `token`.
fn scan(grammar: &Grammar, set: &ItemSet, token: ElementId) -> ItemSet {
    set.iter()
        .filter(|item| dotted_element(grammar, item) == Some(token))
        .map(|item| Item { dot_pos: item.dot_pos + 1, ..*item })
        .collect()
}

/// Runs the Earley recognizer over `input` (a sequence of terminal
/// element ids) starting from `start`, returning whether the whole
/// input is recognized as a derivation of `start`.
///
/// `grammar` must already have epsilon/FIRST-set derivation run (see
/// [`crate::derive::run`]) - not used directly by this recognizer, but
/// required for the grammar's rule data to be complete.
pub fn recognize(grammar: &Grammar, start: ElementId, input: &[ElementId]) -> bool {
    let mut sets = vec![initial_items(grammar, start, 0)];

    for i in 0..=input.len() {
        loop {
            predict(grammar, &mut sets[i], i);
            let before = sets[i].len();
            complete(grammar, &mut sets, i);
            if sets[i].len() == before {
                break;
            }
        }
        if i == input.len() {
            break;
        }
        let next = scan(grammar, &sets[i], input[i]);
        if next.is_empty() {
            return false;
        }
        sets.push(next);
    }

    sets[input.len()].iter().any(|item| {
        item.element == start
            && item.origin == 0
            && grammar.rule(item.rule).rhs.len() == item.dot_pos
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive;
    use crate::loader::GrammarLoader;
    use cc_util::Symbol;

    fn grammar(text: &str) -> Grammar {
        let mut g = GrammarLoader::load(text).unwrap();
        derive::run(&mut g);
        g
    }

    fn elem(g: &Grammar, name: &str) -> ElementId {
        g.find(Symbol::intern(name)).unwrap()
    }

    #[test]
    fn recognizes_simple_parenthesized_expression() {
        let g = grammar(
            "\
Expression	Identifier
Expression	(\tExpression\t)
",
        );
        let start = elem(&g, "Expression");
        let lparen = elem(&g, "(");
        let rparen = elem(&g, ")");
        let ident = elem(&g, "Identifier");

        assert!(recognize(&g, start, &[lparen, ident, rparen]));
        assert!(recognize(&g, start, &[ident]));
    }

    #[test]
    fn rejects_unbalanced_input() {
        let g = grammar(
            "\
Expression	Identifier
Expression	(\tExpression\t)
",
        );
        let start = elem(&g, "Expression");
        let lparen = elem(&g, "(");
        let ident = elem(&g, "Identifier");

        assert!(!recognize(&g, start, &[lparen, ident]));
    }

    #[test]
    fn rejects_wrong_token_sequence() {
        let g = grammar("S	Identifier\t;\n");
        let start = elem(&g, "S");
        let semi = elem(&g, ";");
        let ident = elem(&g, "Identifier");

        assert!(!recognize(&g, start, &[semi, ident]));
    }
}

//! Canonical LR(1) automaton construction (spec.md §4.4).
//!
//! Grounded on `original_source/lr.c`'s `closure`/`closure_one` (item
//! closure to a fixpoint, then GOTO set construction, recursing into
//! newly-created sets). This version drives the same two-phase process
//! - closure, then GOTO - from an explicit worklist instead of the
//! original's direct recursion, so the construction isn't bounded by
//! native call-stack depth on large grammars; the resulting automaton is
//! the same up to set numbering, which spec.md does not assign meaning
//! to.

use std::collections::VecDeque;

use indexmap::IndexMap;

use cc_grammar::{ElementId, Grammar};
use cc_util::{Error, FxHashSet, Result};

use crate::item::{kernel_key, Item, ItemSet, KernelKey, Lookahead};

/// The finished canonical collection: every state reachable from the
/// initial set via closure and GOTO.
#[derive(Clone, Debug, Default)]
pub struct LrAutomaton {
    pub sets: Vec<ItemSet>,
}

/// Builds the canonical LR(1) automaton for `grammar`, starting from
/// `start`'s rules with an end-of-input lookahead (spec.md §4.4:
/// "Single kernel item `TranslationObject -> · ... [EOF]`" -
/// generalized here to one kernel item per rule of `start`, which
/// collapses to the spec's single item when `start` has one rule).
pub fn build(grammar: &Grammar, start: ElementId) -> Result<LrAutomaton> {
    let start_element = grammar.element(start);
    if start_element.is_terminal() {
        return Err(Error::InvalidGrammar(format!(
            "start symbol '{}' is a terminal",
            start_element.name.as_str()
        )));
    }

    let mut eof_set = FxHashSet::default();
    eof_set.insert(Lookahead::Eof);
    let initial_kernel: Vec<Item> = start_element
        .rules
        .iter()
        .map(|&rule| Item::new(start, rule, 0, eof_set.clone()))
        .collect();

    let mut sets = vec![ItemSet::new(initial_kernel)];
    let mut registry: IndexMap<KernelKey, usize> = IndexMap::new();
    registry.insert(kernel_key(&sets[0].kernel), 0);

    let mut pending: VecDeque<usize> = VecDeque::new();
    pending.push_back(0);

    while let Some(index) = pending.pop_front() {
        close(grammar, &mut sets[index]);

        loop {
            let Some((symbol, contributing)) = next_goto_group(grammar, &sets[index]) else {
                break;
            };

            let mut new_kernel = Vec::with_capacity(contributing.len());
            for &(is_kernel, item_index) in &contributing {
                let item = if is_kernel {
                    &sets[index].kernel[item_index]
                } else {
                    &sets[index].closure[item_index]
                };
                new_kernel.push(Item::new(item.element, item.rule, item.dot + 1, item.lookaheads.clone()));
            }

            let key = kernel_key(&new_kernel);
            let target = match registry.get(&key) {
                Some(&existing) => existing,
                None => {
                    let new_index = sets.len();
                    sets.push(ItemSet::new(new_kernel));
                    registry.insert(key, new_index);
                    pending.push_back(new_index);
                    new_index
                }
            };

            for &(is_kernel, item_index) in &contributing {
                let item = if is_kernel {
                    &mut sets[index].kernel[item_index]
                } else {
                    &mut sets[index].closure[item_index]
                };
                item.jump = Some(target);
            }

            let _ = symbol;
        }
    }

    Ok(LrAutomaton { sets })
}

/// Closure to a fixpoint: `original_source/lr.c`'s `closure`'s two
/// `while` loops (kernel items first, then closure items, since new
/// closure items can themselves need closing over).
fn close(grammar: &Grammar, set: &mut ItemSet) {
    loop {
        let mut added = false;
        let snapshot: Vec<Item> = set.kernel.iter().chain(set.closure.iter()).cloned().collect();
        for item in &snapshot {
            for produced in closure_one(grammar, item) {
                added |= set.add_closure_item(produced);
            }
        }
        if !added {
            break;
        }
    }
}

/// `closure_one`: for item `A -> alpha . B beta [L]` with `B` a
/// non-terminal, produce `B -> . gamma [FIRST(beta L)]` for each rule of
/// `B`. `FIRST(beta L)` is FIRST of the symbols following `B` in this
/// rule, falling through to `L` if every one of them can generate
/// epsilon (spec.md §4.4's general definition, not `lr.c`'s
/// single-next-symbol approximation).
fn closure_one(grammar: &Grammar, item: &Item) -> Vec<Item> {
    let rule = grammar.rule(item.rule);
    if item.dot >= rule.rhs.len() {
        return Vec::new(); // complete item
    }
    let b = rule.rhs[item.dot];
    if grammar.element(b).is_terminal() {
        return Vec::new();
    }

    let lookaheads = first_of_suffix(grammar, &rule.rhs[item.dot + 1..], &item.lookaheads);

    grammar
        .element(b)
        .rules
        .iter()
        .map(|&rule_id| Item::new(b, rule_id, 0, lookaheads.clone()))
        .collect()
}

/// FIRST of a symbol sequence `beta` followed by a lookahead set `l`:
/// union in each symbol's FIRST set until one that cannot generate
/// epsilon, at which point stop; if every symbol in `beta` can generate
/// epsilon, `l` itself is also included.
fn first_of_suffix(grammar: &Grammar, beta: &[ElementId], l: &FxHashSet<Lookahead>) -> FxHashSet<Lookahead> {
    let mut out = FxHashSet::default();
    for &sym in beta {
        let element = grammar.element(sym);
        for &first in &element.firsts {
            out.insert(Lookahead::Terminal(first));
        }
        if !element.can_generate_epsilon {
            return out;
        }
    }
    out.extend(l.iter().copied());
    out
}

/// Finds the first unresolved (dot not at end, `jump` unset) item in
/// `set`, and every other unresolved item that shares its dotted
/// symbol. Returns the symbol and the set of `(is_kernel, index)`
/// locations to advance - mirrors the original's "find all items with
/// same dot-pos-element and jump == EOF" grouping pass.
fn next_goto_group(grammar: &Grammar, set: &ItemSet) -> Option<(ElementId, Vec<(bool, usize)>)> {
    let dotted = |item: &Item| -> Option<ElementId> {
        let rule = grammar.rule(item.rule);
        if item.dot == rule.rhs.len() || item.jump.is_some() {
            None
        } else {
            Some(rule.rhs[item.dot])
        }
    };

    let mut symbol = None;
    for item in set.kernel.iter().chain(set.closure.iter()) {
        if let Some(s) = dotted(item) {
            symbol = Some(s);
            break;
        }
    }
    let symbol = symbol?;

    let mut group = Vec::new();
    for (i, item) in set.kernel.iter().enumerate() {
        if dotted(item) == Some(symbol) {
            group.push((true, i));
        }
    }
    for (i, item) in set.closure.iter().enumerate() {
        if dotted(item) == Some(symbol) {
            group.push((false, i));
        }
    }
    Some((symbol, group))
}

//! Epsilon-generation and FIRST-set derivation (spec.md §4.3).
//!
//! Grounded on `original_source/lr.c`'s `calc_generate_epsilon` (a
//! fixpoint over rules/elements) and `build_find_first_graph` +
//! `find_first_bfs` (a dependency graph seeded from terminals and
//! propagated outward by worklist). Reshaped here without the original's
//! `realloc`-grown arrays and fixed-size ring buffer, but the algorithm
//! - including which element is visited in which order - is unchanged.

use std::collections::VecDeque;

use cc_util::{FxHashMap, Symbol};

use crate::element::{ElementId, Grammar, RuleId};

/// Runs epsilon-generation and FIRST-set derivation over `grammar` in
/// place. Must be called once, after loading, before the grammar is used
/// to validate input or build LR tables.
pub fn run(grammar: &mut Grammar) {
    calc_generate_epsilon(grammar);
    let incoming = build_find_first_graph(grammar);
    find_first_bfs(grammar, &incoming);
}

/// `lr.c`'s `calc_generate_epsilon`: iterate to a fixpoint, resolving a
/// rule's epsilon-generation as soon as either (a) some rhs element is
/// known not to generate epsilon, or (b) every rhs element is known to
/// generate epsilon. An element can generate epsilon iff at least one of
/// its rules can.
fn calc_generate_epsilon(grammar: &mut Grammar) {
    let mut rule_done: FxHashMap<RuleId, bool> = FxHashMap::default();
    let mut element_done: FxHashMap<ElementId, bool> = FxHashMap::default();

    let epsilon = grammar.find(Symbol::intern("epsilon"));
    for id in grammar.element_ids() {
        if grammar.element(id).is_terminal() {
            element_done.insert(id, true);
            grammar.elements[id].can_generate_epsilon = Some(id) == epsilon;
        }
    }

    loop {
        let mut progress = false;

        for id in grammar.element_ids() {
            if element_done.get(&id).copied().unwrap_or(false) {
                continue;
            }
            let rules = grammar.element(id).rules.clone();
            let mut num_rules_done = 0;

            for rule_id in &rules {
                if rule_done.get(rule_id).copied().unwrap_or(false) {
                    num_rules_done += 1;
                    continue;
                }

                let rhs = grammar.rule(*rule_id).rhs.clone();
                let mut settled = false;
                let mut can_gen = false;

                for rhs_id in &rhs {
                    let te_done = *element_done.get(rhs_id).unwrap_or(&false);
                    if !te_done {
                        continue;
                    }
                    if !grammar.element(*rhs_id).can_generate_epsilon {
                        settled = true;
                        can_gen = false;
                        break;
                    }
                }

                if !settled {
                    let all_done_and_eps = rhs.iter().all(|rhs_id| {
                        *element_done.get(rhs_id).unwrap_or(&false)
                            && grammar.element(*rhs_id).can_generate_epsilon
                    });
                    if all_done_and_eps {
                        settled = true;
                        can_gen = true;
                    }
                }

                if settled {
                    progress = true;
                    num_rules_done += 1;
                    rule_done.insert(*rule_id, true);
                    grammar.rules[*rule_id].can_generate_epsilon = can_gen;
                }
            }

            if num_rules_done < rules.len() {
                continue;
            }

            progress = true;
            element_done.insert(id, true);
            let can_gen = rules
                .iter()
                .any(|rule_id| grammar.rule(*rule_id).can_generate_epsilon);
            grammar.elements[id].can_generate_epsilon = can_gen;
        }

        if !progress {
            break;
        }
    }
}

/// `lr.c`'s `build_find_first_graph`: for each rule `lhs -> r0 r1 ...`,
/// add an edge `lhs -> r_k` for every prefix element up to and including
/// the first one that cannot generate epsilon. Returns, for each
/// element, the set of elements that depend on its FIRST set (the
/// original's `incoming` list, built here instead as a map keyed by
/// dependency target).
fn build_find_first_graph(grammar: &Grammar) -> FxHashMap<ElementId, Vec<ElementId>> {
    let mut incoming: FxHashMap<ElementId, Vec<ElementId>> = FxHashMap::default();

    for id in grammar.element_ids() {
        let element = grammar.element(id);
        if element.is_terminal() {
            continue;
        }
        for rule_id in &element.rules {
            let rule = grammar.rule(*rule_id);
            for &rhs_id in &rule.rhs {
                if rhs_id == id {
                    continue;
                }
                let deps = incoming.entry(rhs_id).or_default();
                if !deps.contains(&id) {
                    deps.push(id);
                }
                if !grammar.element(rhs_id).can_generate_epsilon {
                    break;
                }
            }
        }
    }

    incoming
}

/// `lr.c`'s `find_first_bfs`: seed a worklist with every terminal (whose
/// FIRST set is itself), then propagate along `incoming` edges until no
/// element's FIRST set changes.
fn find_first_bfs(grammar: &mut Grammar, incoming: &FxHashMap<ElementId, Vec<ElementId>>) {
    let mut queue: VecDeque<ElementId> = VecDeque::new();
    let mut on_queue: FxHashMap<ElementId, bool> = FxHashMap::default();

    for id in grammar.element_ids() {
        if grammar.element(id).is_terminal() {
            grammar.elements[id].firsts.insert(id);
            queue.push_back(id);
            on_queue.insert(id, true);
        }
    }

    while let Some(id) = queue.pop_front() {
        on_queue.insert(id, false);
        let Some(dependents) = incoming.get(&id) else {
            continue;
        };
        let source_firsts = grammar.element(id).firsts.clone();

        for &dep in dependents {
            if dep == id {
                continue;
            }
            let mut changed = false;
            for &f in &source_firsts {
                changed |= grammar.elements[dep].firsts.insert(f);
            }
            let has_incoming = incoming.get(&dep).is_some();
            if changed && has_incoming && !on_queue.get(&dep).copied().unwrap_or(false) {
                queue.push_back(dep);
                on_queue.insert(dep, true);
            }
        }
    }
}

//! LR(1) items and item sets (spec.md §3, §4.4).
//!
//! Grounded on `original_source/lr.c`'s `struct item`/`struct item_set`:
//! an item is `(element, rule, dot_pos, lookaheads, jump)`; a set is a
//! kernel list (the seed item, plus every item whose dot advanced past
//! zero via GOTO) and a closure list (items added by closure, dot
//! always zero). Reshaped here with `FxHashSet` lookahead sets instead
//! of the original's linear-scanned `las` array.

use cc_util::FxHashSet;

use cc_grammar::{ElementId, RuleId};

/// A lookahead terminal, or the end-of-input marker (`EOF` in the
/// original, represented there by the C `EOF` constant `-1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lookahead {
    Terminal(ElementId),
    Eof,
}

/// One LR(1) item `[A -> alpha . beta, lookaheads]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub element: ElementId,
    pub rule: RuleId,
    pub dot: usize,
    pub lookaheads: FxHashSet<Lookahead>,
    /// Transition target set index once GOTO has been resolved for the
    /// symbol after the dot. `None` for complete items and until GOTO
    /// assigns it. Mirrors the original's `item->jump`.
    pub jump: Option<usize>,
}

impl Item {
    pub fn new(element: ElementId, rule: RuleId, dot: usize, lookaheads: FxHashSet<Lookahead>) -> Self {
        Self { element, rule, dot, lookaheads, jump: None }
    }

    /// Same element/rule/dot, ignoring lookaheads and jump - the key
    /// closure merges on (spec.md §3: "Two items with equal
    /// element/rule/dot are merged; their lookahead sets are unioned").
    pub fn core_matches(&self, other: &Item) -> bool {
        self.element == other.element && self.rule == other.rule && self.dot == other.dot
    }
}

/// A canonical, hashable signature of an item set's kernel, used to test
/// whether two kernels denote the same LR(1) state (spec.md §3: "Set
/// identity is the identity of its kernel"). Items are sorted by
/// (element, rule, dot) and each item's lookaheads are sorted, so two
/// kernels built in different orders still compare equal.
pub type KernelKey = Vec<(ElementId, RuleId, usize, Vec<Lookahead>)>;

pub fn kernel_key(kernel: &[Item]) -> KernelKey {
    let mut key: KernelKey = kernel
        .iter()
        .map(|item| {
            let mut las: Vec<Lookahead> = item.lookaheads.iter().copied().collect();
            las.sort();
            (item.element, item.rule, item.dot, las)
        })
        .collect();
    key.sort();
    key
}

/// An LR(1) canonical-automaton state: a kernel (the items that define
/// its identity) plus the closure items derived from it.
#[derive(Clone, Debug, Default)]
pub struct ItemSet {
    pub kernel: Vec<Item>,
    pub closure: Vec<Item>,
}

impl ItemSet {
    pub fn new(kernel: Vec<Item>) -> Self {
        Self { kernel, closure: Vec::new() }
    }

    /// All items in the set, kernel first, matching the original's
    /// serialization order (`num_kernels` items, then `num_closures`).
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.kernel.iter().chain(self.closure.iter())
    }

    pub fn all_items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.kernel.iter_mut().chain(self.closure.iter_mut())
    }

    /// Adds `item` to the closure list, merging lookaheads into an
    /// existing item with the same core if one is present. Returns
    /// `true` if this changed the set (new item, or new lookaheads
    /// merged into an existing one) - mirrors `item_set_add_item`'s
    /// boolean return.
    pub fn add_closure_item(&mut self, item: Item) -> bool {
        for existing in self.closure.iter_mut() {
            if existing.core_matches(&item) {
                let mut changed = false;
                for la in item.lookaheads {
                    changed |= existing.lookaheads.insert(la);
                }
                return changed;
            }
        }
        self.closure.push(item);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_grammar::ElementId;
    use cc_util::index_vec::Idx;

    fn eid(n: usize) -> ElementId {
        ElementId::from_usize(n)
    }
    fn rid(n: usize) -> RuleId {
        RuleId::from_usize(n)
    }

    #[test]
    fn kernel_key_ignores_insertion_order() {
        let mut las_a = FxHashSet::default();
        las_a.insert(Lookahead::Eof);
        las_a.insert(Lookahead::Terminal(eid(3)));

        let item_a = Item::new(eid(1), rid(0), 0, las_a);

        let mut las_b = FxHashSet::default();
        las_b.insert(Lookahead::Terminal(eid(3)));
        las_b.insert(Lookahead::Eof);
        let item_b = Item::new(eid(1), rid(0), 0, las_b);

        assert_eq!(kernel_key(&[item_a]), kernel_key(&[item_b]));
    }

    #[test]
    fn add_closure_item_merges_lookaheads() {
        let mut set = ItemSet::default();
        let mut las1 = FxHashSet::default();
        las1.insert(Lookahead::Eof);
        assert!(set.add_closure_item(Item::new(eid(1), rid(0), 0, las1)));

        let mut las2 = FxHashSet::default();
        las2.insert(Lookahead::Terminal(eid(2)));
        assert!(set.add_closure_item(Item::new(eid(1), rid(0), 0, las2)));

        assert_eq!(set.closure.len(), 1);
        assert_eq!(set.closure[0].lookaheads.len(), 2);

        let mut las3 = FxHashSet::default();
        las3.insert(Lookahead::Eof);
        assert!(!set.add_closure_item(Item::new(eid(1), rid(0), 0, las3)));
    }
}

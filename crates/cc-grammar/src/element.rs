//! The grammar model (spec.md §4.3): elements (terminals/non-terminals)
//! and the rules that derive non-terminals.
//!
//! Grounded on `original_source/lr.c`'s `struct element`/`struct rule`
//! (`elements[]`, `e->rules[]`, `e->firsts[]`), reshaped as an arena of
//! [`Element`]/[`Rule`] values addressed by typed indices instead of
//! `realloc`-grown parallel arrays.

use cc_util::index_vec::{Idx, IndexVec};
use cc_util::{FxHashMap, FxHashSet, Symbol};

/// Index of an [`Element`] (terminal or non-terminal) in a [`Grammar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl Idx for ElementId {
    fn from_usize(idx: usize) -> Self {
        ElementId(idx as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a [`Rule`] in a [`Grammar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(u32);

impl Idx for RuleId {
    fn from_usize(idx: usize) -> Self {
        RuleId(idx as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What an [`Element`] is: a terminal (matched directly against a lexer
/// token) or a non-terminal (derived via one or more [`Rule`]s).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// `token_kind` is the matching `cc_lex::Token::kind_id()`, or `-1`
    /// for an abstract terminal with no single token kind (e.g.
    /// `Identifier`, `Constant`, `StringLiteral`, `epsilon`) - the parser
    /// resolves those by payload shape rather than by kind id.
    Terminal { token_kind: i32 },
    NonTerminal,
}

#[derive(Clone, Debug)]
pub struct Element {
    pub name: Symbol,
    pub kind: ElementKind,
    /// Rules with this element as their left-hand side. Empty for
    /// terminals.
    pub rules: Vec<RuleId>,
    pub can_generate_epsilon: bool,
    pub firsts: FxHashSet<ElementId>,
}

impl Element {
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, ElementKind::Terminal { .. })
    }
}

/// One production `lhs -> rhs[0] rhs[1] ... rhs[n-1]`.
#[derive(Clone, Debug)]
pub struct Rule {
    pub lhs: ElementId,
    pub rhs: Vec<ElementId>,
    pub can_generate_epsilon: bool,
}

/// A loaded, derived grammar: elements, their rules, and the FIRST-set /
/// epsilon-generation facts `derive::run` computes over them.
///
/// Grounded on `original_source/lr.c`'s global `elements[]`/`num_elements`
/// arrays, indexed by `ElementId`/`RuleId` here instead of raw `int`.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    pub elements: IndexVec<ElementId, Element>,
    pub rules: IndexVec<RuleId, Rule>,
    pub by_name: FxHashMap<Symbol, ElementId>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: Symbol) -> Option<ElementId> {
        self.by_name.get(&name).copied()
    }

    /// Returns the element for `name`, creating a fresh one (terminal or
    /// non-terminal per `is_terminal`) if it isn't known yet. Mirrors
    /// `lr.c`'s `add_element`.
    pub fn add_element(&mut self, name: Symbol, is_terminal: bool) -> ElementId {
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let kind = if is_terminal {
            ElementKind::Terminal { token_kind: -1 }
        } else {
            ElementKind::NonTerminal
        };
        let id = self.elements.push(Element {
            name,
            kind,
            rules: Vec::new(),
            can_generate_epsilon: false,
            firsts: FxHashSet::default(),
        });
        self.by_name.insert(name, id);
        id
    }

    pub fn add_rule(&mut self, lhs: ElementId, rhs: Vec<ElementId>) -> RuleId {
        let rule_id = self.rules.push(Rule {
            lhs,
            rhs,
            can_generate_epsilon: false,
        });
        self.elements[lhs].rules.push(rule_id);
        rule_id
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id]
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> {
        (0..self.elements.len()).map(ElementId::from_usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_element_is_idempotent() {
        let mut g = Grammar::new();
        let a = g.add_element(Symbol::intern("Expression"), false);
        let b = g.add_element(Symbol::intern("Expression"), false);
        assert_eq!(a, b);
        assert_eq!(g.elements.len(), 1);
    }

    #[test]
    fn add_rule_links_back_to_lhs() {
        let mut g = Grammar::new();
        let lhs = g.add_element(Symbol::intern("S"), false);
        let t = g.add_element(Symbol::intern("("), true);
        let rule = g.add_rule(lhs, vec![t]);
        assert_eq!(g.element(lhs).rules, vec![rule]);
        assert_eq!(g.rule(rule).lhs, lhs);
    }
}

//! Conditional-inclusion (`#if`/`#ifdef`/`#elif`/`#else`/`#endif`) state
//! machine - the boolean-flag encoding of the WAIT/SCAN/DONE table in
//! spec.md §4.2.3, grounded on `original_source/src/cpp/scanner.c`'s
//! conditional stack.

use cc_util::{Error, Result};

struct CondEntry {
    /// An enclosing conditional is itself inactive, so this one can never
    /// become active no matter what its own condition evaluates to.
    parent_inactive: bool,
    /// Some branch of this conditional has already been taken.
    satisfied: bool,
    /// `#else` has already been seen at this nesting level - a further
    /// `#elif`/`#else` is a directive error.
    saw_else: bool,
    /// This entry's branch is the one currently being scanned.
    active: bool,
}

/// Tracks nested `#if`/`#elif`/`#else`/`#endif` groups for one file.
pub struct CondStack {
    entries: Vec<CondEntry>,
}

impl CondStack {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// True while the directive/token scanner is inside a branch whose
    /// text should be processed rather than skipped.
    pub fn is_active(&self) -> bool {
        self.entries.last().map_or(true, |e| e.active)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when a further `#elif`/`#elifdef`/`#elifndef` at the current
    /// nesting level would actually need its condition evaluated - false
    /// once a prior branch has already been taken, the parent is
    /// inactive, or `#else` already closed the chain.
    pub fn should_evaluate(&self) -> bool {
        match self.entries.last() {
            None => false,
            Some(e) => !e.parent_inactive && !e.satisfied,
        }
    }

    pub fn push_if(&mut self, condition: bool) {
        let parent_inactive = !self.is_active();
        let active = !parent_inactive && condition;
        self.entries.push(CondEntry { parent_inactive, satisfied: active, saw_else: false, active });
    }

    pub fn handle_elif(&mut self, condition: bool) -> Result<()> {
        let entry = self.entries.last_mut().ok_or_else(|| Error::ConditionalMismatch("#elif without #if".into()))?;
        if entry.saw_else {
            return Err(Error::ConditionalMismatch("#elif after #else".into()));
        }
        if entry.parent_inactive || entry.satisfied {
            entry.active = false;
        } else {
            entry.active = condition;
            entry.satisfied = condition;
        }
        Ok(())
    }

    pub fn handle_else(&mut self) -> Result<()> {
        let entry = self.entries.last_mut().ok_or_else(|| Error::ConditionalMismatch("#else without #if".into()))?;
        if entry.saw_else {
            return Err(Error::ConditionalMismatch("duplicate #else".into()));
        }
        entry.saw_else = true;
        if entry.parent_inactive || entry.satisfied {
            entry.active = false;
        } else {
            entry.active = true;
            entry.satisfied = true;
        }
        Ok(())
    }

    pub fn pop_endif(&mut self) -> Result<()> {
        self.entries.pop().ok_or_else(|| Error::ConditionalMismatch("#endif without #if".into()))?;
        Ok(())
    }
}

impl Default for CondStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_if_else_endif() {
        let mut s = CondStack::new();
        s.push_if(false);
        assert!(!s.is_active());
        s.handle_else().unwrap();
        assert!(s.is_active());
        s.pop_endif().unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn elif_chain_takes_first_true_branch_only() {
        let mut s = CondStack::new();
        s.push_if(false);
        assert!(s.should_evaluate());
        s.handle_elif(true).unwrap();
        assert!(s.is_active());
        assert!(!s.should_evaluate());
        s.handle_elif(true).unwrap();
        assert!(!s.is_active());
        s.handle_else().unwrap();
        assert!(!s.is_active());
    }

    #[test]
    fn nested_inactive_parent_suppresses_child() {
        let mut s = CondStack::new();
        s.push_if(false);
        s.push_if(true);
        assert!(!s.is_active());
        assert!(!s.should_evaluate());
    }

    #[test]
    fn unbalanced_directives_are_errors() {
        let mut s = CondStack::new();
        assert!(s.pop_endif().is_err());
        assert!(s.handle_else().is_err());
        s.push_if(true);
        s.handle_else().unwrap();
        assert!(s.handle_else().is_err());
    }
}

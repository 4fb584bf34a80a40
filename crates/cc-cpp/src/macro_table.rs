//! Macro definitions and the table that holds them (spec.md §4.2.2,
//! grounded on `original_source/src/cpp/scanner.c`'s macro hash table).

use cc_util::{Error, FxHashMap, Result, Symbol};

use crate::pp_token::PpToken;

/// A macro whose value is computed from the current expansion position
/// rather than stored text - `__FILE__`, `__LINE__`, `__DATE__`, `__TIME__`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dynamic {
    File,
    Line,
    Date,
    Time,
}

#[derive(Clone, Debug)]
pub struct Macro {
    pub name: Symbol,
    pub is_function_like: bool,
    pub is_variadic: bool,
    pub params: Vec<Symbol>,
    pub replacement: Vec<PpToken>,
    /// Rejects any user `#define`/`#undef` outright (C23 6.10.8.1's fixed
    /// set: `__STDC__`, `__STDC_VERSION__`, `__STDC_HOSTED__`, `__DATE__`,
    /// `__TIME__`). `__FILE__`/`__LINE__` are dynamic but *not* protected -
    /// the standard explicitly permits redefining or undefining those two.
    pub protected: bool,
    pub dynamic: Option<Dynamic>,
}

impl Macro {
    pub fn object_like(name: Symbol, replacement: Vec<PpToken>) -> Self {
        Self { name, is_function_like: false, is_variadic: false, params: Vec::new(), replacement, protected: false, dynamic: None }
    }

    pub fn function_like(name: Symbol, params: Vec<Symbol>, is_variadic: bool, replacement: Vec<PpToken>) -> Self {
        Self { name, is_function_like: true, is_variadic, params, replacement, protected: false, dynamic: None }
    }

    fn fixed(name: &str, replacement: Vec<PpToken>) -> Self {
        let mut m = Self::object_like(Symbol::intern(name), replacement);
        m.protected = true;
        m
    }

    fn dynamic(name: &str, kind: Dynamic, protected: bool) -> Self {
        let mut m = Self::object_like(Symbol::intern(name), Vec::new());
        m.dynamic = Some(kind);
        m.protected = protected;
        m
    }

    /// Redefinition is only an error when the two definitions differ
    /// (C23 6.10.8.3): same kind, same parameter spelling, and a
    /// replacement list that agrees token-for-token including relative
    /// whitespace.
    pub fn is_identical_to(&self, other: &Macro) -> bool {
        self.is_function_like == other.is_function_like
            && self.is_variadic == other.is_variadic
            && self.params == other.params
            && self.replacement.len() == other.replacement.len()
            && self
                .replacement
                .iter()
                .zip(other.replacement.iter())
                .all(|(a, b)| a.token == b.token && (a.has_white_space == b.has_white_space || a.span == b.span))
    }
}

/// The live `#define` table for one translation unit.
pub struct MacroTable {
    macros: FxHashMap<Symbol, Macro>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self { macros: FxHashMap::default() }
    }

    /// Installs the fixed C23 predefined macros (spec.md §4.2.2's
    /// predefine header, `original_source/src/cpp/scanner.c`'s
    /// `install_builtin_macros`).
    pub fn with_predefines() -> Self {
        let mut table = Self::new();
        let number = |text: &str| vec![PpToken::new(cc_lex::Token::PpNumber(Symbol::intern(text)), cc_util::Span::DUMMY)];
        table.insert_raw(Macro::fixed("__STDC__", number("1")));
        table.insert_raw(Macro::fixed("__STDC_VERSION__", number("202311L")));
        table.insert_raw(Macro::fixed("__STDC_HOSTED__", number("1")));
        table.insert_raw(Macro::dynamic("__DATE__", Dynamic::Date, true));
        table.insert_raw(Macro::dynamic("__TIME__", Dynamic::Time, true));
        table.insert_raw(Macro::dynamic("__FILE__", Dynamic::File, false));
        table.insert_raw(Macro::dynamic("__LINE__", Dynamic::Line, false));
        table
    }

    fn insert_raw(&mut self, macro_: Macro) {
        self.macros.insert(macro_.name, macro_);
    }

    /// Defines (or redefines) a macro, enforcing both write-protection and
    /// the identical-redefinition rule.
    pub fn define(&mut self, new_macro: Macro) -> Result<()> {
        if let Some(existing) = self.macros.get(&new_macro.name) {
            if existing.protected {
                return Err(Error::MacroRedefinition(format!(
                    "'{}' is a predefined macro and cannot be redefined",
                    new_macro.name.as_str()
                )));
            }
            if !existing.is_identical_to(&new_macro) {
                return Err(Error::MacroRedefinition(format!(
                    "'{}' redefined with a different replacement list",
                    new_macro.name.as_str()
                )));
            }
        }
        self.macros.insert(new_macro.name, new_macro);
        Ok(())
    }

    pub fn undef(&mut self, name: Symbol) -> Result<()> {
        if let Some(existing) = self.macros.get(&name) {
            if existing.protected {
                return Err(Error::MacroRedefinition(format!("'{}' cannot be undefined", name.as_str())));
            }
        }
        self.macros.remove(&name);
        Ok(())
    }

    pub fn get(&self, name: Symbol) -> Option<&Macro> {
        self.macros.get(&name)
    }

    pub fn is_defined(&self, name: Symbol) -> bool {
        self.macros.contains_key(&name)
    }
}

impl Default for MacroTable {
    fn default() -> Self {
        Self::new()
    }
}

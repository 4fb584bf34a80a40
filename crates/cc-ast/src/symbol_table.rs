//! The scoped symbol table the parser threads through declaration parsing
//! (spec.md §3 "Symbol table", §4.5 "Symbol-table threading").
//!
//! Grounded on `faxc-sem/src/scope.rs`'s `Rib`/`RibId`/arena-of-scopes
//! shape, generalized from that crate's single `bindings: HashMap` to the
//! six disjoint C namespaces (label, struct-tag, union-tag, enum-tag,
//! member, ordinary) plus the two attribute namespaces spec.md §3 names.

use cc_util::index_vec::Idx;
use cc_util::{FxHashMap, Symbol};

use cc_containers::tree::{Tree, TreeNodeId};

/// Where a scope sits in the C23 scope hierarchy (spec.md §3: "FILE at the
/// root, BLOCK/PROTOTYPE/MEMBER beneath").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    File,
    Block,
    /// The parameter scope of a function declarator, live only while its
    /// parameter list is being parsed (spec.md §4.5 item 2).
    Prototype,
    /// A struct/union's member namespace.
    Member,
}

/// Linkage, per spec.md §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Linkage {
    None,
    External,
    Internal,
}

/// Storage class, per spec.md §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Storage {
    None,
    Auto,
    Static,
    Extern,
    Register,
    ThreadLocal,
    Typedef,
    Constexpr,
}

/// Which of the symbol table's eight disjoint maps a [`SymbolEntry`] lives
/// in (spec.md §3: "six disjoint maps ... plus two attribute namespaces").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Label,
    StructTag,
    UnionTag,
    EnumTag,
    Member,
    Ordinary,
    StandardAttribute,
    VendorAttribute,
}

/// What a symbol's type reference points at: one of the seven built-in
/// integer types installed at file scope, or another symbol (a
/// typedef-name or a struct/union/enum tag) whose own entry carries the
/// fuller type description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Builtin(Symbol),
    Named(Symbol),
    Unresolved,
}

/// An entry in one of a scope's namespace maps.
#[derive(Clone, Debug)]
pub struct SymbolEntry {
    pub name: Symbol,
    pub ty: TypeRef,
    pub linkage: Linkage,
    pub storage: Storage,
    pub namespace: Namespace,
}

impl SymbolEntry {
    pub fn new(name: Symbol, namespace: Namespace) -> Self {
        Self { name, ty: TypeRef::Unresolved, linkage: Linkage::None, storage: Storage::None, namespace }
    }
}

/// One scope: eight disjoint identifier maps, keyed by [`Symbol`].
#[derive(Default)]
pub struct Scope {
    pub kind_label: FxHashMap<Symbol, SymbolEntry>,
    pub struct_tags: FxHashMap<Symbol, SymbolEntry>,
    pub union_tags: FxHashMap<Symbol, SymbolEntry>,
    pub enum_tags: FxHashMap<Symbol, SymbolEntry>,
    pub members: FxHashMap<Symbol, SymbolEntry>,
    pub ordinary: FxHashMap<Symbol, SymbolEntry>,
    pub standard_attributes: FxHashMap<Symbol, SymbolEntry>,
    pub vendor_attributes: FxHashMap<Symbol, SymbolEntry>,
    kind: ScopeKind,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self { kind, ..Default::default() }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    fn map_for(&self, ns: Namespace) -> &FxHashMap<Symbol, SymbolEntry> {
        match ns {
            Namespace::Label => &self.kind_label,
            Namespace::StructTag => &self.struct_tags,
            Namespace::UnionTag => &self.union_tags,
            Namespace::EnumTag => &self.enum_tags,
            Namespace::Member => &self.members,
            Namespace::Ordinary => &self.ordinary,
            Namespace::StandardAttribute => &self.standard_attributes,
            Namespace::VendorAttribute => &self.vendor_attributes,
        }
    }

    fn map_for_mut(&mut self, ns: Namespace) -> &mut FxHashMap<Symbol, SymbolEntry> {
        match ns {
            Namespace::Label => &mut self.kind_label,
            Namespace::StructTag => &mut self.struct_tags,
            Namespace::UnionTag => &mut self.union_tags,
            Namespace::EnumTag => &mut self.enum_tags,
            Namespace::Member => &mut self.members,
            Namespace::Ordinary => &mut self.ordinary,
            Namespace::StandardAttribute => &mut self.standard_attributes,
            Namespace::VendorAttribute => &mut self.vendor_attributes,
        }
    }

    /// Insert `entry` into its namespace, returning any existing entry that
    /// shared its name in that namespace.
    pub fn insert(&mut self, entry: SymbolEntry) -> Option<SymbolEntry> {
        let ns = entry.namespace;
        self.map_for_mut(ns).insert(entry.name, entry)
    }

    pub fn lookup_local(&self, ns: Namespace, name: Symbol) -> Option<&SymbolEntry> {
        self.map_for(ns).get(&name)
    }
}

/// Handle to a [`Scope`] in a [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(TreeNodeId);

impl Idx for ScopeId {
    fn from_usize(idx: usize) -> Self {
        ScopeId(TreeNodeId::from_usize(idx))
    }
    fn index(self) -> usize {
        self.0.index()
    }
}

/// The scope tree: FILE at the root, BLOCK/PROTOTYPE/MEMBER scopes nested
/// beneath as the parser enters/leaves them.
pub struct ScopeTree {
    tree: Tree<Scope>,
    file_scope: ScopeId,
}

impl ScopeTree {
    /// A fresh tree with a single FILE scope at the root.
    pub fn new() -> Self {
        let mut tree = Tree::new();
        let root = tree.insert_root(Scope::new(ScopeKind::File));
        Self { tree, file_scope: ScopeId(root) }
    }

    pub fn file_scope(&self) -> ScopeId {
        self.file_scope
    }

    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        ScopeId(self.tree.insert_child(parent.0, Scope::new(kind)))
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.tree.parent(id.0).map(ScopeId)
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        self.tree.get(id.0)
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        self.tree.get_mut(id.0)
    }

    /// Walk from `id` up through enclosing scopes (inclusive) looking for
    /// `name` in `ns`, per C23's "innermost declaration wins" scoping rule.
    /// Used directly by the declaration-specifier parser's typedef-name
    /// lookup (spec.md §4.5 item 1: "An identifier is treated as a
    /// type-specifier iff a typedef-name lookup in the enclosing scope
    /// chain finds an entry").
    pub fn lookup(&self, id: ScopeId, ns: Namespace, name: Symbol) -> Option<&SymbolEntry> {
        for scope in self.tree.ancestors(id.0) {
            if let Some(entry) = self.tree.get(scope).lookup_local(ns, name) {
                return Some(entry);
            }
        }
        None
    }

    pub fn is_typedef_name(&self, id: ScopeId, name: Symbol) -> bool {
        matches!(
            self.lookup(id, Namespace::Ordinary, name),
            Some(entry) if entry.storage == Storage::Typedef
        )
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typedef_visible_through_nested_block_scope() {
        let mut tree = ScopeTree::new();
        let file = tree.file_scope();
        let name = Symbol::intern("my_int_t");
        let mut entry = SymbolEntry::new(name, Namespace::Ordinary);
        entry.storage = Storage::Typedef;
        tree.get_mut(file).insert(entry);

        let block = tree.push_scope(file, ScopeKind::Block);
        assert!(tree.is_typedef_name(block, name));
        assert!(!tree.is_typedef_name(block, Symbol::intern("not_a_type")));
    }

    #[test]
    fn namespaces_are_disjoint() {
        let mut tree = ScopeTree::new();
        let file = tree.file_scope();
        let name = Symbol::intern("foo");
        tree.get_mut(file).insert(SymbolEntry::new(name, Namespace::Ordinary));
        tree.get_mut(file).insert(SymbolEntry::new(name, Namespace::StructTag));

        assert!(tree.lookup(file, Namespace::Ordinary, name).is_some());
        assert!(tree.lookup(file, Namespace::StructTag, name).is_some());
        assert!(tree.lookup(file, Namespace::EnumTag, name).is_none());
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut tree = ScopeTree::new();
        let file = tree.file_scope();
        let name = Symbol::intern("x");
        tree.get_mut(file).insert(SymbolEntry::new(name, Namespace::Ordinary));

        let block = tree.push_scope(file, ScopeKind::Block);
        let mut inner = SymbolEntry::new(name, Namespace::Ordinary);
        inner.storage = Storage::Auto;
        tree.get_mut(block).insert(inner);

        let found = tree.lookup(block, Namespace::Ordinary, name).unwrap();
        assert_eq!(found.storage, Storage::Auto);
    }
}

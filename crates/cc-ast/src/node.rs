//! The AST node arena.
//!
//! Per spec.md §3: "A typed variant whose type tag is drawn from a closed
//! enum covering C23 grammar non-terminals plus refinements (type-specifier
//! bitmask group, type-qualifier bitmask group, storage-specifier bitmask
//! group, function-specifier bitmask group, attribute group, block,
//! declarator, pointer, array, function, identifier, integer). Nodes form
//! an ordered tree: each has one parent and an ordered list of children."
//!
//! Grounded on `faxc-par/src/ast.rs`'s enum-of-node-kinds-plus-payload
//! shape, re-keyed to C23 non-terminals (`original_source/inc/cc/tokens.h`
//! names the terminal/non-terminal vocabulary this is checked against).

use cc_util::index_vec::{Idx, IndexVec};
use cc_util::{Span, Symbol};

use cc_containers::tree::{Tree, TreeNodeId};

/// Handle to a node in an [`Ast`]. A thin newtype over [`TreeNodeId`] so AST
/// code doesn't depend on `cc-containers` types leaking through its public
/// API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(TreeNodeId);

impl Idx for NodeId {
    fn from_usize(idx: usize) -> Self {
        NodeId(TreeNodeId::from_usize(idx))
    }
    fn index(self) -> usize {
        self.0.index()
    }
}

/// A tiny `bitflags`-alike macro, kept local rather than pulling in the
/// `bitflags` crate for four small masks. Each generated type is a
/// `Copy`able newtype over the backing integer with `|`, `contains`,
/// `insert`, and `is_empty`.
macro_rules! bitflags_like {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $ty:ty {
            $(const $flag:ident = $value:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(pub $ty);

        impl $name {
            pub const EMPTY: $name = $name(0);
            $(pub const $flag: $name = $name($value);)*

            #[inline]
            pub fn contains(self, other: $name) -> bool {
                (self.0 & other.0) == other.0 && other.0 != 0
            }

            #[inline]
            pub fn intersects(self, other: $name) -> bool {
                (self.0 & other.0) != 0
            }

            #[inline]
            pub fn insert(&mut self, other: $name) {
                self.0 |= other.0;
            }

            #[inline]
            pub fn is_empty(self) -> bool {
                self.0 == 0
            }

            #[inline]
            pub fn count_bits(self, mask: $name) -> u32 {
                (self.0 & mask.0).count_ones()
            }
        }

        impl std::ops::BitOr for $name {
            type Output = $name;
            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }
    };
}

bitflags_like! {
    /// Type-specifier combination bitmask (spec.md §4.5 item 1). Each
    /// specifier keyword seen increments the matching bit/counter; `long`
    /// is counted (two bits = `long long`) rather than boolean.
    pub struct TypeSpecifierBits: u32 {
        const VOID = 1 << 0;
        const CHAR = 1 << 1;
        const SHORT = 1 << 2;
        const INT = 1 << 3;
        const LONG = 1 << 4;
        const LONG_LONG = 1 << 5;
        const FLOAT = 1 << 6;
        const DOUBLE = 1 << 7;
        const SIGNED = 1 << 8;
        const UNSIGNED = 1 << 9;
        const BOOL = 1 << 10;
        const COMPLEX = 1 << 11;
        const DECIMAL32 = 1 << 12;
        const DECIMAL64 = 1 << 13;
        const DECIMAL128 = 1 << 14;
        const BITINT = 1 << 15;
        const ATOMIC_SPECIFIER = 1 << 16;
        const STRUCT = 1 << 17;
        const UNION = 1 << 18;
        const ENUM = 1 << 19;
        const TYPEDEF_NAME = 1 << 20;
        const TYPEOF = 1 << 21;
        const GENERIC_SELECTION = 1 << 22;
    }
}

bitflags_like! {
    pub struct TypeQualifierBits: u32 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
        const RESTRICT = 1 << 2;
        const ATOMIC_QUALIFIER = 1 << 3;
    }
}

bitflags_like! {
    pub struct StorageSpecifierBits: u32 {
        const AUTO = 1 << 0;
        const STATIC = 1 << 1;
        const EXTERN = 1 << 2;
        const REGISTER = 1 << 3;
        const TYPEDEF = 1 << 4;
        const THREAD_LOCAL = 1 << 5;
        const CONSTEXPR = 1 << 6;
    }
}

bitflags_like! {
    pub struct FunctionSpecifierBits: u32 {
        const INLINE = 1 << 0;
        const NORETURN = 1 << 1;
    }
}

/// The closed set of AST node kinds. Carries only the payload that cannot
/// be recovered from a child node (identifiers, literal text, bitmasks);
/// everything else (operands, members, statements) is a child in the
/// node's ordered child list.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // --- Translation unit / external declarations ---
    TranslationUnit,
    FunctionDefinition,
    Declaration,
    /// A single declarator plus optional initializer, inside a
    /// `Declaration`'s children.
    InitDeclarator,
    StaticAssertDeclaration,

    // --- Declaration-specifier bitmask groups (spec.md §3's "refinements") ---
    TypeSpecifierGroup(TypeSpecifierBits),
    TypeQualifierGroup(TypeQualifierBits),
    StorageSpecifierGroup(StorageSpecifierBits),
    FunctionSpecifierGroup(FunctionSpecifierBits),
    AttributeGroup,
    Attribute { name: Symbol },

    // --- Struct/union/enum ---
    StructOrUnionSpecifier { is_union: bool, tag: Option<Symbol> },
    MemberDeclaration,
    EnumSpecifier { tag: Option<Symbol> },
    Enumerator { name: Symbol },

    // --- Declarators ---
    Declarator,
    AbstractDeclarator,
    Pointer,
    Array { has_star: bool, is_static: bool },
    Function { is_variadic: bool },
    Identifier(Symbol),

    // --- Initializers ---
    Initializer,
    InitializerList,
    DesignatedInitializer,

    // --- Statements ---
    Block,
    ExprStatement,
    IfStatement,
    SwitchStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    GotoStatement { label: Symbol },
    ContinueStatement,
    BreakStatement,
    ReturnStatement,
    LabeledStatement { label: Symbol },
    CaseStatement,
    DefaultStatement,
    NullStatement,

    // --- Expressions ---
    Integer { text: Symbol },
    FloatingLiteral { text: Symbol },
    StringLiteral { text: Symbol },
    CharConstant { text: Symbol },
    BinaryExpr { op: Symbol },
    UnaryExpr { op: Symbol },
    PostfixExpr { op: Symbol },
    AssignExpr { op: Symbol },
    ConditionalExpr,
    CommaExpr,
    CastExpr,
    SizeofExpr,
    SizeofType,
    AlignofType,
    CallExpr,
    IndexExpr,
    MemberExpr { member: Symbol },
    ArrowExpr { member: Symbol },
    GenericSelection,
    GenericAssoc,
    CompoundLiteral,
    ParenExpr,

    // --- Types (used inside sizeof/cast/alignof/declarations) ---
    TypeName,
}

/// One node in the AST: its kind plus the span it covers in source.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// The AST arena: an ordered tree of [`Node`]s (spec.md §3's "AST node").
pub struct Ast {
    tree: Tree<Node>,
    nodes: IndexVec<NodeId, ()>,
}

impl Ast {
    pub fn new() -> Self {
        Self { tree: Tree::new(), nodes: IndexVec::new() }
    }

    pub fn insert_root(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = self.tree.insert_root(Node { kind, span });
        self.nodes.push(());
        NodeId(id)
    }

    pub fn insert_child(&mut self, parent: NodeId, kind: NodeKind, span: Span) -> NodeId {
        let id = self.tree.insert_child(parent.0, Node { kind, span });
        self.nodes.push(());
        NodeId(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree.root().map(NodeId)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id.0).map(NodeId)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.tree.children(id.0).map(NodeId)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.tree.child_count(id.0)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        self.tree.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        self.tree.get_mut(id.0)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_util::Span;

    #[test]
    fn ast_tree_shape() {
        let mut ast = Ast::new();
        let root = ast.insert_root(NodeKind::TranslationUnit, Span::DUMMY);
        let fdef = ast.insert_child(root, NodeKind::FunctionDefinition, Span::DUMMY);
        let decl = ast.insert_child(fdef, NodeKind::Declarator, Span::DUMMY);
        assert_eq!(ast.parent(decl), Some(fdef));
        assert_eq!(ast.children(root).collect::<Vec<_>>(), vec![fdef]);
    }

    #[test]
    fn type_specifier_bits_compose() {
        let mut bits = TypeSpecifierBits::EMPTY;
        bits.insert(TypeSpecifierBits::LONG);
        bits.insert(TypeSpecifierBits::LONG);
        assert!(bits.contains(TypeSpecifierBits::LONG));
        assert!(!bits.contains(TypeSpecifierBits::INT));
    }
}

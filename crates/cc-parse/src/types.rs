//! Declaration-specifiers, declarators, and struct/union/enum specifiers
//! (spec.md §4.5 items 1-2).
//!
//! `cc_containers::tree::Tree` is append-only - a node's parent is fixed at
//! creation and never changes. Declarator disambiguation (grouping parens
//! vs. parameter lists) needs to look arbitrarily far past the point where
//! an inner node would otherwise be created, so this module parses into a
//! plain-value intermediate ([`DeclSpecifiers`], [`DeclaratorChain`]) first
//! and only walks it into the arena, top-down, once the whole shape is
//! known (`materialize_*`). Array-bound expressions are parsed through the
//! same intermediate-then-materialize scheme `expr.rs` uses, so a size
//! expression discovered while still inside a grouping paren can still be
//! attached under its real parent afterward.

use cc_ast::node::{FunctionSpecifierBits, StorageSpecifierBits, TypeQualifierBits, TypeSpecifierBits};
use cc_ast::{NodeId, NodeKind, ScopeKind};
use cc_lex::Token;
use cc_util::{Error, Result, Span, Symbol};

use crate::expr::Expr;
use crate::Parser;

/// A declaration-specifier-list's accumulated bitmasks plus any tag/typedef
/// specifier it carried (spec.md §4.5 item 1).
#[derive(Default)]
pub(crate) struct DeclSpecifiers {
    pub storage: StorageSpecifierBits,
    pub quals: TypeQualifierBits,
    pub funcspec: FunctionSpecifierBits,
    pub typespec: TypeSpecifierBits,
    pub tag: Option<TagSpec>,
    pub typedef_name: Option<Symbol>,
}

/// The non-bitmask part of a type-specifier: a struct/union/enum body (or
/// reference to one), or a bare typedef-name already folded into
/// `DeclSpecifiers::typedef_name`.
pub(crate) enum TagSpec {
    StructOrUnion { is_union: bool, tag: Option<Symbol>, members: Option<Vec<MemberDecl>> },
    Enum { tag: Option<Symbol>, enumerators: Option<Vec<(Symbol, Option<Expr>)>> },
}

pub(crate) struct MemberDecl {
    pub specifiers: DeclSpecifiers,
    pub declarators: Vec<DeclaratorChain>,
}

/// One step away from the identifier in a declarator, closest-to-identifier
/// first (spec.md §4.5 item 2).
pub(crate) enum Derivation {
    Pointer(TypeQualifierBits),
    Array { quals: TypeQualifierBits, is_static: bool, has_star: bool, size: Option<Expr> },
    Function { params: Vec<Param>, is_variadic: bool },
}

pub(crate) struct Param {
    pub specifiers: DeclSpecifiers,
    pub declarator: DeclaratorChain,
}

/// A fully parsed declarator or abstract-declarator, not yet materialized.
pub(crate) struct DeclaratorChain {
    pub ident: Option<Symbol>,
    pub derivations: Vec<Derivation>,
}

pub(crate) struct TypeNameChain {
    pub specifiers: DeclSpecifiers,
    pub declarator: DeclaratorChain,
}

impl DeclSpecifiers {
    /// Checks the type-specifier combinability rules of spec.md §4.5 item 1.
    /// `signed`/`unsigned` may coexist only with `char`/`short`/`int`/`long`/
    /// `_BitInt`; `short`/`long` likewise only modify `int` (`long` also
    /// allows `double`, for `long double`); at most one base specifier of
    /// the `void`/`char`/`int`/`float`/`double`/`_Bool`/`struct`/`union`/
    /// `enum`/typedef-name/`_Atomic(...)`/`typeof`/`_Generic`/`_BitInt`/
    /// `_Decimal*` group may appear. `long long` is two `long` bits and
    /// follows the same `long` rule.
    fn check_typespec_combinability(&self) -> Result<()> {
        use TypeSpecifierBits as T;

        let base_group = T::VOID
            | T::CHAR
            | T::INT
            | T::FLOAT
            | T::DOUBLE
            | T::BOOL
            | T::STRUCT
            | T::UNION
            | T::ENUM
            | T::TYPEDEF_NAME
            | T::ATOMIC_SPECIFIER
            | T::TYPEOF
            | T::GENERIC_SELECTION
            | T::BITINT
            | T::DECIMAL32
            | T::DECIMAL64
            | T::DECIMAL128;

        if self.typespec.count_bits(base_group) > 1 {
            return Err(Error::InvalidDecl("two or more base type-specifiers in declaration specifiers".into()));
        }
        if self.typespec.contains(T::SIGNED) && self.typespec.contains(T::UNSIGNED) {
            return Err(Error::InvalidDecl("both 'signed' and 'unsigned' specified".into()));
        }
        if self.typespec.intersects(T::SIGNED | T::UNSIGNED)
            && self.typespec.intersects(base_group)
            && !self.typespec.intersects(T::CHAR | T::INT | T::BITINT)
        {
            return Err(Error::InvalidDecl(
                "'signed'/'unsigned' may only be combined with 'char', 'short', 'int', 'long', or '_BitInt'".into(),
            ));
        }
        if self.typespec.intersects(T::SHORT) && self.typespec.intersects(base_group) && !self.typespec.intersects(T::INT) {
            return Err(Error::InvalidDecl("'short' may only be combined with 'int'".into()));
        }
        if self.typespec.contains(T::LONG_LONG) {
            if self.typespec.intersects(base_group) && !self.typespec.intersects(T::INT) {
                return Err(Error::InvalidDecl("'long long' may only be combined with 'int'".into()));
            }
        } else if self.typespec.intersects(T::LONG)
            && self.typespec.intersects(base_group)
            && !self.typespec.intersects(T::INT | T::DOUBLE)
        {
            return Err(Error::InvalidDecl("'long' may only be combined with 'int' or 'double'".into()));
        }
        Ok(())
    }
}

impl Parser {
    // --- declaration-specifiers (spec.md §4.5 item 1) ---

    /// Parses a maximal run of storage-class-specifiers, type-qualifiers,
    /// function-specifiers, and type-specifiers. An identifier is only
    /// consumed as a typedef-name type-specifier the first time no other
    /// type-specifier has been seen yet - afterward it's the declarator.
    pub(crate) fn parse_declaration_specifiers(&mut self) -> Result<DeclSpecifiers> {
        let mut spec = DeclSpecifiers::default();
        loop {
            match self.peek() {
                Token::KwAuto => {
                    spec.storage.insert(StorageSpecifierBits::AUTO);
                    self.bump();
                }
                Token::KwStatic => {
                    spec.storage.insert(StorageSpecifierBits::STATIC);
                    self.bump();
                }
                Token::KwExtern => {
                    spec.storage.insert(StorageSpecifierBits::EXTERN);
                    self.bump();
                }
                Token::KwRegister => {
                    spec.storage.insert(StorageSpecifierBits::REGISTER);
                    self.bump();
                }
                Token::KwTypedef => {
                    spec.storage.insert(StorageSpecifierBits::TYPEDEF);
                    self.bump();
                }
                Token::KwThreadLocal => {
                    spec.storage.insert(StorageSpecifierBits::THREAD_LOCAL);
                    self.bump();
                }
                Token::KwConstexpr => {
                    spec.storage.insert(StorageSpecifierBits::CONSTEXPR);
                    self.bump();
                }

                Token::KwConst => {
                    spec.quals.insert(TypeQualifierBits::CONST);
                    self.bump();
                }
                Token::KwVolatile => {
                    spec.quals.insert(TypeQualifierBits::VOLATILE);
                    self.bump();
                }
                Token::KwRestrict => {
                    spec.quals.insert(TypeQualifierBits::RESTRICT);
                    self.bump();
                }
                Token::KwAtomic if !matches!(self.peek_at(1), Token::LParen) => {
                    spec.quals.insert(TypeQualifierBits::ATOMIC_QUALIFIER);
                    self.bump();
                }

                Token::KwInline => {
                    spec.funcspec.insert(FunctionSpecifierBits::INLINE);
                    self.bump();
                }
                Token::KwNoreturn => {
                    spec.funcspec.insert(FunctionSpecifierBits::NORETURN);
                    self.bump();
                }

                Token::KwVoid => {
                    spec.typespec.insert(TypeSpecifierBits::VOID);
                    self.bump();
                }
                Token::KwChar => {
                    spec.typespec.insert(TypeSpecifierBits::CHAR);
                    self.bump();
                }
                Token::KwShort => {
                    spec.typespec.insert(TypeSpecifierBits::SHORT);
                    self.bump();
                }
                Token::KwInt => {
                    spec.typespec.insert(TypeSpecifierBits::INT);
                    self.bump();
                }
                Token::KwLong => {
                    if spec.typespec.contains(TypeSpecifierBits::LONG) {
                        spec.typespec.insert(TypeSpecifierBits::LONG_LONG);
                    } else {
                        spec.typespec.insert(TypeSpecifierBits::LONG);
                    }
                    self.bump();
                }
                Token::KwFloat => {
                    spec.typespec.insert(TypeSpecifierBits::FLOAT);
                    self.bump();
                }
                Token::KwDouble => {
                    spec.typespec.insert(TypeSpecifierBits::DOUBLE);
                    self.bump();
                }
                Token::KwSigned => {
                    spec.typespec.insert(TypeSpecifierBits::SIGNED);
                    self.bump();
                }
                Token::KwUnsigned => {
                    spec.typespec.insert(TypeSpecifierBits::UNSIGNED);
                    self.bump();
                }
                Token::KwBool => {
                    spec.typespec.insert(TypeSpecifierBits::BOOL);
                    self.bump();
                }
                Token::KwComplex => {
                    spec.typespec.insert(TypeSpecifierBits::COMPLEX);
                    self.bump();
                }
                Token::KwDecimal32 => {
                    spec.typespec.insert(TypeSpecifierBits::DECIMAL32);
                    self.bump();
                }
                Token::KwDecimal64 => {
                    spec.typespec.insert(TypeSpecifierBits::DECIMAL64);
                    self.bump();
                }
                Token::KwDecimal128 => {
                    spec.typespec.insert(TypeSpecifierBits::DECIMAL128);
                    self.bump();
                }
                Token::KwBitInt => {
                    self.bump();
                    self.expect(Token::LParen)?;
                    let _width = self.parse_expr()?;
                    self.expect(Token::RParen)?;
                    spec.typespec.insert(TypeSpecifierBits::BITINT);
                }
                Token::KwAtomic => {
                    // `_Atomic ( type-name )`: atomic type specifier, not qualifier.
                    self.bump();
                    self.expect(Token::LParen)?;
                    let inner = self.parse_type_name()?;
                    self.expect(Token::RParen)?;
                    spec.typespec.insert(TypeSpecifierBits::ATOMIC_SPECIFIER);
                    spec.typespec.insert(inner.specifiers.typespec);
                    spec.quals.insert(inner.specifiers.quals);
                }
                Token::KwTypeof | Token::KwTypeofUnqual => {
                    self.bump();
                    self.expect(Token::LParen)?;
                    self.skip_typeof_operand()?;
                    self.expect(Token::RParen)?;
                    spec.typespec.insert(TypeSpecifierBits::TYPEOF);
                }

                Token::KwStruct | Token::KwUnion => {
                    let is_union = matches!(self.peek(), Token::KwUnion);
                    self.bump();
                    let (tag, members) = self.parse_struct_or_union_body()?;
                    spec.typespec.insert(if is_union { TypeSpecifierBits::UNION } else { TypeSpecifierBits::STRUCT });
                    spec.tag = Some(TagSpec::StructOrUnion { is_union, tag, members });
                }
                Token::KwEnum => {
                    self.bump();
                    let (tag, enumerators) = self.parse_enum_body()?;
                    spec.typespec.insert(TypeSpecifierBits::ENUM);
                    spec.tag = Some(TagSpec::Enum { tag, enumerators });
                }

                Token::Ident(name) if spec.typespec.is_empty() && self.is_typedef_name(name) => {
                    spec.typespec.insert(TypeSpecifierBits::TYPEDEF_NAME);
                    spec.typedef_name = Some(name);
                    self.bump();
                }

                Token::LBracket if self.peek_at(1) == Token::LBracket => {
                    self.parse_attribute_specifier_sequence()?;
                }

                _ => break,
            }
        }
        if spec.typespec.is_empty() && spec.tag.is_none() {
            return Err(Error::InvalidDecl("expected a type specifier".into()));
        }
        spec.check_typespec_combinability()?;
        Ok(spec)
    }

    /// Skips a balanced-bracket attribute-specifier-sequence (`[[...]]
    /// [[...]] ...`). Recognizing and discarding these here keeps attribute
    /// syntax from breaking specifier-list scanning; the declaration/
    /// statement-level callers that care about attribute names call
    /// `parse_attribute_list` instead.
    fn parse_attribute_specifier_sequence(&mut self) -> Result<()> {
        while self.at(Token::LBracket) && self.peek_at(1) == Token::LBracket {
            self.bump();
            self.bump();
            let mut depth = 1;
            while depth > 0 {
                match self.bump() {
                    Token::LBracket => depth += 1,
                    Token::RBracket => depth -= 1,
                    Token::Eof => return Err(Error::InvalidGrammar("unterminated attribute".into())),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Parses `[[ attr , attr(...) ]] [[ ... ]] ...` and returns each
    /// attribute's name (spec.md §3's `Attribute { name }` node).
    pub(crate) fn parse_attribute_list(&mut self) -> Result<Vec<Symbol>> {
        let mut names = Vec::new();
        while self.at(Token::LBracket) && self.peek_at(1) == Token::LBracket {
            self.bump();
            self.bump();
            while !self.at(Token::RBracket) {
                if self.at_ident() {
                    names.push(self.expect_ident()?);
                } else {
                    self.bump();
                }
                if self.eat(Token::LParen) {
                    let mut depth = 1;
                    while depth > 0 {
                        match self.bump() {
                            Token::LParen => depth += 1,
                            Token::RParen => depth -= 1,
                            Token::Eof => return Err(Error::InvalidGrammar("unterminated attribute args".into())),
                            _ => {}
                        }
                    }
                }
                if !self.eat(Token::Comma) {
                    break;
                }
            }
            self.expect(Token::RBracket)?;
            self.expect(Token::RBracket)?;
        }
        Ok(names)
    }

    fn skip_typeof_operand(&mut self) -> Result<()> {
        let mut depth = 1;
        loop {
            match self.peek() {
                Token::LParen => {
                    depth += 1;
                    self.bump();
                }
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    self.bump();
                }
                Token::Eof => return Err(Error::InvalidGrammar("unterminated typeof operand".into())),
                _ => {
                    self.bump();
                }
            }
        }
        Ok(())
    }

    pub(crate) fn parse_type_qualifier_list(&mut self) -> Result<TypeQualifierBits> {
        let mut quals = TypeQualifierBits::EMPTY;
        loop {
            match self.peek() {
                Token::KwConst => quals.insert(TypeQualifierBits::CONST),
                Token::KwVolatile => quals.insert(TypeQualifierBits::VOLATILE),
                Token::KwRestrict => quals.insert(TypeQualifierBits::RESTRICT),
                Token::KwAtomic if !matches!(self.peek_at(1), Token::LParen) => {
                    quals.insert(TypeQualifierBits::ATOMIC_QUALIFIER)
                }
                _ => break,
            }
            self.bump();
        }
        Ok(quals)
    }

    // --- struct/union/enum (spec.md §3's "refinements") ---

    fn parse_struct_or_union_body(&mut self) -> Result<(Option<Symbol>, Option<Vec<MemberDecl>>)> {
        let tag = if self.at_ident() { Some(self.expect_ident()?) } else { None };
        if !self.eat(Token::LBrace) {
            return Ok((tag, None));
        }
        let mut members = Vec::new();
        while !self.at(Token::RBrace) {
            if self.at(Token::KwStaticAssert) {
                self.skip_static_assert()?;
                continue;
            }
            let specifiers = self.parse_declaration_specifiers()?;
            let mut declarators = Vec::new();
            if !self.at(Token::Semi) {
                loop {
                    let declarator = self.parse_declarator_chain(true)?;
                    if self.eat(Token::Colon) {
                        let _width = self.parse_expr()?;
                    }
                    declarators.push(declarator);
                    if !self.eat(Token::Comma) {
                        break;
                    }
                }
            }
            self.expect(Token::Semi)?;
            members.push(MemberDecl { specifiers, declarators });
        }
        self.expect(Token::RBrace)?;
        Ok((tag, Some(members)))
    }

    fn parse_enum_body(&mut self) -> Result<(Option<Symbol>, Option<Vec<(Symbol, Option<Expr>)>>)> {
        let tag = if self.at_ident() { Some(self.expect_ident()?) } else { None };
        if self.eat(Token::Colon) {
            let _underlying = self.parse_declaration_specifiers()?;
        }
        if !self.eat(Token::LBrace) {
            return Ok((tag, None));
        }
        let mut enumerators = Vec::new();
        while !self.at(Token::RBrace) {
            let name = self.expect_ident()?;
            let value = if self.eat(Token::Eq) { Some(self.parse_expr()?) } else { None };
            enumerators.push((name, value));
            if !self.eat(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RBrace)?;
        Ok((tag, Some(enumerators)))
    }

    fn skip_static_assert(&mut self) -> Result<()> {
        self.expect(Token::KwStaticAssert)?;
        self.expect(Token::LParen)?;
        let _cond = self.parse_expr()?;
        if self.eat(Token::Comma) {
            let _msg = self.bump();
        }
        self.expect(Token::RParen)?;
        self.expect(Token::Semi)
    }

    // --- declarators (spec.md §4.5 item 2) ---

    fn is_grouping_paren(&self) -> bool {
        self.at(Token::LParen) && matches!(self.peek_at(1), Token::Star | Token::LParen)
    }

    /// Parses a declarator (`allow_abstract = false`) or abstract-declarator
    /// (`allow_abstract = true`) into its intermediate chain. `(` is a
    /// grouping paren only when directly followed by `*` or `(`; any other
    /// `(` starts a parameter-type-list suffix (spec.md §4.5 item 2).
    pub(crate) fn parse_declarator_chain(&mut self, allow_abstract: bool) -> Result<DeclaratorChain> {
        let mut leading_pointers = Vec::new();
        while self.eat(Token::Star) {
            let quals = self.parse_type_qualifier_list()?;
            leading_pointers.push(Derivation::Pointer(quals));
        }

        let mut core = if self.is_grouping_paren() {
            self.bump();
            let inner = self.parse_declarator_chain(allow_abstract)?;
            self.expect(Token::RParen)?;
            inner
        } else if self.at_ident() {
            let name = self.expect_ident()?;
            DeclaratorChain { ident: Some(name), derivations: Vec::new() }
        } else if allow_abstract {
            DeclaratorChain { ident: None, derivations: Vec::new() }
        } else {
            return Err(Error::InvalidDecl(format!("expected a declarator, found {:?}", self.peek())));
        };

        loop {
            if self.eat(Token::LBracket) {
                let is_static_lead = self.eat(Token::KwStatic);
                let quals = self.parse_type_qualifier_list()?;
                let is_static = is_static_lead || self.eat(Token::KwStatic);
                let (has_star, size) = if self.eat(Token::Star) {
                    (true, None)
                } else if self.at(Token::RBracket) {
                    (false, None)
                } else {
                    (false, Some(self.parse_assignment_expr()?))
                };
                self.expect(Token::RBracket)?;
                core.derivations.push(Derivation::Array { quals, is_static, has_star, size });
            } else if self.at(Token::LParen) {
                self.bump();
                let (params, is_variadic) = self.parse_parameter_type_list()?;
                self.expect(Token::RParen)?;
                core.derivations.push(Derivation::Function { params, is_variadic });
            } else {
                break;
            }
        }

        core.derivations.extend(leading_pointers);
        Ok(core)
    }

    /// Parses a parameter-type-list inside a fresh PROTOTYPE scope, per
    /// spec.md §4.5 item 2: "the function-declarator routine switches the
    /// current symbol table to a fresh PROTOTYPE scope for the duration of
    /// parameter parsing, then restores the enclosing scope."
    fn parse_parameter_type_list(&mut self) -> Result<(Vec<Param>, bool)> {
        self.push_scope(ScopeKind::Prototype);
        let result = self.parse_parameter_type_list_inner();
        self.pop_scope();
        result
    }

    fn parse_parameter_type_list_inner(&mut self) -> Result<(Vec<Param>, bool)> {
        let mut params = Vec::new();
        if self.at(Token::RParen) {
            return Ok((params, false));
        }
        if self.at(Token::KwVoid) && self.peek_at(1) == Token::RParen {
            self.bump();
            return Ok((params, false));
        }
        loop {
            if self.eat(Token::DotDotDot) {
                return Ok((params, true));
            }
            let specifiers = self.parse_declaration_specifiers()?;
            let declarator = self.parse_declarator_chain(true)?;
            if let Some(name) = declarator.ident {
                let entry = cc_ast::SymbolEntry::new(name, cc_ast::Namespace::Ordinary);
                self.scopes.get_mut(self.scope).insert(entry);
            }
            params.push(Param { specifiers, declarator });
            if !self.eat(Token::Comma) {
                break;
            }
        }
        Ok((params, false))
    }

    pub(crate) fn parse_type_name(&mut self) -> Result<TypeNameChain> {
        let specifiers = self.parse_declaration_specifiers()?;
        let declarator = self.parse_declarator_chain(true)?;
        Ok(TypeNameChain { specifiers, declarator })
    }

    // --- materialization: intermediate value -> real AST subtree ---

    pub(crate) fn materialize_decl_specifiers(&mut self, parent: NodeId, spec: &DeclSpecifiers) {
        if !spec.storage.is_empty() {
            self.new_node(parent, NodeKind::StorageSpecifierGroup(spec.storage));
        }
        if !spec.quals.is_empty() {
            self.new_node(parent, NodeKind::TypeQualifierGroup(spec.quals));
        }
        if !spec.funcspec.is_empty() {
            self.new_node(parent, NodeKind::FunctionSpecifierGroup(spec.funcspec));
        }
        let group = self.new_node(parent, NodeKind::TypeSpecifierGroup(spec.typespec));
        if let Some(name) = spec.typedef_name {
            self.new_node(group, NodeKind::Identifier(name));
        }
        match &spec.tag {
            Some(TagSpec::StructOrUnion { is_union, tag, members }) => {
                let su = self.new_node(group, NodeKind::StructOrUnionSpecifier { is_union: *is_union, tag: *tag });
                if let Some(members) = members {
                    for member in members {
                        let md = self.new_node(su, NodeKind::MemberDeclaration);
                        self.materialize_decl_specifiers(md, &member.specifiers);
                        for declarator in &member.declarators {
                            self.materialize_declarator(md, declarator);
                        }
                    }
                }
            }
            Some(TagSpec::Enum { tag, enumerators }) => {
                let en = self.new_node(group, NodeKind::EnumSpecifier { tag: *tag });
                if let Some(enumerators) = enumerators {
                    for (name, value) in enumerators {
                        let node = self.new_node(en, NodeKind::Enumerator { name: *name });
                        if let Some(value) = value {
                            self.materialize_expr(node, value);
                        }
                    }
                }
            }
            None => {}
        }
    }

    /// Attaches `chain` under `parent` as a `Declarator` (named) or
    /// `AbstractDeclarator` (unnamed). Every derivation becomes a direct
    /// child of this single node rather than nesting pointer-in-array-in-
    /// function the way the type they describe would nest, since the
    /// append-only arena can't re-parent content discovered inside a
    /// grouping paren under a derivation discovered outside it; the
    /// flattened, identifier-to-base-type-ordered child list still
    /// preserves the information a later type-resolution pass would need.
    pub(crate) fn materialize_declarator(&mut self, parent: NodeId, chain: &DeclaratorChain) -> NodeId {
        let kind = if chain.ident.is_some() { NodeKind::Declarator } else { NodeKind::AbstractDeclarator };
        let node = self.new_node(parent, kind);
        if let Some(name) = chain.ident {
            self.new_node(node, NodeKind::Identifier(name));
        }
        for derivation in &chain.derivations {
            match derivation {
                Derivation::Pointer(quals) => {
                    let p = self.new_node(node, NodeKind::Pointer);
                    if !quals.is_empty() {
                        self.new_node(p, NodeKind::TypeQualifierGroup(*quals));
                    }
                }
                Derivation::Array { quals, is_static, has_star, size } => {
                    let a = self.new_node(node, NodeKind::Array { has_star: *has_star, is_static: *is_static });
                    if !quals.is_empty() {
                        self.new_node(a, NodeKind::TypeQualifierGroup(*quals));
                    }
                    if let Some(expr) = size {
                        self.materialize_expr(a, expr);
                    }
                }
                Derivation::Function { params, is_variadic } => {
                    let f = self.new_node(node, NodeKind::Function { is_variadic: *is_variadic });
                    for param in params {
                        let pd = self.new_node(f, NodeKind::Declaration);
                        self.materialize_decl_specifiers(pd, &param.specifiers);
                        self.materialize_declarator(pd, &param.declarator);
                    }
                }
            }
        }
        node
    }

    pub(crate) fn materialize_type_name(&mut self, parent: NodeId, chain: &TypeNameChain) -> NodeId {
        let node = self.new_node(parent, NodeKind::TypeName);
        self.materialize_decl_specifiers(node, &chain.specifiers);
        self.materialize_declarator(node, &chain.declarator);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser_over(mut tokens: Vec<Token>) -> Parser {
        tokens.push(Token::Eof);
        Parser::from_tokens(tokens)
    }

    #[test]
    fn plain_int_has_no_derivations() {
        let mut p = parser_over(vec![Token::Ident(Symbol::intern("x"))]);
        let chain = p.parse_declarator_chain(false).unwrap();
        assert_eq!(chain.ident, Some(Symbol::intern("x")));
        assert!(chain.derivations.is_empty());
    }

    #[test]
    fn pointer_to_function_returning_pointer() {
        // *(*f)(int)
        let mut p = parser_over(vec![
            Token::Star,
            Token::LParen,
            Token::Star,
            Token::Ident(Symbol::intern("f")),
            Token::RParen,
            Token::LParen,
            Token::KwInt,
            Token::RParen,
        ]);
        let chain = p.parse_declarator_chain(false).unwrap();
        assert_eq!(chain.ident, Some(Symbol::intern("f")));
        assert_eq!(chain.derivations.len(), 3);
        assert!(matches!(chain.derivations[0], Derivation::Pointer(_)));
        assert!(matches!(chain.derivations[1], Derivation::Function { .. }));
        assert!(matches!(chain.derivations[2], Derivation::Pointer(_)));
    }

    #[test]
    fn array_of_pointer_vs_pointer_to_array() {
        // *a[3] -> array of pointer
        let mut p = parser_over(vec![
            Token::Star,
            Token::Ident(Symbol::intern("a")),
            Token::LBracket,
            Token::PpNumber(Symbol::intern("3")),
            Token::RBracket,
        ]);
        let chain = p.parse_declarator_chain(false).unwrap();
        assert!(matches!(chain.derivations[0], Derivation::Array { .. }));
        assert!(matches!(chain.derivations[1], Derivation::Pointer(_)));
    }

    #[test]
    fn grouping_paren_makes_pointer_to_array() {
        // (*a)[3] -> pointer to array
        let mut p = parser_over(vec![
            Token::LParen,
            Token::Star,
            Token::Ident(Symbol::intern("a")),
            Token::RParen,
            Token::LBracket,
            Token::PpNumber(Symbol::intern("3")),
            Token::RBracket,
        ]);
        let chain = p.parse_declarator_chain(false).unwrap();
        assert!(matches!(chain.derivations[0], Derivation::Pointer(_)));
        assert!(matches!(chain.derivations[1], Derivation::Array { .. }));
    }

    #[test]
    fn declaration_specifiers_reject_bare_qualifier() {
        let mut p = parser_over(vec![Token::KwConst]);
        assert!(p.parse_declaration_specifiers().is_err());
    }

    #[test]
    fn unsigned_long_long_accumulates_two_long_bits() {
        let mut p = parser_over(vec![Token::KwUnsigned, Token::KwLong, Token::KwLong, Token::KwInt]);
        let spec = p.parse_declaration_specifiers().unwrap();
        assert!(spec.typespec.contains(TypeSpecifierBits::LONG_LONG));
        assert!(spec.typespec.contains(TypeSpecifierBits::UNSIGNED));
    }

    #[test]
    fn two_base_type_specifiers_are_rejected() {
        // void int x;
        let mut p = parser_over(vec![Token::KwVoid, Token::KwInt]);
        assert!(p.parse_declaration_specifiers().is_err());
        // float char x;
        let mut p = parser_over(vec![Token::KwFloat, Token::KwChar]);
        assert!(p.parse_declaration_specifiers().is_err());
        // struct S enum E x;
        let mut p = parser_over(vec![
            Token::KwStruct,
            Token::Ident(Symbol::intern("S")),
            Token::KwEnum,
            Token::Ident(Symbol::intern("E")),
        ]);
        assert!(p.parse_declaration_specifiers().is_err());
    }

    #[test]
    fn signed_unsigned_reject_non_integer_bases() {
        // signed struct S v;
        let mut p = parser_over(vec![Token::KwSigned, Token::KwStruct, Token::Ident(Symbol::intern("S"))]);
        assert!(p.parse_declaration_specifiers().is_err());
        // unsigned float x;
        let mut p = parser_over(vec![Token::KwUnsigned, Token::KwFloat]);
        assert!(p.parse_declaration_specifiers().is_err());
        // signed and unsigned together
        let mut p = parser_over(vec![Token::KwSigned, Token::KwUnsigned, Token::KwInt]);
        assert!(p.parse_declaration_specifiers().is_err());
        // signed int is fine
        let mut p = parser_over(vec![Token::KwSigned, Token::KwInt]);
        assert!(p.parse_declaration_specifiers().is_ok());
    }

    #[test]
    fn short_and_long_reject_non_integer_bases() {
        // _Bool long x;
        let mut p = parser_over(vec![Token::KwBool, Token::KwLong]);
        assert!(p.parse_declaration_specifiers().is_err());
        // short double x;
        let mut p = parser_over(vec![Token::KwShort, Token::KwDouble]);
        assert!(p.parse_declaration_specifiers().is_err());
        // long double is a legal base combination.
        let mut p = parser_over(vec![Token::KwLong, Token::KwDouble]);
        assert!(p.parse_declaration_specifiers().is_ok());
        // long long int is legal; long long double is not.
        let mut p = parser_over(vec![Token::KwLong, Token::KwLong, Token::KwInt]);
        assert!(p.parse_declaration_specifiers().is_ok());
        let mut p = parser_over(vec![Token::KwLong, Token::KwLong, Token::KwDouble]);
        assert!(p.parse_declaration_specifiers().is_err());
    }

    #[test]
    fn materializing_declarator_attaches_identifier_child() {
        let mut p = parser_over(vec![Token::Ident(Symbol::intern("x"))]);
        let chain = p.parse_declarator_chain(false).unwrap();
        let root = p.ast.insert_root(NodeKind::TranslationUnit, Span::DUMMY);
        let node = p.materialize_declarator(root, &chain);
        assert_eq!(p.ast.child_count(node), 1);
    }
}

//! External declarations and function definitions (spec.md §4.5 items 1, 3).
//!
//! `parse_declaration` is shared between file scope (`parse_external_declaration`,
//! where a `{` after the first declarator switches to a function definition)
//! and block scope (`parse_block_declaration`, called from `stmt.rs`'s
//! block-item dispatch, where a nested function definition is rejected).

use cc_ast::node::StorageSpecifierBits;
use cc_ast::{Linkage, Namespace, NodeId, NodeKind, ScopeKind, Storage, SymbolEntry};
use cc_lex::Token;
use cc_util::{Error, Result, Symbol};

use crate::types::{DeclaratorChain, Derivation};
use crate::Parser;

impl Parser {
    pub(crate) fn parse_external_declaration(&mut self, parent: NodeId) -> Result<()> {
        self.parse_declaration(parent, true)
    }

    /// Parses a declaration at block scope, called from `stmt.rs` when
    /// [`Parser::starts_declaration`] says the next block-item is a
    /// declaration rather than a statement.
    pub(crate) fn parse_block_declaration(&mut self, parent: NodeId) -> Result<()> {
        self.parse_declaration(parent, false)
    }

    /// True when the upcoming tokens can only begin a declaration: a
    /// storage-class-specifier, type-qualifier, function-specifier,
    /// type-specifier keyword, `static_assert`, a leading attribute, or an
    /// identifier already bound as a typedef-name in the current scope.
    pub(crate) fn starts_declaration(&self) -> bool {
        match self.peek() {
            Token::KwAuto
            | Token::KwStatic
            | Token::KwExtern
            | Token::KwRegister
            | Token::KwTypedef
            | Token::KwThreadLocal
            | Token::KwConstexpr
            | Token::KwConst
            | Token::KwVolatile
            | Token::KwRestrict
            | Token::KwAtomic
            | Token::KwInline
            | Token::KwNoreturn
            | Token::KwVoid
            | Token::KwChar
            | Token::KwShort
            | Token::KwInt
            | Token::KwLong
            | Token::KwFloat
            | Token::KwDouble
            | Token::KwSigned
            | Token::KwUnsigned
            | Token::KwBool
            | Token::KwComplex
            | Token::KwDecimal32
            | Token::KwDecimal64
            | Token::KwDecimal128
            | Token::KwBitInt
            | Token::KwStruct
            | Token::KwUnion
            | Token::KwEnum
            | Token::KwTypeof
            | Token::KwTypeofUnqual
            | Token::KwStaticAssert => true,
            Token::LBracket => self.peek_at(1) == Token::LBracket,
            Token::Ident(name) => self.is_typedef_name(name),
            _ => false,
        }
    }

    fn parse_declaration(&mut self, parent: NodeId, allow_function_definition: bool) -> Result<()> {
        if self.at(Token::KwStaticAssert) {
            return self.parse_static_assert_declaration(parent);
        }
        if self.at(Token::LBracket) && self.peek_at(1) == Token::LBracket {
            self.parse_attribute_list()?;
        }

        let specifiers = self.parse_declaration_specifiers()?;
        if self.at(Token::Semi) {
            // A bare `;` with no declarator only declares something when the
            // specifiers themselves introduce a tag (struct/union/enum);
            // otherwise it declares nothing (spec.md §4.5 item 3).
            if specifiers.tag.is_none() {
                return Err(Error::InvalidDecl("declaration has no declarator and introduces no tag".into()));
            }
            self.bump();
            let decl = self.new_node(parent, NodeKind::Declaration);
            self.materialize_decl_specifiers(decl, &specifiers);
            return Ok(());
        }

        let is_typedef = specifiers.storage.contains(StorageSpecifierBits::TYPEDEF);
        let first = self.parse_declarator_chain(false)?;

        if allow_function_definition && !is_typedef && self.at(Token::LBrace) {
            return self.parse_function_definition(parent, specifiers, first);
        }

        let decl = self.new_node(parent, NodeKind::Declaration);
        self.materialize_decl_specifiers(decl, &specifiers);
        self.parse_init_declarator(decl, first, is_typedef)?;
        while self.eat(Token::Comma) {
            let next = self.parse_declarator_chain(false)?;
            self.parse_init_declarator(decl, next, is_typedef)?;
        }
        self.expect(Token::Semi)?;
        Ok(())
    }

    fn parse_init_declarator(&mut self, decl: NodeId, chain: DeclaratorChain, is_typedef: bool) -> Result<()> {
        self.declare_ordinary_symbol(&chain, is_typedef);
        let init_decl = self.new_node(decl, NodeKind::InitDeclarator);
        self.materialize_declarator(init_decl, &chain);
        if self.eat(Token::Eq) {
            let init = self.parse_initializer()?;
            self.materialize_initializer(init_decl, &init);
        }
        Ok(())
    }

    fn declare_ordinary_symbol(&mut self, chain: &DeclaratorChain, is_typedef: bool) {
        if let Some(name) = chain.ident {
            let mut entry = SymbolEntry::new(name, Namespace::Ordinary);
            if is_typedef {
                entry.storage = Storage::Typedef;
            }
            self.scopes.get_mut(self.scope).insert(entry);
        }
    }

    /// A function definition's own parameter list is always its first
    /// derivation - whatever sits directly next to the identifier, through
    /// however many grouping parens `parse_declarator_chain` unwound to get
    /// there (spec.md §4.5 item 2) - so the parameters to carry into the
    /// body's scope are read off `chain.derivations[0]` without needing to
    /// re-walk the grouping structure.
    fn parse_function_definition(
        &mut self,
        parent: NodeId,
        specifiers: crate::types::DeclSpecifiers,
        chain: DeclaratorChain,
    ) -> Result<()> {
        let param_names: Vec<Symbol> = match chain.derivations.first() {
            Some(Derivation::Function { params, .. }) => {
                params.iter().filter_map(|p| p.declarator.ident).collect()
            }
            _ => return Err(Error::InvalidDecl("function definition requires a function declarator".into())),
        };
        let name = chain.ident;

        let func = self.new_node(parent, NodeKind::FunctionDefinition);
        self.materialize_decl_specifiers(func, &specifiers);
        let init_decl = self.new_node(func, NodeKind::InitDeclarator);
        self.materialize_declarator(init_decl, &chain);

        if let Some(name) = name {
            let mut entry = SymbolEntry::new(name, Namespace::Ordinary);
            entry.linkage = Linkage::External;
            self.scopes.get_mut(self.scope).insert(entry);
        }

        self.push_scope(ScopeKind::Block);
        for param_name in param_names {
            self.scopes.get_mut(self.scope).insert(SymbolEntry::new(param_name, Namespace::Ordinary));
        }
        self.parse_block_body(func)?;
        self.pop_scope();
        Ok(())
    }

    fn parse_static_assert_declaration(&mut self, parent: NodeId) -> Result<()> {
        self.expect(Token::KwStaticAssert)?;
        self.expect(Token::LParen)?;
        let node = self.new_node(parent, NodeKind::StaticAssertDeclaration);
        self.parse_expression(node)?;
        if self.eat(Token::Comma) {
            self.bump();
        }
        self.expect(Token::RParen)?;
        self.expect(Token::Semi)
    }
}

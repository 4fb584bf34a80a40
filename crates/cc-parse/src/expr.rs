//! Expression and initializer parsing (spec.md §4.5's expression grammar,
//! reached from declarator array bounds, `sizeof`/`_Alignof`/`_Generic`,
//! initializers, and statements).
//!
//! Like `types.rs`'s declarators, expressions are parsed into a plain
//! in-memory [`Expr`] tree first (ordinary `Box`es, no arena involved) and
//! only attached to the real [`cc_ast::Ast`] by [`Parser::materialize_expr`]
//! once the whole expression is known - `cc_containers::tree::Tree`'s
//! append-only nodes can't otherwise host the classic "parse the left
//! operand, then decide it's actually the child of an operator discovered
//! afterward" shape that precedence climbing needs.

use cc_ast::{NodeId, NodeKind};
use cc_lex::Token;
use cc_util::{Error, Result, Symbol};

use crate::types::TypeNameChain;
use crate::Parser;

pub(crate) enum Expr {
    Integer(Symbol),
    Floating(Symbol),
    Str(Symbol),
    Char(Symbol),
    Ident(Symbol),
    Paren(Box<Expr>),
    Unary { op: Symbol, operand: Box<Expr> },
    PostfixOp { op: Symbol, operand: Box<Expr> },
    Binary { op: Symbol, lhs: Box<Expr>, rhs: Box<Expr> },
    Assign { op: Symbol, lhs: Box<Expr>, rhs: Box<Expr> },
    Conditional { cond: Box<Expr>, then_branch: Box<Expr>, else_branch: Box<Expr> },
    Comma(Vec<Expr>),
    Cast { ty: TypeNameChain, operand: Box<Expr> },
    SizeofExpr(Box<Expr>),
    SizeofType(TypeNameChain),
    AlignofType(TypeNameChain),
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Index { base: Box<Expr>, index: Box<Expr> },
    Member { base: Box<Expr>, name: Symbol },
    Arrow { base: Box<Expr>, name: Symbol },
    Generic { controlling: Box<Expr>, assocs: Vec<(Option<TypeNameChain>, Expr)> },
    CompoundLiteral { ty: TypeNameChain, init: Box<Initializer> },
}

pub(crate) enum Designator {
    Index(Expr),
    Member(Symbol),
}

pub(crate) enum Initializer {
    Expr(Expr),
    List(Vec<(Vec<Designator>, Initializer)>),
}

fn classify_number(text: Symbol) -> Expr {
    let s = text.as_str();
    let is_hex = s.starts_with("0x") || s.starts_with("0X");
    let is_float = s.contains('.')
        || (is_hex && (s.contains('p') || s.contains('P')))
        || (!is_hex && (s.contains('e') || s.contains('E')))
        || s.ends_with('f')
        || s.ends_with('F');
    if is_float {
        Expr::Floating(text)
    } else {
        Expr::Integer(text)
    }
}

impl Parser {
    fn starts_type_name(&self, tok: Token) -> bool {
        if let Token::Ident(name) = tok {
            return self.is_typedef_name(name);
        }
        matches!(
            tok,
            Token::KwVoid
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
                | Token::KwAtomic
                | Token::KwStruct
                | Token::KwUnion
                | Token::KwEnum
                | Token::KwTypeof
                | Token::KwTypeofUnqual
                | Token::KwConst
                | Token::KwVolatile
                | Token::KwRestrict
        )
    }

    fn looks_like_type_name_in_parens(&self) -> bool {
        self.at(Token::LParen) && self.starts_type_name(self.peek_at(1))
    }

    // --- entry points ---

    /// `expression`: a possibly comma-joined sequence of
    /// assignment-expressions.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr> {
        let first = self.parse_assignment_expr()?;
        if !self.at(Token::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(Token::Comma) {
            items.push(self.parse_assignment_expr()?);
        }
        Ok(Expr::Comma(items))
    }

    /// Parses an expression and attaches it under `parent`.
    pub(crate) fn parse_expression(&mut self, parent: NodeId) -> Result<NodeId> {
        let expr = self.parse_expr()?;
        Ok(self.materialize_expr(parent, &expr))
    }

    fn assignment_op(&self) -> Option<&'static str> {
        Some(match self.peek() {
            Token::Eq => "=",
            Token::PlusEq => "+=",
            Token::MinusEq => "-=",
            Token::StarEq => "*=",
            Token::SlashEq => "/=",
            Token::PercentEq => "%=",
            Token::AmpEq => "&=",
            Token::PipeEq => "|=",
            Token::CaretEq => "^=",
            Token::LtLtEq => "<<=",
            Token::GtGtEq => ">>=",
            _ => return None,
        })
    }

    /// Assignment is right-associative, and C's grammar requires a
    /// `unary-expression` on the left of `=` - since that's just the
    /// syntactic shape a `conditional-expression` collapses to whenever an
    /// assignment operator follows, parsing the full conditional-expression
    /// first and reinterpreting it is the conventional hand-written-parser
    /// shortcut (no semantic check that the LHS is actually an lvalue-shaped
    /// expression happens here).
    pub(crate) fn parse_assignment_expr(&mut self) -> Result<Expr> {
        let lhs = self.parse_conditional_expr()?;
        if let Some(op) = self.assignment_op() {
            self.bump();
            let rhs = self.parse_assignment_expr()?;
            return Ok(Expr::Assign { op: Symbol::intern(op), lhs: Box::new(lhs), rhs: Box::new(rhs) });
        }
        Ok(lhs)
    }

    fn parse_conditional_expr(&mut self) -> Result<Expr> {
        let cond = self.parse_logical_or_expr()?;
        if self.eat(Token::Question) {
            let then_branch = self.parse_expr()?;
            self.expect(Token::Colon)?;
            let else_branch = self.parse_conditional_expr()?;
            return Ok(Expr::Conditional {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }
        Ok(cond)
    }

    fn parse_binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr>,
        ops: &[(Token, &'static str)],
    ) -> Result<Expr> {
        let mut lhs = next(self)?;
        loop {
            let matched = ops.iter().find(|(tok, _)| self.at(*tok)).map(|(_, name)| *name);
            match matched {
                Some(name) => {
                    self.bump();
                    let rhs = next(self)?;
                    lhs = Expr::Binary { op: Symbol::intern(name), lhs: Box::new(lhs), rhs: Box::new(rhs) };
                }
                None => break,
            }
        }
        Ok(lhs)
    }

    fn parse_logical_or_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_logical_and_expr, &[(Token::PipePipe, "||")])
    }

    fn parse_logical_and_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_inclusive_or_expr, &[(Token::AmpAmp, "&&")])
    }

    fn parse_inclusive_or_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_exclusive_or_expr, &[(Token::Pipe, "|")])
    }

    fn parse_exclusive_or_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_and_expr, &[(Token::Caret, "^")])
    }

    fn parse_and_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_equality_expr, &[(Token::Amp, "&")])
    }

    fn parse_equality_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_relational_expr, &[(Token::EqEq, "=="), (Token::BangEq, "!=")])
    }

    fn parse_relational_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            Self::parse_shift_expr,
            &[(Token::Lt, "<"), (Token::LtEq, "<="), (Token::Gt, ">"), (Token::GtEq, ">=")],
        )
    }

    fn parse_shift_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_additive_expr, &[(Token::LtLt, "<<"), (Token::GtGt, ">>")])
    }

    fn parse_additive_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_multiplicative_expr, &[(Token::Plus, "+"), (Token::Minus, "-")])
    }

    fn parse_multiplicative_expr(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            Self::parse_cast_expr,
            &[(Token::Star, "*"), (Token::Slash, "/"), (Token::Percent, "%")],
        )
    }

    fn parse_cast_expr(&mut self) -> Result<Expr> {
        if self.looks_like_type_name_in_parens() {
            self.bump();
            let ty = self.parse_type_name()?;
            self.expect(Token::RParen)?;
            if self.at(Token::LBrace) {
                let init = self.parse_initializer()?;
                return Ok(Expr::CompoundLiteral { ty, init: Box::new(init) });
            }
            let operand = self.parse_cast_expr()?;
            return Ok(Expr::Cast { ty, operand: Box::new(operand) });
        }
        self.parse_unary_expr()
    }

    fn parse_unary_expr(&mut self) -> Result<Expr> {
        match self.peek() {
            Token::PlusPlus | Token::MinusMinus => {
                let op = if self.peek() == Token::PlusPlus { "++" } else { "--" };
                self.bump();
                let operand = self.parse_unary_expr()?;
                Ok(Expr::Unary { op: Symbol::intern(op), operand: Box::new(operand) })
            }
            Token::Amp | Token::Star | Token::Plus | Token::Minus | Token::Tilde | Token::Bang => {
                let op = match self.peek() {
                    Token::Amp => "&",
                    Token::Star => "*",
                    Token::Plus => "+",
                    Token::Minus => "-",
                    Token::Tilde => "~",
                    Token::Bang => "!",
                    _ => unreachable!(),
                };
                self.bump();
                let operand = self.parse_cast_expr()?;
                Ok(Expr::Unary { op: Symbol::intern(op), operand: Box::new(operand) })
            }
            Token::KwSizeof => {
                self.bump();
                if self.looks_like_type_name_in_parens() {
                    self.bump();
                    let ty = self.parse_type_name()?;
                    self.expect(Token::RParen)?;
                    Ok(Expr::SizeofType(ty))
                } else {
                    let operand = self.parse_unary_expr()?;
                    Ok(Expr::SizeofExpr(Box::new(operand)))
                }
            }
            Token::KwAlignof => {
                self.bump();
                self.expect(Token::LParen)?;
                let ty = self.parse_type_name()?;
                self.expect(Token::RParen)?;
                Ok(Expr::AlignofType(ty))
            }
            _ => self.parse_postfix_expr(),
        }
    }

    fn parse_postfix_expr(&mut self) -> Result<Expr> {
        let mut e = self.parse_primary_expr()?;
        loop {
            match self.peek() {
                Token::LBracket => {
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(Token::RBracket)?;
                    e = Expr::Index { base: Box::new(e), index: Box::new(index) };
                }
                Token::LParen => {
                    self.bump();
                    let mut args = Vec::new();
                    if !self.at(Token::RParen) {
                        loop {
                            args.push(self.parse_assignment_expr()?);
                            if !self.eat(Token::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(Token::RParen)?;
                    e = Expr::Call { callee: Box::new(e), args };
                }
                Token::Dot => {
                    self.bump();
                    let name = self.expect_ident()?;
                    e = Expr::Member { base: Box::new(e), name };
                }
                Token::Arrow => {
                    self.bump();
                    let name = self.expect_ident()?;
                    e = Expr::Arrow { base: Box::new(e), name };
                }
                Token::PlusPlus => {
                    self.bump();
                    e = Expr::PostfixOp { op: Symbol::intern("++"), operand: Box::new(e) };
                }
                Token::MinusMinus => {
                    self.bump();
                    e = Expr::PostfixOp { op: Symbol::intern("--"), operand: Box::new(e) };
                }
                _ => break,
            }
        }
        Ok(e)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr> {
        match self.peek() {
            Token::Ident(name) => {
                self.bump();
                Ok(Expr::Ident(name))
            }
            Token::PpNumber(text) => {
                self.bump();
                Ok(classify_number(text))
            }
            Token::StringLiteral(_, text) => {
                self.bump();
                Ok(Expr::Str(text))
            }
            Token::CharConstant(_, text) => {
                self.bump();
                Ok(Expr::Char(text))
            }
            Token::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            Token::KwGeneric => self.parse_generic_selection(),
            other => Err(Error::InvalidGrammar(format!("expected an expression, found {other:?}"))),
        }
    }

    fn parse_generic_selection(&mut self) -> Result<Expr> {
        self.expect(Token::KwGeneric)?;
        self.expect(Token::LParen)?;
        let controlling = self.parse_assignment_expr()?;
        self.expect(Token::Comma)?;
        let mut assocs = Vec::new();
        loop {
            if self.eat(Token::KwDefault) {
                self.expect(Token::Colon)?;
                let e = self.parse_assignment_expr()?;
                assocs.push((None, e));
            } else {
                let ty = self.parse_type_name()?;
                self.expect(Token::Colon)?;
                let e = self.parse_assignment_expr()?;
                assocs.push((Some(ty), e));
            }
            if !self.eat(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(Expr::Generic { controlling: Box::new(controlling), assocs })
    }

    // --- initializers ---

    pub(crate) fn parse_initializer(&mut self) -> Result<Initializer> {
        if self.eat(Token::LBrace) {
            let mut items = Vec::new();
            while !self.at(Token::RBrace) {
                let mut designators = Vec::new();
                loop {
                    if self.eat(Token::LBracket) {
                        let index = self.parse_assignment_expr()?;
                        self.expect(Token::RBracket)?;
                        designators.push(Designator::Index(index));
                    } else if self.eat(Token::Dot) {
                        let name = self.expect_ident()?;
                        designators.push(Designator::Member(name));
                    } else {
                        break;
                    }
                }
                if !designators.is_empty() {
                    self.expect(Token::Eq)?;
                }
                let inner = self.parse_initializer()?;
                items.push((designators, inner));
                if !self.eat(Token::Comma) {
                    break;
                }
            }
            self.expect(Token::RBrace)?;
            Ok(Initializer::List(items))
        } else {
            Ok(Initializer::Expr(self.parse_assignment_expr()?))
        }
    }

    pub(crate) fn materialize_initializer(&mut self, parent: NodeId, init: &Initializer) -> NodeId {
        match init {
            Initializer::Expr(e) => {
                let node = self.new_node(parent, NodeKind::Initializer);
                self.materialize_expr(node, e);
                node
            }
            Initializer::List(items) => {
                let list = self.new_node(parent, NodeKind::InitializerList);
                for (designators, inner) in items {
                    if designators.is_empty() {
                        self.materialize_initializer(list, inner);
                    } else {
                        let d = self.new_node(list, NodeKind::DesignatedInitializer);
                        for designator in designators {
                            match designator {
                                Designator::Index(e) => {
                                    self.materialize_expr(d, e);
                                }
                                Designator::Member(name) => {
                                    self.new_node(d, NodeKind::Identifier(*name));
                                }
                            }
                        }
                        self.materialize_initializer(d, inner);
                    }
                }
                list
            }
        }
    }

    // --- materialization: intermediate value -> real AST subtree ---

    pub(crate) fn materialize_expr(&mut self, parent: NodeId, expr: &Expr) -> NodeId {
        match expr {
            Expr::Integer(text) => self.new_node(parent, NodeKind::Integer { text: *text }),
            Expr::Floating(text) => self.new_node(parent, NodeKind::FloatingLiteral { text: *text }),
            Expr::Str(text) => self.new_node(parent, NodeKind::StringLiteral { text: *text }),
            Expr::Char(text) => self.new_node(parent, NodeKind::CharConstant { text: *text }),
            Expr::Ident(name) => self.new_node(parent, NodeKind::Identifier(*name)),
            Expr::Paren(inner) => {
                let node = self.new_node(parent, NodeKind::ParenExpr);
                self.materialize_expr(node, inner);
                node
            }
            Expr::Unary { op, operand } => {
                let node = self.new_node(parent, NodeKind::UnaryExpr { op: *op });
                self.materialize_expr(node, operand);
                node
            }
            Expr::PostfixOp { op, operand } => {
                let node = self.new_node(parent, NodeKind::PostfixExpr { op: *op });
                self.materialize_expr(node, operand);
                node
            }
            Expr::Binary { op, lhs, rhs } => {
                let node = self.new_node(parent, NodeKind::BinaryExpr { op: *op });
                self.materialize_expr(node, lhs);
                self.materialize_expr(node, rhs);
                node
            }
            Expr::Assign { op, lhs, rhs } => {
                let node = self.new_node(parent, NodeKind::AssignExpr { op: *op });
                self.materialize_expr(node, lhs);
                self.materialize_expr(node, rhs);
                node
            }
            Expr::Conditional { cond, then_branch, else_branch } => {
                let node = self.new_node(parent, NodeKind::ConditionalExpr);
                self.materialize_expr(node, cond);
                self.materialize_expr(node, then_branch);
                self.materialize_expr(node, else_branch);
                node
            }
            Expr::Comma(items) => {
                let node = self.new_node(parent, NodeKind::CommaExpr);
                for item in items {
                    self.materialize_expr(node, item);
                }
                node
            }
            Expr::Cast { ty, operand } => {
                let node = self.new_node(parent, NodeKind::CastExpr);
                self.materialize_type_name(node, ty);
                self.materialize_expr(node, operand);
                node
            }
            Expr::SizeofExpr(operand) => {
                let node = self.new_node(parent, NodeKind::SizeofExpr);
                self.materialize_expr(node, operand);
                node
            }
            Expr::SizeofType(ty) => {
                let node = self.new_node(parent, NodeKind::SizeofType);
                self.materialize_type_name(node, ty);
                node
            }
            Expr::AlignofType(ty) => {
                let node = self.new_node(parent, NodeKind::AlignofType);
                self.materialize_type_name(node, ty);
                node
            }
            Expr::Call { callee, args } => {
                let node = self.new_node(parent, NodeKind::CallExpr);
                self.materialize_expr(node, callee);
                for arg in args {
                    self.materialize_expr(node, arg);
                }
                node
            }
            Expr::Index { base, index } => {
                let node = self.new_node(parent, NodeKind::IndexExpr);
                self.materialize_expr(node, base);
                self.materialize_expr(node, index);
                node
            }
            Expr::Member { base, name } => {
                let node = self.new_node(parent, NodeKind::MemberExpr { member: *name });
                self.materialize_expr(node, base);
                node
            }
            Expr::Arrow { base, name } => {
                let node = self.new_node(parent, NodeKind::ArrowExpr { member: *name });
                self.materialize_expr(node, base);
                node
            }
            Expr::Generic { controlling, assocs } => {
                let node = self.new_node(parent, NodeKind::GenericSelection);
                self.materialize_expr(node, controlling);
                for (ty, e) in assocs {
                    let assoc = self.new_node(node, NodeKind::GenericAssoc);
                    if let Some(ty) = ty {
                        self.materialize_type_name(assoc, ty);
                    }
                    self.materialize_expr(assoc, e);
                }
                node
            }
            Expr::CompoundLiteral { ty, init } => {
                let node = self.new_node(parent, NodeKind::CompoundLiteral);
                self.materialize_type_name(node, ty);
                self.materialize_initializer(node, init);
                node
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_util::Span;

    fn parser_over(mut tokens: Vec<Token>) -> Parser {
        tokens.push(Token::Eof);
        Parser::from_tokens(tokens)
    }

    fn root_node(p: &mut Parser) -> NodeId {
        p.ast.insert_root(NodeKind::TranslationUnit, Span::DUMMY)
    }

    #[test]
    fn additive_is_left_associative() {
        // 1 - 2 - 3
        let mut p = parser_over(vec![
            Token::PpNumber(Symbol::intern("1")),
            Token::Minus,
            Token::PpNumber(Symbol::intern("2")),
            Token::Minus,
            Token::PpNumber(Symbol::intern("3")),
        ]);
        let expr = p.parse_expr().unwrap();
        match expr {
            Expr::Binary { op, rhs, .. } => {
                assert_eq!(op.as_str(), "-");
                assert!(matches!(*rhs, Expr::Integer(_)));
            }
            _ => panic!("expected a binary expression"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        // 1 + 2 * 3
        let mut p = parser_over(vec![
            Token::PpNumber(Symbol::intern("1")),
            Token::Plus,
            Token::PpNumber(Symbol::intern("2")),
            Token::Star,
            Token::PpNumber(Symbol::intern("3")),
        ]);
        let expr = p.parse_expr().unwrap();
        match expr {
            Expr::Binary { op, rhs, .. } => {
                assert_eq!(op.as_str(), "+");
                assert!(matches!(*rhs, Expr::Binary { .. }));
            }
            _ => panic!("expected a binary expression"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        // a = b = 1
        let mut p = parser_over(vec![
            Token::Ident(Symbol::intern("a")),
            Token::Eq,
            Token::Ident(Symbol::intern("b")),
            Token::Eq,
            Token::PpNumber(Symbol::intern("1")),
        ]);
        let expr = p.parse_assignment_expr().unwrap();
        match expr {
            Expr::Assign { rhs, .. } => assert!(matches!(*rhs, Expr::Assign { .. })),
            _ => panic!("expected an assignment"),
        }
    }

    #[test]
    fn pp_number_with_dot_is_floating() {
        assert!(matches!(classify_number(Symbol::intern("1.5")), Expr::Floating(_)));
        assert!(matches!(classify_number(Symbol::intern("42")), Expr::Integer(_)));
        assert!(matches!(classify_number(Symbol::intern("0x2ap3")), Expr::Floating(_)));
        assert!(matches!(classify_number(Symbol::intern("0x2a")), Expr::Integer(_)));
    }

    #[test]
    fn materializes_a_binary_expression_tree() {
        let mut p = parser_over(vec![
            Token::PpNumber(Symbol::intern("1")),
            Token::Plus,
            Token::PpNumber(Symbol::intern("2")),
        ]);
        let root = root_node(&mut p);
        let node = p.parse_expression(root).unwrap();
        assert_eq!(p.ast.child_count(node), 2);
        assert!(matches!(p.ast.kind(node), NodeKind::BinaryExpr { .. }));
    }

    #[test]
    fn sizeof_type_vs_sizeof_expr() {
        let mut p = parser_over(vec![Token::KwSizeof, Token::LParen, Token::KwInt, Token::RParen]);
        assert!(matches!(p.parse_expr().unwrap(), Expr::SizeofType(_)));

        let mut p = parser_over(vec![Token::KwSizeof, Token::Ident(Symbol::intern("x"))]);
        assert!(matches!(p.parse_expr().unwrap(), Expr::SizeofExpr(_)));
    }
}

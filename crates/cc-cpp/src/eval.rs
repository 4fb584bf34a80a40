//! `#if`/`#elif` constant-expression evaluation (spec.md §4.2.4), grounded
//! on `original_source/src/cpp/scanner.c`'s `eval_expr` operator table.
//!
//! `defined`/`__has_include`/`__has_c_attribute` are resolved before macro
//! expansion touches the line, exactly like the original recognizes them
//! as pseudo-operators rather than ordinary identifiers. The remaining
//! tokens are macro-expanded, then parsed by a precedence-climbing
//! recursive descent over the table in §4.2.4 - the same operator/
//! precedence grouping the original's shunting-yard produces, built
//! directly into an expression tree instead of an RPN vector so that the
//! untaken branch of `?:` (and of `&&`/`||`) is never evaluated, matching
//! "evaluation strips the untaken branch from the RPN stream".

use std::path::Path;

use cc_lex::Token;
use cc_util::{Error, Result, Symbol};

use crate::pp_token::PpToken;
use crate::Preprocessor;

/// A 64-bit `#if` value with its signedness, per spec.md §4.2.4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Value {
    bits: u64,
    signed: bool,
}

impl Value {
    fn signed(v: i64) -> Self {
        Self { bits: v as u64, signed: true }
    }

    fn unsigned(v: u64) -> Self {
        Self { bits: v, signed: false }
    }

    fn as_i64(self) -> i64 {
        self.bits as i64
    }

    fn truthy(self) -> bool {
        self.bits != 0
    }

    /// Usual arithmetic conversion: if either operand is unsigned, both
    /// are compared/operated on as unsigned.
    fn common_signedness(a: Value, b: Value) -> bool {
        a.signed && b.signed
    }
}

enum Expr {
    Const(Value),
    Unary(Token, Box<Expr>),
    Binary(Token, Box<Expr>, Box<Expr>),
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Preprocessor {
    /// Evaluates a `#if`/`#elif` directive line's remainder, returning
    /// whether the branch should be taken.
    pub(crate) fn eval_if_condition(&mut self, rest: &[PpToken], dir: &Path) -> Result<bool> {
        let resolved = self.resolve_if_pseudo_ops(rest, dir)?;
        let expanded = self.expand_argument(&resolved)?;
        let finalized = finalize_identifiers(&expanded);
        let mut parser = ExprParser { toks: &finalized, pos: 0 };
        let expr = parser.parse_cond()?;
        if parser.pos != finalized.len() {
            return Err(Error::InvalidDirective("trailing tokens in #if expression".into()));
        }
        Ok(eval_expr(&expr)?.truthy())
    }

    /// Replaces `defined IDENT`/`defined(IDENT)`, `__has_include(...)`,
    /// and `__has_c_attribute(...)` with their `0`/`1` numeric results,
    /// left to right, before anything is macro-expanded.
    fn resolve_if_pseudo_ops(&self, toks: &[PpToken], dir: &Path) -> Result<Vec<PpToken>> {
        let mut out = Vec::with_capacity(toks.len());
        let mut i = 0;
        while i < toks.len() {
            let t = toks[i];
            match t.ident_symbol().map(|s| s.as_str()) {
                Some("defined") => {
                    let (name, consumed) = parse_defined_operand(&toks[i + 1..])?;
                    out.push(number_token(t, if self.macros.is_defined(name) { "1" } else { "0" }));
                    i += 1 + consumed;
                }
                Some("__has_include") => {
                    let (header, consumed) = parse_parenthesized_header(&toks[i + 1..])?;
                    let found = self.resolve_include_path(&header, dir).is_some();
                    out.push(number_token(t, if found { "1" } else { "0" }));
                    i += 1 + consumed;
                }
                Some("__has_c_attribute") => {
                    let (name, consumed) = parse_defined_operand(&toks[i + 1..])?;
                    out.push(number_token(t, if is_standard_attribute(name.as_str()) { "202311L" } else { "0" }));
                    i += 1 + consumed;
                }
                _ => {
                    out.push(t);
                    i += 1;
                }
            }
        }
        Ok(out)
    }
}

fn number_token(at: PpToken, text: &str) -> PpToken {
    let mut tok = PpToken::new(Token::PpNumber(Symbol::intern(text)), at.span);
    tok.is_first = at.is_first;
    tok
}

/// Parses `IDENT` or `( IDENT )` right after `defined`/`__has_c_attribute`.
/// Returns the identifier and how many tokens (not counting the keyword
/// itself) were consumed.
fn parse_defined_operand(rest: &[PpToken]) -> Result<(Symbol, usize)> {
    match rest.first() {
        Some(t) if t.token == Token::LParen => {
            let name = rest.get(1).and_then(|t| t.ident_symbol()).ok_or_else(|| Error::InvalidDirective("expected identifier".into()))?;
            match rest.get(2) {
                Some(t) if t.token == Token::RParen => Ok((name, 3)),
                _ => Err(Error::InvalidDirective("expected ')' after defined(IDENT".into())),
            }
        }
        Some(t) => {
            let name = t.ident_symbol().ok_or_else(|| Error::InvalidDirective("expected identifier after 'defined'".into()))?;
            Ok((name, 1))
        }
        None => Err(Error::InvalidDirective("expected identifier after 'defined'".into())),
    }
}

/// Parses `( "header.h" )` or `( <header.h> )` for `__has_include`.
fn parse_parenthesized_header(rest: &[PpToken]) -> Result<(String, usize)> {
    if rest.first().map(|t| t.token) != Some(Token::LParen) {
        return Err(Error::InvalidDirective("expected '(' after __has_include".into()));
    }
    let mut i = 1;
    let mut text = String::new();
    let angled = rest.get(i).map(|t| t.token) == Some(Token::Lt);
    if angled {
        i += 1;
        loop {
            match rest.get(i).map(|t| t.token) {
                Some(Token::Gt) => {
                    i += 1;
                    break;
                }
                Some(_) => {
                    text.push_str(&crate::pp_token::spelling(&rest[i].token));
                    i += 1;
                }
                None => return Err(Error::InvalidDirective("unterminated <header> in __has_include".into())),
            }
        }
    } else {
        match rest.get(i) {
            Some(t) => {
                if let Token::StringLiteral(_, s) = t.token {
                    text = s.as_str().to_string();
                    i += 1;
                } else {
                    return Err(Error::InvalidDirective("expected header name in __has_include".into()));
                }
            }
            None => return Err(Error::InvalidDirective("expected header name in __has_include".into())),
        }
    }
    match rest.get(i).map(|t| t.token) {
        Some(Token::RParen) => Ok((text, i + 1)),
        _ => Err(Error::InvalidDirective("expected ')' after __has_include(...)".into())),
    }
}

fn is_standard_attribute(name: &str) -> bool {
    matches!(
        name,
        "deprecated" | "fallthrough" | "maybe_unused" | "nodiscard" | "noreturn" | "_Noreturn" | "reproducible" | "unsequenced"
    )
}

/// After macro expansion, any surviving identifier is `0`, except the
/// `true`/`false` keyword tokens, which are `1`/`0` respectively.
fn finalize_identifiers(toks: &[PpToken]) -> Vec<PpToken> {
    toks.iter()
        .map(|t| match t.token {
            Token::Ident(_) => number_token(*t, "0"),
            Token::KwTrue => number_token(*t, "1"),
            Token::KwFalse => number_token(*t, "0"),
            _ => *t,
        })
        .collect()
}

struct ExprParser<'a> {
    toks: &'a [PpToken],
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<Token> {
        self.toks.get(self.pos).map(|t| t.token)
    }

    fn bump(&mut self) -> Option<PpToken> {
        let t = self.toks.get(self.pos).copied();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    /// `cond ::= binary(10) ('?' cond ':' cond)?` - right-associative, per
    /// spec.md's precedence table (`?` prec 11, `:` prec 12 right-assoc).
    fn parse_cond(&mut self) -> Result<Expr> {
        let cond = self.parse_binary(10)?;
        if self.peek() == Some(Token::Question) {
            self.bump();
            let then_branch = self.parse_cond()?;
            if self.bump().map(|t| t.token) != Some(Token::Colon) {
                return Err(Error::InvalidDirective("expected ':' in '?:' expression".into()));
            }
            let else_branch = self.parse_cond()?;
            return Ok(Expr::Cond(Box::new(cond), Box::new(then_branch), Box::new(else_branch)));
        }
        Ok(cond)
    }

    fn parse_binary(&mut self, level: u8) -> Result<Expr> {
        if level == 0 {
            return self.parse_unary();
        }
        let mut lhs = self.parse_binary(level - 1)?;
        while let Some(op) = self.peek().filter(|t| binary_level(*t) == Some(level)) {
            self.bump();
            let rhs = self.parse_binary(level - 1)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// `unary ::= ('-' | '~' | '!') unary | primary` (prec 0).
    fn parse_unary(&mut self) -> Result<Expr> {
        if let Some(op @ (Token::Minus | Token::Tilde | Token::Bang | Token::Plus)) = self.peek() {
            self.bump();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(op, Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let tok = self.bump().ok_or_else(|| Error::InvalidDirective("unexpected end of #if expression".into()))?;
        match tok.token {
            Token::LParen => {
                let inner = self.parse_cond()?;
                if self.bump().map(|t| t.token) != Some(Token::RParen) {
                    return Err(Error::InvalidDirective("expected ')' in #if expression".into()));
                }
                Ok(inner)
            }
            Token::PpNumber(s) => Ok(Expr::Const(parse_integer_value(s.as_str())?)),
            Token::CharConstant(_, s) => Ok(Expr::Const(char_constant_value(s.as_str())?)),
            other => Err(Error::InvalidDirective(format!("unexpected token '{}' in #if expression", crate::pp_token::spelling(&other)))),
        }
    }
}

fn binary_level(tok: Token) -> Option<u8> {
    use Token::*;
    Some(match tok {
        Star | Slash | Percent => 1,
        Plus | Minus => 2,
        LtLt | GtGt => 3,
        Lt | LtEq | Gt | GtEq => 4,
        EqEq | BangEq => 5,
        Amp => 6,
        Caret => 7,
        Pipe => 8,
        AmpAmp => 9,
        PipePipe => 10,
        _ => return None,
    })
}

fn eval_expr(expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Const(v) => Ok(*v),
        Expr::Unary(op, e) => {
            let v = eval_expr(e)?;
            Ok(match op {
                Token::Minus => if v.signed { Value::signed(v.as_i64().wrapping_neg()) } else { Value::unsigned(v.bits.wrapping_neg()) },
                Token::Plus => v,
                Token::Tilde => if v.signed { Value::signed(!v.as_i64()) } else { Value::unsigned(!v.bits) },
                Token::Bang => Value::signed(i64::from(!v.truthy())),
                _ => unreachable!(),
            })
        }
        Expr::Cond(c, t, f) => {
            if eval_expr(c)?.truthy() {
                eval_expr(t)
            } else {
                eval_expr(f)
            }
        }
        Expr::Binary(Token::AmpAmp, l, r) => Ok(Value::signed(i64::from(eval_expr(l)?.truthy() && eval_expr(r)?.truthy()))),
        Expr::Binary(Token::PipePipe, l, r) => Ok(Value::signed(i64::from(eval_expr(l)?.truthy() || eval_expr(r)?.truthy()))),
        Expr::Binary(op, l, r) => eval_binary(*op, eval_expr(l)?, eval_expr(r)?),
    }
}

fn eval_binary(op: Token, a: Value, b: Value) -> Result<Value> {
    let unsigned = !Value::common_signedness(a, b);
    let wrap = |bits: u64| if unsigned { Value::unsigned(bits) } else { Value::signed(bits as i64) };

    Ok(match op {
        Token::Star => wrap(a.bits.wrapping_mul(b.bits)),
        Token::Slash => {
            if b.bits == 0 {
                return Err(Error::InvalidDirective("division by zero in #if expression".into()));
            }
            if unsigned {
                Value::unsigned(a.bits / b.bits)
            } else {
                Value::signed(a.as_i64().wrapping_div(b.as_i64()))
            }
        }
        Token::Percent => {
            if b.bits == 0 {
                return Err(Error::InvalidDirective("modulus by zero in #if expression".into()));
            }
            if unsigned {
                Value::unsigned(a.bits % b.bits)
            } else {
                Value::signed(a.as_i64().wrapping_rem(b.as_i64()))
            }
        }
        Token::Plus => wrap(a.bits.wrapping_add(b.bits)),
        Token::Minus => wrap(a.bits.wrapping_sub(b.bits)),
        Token::LtLt => {
            let shift = b.bits as u32;
            wrap(if shift >= 64 { 0 } else { a.bits << shift })
        }
        Token::GtGt => {
            let shift = b.bits as u32;
            if unsigned {
                Value::unsigned(if shift >= 64 { 0 } else { a.bits >> shift })
            } else {
                Value::signed(if shift >= 64 {
                    if a.as_i64() < 0 { -1 } else { 0 }
                } else {
                    a.as_i64() >> shift
                })
            }
        }
        Token::Lt | Token::LtEq | Token::Gt | Token::GtEq | Token::EqEq | Token::BangEq => {
            let result = if op == Token::EqEq {
                a.bits == b.bits
            } else if op == Token::BangEq {
                a.bits != b.bits
            } else if unsigned {
                match op {
                    Token::Lt => a.bits < b.bits,
                    Token::LtEq => a.bits <= b.bits,
                    Token::Gt => a.bits > b.bits,
                    _ => a.bits >= b.bits,
                }
            } else {
                match op {
                    Token::Lt => a.as_i64() < b.as_i64(),
                    Token::LtEq => a.as_i64() <= b.as_i64(),
                    Token::Gt => a.as_i64() > b.as_i64(),
                    _ => a.as_i64() >= b.as_i64(),
                }
            };
            Value::signed(i64::from(result))
        }
        Token::Amp => wrap(a.bits & b.bits),
        Token::Caret => wrap(a.bits ^ b.bits),
        Token::Pipe => wrap(a.bits | b.bits),
        _ => unreachable!("not a #if binary operator"),
    })
}

/// Parses a pp-number lexeme as a `#if` integer constant. Floating
/// constants (a `.` or binary/decimal exponent) are out of scope for
/// constant-expression evaluation (C23 6.10.1p1 disallows them).
fn parse_integer_value(text: &str) -> Result<Value> {
    let lower = text.to_ascii_lowercase();
    if lower.contains('.') || (!lower.starts_with("0x") && lower.contains('e')) || lower.contains('p') {
        return Err(Error::NotSupported(format!("floating constant '{text}' in #if expression")));
    }

    let (digits, radix) = if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        (rest, 2)
    } else if text.starts_with('0') && text.len() > 1 {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    let mut end = digits.len();
    while end > 0 && matches!(digits.as_bytes()[end - 1], b'u' | b'U' | b'l' | b'L') {
        end -= 1;
    }
    let (num_part, suffix) = digits.split_at(end);
    if num_part.is_empty() {
        return Err(Error::InvalidLex(format!("invalid integer constant '{text}'")));
    }
    let cleaned: String = num_part.chars().filter(|&c| c != '\'').collect();
    let unsigned = suffix.contains(['u', 'U']);
    let value = u64::from_str_radix(&cleaned, radix).map_err(|_| Error::InvalidLex(format!("invalid integer constant '{text}'")))?;
    Ok(if unsigned { Value::unsigned(value) } else { Value::signed(value as i64) })
}

/// Numeric value of a character constant (C23 6.4.4.4): the codepoint of
/// its single character. Multi-character constants have implementation-
/// defined value in standard C and are rejected here (see DESIGN.md).
fn char_constant_value(decoded: &str) -> Result<Value> {
    let mut chars = decoded.chars();
    let first = chars.next().ok_or_else(|| Error::InvalidLex("empty character constant".into()))?;
    if chars.next().is_some() {
        return Err(Error::NotSupported("multi-character character constant in #if expression".into()));
    }
    Ok(Value::signed(first as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use cc_lex::Token;
    use cc_util::Span;

    fn tok(t: Token) -> PpToken {
        PpToken::new(t, Span::DUMMY)
    }

    fn num(s: &str) -> PpToken {
        tok(Token::PpNumber(Symbol::intern(s)))
    }

    fn punct(t: Token) -> PpToken {
        tok(t)
    }

    fn eval(pp: &mut Preprocessor, line: &[PpToken]) -> bool {
        pp.eval_if_condition(line, Path::new(".")).unwrap()
    }

    #[test]
    fn arithmetic_and_comparison() {
        let mut pp = Preprocessor::new(Config::default());
        assert!(eval(&mut pp, &[num("2"), punct(Token::Star), num("3"), punct(Token::EqEq), num("6")]));
    }

    #[test]
    fn ternary_picks_the_taken_branch() {
        let mut pp = Preprocessor::new(Config::default());
        let line = vec![num("1"), punct(Token::Question), num("2"), punct(Token::Colon), num("3")];
        let mut parser = ExprParser { toks: &finalize_identifiers(&line), pos: 0 };
        let expr = parser.parse_cond().unwrap();
        assert_eq!(eval_expr(&expr).unwrap().as_i64(), 2);

        let line = vec![num("0"), punct(Token::Question), num("2"), punct(Token::Colon), num("3")];
        let mut parser = ExprParser { toks: &finalize_identifiers(&line), pos: 0 };
        let expr = parser.parse_cond().unwrap();
        assert_eq!(eval_expr(&expr).unwrap().as_i64(), 3);
    }

    #[test]
    fn negative_shift_left_is_signed() {
        let line = vec![punct(Token::Minus), num("1"), punct(Token::LtLt), num("1")];
        let mut parser = ExprParser { toks: &finalize_identifiers(&line), pos: 0 };
        let expr = parser.parse_cond().unwrap();
        assert_eq!(eval_expr(&expr).unwrap().as_i64(), -2);
    }

    #[test]
    fn unsigned_right_shift_clears_high_bit() {
        let line = vec![
            punct(Token::LParen),
            punct(Token::Minus),
            num("1u"),
            punct(Token::RParen),
            punct(Token::GtGt),
            num("1"),
        ];
        let mut parser = ExprParser { toks: &finalize_identifiers(&line), pos: 0 };
        let expr = parser.parse_cond().unwrap();
        let v = eval_expr(&expr).unwrap();
        assert!(!v.signed);
        assert_eq!(v.bits >> 63, 0);
    }

    #[test]
    fn defined_is_resolved_before_expansion() {
        let mut pp = Preprocessor::new(Config::default());
        pp.macros.define(crate::macro_table::Macro::object_like(Symbol::intern("FOO"), vec![num("1")])).unwrap();
        let line = vec![tok(Token::Ident(Symbol::intern("defined"))), tok(Token::Ident(Symbol::intern("FOO")))];
        assert!(eval(&mut pp, &line));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let mut pp = Preprocessor::new(Config::default());
        let line = vec![num("1"), punct(Token::Slash), num("0")];
        assert!(pp.eval_if_condition(&line, Path::new(".")).is_err());
    }
}

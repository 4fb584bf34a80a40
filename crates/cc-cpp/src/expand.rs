//! Macro expansion (spec.md §4.2.1), grounded on
//! `original_source/src/cpp/scanner.c`'s expansion driver.
//!
//! The expansion "stream" is one flat queue mixing real tokens with
//! *sentinels* that mark where a macro's substituted replacement ends.
//! Popping a sentinel removes that macro's name from `macro_stack`, so an
//! invocation spanning the boundary between two macros' replacement
//! lists (the classic `#define f(a) a*g` / `#define g(a) f(a)` / `f(2)(9)`
//! case) just works: by the time the scanner reaches the `(9)`, `g`'s
//! replacement tokens are already further down this same queue. No
//! top-level "partial expansion" signal is needed for that case.
//!
//! [`Error::Partial`] is used for exactly one narrower thing: pre-expanding
//! a collected macro argument on its own bounded, fresh sub-queue. If that
//! sub-expansion's search for a function-like macro's `(...)` runs off the
//! end of the argument's own tokens, the identifier and whatever was
//! collected so far are pushed back unexpanded rather than the error
//! escaping - matching `Error::Partial`'s doc comment that it must never
//! reach the top-level loop.

use cc_containers::Queue;
use cc_lex::Token;
use cc_util::{Result, Symbol};

use crate::macro_table::{Dynamic, Macro};
use crate::paste::paste_two;
use crate::pp_token::PpToken;
use crate::Preprocessor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SentinelId(u32);

#[derive(Clone, Copy, Debug)]
pub(crate) enum StreamItem {
    Token(PpToken),
    Sentinel(SentinelId),
}

#[derive(Clone, Copy)]
enum ParamRef {
    Named(usize),
    VaArgs,
}

#[derive(Clone, Copy)]
enum SubstTok {
    Real(PpToken),
    Placemarker,
}

struct SubstArgs {
    raw: Vec<Vec<PpToken>>,
    expanded: Vec<Vec<PpToken>>,
    named_count: usize,
    is_variadic: bool,
}

impl SubstArgs {
    fn raw_for(&self, r: ParamRef) -> &[PpToken] {
        match r {
            ParamRef::Named(i) => &self.raw[i],
            ParamRef::VaArgs => &self.raw[self.named_count],
        }
    }

    fn expanded_for(&self, r: ParamRef) -> &[PpToken] {
        match r {
            ParamRef::Named(i) => &self.expanded[i],
            ParamRef::VaArgs => &self.expanded[self.named_count],
        }
    }

    fn variadic_nonempty(&self) -> bool {
        self.is_variadic && !self.raw[self.named_count].is_empty()
    }
}

impl Preprocessor {
    fn alloc_sentinel(&mut self) -> SentinelId {
        self.sentinel_seq += 1;
        SentinelId(self.sentinel_seq)
    }

    /// Fully macro-expands a bounded slice of tokens in isolation - used
    /// both for pre-expanding a collected argument and for expanding the
    /// tokens of a `#if`/`#include` directive's remainder.
    pub(crate) fn expand_argument(&mut self, raw: &[PpToken]) -> Result<Vec<PpToken>> {
        let saved_stack = std::mem::take(&mut self.macro_stack);
        let boundary = self.alloc_sentinel();
        let mut stream: Queue<StreamItem> = raw.iter().map(|t| StreamItem::Token(*t)).collect();
        stream.push_back(StreamItem::Sentinel(boundary));
        let mut out = Vec::new();
        let result = self.run(&mut stream, &mut out, Some(boundary));
        self.macro_stack = saved_stack;
        result?;
        Ok(out)
    }

    /// Drains `stream` completely, fully macro-expanding its contents into
    /// `out`. `boundary`, when given, stops the loop as soon as that
    /// sentinel is popped rather than requiring the stream to go empty.
    pub(crate) fn run(&mut self, stream: &mut Queue<StreamItem>, out: &mut Vec<PpToken>, boundary: Option<SentinelId>) -> Result<()> {
        loop {
            match stream.pop_front() {
                None => return Ok(()),
                Some(StreamItem::Sentinel(id)) => {
                    self.macro_stack.pop();
                    if Some(id) == boundary {
                        return Ok(());
                    }
                }
                Some(StreamItem::Token(tok)) => {
                    self.step(tok, stream, out)?;
                }
            }
        }
    }

    fn step(&mut self, tok: PpToken, stream: &mut Queue<StreamItem>, out: &mut Vec<PpToken>) -> Result<()> {
        let Some(name) = tok.ident_symbol() else {
            out.push(tok);
            return Ok(());
        };
        if tok.marked || self.macro_stack.contains(&name) {
            out.push(tok.marked());
            return Ok(());
        }
        let Some(mac) = self.macros.get(name).cloned() else {
            out.push(tok);
            return Ok(());
        };

        if let Some(kind) = mac.dynamic {
            out.push(self.resolve_dynamic(kind, tok));
            return Ok(());
        }

        if !mac.is_function_like {
            let tokens = self.substitute(&mac, Vec::new())?;
            self.enter_expansion(stream, name, tokens);
            return Ok(());
        }

        match peek_first_token(stream) {
            Some(t) if t.token == Token::LParen => match self.collect_invocation(stream, &mac)? {
                Some(args) => {
                    let tokens = self.substitute(&mac, args)?;
                    self.enter_expansion(stream, name, tokens);
                }
                None => out.push(tok),
            },
            _ => out.push(tok),
        }
        Ok(())
    }

    fn enter_expansion(&mut self, stream: &mut Queue<StreamItem>, name: Symbol, tokens: Vec<PpToken>) {
        self.macro_stack.push(name);
        let id = self.alloc_sentinel();
        let mut items: Vec<StreamItem> = tokens.into_iter().map(StreamItem::Token).collect();
        items.push(StreamItem::Sentinel(id));
        for item in items.into_iter().rev() {
            stream.push_front(item);
        }
    }

    /// Consumes the `(`...`)` argument list of a function-like invocation
    /// already known to start at the front of `stream`. Returns `Ok(None)`
    /// (the `Error::Partial` case) if the stream runs out before the
    /// closing `)` is found, after restoring everything consumed.
    fn collect_invocation(&mut self, stream: &mut Queue<StreamItem>, mac: &Macro) -> Result<Option<Vec<Vec<PpToken>>>> {
        let mut consumed: Vec<PpToken> = Vec::new();
        loop {
            match stream.pop_front() {
                Some(StreamItem::Sentinel(_)) => self.macro_stack.pop(),
                Some(StreamItem::Token(t)) => {
                    debug_assert_eq!(t.token, Token::LParen);
                    consumed.push(t);
                    break;
                }
                None => unreachable!("caller already peeked an LParen"),
            };
        }

        let mut args: Vec<Vec<PpToken>> = Vec::new();
        let mut current: Vec<PpToken> = Vec::new();
        let mut depth: i32 = 0;

        loop {
            match stream.pop_front() {
                None => {
                    for t in consumed.into_iter().rev() {
                        stream.push_front(StreamItem::Token(t));
                    }
                    return Ok(None);
                }
                Some(StreamItem::Sentinel(_)) => self.macro_stack.pop(),
                Some(StreamItem::Token(t)) => {
                    consumed.push(t);
                    match t.token {
                        Token::LParen => {
                            depth += 1;
                            current.push(t);
                        }
                        Token::RParen if depth > 0 => {
                            depth -= 1;
                            current.push(t);
                        }
                        Token::RParen => {
                            args.push(std::mem::take(&mut current));
                            break;
                        }
                        Token::Comma if depth == 0 && mac.is_variadic && args.len() >= mac.params.len() => {
                            current.push(t);
                        }
                        Token::Comma if depth == 0 => {
                            args.push(std::mem::take(&mut current));
                        }
                        _ => current.push(t),
                    }
                }
            }
        }

        if mac.params.is_empty() && !mac.is_variadic && args.len() == 1 && args[0].is_empty() {
            args.clear();
        }
        let expected = mac.params.len() + usize::from(mac.is_variadic);
        while args.len() < expected {
            args.push(Vec::new());
        }
        Ok(Some(args))
    }

    /// Substitutes `mac`'s replacement list against `args_raw`
    /// (pre-expanding each argument on a fresh bounded sub-stream first),
    /// performing `#`/`##`/`__VA_OPT__` handling along the way.
    pub(crate) fn substitute(&mut self, mac: &Macro, args_raw: Vec<Vec<PpToken>>) -> Result<Vec<PpToken>> {
        let mut expanded = Vec::with_capacity(args_raw.len());
        for raw in &args_raw {
            expanded.push(self.expand_argument(raw)?);
        }
        let sargs = SubstArgs { raw: args_raw, expanded, named_count: mac.params.len(), is_variadic: mac.is_variadic };
        let substituted = self.substitute_tokens(&mac.replacement, &sargs, mac)?;
        Ok(substituted
            .into_iter()
            .filter_map(|s| match s {
                SubstTok::Real(t) => Some(t),
                SubstTok::Placemarker => None,
            })
            .collect())
    }

    fn substitute_tokens(&self, toks: &[PpToken], args: &SubstArgs, mac: &Macro) -> Result<Vec<SubstTok>> {
        let mut out: Vec<SubstTok> = Vec::new();
        let mut i = 0;
        while i < toks.len() {
            let t = toks[i];
            if t.token == Token::Hash {
                if let Some(pref) = toks.get(i + 1).and_then(|n| param_ref(n, mac)) {
                    let raw = args.raw_for(pref);
                    out.push(SubstTok::Real(stringize(raw, t)));
                    i += 2;
                    continue;
                }
            }
            if t.token == Token::HashHash {
                i += 1;
                let (rhs, consumed) = self.next_unit(&toks[i..], args, mac)?;
                i += consumed;
                append_pasted(&mut out, rhs)?;
                continue;
            }
            if is_va_opt(&t) && matches!(toks.get(i + 1).map(|n| n.token), Some(Token::LParen)) {
                let (inner, consumed) = extract_paren_group(&toks[i + 2..]);
                i += 2 + consumed;
                if args.variadic_nonempty() {
                    out.extend(self.substitute_tokens(inner, args, mac)?);
                } else {
                    out.push(SubstTok::Placemarker);
                }
                continue;
            }
            if let Some(pref) = param_ref(&t, mac) {
                let followed_by_paste = matches!(toks.get(i + 1).map(|n| n.token), Some(Token::HashHash));
                let seq = if followed_by_paste { args.raw_for(pref) } else { args.expanded_for(pref) };
                if seq.is_empty() {
                    out.push(SubstTok::Placemarker);
                } else {
                    out.extend(seq.iter().map(|tok| SubstTok::Real(*tok)));
                }
                i += 1;
                continue;
            }
            out.push(SubstTok::Real(t));
            i += 1;
        }
        Ok(out)
    }

    /// The single substituted unit immediately to the right of a `##`:
    /// either a parameter (raw form, since it is a paste operand), a
    /// `__VA_OPT__(...)` group, or a plain token.
    fn next_unit(&self, toks: &[PpToken], args: &SubstArgs, mac: &Macro) -> Result<(Vec<SubstTok>, usize)> {
        let Some(t) = toks.first().copied() else {
            return Ok((Vec::new(), 0));
        };
        if is_va_opt(&t) && matches!(toks.get(1).map(|n| n.token), Some(Token::LParen)) {
            let (inner, consumed) = extract_paren_group(&toks[2..]);
            let total = 2 + consumed;
            if args.variadic_nonempty() {
                return Ok((self.substitute_tokens(inner, args, mac)?, total));
            }
            return Ok((vec![SubstTok::Placemarker], total));
        }
        if let Some(pref) = param_ref(&t, mac) {
            let raw = args.raw_for(pref);
            if raw.is_empty() {
                return Ok((vec![SubstTok::Placemarker], 1));
            }
            return Ok((raw.iter().map(|tok| SubstTok::Real(*tok)).collect(), 1));
        }
        Ok((vec![SubstTok::Real(t)], 1))
    }

    fn resolve_dynamic(&self, kind: Dynamic, tok: PpToken) -> PpToken {
        match kind {
            Dynamic::File => {
                let name = self.presumed_file.unwrap_or(self.current_file);
                PpToken::new(Token::StringLiteral(cc_lex::StringPrefix::None, name), tok.span)
            }
            Dynamic::Line => {
                let line = (tok.span.line as i64 + self.line_delta).max(0) as u32;
                PpToken::new(Token::PpNumber(Symbol::intern(&line.to_string())), tok.span)
            }
            Dynamic::Date => PpToken::new(Token::StringLiteral(cc_lex::StringPrefix::None, Symbol::intern(&self.build_date)), tok.span),
            Dynamic::Time => PpToken::new(Token::StringLiteral(cc_lex::StringPrefix::None, Symbol::intern(&self.build_time)), tok.span),
        }
    }
}

fn param_ref(t: &PpToken, mac: &Macro) -> Option<ParamRef> {
    let sym = t.ident_symbol()?;
    if mac.is_variadic && sym.eq_str("__VA_ARGS__") {
        return Some(ParamRef::VaArgs);
    }
    mac.params.iter().position(|p| *p == sym).map(ParamRef::Named)
}

fn is_va_opt(t: &PpToken) -> bool {
    t.ident_symbol().is_some_and(|s| s.eq_str("__VA_OPT__"))
}

/// Finds the extent of a parenthesized group whose opening `(` has
/// already been consumed; `toks` starts right after it. Returns the
/// tokens strictly inside the parens and how many tokens (including the
/// closing `)`) were consumed.
fn extract_paren_group(toks: &[PpToken]) -> (&[PpToken], usize) {
    let mut depth = 1;
    for (i, t) in toks.iter().enumerate() {
        match t.token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return (&toks[..i], i + 1);
                }
            }
            _ => {}
        }
    }
    (toks, toks.len())
}

fn peek_first_token(stream: &Queue<StreamItem>) -> Option<PpToken> {
    let mut i = 0;
    loop {
        match *stream.get(i)? {
            StreamItem::Sentinel(_) => i += 1,
            StreamItem::Token(t) => return Some(t),
        }
    }
}

/// `#` stringize (C23 6.10.3.2): join spellings with a single space
/// wherever the original had any whitespace, escape `"`/`\` inside
/// string/char-literal operands, and wrap the result in `"..."`.
fn stringize(raw: &[PpToken], at: PpToken) -> PpToken {
    let mut s = String::new();
    for (i, t) in raw.iter().enumerate() {
        if i > 0 && t.has_white_space {
            s.push(' ');
        }
        let text = crate::pp_token::spelling(&t.token);
        if matches!(t.token, Token::StringLiteral(..) | Token::CharConstant(..)) {
            for c in text.chars() {
                if c == '"' || c == '\\' {
                    s.push('\\');
                }
                s.push(c);
            }
        } else {
            s.push_str(&text);
        }
    }
    PpToken::new(Token::StringLiteral(cc_lex::StringPrefix::None, Symbol::intern(&s)), at.span)
}

/// Pastes the last element already in `out` (or a placemarker, if `out`
/// is empty or itself ends in one) against the first unit of `rhs`;
/// any further units in `rhs` are appended untouched.
fn append_pasted(out: &mut Vec<SubstTok>, rhs: Vec<SubstTok>) -> Result<()> {
    let lhs = out.pop();
    let mut rhs_iter = rhs.into_iter();
    let rhs_first = rhs_iter.next();

    let merged = match (lhs, rhs_first) {
        (None, None) => SubstTok::Placemarker,
        (None, Some(r)) => r,
        (Some(SubstTok::Placemarker), None) => SubstTok::Placemarker,
        (Some(SubstTok::Placemarker), Some(r)) => r,
        (Some(SubstTok::Real(l)), None) => SubstTok::Real(l),
        (Some(SubstTok::Real(l)), Some(SubstTok::Placemarker)) => SubstTok::Real(l),
        (Some(SubstTok::Real(l)), Some(SubstTok::Real(r))) => SubstTok::Real(paste_two(l, r)?),
    };
    out.push(merged);
    out.extend(rhs_iter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macro_table::Macro;
    use crate::Config;
    use cc_util::Span;

    fn ident(s: &str) -> PpToken {
        PpToken::new(Token::Ident(Symbol::intern(s)), Span::DUMMY)
    }

    fn num(s: &str) -> PpToken {
        PpToken::new(Token::PpNumber(Symbol::intern(s)), Span::DUMMY)
    }

    fn punct(t: Token) -> PpToken {
        PpToken::new(t, Span::DUMMY)
    }

    #[test]
    fn object_like_macro_expands() {
        let mut pp = Preprocessor::new(Config::default());
        pp.macros.define(Macro::object_like(Symbol::intern("FOO"), vec![num("42")])).unwrap();
        let out = pp.expand_argument(&[ident("FOO")]).unwrap();
        assert_eq!(out, vec![num("42")]);
    }

    #[test]
    fn self_referential_macro_does_not_recurse() {
        let mut pp = Preprocessor::new(Config::default());
        pp.macros.define(Macro::object_like(Symbol::intern("X"), vec![ident("X"), punct(Token::Plus), num("1")])).unwrap();
        let out = pp.expand_argument(&[ident("X")]).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].token, Token::Ident(Symbol::intern("X")));
        assert!(out[0].marked);
    }

    #[test]
    fn function_like_macro_substitutes_arguments() {
        let mut pp = Preprocessor::new(Config::default());
        pp.macros
            .define(Macro::function_like(
                Symbol::intern("ADD"),
                vec![Symbol::intern("a"), Symbol::intern("b")],
                false,
                vec![ident("a"), punct(Token::Plus), ident("b")],
            ))
            .unwrap();
        let input = vec![ident("ADD"), punct(Token::LParen), num("1"), punct(Token::Comma), num("2"), punct(Token::RParen)];
        let out = pp.expand_argument(&input).unwrap();
        assert_eq!(out, vec![num("1"), punct(Token::Plus), num("2")]);
    }

    #[test]
    fn hash_hash_pastes_adjacent_parameters() {
        let mut pp = Preprocessor::new(Config::default());
        pp.macros
            .define(Macro::function_like(
                Symbol::intern("CAT"),
                vec![Symbol::intern("a"), Symbol::intern("b")],
                false,
                vec![ident("a"), punct(Token::HashHash), ident("b")],
            ))
            .unwrap();
        let input = vec![ident("CAT"), punct(Token::LParen), ident("foo"), punct(Token::Comma), ident("bar"), punct(Token::RParen)];
        let out = pp.expand_argument(&input).unwrap();
        assert_eq!(out, vec![ident("foobar")]);
    }

    #[test]
    fn hash_stringizes_its_argument() {
        let mut pp = Preprocessor::new(Config::default());
        pp.macros
            .define(Macro::function_like(Symbol::intern("STR"), vec![Symbol::intern("a")], false, vec![punct(Token::Hash), ident("a")]))
            .unwrap();
        let input = vec![ident("STR"), punct(Token::LParen), ident("hi"), punct(Token::RParen)];
        let out = pp.expand_argument(&input).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].token, Token::StringLiteral(cc_lex::StringPrefix::None, Symbol::intern("hi")));
    }

    #[test]
    fn invocation_spanning_two_macros_replacement_lists_completes() {
        let mut pp = Preprocessor::new(Config::default());
        pp.macros
            .define(Macro::function_like(Symbol::intern("f"), vec![Symbol::intern("a")], false, vec![ident("a"), punct(Token::Star), ident("g")]))
            .unwrap();
        pp.macros
            .define(Macro::function_like(Symbol::intern("g"), vec![Symbol::intern("a")], false, vec![ident("f"), punct(Token::LParen), ident("a"), punct(Token::RParen)]))
            .unwrap();
        let input = vec![
            ident("f"),
            punct(Token::LParen),
            num("2"),
            punct(Token::RParen),
            punct(Token::LParen),
            num("9"),
            punct(Token::RParen),
        ];
        let out = pp.expand_argument(&input).unwrap();
        assert_eq!(out, vec![num("2"), punct(Token::Star), ident("f"), punct(Token::LParen), num("9"), punct(Token::RParen)]);
    }

    #[test]
    fn zero_parameter_macro_with_empty_parens_takes_no_arguments() {
        let mut pp = Preprocessor::new(Config::default());
        pp.macros.define(Macro::function_like(Symbol::intern("Z"), Vec::new(), false, vec![num("7")])).unwrap();
        let out = pp.expand_argument(&[ident("Z"), punct(Token::LParen), punct(Token::RParen)]).unwrap();
        assert_eq!(out, vec![num("7")]);
    }

    #[test]
    fn variadic_macro_collapses_trailing_commas_into_one_argument() {
        let mut pp = Preprocessor::new(Config::default());
        pp.macros
            .define(Macro::function_like(Symbol::intern("V"), vec![Symbol::intern("a")], true, vec![ident("a"), punct(Token::Comma), ident("__VA_ARGS__")]))
            .unwrap();
        let input = vec![
            ident("V"),
            punct(Token::LParen),
            num("1"),
            punct(Token::Comma),
            num("2"),
            punct(Token::Comma),
            num("3"),
            punct(Token::RParen),
        ];
        let out = pp.expand_argument(&input).unwrap();
        assert_eq!(out, vec![num("1"), punct(Token::Comma), num("2"), punct(Token::Comma), num("3")]);
    }
}

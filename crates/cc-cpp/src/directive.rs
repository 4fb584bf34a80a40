//! Directive dispatch (spec.md §4.2, "Directive dispatch" and §4.2.3),
//! grounded on `original_source/src/cpp/lexer.c`'s directive tokenization
//! and `scanner.c`'s `#include` resolution.

use std::path::{Path, PathBuf};

use cc_lex::Token;
use cc_util::{Error, Result};

use crate::cond::CondStack;
use crate::macro_table::Macro;
use crate::pp_token::PpToken;
use crate::Preprocessor;

impl Preprocessor {
    /// Dispatches one directive line (the tokens after the leading `#`,
    /// not including it). Conditional-inclusion directives are always
    /// recognized, even inside a skip zone, so nesting and `#endif`
    /// matching stay correct; every other directive is dropped while
    /// skipped (spec.md §4.2: "within #if skip zones, only conditional-
    /// inclusion directives are recognized").
    pub(crate) fn handle_directive(&mut self, line: &[PpToken], cond: &mut CondStack, dir: &Path, out: &mut Vec<PpToken>) -> Result<()> {
        let Some(first) = line.first() else {
            return Ok(()); // bare `#` on its own line is a legal no-op
        };
        let name = first.ident_symbol().ok_or_else(|| Error::InvalidDirective("directive name must be an identifier".into()))?;
        let rest = &line[1..];
        let word = name.as_str();

        match word {
            "if" => {
                let v = if cond.is_active() { self.eval_if_condition(rest, dir)? } else { false };
                cond.push_if(v);
                return Ok(());
            }
            "ifdef" => {
                let v = cond.is_active() && self.macros.is_defined(expect_ident(rest, "ifdef")?);
                cond.push_if(v);
                return Ok(());
            }
            "ifndef" => {
                let v = cond.is_active() && !self.macros.is_defined(expect_ident(rest, "ifndef")?);
                cond.push_if(v);
                return Ok(());
            }
            "elif" => {
                let v = if cond.should_evaluate() { self.eval_if_condition(rest, dir)? } else { false };
                return cond.handle_elif(v);
            }
            "elifdef" => {
                let v = cond.should_evaluate() && self.macros.is_defined(expect_ident(rest, "elifdef")?);
                return cond.handle_elif(v);
            }
            "elifndef" => {
                let v = cond.should_evaluate() && !self.macros.is_defined(expect_ident(rest, "elifndef")?);
                return cond.handle_elif(v);
            }
            "else" => return cond.handle_else(),
            "endif" => return cond.pop_endif(),
            _ => {}
        }

        if !cond.is_active() {
            return Ok(());
        }

        match word {
            "define" => self.handle_define(rest),
            "undef" => self.handle_undef(rest),
            "include" => self.handle_include(rest, dir, out),
            "pragma" => Ok(()), // accepted and ignored past macro expansion, per C23
            "line" => self.handle_line(rest),
            "error" => Err(Error::InvalidDirective(format!("#error: {}", line_text(rest)))),
            "warning" => {
                self.handler.warning(format!("#warning: {}", line_text(rest)), first.span);
                Ok(())
            }
            _ => Err(Error::InvalidDirective(format!("unknown directive '#{word}'"))),
        }
    }

    fn handle_define(&mut self, rest: &[PpToken]) -> Result<()> {
        let name = rest.first().and_then(|t| t.ident_symbol()).ok_or_else(|| Error::InvalidDirective("macro name must be an identifier".into()))?;
        let mut i = 1;

        let is_function_like = rest.get(i).is_some_and(|t| t.token == Token::LParen && !t.has_white_space);
        let (params, is_variadic) = if is_function_like {
            i += 1;
            parse_param_list(rest, &mut i)?
        } else {
            (Vec::new(), false)
        };

        let mut replacement: Vec<PpToken> = rest[i..].to_vec();
        if let Some(first_tok) = replacement.first_mut() {
            first_tok.has_white_space = false;
        }
        validate_hash_hash_placement(&replacement)?;
        if is_variadic {
            validate_va_opt_balance(&replacement)?;
        }

        let mac = if is_function_like {
            Macro::function_like(name, params, is_variadic, replacement)
        } else {
            Macro::object_like(name, replacement)
        };
        self.macros.define(mac)
    }

    fn handle_undef(&mut self, rest: &[PpToken]) -> Result<()> {
        let name = expect_ident(rest, "undef")?;
        self.macros.undef(name)
    }

    fn handle_line(&mut self, rest: &[PpToken]) -> Result<()> {
        let expanded = self.expand_argument(rest)?;
        let first = expanded.first().ok_or_else(|| Error::InvalidDirective("expected line number after #line".into()))?;
        let line_num: i64 = match first.token {
            Token::PpNumber(s) => s.as_str().parse().map_err(|_| Error::InvalidDirective(format!("invalid #line number '{}'", s.as_str())))?,
            _ => return Err(Error::InvalidDirective("expected line number after #line".into())),
        };
        if let Some(name_tok) = expanded.get(1) {
            if let Token::StringLiteral(_, s) = name_tok.token {
                self.presumed_file = Some(s);
            }
        }
        let physical_next_line = first.span.line as i64 + 1;
        self.line_delta = line_num - physical_next_line;
        Ok(())
    }

    fn handle_include(&mut self, rest: &[PpToken], dir: &Path, out: &mut Vec<PpToken>) -> Result<()> {
        let header = self.parse_include_header(rest)?;
        let resolved = self
            .resolve_include_path(&header.name, dir)
            .ok_or_else(|| Error::Io(format!("cannot find include file '{}'", header.name)))?;
        let content = std::fs::read_to_string(&resolved).map_err(Error::from)?;
        let mut included = self.run_file(&resolved, &content)?;
        out.append(&mut included);
        Ok(())
    }

    /// Parses the `#include` argument: either a direct `"..."`/`<...>`
    /// header-name token, or (when it's neither) the macro-expanded
    /// remainder of the line, per spec.md's "If the argument is neither,
    /// macro-expand the rest of the line and retry."
    fn parse_include_header(&mut self, rest: &[PpToken]) -> Result<IncludeHeader> {
        if let Some(first) = rest.first() {
            if let Token::StringLiteral(_, s) = first.token {
                return Ok(IncludeHeader { name: s.as_str().to_string(), quoted: true });
            }
            if first.token == Token::Lt {
                let mut name = String::new();
                let mut i = 1;
                loop {
                    match rest.get(i).map(|t| t.token) {
                        Some(Token::Gt) => return Ok(IncludeHeader { name, quoted: false }),
                        Some(_) => {
                            name.push_str(&crate::pp_token::spelling(&rest[i].token));
                            i += 1;
                        }
                        None => return Err(Error::InvalidDirective("unterminated <header> in #include".into())),
                    }
                }
            }
        }
        let expanded = self.expand_argument(rest)?;
        self.parse_include_header_literal(&expanded)
    }

    fn parse_include_header_literal(&self, toks: &[PpToken]) -> Result<IncludeHeader> {
        match toks.first() {
            Some(t) => match t.token {
                Token::StringLiteral(_, s) => Ok(IncludeHeader { name: s.as_str().to_string(), quoted: true }),
                Token::Lt => {
                    let mut name = String::new();
                    for t in &toks[1..] {
                        if t.token == Token::Gt {
                            return Ok(IncludeHeader { name, quoted: false });
                        }
                        name.push_str(&crate::pp_token::spelling(&t.token));
                    }
                    Err(Error::InvalidDirective("unterminated <header> in #include".into()))
                }
                _ => Err(Error::InvalidDirective("#include expects \"FILE\" or <FILE>".into())),
            },
            None => Err(Error::InvalidDirective("#include expects an argument".into())),
        }
    }

    /// Resolves a header name to an on-disk path: a quoted name is tried
    /// next to the including file first, then falls back to the system
    /// search list exactly like an angle-bracket name (spec.md §6).
    pub(crate) fn resolve_include_path(&self, header: &str, including_dir: &Path) -> Option<PathBuf> {
        let candidate = including_dir.join(header);
        if candidate.is_file() {
            return Some(candidate);
        }
        self.config.system_include_dirs.iter().map(|d| d.join(header)).find(|p| p.is_file())
    }
}

struct IncludeHeader {
    name: String,
    #[allow(dead_code)]
    quoted: bool,
}

fn expect_ident(rest: &[PpToken], directive: &str) -> Result<cc_util::Symbol> {
    rest.first().and_then(|t| t.ident_symbol()).ok_or_else(|| Error::InvalidDirective(format!("expected identifier after #{directive}")))
}

fn line_text(rest: &[PpToken]) -> String {
    rest.iter()
        .enumerate()
        .map(|(i, t)| if i > 0 && t.has_white_space { format!(" {}", crate::pp_token::spelling(&t.token)) } else { crate::pp_token::spelling(&t.token) })
        .collect()
}

fn parse_param_list(rest: &[PpToken], i: &mut usize) -> Result<(Vec<cc_util::Symbol>, bool)> {
    let mut params = Vec::new();
    let mut is_variadic = false;
    loop {
        match rest.get(*i).map(|t| t.token) {
            Some(Token::RParen) => {
                *i += 1;
                break;
            }
            Some(Token::DotDotDot) => {
                is_variadic = true;
                *i += 1;
                match rest.get(*i).map(|t| t.token) {
                    Some(Token::RParen) => {
                        *i += 1;
                        break;
                    }
                    _ => return Err(Error::InvalidDirective("expected ')' after '...' in macro parameter list".into())),
                }
            }
            Some(Token::Ident(_)) => {
                let p = rest[*i].ident_symbol().unwrap();
                if p.eq_str("__VA_ARGS__") || p.eq_str("__VA_OPT__") {
                    return Err(Error::InvalidDirective("__VA_ARGS__/__VA_OPT__ cannot be used as a macro parameter name".into()));
                }
                if params.contains(&p) {
                    return Err(Error::InvalidDirective(format!("duplicate macro parameter '{}'", p.as_str())));
                }
                params.push(p);
                *i += 1;
                match rest.get(*i).map(|t| t.token) {
                    Some(Token::Comma) => {
                        *i += 1;
                    }
                    Some(Token::RParen) | Some(Token::DotDotDot) => {}
                    _ => return Err(Error::InvalidDirective("expected ',' or ')' in macro parameter list".into())),
                }
            }
            _ => return Err(Error::InvalidDirective("malformed macro parameter list".into())),
        }
    }
    Ok((params, is_variadic))
}

fn validate_hash_hash_placement(replacement: &[PpToken]) -> Result<()> {
    if replacement.first().is_some_and(|t| t.token == Token::HashHash) {
        return Err(Error::InvalidDirective("'##' cannot begin a macro replacement list".into()));
    }
    if replacement.last().is_some_and(|t| t.token == Token::HashHash) {
        return Err(Error::InvalidDirective("'##' cannot end a macro replacement list".into()));
    }
    Ok(())
}

/// Each `__VA_OPT__` must open a balanced `(...)` group within the
/// replacement list.
fn validate_va_opt_balance(replacement: &[PpToken]) -> Result<()> {
    let mut i = 0;
    while i < replacement.len() {
        if replacement[i].ident_symbol().is_some_and(|s| s.eq_str("__VA_OPT__")) {
            if replacement.get(i + 1).map(|t| t.token) != Some(Token::LParen) {
                return Err(Error::InvalidDirective("'__VA_OPT__' must be followed by '('".into()));
            }
            let mut depth = 1;
            let mut j = i + 2;
            while j < replacement.len() && depth > 0 {
                match replacement[j].token {
                    Token::LParen => depth += 1,
                    Token::RParen => depth -= 1,
                    _ => {}
                }
                j += 1;
            }
            if depth != 0 {
                return Err(Error::InvalidDirective("unbalanced '__VA_OPT__(...)' in macro replacement list".into()));
            }
            i = j;
        } else {
            i += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use cc_util::{Span, Symbol};

    fn tok(t: Token) -> PpToken {
        PpToken::new(t, Span::DUMMY)
    }

    fn ident(s: &str) -> PpToken {
        tok(Token::Ident(Symbol::intern(s)))
    }

    fn num(s: &str) -> PpToken {
        tok(Token::PpNumber(Symbol::intern(s)))
    }

    #[test]
    fn object_like_define_installs_macro() {
        let mut pp = Preprocessor::new(Config::default());
        pp.handle_define(&[ident("FOO"), num("1")]).unwrap();
        assert!(pp.macros.is_defined(Symbol::intern("FOO")));
    }

    #[test]
    fn function_like_requires_adjacent_paren() {
        let mut pp = Preprocessor::new(Config::default());
        let mut lparen = tok(Token::LParen);
        lparen.has_white_space = false;
        pp.handle_define(&[ident("F"), lparen, ident("a"), tok(Token::RParen), ident("a")]).unwrap();
        let mac = pp.macros.get(Symbol::intern("F")).unwrap();
        assert!(mac.is_function_like);
        assert_eq!(mac.params, vec![Symbol::intern("a")]);
    }

    #[test]
    fn hash_hash_at_start_is_rejected() {
        let mut pp = Preprocessor::new(Config::default());
        assert!(pp.handle_define(&[ident("X"), tok(Token::HashHash), num("1")]).is_err());
    }

    #[test]
    fn duplicate_parameter_name_is_rejected() {
        let mut pp = Preprocessor::new(Config::default());
        let mut lparen = tok(Token::LParen);
        lparen.has_white_space = false;
        assert!(pp
            .handle_define(&[ident("F"), lparen, ident("a"), tok(Token::Comma), ident("a"), tok(Token::RParen), ident("a")])
            .is_err());
    }

    #[test]
    fn undef_removes_macro() {
        let mut pp = Preprocessor::new(Config::default());
        pp.handle_define(&[ident("FOO"), num("1")]).unwrap();
        pp.handle_undef(&[ident("FOO")]).unwrap();
        assert!(!pp.macros.is_defined(Symbol::intern("FOO")));
    }

    #[test]
    fn include_resolves_quoted_header_next_to_including_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("inc.h"), "int x;").unwrap();
        let pp = Preprocessor::new(Config::default());
        let resolved = pp.resolve_include_path("inc.h", tmp.path());
        assert_eq!(resolved.unwrap(), tmp.path().join("inc.h"));
    }

    #[test]
    fn include_falls_back_to_system_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("sys.h"), "int y;").unwrap();
        let config = Config { system_include_dirs: vec![tmp.path().to_path_buf()], ..Config::default() };
        let pp = Preprocessor::new(config);
        let resolved = pp.resolve_include_path("sys.h", Path::new("/does/not/exist"));
        assert_eq!(resolved.unwrap(), tmp.path().join("sys.h"));
    }
}

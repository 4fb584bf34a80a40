//! Identifier and keyword lexing.
//!
//! Handles plain ASCII identifiers, Unicode identifiers, and identifiers
//! containing universal-character-name escapes (`\uXXXX`/`\UXXXXXXXX`),
//! folding the UCN escapes to their decoded form before interning so that
//! `é` and a literal `é` compare equal downstream.

use cc_util::Symbol;

use crate::token::{keyword_from_ident, Token};
use crate::unicode::{is_ascii_ident_continue, is_ident_continue, is_valid_ucn_codepoint, parse_hex_codepoint};

impl<'a> super::Lexer<'a> {
    /// Lexes an identifier or keyword, folding any UCN escapes it contains.
    pub fn lex_identifier(&mut self) -> Token {
        let mut folded = String::new();
        let mut has_ucn = false;

        loop {
            let c = self.cursor.current_char();
            if c == '\\' && matches!(self.cursor.peek_char(1), 'u' | 'U') {
                let width = if self.cursor.peek_char(1) == 'u' { 4 } else { 8 };
                let save = self.cursor.snapshot();
                self.cursor.advance();
                self.cursor.advance();
                let mut hex = String::new();
                for _ in 0..width {
                    let h = self.cursor.current_char();
                    if h.is_ascii_hexdigit() {
                        hex.push(h);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
                let decoded = if hex.len() == width {
                    parse_hex_codepoint(&hex).filter(|&cp| is_valid_ucn_codepoint(cp))
                } else {
                    None
                };
                match decoded.and_then(char::from_u32) {
                    Some(ch) => {
                        has_ucn = true;
                        folded.push(ch);
                        continue;
                    }
                    None => {
                        self.cursor.restore(save);
                        self.report_error("invalid universal character name in identifier".to_string());
                        self.cursor.advance();
                        self.cursor.advance();
                        continue;
                    }
                }
            }

            if is_ascii_ident_continue(c) || (!c.is_ascii() && is_ident_continue(c)) {
                folded.push(c);
                self.cursor.advance();
                continue;
            }

            break;
        }

        if !has_ucn {
            if let Some(kw) = keyword_from_ident(&folded) {
                return kw;
            }
        }

        Token::Ident(Symbol::intern(&folded))
    }
}

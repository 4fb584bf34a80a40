//! Preprocessing-number lexing.
//!
//! This module scans a pp-number per C23 6.4.8's grammar. No numeric
//! validation happens here - a pp-number is captured as raw text and only
//! later classified into a typed integer/floating constant (or rejected) by
//! `cc-tokstream`'s number classifier, once macro expansion has had a chance
//! to run on it.
//!
//! Grammar (informal): a pp-number starts with a digit, or `.` followed by a
//! digit, and continues with digits, identifier-nondigit characters, a
//! single `.`, a sign following `e`/`E`/`p`/`P` (float/hex-float exponent
//! markers), or a digit separator `'` followed by a digit.

use cc_util::Symbol;

use crate::token::Token;

impl<'a> super::Lexer<'a> {
    /// Lexes a pp-number starting at the cursor (already known to begin
    /// with a digit, or `.` followed by a digit).
    pub fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        self.cursor.advance();

        loop {
            let c = self.cursor.current_char();
            if c.is_ascii_digit() || c == '.' || c == '_' {
                self.cursor.advance();
                continue;
            }
            if matches!(c, 'e' | 'E' | 'p' | 'P')
                && matches!(self.cursor.peek_char(1), '+' | '-')
            {
                self.cursor.advance();
                self.cursor.advance();
                continue;
            }
            if c == '\'' && self.cursor.peek_char(1).is_ascii_digit() {
                self.cursor.advance();
                continue;
            }
            if crate::unicode::is_ascii_ident_continue(c) {
                self.cursor.advance();
                continue;
            }
            break;
        }

        let text = self.cursor.slice_from(start);
        Token::PpNumber(Symbol::intern(text))
    }
}

#[cfg(test)]
mod tests {
    use cc_util::Handler;

    use crate::token::Token;

    fn lex_num(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.lex_number()
    }

    #[test]
    fn test_decimal_integer() {
        assert_eq!(lex_num("42"), Token::PpNumber(cc_util::Symbol::intern("42")));
    }

    #[test]
    fn test_hex_integer_suffix() {
        assert_eq!(lex_num("0xFFu"), Token::PpNumber(cc_util::Symbol::intern("0xFFu")));
    }

    #[test]
    fn test_float_with_exponent() {
        assert_eq!(lex_num("1e10"), Token::PpNumber(cc_util::Symbol::intern("1e10")));
    }

    #[test]
    fn test_float_negative_exponent() {
        assert_eq!(lex_num("2.5e-3"), Token::PpNumber(cc_util::Symbol::intern("2.5e-3")));
    }

    #[test]
    fn test_hex_float_with_p_exponent() {
        assert_eq!(
            lex_num("0x1.8p3"),
            Token::PpNumber(cc_util::Symbol::intern("0x1.8p3"))
        );
    }

    #[test]
    fn test_digit_separator() {
        assert_eq!(
            lex_num("1'000'000"),
            Token::PpNumber(cc_util::Symbol::intern("1'000'000"))
        );
    }

    #[test]
    fn test_leading_dot() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(".5f", &mut handler);
        assert_eq!(
            lexer.lex_number(),
            Token::PpNumber(cc_util::Symbol::intern(".5f"))
        );
    }

    #[test]
    fn test_stops_at_non_number_char() {
        assert_eq!(lex_num("42)"), Token::PpNumber(cc_util::Symbol::intern("42")));
    }
}

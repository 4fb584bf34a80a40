//! Operator and punctuator lexing.
//!
//! Implements C23's maximal-munch punctuator scanning (6.4p4): at each
//! position, the longest sequence of characters forming a valid punctuator
//! is taken.

use crate::token::Token;

impl<'a> super::Lexer<'a> {
    /// `+`, `++`, `+=`
    pub fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('+') {
            Token::PlusPlus
        } else if self.cursor.match_char('=') {
            Token::PlusEq
        } else {
            Token::Plus
        }
    }

    /// `-`, `--`, `->`, `-=`
    pub fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('-') {
            Token::MinusMinus
        } else if self.cursor.match_char('>') {
            Token::Arrow
        } else if self.cursor.match_char('=') {
            Token::MinusEq
        } else {
            Token::Minus
        }
    }

    /// `*`, `*=`
    pub fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::StarEq
        } else {
            Token::Star
        }
    }

    /// `/`, `//`, `/* */`, `/=`
    pub fn lex_slash(&mut self) -> Token {
        self.cursor.advance();

        if self.cursor.match_char('/') {
            while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                self.cursor.advance();
            }
            self.skip_whitespace_and_comments();
            return self.next_token();
        }

        if self.cursor.match_char('*') {
            self.skip_block_comment();
            self.skip_whitespace_and_comments();
            return self.next_token();
        }

        if self.cursor.match_char('=') {
            Token::SlashEq
        } else {
            Token::Slash
        }
    }

    /// `%`, `%=`
    pub fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::PercentEq
        } else {
            Token::Percent
        }
    }

    /// `=`, `==`
    pub fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::EqEq
        } else {
            Token::Eq
        }
    }

    /// `!`, `!=`
    pub fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::BangEq
        } else {
            Token::Bang
        }
    }

    /// `<`, `<=`, `<<`, `<<=`
    pub fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::LtEq
        } else if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                Token::LtLtEq
            } else {
                Token::LtLt
            }
        } else {
            Token::Lt
        }
    }

    /// `>`, `>=`, `>>`, `>>=`
    pub fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::GtEq
        } else if self.cursor.match_char('>') {
            if self.cursor.match_char('=') {
                Token::GtGtEq
            } else {
                Token::GtGt
            }
        } else {
            Token::Gt
        }
    }

    /// `&`, `&&`, `&=`
    pub fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            Token::AmpAmp
        } else if self.cursor.match_char('=') {
            Token::AmpEq
        } else {
            Token::Amp
        }
    }

    /// `|`, `||`, `|=`
    pub fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            Token::PipePipe
        } else if self.cursor.match_char('=') {
            Token::PipeEq
        } else {
            Token::Pipe
        }
    }

    /// `^`, `^=`
    pub fn lex_caret(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::CaretEq
        } else {
            Token::Caret
        }
    }

    /// `~`
    pub fn lex_tilde(&mut self) -> Token {
        self.cursor.advance();
        Token::Tilde
    }

    /// `:`. C23 has no `::`; a standalone colon is always a single token.
    pub fn lex_colon(&mut self) -> Token {
        self.cursor.advance();
        Token::Colon
    }

    /// `.` or `...`. A `.` followed by a digit is dispatched to
    /// [`super::Lexer::lex_number`] before this is reached (it starts a
    /// pp-number, e.g. `.5`).
    pub fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1) == '.' {
            self.cursor.advance();
            self.cursor.advance();
            Token::DotDotDot
        } else {
            Token::Dot
        }
    }

    /// `#`, `##`
    pub fn lex_hash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('#') {
            Token::HashHash
        } else {
            Token::Hash
        }
    }
}

#[cfg(test)]
mod tests {
    use cc_util::Handler;

    use crate::token::Token;

    fn lex_op(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.next_token()
    }

    #[test]
    fn test_plus_family() {
        assert_eq!(lex_op("+"), Token::Plus);
        assert_eq!(lex_op("++"), Token::PlusPlus);
        assert_eq!(lex_op("+="), Token::PlusEq);
    }

    #[test]
    fn test_minus_family() {
        assert_eq!(lex_op("-"), Token::Minus);
        assert_eq!(lex_op("--"), Token::MinusMinus);
        assert_eq!(lex_op("->"), Token::Arrow);
        assert_eq!(lex_op("-="), Token::MinusEq);
    }

    #[test]
    fn test_shift_family() {
        assert_eq!(lex_op("<<"), Token::LtLt);
        assert_eq!(lex_op("<<="), Token::LtLtEq);
        assert_eq!(lex_op(">>"), Token::GtGt);
        assert_eq!(lex_op(">>="), Token::GtGtEq);
    }

    #[test]
    fn test_logical_family() {
        assert_eq!(lex_op("&"), Token::Amp);
        assert_eq!(lex_op("&&"), Token::AmpAmp);
        assert_eq!(lex_op("|"), Token::Pipe);
        assert_eq!(lex_op("||"), Token::PipePipe);
    }

    #[test]
    fn test_ellipsis() {
        assert_eq!(lex_op("..."), Token::DotDotDot);
        assert_eq!(lex_op("."), Token::Dot);
    }

    #[test]
    fn test_hash_hash() {
        assert_eq!(lex_op("#"), Token::Hash);
        assert_eq!(lex_op("##"), Token::HashHash);
    }

    #[test]
    fn test_colon_is_single_char_in_c() {
        assert_eq!(lex_op(":"), Token::Colon);
    }
}

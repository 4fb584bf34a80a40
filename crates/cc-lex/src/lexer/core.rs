//! Core lexer implementation.
//!
//! This module contains the main [`Lexer`] struct and its dispatch loop.

use cc_util::{DiagnosticBuilder, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{StringPrefix, Token};

/// Lexer for C23 translation units.
///
/// Runs over a single, already CRLF-normalized and splice-folded source
/// buffer (see `cc_util::SourceFile`) and produces a stream of [`Token`]s.
/// It does not expand macros or evaluate `#if` directives - that is the
/// preprocessor's job, layered on top of this token stream.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub cursor: Cursor<'a>,

    /// Error handler for reporting lexical errors.
    pub handler: &'a mut Handler,

    /// Starting position of the current token (byte offset).
    pub token_start: usize,

    /// Line number where the current token starts (1-based).
    token_start_line: u32,

    /// Column number where the current token starts (1-based).
    token_start_column: u32,

    /// Whether the BOM (Byte Order Mark) has been checked.
    pub bom_checked: bool,

    /// Set by `skip_whitespace_and_comments` when it consumed anything
    /// before the token about to be scanned - callers use this to set a
    /// token's `has_white_space` flag in the preprocessor's token model.
    pub pending_white_space: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            bom_checked: false,
            pending_white_space: false,
        }
    }

    /// Returns the next token from the source code.
    ///
    /// Skips whitespace and comments, then dispatches on the current
    /// character using maximal munch for multi-character punctuators.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::Eof;
        }

        match self.cursor.current_char() {
            '(' => {
                self.cursor.advance();
                Token::LParen
            }
            ')' => {
                self.cursor.advance();
                Token::RParen
            }
            '{' => {
                self.cursor.advance();
                Token::LBrace
            }
            '}' => {
                self.cursor.advance();
                Token::RBrace
            }
            '[' => {
                self.cursor.advance();
                Token::LBracket
            }
            ']' => {
                self.cursor.advance();
                Token::RBracket
            }
            ',' => {
                self.cursor.advance();
                Token::Comma
            }
            ';' => {
                self.cursor.advance();
                Token::Semi
            }
            '?' => {
                self.cursor.advance();
                Token::Question
            }
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            ':' => self.lex_colon(),
            '^' => self.lex_caret(),
            '~' => self.lex_tilde(),
            '#' => self.lex_hash(),
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            '@' => {
                self.cursor.advance();
                Token::At
            }
            '.' => {
                if self.cursor.peek_char(1).is_ascii_digit() {
                    self.lex_number()
                } else {
                    self.lex_dot()
                }
            }
            'u' | 'U' | 'L' => self.lex_ident_or_prefixed_literal(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if crate::unicode::is_ascii_ident_start(c)
                || (!c.is_ascii() && crate::unicode::is_ident_start(c)) =>
            {
                self.lex_identifier()
            }
            c if c == '\\' && matches!(self.cursor.peek_char(1), 'u' | 'U') => self.lex_identifier(),
            c => {
                self.report_error(format!("unexpected character '{}'", c));
                self.cursor.advance();
                Token::Invalid
            }
        }
    }

    /// `u`/`U`/`L` can lead a string/char literal encoding prefix (`u8"..."`,
    /// `U'...'`, ...) or be the first letter of an ordinary identifier -
    /// disambiguated by what immediately follows the prefix candidate.
    fn lex_ident_or_prefixed_literal(&mut self) -> Token {
        let (prefix, consumed) = match self.cursor.current_char() {
            'u' if self.cursor.peek_char(1) == '8'
                && matches!(self.cursor.peek_char(2), '"' | '\'') =>
            {
                (StringPrefix::Utf8, 2)
            }
            'u' if matches!(self.cursor.peek_char(1), '"' | '\'') => (StringPrefix::Utf16, 1),
            'U' if matches!(self.cursor.peek_char(1), '"' | '\'') => (StringPrefix::Utf32, 1),
            'L' if matches!(self.cursor.peek_char(1), '"' | '\'') => (StringPrefix::Wide, 1),
            _ => return self.lex_identifier(),
        };

        for _ in 0..consumed {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '"' {
            self.lex_string_with_prefix(prefix)
        } else {
            self.lex_char_with_prefix(prefix)
        }
    }

    /// Reports a lexical error at the current token's span.
    pub fn report_error(&mut self, message: String) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        DiagnosticBuilder::error(message).span(span).emit(self.handler);
    }

    /// Returns the current line number (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Returns the current column number (1-based).
    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    /// Returns the current byte position in the source.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the starting byte offset of the current token.
    pub fn token_start(&mut self) -> usize {
        self.token_start
    }

    /// The span covering the most recently scanned token.
    pub fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token == Token::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use cc_util::{Handler, Symbol};

    use crate::token::{StringPrefix, Token};

    fn lex_all(source: &str) -> Vec<Token> {
        let mut handler = Handler::new();
        let lexer = crate::Lexer::new(source, &mut handler);
        lexer.collect()
    }

    #[test]
    fn test_simple_declaration() {
        assert_eq!(
            lex_all("int x = 42;"),
            vec![
                Token::KwInt,
                Token::Ident(Symbol::intern("x")),
                Token::Eq,
                Token::PpNumber(Symbol::intern("42")),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_arrow_not_confused_with_minus_minus() {
        assert_eq!(lex_all("p->x"), vec![
            Token::Ident(Symbol::intern("p")),
            Token::Arrow,
            Token::Ident(Symbol::intern("x")),
        ]);
    }

    #[test]
    fn test_string_prefix_disambiguates_from_identifier() {
        assert_eq!(
            lex_all("u8\"hi\""),
            vec![Token::StringLiteral(StringPrefix::Utf8, Symbol::intern("hi"))]
        );
        assert_eq!(lex_all("u8value"), vec![Token::Ident(Symbol::intern("u8value"))]);
    }

    #[test]
    fn test_function_like_macro_hash_hash() {
        assert_eq!(lex_all("#define X(a,b) a##b"), vec![
            Token::Hash,
            Token::Ident(Symbol::intern("define")),
            Token::Ident(Symbol::intern("X")),
            Token::LParen,
            Token::Ident(Symbol::intern("a")),
            Token::Comma,
            Token::Ident(Symbol::intern("b")),
            Token::RParen,
            Token::Ident(Symbol::intern("a")),
            Token::HashHash,
            Token::Ident(Symbol::intern("b")),
        ]);
    }

    #[test]
    fn test_ellipsis_in_parameter_list() {
        assert_eq!(lex_all("(int, ...)"), vec![
            Token::LParen,
            Token::KwInt,
            Token::Comma,
            Token::DotDotDot,
            Token::RParen,
        ]);
    }
}

//! String and character literal lexing.
//!
//! Handles string and character literal scanning per C23 6.4.5/6.4.4.4,
//! including the `u8`/`u`/`U`/`L` encoding prefixes. There are no raw string
//! literals in C.

use cc_util::Symbol;

use crate::token::{StringPrefix, Token};
use crate::unicode::{is_valid_ucn_codepoint, parse_hex_codepoint};

impl<'a> super::Lexer<'a> {
    /// Lexes a string literal. The cursor must sit at the opening `"`;
    /// `prefix` is whatever encoding prefix (if any) was already consumed.
    pub fn lex_string_with_prefix(&mut self, prefix: StringPrefix) -> Token {
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            let c = self.cursor.current_char();

            if c == '"' {
                self.cursor.advance();
                break;
            }

            if c == '\n' {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                if let Some(escaped) = self.parse_escape() {
                    content.push(escaped);
                }
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        Token::StringLiteral(prefix, Symbol::intern(&content))
    }

    pub fn lex_string(&mut self) -> Token {
        self.lex_string_with_prefix(StringPrefix::None)
    }

    /// Lexes a character constant. The cursor must sit at the opening `'`.
    pub fn lex_char_with_prefix(&mut self, prefix: StringPrefix) -> Token {
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated character literal".to_string());
                break;
            }

            let c = self.cursor.current_char();

            if c == '\'' {
                self.cursor.advance();
                break;
            }

            if c == '\n' {
                self.report_error("unterminated character literal".to_string());
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                if let Some(escaped) = self.parse_escape() {
                    content.push(escaped);
                }
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        if content.is_empty() {
            self.report_error("empty character constant".to_string());
        }

        Token::CharConstant(prefix, Symbol::intern(&content))
    }

    pub fn lex_char(&mut self) -> Token {
        self.lex_char_with_prefix(StringPrefix::None)
    }

    /// Parses an escape sequence after the backslash has been consumed.
    ///
    /// Handles: `\a \b \f \n \r \t \v \\ \' \" \? \0`, octal `\ooo` (1-3
    /// digits), hex `\xH+` (any number of hex digits, per 6.4.4.4), and
    /// universal-character-names `\uXXXX`/`\UXXXXXXXX`.
    pub fn parse_escape(&mut self) -> Option<char> {
        if self.cursor.is_at_end() {
            self.report_error("unterminated escape sequence".to_string());
            return None;
        }

        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{0B}'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '\'' => Some('\''),
            '?' => Some('?'),
            '0'..='7' => {
                let mut digits = String::new();
                digits.push(c);
                for _ in 0..2 {
                    let d = self.cursor.current_char();
                    if ('0'..='7').contains(&d) {
                        digits.push(d);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
                u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32)
            }
            'x' => {
                let mut hex = String::new();
                while self.cursor.current_char().is_ascii_hexdigit() {
                    hex.push(self.cursor.current_char());
                    self.cursor.advance();
                }
                if hex.is_empty() {
                    self.report_error("\\x used with no following hex digits".to_string());
                    return None;
                }
                u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
            }
            'u' | 'U' => {
                let width = if c == 'u' { 4 } else { 8 };
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
                if hex.len() != width {
                    self.report_error(format!("incomplete universal character name \\{}", c));
                    return None;
                }
                match parse_hex_codepoint(&hex) {
                    Some(cp) if is_valid_ucn_codepoint(cp) => char::from_u32(cp),
                    _ => {
                        self.report_error(format!("\\{}{} is not a valid universal character name", c, hex));
                        None
                    }
                }
            }
            _ => {
                self.report_error(format!("unknown escape sequence: \\{}", c));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cc_util::{Handler, Symbol};

    use crate::token::{StringPrefix, Token};

    fn lex_str(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.lex_string()
    }

    fn lex_char(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.lex_char()
    }

    #[test]
    fn test_simple_string() {
        let token = lex_str("\"hello\"");
        assert_eq!(token, Token::StringLiteral(StringPrefix::None, Symbol::intern("hello")));
    }

    #[test]
    fn test_string_with_escape() {
        let token = lex_str("\"hello\\nworld\"");
        assert_eq!(
            token,
            Token::StringLiteral(StringPrefix::None, Symbol::intern("hello\nworld"))
        );
    }

    #[test]
    fn test_string_octal_escape() {
        let token = lex_str("\"\\101\"");
        assert_eq!(token, Token::StringLiteral(StringPrefix::None, Symbol::intern("A")));
    }

    #[test]
    fn test_character() {
        let token = lex_char("'a'");
        assert_eq!(token, Token::CharConstant(StringPrefix::None, Symbol::intern("a")));
    }

    #[test]
    fn test_character_escape() {
        let token = lex_char("'\\n'");
        assert_eq!(token, Token::CharConstant(StringPrefix::None, Symbol::intern("\n")));
    }

    #[test]
    fn test_character_hex_escape() {
        let token = lex_char("'\\x41'");
        assert_eq!(token, Token::CharConstant(StringPrefix::None, Symbol::intern("A")));
    }

    #[test]
    fn test_ucn_escape_in_string() {
        let token = lex_str("\"\\u00e9\"");
        assert_eq!(token, Token::StringLiteral(StringPrefix::None, Symbol::intern("\u{e9}")));
    }
}

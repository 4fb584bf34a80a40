//! Comment lexing.
//!
//! This module handles skipping line and block comments. Per C23 6.4.9,
//! block comments do not nest: the first `*/` after the opening `/*` closes
//! it, even if an inner `/*` was seen.

impl<'a> super::Lexer<'a> {
    /// Skips a block comment. Assumes the cursor sits just past the opening
    /// `/*`.
    pub fn skip_block_comment(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated block comment".to_string());
                return;
            }
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return;
            }
            self.cursor.advance();
        }
    }

    /// Skips whitespace and comments, recording whether any was seen so the
    /// next token's leading-whitespace flag can be set correctly.
    ///
    /// This is called before lexing each token.
    pub fn skip_whitespace_and_comments(&mut self) {
        if !self.bom_checked {
            self.bom_checked = true;
            if self.cursor.remaining().starts_with('\u{FEFF}') {
                self.cursor.advance();
            }
        }

        self.pending_white_space = false;

        loop {
            if self.cursor.is_at_end() {
                return;
            }

            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c' => {
                    self.pending_white_space = true;
                    self.cursor.advance();
                }
                '/' => {
                    let next = self.cursor.peek_char(1);
                    if next == '/' {
                        self.pending_white_space = true;
                        self.skip_line_comment();
                    } else if next == '*' {
                        self.pending_white_space = true;
                        self.cursor.advance();
                        self.cursor.advance();
                        self.skip_block_comment();
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Skips a line comment (from `//` to end of line, not consuming the
    /// newline itself).
    fn skip_line_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();

        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }
}

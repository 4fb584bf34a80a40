//! Preprocessing tokens: a lexer [`Token`] plus the per-occurrence flags
//! the macro expander and directive scanner need (spec.md §3's
//! "preprocessing token" wraps a lexer token and adds a `marked` flag and
//! local copies of `has_white_space`/`is_first`).
//!
//! `cc_lex::Token` is already a small `Copy` enum - identifiers and
//! literals carry an interned `Symbol`, not a borrowed source slice - so
//! there is no need to share one heap-allocated token behind a refcount
//! the way `original_source/src/cpp/lexer.c`'s `cpp_token` does. Wrapping
//! it in a plain `Copy` struct gives the same "every occurrence owns
//! independent flags, copies stay cheap" property for free.

use cc_lex::{StringPrefix, Token};
use cc_util::{Handler, Span};

/// A single preprocessing token: the lexical token plus the flags the
/// preprocessor threads through macro expansion and directive scanning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PpToken {
    pub token: Token,
    pub span: Span,
    /// Set once this token has been produced by substituting a macro whose
    /// own name it spells, so self-referential expansion stops (spec.md
    /// §4.2.1 item 2). Persists through every copy made after it is set.
    pub marked: bool,
    /// Whitespace other than a line terminator immediately precedes this
    /// token.
    pub has_white_space: bool,
    /// This is the first token on its logical source line - the signal
    /// the directive scanner uses to recognize a leading `#` as
    /// introducing a directive rather than ordinary punctuation.
    pub is_first: bool,
    /// Set when this token is the literal result of pasting two `#`
    /// tokens together: it must never be mistaken for the `##` paste
    /// operator by a later pass over the same tokens.
    pub inert_hash_hash: bool,
}

impl PpToken {
    pub fn new(token: Token, span: Span) -> Self {
        Self { token, span, marked: false, has_white_space: false, is_first: false, inert_hash_hash: false }
    }

    pub fn with_flags(token: Token, span: Span, has_white_space: bool, is_first: bool) -> Self {
        Self { token, span, marked: false, has_white_space, is_first, inert_hash_hash: false }
    }

    pub fn marked(mut self) -> Self {
        self.marked = true;
        self
    }

    pub fn is_ident(&self) -> bool {
        matches!(self.token, Token::Ident(_))
    }

    pub fn ident_symbol(&self) -> Option<cc_util::Symbol> {
        match self.token {
            Token::Ident(s) => Some(s),
            _ => None,
        }
    }
}

/// Lexes an entire (already CRLF-normalized, splice-folded) source buffer
/// into preprocessing tokens, deriving `has_white_space` from the lexer's
/// own whitespace-skip bookkeeping and `is_first` from a line-number
/// change since the previous token.
pub fn lex_source(content: &str, handler: &mut Handler) -> Vec<PpToken> {
    let mut lexer = cc_lex::Lexer::new(content, handler);
    let mut tokens = Vec::new();
    let mut last_line: u32 = 0;
    loop {
        let tok = lexer.next_token();
        if tok == Token::Eof {
            break;
        }
        let span = lexer.token_span();
        let is_first = span.line != last_line;
        last_line = span.line;
        let has_white_space = lexer.pending_white_space;
        tokens.push(PpToken::with_flags(tok, span, has_white_space, is_first));
    }
    tokens
}

/// Reconstructs the source spelling of a token - needed by `##` pasting
/// and `#` stringizing, both of which work on literal text rather than a
/// classified [`Token`].
pub fn spelling(token: &Token) -> String {
    if let Some(kw) = token.keyword_spelling() {
        return kw.to_string();
    }
    match token {
        Token::Ident(s) | Token::PpNumber(s) => s.as_str().to_string(),
        Token::StringLiteral(prefix, s) => format!("{}\"{}\"", prefix_spelling(*prefix), s.as_str()),
        Token::CharConstant(prefix, s) => format!("{}'{}'", prefix_spelling(*prefix), s.as_str()),
        Token::Eof | Token::Invalid => String::new(),
        other => punct_spelling(other).to_string(),
    }
}

fn prefix_spelling(prefix: StringPrefix) -> &'static str {
    match prefix {
        StringPrefix::None => "",
        StringPrefix::Utf8 => "u8",
        StringPrefix::Utf16 => "u",
        StringPrefix::Utf32 => "U",
        StringPrefix::Wide => "L",
    }
}

fn punct_spelling(token: &Token) -> &'static str {
    use Token::*;
    match token {
        LParen => "(",
        RParen => ")",
        LBrace => "{",
        RBrace => "}",
        LBracket => "[",
        RBracket => "]",
        Semi => ";",
        Comma => ",",
        Question => "?",
        Tilde => "~",
        At => "@",
        Eq => "=",
        EqEq => "==",
        Bang => "!",
        BangEq => "!=",
        Slash => "/",
        SlashEq => "/=",
        Caret => "^",
        CaretEq => "^=",
        Percent => "%",
        PercentEq => "%=",
        Star => "*",
        StarEq => "*=",
        Colon => ":",
        Hash => "#",
        HashHash => "##",
        Plus => "+",
        PlusPlus => "++",
        PlusEq => "+=",
        Minus => "-",
        MinusMinus => "--",
        MinusEq => "-=",
        Arrow => "->",
        Amp => "&",
        AmpAmp => "&&",
        AmpEq => "&=",
        Pipe => "|",
        PipePipe => "||",
        PipeEq => "|=",
        Lt => "<",
        LtEq => "<=",
        LtLt => "<<",
        LtLtEq => "<<=",
        Gt => ">",
        GtEq => ">=",
        GtGt => ">>",
        GtGtEq => ">>=",
        Dot => ".",
        DotDotDot => "...",
        _ => "",
    }
}

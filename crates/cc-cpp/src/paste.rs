//! The `##` token-pasting operator: concatenate two tokens' spellings and
//! relex the result, which must itself be exactly one valid token
//! (C23 6.10.3.3), grounded on `original_source/src/cpp/scanner.c`'s
//! `paste_tokens`.

use cc_lex::Token;
use cc_util::{Error, Handler, Result};

use crate::pp_token::{spelling, PpToken};

/// Pastes `lhs` and `rhs` together, returning the single resulting token.
/// The result inherits `lhs`'s span and whitespace flags (it stands in
/// for both operands at that source position).
pub fn paste_two(lhs: PpToken, rhs: PpToken) -> Result<PpToken> {
    let combined = format!("{}{}", spelling(&lhs.token), spelling(&rhs.token));
    let mut handler = Handler::new();
    let mut lexer = cc_lex::Lexer::new(&combined, &mut handler);
    let first = lexer.next_token();
    let second = lexer.next_token();

    if first == Token::Invalid || second != Token::Eof {
        return Err(Error::InvalidDirective(format!(
            "pasting \"{}\" and \"{}\" does not form a valid preprocessing token",
            spelling(&lhs.token),
            spelling(&rhs.token)
        )));
    }

    let mut result = PpToken::new(first, lhs.span);
    result.has_white_space = lhs.has_white_space;
    result.is_first = lhs.is_first;
    if lhs.token == Token::Hash && rhs.token == Token::Hash && first == Token::HashHash {
        result.inert_hash_hash = true;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_util::{Span, Symbol};

    fn tok(t: Token) -> PpToken {
        PpToken::new(t, Span::DUMMY)
    }

    #[test]
    fn pastes_two_identifiers_into_one() {
        let lhs = tok(Token::Ident(Symbol::intern("foo")));
        let rhs = tok(Token::Ident(Symbol::intern("bar")));
        let pasted = paste_two(lhs, rhs).unwrap();
        assert_eq!(pasted.token, Token::Ident(Symbol::intern("foobar")));
    }

    #[test]
    fn pastes_plus_and_plus_into_plusplus() {
        let lhs = tok(Token::Plus);
        let rhs = tok(Token::Plus);
        let pasted = paste_two(lhs, rhs).unwrap();
        assert_eq!(pasted.token, Token::PlusPlus);
    }

    #[test]
    fn pasting_hash_hash_marks_result_inert() {
        let lhs = tok(Token::Hash);
        let rhs = tok(Token::Hash);
        let pasted = paste_two(lhs, rhs).unwrap();
        assert_eq!(pasted.token, Token::HashHash);
        assert!(pasted.inert_hash_hash);
    }

    #[test]
    fn invalid_combination_is_an_error() {
        let lhs = tok(Token::Ident(Symbol::intern("foo")));
        let rhs = tok(Token::Plus);
        assert!(paste_two(lhs, rhs).is_err());
    }
}

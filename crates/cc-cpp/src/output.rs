//! Serializer for the preprocessor's output token stream (spec.md §4.2.5,
//! §6). Exact reverse of `cc-tokstream::reader::TokenStreamReader`: a
//! `u32` kind id, then for identifiers/pp-numbers a `u64` length and the
//! resolved UTF-8 bytes, and for string/char literals a one-byte prefix
//! tag ahead of that same length-prefixed payload. Keyword and punctuator
//! kinds carry nothing after their kind id.

use std::io::Write;

use cc_lex::Token;
use cc_util::{Error, Result};

use crate::pp_token::PpToken;

/// Writes one token to `w` in the wire format `cc_tokstream::reader`
/// expects.
pub fn write_token(w: &mut impl Write, token: &Token) -> Result<()> {
    w.write_all(&token.kind_id().to_le_bytes()).map_err(Error::from)?;
    match token {
        Token::Ident(s) | Token::PpNumber(s) => write_payload_str(w, s.as_str()),
        Token::StringLiteral(prefix, s) => {
            w.write_all(&[prefix.to_tag()]).map_err(Error::from)?;
            write_payload_str(w, s.as_str())
        }
        Token::CharConstant(prefix, s) => {
            w.write_all(&[prefix.to_tag()]).map_err(Error::from)?;
            write_payload_str(w, s.as_str())
        }
        _ => Ok(()),
    }
}

fn write_payload_str(w: &mut impl Write, s: &str) -> Result<()> {
    w.write_all(&(s.len() as u64).to_le_bytes()).map_err(Error::from)?;
    w.write_all(s.as_bytes()).map_err(Error::from)
}

/// Writes an entire preprocessed token sequence to `w`, in order.
pub fn write_tokens(w: &mut impl Write, tokens: &[PpToken]) -> Result<()> {
    for t in tokens {
        write_token(w, &t.token)?;
    }
    Ok(())
}

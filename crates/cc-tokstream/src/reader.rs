//! Deserializer for the preprocessor's serialized token stream.
//!
//! Reverse of `cc-cpp::output`'s writer. Layout (spec.md §6):
//!
//! ```text
//! repeated:
//!   u32 kind
//!   if kind is not a keyword/punctuator:
//!     u64 length
//!     length bytes of UTF-8 (resolved) payload
//! ```
//!
//! String/char literal payloads are additionally prefixed by one tag byte
//! identifying the literal's encoding prefix (spec.md's wire layout doesn't
//! pin this detail down, since `StringPrefix` isn't named in the payload
//! description - this reader and `cc-cpp::output`'s writer agree on the
//! tag byte via `cc_lex::token::StringPrefix::to_tag`/`from_tag`). The file
//! ends at EOF; a short read at a token boundary is reported as `Error::Eof`.

use std::io::Read;

use cc_lex::token::PayloadKind;
use cc_lex::{StringPrefix, Token};
use cc_util::{Error, Result, Symbol};

/// Reads tokens one at a time from any `Read` source holding a serialized
/// token stream.
pub struct TokenStreamReader<R: Read> {
    inner: R,
}

impl<R: Read> TokenStreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => Ok(u32::from_le_bytes(buf)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(Error::Eof),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf).map_err(Error::from)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf).map_err(Error::from)?;
        Ok(buf[0])
    }

    fn read_payload_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u64()? as usize;
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf).map_err(Error::from)?;
        Ok(buf)
    }

    fn read_payload_str(&mut self) -> Result<String> {
        let bytes = self.read_payload_bytes()?;
        String::from_utf8(bytes).map_err(|e| Error::InvalidLex(format!("non-UTF-8 token payload: {e}")))
    }

    /// Reads the next token. Returns `Err(Error::Eof)` when the stream is
    /// exhausted at a token boundary (the advisory loop terminator, not a
    /// fault - see `cc_util::Error::is_advisory`).
    pub fn next_token(&mut self) -> Result<Token> {
        let kind_id = self.read_u32()?;

        if let Some(tok) = Token::from_kind_id_payload_free(kind_id) {
            if tok == Token::Eof {
                return Err(Error::Eof);
            }
            return Ok(tok);
        }

        match Token::payload_kind_id(kind_id) {
            Some(PayloadKind::Ident) => Ok(Token::Ident(Symbol::intern(&self.read_payload_str()?))),
            Some(PayloadKind::PpNumber) => Ok(Token::PpNumber(Symbol::intern(&self.read_payload_str()?))),
            Some(PayloadKind::StringLiteral) => {
                let tag = self.read_u8()?;
                let prefix = StringPrefix::from_tag(tag)
                    .ok_or_else(|| Error::InvalidLex(format!("bad string prefix tag {tag}")))?;
                Ok(Token::StringLiteral(prefix, Symbol::intern(&self.read_payload_str()?)))
            }
            Some(PayloadKind::CharConstant) => {
                let tag = self.read_u8()?;
                let prefix = StringPrefix::from_tag(tag)
                    .ok_or_else(|| Error::InvalidLex(format!("bad string prefix tag {tag}")))?;
                Ok(Token::CharConstant(prefix, Symbol::intern(&self.read_payload_str()?)))
            }
            None => Err(Error::InvalidLex(format!("unknown token kind id {kind_id}"))),
        }
    }

    /// Reads every remaining token into a `Vec`, stopping cleanly at EOF.
    pub fn read_all(&mut self) -> Result<Vec<Token>> {
        let mut out = Vec::new();
        loop {
            match self.next_token() {
                Ok(tok) => out.push(tok),
                Err(Error::Eof) => return Ok(out),
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn write_ident(buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(&Token::Ident(Symbol::intern("x")).kind_id().to_le_bytes());
        buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
        buf.extend_from_slice(s.as_bytes());
    }

    #[test]
    fn reads_keyword_then_ident() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&Token::KwInt.kind_id().to_le_bytes());
        write_ident(&mut buf, "x");

        let mut reader = TokenStreamReader::new(Cursor::new(buf));
        assert_eq!(reader.next_token().unwrap(), Token::KwInt);
        assert_eq!(reader.next_token().unwrap(), Token::Ident(Symbol::intern("x")));
        assert!(matches!(reader.next_token(), Err(Error::Eof)));
    }

    #[test]
    fn reads_string_literal_with_prefix() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&Token::StringLiteral(StringPrefix::Utf8, Symbol::intern("")).kind_id().to_le_bytes());
        buf.push(StringPrefix::Utf8.to_tag());
        buf.extend_from_slice(&2u64.to_le_bytes());
        buf.extend_from_slice(b"hi");

        let mut reader = TokenStreamReader::new(Cursor::new(buf));
        assert_eq!(
            reader.next_token().unwrap(),
            Token::StringLiteral(StringPrefix::Utf8, Symbol::intern("hi"))
        );
    }

    #[test]
    fn empty_stream_is_immediate_eof() {
        let mut reader = TokenStreamReader::new(Cursor::new(Vec::new()));
        assert!(matches!(reader.next_token(), Err(Error::Eof)));
    }
}

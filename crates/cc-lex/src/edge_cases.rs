//! Edge case tests for cc-lex

#[cfg(test)]
mod tests {
    use crate::{Lexer, Token};
    use cc_util::{Handler, Symbol};

    fn lex_all(source: &str) -> Vec<Token> {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token == Token::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_single_char_ident() {
        let t = lex_all("x");
        assert_eq!(t[0], Token::Ident(Symbol::intern("x")));
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10000);
        let t = lex_all(&format!("int {};", name));
        assert!(t.contains(&Token::Ident(Symbol::intern(&name))));
    }

    #[test]
    fn test_edge_keywords_not_idents() {
        let t = lex_all("int if");
        assert_eq!(t[0], Token::KwInt);
        assert_eq!(t[1], Token::KwIf);
    }

    #[test]
    fn test_edge_hex_number_text() {
        let t = lex_all("0x0 0xFF");
        assert_eq!(t[0], Token::PpNumber(Symbol::intern("0x0")));
        assert_eq!(t[1], Token::PpNumber(Symbol::intern("0xFF")));
    }

    #[test]
    fn test_edge_empty_string() {
        let t = lex_all("\"\"");
        if let Token::StringLiteral(_, s) = &t[0] {
            assert_eq!(s.as_str(), "");
        } else {
            panic!();
        }
    }

    #[test]
    fn test_edge_all_operators() {
        let t = lex_all("+ - * / % == != < > <= >= && || !");
        assert!(t.contains(&Token::Plus));
        assert!(t.contains(&Token::EqEq));
    }

    #[test]
    fn test_edge_all_delimiters() {
        let t = lex_all("( ) { } [ ] , ; : . ->");
        assert!(t.contains(&Token::LParen));
        assert!(t.contains(&Token::Arrow));
    }

    #[test]
    fn test_edge_nested_delimiters() {
        let t = lex_all("((()))");
        assert_eq!(t.iter().filter(|x| **x == Token::LParen).count(), 3);
    }

    #[test]
    fn test_edge_case_sensitivity() {
        let t = lex_all("Int int");
        assert_eq!(t[0], Token::Ident(Symbol::intern("Int")));
        assert_eq!(t[1], Token::KwInt);
    }

    #[test]
    fn test_edge_bools() {
        let t = lex_all("true false");
        assert_eq!(t[0], Token::KwTrue);
        assert_eq!(t[1], Token::KwFalse);
    }

    #[test]
    fn test_edge_at() {
        assert!(lex_all("@").contains(&Token::At));
    }

    #[test]
    fn test_edge_underscore_alone_is_identifier() {
        assert_eq!(lex_all("_"), vec![Token::Ident(Symbol::intern("_"))]);
    }

    #[test]
    fn test_edge_tilde() {
        assert!(lex_all("~").contains(&Token::Tilde));
    }

    #[test]
    fn test_edge_scientific_pp_numbers() {
        let t = lex_all("1e10 1.5e-3");
        assert!(t.iter().all(|x| matches!(x, Token::PpNumber(_))));
    }

    #[test]
    fn test_edge_max_u64_literal_text_preserved() {
        let t = lex_all("18446744073709551615");
        assert_eq!(t[0], Token::PpNumber(Symbol::intern("18446744073709551615")));
    }

    #[test]
    fn test_edge_all_declaration_keywords() {
        let t = lex_all("int if else while for break continue return struct enum union");
        assert!(t.contains(&Token::KwInt));
        assert!(t.contains(&Token::KwStruct));
        assert!(t.contains(&Token::KwEnum));
        assert!(t.contains(&Token::KwUnion));
    }

    #[test]
    fn test_err_unterminated_string() {
        let mut h = Handler::new();
        let _ = Lexer::new("\"unterminated", &mut h).next_token();
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_empty_char() {
        let mut h = Handler::new();
        let t = Lexer::new("''", &mut h).next_token();
        assert!(matches!(t, Token::CharConstant(..)));
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_unterminated_char() {
        let mut h = Handler::new();
        let _ = Lexer::new("'x", &mut h).next_token();
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_invalid_chars() {
        let mut h = Handler::new();
        let mut lex = Lexer::new("@#$%", &mut h);
        while lex.next_token() != Token::Eof {}
        assert!(h.has_errors());
    }

    #[test]
    fn test_edge_consec_ops_disambiguates_maximal_munch() {
        // "+++" is "++" then "+", not "+" "+" "+"
        assert_eq!(lex_all("+++"), vec![Token::PlusPlus, Token::Plus]);
    }

    #[test]
    fn test_edge_whitespace_variations() {
        let t = lex_all("int\tx\n=\n1");
        assert!(t.contains(&Token::KwInt));
        assert!(t.contains(&Token::PpNumber(Symbol::intern("1"))));
    }

    #[test]
    fn test_edge_leading_zeros_preserved_as_text() {
        assert_eq!(lex_all("007"), vec![Token::PpNumber(Symbol::intern("007"))]);
    }

    #[test]
    fn test_edge_string_prefixes() {
        let t = lex_all(r#"u8"a" u"b" U"c" L"d""#);
        assert_eq!(t.len(), 4);
        assert!(t.iter().all(|tok| matches!(tok, Token::StringLiteral(..))));
    }

    #[test]
    fn test_edge_wide_char_constant() {
        let t = lex_all("L'x'");
        assert!(matches!(t[0], Token::CharConstant(crate::token::StringPrefix::Wide, _)));
    }
}

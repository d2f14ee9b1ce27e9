//! Edge case tests for sltc-lex

#[cfg(test)]
mod tests {
    use crate::*;
    use sltc_util::{Handler, Symbol};

    fn lex_all(source: &str) -> Vec<Token> {
        let mut handler = Handler::new();
        lex(source, &mut handler)
            .expect("lex should succeed")
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_single_char_name() {
        let t = lex_all("x");
        assert_eq!(t[0], Token::Name(Symbol::intern("x")));
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(1000);
        let t = lex_all(&format!("Dim {name}"));
        assert!(t.contains(&Token::Name(Symbol::intern(&name))));
    }

    #[test]
    fn test_edge_keyword_is_case_insensitive() {
        let t = lex_all("dIm X");
        assert_eq!(t[0], Token::Keyword(Keyword::Dim));
    }

    #[test]
    fn test_edge_empty_string_literal() {
        let t = lex_all(r#""""#);
        assert_eq!(t[0], Token::StringLiteral(Symbol::intern("")));
    }

    #[test]
    fn test_edge_string_that_is_only_escaped_quotes() {
        let t = lex_all(r#""""""#);
        assert_eq!(t[0], Token::StringLiteral(Symbol::intern("\"")));
    }

    #[test]
    fn test_edge_nested_brackets() {
        let t = lex_all("f((1))");
        assert_eq!(t.iter().filter(|x| **x == Token::OpenBrace).count(), 2);
        assert_eq!(t.iter().filter(|x| **x == Token::CloseBrace).count(), 2);
    }

    #[test]
    fn test_edge_all_symbolic_operators() {
        let t = lex_all("+ - * / \\ ^ &");
        assert_eq!(
            t,
            vec![
                Token::Operator(OperatorSymbol::Plus),
                Token::Operator(OperatorSymbol::Minus),
                Token::Operator(OperatorSymbol::Star),
                Token::Operator(OperatorSymbol::Slash),
                Token::Operator(OperatorSymbol::Backslash),
                Token::Operator(OperatorSymbol::Caret),
                Token::Operator(OperatorSymbol::Ampersand),
            ]
        );
    }

    #[test]
    fn test_edge_all_keyword_operators_case_insensitive() {
        let t = lex_all("Mod anD oR xOr NOT eqv IMP is");
        assert_eq!(
            t,
            vec![
                Token::Operator(OperatorSymbol::Mod),
                Token::Operator(OperatorSymbol::And),
                Token::Operator(OperatorSymbol::Or),
                Token::Operator(OperatorSymbol::Xor),
                Token::Operator(OperatorSymbol::Not),
                Token::Operator(OperatorSymbol::Eqv),
                Token::Operator(OperatorSymbol::Imp),
                Token::Operator(OperatorSymbol::Is),
            ]
        );
    }

    #[test]
    fn test_edge_comparison_operators() {
        let t = lex_all("= <> < > <= >=");
        assert_eq!(
            t,
            vec![
                Token::ComparisonOperator(ComparisonSymbol::Eq),
                Token::ComparisonOperator(ComparisonSymbol::NotEq),
                Token::ComparisonOperator(ComparisonSymbol::Lt),
                Token::ComparisonOperator(ComparisonSymbol::Gt),
                Token::ComparisonOperator(ComparisonSymbol::LtEq),
                Token::ComparisonOperator(ComparisonSymbol::GtEq),
            ]
        );
    }

    #[test]
    fn test_edge_builtin_values() {
        let t = lex_all("Nothing Null Empty True False");
        assert_eq!(
            t,
            vec![
                Token::BuiltInValue(BuiltInValue::Nothing),
                Token::BuiltInValue(BuiltInValue::Null),
                Token::BuiltInValue(BuiltInValue::Empty),
                Token::BuiltInValue(BuiltInValue::True),
                Token::BuiltInValue(BuiltInValue::False),
            ]
        );
    }

    #[test]
    fn test_edge_decimal_member_access_ambiguity() {
        // ".5" following an identifier is a float literal because the dot is
        // immediately followed by a digit; "Foo.Bar" is two names split by an
        // unresolved accessor token.
        let t = lex_all("Foo.Bar");
        assert_eq!(
            t,
            vec![
                Token::Name(Symbol::intern("Foo")),
                Token::MemberAccessorOrDecimalPoint,
                Token::Name(Symbol::intern("Bar")),
            ]
        );
    }

    #[test]
    fn test_edge_hex_zero() {
        let t = lex_all("&H0");
        assert_eq!(t[0], Token::NumericLiteral(NumericValue::Integer(0), 1));
    }

    #[test]
    fn test_edge_octal_max_digit() {
        let t = lex_all("&O7");
        assert_eq!(t[0], Token::NumericLiteral(NumericValue::Integer(7), 1));
    }

    #[test]
    fn test_err_invalid_hex_no_digits() {
        let mut h = Handler::new();
        assert!(lex("&H", &mut h).is_err());
    }

    #[test]
    fn test_err_unterminated_string_at_eof() {
        let mut h = Handler::new();
        assert!(lex(r#""unterminated"#, &mut h).is_err());
    }

    #[test]
    fn test_err_unterminated_string_at_newline() {
        let mut h = Handler::new();
        assert!(lex("\"abc\ndef\"", &mut h).is_err());
    }

    #[test]
    fn test_edge_whitespace_variations() {
        let t = lex_all("Dim\tX\n=\n1");
        assert!(t.contains(&Token::Keyword(Keyword::Dim)));
        assert!(t.contains(&Token::NumericLiteral(NumericValue::Integer(1), 3)));
    }

    #[test]
    fn test_edge_rem_comment_line() {
        let t = lex_all("REM this is ignored by the parser's statement shape");
        assert!(matches!(t[0], Token::Comment(_)));
    }

    #[test]
    fn test_edge_colon_splits_statements_like_newline() {
        let t = lex_all("x = 1 : y = 2");
        assert_eq!(t.iter().filter(|x| **x == Token::EndOfStatement).count(), 1);
    }
}

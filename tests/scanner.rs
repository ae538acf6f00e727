#[cfg(test)]
mod scanner_tests {
    use pretty_assertions::assert_eq;

    use quill::error::{LexerError, QuillError};
    use quill::scanner::*;
    use quill::token::*;
    use quill::Program;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})[]:;",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACKET, "["),
                (TokenType::RIGHT_BRACKET, "]"),
                (TokenType::COLON, ":"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_compound_operators() {
        assert_token_sequence(
            "++ -- += -= *= /= == != <= >= = < > ! / -",
            &[
                (TokenType::PLUS_PLUS, "++"),
                (TokenType::MINUS_MINUS, "--"),
                (TokenType::PLUS_EQUAL, "+="),
                (TokenType::MINUS_EQUAL, "-="),
                (TokenType::STAR_EQUAL, "*="),
                (TokenType::SLASH_EQUAL, "/="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::EQUAL, "="),
                (TokenType::LESS, "<"),
                (TokenType::GREATER, ">"),
                (TokenType::BANG, "!"),
                (TokenType::SLASH, "/"),
                (TokenType::MINUS, "-"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "var switch case default break fun return nil classy _x1",
            &[
                (TokenType::VAR, "var"),
                (TokenType::SWITCH, "switch"),
                (TokenType::CASE, "case"),
                (TokenType::DEFAULT, "default"),
                (TokenType::BREAK, "break"),
                (TokenType::FUN, "fun"),
                (TokenType::RETURN, "return"),
                (TokenType::NIL, "nil"),
                (TokenType::IDENTIFIER, "classy"),
                (TokenType::IDENTIFIER, "_x1"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_reserved_words() {
        assert_token_sequence(
            "class error",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::ERROR, "error"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_number_literals() {
        let tokens = Scanner::new("12 3.5 7.").scan_tokens().unwrap();

        assert_eq!(tokens[0].literal(), Some(Literal::Number(12.0)));
        assert_eq!(tokens[1].literal(), Some(Literal::Number(3.5)));

        // A trailing dot is not part of the number.
        assert_eq!(tokens[2].lexeme, "7");
        assert_eq!(tokens[3].token_type, TokenType::DOT);
    }

    #[test]
    fn test_scanner_06_multiline_string() {
        let tokens = Scanner::new("\"a\nb\" x").scan_tokens().unwrap();

        assert_eq!(tokens[0].literal(), Some(Literal::Str("a\nb".to_string())));
        assert_eq!(tokens[0].line, 1);

        // The identifier after the string sits on the second line.
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_scanner_07_comments_are_skipped() {
        assert_token_sequence(
            "a // comment ( ) {\nb",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_08_spans() {
        let tokens = Scanner::new("var answer = 42;").scan_tokens().unwrap();

        let answer = &tokens[1];
        assert_eq!((answer.start, answer.length), (4, 6));

        let eof = tokens.last().unwrap();
        assert_eq!(eof.token_type, TokenType::EOF);
        assert_eq!(eof.start, 16);
    }

    #[test]
    fn test_scanner_09_display() {
        let tokens = Scanner::new("x \"hi\" 3").scan_tokens().unwrap();

        let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();

        assert_eq!(
            rendered,
            vec![
                "IDENTIFIER x null",
                "STRING \"hi\" hi",
                "NUMBER 3 3.0",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_10_unterminated_string() {
        let err: LexerError = Scanner::new("var s = \"open").scan_tokens().unwrap_err();

        assert_eq!(err.message, "Unterminated string.");
        assert_eq!(err.offset, 8);

        // Everything before the bad string is still available.
        let kinds: Vec<&str> = err.tokens.iter().map(|t| t.token_type.name()).collect();
        assert_eq!(kinds, vec!["VAR", "IDENTIFIER", "EQUAL"]);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let scanner = Scanner::new(source);

        let results: Vec<_> = scanner.collect();

        // 0: COMMA ','
        // 1: DOT '.'
        // 2: Error for '$'
        // 3: LEFT_PAREN '('
        // 4: Error for '#'
        // 5: EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<&LexerError> = results.iter().filter_map(|r| r.as_ref().err()).collect();
        assert_eq!(errors.len(), 2, "Expected 2 error messages");
        assert_eq!(errors[0].message, "Unexpected character: $");
        assert_eq!(errors[1].message, "Unexpected character: #");

        fn assert_token_matches(
            result: &Result<Token, LexerError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(token.token_type, expected_type);
                    assert_eq!(token.lexeme, expected_lexeme);
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_scanner_11_multibyte_unexpected_char() {
        let results: Vec<_> = Scanner::new("é a").collect();

        assert!(results[0].is_err());
        assert_token_is(&results[1], "a");

        fn assert_token_is(result: &Result<Token, LexerError>, lexeme: &str) {
            assert_eq!(result.as_ref().map(|t| t.lexeme.as_str()).ok(), Some(lexeme));
        }
    }

    #[test]
    fn test_scanner_12_json_dump() {
        let tokens = Scanner::new("x").scan_tokens().unwrap();
        let json = serde_json::to_value(&tokens[0]).unwrap();

        assert_eq!(json["kind"], "IDENTIFIER");
        assert_eq!(json["lexeme"], "x");
        assert_eq!(json["line"], 1);
    }

    #[test]
    fn test_scanner_13_error_span_covers_lexeme() {
        fn span(source: &str) -> Option<(usize, usize)> {
            match Program::parse(source) {
                Err(e @ QuillError::Lexer(_)) => e.span(),
                other => panic!("expected a lexer error, got {:?}", other.err()),
            }
        }

        let source = "var x = 1; €";
        assert_eq!(span(source), Some((11, 3)));
        assert_eq!(source.get(11..14), Some("€"));

        let source = "print \"abc";
        assert_eq!(span(source), Some((6, 4)));
        assert_eq!(source.get(6..10), Some("\"abc"));
    }
}

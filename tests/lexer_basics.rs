use zisk::core::lexer::{LexError, Lexer};
use zisk::core::token::TokenKind;

#[test]
fn var_declaration_tokens_and_positions() {
    let tokens = Lexer::new("var x = 10;").tokenize().expect("lexes");

    assert_eq!(tokens.len(), 6); // var, x, =, 10, ;, EOF
    assert_eq!(tokens[0].kind, TokenKind::Var);
    assert_eq!(tokens[1].kind, TokenKind::Identifier("x".into()));
    assert_eq!(tokens[2].kind, TokenKind::Equals);
    assert_eq!(tokens[3].kind, TokenKind::IntLiteral(10));
    assert_eq!(tokens[4].kind, TokenKind::Semicolon);
    assert_eq!(tokens[5].kind, TokenKind::Eof);

    let positions: Vec<(usize, usize)> =
        tokens.iter().take(5).map(|t| (t.line, t.column)).collect();
    assert_eq!(positions, vec![(1, 1), (1, 5), (1, 7), (1, 9), (1, 11)]);
}

#[test]
fn integers_and_decimals_are_distinct() {
    let tokens = Lexer::new("3 3.5").tokenize().expect("lexes");
    assert_eq!(tokens[0].kind, TokenKind::IntLiteral(3));
    assert_eq!(tokens[1].kind, TokenKind::FloatLiteral(3.5));
}

#[test]
fn keywords_and_booleans() {
    let tokens = Lexer::new("mientras verdadero romper").tokenize().expect("lexes");
    assert_eq!(tokens[0].kind, TokenKind::Mientras);
    assert_eq!(tokens[1].kind, TokenKind::BooleanLiteral(true));
    assert_eq!(tokens[2].kind, TokenKind::Romper);
}

#[test]
fn compound_operators_lex_as_single_tokens() {
    let tokens = Lexer::new("a += 1; b == c; d && e").tokenize().expect("lexes");
    let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
    assert!(kinds.contains(&&TokenKind::PlusEquals));
    assert!(kinds.contains(&&TokenKind::DoubleEquals));
    assert!(kinds.contains(&&TokenKind::AndAnd));
}

#[test]
fn string_escapes() {
    let tokens = Lexer::new(r#""hola\n\t\"mundo\"""#).tokenize().expect("lexes");
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral("hola\n\t\"mundo\"".into()));
}

#[test]
fn line_and_block_comments_are_discarded() {
    let source = "var a = 1; // comentario\n# otro\n/* bloque\nlargo */ var b = 2;";
    let tokens = Lexer::new(source).tokenize().expect("lexes");
    let vars = tokens.iter().filter(|t| t.kind == TokenKind::Var).count();
    assert_eq!(vars, 2);
    // The second `var` sits on line 4 after the block comment.
    let second_var = tokens.iter().filter(|t| t.kind == TokenKind::Var).nth(1).unwrap();
    assert_eq!(second_var.line, 4);
}

#[test]
fn unknown_character_is_a_lex_error() {
    let err = Lexer::new("var x = 1 @ 2;").tokenize().unwrap_err();
    match err {
        LexError::UnexpectedCharacter(ch, line, col) => {
            assert_eq!(ch, '@');
            assert_eq!((line, col), (1, 11));
        }
        other => panic!("expected UnexpectedCharacter, got {:?}", other),
    }
}

#[test]
fn unterminated_string_reports_start_position() {
    let err = Lexer::new("var s = \"abierta").tokenize().unwrap_err();
    assert!(matches!(err, LexError::UnterminatedString(1, 9)));
}

// src/core/lexer.rs

use std::fmt;
use unicode_ident::{is_xid_continue, is_xid_start};
use unicode_normalization::UnicodeNormalization;

use crate::core::token::{keyword_kind, Token, TokenKind};

/// Lexer error types with detailed location.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter(char, usize, usize),
    UnterminatedString(usize, usize),
    UnterminatedComment(usize, usize),
    InvalidNumber(String, usize, usize),
}

impl LexError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            LexError::UnexpectedCharacter(_, line, col)
            | LexError::UnterminatedString(line, col)
            | LexError::UnterminatedComment(line, col)
            | LexError::InvalidNumber(_, line, col) => (*line, *col),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LexError::*;
        match self {
            UnexpectedCharacter(ch, line, col) => {
                write!(f, "unexpected character '{}' at {}:{}", ch, line, col)
            }
            UnterminatedString(line, col) => {
                write!(f, "unterminated string starting at {}:{}", line, col)
            }
            UnterminatedComment(line, col) => {
                write!(f, "unterminated block comment starting at {}:{}", line, col)
            }
            InvalidNumber(num, line, col) => {
                write!(f, "invalid number literal '{}' at {}:{}", num, line, col)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Main lexer struct. Works over NFC-normalized characters and tracks a
/// 1-based line/column for every token start.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self { chars: input.nfc().collect(), pos: 0, line: 1, col: 1 }
    }

    /// Tokenizes the entire source input, appending an EOF sentinel so the
    /// parser never has to special-case the end of the stream.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        tokens.push(Token::new(TokenKind::Eof, "", self.line, self.col));
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            let ch = match self.current() {
                Some(ch) => ch,
                None => return Ok(None),
            };

            if is_whitespace(ch) {
                self.advance_char();
                continue;
            }
            if ch == '/' && self.peek() == Some('/') {
                self.skip_line_comment();
                continue;
            }
            if ch == '/' && self.peek() == Some('*') {
                self.skip_block_comment()?;
                continue;
            }
            if ch == '#' {
                // `###` opens a block comment, a lone `#` runs to end of line.
                if self.peek() == Some('#') && self.peek_at(2) == Some('#') {
                    self.skip_hash_block_comment()?;
                } else {
                    self.skip_line_comment();
                }
                continue;
            }

            let token = if ch.is_ascii_digit() {
                self.lex_number()?
            } else if ch == '"' {
                self.lex_string()?
            } else if is_identifier_start(ch) {
                self.lex_identifier()
            } else if let Some((kind, lexeme)) = self.match_two_char_operator(ch) {
                let (line, col) = self.position();
                self.advance_char();
                self.advance_char();
                Token::new(kind, lexeme, line, col)
            } else if let Some(kind) = match_single_char_token(ch) {
                let (line, col) = self.position();
                self.advance_char();
                Token::new(kind, ch.to_string(), line, col)
            } else {
                let (line, col) = self.position();
                return Err(LexError::UnexpectedCharacter(ch, line, col));
            };
            return Ok(Some(token));
        }
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.peek_at(1)
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    #[inline]
    fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    #[inline]
    fn advance_char(&mut self) {
        if let Some(ch) = self.current() {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.current() {
            if ch == '\n' {
                self.advance_char();
                break;
            }
            self.advance_char();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let (start_line, start_col) = self.position();
        self.advance_char(); // '/'
        self.advance_char(); // '*'
        while let Some(ch) = self.current() {
            if ch == '*' && self.peek() == Some('/') {
                self.advance_char();
                self.advance_char();
                return Ok(());
            }
            self.advance_char();
        }
        Err(LexError::UnterminatedComment(start_line, start_col))
    }

    fn skip_hash_block_comment(&mut self) -> Result<(), LexError> {
        let (start_line, start_col) = self.position();
        for _ in 0..3 {
            self.advance_char();
        }
        while let Some(ch) = self.current() {
            if ch == '#' && self.peek() == Some('#') && self.peek_at(2) == Some('#') {
                for _ in 0..3 {
                    self.advance_char();
                }
                return Ok(());
            }
            self.advance_char();
        }
        Err(LexError::UnterminatedComment(start_line, start_col))
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        let (line, col) = self.position();
        let mut num_str = String::new();
        let mut has_decimal = false;
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance_char();
            } else if ch == '.' && !has_decimal && self.peek().map_or(false, |c| c.is_ascii_digit())
            {
                has_decimal = true;
                num_str.push(ch);
                self.advance_char();
            } else {
                break;
            }
        }
        let kind = if has_decimal {
            num_str
                .parse::<f64>()
                .map(TokenKind::FloatLiteral)
                .map_err(|_| LexError::InvalidNumber(num_str.clone(), line, col))?
        } else {
            num_str
                .parse::<i64>()
                .map(TokenKind::IntLiteral)
                .map_err(|_| LexError::InvalidNumber(num_str.clone(), line, col))?
        };
        Ok(Token::new(kind, num_str, line, col))
    }

    fn lex_string(&mut self) -> Result<Token, LexError> {
        let (line, col) = self.position();
        self.advance_char(); // consume opening quote
        let mut content = String::new();
        let mut escape = false;
        while let Some(ch) = self.current() {
            if !escape {
                match ch {
                    '"' => {
                        self.advance_char();
                        let lexeme = format!("\"{}\"", content);
                        return Ok(Token::new(
                            TokenKind::StringLiteral(content),
                            lexeme,
                            line,
                            col,
                        ));
                    }
                    '\\' => {
                        escape = true;
                        self.advance_char();
                    }
                    _ => {
                        content.push(ch);
                        self.advance_char();
                    }
                }
            } else {
                let esc_ch = match ch {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                };
                content.push(esc_ch);
                self.advance_char();
                escape = false;
            }
        }
        Err(LexError::UnterminatedString(line, col))
    }

    fn lex_identifier(&mut self) -> Token {
        let (line, col) = self.position();
        let mut ident = String::new();
        while let Some(ch) = self.current() {
            if is_identifier_part(ch) {
                ident.push(ch);
                self.advance_char();
            } else {
                break;
            }
        }
        let kind = keyword_kind(&ident).unwrap_or_else(|| TokenKind::Identifier(ident.clone()));
        Token::new(kind, ident, line, col)
    }

    fn match_two_char_operator(&self, ch: char) -> Option<(TokenKind, &'static str)> {
        let pair = match (ch, self.peek()?) {
            ('=', '=') => (TokenKind::DoubleEquals, "=="),
            ('!', '=') => (TokenKind::NotEquals, "!="),
            ('<', '=') => (TokenKind::LessEqual, "<="),
            ('>', '=') => (TokenKind::GreaterEqual, ">="),
            ('&', '&') => (TokenKind::AndAnd, "&&"),
            ('|', '|') => (TokenKind::OrOr, "||"),
            ('+', '=') => (TokenKind::PlusEquals, "+="),
            ('-', '=') => (TokenKind::MinusEquals, "-="),
            ('*', '=') => (TokenKind::StarEquals, "*="),
            ('/', '=') => (TokenKind::SlashEquals, "/="),
            ('%', '=') => (TokenKind::PercentEquals, "%="),
            _ => return None,
        };
        Some(pair)
    }
}

fn match_single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '%' => Some(TokenKind::Percent),
        '=' => Some(TokenKind::Equals),
        '<' => Some(TokenKind::Less),
        '>' => Some(TokenKind::Greater),
        '!' => Some(TokenKind::Bang),
        '(' => Some(TokenKind::OpenParen),
        ')' => Some(TokenKind::CloseParen),
        '{' => Some(TokenKind::OpenBrace),
        '}' => Some(TokenKind::CloseBrace),
        '[' => Some(TokenKind::OpenBracket),
        ']' => Some(TokenKind::CloseBracket),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Dot),
        ';' => Some(TokenKind::Semicolon),
        ':' => Some(TokenKind::Colon),
        _ => None,
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || is_xid_start(ch)
}

fn is_identifier_part(ch: char) -> bool {
    ch == '_' || is_xid_continue(ch)
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\u{FEFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .expect("lexes")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn multi_char_operators_win_over_prefixes() {
        assert_eq!(
            kinds("a <= b == c"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::LessEqual,
                TokenKind::Identifier("b".into()),
                TokenKind::DoubleEquals,
                TokenKind::Identifier("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_prefix_does_not_truncate_identifier() {
        assert_eq!(
            kinds("variable"),
            vec![TokenKind::Identifier("variable".into()), TokenKind::Eof]
        );
        assert_eq!(kinds("si sino"), vec![TokenKind::Si, TokenKind::Sino, TokenKind::Eof]);
    }

    #[test]
    fn comments_advance_positions() {
        let tokens = Lexer::new("// una linea\nvar x").tokenize().expect("lexes");
        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!((tokens[0].line, tokens[0].column), (2, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 5));
    }

    #[test]
    fn block_comment_must_terminate() {
        let err = Lexer::new("var x /* sin cierre").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedComment(1, 7)));
    }
}

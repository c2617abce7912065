// src/core/token.rs

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Every token category the Zisk lexer can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Identifiers and literals
    Identifier(String),
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    BooleanLiteral(bool),
    /// Built-in type name usable in annotations (`entero`, `decimal`, ...).
    TypeName(String),

    // Operators
    Plus,          // +
    Minus,         // -
    Star,          // *
    Slash,         // /
    Percent,       // %
    Equals,        // =
    PlusEquals,    // +=
    MinusEquals,   // -=
    StarEquals,    // *=
    SlashEquals,   // /=
    PercentEquals, // %=
    DoubleEquals,  // ==
    NotEquals,     // !=
    Less,          // <
    LessEqual,     // <=
    Greater,       // >
    GreaterEqual,  // >=
    AndAnd,        // &&
    OrOr,          // ||
    Bang,          // !

    // Delimiters
    OpenParen,    // (
    CloseParen,   // )
    OpenBrace,    // {
    CloseBrace,   // }
    OpenBracket,  // [
    CloseBracket, // ]
    Comma,        // ,
    Dot,          // .
    Semicolon,    // ;
    Colon,        // :

    // Keywords
    Var,
    Const,
    Funcion,
    Clase,
    Extiende,
    Nuevo,
    Este,
    Importa,
    Como,
    Si,
    Entonces,
    Sino,
    Mientras,
    Para,
    HacerMientras,
    Romper,
    Continua,
    Retorna,
    Try,
    Catch,
    Finally,
    Mostrar,
    Ingresar,
    Estatico,
    Publico,
    Privado,
    Nulo,

    // Special
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind, lexeme: lexeme.into(), line, column }
    }
}

/// Reserved words, built once. Keyed by the complete lexeme, which
/// sidesteps keyword-prefix ambiguity (`mientras` vs an identifier
/// `mientras2`): the lexer always consumes the whole identifier first.
static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("var", TokenKind::Var);
    map.insert("const", TokenKind::Const);
    map.insert("funcion", TokenKind::Funcion);
    map.insert("clase", TokenKind::Clase);
    map.insert("extiende", TokenKind::Extiende);
    map.insert("nuevo", TokenKind::Nuevo);
    map.insert("este", TokenKind::Este);
    map.insert("importa", TokenKind::Importa);
    map.insert("como", TokenKind::Como);
    map.insert("si", TokenKind::Si);
    map.insert("entonces", TokenKind::Entonces);
    map.insert("sino", TokenKind::Sino);
    map.insert("mientras", TokenKind::Mientras);
    map.insert("para", TokenKind::Para);
    map.insert("hacer_mientras", TokenKind::HacerMientras);
    // Both spellings of loop exit are reserved.
    map.insert("romper", TokenKind::Romper);
    map.insert("break", TokenKind::Romper);
    map.insert("continua", TokenKind::Continua);
    map.insert("retorna", TokenKind::Retorna);
    map.insert("try", TokenKind::Try);
    map.insert("catch", TokenKind::Catch);
    map.insert("finally", TokenKind::Finally);
    map.insert("mostrar", TokenKind::Mostrar);
    map.insert("ingresar", TokenKind::Ingresar);
    map.insert("estatico", TokenKind::Estatico);
    map.insert("publico", TokenKind::Publico);
    map.insert("privado", TokenKind::Privado);
    map.insert("verdadero", TokenKind::BooleanLiteral(true));
    map.insert("falso", TokenKind::BooleanLiteral(false));
    map.insert("nulo", TokenKind::Nulo);
    for ty in ["entero", "decimal", "texto", "booleano", "lista", "objeto"] {
        map.insert(ty, TokenKind::TypeName(ty.to_string()));
    }
    map
});

/// Maps a full identifier to its keyword kind, if it is one.
pub fn keyword_kind(ident: &str) -> Option<TokenKind> {
    KEYWORDS.get(ident).cloned()
}

// Implement Display for TokenKind for better error messages
impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::IntLiteral(_) | TokenKind::FloatLiteral(_) => "number",
            TokenKind::StringLiteral(_) => "string",
            TokenKind::BooleanLiteral(_) => "boolean",
            TokenKind::TypeName(_) => "type name",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Equals => "=",
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::StarEquals => "*=",
            TokenKind::SlashEquals => "/=",
            TokenKind::PercentEquals => "%=",
            TokenKind::DoubleEquals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Var => "var",
            TokenKind::Const => "const",
            TokenKind::Funcion => "funcion",
            TokenKind::Clase => "clase",
            TokenKind::Extiende => "extiende",
            TokenKind::Nuevo => "nuevo",
            TokenKind::Este => "este",
            TokenKind::Importa => "importa",
            TokenKind::Como => "como",
            TokenKind::Si => "si",
            TokenKind::Entonces => "entonces",
            TokenKind::Sino => "sino",
            TokenKind::Mientras => "mientras",
            TokenKind::Para => "para",
            TokenKind::HacerMientras => "hacer_mientras",
            TokenKind::Romper => "romper",
            TokenKind::Continua => "continua",
            TokenKind::Retorna => "retorna",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Mostrar => "mostrar",
            TokenKind::Ingresar => "ingresar",
            TokenKind::Estatico => "estatico",
            TokenKind::Publico => "publico",
            TokenKind::Privado => "privado",
            TokenKind::Nulo => "nulo",
            TokenKind::Eof => "end of file",
        };
        write!(f, "{}", name)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TokenKind::Identifier(name) => {
                write!(f, "Identifier('{}') @{}:{}", name, self.line, self.column)
            }
            TokenKind::IntLiteral(v) => write!(f, "Int({}) @{}:{}", v, self.line, self.column),
            TokenKind::FloatLiteral(v) => write!(f, "Float({}) @{}:{}", v, self.line, self.column),
            TokenKind::StringLiteral(s) => {
                write!(f, "String(\"{}\") @{}:{}", s, self.line, self.column)
            }
            TokenKind::BooleanLiteral(b) => {
                write!(f, "Boolean({}) @{}:{}", b, self.line, self.column)
            }
            TokenKind::TypeName(t) => write!(f, "Type('{}') @{}:{}", t, self.line, self.column),
            other => write!(f, "{} @{}:{}", other, self.line, self.column),
        }
    }
}

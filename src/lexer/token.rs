use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Raw body of a char literal, escapes kept as written (`\n` is two chars).
    Char(String),
    Float(f64),
    Integer(i64),
    /// Raw body of a string literal, escapes kept as written.
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Char,
    CharPtr,
    Void,
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeName::Int => "int",
            TypeName::Char => "char",
            TypeName::CharPtr => "char*",
            TypeName::Void => "void",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    Comma,
    LBrace,
    LBracket,
    LParen,
    RBrace,
    RBracket,
    RParen,
    Semicolon,

    And,
    BangEq,
    EqEqual,
    Equal,
    Greater,
    GreaterEq,
    Lesser,
    LesserEq,
    Minus,
    Or,
    Plus,
    Slash,
    Star,

    KElse,
    KFn,
    KIf,
    KLet,
    KPrint,
    KReturn,
    KWhile,

    Type(TypeName),
    Literal(Literal),
    Identifier(String),
    Comment(String),

    Error,
    EOF,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span(pub usize, pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub span: Span,
    pub line: usize,
    pub column: usize,
    pub tok_type: TokenType,
}

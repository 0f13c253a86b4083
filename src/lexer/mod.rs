pub mod token;


use lazy_static::lazy_static;
use std::collections::HashMap;
use std::str::Chars;
use thiserror::Error;
use token::{Literal, Span, Token, TokenType, TypeName};

macro_rules! hash_map {
    ( $( $key: expr => $value: expr ),* $(,)? ) => {{
        let mut m = HashMap::new();
        $(
            m.insert($key, $value);
        )*
        m
    }}
}

macro_rules! multi_char_tok {
    ( $self: ident, $orig: expr; $c: literal => $tt: expr ) => {
        match $self.peek() {
            Some($c) => {
                $self.advance();
                Ok($self.make_token($tt))
            }
            _ => Ok($self.make_token($orig)),
        }
    };
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = hash_map! {
        "ah"     => TokenType::KFn,
        "fn"     => TokenType::KFn,
        "beg"    => TokenType::KLet,
        "let"    => TokenType::KLet,
        "boo"    => TokenType::KPrint,
        "print"  => TokenType::KPrint,
        "else"   => TokenType::KElse,
        "if"     => TokenType::KIf,
        "return" => TokenType::KReturn,
        "while"  => TokenType::KWhile,
    };
    static ref TYPES: HashMap<&'static str, TypeName> = hash_map! {
        "int"  => TypeName::Int,
        "char" => TypeName::Char,
        "void" => TypeName::Void,
    };
}

#[derive(Error, Debug)]
pub enum LexerErrorType {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid char literal")]
    InvalidCharLiteral,

    #[error("integer literal `{0}` is out of range")]
    IntegerOutOfRange(String),
}

pub type LexerResult = Result<Token, LexerError>;

#[derive(Error, Debug)]
#[error("LexError at line {}, column {}: {error}", .token.line, .token.column)]
pub struct LexerError {
    pub token: Token,
    #[source]
    pub error: LexerErrorType,
}

pub struct Lexer<'a> {
    input_str: &'a str,
    input: Chars<'a>,
    line: usize,
    /// Chars consumed since the start of the current line.
    column: usize,
    start_column: usize,
    start: usize,
    current: usize,
    eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input_str: &'a str) -> Self {
        Self {
            input_str,
            input: input_str.chars(),
            line: 1,
            column: 0,
            start_column: 0,
            start: 0,
            current: 0,
            eof: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.clone().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.next()?;
        self.current += c.len_utf8();
        self.column += 1;
        Some(c)
    }

    fn make_token(&self, tok_type: TokenType) -> Token {
        Token {
            tok_type,
            span: Span(self.start, self.current),
            line: self.line,
            column: self.start_column,
        }
    }

    fn make_error(&self, error: LexerErrorType) -> LexerError {
        LexerError {
            token: self.make_token(TokenType::Error),
            error,
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some('\r' | '\t' | ' ') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 0;
                }
                _ => break,
            };
        }
    }

    fn get_lexeme(&self) -> &'a str {
        &self.input_str[self.start..self.current]
    }

    fn number(&mut self) -> LexerResult {
        while let Some('0'..='9') = self.peek() {
            self.advance();
        }

        if let Some('.') = self.peek() {
            self.advance();
            while let Some('0'..='9') = self.peek() {
                self.advance();
            }
            let float = self
                .get_lexeme()
                .parse::<f64>()
                .unwrap_or_else(|_| unreachable!("digits with a single dot"));
            Ok(self.make_token(TokenType::Literal(Literal::Float(float))))
        } else {
            let lexeme = self.get_lexeme();
            match lexeme.parse::<i64>() {
                Ok(int) => Ok(self.make_token(TokenType::Literal(Literal::Integer(int)))),
                Err(_) => Err(self.make_error(LexerErrorType::IntegerOutOfRange(
                    lexeme.to_string(),
                ))),
            }
        }
    }

    fn string(&mut self) -> LexerResult {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(self.make_error(LexerErrorType::UnterminatedString))
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        None | Some('\n') => {
                            return Err(self.make_error(LexerErrorType::UnterminatedString))
                        }
                        Some(_) => self.advance(),
                    };
                }
                Some(_) => {
                    self.advance();
                }
            };
        }
        let body = &self.input_str[self.start + 1..self.current - 1];
        Ok(self.make_token(TokenType::Literal(Literal::String(body.to_string()))))
    }

    fn char_literal(&mut self) -> LexerResult {
        match self.peek() {
            None | Some('\n' | '\'') => {
                return Err(self.make_error(LexerErrorType::InvalidCharLiteral))
            }
            Some('\\') => {
                self.advance();
                if let None | Some('\n') = self.advance() {
                    return Err(self.make_error(LexerErrorType::InvalidCharLiteral));
                }
            }
            Some(_) => {
                self.advance();
            }
        };

        match self.advance() {
            Some('\'') => {
                let body = &self.input_str[self.start + 1..self.current - 1];
                Ok(self.make_token(TokenType::Literal(Literal::Char(body.to_string()))))
            }
            _ => Err(self.make_error(LexerErrorType::InvalidCharLiteral)),
        }
    }

    fn comment(&mut self) -> LexerResult {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        let text = self.get_lexeme().trim_end_matches('\r').to_string();
        Ok(self.make_token(TokenType::Comment(text)))
    }

    fn identifier(&mut self) -> LexerResult {
        loop {
            match self.peek() {
                Some(c) if c == '_' || c.is_ascii_alphanumeric() => self.advance(),
                _ => break,
            };
        }
        let lexeme = self.get_lexeme();

        if let Some(ty) = TYPES.get(lexeme) {
            if *ty == TypeName::Char && self.peek() == Some('*') {
                self.advance();
                return Ok(self.make_token(TokenType::Type(TypeName::CharPtr)));
            }
            Ok(self.make_token(TokenType::Type(*ty)))
        } else if let Some(ttype) = KEYWORDS.get(lexeme) {
            Ok(self.make_token(ttype.clone()))
        } else {
            Ok(self.make_token(TokenType::Identifier(lexeme.to_string())))
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        while !self.eof {
            tokens.push(self.next_token()?);
        }
        Ok(tokens)
    }

    pub fn next_token(&mut self) -> LexerResult {
        self.skip_whitespace();

        self.start = self.current;
        self.start_column = self.column;
        let Some(c) = self.advance() else {
            self.eof = true;
            return Ok(self.make_token(TokenType::EOF));
        };

        match c {
            ',' => Ok(self.make_token(TokenType::Comma)),
            '{' => Ok(self.make_token(TokenType::LBrace)),
            '[' => Ok(self.make_token(TokenType::LBracket)),
            '(' => Ok(self.make_token(TokenType::LParen)),
            '}' => Ok(self.make_token(TokenType::RBrace)),
            ']' => Ok(self.make_token(TokenType::RBracket)),
            ')' => Ok(self.make_token(TokenType::RParen)),
            ';' => Ok(self.make_token(TokenType::Semicolon)),
            '+' => Ok(self.make_token(TokenType::Plus)),
            '-' => Ok(self.make_token(TokenType::Minus)),
            '*' => Ok(self.make_token(TokenType::Star)),

            '=' => multi_char_tok!(self, TokenType::Equal; '=' => TokenType::EqEqual),
            '>' => multi_char_tok!(self, TokenType::Greater; '=' => TokenType::GreaterEq),
            '<' => multi_char_tok!(self, TokenType::Lesser; '=' => TokenType::LesserEq),
            '!' | '&' | '|' => match (c, self.peek()) {
                ('!', Some('=')) => {
                    self.advance();
                    Ok(self.make_token(TokenType::BangEq))
                }
                ('&', Some('&')) => {
                    self.advance();
                    Ok(self.make_token(TokenType::And))
                }
                ('|', Some('|')) => {
                    self.advance();
                    Ok(self.make_token(TokenType::Or))
                }
                _ => Err(self.make_error(LexerErrorType::UnexpectedChar(c))),
            },
            '/' => match self.peek() {
                Some('/') => self.comment(),
                _ => Ok(self.make_token(TokenType::Slash)),
            },

            '\'' => self.char_literal(),
            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),
            c if c == '_' || c.is_ascii_alphabetic() => self.identifier(),
            _ => Err(self.make_error(LexerErrorType::UnexpectedChar(c))),
        }
    }
}

pub mod ast;
mod expr;
pub mod pretty_print_ast;
mod stmt;


use crate::lexer::token::{Literal, Span, Token, TokenType, TypeName};
use crate::translator::r#type::{Base, Type};
use ast::*;
use multipeek::{multipeek, MultiPeek};
use thiserror::Error;

// <program>        ::= <item>* EOF
// <item>           ::= <comment> | <function> | <let>
// <function>       ::= "ah" <type>? <identifier> "(" <params>? ")" ( <block> | ";" )
// <params>         ::= <param> ( "," <param> )*
// <param>          ::= <type>? <identifier> ( "[" "]" )?
// <type>           ::= TYPE "*"?
// <block>          ::= "{" <statement>* "}"
// <statement>      ::= <comment> | <let> | <print> | <if> | <while> | <return>
//                    | <identifier> "=" <expr> ";"
//                    | <identifier> "[" <expr> "]" "=" <expr> ";"
//                    | <call> ";"
// <let>            ::= "beg" <type>? <identifier> ( "=" <expr> | "[" <integer> "]" )? ";"
// <print>          ::= "boo" "(" <expr> ")" ";"
// <if>             ::= "if" <expr> <block> ( <comment>* "else" ( <if> | <block> ) )?
// <while>          ::= "while" <expr> <block>
// <return>         ::= "return" <expr> ";"
// <expr>           ::= <relational> ( ( "&&" | "||" ) <relational> )*
// <relational>     ::= <additive> ( ( "==" | "!=" | "<" | ">" | "<=" | ">=" ) <additive> )*
// <additive>       ::= <multiplicative> ( ( "+" | "-" ) <multiplicative> )*
// <multiplicative> ::= <unary> ( ( "*" | "/" ) <unary> )*
// <unary>          ::= "-" <unary> | <atom>
// <atom>           ::= <literal> | "(" <expr> ")" | <call>
//                    | <identifier> "[" <expr> "]" | <identifier>
// <call>           ::= <identifier> "(" ( <expr> ( "," <expr> )* )? ")"

macro_rules! parse_binary_expr {
    ( $self: ident, $ops: pat, $nextp: ident ) => {{
        let mut lhs = $self.$nextp()?;
        while let $ops = $self.peek_token_type() {
            let op_token = $self.advance();
            let op = binary_tt_to_op(&op_token.tok_type);
            let rhs = Box::new($self.$nextp()?);
            lhs = Expr::Binary(Binary {
                op: WithToken(op, op_token),
                lhs: Box::new(lhs),
                rhs,
            })
        }
        Ok(lhs)
    }};
}

#[derive(Error, Debug)]
#[error("SyntaxError on line {}: {error}", .token.line)]
pub struct ParseError {
    pub token: Token,
    #[source]
    pub error: ParseErrorType,
}

#[derive(Error, Debug)]
pub enum ParseErrorType {
    #[error("expected `{exp}`, got {got:?}")]
    Expected { exp: &'static str, got: String },

    #[error("expected a function, a global `beg` or a comment, got {got:?}")]
    UnexpectedGlobal { got: String },

    #[error("expected a statement, got {got:?}")]
    UnexpectedStatement { got: String },

    #[error("expected `=`, `(` or `[` after `{name}`, got {got:?}")]
    InvalidIdentifierStatement { name: String, got: String },

    #[error("expected an expression, got {got:?}")]
    UnexpectedExpression { got: String },

    #[error("array size must be a positive integer, got {got:?}")]
    ArraySize { got: String },

    #[error("array declaration must have an explicit type (`{name}`)")]
    ArrayWithoutType { name: String },

    #[error("declaration without initializer must have an explicit type (`{name}`)")]
    DeclarationWithoutType { name: String },

    #[error("`{0}` cannot be used as a pointer type")]
    InvalidPointerType(TypeName),

    #[error("expected `if` or `{{` after `else`, got {got:?}")]
    ExpectedAfterElse { got: String },

    #[error("expected `{{` or `;` after function signature, got {got:?}")]
    ExpectedAfterSignature { got: String },
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'a> {
    input: &'a str,
    tokens: MultiPeek<<Vec<Token> as IntoIterator>::IntoIter>,
    eof: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(token) if token.tok_type == TokenType::EOF => token.clone(),
            _ => Token {
                span: Span(input.len(), input.len()),
                line: input.lines().count().max(1),
                column: 0,
                tok_type: TokenType::EOF,
            },
        };

        Self {
            input,
            tokens: multipeek(tokens.into_iter()),
            eof,
        }
    }

    fn peek(&mut self) -> &Token {
        match self.tokens.peek() {
            Some(token) => token,
            None => &self.eof,
        }
    }

    fn peek_nth(&mut self, n: usize) -> &Token {
        match self.tokens.peek_nth(n) {
            Some(token) => token,
            None => &self.eof,
        }
    }

    fn peek_token_type(&mut self) -> &TokenType {
        &self.peek().tok_type
    }

    fn peek_next(&mut self) -> &Token {
        self.peek_nth(1)
    }

    fn advance(&mut self) -> Token {
        self.tokens.next().unwrap_or_else(|| self.eof.clone())
    }

    fn match_(&mut self, tok_type: TokenType) -> bool {
        if *self.peek_token_type() == tok_type {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Source text of the current token, used in diagnostics.
    fn got(&mut self) -> String {
        let input = self.input;
        let token = self.peek();
        match token.tok_type {
            TokenType::EOF => String::from("<eof>"),
            _ => input[token.span.0..token.span.1].to_string(),
        }
    }

    fn consume(&mut self, tok_type: TokenType, exp: &'static str) -> ParseResult<Token> {
        if *self.peek_token_type() == tok_type {
            Ok(self.advance())
        } else {
            Err(self.expected(exp))
        }
    }

    fn consume_identifier(&mut self) -> ParseResult<WithToken<String>> {
        match self.peek_token_type() {
            TokenType::Identifier(ident) => {
                let ident = ident.clone();
                Ok(WithToken(ident, self.advance()))
            }
            _ => Err(self.expected("<identifier>")),
        }
    }

    fn consume_comment(&mut self) -> ParseResult<WithToken<String>> {
        match self.peek_token_type() {
            TokenType::Comment(text) => {
                let text = text.clone();
                Ok(WithToken(text, self.advance()))
            }
            _ => Err(self.expected("<comment>")),
        }
    }

    fn expected(&mut self, exp: &'static str) -> ParseError {
        let got = self.got();
        self.error_at_current(ParseErrorType::Expected { exp, got })
    }

    fn error_at(&self, token: Token, error: ParseErrorType) -> ParseError {
        ParseError { token, error }
    }

    fn error_at_current(&mut self, error: ParseErrorType) -> ParseError {
        let token = self.peek().clone();
        ParseError { token, error }
    }
}

impl<'a> Parser<'a> {
    pub fn program(&mut self) -> ParseResult<Program> {
        let mut items = Vec::new();
        while !self.match_(TokenType::EOF) {
            items.push(self.item()?);
        }
        Ok(Program(items))
    }

    fn item(&mut self) -> ParseResult<Item> {
        match self.peek_token_type() {
            TokenType::Comment(_) => self.consume_comment().map(Item::Comment),
            TokenType::KFn => self.function_decl().map(Item::Function),
            TokenType::KLet => self.var_decl().map(Item::Global),
            _ => {
                let got = self.got();
                Err(self.error_at_current(ParseErrorType::UnexpectedGlobal { got }))
            }
        }
    }

    fn function_decl(&mut self) -> ParseResult<FunctionDecl> {
        self.consume(TokenType::KFn, "ah")?;
        let ret = self.optional_type()?.unwrap_or(Type::Int);
        let name = self.consume_identifier()?;

        self.consume(TokenType::LParen, "(")?;
        let mut params = Vec::new();
        if *self.peek_token_type() != TokenType::RParen {
            loop {
                params.push(self.param()?);
                if !self.match_(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen, ")")?;

        let body = match self.peek_token_type() {
            TokenType::Semicolon => {
                self.advance();
                None
            }
            TokenType::LBrace => Some(self.block()?),
            _ => {
                let got = self.got();
                return Err(self.error_at_current(ParseErrorType::ExpectedAfterSignature { got }));
            }
        };

        Ok(FunctionDecl {
            name,
            ret,
            params,
            body,
        })
    }

    fn param(&mut self) -> ParseResult<Param> {
        let ty = self.optional_type()?.unwrap_or(Type::Int);
        let name = self.consume_identifier()?;
        let array = if self.match_(TokenType::LBracket) {
            self.consume(TokenType::RBracket, "]")?;
            true
        } else {
            false
        };
        Ok(Param { name, ty, array })
    }

    fn optional_type(&mut self) -> ParseResult<Option<Type>> {
        let TokenType::Type(name) = self.peek_token_type() else {
            return Ok(None);
        };
        let name = *name;
        self.advance();

        if *self.peek_token_type() != TokenType::Star {
            return Ok(Some(type_name_to_type(name)));
        }
        match name {
            TypeName::Int => {
                self.advance();
                Ok(Some(Type::Pointer(Base::Int)))
            }
            TypeName::Char => {
                self.advance();
                Ok(Some(Type::Str))
            }
            _ => Err(self.error_at_current(ParseErrorType::InvalidPointerType(name))),
        }
    }

    fn block(&mut self) -> ParseResult<Block> {
        self.consume(TokenType::LBrace, "{")?;
        let mut body = Vec::new();
        while !matches!(self.peek_token_type(), TokenType::RBrace | TokenType::EOF) {
            body.push(self.statement()?);
        }
        self.consume(TokenType::RBrace, "}")?;
        Ok(Block(body))
    }
}

impl<'a> Parser<'a> {
    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.peek_token_type() {
            TokenType::Comment(_) => self.consume_comment().map(Stmt::Comment),
            TokenType::KLet => self.var_decl().map(Stmt::Let),
            TokenType::KPrint => self.print_stmt(),
            TokenType::KIf => self.if_stmt().map(Stmt::If),
            TokenType::KWhile => self.while_stmt(),
            TokenType::KReturn => self.return_stmt(),
            TokenType::Identifier(_) => self.identifier_stmt(),
            _ => {
                let got = self.got();
                Err(self.error_at_current(ParseErrorType::UnexpectedStatement { got }))
            }
        }
    }

    fn var_decl(&mut self) -> ParseResult<VarDecl> {
        self.consume(TokenType::KLet, "beg")?;
        let ty = self.optional_type()?;
        let name = self.consume_identifier()?;

        let kind = match self.peek_token_type() {
            TokenType::Equal => {
                self.advance();
                let value = self.expression()?;
                VarDeclKind::Init { ty, value }
            }
            TokenType::LBracket => {
                let Some(ty) = ty else {
                    return Err(self.error_at(
                        name.1,
                        ParseErrorType::ArrayWithoutType { name: name.0 },
                    ));
                };
                self.advance();
                let size = self.array_size()?;
                self.consume(TokenType::RBracket, "]")?;
                VarDeclKind::Array { ty, size }
            }
            TokenType::Semicolon => {
                let Some(ty) = ty else {
                    return Err(self.error_at(
                        name.1,
                        ParseErrorType::DeclarationWithoutType { name: name.0 },
                    ));
                };
                VarDeclKind::Uninit(ty)
            }
            _ => return Err(self.expected("=")),
        };
        self.consume(TokenType::Semicolon, ";")?;

        Ok(VarDecl { name, kind })
    }

    fn array_size(&mut self) -> ParseResult<WithToken<i64>> {
        match self.peek_token_type() {
            TokenType::Literal(Literal::Integer(size)) if *size > 0 => {
                let size = *size;
                Ok(WithToken(size, self.advance()))
            }
            _ => {
                let got = self.got();
                Err(self.error_at_current(ParseErrorType::ArraySize { got }))
            }
        }
    }

    fn print_stmt(&mut self) -> ParseResult<Stmt> {
        let token = self.consume(TokenType::KPrint, "boo")?;
        self.consume(TokenType::LParen, "(")?;
        let value = WithToken(self.expression()?, token);
        self.consume(TokenType::RParen, ")")?;
        self.consume(TokenType::Semicolon, ";")?;
        Ok(Stmt::Print(value))
    }

    fn if_stmt(&mut self) -> ParseResult<IfStmt> {
        let token = self.consume(TokenType::KIf, "if")?;
        let cond = WithToken(self.expression()?, token);
        let then = self.block()?;

        // Comments may sit between the closing brace and `else`.
        let mut n = 0;
        while let TokenType::Comment(_) = self.peek_nth(n).tok_type {
            n += 1;
        }

        let mut else_comments = Vec::new();
        let else_clause = if self.peek_nth(n).tok_type == TokenType::KElse {
            for _ in 0..n {
                else_comments.push(self.consume_comment()?);
            }
            self.advance();
            match self.peek_token_type() {
                TokenType::KIf => Some(ElseClause::If(Box::new(self.if_stmt()?))),
                TokenType::LBrace => Some(ElseClause::Block(self.block()?)),
                _ => {
                    let got = self.got();
                    return Err(self.error_at_current(ParseErrorType::ExpectedAfterElse { got }));
                }
            }
        } else {
            None
        };

        Ok(IfStmt {
            cond,
            then,
            else_comments,
            else_clause,
        })
    }

    fn while_stmt(&mut self) -> ParseResult<Stmt> {
        let token = self.consume(TokenType::KWhile, "while")?;
        let cond = WithToken(self.expression()?, token);
        let body = self.block()?;
        Ok(Stmt::While(WhileStmt { cond, body }))
    }

    fn return_stmt(&mut self) -> ParseResult<Stmt> {
        let token = self.consume(TokenType::KReturn, "return")?;
        let ret_value = WithToken(self.expression()?, token);
        self.consume(TokenType::Semicolon, ";")?;
        Ok(Stmt::Return(ret_value))
    }

    fn identifier_stmt(&mut self) -> ParseResult<Stmt> {
        let stmt = match self.peek_next().tok_type {
            TokenType::LParen => Stmt::Call(self.call()?),
            TokenType::Equal => {
                let name = self.consume_identifier()?;
                self.advance();
                let value = self.expression()?;
                Stmt::Assign(Assign { name, value })
            }
            TokenType::LBracket => {
                let name = self.consume_identifier()?;
                self.advance();
                let index = self.expression()?;
                self.consume(TokenType::RBracket, "]")?;
                self.consume(TokenType::Equal, "=")?;
                let value = self.expression()?;
                Stmt::IndexAssign(IndexAssign { name, index, value })
            }
            _ => {
                let name = self.consume_identifier()?;
                let got = self.got();
                return Err(self.error_at_current(ParseErrorType::InvalidIdentifierStatement {
                    name: name.0,
                    got,
                }));
            }
        };
        self.consume(TokenType::Semicolon, ";")?;
        Ok(stmt)
    }
}

impl<'a> Parser<'a> {
    // Methods for parsing expressions

    pub fn expression(&mut self) -> ParseResult<Expr> {
        self.logical()
    }

    fn logical(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(self, TokenType::And | TokenType::Or, relational)
    }

    fn relational(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(
            self,
            TokenType::EqEqual
                | TokenType::BangEq
                | TokenType::Greater
                | TokenType::GreaterEq
                | TokenType::Lesser
                | TokenType::LesserEq,
            additive
        )
    }

    fn additive(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(self, TokenType::Plus | TokenType::Minus, multiplicative)
    }

    fn multiplicative(&mut self) -> ParseResult<Expr> {
        parse_binary_expr!(self, TokenType::Star | TokenType::Slash, unary)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        match self.peek_token_type() {
            TokenType::Minus => {
                let op = self.advance();
                let expr = Box::new(self.unary()?);
                Ok(Expr::Negate(Negate { op, expr }))
            }
            _ => self.atom(),
        }
    }

    fn atom(&mut self) -> ParseResult<Expr> {
        match self.peek_token_type() {
            TokenType::Literal(lit) => {
                let lit = lit.clone();
                Ok(Expr::Literal(WithToken(lit, self.advance())))
            }
            TokenType::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenType::RParen, ")")?;
                Ok(expr)
            }
            TokenType::Identifier(_) => match self.peek_next().tok_type {
                TokenType::LParen => self.call().map(Expr::Call),
                TokenType::LBracket => {
                    let name = self.consume_identifier()?;
                    self.advance();
                    let index = Box::new(self.expression()?);
                    self.consume(TokenType::RBracket, "]")?;
                    Ok(Expr::Index(Index { name, index }))
                }
                _ => self.consume_identifier().map(Expr::Var),
            },
            _ => {
                let got = self.got();
                Err(self.error_at_current(ParseErrorType::UnexpectedExpression { got }))
            }
        }
    }

    fn call(&mut self) -> ParseResult<Call> {
        let name = self.consume_identifier()?;
        self.consume(TokenType::LParen, "(")?;

        let mut args = Vec::new();
        if *self.peek_token_type() != TokenType::RParen {
            loop {
                args.push(self.expression()?);
                if !self.match_(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen, ")")?;

        Ok(Call { name, args })
    }
}

fn type_name_to_type(name: TypeName) -> Type {
    match name {
        TypeName::Int => Type::Int,
        TypeName::Char => Type::Char,
        TypeName::CharPtr => Type::Str,
        TypeName::Void => Type::Void,
    }
}

fn binary_tt_to_op(tt: &TokenType) -> BinaryOp {
    match tt {
        TokenType::Minus => BinaryOp::Minus,
        TokenType::Plus => BinaryOp::Plus,
        TokenType::Star => BinaryOp::Mul,
        TokenType::Slash => BinaryOp::Div,
        TokenType::EqEqual => BinaryOp::Eq,
        TokenType::BangEq => BinaryOp::NotEq,
        TokenType::And => BinaryOp::And,
        TokenType::Or => BinaryOp::Or,
        TokenType::Greater => BinaryOp::Greater,
        TokenType::GreaterEq => BinaryOp::GreaterEq,
        TokenType::Lesser => BinaryOp::Lesser,
        TokenType::LesserEq => BinaryOp::LesserEq,
        _ => unreachable!(),
    }
}

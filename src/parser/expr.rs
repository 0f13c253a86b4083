use std::fmt::Display;

use crate::lexer::token::{Literal, Token};

use super::ast::WithToken;

#[derive(Debug, Clone)]
pub enum Expr {
    Binary(Binary),
    Call(Call),
    Index(Index),
    Literal(WithToken<Literal>),
    Negate(Negate),
    Var(WithToken<String>),
}

impl Expr {
    /// Token used to locate diagnostics about this expression.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Binary(binary) => &binary.op.1,
            Expr::Call(call) => &call.name.1,
            Expr::Index(index) => &index.name.1,
            Expr::Literal(literal) => &literal.1,
            Expr::Negate(negate) => &negate.op,
            Expr::Var(name) => &name.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binary {
    pub op: WithToken<BinaryOp>,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub name: WithToken<String>,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct Index {
    pub name: WithToken<String>,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct Negate {
    pub op: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mul,
    Div,

    Eq,
    NotEq,
    Greater,
    GreaterEq,
    Lesser,
    LesserEq,

    And,
    Or,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",

            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Lesser => "<",
            BinaryOp::LesserEq => "<=",

            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", op)
    }
}

pub trait ExprRefVisitor<R> {
    fn visit_binary(&mut self, expr: &Binary) -> R;
    fn visit_call(&mut self, call: &Call) -> R;
    fn visit_index(&mut self, index: &Index) -> R;
    fn visit_literal(&mut self, literal: &WithToken<Literal>) -> R;
    fn visit_negate(&mut self, negate: &Negate) -> R;
    fn visit_var(&mut self, name: &WithToken<String>) -> R;

    fn visit_expr(&mut self, expr: &Expr) -> R {
        match expr {
            Expr::Binary(binary) => self.visit_binary(binary),
            Expr::Call(call) => self.visit_call(call),
            Expr::Index(index) => self.visit_index(index),
            Expr::Literal(literal) => self.visit_literal(literal),
            Expr::Negate(negate) => self.visit_negate(negate),
            Expr::Var(name) => self.visit_var(name),
        }
    }
}

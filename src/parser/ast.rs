use std::ops::Deref;

use crate::lexer::token::Token;
use crate::translator::r#type::Type;

pub use super::expr::*;
pub use super::stmt::*;

#[derive(Debug, Clone)]
pub struct WithToken<T>(pub T, pub Token);

impl<T> Deref for WithToken<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub struct Program(pub Vec<Item>);

#[derive(Debug)]
pub enum Item {
    Comment(WithToken<String>),
    Function(FunctionDecl),
    Global(VarDecl),
}

#[derive(Debug)]
pub struct Param {
    pub name: WithToken<String>,
    pub ty: Type,
    /// Declared as `name[]`.
    pub array: bool,
}

/// A function definition, or a prototype when `body` is `None`.
#[derive(Debug)]
pub struct FunctionDecl {
    pub name: WithToken<String>,
    pub ret: Type,
    pub params: Vec<Param>,
    pub body: Option<Block>,
}

#[derive(Debug)]
pub struct VarDecl {
    pub name: WithToken<String>,
    pub kind: VarDeclKind,
}

#[derive(Debug)]
pub enum VarDeclKind {
    Init { ty: Option<Type>, value: Expr },
    Array { ty: Type, size: WithToken<i64> },
    Uninit(Type),
}

pub trait ASTRefVisitor: ExprRefVisitor<Self::ExprResult> + StmtRefVisitor<Self::StmtResult> {
    type ExprResult;
    type FuncDeclResult;
    type ItemResult;
    type ProgramResult;
    type StmtResult;

    fn visit_comment(&mut self, comment: &WithToken<String>) -> Self::ItemResult;
    fn visit_function_decl(&mut self, function_decl: &FunctionDecl) -> Self::FuncDeclResult;
    fn visit_global(&mut self, var_decl: &VarDecl) -> Self::ItemResult;
    fn visit_item(&mut self, item: &Item) -> Self::ItemResult;
    fn visit_program(&mut self, program: &Program) -> Self::ProgramResult;
}

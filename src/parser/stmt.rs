use super::ast::{VarDecl, WithToken};
use super::expr::{Call, Expr};

#[derive(Debug)]
pub struct Block(pub Vec<Stmt>);

#[derive(Debug)]
pub struct Assign {
    pub name: WithToken<String>,
    pub value: Expr,
}

#[derive(Debug)]
pub struct IndexAssign {
    pub name: WithToken<String>,
    pub index: Expr,
    pub value: Expr,
}

#[derive(Debug)]
pub struct IfStmt {
    pub cond: WithToken<Expr>,
    pub then: Block,
    /// Comments found between the closing brace and `else`.
    pub else_comments: Vec<WithToken<String>>,
    pub else_clause: Option<ElseClause>,
}

#[derive(Debug)]
pub enum ElseClause {
    If(Box<IfStmt>),
    Block(Block),
}

#[derive(Debug)]
pub struct WhileStmt {
    pub cond: WithToken<Expr>,
    pub body: Block,
}

#[derive(Debug)]
pub enum Stmt {
    Assign(Assign),
    Call(Call),
    Comment(WithToken<String>),
    If(IfStmt),
    IndexAssign(IndexAssign),
    Let(VarDecl),
    Print(WithToken<Expr>),
    Return(WithToken<Expr>),
    While(WhileStmt),
}

pub trait StmtRefVisitor<R> {
    fn visit_assign(&mut self, assign: &Assign) -> R;
    fn visit_call_stmt(&mut self, call: &Call) -> R;
    fn visit_comment_stmt(&mut self, comment: &WithToken<String>) -> R;
    fn visit_if(&mut self, if_stmt: &IfStmt) -> R;
    fn visit_index_assign(&mut self, assign: &IndexAssign) -> R;
    fn visit_let(&mut self, var_decl: &VarDecl) -> R;
    fn visit_print(&mut self, value: &WithToken<Expr>) -> R;
    fn visit_return(&mut self, ret_value: &WithToken<Expr>) -> R;
    fn visit_while(&mut self, while_stmt: &WhileStmt) -> R;

    fn visit_stmt(&mut self, stmt: &Stmt) -> R {
        match stmt {
            Stmt::Assign(assign) => self.visit_assign(assign),
            Stmt::Call(call) => self.visit_call_stmt(call),
            Stmt::Comment(comment) => self.visit_comment_stmt(comment),
            Stmt::If(if_stmt) => self.visit_if(if_stmt),
            Stmt::IndexAssign(assign) => self.visit_index_assign(assign),
            Stmt::Let(var_decl) => self.visit_let(var_decl),
            Stmt::Print(value) => self.visit_print(value),
            Stmt::Return(ret_value) => self.visit_return(ret_value),
            Stmt::While(while_stmt) => self.visit_while(while_stmt),
        }
    }
}

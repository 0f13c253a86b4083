use super::ast::*;
use crate::lexer::token::Literal;
use colored::Colorize;

pub struct PrettyPrint {
    indent: usize,
}

impl PrettyPrint {
    const INDENT: &'static str = "    ";
    pub fn new() -> Self {
        Self { indent: 0 }
    }

    fn pad(&self) -> String {
        Self::INDENT.repeat(self.indent)
    }

    fn block(&mut self, block: &Block) -> String {
        self.indent += 1;
        let body = block
            .0
            .iter()
            .map(|stmt| self.visit_stmt(stmt))
            .collect::<Vec<_>>()
            .join("\n");
        self.indent -= 1;
        body
    }

    fn nested_expr(&mut self, expr: &Expr) -> String {
        self.indent += 1;
        let expr_str = format!("{}{}", self.pad(), self.visit_expr(expr));
        self.indent -= 1;
        expr_str
    }

    fn var_decl(&mut self, var_decl: &VarDecl) -> String {
        match &var_decl.kind {
            VarDeclKind::Init { ty, value } => {
                let ty = ty.map(|ty| format!(" {}", ty.to_string().yellow()));
                format!(
                    "{}{}({}\n{})",
                    "LET".red(),
                    ty.unwrap_or_default(),
                    var_decl.name.blue(),
                    self.nested_expr(value)
                )
            }
            VarDeclKind::Array { ty, size } => format!(
                "{} {}({}[{}])",
                "LET".red(),
                ty.to_string().yellow(),
                var_decl.name.blue(),
                size.to_string().magenta()
            ),
            VarDeclKind::Uninit(ty) => format!(
                "{} {}({})",
                "LET".red(),
                ty.to_string().yellow(),
                var_decl.name.blue()
            ),
        }
    }
}

impl Default for PrettyPrint {
    fn default() -> Self {
        Self::new()
    }
}

impl ASTRefVisitor for PrettyPrint {
    type ExprResult = String;
    type FuncDeclResult = String;
    type ItemResult = String;
    type ProgramResult = String;
    type StmtResult = String;

    fn visit_program(&mut self, program: &Program) -> String {
        program
            .0
            .iter()
            .map(|item| self.visit_item(item))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn visit_item(&mut self, item: &Item) -> String {
        match item {
            Item::Comment(comment) => self.visit_comment(comment),
            Item::Function(function_decl) => self.visit_function_decl(function_decl),
            Item::Global(var_decl) => self.visit_global(var_decl),
        }
    }

    fn visit_comment(&mut self, comment: &WithToken<String>) -> String {
        comment.bright_black().to_string()
    }

    fn visit_function_decl(&mut self, function_decl: &FunctionDecl) -> String {
        let params = function_decl
            .params
            .iter()
            .map(|param| {
                let suffix = if param.array { "[]" } else { "" };
                format!("{} {}{}", param.ty.to_string().yellow(), *param.name, suffix)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let signature = format!(
            "{} {}({})",
            function_decl.ret.to_string().yellow(),
            function_decl.name.blue(),
            params
        );

        match &function_decl.body {
            Some(body) => format!("{}:\n{}", signature, self.block(body)),
            None => format!("{} {}", "PROTOTYPE".red(), signature),
        }
    }

    fn visit_global(&mut self, var_decl: &VarDecl) -> String {
        format!("{} {}", "GLOBAL".red(), self.var_decl(var_decl))
    }
}

impl StmtRefVisitor<String> for PrettyPrint {
    fn visit_assign(&mut self, assign: &Assign) -> String {
        format!(
            "{}{}({}\n{})",
            self.pad(),
            "ASSIGN".red(),
            assign.name.blue(),
            self.nested_expr(&assign.value)
        )
    }

    fn visit_call_stmt(&mut self, call: &Call) -> String {
        format!("{}{}", self.pad(), self.visit_call(call))
    }

    fn visit_comment_stmt(&mut self, comment: &WithToken<String>) -> String {
        format!("{}{}", self.pad(), self.visit_comment(comment))
    }

    fn visit_if(&mut self, if_stmt: &IfStmt) -> String {
        let mut if_str = format!(
            "{}{}\n{}\n{}{}\n{}",
            self.pad(),
            "IF".red(),
            self.nested_expr(&if_stmt.cond),
            self.pad(),
            "THEN".red(),
            self.block(&if_stmt.then)
        );
        for comment in &if_stmt.else_comments {
            if_str += &format!("\n{}", self.visit_comment_stmt(comment));
        }
        match &if_stmt.else_clause {
            Some(ElseClause::If(else_if)) => {
                self.indent += 1;
                let else_str = self.visit_if(else_if);
                self.indent -= 1;
                if_str += &format!("\n{}{}\n{}", self.pad(), "ELSE".red(), else_str);
            }
            Some(ElseClause::Block(block)) => {
                if_str += &format!("\n{}{}\n{}", self.pad(), "ELSE".red(), self.block(block));
            }
            None => {}
        }
        if_str
    }

    fn visit_index_assign(&mut self, assign: &IndexAssign) -> String {
        format!(
            "{}{}({}\n{}\n{})",
            self.pad(),
            "INDEX_ASSIGN".red(),
            assign.name.blue(),
            self.nested_expr(&assign.index),
            self.nested_expr(&assign.value)
        )
    }

    fn visit_let(&mut self, var_decl: &VarDecl) -> String {
        format!("{}{}", self.pad(), self.var_decl(var_decl))
    }

    fn visit_print(&mut self, value: &WithToken<Expr>) -> String {
        format!("{}{}\n{}", self.pad(), "PRINT".red(), self.nested_expr(value))
    }

    fn visit_return(&mut self, ret_value: &WithToken<Expr>) -> String {
        format!("{}{}\n{}", self.pad(), "RETURN".red(), self.nested_expr(ret_value))
    }

    fn visit_while(&mut self, while_stmt: &WhileStmt) -> String {
        format!(
            "{}{}\n{}\n{}{}\n{}",
            self.pad(),
            "WHILE".red(),
            self.nested_expr(&while_stmt.cond),
            self.pad(),
            "DO".red(),
            self.block(&while_stmt.body)
        )
    }
}

impl ExprRefVisitor<String> for PrettyPrint {
    fn visit_binary(&mut self, expr: &Binary) -> String {
        format!(
            "{}(\"{}\",\n{},\n{}\n{})",
            "BINARY".cyan().bold(),
            expr.op.to_string().yellow(),
            self.nested_expr(&expr.lhs),
            self.nested_expr(&expr.rhs),
            self.pad()
        )
    }

    fn visit_call(&mut self, call: &Call) -> String {
        let args = call
            .args
            .iter()
            .map(|arg| format!("{},\n", self.nested_expr(arg)))
            .collect::<String>();
        format!(
            "{}({}\n{}{})",
            "CALL".cyan().bold(),
            call.name.blue(),
            args,
            self.pad()
        )
    }

    fn visit_index(&mut self, index: &Index) -> String {
        format!(
            "{}({}\n{}\n{})",
            "INDEX".cyan().bold(),
            index.name.blue(),
            self.nested_expr(&index.index),
            self.pad()
        )
    }

    fn visit_literal(&mut self, literal: &WithToken<Literal>) -> String {
        match &literal.0 {
            Literal::Char(c) => format!("{}('{}')", "CHAR".green(), c.magenta()),
            Literal::Float(f) => format!("{}({})", "FLOAT".green(), f.to_string().magenta()),
            Literal::Integer(i) => format!("{}({})", "INT".green(), i.to_string().magenta()),
            Literal::String(s) => format!("{}(\"{}\")", "STRING".green(), s.magenta()),
        }
    }

    fn visit_negate(&mut self, negate: &Negate) -> String {
        format!(
            "{}(\"{}\",\n{}\n{})",
            "UNARY".cyan().bold(),
            "-".yellow(),
            self.nested_expr(&negate.expr),
            self.pad()
        )
    }

    fn visit_var(&mut self, name: &WithToken<String>) -> String {
        format!("{}({})", "VAR".green(), name.blue())
    }
}

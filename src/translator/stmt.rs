use crate::lexer::token::Token;
use crate::parser::ast::*;
use crate::runtime;

use super::r#type::Type;
use super::{reference_error, type_error, ReferenceErrorKind, TranslateResult, Translator, TypeErrorKind};

impl Translator {
    /// Emits `{`, the statements one level deeper, and the closing `}` at the current level.
    pub(super) fn braced(&mut self, block: &Block) -> TranslateResult<String> {
        self.depth += 1;
        let body = self.block_body(block);
        self.depth -= 1;

        let mut output = String::from("{\n");
        output += &body?;
        output += &self.indent();
        output.push('}');
        Ok(output)
    }

    fn block_body(&mut self, block: &Block) -> TranslateResult<String> {
        let mut body = String::new();
        for stmt in &block.0 {
            let code = self.visit_stmt(stmt)?;
            body += &self.indent();
            body += &code;
            body.push('\n');
        }
        Ok(body)
    }

    /// Type and C text of a declaration that introduces a new name.
    pub(super) fn declaration(&mut self, var_decl: &VarDecl) -> TranslateResult<(Type, String)> {
        let name = &var_decl.name;
        if runtime::is_builtin(name) {
            return type_error(&name.1, TypeErrorKind::ReservedName(name.0.clone()));
        }
        match &var_decl.kind {
            VarDeclKind::Init { ty, value } => {
                let value = self.value(value)?;
                let ty = match ty {
                    Some(Type::Void) => {
                        return type_error(&name.1, TypeErrorKind::VoidVariable(name.0.clone()))
                    }
                    Some(ty) if *ty != value.ty => {
                        return type_error(
                            value_token(var_decl),
                            TypeErrorKind::Incompatible {
                                expected: *ty,
                                got: value.ty,
                            },
                        )
                    }
                    Some(ty) => *ty,
                    None => value.ty,
                };
                Ok((ty, format!("{} {} = {};", ty.c_name(), **name, value.code)))
            }
            VarDeclKind::Array { ty, size } => {
                let Some(base) = ty.as_base() else {
                    return type_error(&name.1, TypeErrorKind::InvalidArrayBase(*ty));
                };
                Ok((Type::Pointer(base), format!("{} {}[{}];", base, **name, **size)))
            }
            VarDeclKind::Uninit(Type::Void) => {
                type_error(&name.1, TypeErrorKind::VoidVariable(name.0.clone()))
            }
            VarDeclKind::Uninit(ty) => Ok((*ty, format!("{} {};", ty.c_name(), **name))),
        }
    }

    /// A `let` of a name already declared in this function only assigns to it.
    fn redeclaration(&mut self, var_decl: &VarDecl, prev: Type) -> TranslateResult<String> {
        let name = &var_decl.name;
        let VarDeclKind::Init { ty, value } = &var_decl.kind else {
            return type_error(&name.1, TypeErrorKind::AlreadyDeclared(name.0.clone()));
        };

        let value = self.value(value)?;
        let new = match ty {
            Some(ty) if *ty != prev => *ty,
            _ => value.ty,
        };
        if new != prev {
            return type_error(
                &name.1,
                TypeErrorKind::RedeclaredWithDifferentType {
                    name: name.0.clone(),
                    prev,
                    new,
                },
            );
        }
        Ok(format!("{} = {};", **name, value.code))
    }
}

fn value_token(var_decl: &VarDecl) -> &Token {
    match &var_decl.kind {
        VarDeclKind::Init { value, .. } => value.token(),
        _ => &var_decl.name.1,
    }
}

impl StmtRefVisitor<TranslateResult<String>> for Translator {
    fn visit_assign(&mut self, assign: &Assign) -> TranslateResult<String> {
        let name = &assign.name;
        let Some(ty) = self.symbols.variable(name) else {
            return reference_error(
                &name.1,
                ReferenceErrorKind::UndeclaredVariable(name.0.clone()),
            );
        };

        let value = self.value(&assign.value)?;
        if value.ty != ty {
            return type_error(
                assign.value.token(),
                TypeErrorKind::Incompatible {
                    expected: ty,
                    got: value.ty,
                },
            );
        }
        Ok(format!("{} = {};", **name, value.code))
    }

    fn visit_call_stmt(&mut self, call: &Call) -> TranslateResult<String> {
        let call = self.visit_call(call)?;
        Ok(format!("{};", call.code))
    }

    fn visit_comment_stmt(&mut self, comment: &WithToken<String>) -> TranslateResult<String> {
        Ok(comment.0.clone())
    }

    fn visit_if(&mut self, if_stmt: &IfStmt) -> TranslateResult<String> {
        let cond = self.value(&if_stmt.cond)?;
        let mut output = format!("if ({}) {}", cond.code, self.braced(&if_stmt.then)?);

        let Some(else_clause) = &if_stmt.else_clause else {
            return Ok(output);
        };
        if if_stmt.else_comments.is_empty() {
            output += " else ";
        } else {
            for comment in &if_stmt.else_comments {
                output.push('\n');
                output += &self.indent();
                output += &comment.0;
            }
            output.push('\n');
            output += &self.indent();
            output += "else ";
        }

        match else_clause {
            ElseClause::If(else_if) => output += &self.visit_if(else_if)?,
            ElseClause::Block(block) => output += &self.braced(block)?,
        }
        Ok(output)
    }

    fn visit_index_assign(&mut self, assign: &IndexAssign) -> TranslateResult<String> {
        let element = self.element_type(&assign.name)?;
        let index = self.index_value(&assign.index)?;

        let value = self.value(&assign.value)?;
        if value.ty != element {
            return type_error(
                assign.value.token(),
                TypeErrorKind::ArrayElementMismatch {
                    element,
                    got: value.ty,
                },
            );
        }
        Ok(format!("{}[{}] = {};", *assign.name, index.code, value.code))
    }

    fn visit_let(&mut self, var_decl: &VarDecl) -> TranslateResult<String> {
        let name = &var_decl.name;
        if let Some(prev) = self.symbols.local(name) {
            return self.redeclaration(var_decl, prev);
        }

        let (ty, code) = self.declaration(var_decl)?;
        self.symbols.declare_local(name, ty);
        Ok(code)
    }

    fn visit_print(&mut self, value: &WithToken<Expr>) -> TranslateResult<String> {
        let typed = self.value(value)?;
        let format = match typed.ty {
            Type::Int => "%d",
            Type::Char => "%c",
            Type::Str => "%s",
            ty => return type_error(&value.1, TypeErrorKind::Unprintable(ty)),
        };
        Ok(format!("printf(\"{}\\n\", {});", format, typed.code))
    }

    fn visit_return(&mut self, ret_value: &WithToken<Expr>) -> TranslateResult<String> {
        let value = self.value(ret_value)?;
        if value.ty != self.current_return {
            return type_error(
                &ret_value.1,
                TypeErrorKind::ReturnMismatch {
                    expected: self.current_return,
                    got: value.ty,
                },
            );
        }
        Ok(format!("return {};", value.code))
    }

    fn visit_while(&mut self, while_stmt: &WhileStmt) -> TranslateResult<String> {
        let cond = self.value(&while_stmt.cond)?;
        Ok(format!("while ({}) {}", cond.code, self.braced(&while_stmt.body)?))
    }
}

use thiserror::Error;

use crate::{
    lexer::token::{Literal, Token},
    parser::ast::*,
    parser::ast::{ASTRefVisitor, ExprRefVisitor},
    runtime,
};

pub mod expr;
mod stmt;
pub mod symbol_table;
pub mod r#type;

#[cfg(test)]
mod test;

use expr::Typed;
use r#type::Type;
use symbol_table::{FunctionEntry, SymbolTable};

#[derive(Debug, Error)]
#[error("TypeError on line {}: {kind}", .token.line)]
pub struct TypeError {
    pub token: Token,
    #[source]
    pub kind: TypeErrorKind,
}

#[derive(Debug, Error)]
pub enum TypeErrorKind {
    #[error("cannot convert `{got}` to `{expected}`")]
    Incompatible { expected: Type, got: Type },

    #[error("`{name}` redeclared as `{new}`, previously declared as `{prev}`")]
    RedeclaredWithDifferentType { name: String, prev: Type, new: Type },

    #[error("`{0}` is already declared")]
    AlreadyDeclared(String),

    #[error("function `{name}` redeclared returning `{new}`, previously declared returning `{prev}`")]
    FunctionRedeclared { name: String, prev: Type, new: Type },

    #[error("duplicate definitions of function `{0}`")]
    DuplicateDefinition(String),

    #[error("invalid operands to `{op}`: `{lhs}` and `{rhs}`")]
    InvalidOperands { op: BinaryOp, lhs: Type, rhs: Type },

    #[error("cannot negate a value of type `{0}`")]
    InvalidNegation(Type),

    #[error("cannot print a value of type `{0}`")]
    Unprintable(Type),

    #[error("`{name}` has type `{ty}`, it is not an array and cannot be indexed")]
    NotAnArray { name: String, ty: Type },

    #[error("array index must be `int`, got `{0}`")]
    NonIntegerIndex(Type),

    #[error("cannot store `{got}` in an array of `{element}`")]
    ArrayElementMismatch { element: Type, got: Type },

    #[error("return type mismatch: function returns `{expected}`, got `{got}`")]
    ReturnMismatch { expected: Type, got: Type },

    #[error("arrays of `{0}` are not supported")]
    InvalidArrayBase(Type),

    #[error("value of type `void` cannot be used")]
    VoidValue,

    #[error("`{0}` cannot have type `void`")]
    VoidVariable(String),

    #[error("floating-point literal `{0}` is not supported")]
    FloatLiteral(f64),

    #[error("`{0}` names a runtime helper and cannot be used as a variable")]
    ReservedName(String),

    #[error("global `{0}` must be initialized with a constant")]
    NonConstantGlobal(String),
}

#[derive(Debug, Error)]
#[error("ReferenceError on line {}: {kind}", .token.line)]
pub struct ReferenceError {
    pub token: Token,
    #[source]
    pub kind: ReferenceErrorKind,
}

#[derive(Debug, Error)]
pub enum ReferenceErrorKind {
    #[error("variable `{0}` is not declared")]
    UndeclaredVariable(String),

    #[error("function `{0}` is not declared")]
    UndeclaredFunction(String),
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

impl TranslateError {
    pub fn token(&self) -> &Token {
        match self {
            TranslateError::Type(err) => &err.token,
            TranslateError::Reference(err) => &err.token,
        }
    }
}

pub type TranslateResult<T> = Result<T, TranslateError>;

fn type_error<T>(token: &Token, kind: TypeErrorKind) -> TranslateResult<T> {
    Err(TypeError {
        token: token.clone(),
        kind,
    }
    .into())
}

fn reference_error<T>(token: &Token, kind: ReferenceErrorKind) -> TranslateResult<T> {
    Err(ReferenceError {
        token: token.clone(),
        kind,
    }
    .into())
}

/// Type checks a program and lowers it to C, one item at a time.
pub struct Translator {
    symbols: SymbolTable,
    current_return: Type,
    depth: usize,
}

impl Translator {
    const INDENT: &'static str = "    ";

    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::with_runtime(),
            current_return: Type::Int,
            depth: 0,
        }
    }

    pub fn translate(&mut self, program: &Program) -> TranslateResult<String> {
        self.visit_program(program)
    }

    fn indent(&self) -> String {
        Self::INDENT.repeat(self.depth)
    }

    /// Translates an expression whose value is used.
    fn value(&mut self, expr: &Expr) -> TranslateResult<Typed> {
        let typed = self.visit_expr(expr)?;
        if typed.ty == Type::Void {
            return type_error(expr.token(), TypeErrorKind::VoidValue);
        }
        Ok(typed)
    }

    fn declare_function(&mut self, decl: &FunctionDecl) -> TranslateResult<()> {
        let name = &decl.name;
        let defining = decl.body.is_some();

        match self.symbols.function_mut(name) {
            Some(entry) => {
                if entry.ret != decl.ret {
                    return type_error(
                        &name.1,
                        TypeErrorKind::FunctionRedeclared {
                            name: name.0.clone(),
                            prev: entry.ret,
                            new: decl.ret,
                        },
                    );
                }
                if defining && entry.defined {
                    return type_error(&name.1, TypeErrorKind::DuplicateDefinition(name.0.clone()));
                }
                entry.defined |= defining;
            }
            None => self.symbols.declare_function(
                name,
                FunctionEntry {
                    ret: decl.ret,
                    defined: defining,
                },
            ),
        }
        Ok(())
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl ASTRefVisitor for Translator {
    type ExprResult = TranslateResult<Typed>;
    type FuncDeclResult = TranslateResult<String>;
    type ItemResult = TranslateResult<String>;
    type ProgramResult = TranslateResult<String>;
    type StmtResult = TranslateResult<String>;

    fn visit_program(&mut self, program: &Program) -> TranslateResult<String> {
        let mut output = String::new();
        for item in &program.0 {
            output += &self.visit_item(item)?;
            output.push('\n');
            if let Item::Function(FunctionDecl { body: Some(_), .. }) = item {
                output.push('\n');
            }
        }
        Ok(output)
    }

    fn visit_item(&mut self, item: &Item) -> TranslateResult<String> {
        match item {
            Item::Comment(comment) => self.visit_comment(comment),
            Item::Function(function_decl) => self.visit_function_decl(function_decl),
            Item::Global(var_decl) => self.visit_global(var_decl),
        }
    }

    fn visit_comment(&mut self, comment: &WithToken<String>) -> TranslateResult<String> {
        Ok(comment.0.clone())
    }

    fn visit_function_decl(&mut self, function_decl: &FunctionDecl) -> TranslateResult<String> {
        let mut params = Vec::new();
        let mut bindings: Vec<(String, Type)> = Vec::new();
        for param in &function_decl.params {
            let name = &param.name;
            if param.ty == Type::Void {
                return type_error(&name.1, TypeErrorKind::VoidVariable(name.0.clone()));
            }
            if runtime::is_builtin(name) {
                return type_error(&name.1, TypeErrorKind::ReservedName(name.0.clone()));
            }
            if bindings.iter().any(|(bound, _)| *bound == name.0) {
                return type_error(&name.1, TypeErrorKind::AlreadyDeclared(name.0.clone()));
            }
            if param.array {
                let Some(base) = param.ty.as_base() else {
                    return type_error(&name.1, TypeErrorKind::InvalidArrayBase(param.ty));
                };
                params.push(format!("{} {}[]", base, **name));
                bindings.push((name.0.clone(), Type::Pointer(base)));
            } else {
                params.push(format!("{} {}", param.ty.c_name(), **name));
                bindings.push((name.0.clone(), param.ty));
            }
        }

        // Registered before the body so that the function can call itself.
        self.declare_function(function_decl)?;

        let signature = format!(
            "{} {}({})",
            function_decl.ret.c_name(),
            *function_decl.name,
            params.join(", ")
        );
        let Some(body) = &function_decl.body else {
            return Ok(format!("{signature};"));
        };

        self.symbols.reset_locals(bindings);
        self.current_return = function_decl.ret;
        let body = self.braced(body)?;
        self.symbols.clear_locals();

        Ok(format!("{signature} {body}"))
    }

    fn visit_global(&mut self, var_decl: &VarDecl) -> TranslateResult<String> {
        let name = &var_decl.name;
        if self.symbols.global(name).is_some() {
            return type_error(&name.1, TypeErrorKind::AlreadyDeclared(name.0.clone()));
        }

        let (ty, code) = self.declaration(var_decl)?;
        if let VarDeclKind::Init { value, .. } = &var_decl.kind {
            if !is_constant_initializer(value) {
                return type_error(
                    value.token(),
                    TypeErrorKind::NonConstantGlobal(name.0.clone()),
                );
            }
        }
        self.symbols.declare_global(name, ty);
        Ok(code)
    }
}

/// Whether C accepts `value` as the initializer of a file-scope variable.
fn is_constant_initializer(value: &Expr) -> bool {
    matches!(value, Expr::Literal(WithToken(Literal::String(_), _)))
        || is_arithmetic_constant(value)
}

fn is_arithmetic_constant(mut expr: &Expr) -> bool {
    loop {
        match expr {
            Expr::Literal(literal) => {
                return matches!(literal.0, Literal::Integer(_) | Literal::Char(_))
            }
            Expr::Negate(negate) => expr = &*negate.expr,
            Expr::Binary(binary) => {
                if !is_arithmetic_constant(&binary.rhs) {
                    return false;
                }
                expr = &*binary.lhs;
            }
            _ => return false,
        }
    }
}

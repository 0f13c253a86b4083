use crate::lexer::token::Literal;
use crate::parser::ast::*;

use super::r#type::Type;
use super::{reference_error, type_error, ReferenceErrorKind, TranslateResult, Translator, TypeErrorKind};

/// Binding strength of the emitted C expression, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prec {
    Or,
    And,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Primary,
}

impl Prec {
    fn of(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Or => Prec::Or,
            BinaryOp::And => Prec::And,
            BinaryOp::Eq | BinaryOp::NotEq => Prec::Equality,
            BinaryOp::Greater | BinaryOp::GreaterEq | BinaryOp::Lesser | BinaryOp::LesserEq => {
                Prec::Relational
            }
            BinaryOp::Plus | BinaryOp::Minus => Prec::Additive,
            BinaryOp::Mul | BinaryOp::Div => Prec::Multiplicative,
        }
    }
}

/// A translated expression: its type and its C text.
#[derive(Debug, Clone)]
pub struct Typed {
    pub ty: Type,
    pub code: String,
    pub prec: Prec,
}

impl Typed {
    fn primary(ty: Type, code: String) -> Self {
        Self {
            ty,
            code,
            prec: Prec::Primary,
        }
    }

    /// Left operand of a left-associative operator of precedence `prec`.
    fn left_of(self, prec: Prec) -> String {
        if self.prec < prec {
            format!("({})", self.code)
        } else {
            self.code
        }
    }

    fn right_of(&self, prec: Prec) -> String {
        if self.prec <= prec {
            format!("({})", self.code)
        } else {
            self.code.clone()
        }
    }
}

fn binary_code(lhs: Typed, op: BinaryOp, rhs: &Typed, ty: Type) -> Typed {
    let prec = Prec::of(op);
    let rhs = rhs.right_of(prec);
    let mut code = lhs.left_of(prec);
    code.reserve(rhs.len() + 4);
    code.push(' ');
    code += &op.to_string();
    code.push(' ');
    code += &rhs;
    Typed { ty, code, prec }
}

impl Translator {
    /// C text of an operand of string concatenation.
    fn stringify(&self, operand: &Typed) -> Option<String> {
        match operand.ty {
            Type::Str => Some(operand.code.clone()),
            Type::Int => Some(format!("itos({})", operand.code)),
            Type::Char => Some(format!("ctos({})", operand.code)),
            _ => None,
        }
    }

    /// Applies the operator of `expr` to its already translated operands.
    fn apply_binary(&self, expr: &Binary, lhs: Typed, rhs: Typed) -> TranslateResult<Typed> {
        let op = *expr.op;
        let invalid = TypeErrorKind::InvalidOperands {
            op,
            lhs: lhs.ty,
            rhs: rhs.ty,
        };
        let numeric = lhs.ty.is_numeric() && rhs.ty.is_numeric();

        match op {
            BinaryOp::And | BinaryOp::Or => Ok(binary_code(lhs, op, &rhs, Type::Int)),

            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Greater
            | BinaryOp::GreaterEq
            | BinaryOp::Lesser
            | BinaryOp::LesserEq => match (lhs.ty, rhs.ty) {
                (Type::Str, Type::Str) if matches!(op, BinaryOp::Eq | BinaryOp::NotEq) => {
                    Ok(Typed {
                        ty: Type::Int,
                        code: format!("strcmp({}, {}) {} 0", lhs.code, rhs.code, op),
                        prec: Prec::Equality,
                    })
                }
                (Type::Pointer(l), Type::Pointer(r)) if l == r => {
                    Ok(binary_code(lhs, op, &rhs, Type::Int))
                }
                _ if numeric => Ok(binary_code(lhs, op, &rhs, Type::Int)),
                _ => type_error(&expr.op.1, invalid),
            },

            BinaryOp::Plus | BinaryOp::Minus => match (lhs.ty, rhs.ty) {
                (Type::Str, _) | (_, Type::Str) => {
                    let (Some(l), Some(r), BinaryOp::Plus) =
                        (self.stringify(&lhs), self.stringify(&rhs), op)
                    else {
                        return type_error(&expr.op.1, invalid);
                    };
                    Ok(Typed::primary(Type::Str, format!("concat({}, {})", l, r)))
                }
                (Type::Pointer(base), Type::Int) => {
                    Ok(binary_code(lhs, op, &rhs, Type::Pointer(base)))
                }
                (Type::Int, Type::Pointer(base)) if op == BinaryOp::Plus => {
                    Ok(binary_code(lhs, op, &rhs, Type::Pointer(base)))
                }
                _ if numeric => Ok(binary_code(lhs, op, &rhs, Type::Int)),
                _ => type_error(&expr.op.1, invalid),
            },

            BinaryOp::Mul | BinaryOp::Div if numeric => {
                Ok(binary_code(lhs, op, &rhs, Type::Int))
            }
            BinaryOp::Mul | BinaryOp::Div => type_error(&expr.op.1, invalid),
        }
    }
}

impl ExprRefVisitor<TranslateResult<Typed>> for Translator {
    /// The parser builds operator chains left-deep, so the left spine is
    /// walked with a loop instead of recursion.
    fn visit_binary(&mut self, expr: &Binary) -> TranslateResult<Typed> {
        let mut chain = vec![expr];
        let mut leftmost = &*expr.lhs;
        while let Expr::Binary(inner) = leftmost {
            chain.push(inner);
            leftmost = &*inner.lhs;
        }

        let mut lhs = self.value(leftmost)?;
        for binary in chain.into_iter().rev() {
            let rhs = self.value(&binary.rhs)?;
            lhs = self.apply_binary(binary, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn visit_call(&mut self, call: &Call) -> TranslateResult<Typed> {
        let Some(entry) = self.symbols.function(&call.name) else {
            return reference_error(
                &call.name.1,
                ReferenceErrorKind::UndeclaredFunction(call.name.0.clone()),
            );
        };
        let ret = entry.ret;

        let args = call
            .args
            .iter()
            .map(|arg| self.value(arg).map(|typed| typed.code))
            .collect::<TranslateResult<Vec<_>>>()?;

        Ok(Typed::primary(
            ret,
            format!("{}({})", *call.name, args.join(", ")),
        ))
    }

    fn visit_index(&mut self, index: &Index) -> TranslateResult<Typed> {
        let element = self.element_type(&index.name)?;
        let position = self.index_value(&index.index)?;
        Ok(Typed::primary(
            element,
            format!("{}[{}]", *index.name, position.code),
        ))
    }

    fn visit_literal(&mut self, literal: &WithToken<Literal>) -> TranslateResult<Typed> {
        match &literal.0 {
            Literal::Integer(i) => Ok(Typed::primary(Type::Int, i.to_string())),
            Literal::Float(f) => type_error(&literal.1, TypeErrorKind::FloatLiteral(*f)),
            Literal::Char(c) => Ok(Typed::primary(Type::Char, format!("'{c}'"))),
            Literal::String(s) => Ok(Typed::primary(Type::Str, format!("\"{s}\""))),
        }
    }

    fn visit_negate(&mut self, negate: &Negate) -> TranslateResult<Typed> {
        let operand = self.value(&negate.expr)?;
        if operand.ty != Type::Int {
            return type_error(&negate.op, TypeErrorKind::InvalidNegation(operand.ty));
        }

        let code = if operand.prec < Prec::Unary || operand.code.starts_with('-') {
            format!("-({})", operand.code)
        } else {
            format!("-{}", operand.code)
        };
        Ok(Typed {
            ty: Type::Int,
            code,
            prec: Prec::Unary,
        })
    }

    fn visit_var(&mut self, name: &WithToken<String>) -> TranslateResult<Typed> {
        match self.symbols.variable(name) {
            Some(ty) => Ok(Typed::primary(ty, name.0.clone())),
            None => reference_error(
                &name.1,
                ReferenceErrorKind::UndeclaredVariable(name.0.clone()),
            ),
        }
    }
}

impl Translator {
    /// Element type of the array variable `name`.
    pub(super) fn element_type(&self, name: &WithToken<String>) -> TranslateResult<Type> {
        let Some(ty) = self.symbols.variable(name) else {
            return reference_error(
                &name.1,
                ReferenceErrorKind::UndeclaredVariable(name.0.clone()),
            );
        };
        match ty.element() {
            Some(element) => Ok(element),
            None => type_error(
                &name.1,
                TypeErrorKind::NotAnArray {
                    name: name.0.clone(),
                    ty,
                },
            ),
        }
    }

    pub(super) fn index_value(&mut self, index: &Expr) -> TranslateResult<Typed> {
        let position = self.value(index)?;
        if position.ty != Type::Int {
            return type_error(index.token(), TypeErrorKind::NonIntegerIndex(position.ty));
        }
        Ok(position)
    }
}

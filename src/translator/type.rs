use std::fmt::Display;

/// Element type of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    Int,
    Char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Char,
    /// The string type, `char*` in C.
    Str,
    /// One-dimensional array or the result of pointer arithmetic on one.
    Pointer(Base),
    /// Only valid as a function return type.
    Void,
}

impl Type {
    pub fn c_name(&self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Char => "char",
            Type::Str => "char*",
            Type::Pointer(Base::Int) => "int*",
            Type::Pointer(Base::Char) => "char*",
            Type::Void => "void",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Char)
    }

    pub fn as_base(&self) -> Option<Base> {
        match self {
            Type::Int => Some(Base::Int),
            Type::Char => Some(Base::Char),
            _ => None,
        }
    }

    /// Type produced by indexing a value of this type.
    pub fn element(&self) -> Option<Type> {
        match self {
            Type::Pointer(base) => Some(Type::from(*base)),
            Type::Str => Some(Type::Char),
            _ => None,
        }
    }
}

impl From<Base> for Type {
    fn from(base: Base) -> Self {
        match base {
            Base::Int => Type::Int,
            Base::Char => Type::Char,
        }
    }
}

impl Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Type::from(*self))
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Pointer(base) => write!(f, "{}[]", base),
            ty => write!(f, "{}", ty.c_name()),
        }
    }
}

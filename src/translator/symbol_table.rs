use ordermap::OrderMap;

use crate::runtime::BUILTINS;

use super::r#type::Type;

#[derive(Debug)]
pub struct FunctionEntry {
    pub ret: Type,
    /// Set once a body has been translated; runtime helpers start out defined.
    pub defined: bool,
}

/// Flat per-function locals, plus the program-wide globals and functions.
#[derive(Debug, Default)]
pub struct SymbolTable {
    locals: OrderMap<String, Type>,
    globals: OrderMap<String, Type>,
    functions: OrderMap<String, FunctionEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runtime() -> Self {
        let mut table = Self::new();
        for (name, ret) in BUILTINS {
            table.functions.insert(
                name.to_string(),
                FunctionEntry {
                    ret: *ret,
                    defined: true,
                },
            );
        }
        table
    }

    pub fn reset_locals(&mut self, params: impl IntoIterator<Item = (String, Type)>) {
        self.locals = params.into_iter().collect();
    }

    pub fn clear_locals(&mut self) {
        self.locals.clear();
    }

    pub fn local(&self, name: &str) -> Option<Type> {
        self.locals.get(name).copied()
    }

    /// Locals shadow globals.
    pub fn variable(&self, name: &str) -> Option<Type> {
        self.local(name).or_else(|| self.global(name))
    }

    pub fn declare_local(&mut self, name: &str, ty: Type) {
        self.locals.insert(name.to_string(), ty);
    }

    pub fn global(&self, name: &str) -> Option<Type> {
        self.globals.get(name).copied()
    }

    pub fn declare_global(&mut self, name: &str, ty: Type) {
        self.globals.insert(name.to_string(), ty);
    }

    pub fn function(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    pub fn function_mut(&mut self, name: &str) -> Option<&mut FunctionEntry> {
        self.functions.get_mut(name)
    }

    pub fn declare_function(&mut self, name: &str, entry: FunctionEntry) {
        self.functions.insert(name.to_string(), entry);
    }
}

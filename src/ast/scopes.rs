//! Function scopes and the arena that owns them.
//!
//! Every function literal gets a scope with its own symbol table. Scopes
//! point at their parent by `FnId`, and variable references point at a
//! symbol by `SymbolId`, so neither link owns what it refers to.

use std::ops::{Index, IndexMut};

use crate::{
    symbol_table::symbol_table::{Symbol, SymbolTable},
    DEFAULT_SYMBOL_TABLE_SIZE,
};

use super::types::{FnId, VarType};

/// Handle to a symbol inside a scope's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId {
    pub scope: FnId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnSignature {
    pub args: Vec<SymbolId>,
    pub return_type: VarType,
}

impl Default for FnSignature {
    fn default() -> Self {
        FnSignature {
            args: vec![],
            return_type: VarType::Void,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FnScope {
    pub id: FnId,
    pub parent: Option<FnId>,
    pub symbols: SymbolTable,
    pub signature: FnSignature,
}

#[derive(Debug, Clone)]
pub struct Scopes {
    scopes: Vec<FnScope>,
}

impl Default for Scopes {
    fn default() -> Self {
        Scopes::new()
    }
}

impl Scopes {
    /// Creates the arena with the module scope already allocated.
    pub fn new() -> Self {
        Scopes {
            scopes: vec![FnScope {
                id: FnId::MODULE,
                parent: None,
                symbols: SymbolTable::new(DEFAULT_SYMBOL_TABLE_SIZE),
                signature: FnSignature::default(),
            }],
        }
    }

    pub fn alloc(&mut self, parent: FnId) -> FnId {
        let id = FnId(self.scopes.len());

        self.scopes.push(FnScope {
            id,
            parent: Some(parent),
            symbols: SymbolTable::new(DEFAULT_SYMBOL_TABLE_SIZE),
            signature: FnSignature::default(),
        });

        id
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get(&self, id: FnId) -> Option<&FnScope> {
        self.scopes.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FnScope> {
        self.scopes.iter()
    }

    pub fn parent(&self, id: FnId) -> Option<FnId> {
        self.get(id).and_then(|scope| scope.parent)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.get(id.scope).and_then(|scope| scope.symbols.get(id.index))
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.scopes
            .get_mut(id.scope.0)
            .and_then(|scope| scope.symbols.get_mut(id.index))
    }

    /// Looks a name up in one scope only.
    pub fn find(&self, scope: FnId, name: &[u8]) -> Option<SymbolId> {
        self.get(scope)?
            .symbols
            .find(name)
            .map(|index| SymbolId { scope, index })
    }

    /// Looks a name up starting at `from` and walking out through the parents.
    pub fn resolve(&self, from: FnId, name: &[u8]) -> Option<SymbolId> {
        let mut cursor = Some(from);

        while let Some(scope) = cursor {
            if let Some(found) = self.find(scope, name) {
                return Some(found);
            }

            cursor = self.parent(scope);
        }

        None
    }

    /// Declared parameter types in order. Parameters always carry a type.
    pub fn arg_types(&self, id: FnId) -> Vec<Option<VarType>> {
        match self.get(id) {
            Some(scope) => scope
                .signature
                .args
                .iter()
                .map(|arg| self.symbol(*arg).and_then(|symbol| symbol.var_type.clone()))
                .collect(),
            None => vec![],
        }
    }
}

impl Index<FnId> for Scopes {
    type Output = FnScope;

    fn index(&self, index: FnId) -> &Self::Output {
        &self.scopes[index.0]
    }
}

impl IndexMut<FnId> for Scopes {
    fn index_mut(&mut self, index: FnId) -> &mut Self::Output {
        &mut self.scopes[index.0]
    }
}

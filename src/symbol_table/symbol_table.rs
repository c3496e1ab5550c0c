use std::{fmt::Display, ops::Index};

use crate::{ast::types::VarType, DEFAULT_SYMBOL_TABLE_SIZE};

/// How a name entered its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRole {
    Local,
    Argument,
    /// Reserved for hash keys. The parser never creates one.
    Key,
}

impl Display for SymbolRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: Vec<u8>,
    pub role: SymbolRole,
    /// Insertion order within the owning table.
    pub index: usize,
    pub var_type: Option<VarType>,
    next: Option<usize>,
}

impl Symbol {
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    /// Sets the type slot if it is still empty. Returns `false` when a type
    /// was already recorded.
    pub fn fill_type(&mut self, var_type: VarType) -> bool {
        if self.var_type.is_some() {
            return false;
        }

        self.var_type = Some(var_type);
        true
    }
}

/// djb2 string hash.
pub fn hash(name: &[u8]) -> u64 {
    name.iter()
        .fold(5381u64, |h, byte| h.wrapping_mul(33).wrapping_add(*byte as u64))
}

/// Hash table with a fixed bucket count.
///
/// The table never grows or rehashes, so long chains degrade lookups to a
/// linear scan once a scope holds many more names than buckets.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    heads: Vec<Option<usize>>,
    symbols: Vec<Symbol>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new(DEFAULT_SYMBOL_TABLE_SIZE)
    }
}

impl SymbolTable {
    pub fn new(capacity: usize) -> Self {
        SymbolTable {
            heads: vec![None; capacity.max(1)],
            symbols: vec![],
        }
    }

    fn bucket(&self, name: &[u8]) -> usize {
        (hash(name) % self.heads.len() as u64) as usize
    }

    /// Looks a name up, comparing lengths before bytes.
    pub fn find(&self, name: &[u8]) -> Option<usize> {
        let mut cursor = self.heads[self.bucket(name)];

        while let Some(index) = cursor {
            let symbol = &self.symbols[index];

            if symbol.name.len() == name.len() && symbol.name == name {
                return Some(index);
            }

            cursor = symbol.next;
        }

        None
    }

    /// Adds a new entry at the head of its chain. Returns `None` if the name
    /// is already present.
    pub fn insert(&mut self, name: &[u8], role: SymbolRole) -> Option<usize> {
        if self.find(name).is_some() {
            return None;
        }

        Some(self.push(name, role))
    }

    pub fn find_or_insert(&mut self, name: &[u8], role: SymbolRole) -> usize {
        match self.find(name) {
            Some(index) => index,
            None => self.push(name, role),
        }
    }

    fn push(&mut self, name: &[u8], role: SymbolRole) -> usize {
        let bucket = self.bucket(name);
        let index = self.symbols.len();

        self.symbols.push(Symbol {
            name: name.to_vec(),
            role,
            index,
            var_type: None,
            next: self.heads[bucket],
        });
        self.heads[bucket] = Some(index);

        index
    }

    pub fn get(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Symbol> {
        self.symbols.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.heads.len()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Length of the chain `name` hashes into.
    pub fn chain_len(&self, name: &[u8]) -> usize {
        let mut cursor = self.heads[self.bucket(name)];
        let mut len = 0;

        while let Some(index) = cursor {
            len += 1;
            cursor = self.symbols[index].next;
        }

        len
    }
}

impl Index<usize> for SymbolTable {
    type Output = Symbol;

    fn index(&self, index: usize) -> &Self::Output {
        &self.symbols[index]
    }
}

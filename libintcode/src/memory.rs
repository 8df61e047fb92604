use std::collections::BTreeMap;

use crate::Value;

/// Sparse program memory.
///
/// The loaded program lives in a dense image; any cell past its end is kept
/// in a map and only exists once it has been read or written. Cells that
/// were never written read as zero, so a program may address any
/// non-negative index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    image: Vec<Value>,
    extra: BTreeMap<usize, Value>,
}

impl Memory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_program(program: &[Value]) -> Self {
        Self {
            image: program.to_vec(),
            extra: BTreeMap::new(),
        }
    }

    /// Read a cell, materializing it as zero if it was never touched.
    pub fn read(&mut self, address: usize) -> Value {
        match self.image.get(address) {
            Some(value) => *value,
            None => *self.extra.entry(address).or_insert(0),
        }
    }

    /// Read a cell without materializing it.
    pub fn peek(&self, address: usize) -> Value {
        match self.image.get(address) {
            Some(value) => *value,
            None => self.extra.get(&address).copied().unwrap_or(0),
        }
    }

    pub fn write(&mut self, address: usize, value: Value) {
        match self.image.get_mut(address) {
            Some(cell) => *cell = value,
            None => {
                self.extra.insert(address, value);
            }
        }
    }

    /// Whether the cell is part of the program image or has been touched.
    pub fn contains(&self, address: usize) -> bool {
        address < self.image.len() || self.extra.contains_key(&address)
    }

    /// Number of materialized cells.
    pub fn len(&self) -> usize {
        self.image.len() + self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The loaded program image, including writes into it.
    pub fn as_slice(&self) -> &[Value] {
        &self.image
    }
}

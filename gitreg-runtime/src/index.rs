//! Ordered lists whose elements remember their own position.
//!
//! The factory keeps several lists (an owner's names, a name's owners, all
//! names) where every element's position is also stored somewhere else. The
//! only way to shrink such a list is [`PositionedList::swap_remove`], which
//! reports the element it moved so the caller can repair that stored
//! position in the same step.

use serde::{Deserialize, Serialize};

use gitreg_core::HostError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionedList<T> {
    items: Vec<T>,
}

impl<T> Default for PositionedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> PositionedList<T> {
    /// Append `item`, returning its position.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Remove the element at `index` by moving the tail element into its
    /// slot. When an element moves, `repair` is called with it and its new
    /// position before this returns.
    pub fn swap_remove(
        &mut self,
        index: usize,
        mut repair: impl FnMut(&T, usize),
    ) -> Result<T, HostError> {
        if index >= self.items.len() {
            return Err(HostError::IndexOutOfBounds);
        }
        let removed = self.items.swap_remove(index);
        if let Some(moved) = self.items.get(index) {
            repair(moved, index);
        }
        Ok(removed)
    }
}

impl<T: Clone> PositionedList<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

//! Slot storage for tree nodes.
//!
//! Every slot carries a generation that is bumped when its value is released. A [`NodeId`]
//! remembers the generation it was handed out with, so an id that outlived its node can be told
//! apart from the node that later reuses the slot.

use std::ops::{Index, IndexMut};

/// A stable, non-owning handle to a node in an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Indices of empty slots, reused before the `Vec` grows.
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Stores `value` and returns the id that owns it.
    pub(crate) fn alloc(&mut self, value: T) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                debug_assert!(slot.value.is_none(), "free list pointed at a live slot");
                slot.value = Some(value);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len()).expect("arena exceeded u32::MAX slots");
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Removes the value behind `id` and returns it. Any copy of `id` is stale afterwards.
    ///
    /// ## Panics
    ///
    /// When `id` is already stale. Releasing twice means two owners believed they held the node.
    pub(crate) fn release(&mut self, id: NodeId) -> T {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .expect("released a node through a stale id");
        let value = slot.value.take().expect("released a node twice");
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        value
    }

    /// Whether `id` still refers to the value it was handed out for.
    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        self.get(id).expect("dereferenced a stale node id")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        self.get_mut(id).expect("dereferenced a stale node id")
    }
}

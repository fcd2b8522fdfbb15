use crate::error::Error;
use std::any::{type_name, Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

// A type-erased handler together with the name of its concrete type.
// The routers know the concrete boxed type for each key, so every
// `downcast_ref` below is keyed by the same `TypeId` it was stored under.
pub(crate) struct Slot {
    handler: Box<dyn Any + Send + Sync>,
    handler_name: &'static str,
}

impl Slot {
    pub fn new<T>(handler: T, handler_name: &'static str) -> Self
    where
        T: Any + Send + Sync,
    {
        Slot {
            handler: Box::new(handler),
            handler_name,
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.handler.downcast_ref::<T>()
    }

    pub fn handler_name(&self) -> &'static str {
        self.handler_name
    }
}

/// Maps a type to exactly one handler.
#[derive(Default)]
pub(crate) struct UniqueRegistry {
    slots: HashMap<TypeId, Slot>,
}

impl UniqueRegistry {
    /// Inserts the handler for `K`, rejecting it if `K` is already served.
    pub fn insert<K: 'static>(&mut self, slot: Slot) -> crate::Result<()> {
        match self.slots.entry(TypeId::of::<K>()) {
            Entry::Occupied(entry) => Err(Error::DuplicateHandler {
                type_name: type_name::<K>(),
                existing: entry.get().handler_name,
                rejected: slot.handler_name,
            }),
            Entry::Vacant(entry) => {
                entry.insert(slot);
                Ok(())
            }
        }
    }

    pub fn get<K: 'static>(&self) -> Option<&Slot> {
        self.slots.get(&TypeId::of::<K>())
    }

    pub fn contains<K: 'static>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<K>())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Maps a type to an ordered list of handlers.
#[derive(Default)]
pub(crate) struct MultiRegistry {
    slots: HashMap<TypeId, Vec<Slot>>,
}

impl MultiRegistry {
    /// Appends a handler for `K`, keeping insertion order.
    pub fn push<K: 'static>(&mut self, slot: Slot) {
        self.slots.entry(TypeId::of::<K>()).or_default().push(slot);
    }

    pub fn get<K: 'static>(&self) -> &[Slot] {
        self.slots
            .get(&TypeId::of::<K>())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct types with at least one handler.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

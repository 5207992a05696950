//! Manual value store.
//!
//! Holds values that are not read back from a widget: accumulated lists and
//! chosen file paths. Entries are created lazily when an auxiliary window is
//! first used and overwritten every time that window completes.
//!
//! Each entry is a [`ManualSlot`], a shared handle that an auxiliary window
//! handler keeps for the one field it owns. Everything runs on the event
//! loop thread, so `Rc<RefCell<_>>` is enough.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::form::FieldKey;
use crate::value::Value;

/// Shared handle to one store entry.
#[derive(Debug, Clone, Default)]
pub struct ManualSlot(Rc<RefCell<Option<Value>>>);

impl ManualSlot {
    pub fn get(&self) -> Option<Value> {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = Some(value);
    }

    pub fn is_set(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Items of a list entry, empty when unset or not a list.
    pub fn items(&self) -> Vec<Value> {
        match &*self.0.borrow() {
            Some(Value::List(items)) => items.clone(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ManualValueStore {
    slots: HashMap<FieldKey, ManualSlot>,
}

impl ManualValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `key`, initialising the entry with `init` if it is unset.
    pub fn ensure(&mut self, key: &FieldKey, init: impl FnOnce() -> Value) -> ManualSlot {
        let slot = self.slots.entry(key.clone()).or_default();
        if !slot.is_set() {
            slot.set(init());
        }
        slot.clone()
    }

    pub fn set(&mut self, key: &FieldKey, value: Value) {
        self.slots.entry(key.clone()).or_default().set(value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.slots.get(key).and_then(ManualSlot::get)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.get(key).is_some_and(ManualSlot::is_set)
    }

    pub fn len(&self) -> usize {
        self.slots.values().filter(|s| s.is_set()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

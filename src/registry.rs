use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use crate::widget::{StatusWidget, WidgetState};

/// Application-owned lookup table mapping registry keys to live widgets.
///
/// At most one widget claims a key at a time; a key is present iff some
/// live widget currently holds it. Handles are cheap clones sharing one
/// map. Create the registry at application start, pass it to widgets at
/// construction, and `clear` it at shutdown or test teardown.
#[derive(Debug, Clone, Default)]
pub struct StatusRegistry {
    slots: Rc<RefCell<HashMap<String, Rc<RefCell<WidgetState>>>>>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget registered under `key`, if any.
    pub fn find(&self, key: &str) -> Option<StatusWidget> {
        let state = self.slots.borrow().get(key).cloned()?;
        Some(StatusWidget::from_state(self, state))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.slots.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Registered widgets in key order; rendering and input routing iterate
    /// this.
    pub fn widgets(&self) -> Vec<StatusWidget> {
        let slots = self.slots.borrow();
        let mut entries: Vec<_> = slots.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
            .into_iter()
            .map(|(_, state)| StatusWidget::from_state(self, Rc::clone(state)))
            .collect()
    }

    /// Destroy every registered widget and empty the map. Teardown hook for
    /// application shutdown and test cleanup.
    pub fn clear(&self) {
        let drained: Vec<_> = self.slots.borrow_mut().drain().collect();
        for (key, state) in drained {
            state.borrow_mut().clear_presence();
            debug!(%key, "registry teardown destroyed widget");
        }
    }

    pub(crate) fn state_of(&self, key: &str) -> Option<Rc<RefCell<WidgetState>>> {
        self.slots.borrow().get(key).cloned()
    }

    pub(crate) fn claim(&self, key: String, state: Rc<RefCell<WidgetState>>) {
        self.slots.borrow_mut().insert(key, state);
    }

    /// Remove `key` only while it still points at `state`. Repeated destroys
    /// and superseded owners must never evict a successor.
    pub(crate) fn release_if(&self, key: &str, state: &Rc<RefCell<WidgetState>>) {
        let mut slots = self.slots.borrow_mut();
        if slots.get(key).is_some_and(|s| Rc::ptr_eq(s, state)) {
            slots.remove(key);
        }
    }
}

//! Synchronous change listeners.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Listeners::add`], used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// Callbacks invoked in registration order with the full current state.
pub struct Listeners<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Callback<T>)>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` and immediately call it once with `current`.
    pub fn add<F>(&mut self, current: &T, callback: F) -> ListenerId
    where
        F: FnMut(&T) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        let callback: Callback<T> = Rc::new(RefCell::new(callback));
        self.entries.push((id, Rc::clone(&callback)));
        (*callback.borrow_mut())(current);
        id
    }

    /// Returns whether `id` was registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call every listener registered at the time of the call.
    ///
    /// A listener that is already running further up the stack is skipped.
    pub fn notify(&self, state: &T) {
        let snapshot: Vec<(ListenerId, Callback<T>)> = self.entries.clone();
        for (id, callback) in snapshot {
            match callback.try_borrow_mut() {
                Ok(mut callback) => (*callback)(state),
                Err(_) => log::warn!("Skipping re-entrant notification of listener {:?}", id),
            };
        }
    }
}

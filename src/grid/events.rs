//! Change notifications and subscription handles
//!
//! Listeners live in a shared table; a `Subscription` holds a weak reference
//! back to it and removes its listener when unsubscribed or dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::types::{CellId, CellValue};

/// Boxed listener callback
pub type Listener<E> = Box<dyn Fn(&E)>;

/// Selection after a change, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub selected_row_ids: Vec<String>,
}

/// A single cell value that changed
#[derive(Debug, Clone, PartialEq)]
pub struct CellValueChange {
    pub cell_id: CellId,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

struct ListenerTable<E> {
    next_id: u64,
    entries: Vec<(u64, Rc<dyn Fn(&E)>)>,
}

/// Fan-out list of listeners for one event type
pub struct Listeners<E> {
    table: Rc<RefCell<ListenerTable<E>>>,
}

impl<E: 'static> Listeners<E> {
    pub fn new() -> Self {
        Self {
            table: Rc::new(RefCell::new(ListenerTable {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a listener; it stays registered while the handle lives
    pub fn subscribe(&self, listener: Listener<E>) -> Subscription {
        let id = {
            let mut table = self.table.borrow_mut();
            let id = table.next_id;
            table.next_id += 1;
            table.entries.push((id, Rc::from(listener)));
            id
        };

        let weak: Weak<RefCell<ListenerTable<E>>> = Rc::downgrade(&self.table);
        Subscription::new(move || {
            if let Some(table) = weak.upgrade() {
                table.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Notify every listener once
    ///
    /// The table is snapshotted first, so listeners may subscribe or
    /// unsubscribe while being notified.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Rc<dyn Fn(&E)>> = self
            .table
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listeners({})", self.table.borrow().entries.len())
    }
}

/// Handle returned by every `on_*` subscription
///
/// Dropping the handle unsubscribes, so keep it alive for as long as the
/// listener should fire.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_all_subscribers_notified() {
        let listeners: Listeners<u32> = Listeners::new();
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));

        let a2 = Rc::clone(&a);
        let _sa = listeners.subscribe(Box::new(move |n| a2.set(a2.get() + n)));
        let b2 = Rc::clone(&b);
        let _sb = listeners.subscribe(Box::new(move |n| b2.set(b2.get() + n)));

        listeners.emit(&3);
        assert_eq!(a.get(), 3);
        assert_eq!(b.get(), 3);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_listener() {
        let listeners: Listeners<u32> = Listeners::new();
        let hits = Rc::new(Cell::new(0));

        let h1 = Rc::clone(&hits);
        let first = listeners.subscribe(Box::new(move |_| h1.set(h1.get() + 1)));
        let h2 = Rc::clone(&hits);
        let _second = listeners.subscribe(Box::new(move |_| h2.set(h2.get() + 10)));

        first.unsubscribe();
        assert_eq!(listeners.len(), 1);

        listeners.emit(&0);
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let listeners: Listeners<u32> = Listeners::new();
        {
            let _sub = listeners.subscribe(Box::new(|_| {}));
            assert_eq!(listeners.len(), 1);
        }
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_subscription_outliving_table() {
        let sub = {
            let listeners: Listeners<u32> = Listeners::new();
            listeners.subscribe(Box::new(|_| {}))
        };
        sub.unsubscribe();
    }
}

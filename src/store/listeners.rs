use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

pub(crate) type Listener = Rc<dyn Fn()>;

#[derive(Clone)]
pub(crate) struct Entry {
    id: u64,
    listener: Listener,
}

impl Entry {
    pub(crate) fn notify(&self) {
        (self.listener)();
    }
}

/// Registered listeners, kept as two lists.
///
/// `active` is the list the current dispatch iterates over and `pending` is the
/// list the next dispatch will use. Both start out as the same list. Mutations
/// only touch `pending`, copying it first while it is still shared with
/// `active`, so a dispatch in progress never sees listeners come or go.
pub(crate) struct ListenerRegistry {
    active: Rc<Vec<Entry>>,
    pending: Rc<Vec<Entry>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        let listeners = Rc::new(Vec::new());
        Self {
            active: Rc::clone(&listeners),
            pending: listeners,
            next_id: 0,
        }
    }

    fn ensure_can_mutate_pending(&mut self) {
        if Rc::ptr_eq(&self.pending, &self.active) {
            self.pending = Rc::new(self.active.as_ref().clone());
        }
    }

    pub(crate) fn add(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.ensure_can_mutate_pending();
        Rc::make_mut(&mut self.pending).push(Entry { id, listener });
        id
    }

    pub(crate) fn remove(&mut self, id: u64) {
        self.ensure_can_mutate_pending();
        Rc::make_mut(&mut self.pending).retain(|entry| entry.id != id);
    }

    /// Promote `pending` to `active` and return the list to notify.
    pub(crate) fn snapshot(&mut self) -> Rc<Vec<Entry>> {
        self.active = Rc::clone(&self.pending);
        Rc::clone(&self.active)
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes the listener starting with
/// the next dispatch. Only the first call has an effect. Dropping the handle
/// does not unsubscribe.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    subscribed: Rc<Cell<bool>>,
    registry: Weak<RefCell<ListenerRegistry>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: &Rc<RefCell<ListenerRegistry>>) -> Self {
        Self {
            id,
            subscribed: Rc::new(Cell::new(true)),
            registry: Rc::downgrade(registry),
        }
    }

    /// Remove the listener, effective from the next dispatch.
    pub fn unsubscribe(&self) {
        if !self.subscribed.replace(false) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
        }
    }

    /// Whether `unsubscribe` has not been called yet.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.get()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("subscribed", &self.subscribed.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Listener {
        Rc::new(|| {})
    }

    #[test]
    fn lists_start_aliased() {
        let registry = ListenerRegistry::new();
        assert!(Rc::ptr_eq(&registry.active, &registry.pending));
    }

    #[test]
    fn mutation_copies_pending_away_from_active() {
        let mut registry = ListenerRegistry::new();
        let snapshot = registry.snapshot();

        registry.add(noop());
        assert!(!Rc::ptr_eq(&registry.active, &registry.pending));
        assert_eq!(snapshot.len(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_removal() {
        let mut registry = ListenerRegistry::new();
        let a = registry.add(noop());
        registry.add(noop());

        let snapshot = registry.snapshot();
        registry.remove(a);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let registry = Rc::new(RefCell::new(ListenerRegistry::new()));
        let first = registry.borrow_mut().add(noop());
        let second = registry.borrow_mut().add(noop());
        let subscription = Subscription::new(first, &registry);

        subscription.unsubscribe();
        subscription.unsubscribe();

        assert!(!subscription.is_subscribed());
        let remaining = registry.borrow_mut().snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);
    }
}

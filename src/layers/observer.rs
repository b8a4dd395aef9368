//! Listener bookkeeping for layer change notifications.

use std::fmt;
use std::sync::Arc;

/// Callback invoked when a layer's visual output changes. Carries no payload;
/// listeners re-read whatever state they care about.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned on registration, used to remove a listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered set of listeners, notified synchronously in registration order.
#[derive(Default)]
pub struct ObserverList {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener, returning false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener();
        }
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_notifies_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut observers = ObserverList::new();
        for tag in ["a", "b", "c"] {
            let log = Arc::clone(&log);
            observers.add(Arc::new(move || log.lock().unwrap().push(tag)));
        }

        observers.notify();
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove() {
        let hits = Arc::new(Mutex::new(0));
        let mut observers = ObserverList::new();
        let h = Arc::clone(&hits);
        let id = observers.add(Arc::new(move || *h.lock().unwrap() += 1));

        assert!(observers.remove(id));
        assert!(!observers.remove(id));
        observers.notify();
        assert_eq!(*hits.lock().unwrap(), 0);
        assert!(observers.is_empty());
    }
}

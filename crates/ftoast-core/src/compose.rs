#![forbid(unsafe_code)]

//! Event handler composition.
//!
//! A component usually runs a caller-supplied handler and its own internal
//! handler for the same event. Composition runs them in order and stops as
//! soon as the event's default is prevented, so a caller can veto internal
//! behavior (e.g. keep a toast open on Escape) without replacing it.

use crate::event::DefaultPrevention;

/// Boxed handler for events of type `E`.
pub type Handler<E> = Box<dyn FnMut(&mut E)>;

/// An ordered list of owned handlers dispatched with composition semantics.
pub struct HandlerChain<E> {
    handlers: Vec<Handler<E>>,
}

impl<E> Default for HandlerChain<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<E> std::fmt::Debug for HandlerChain<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("len", &self.handlers.len())
            .finish()
    }
}

impl<E: DefaultPrevention> HandlerChain<E> {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler.
    pub fn push(&mut self, handler: impl FnMut(&mut E) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Number of handlers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when no handlers are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every handler in order until one prevents default.
    ///
    /// Returns `true` when the event is still not prevented afterwards, which
    /// is the signal for the caller's internal handler to run.
    pub fn dispatch(&mut self, event: &mut E) -> bool {
        for handler in &mut self.handlers {
            if event.is_default_prevented() {
                return false;
            }
            handler(event);
        }
        !event.is_default_prevented()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn runs_all_handlers_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = HandlerChain::<KeyEvent>::new();
        let (l1, l2) = (Rc::clone(&log), Rc::clone(&log));
        chain.push(move |_| l1.borrow_mut().push("user"));
        chain.push(move |_| l2.borrow_mut().push("internal"));
        let mut ev = KeyEvent::escape();
        assert!(chain.dispatch(&mut ev));
        assert_eq!(*log.borrow(), vec!["user", "internal"]);
    }

    #[test]
    fn already_prevented_runs_nothing() {
        let hits = Rc::new(RefCell::new(0));
        let mut chain = HandlerChain::<KeyEvent>::new();
        let h = Rc::clone(&hits);
        chain.push(move |_| *h.borrow_mut() += 1);
        let mut ev = KeyEvent::escape();
        ev.prevent_default();
        assert!(!chain.dispatch(&mut ev));
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn chain_dispatch_reports_prevention() {
        let hits = Rc::new(RefCell::new(0));
        let mut chain = HandlerChain::<KeyEvent>::new();
        let h = Rc::clone(&hits);
        chain.push(move |_| *h.borrow_mut() += 1);
        chain.push(|ev| ev.prevent_default());
        let h = Rc::clone(&hits);
        chain.push(move |_| *h.borrow_mut() += 100);

        let mut ev = KeyEvent::escape();
        assert!(!chain.dispatch(&mut ev));
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn empty_chain_lets_event_through() {
        let mut chain = HandlerChain::<KeyEvent>::new();
        assert!(chain.is_empty());
        let mut ev = KeyEvent::escape();
        assert!(chain.dispatch(&mut ev));
    }
}

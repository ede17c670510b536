//! Input handler registration
//!
//! Components that want raw keys or pointer events register a
//! handler. Handlers are held weakly: dropping the owner's `Arc`
//! silently unregisters it. The most recently registered handler
//! is offered input first.

use std::sync::{Arc, Mutex, Weak};

use super::key::Key;

/// Receives keys before keymap translation
pub trait KeyboardHandler: Send {
    /// Return true to claim the key and stop dispatch
    fn on_key_press(&mut self, key: &Key) -> bool;

    fn on_key_release(&mut self, key: &Key);
}

/// Receives raw pointer events from the platform
pub trait MouseDriverHandler: Send {
    /// Return true to claim the motion
    fn on_position(&mut self, x: i32, y: i32) -> bool;

    /// Return true to claim the press
    fn on_button_press(&mut self, button: u8) -> bool;

    fn on_button_release(&mut self, button: u8);
}

/// Receives pointer input in controller terms (relative motion, named buttons)
pub trait MouseInputHandler: Send {
    fn on_motion(&mut self, pointer: &str, dx: i32, dy: i32) -> bool;

    fn on_button_press(&mut self, button: &str) -> bool;

    fn on_button_release(&mut self, button: &str);
}

pub type KeyboardHandlerRef = Arc<Mutex<dyn KeyboardHandler>>;
pub type MouseInputHandlerRef = Arc<Mutex<dyn MouseInputHandler>>;

/// Ordered list of weak handler handles
pub struct HandlerRegistry<T: ?Sized> {
    handlers: Vec<Weak<Mutex<T>>>,
}

impl<T: ?Sized> Default for HandlerRegistry<T> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

fn same<T: ?Sized>(a: &Weak<Mutex<T>>, b: &Weak<Mutex<T>>) -> bool {
    a.as_ptr() as *const () == b.as_ptr() as *const ()
}

impl<T: ?Sized> HandlerRegistry<T> {
    /// Insert at the front; registering twice is a no-op
    pub fn register(&mut self, handler: &Arc<Mutex<T>>) -> bool {
        let weak = Arc::downgrade(handler);
        self.prune();
        if self.handlers.iter().any(|h| same(h, &weak)) {
            return false;
        }
        self.handlers.insert(0, weak);
        true
    }

    pub fn unregister(&mut self, handler: &Arc<Mutex<T>>) -> bool {
        let weak = Arc::downgrade(handler);
        self.prune();
        let before = self.handlers.len();
        self.handlers.retain(|h| !same(h, &weak));
        self.handlers.len() != before
    }

    /// Live handlers in priority order
    ///
    /// Iterating a snapshot lets handlers (un)register during dispatch.
    pub fn snapshot(&mut self) -> Vec<Arc<Mutex<T>>> {
        self.prune();
        self.handlers.iter().filter_map(Weak::upgrade).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.iter().filter(|h| h.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&mut self) {
        self.handlers.retain(|h| h.strong_count() > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::lock;

    struct Claim(bool, u32);

    impl KeyboardHandler for Claim {
        fn on_key_press(&mut self, _key: &Key) -> bool {
            self.1 += 1;
            self.0
        }

        fn on_key_release(&mut self, _key: &Key) {}
    }

    #[test]
    fn test_front_insert_and_idempotent() {
        let mut reg: HandlerRegistry<dyn KeyboardHandler> = HandlerRegistry::default();
        let first: KeyboardHandlerRef = Arc::new(Mutex::new(Claim(false, 0)));
        let second: KeyboardHandlerRef = Arc::new(Mutex::new(Claim(true, 0)));
        assert!(reg.register(&first));
        assert!(reg.register(&second));
        assert!(!reg.register(&first));
        assert_eq!(reg.len(), 2);

        let snapshot = reg.snapshot();
        assert!(Arc::ptr_eq(&snapshot[0], &second));
        assert!(lock(&snapshot[0]).on_key_press(&Key::default()));
    }

    #[test]
    fn test_dropped_handler_pruned() {
        let mut reg: HandlerRegistry<dyn KeyboardHandler> = HandlerRegistry::default();
        let keep: KeyboardHandlerRef = Arc::new(Mutex::new(Claim(false, 0)));
        {
            let gone: KeyboardHandlerRef = Arc::new(Mutex::new(Claim(true, 0)));
            reg.register(&gone);
        }
        reg.register(&keep);
        assert_eq!(reg.snapshot().len(), 1);
        assert!(reg.unregister(&keep));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_unregister_unknown_with_dead_entry() {
        let mut reg: HandlerRegistry<dyn KeyboardHandler> = HandlerRegistry::default();
        let first: KeyboardHandlerRef = Arc::new(Mutex::new(Claim(false, 0)));
        let stranger: KeyboardHandlerRef = Arc::new(Mutex::new(Claim(false, 0)));
        reg.register(&first);
        {
            let gone: KeyboardHandlerRef = Arc::new(Mutex::new(Claim(true, 0)));
            reg.register(&gone);
        }
        assert!(!reg.unregister(&stranger));
        assert!(reg.unregister(&first));
        assert!(reg.is_empty());
    }
}

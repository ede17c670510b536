//! Frame-boundary action queue
//!
//! Producers on any thread push actions; the dispatch thread swaps
//! the whole queue out once per frame. The lock covers only push and
//! swap, never the execution of an action.

use std::sync::{Arc, Mutex};

use crate::input::action::{Action, ACTION_NONE};
use crate::input::lock;

/// Shared handle to the pending actions
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    actions: Arc<Mutex<Vec<Action>>>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action
    ///
    /// An analog action replaces any queued action with the same id.
    pub fn push(&self, action: Action) {
        let mut actions = lock(&self.actions);
        if action.is_analog() {
            actions.retain(|queued| queued.id() != action.id());
        }
        actions.push(action);
    }

    /// Entry point for action producers (peripheral and joystick listeners)
    ///
    /// Held digital actions are only repeated for basic navigation.
    /// Returns true for any action other than "none".
    pub fn on_action(&self, action: &Action) -> bool {
        if action.id() == ACTION_NONE {
            return false;
        }
        if action.is_analog() || action.hold_time_ms() == 0 || action.is_navigation() {
            self.push(action.clone());
        }
        true
    }

    /// Take every queued action, leaving the queue empty
    pub fn take(&self) -> Vec<Action> {
        std::mem::take(&mut *lock(&self.actions))
    }

    pub fn len(&self) -> usize {
        lock(&self.actions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::action::*;
    use crate::input::key::Key;
    use crate::input::keycodes::KEY_BUTTON_A;
    use proptest::prelude::*;

    fn held(id: u32, hold_ms: u32) -> Action {
        Action::from_key(id, "", &Key::new(KEY_BUTTON_A, hold_ms))
    }

    #[test]
    fn test_analog_last_write_wins() {
        let queue = ActionQueue::new();
        queue.push(Action::with_amount(ACTION_SCROLL_UP, 0.2, "ScrollUp"));
        queue.push(Action::new(ACTION_SELECT_ITEM));
        queue.push(Action::with_amount(ACTION_SCROLL_UP, 0.9, "ScrollUp"));
        let drained = queue.take();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].id(), ACTION_SELECT_ITEM);
        assert_eq!(drained[1].amount(0), 0.9);
        assert!(queue.take().is_empty());
    }

    #[test]
    fn test_on_action_filters_held_actions() {
        let queue = ActionQueue::new();
        assert!(!queue.on_action(&Action::none()));
        assert!(queue.on_action(&held(ACTION_SELECT_ITEM, 0)));
        assert!(queue.on_action(&held(ACTION_SELECT_ITEM, 400)));
        assert!(queue.on_action(&held(ACTION_MOVE_DOWN, 400)));
        let ids: Vec<u32> = queue.take().iter().map(Action::id).collect();
        assert_eq!(ids, vec![ACTION_SELECT_ITEM, ACTION_MOVE_DOWN]);
    }

    #[test]
    fn test_producers_on_other_threads() {
        let queue = ActionQueue::new();
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let q = queue.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        q.push(Action::new(ACTION_MOVE_UP));
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(queue.take().len(), 100);
    }

    const ANALOG_IDS: [u32; 4] = [
        ACTION_SCROLL_UP,
        ACTION_VOLUME_UP,
        ACTION_ANALOG_FORWARD,
        ACTION_CURSOR_LEFT,
    ];

    proptest! {
        #[test]
        fn prop_analog_ids_unique_after_any_pushes(
            pushes in prop::collection::vec((0usize..4, 0.0f32..1.0, any::<bool>()), 0..64)
        ) {
            let queue = ActionQueue::new();
            let mut last = std::collections::HashMap::new();
            for (i, amount, digital) in &pushes {
                if *digital {
                    queue.push(Action::new(ACTION_SELECT_ITEM));
                } else {
                    let id = ANALOG_IDS[*i];
                    queue.push(Action::with_amount(id, *amount, ""));
                    last.insert(id, *amount);
                }
            }
            let drained = queue.take();
            for id in ANALOG_IDS {
                let queued: Vec<&Action> = drained.iter().filter(|a| a.id() == id).collect();
                prop_assert!(queued.len() <= 1);
                if let Some(a) = queued.first() {
                    prop_assert_eq!(Some(&a.amount(0)), last.get(&id));
                }
            }
            prop_assert!(queue.take().is_empty());
        }
    }
}

#![forbid(unsafe_code)]

//! Global key-event stream with RAII subscriptions.
//!
//! [`KeyEventHub`] fans one stream of key events out to every live
//! subscriber in registration order. [`KeyEventHub::subscribe`] returns a
//! [`Subscription`] guard; dropping the guard removes the callback from the
//! hub immediately, so opening and closing an editor any number of times
//! leaves the subscriber count where it started.
//!
//! # Failure Modes
//!
//! - **Re-entrant publish**: a callback may publish again or drop other
//!   subscriptions; callbacks are collected before any is invoked.
//! - **Hub dropped first**: a guard that outlives its hub does nothing on drop.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tpl_core::event::KeyEvent;
use tpl_core::shortcut::FocusState;

type Callback = Rc<dyn Fn(&KeyEvent, FocusState)>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<(u64, Callback)>,
}

/// Single-threaded fan-out of key events.
///
/// Cloning a hub creates another handle to the same subscriber list.
#[derive(Clone, Default)]
pub struct KeyEventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl fmt::Debug for KeyEventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEventHub")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl KeyEventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every subsequent event.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&KeyEvent, FocusState) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::new(callback)));
        tracing::debug!(id, count = inner.subscribers.len(), "key subscriber added");
        Subscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every live subscriber.
    pub fn publish(&self, event: &KeyEvent, focus: FocusState) {
        let callbacks: Vec<Callback> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        tracing::trace!(?event, subscribers = callbacks.len(), "key event published");
        for cb in &callbacks {
            cb(event, focus);
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// RAII guard for a hub subscriber.
///
/// Dropping it removes the callback from the hub.
pub struct Subscription {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl Subscription {
    /// Unsubscribe now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}

    /// Whether the hub this guard belongs to still exists.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.hub.strong_count() > 0
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        // A callback being invoked holds its own Rc clone, so removal here is
        // safe even from inside `publish`.
        let Ok(mut inner) = hub.try_borrow_mut() else {
            return;
        };
        inner.subscribers.retain(|(id, _)| *id != self.id);
        tracing::debug!(id = self.id, count = inner.subscribers.len(), "key subscriber removed");
    }
}

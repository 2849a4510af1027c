#![forbid(unsafe_code)]

//! Shortcut dispatch onto an editor session and its collaborators.
//!
//! [`ShortcutDispatcher`] turns a resolved [`ShortcutAction`] into the matching
//! session call: history moves, block duplication, a save through the
//! persistence collaborator, or a preview request. The key-to-action mapping
//! itself is [`ShortcutMapper`]; the dispatcher adds no policy of its own.
//!
//! [`EditorHandle`] wires a dispatcher to a [`KeyEventHub`] for as long as the
//! handle lives. Dropping the handle unsubscribes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tpl_core::event::KeyEvent;
use tpl_core::shortcut::{FocusState, ShortcutAction, ShortcutMapper};

use crate::editor::{EditorSession, SaveError};
use crate::keyboard::{KeyEventHub, Subscription};
use crate::persistence::TemplateStore;
use crate::preview::{PreviewSink, SampleData};

/// What a key event led to.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Not a shortcut here; the event belongs to the focused widget.
    Unbound,
    /// The action ran and changed something (or reached its collaborator).
    Applied(ShortcutAction),
    /// The action was recognized but had nothing to do, e.g. undo at the
    /// oldest entry or duplicate with an index past the end.
    Unavailable(ShortcutAction),
    /// Save was refused.
    SaveFailed(SaveError),
}

impl DispatchOutcome {
    /// Whether the event was consumed by a shortcut.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Unbound)
    }
}

/// Routes shortcut actions to a session, a store and a preview sink.
pub struct ShortcutDispatcher<S, P> {
    mapper: ShortcutMapper,
    store: S,
    preview: P,
    sample: SampleData,
}

impl<S, P> fmt::Debug for ShortcutDispatcher<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutDispatcher")
            .field("mapper", &self.mapper)
            .finish_non_exhaustive()
    }
}

impl<S: TemplateStore, P: PreviewSink> ShortcutDispatcher<S, P> {
    #[must_use]
    pub fn new(mapper: ShortcutMapper, store: S, preview: P) -> Self {
        Self {
            mapper,
            store,
            preview,
            sample: SampleData::default(),
        }
    }

    /// Replace the data passed to the preview sink.
    #[must_use]
    pub fn with_sample(mut self, sample: SampleData) -> Self {
        self.sample = sample;
        self
    }

    #[must_use]
    pub fn mapper(&self) -> &ShortcutMapper {
        &self.mapper
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn preview(&self) -> &P {
        &self.preview
    }

    /// Map `event` and run the resulting action against `session`.
    pub fn handle(
        &mut self,
        session: &mut EditorSession,
        event: &KeyEvent,
        focus: FocusState,
    ) -> DispatchOutcome {
        match self.mapper.map(event, focus) {
            Some(action) => self.perform(session, action),
            None => DispatchOutcome::Unbound,
        }
    }

    /// Run `action` against `session`.
    pub fn perform(
        &mut self,
        session: &mut EditorSession,
        action: ShortcutAction,
    ) -> DispatchOutcome {
        let applied = match action {
            ShortcutAction::Undo => session.undo(),
            ShortcutAction::Redo => session.redo(),
            ShortcutAction::Duplicate { index } => session.duplicate_block(index).is_ok(),
            ShortcutAction::Save => {
                if let Err(e) = session.save(&mut self.store) {
                    return DispatchOutcome::SaveFailed(e);
                }
                true
            }
            ShortcutAction::Preview => {
                self.preview.show(session.document(), &self.sample);
                true
            }
        };

        if applied {
            tracing::debug!(?action, "shortcut applied");
            DispatchOutcome::Applied(action)
        } else {
            tracing::debug!(?action, "shortcut had nothing to do");
            DispatchOutcome::Unavailable(action)
        }
    }
}

/// A session attached to a key-event hub.
///
/// While the handle lives, every event published on the hub is dispatched to
/// the session. Dropping it removes the subscription.
pub struct EditorHandle<S, P> {
    session: Rc<RefCell<EditorSession>>,
    dispatcher: Rc<RefCell<ShortcutDispatcher<S, P>>>,
    subscription: Subscription,
}

impl<S, P> fmt::Debug for EditorHandle<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorHandle")
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

impl<S, P> EditorHandle<S, P>
where
    S: TemplateStore + 'static,
    P: PreviewSink + 'static,
{
    /// Subscribe `dispatcher` to `hub` on behalf of `session`.
    #[must_use]
    pub fn attach(
        hub: &KeyEventHub,
        session: EditorSession,
        dispatcher: ShortcutDispatcher<S, P>,
    ) -> Self {
        let session = Rc::new(RefCell::new(session));
        let dispatcher = Rc::new(RefCell::new(dispatcher));

        let session_ref = Rc::clone(&session);
        let dispatcher_ref = Rc::clone(&dispatcher);
        let subscription = hub.subscribe(move |event, focus| {
            let (Ok(mut session), Ok(mut dispatcher)) =
                (session_ref.try_borrow_mut(), dispatcher_ref.try_borrow_mut())
            else {
                tracing::warn!(?event, "key event dropped: editor busy");
                return;
            };
            let outcome = dispatcher.handle(&mut session, event, focus);
            if let DispatchOutcome::SaveFailed(e) = &outcome {
                tracing::warn!(error = %e, "save shortcut failed");
            }
        });

        Self {
            session,
            dispatcher,
            subscription,
        }
    }

    /// Shared access to the session.
    #[must_use]
    pub fn session(&self) -> &Rc<RefCell<EditorSession>> {
        &self.session
    }

    /// Shared access to the dispatcher and its collaborators.
    #[must_use]
    pub fn dispatcher(&self) -> &Rc<RefCell<ShortcutDispatcher<S, P>>> {
        &self.dispatcher
    }

    /// Detach from the hub and hand the session back.
    ///
    /// Returns `None` if another `Rc` to the session is still alive.
    pub fn close(self) -> Option<EditorSession> {
        let Self {
            session,
            subscription,
            ..
        } = self;
        drop(subscription);
        Rc::try_unwrap(session).ok().map(RefCell::into_inner)
    }
}

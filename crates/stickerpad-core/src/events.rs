//! Change notification for observers of a session.

use crate::tools::ToolKind;
use std::sync::mpsc;

/// Events emitted by a [`crate::Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Anything visible changed: commit, undo, redo, clear, preview or active drawable.
    ContentChanged,
    /// A different tool (or tool style) was selected.
    ToolChanged(ToolKind),
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Returns false once the subscriber is gone and should be dropped.
type Handler = Box<dyn FnMut(&SessionEvent) -> bool>;

/// Broadcasts session events to registered handlers, in registration order.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.len()))
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        mut handler: impl FnMut(&SessionEvent) + 'static,
    ) -> SubscriptionId {
        self.register(Box::new(move |event: &SessionEvent| {
            handler(event);
            true
        }))
    }

    /// Forward every event into an mpsc channel.
    ///
    /// The subscription is removed on the first emit after the receiver is
    /// dropped.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, mpsc::Receiver<SessionEvent>) {
        let (tx, rx) = mpsc::channel();
        let id = self.register(Box::new(move |event: &SessionEvent| tx.send(*event).is_ok()));
        (id, rx)
    }

    fn register(&mut self, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, event: SessionEvent) {
        self.handlers.retain_mut(|(id, handler)| {
            let keep = handler(&event);
            if !keep {
                log::debug!("dropping closed subscription {id:?}");
            }
            keep
        });
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

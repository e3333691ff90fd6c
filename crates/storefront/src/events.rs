//! Typed application events.
//!
//! Screens that need to react to something another screen did (the cart badge
//! after an add-to-cart, the login prompt after a 401) subscribe here.

use tokio::sync::broadcast;

use shopfront_core::UserId;

const DEFAULT_CAPACITY: usize = 64;

/// Events published by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The server-side cart changed; listeners should refetch it.
    CartChanged,
    /// An item was just added; the cart panel should open.
    OpenCart,
    /// A request was rejected with 401 and the session was cleared.
    LoginRequired,
    /// A login or registration succeeded.
    SignedIn(UserId),
    /// The user logged out.
    SignedOut,
}

/// Broadcast bus for [`AppEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn emit(&self, event: AppEvent) {
        tracing::trace!(?event, "Emitting app event");
        let _ = self.sender.send(event);
    }
}

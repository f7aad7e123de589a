//! Page-level signal bus.
//!
//! The original front-end signalled global failures through ad-hoc DOM
//! events; here delivery is explicit: a broadcast channel with a closed set
//! of event kinds. Subscribers receive signals in publish order. The bus is
//! fire-and-forget: publishing with no subscribers is fine, and a lagged
//! subscriber drops the oldest signals first.

use tokio::sync::broadcast;

const SIGNAL_CHANNEL_CAPACITY: usize = 64;

/// Why a session ended, forwarded to the login screen as a reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEndReason {
    /// The backend rejected the token (401).
    Unauthorized,
    /// The user logged out.
    LoggedOut,
}

impl SessionEndReason {
    /// Reason code appended to the login redirect.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unauthorized => "session_expired",
            Self::LoggedOut => "logged_out",
        }
    }
}

/// A page-level signal.
#[derive(Debug, Clone)]
pub enum Signal {
    /// Server 5xx or network-level failure: show the critical error page.
    CriticalError {
        /// Operator-facing description.
        message: String,
    },
    /// Ordinary business failure (4xx): show a transient toast.
    Notification {
        /// User-facing message from the backend.
        message: String,
    },
    /// Session invalidated: clear auth state and return to login.
    SessionExpired {
        /// Why the session ended.
        reason: SessionEndReason,
    },
}

/// Broadcast bus for [`Signal`]s.
#[derive(Debug, Clone)]
pub struct SignalBus {
    sender: broadcast::Sender<Signal>,
}

impl SignalBus {
    /// Create a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to signals published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.sender.subscribe()
    }

    /// Publish a signal. Publishing with no subscribers is not an error.
    pub fn emit(&self, signal: Signal) {
        let kind = match &signal {
            Signal::CriticalError { .. } => "critical_error",
            Signal::Notification { .. } => "notification",
            Signal::SessionExpired { .. } => "session_expired",
        };
        tracing::debug!(kind, "emitting signal");
        let _ = self.sender.send(signal);
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signals_arrive_in_publish_order() {
        let bus = SignalBus::new();
        let mut rx = bus.subscribe();

        bus.emit(Signal::Notification {
            message: "first".into(),
        });
        bus.emit(Signal::CriticalError {
            message: "second".into(),
        });

        assert!(matches!(rx.recv().await.unwrap(), Signal::Notification { message } if message == "first"));
        assert!(matches!(rx.recv().await.unwrap(), Signal::CriticalError { message } if message == "second"));
    }

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let bus = SignalBus::new();
        bus.emit(Signal::SessionExpired {
            reason: SessionEndReason::Unauthorized,
        });
        assert_eq!(SessionEndReason::Unauthorized.code(), "session_expired");
    }
}

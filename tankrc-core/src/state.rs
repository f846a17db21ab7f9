use derive_more::Display;

/// Connection state of a link, either role.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No connection and no listener.
    Disconnected,
    /// Unrecoverable socket failure; the link must be recreated.
    SocketError,
    /// Backend only: a listener is armed and waiting for a frontend.
    Listening,
    /// A socket exists but the handshake has not been verified yet.
    Connecting,
    /// Handshake verified; messages flow.
    Connected,
}

impl LinkState {
    /// The handshake completed and regular messages may be exchanged.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, LinkState::Connected)
    }

    /// A connected socket exists and is being serviced (handshake may
    /// still be pending).
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, LinkState::Connecting | LinkState::Connected)
    }
}

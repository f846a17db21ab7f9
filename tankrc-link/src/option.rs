use std::time::Duration;

use tankrc_core::protocol;

use crate::sleep::{Sleep, StdSleeper};

/// Tuning for [`FrontendLink`](crate::frontend::FrontendLink).
#[derive(Debug)]
pub struct FrontendOption {
    /// Cadence of the socket pump thread.
    pub poll_interval: Duration,
    /// How long a blocked call waits before re-sending its request line.
    /// Re-sending is what carries a state-guarded request across the
    /// backend's mid-tick window.
    pub resend_interval: Duration,
    /// Bounds both the TCP connect and the handshake wait.
    pub connect_timeout: Duration,
    pub recv_capacity: usize,
    pub send_capacity: usize,
    /// Sleeper the pump thread paces itself with.
    pub sleeper: Box<dyn Sleep>,
}

impl Default for FrontendOption {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1),
            resend_interval: Duration::from_millis(50),
            connect_timeout: Duration::from_secs(5),
            recv_capacity: protocol::RECV_BUFFER_LEN,
            send_capacity: protocol::SEND_BUFFER_LEN,
            sleeper: Box::new(StdSleeper),
        }
    }
}

/// Tuning for [`BackendLink`](crate::backend::BackendLink).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendOption {
    pub recv_capacity: usize,
    pub send_capacity: usize,
}

impl Default for BackendOption {
    fn default() -> Self {
        Self {
            recv_capacity: protocol::RECV_BUFFER_LEN,
            send_capacity: protocol::SEND_BUFFER_LEN,
        }
    }
}

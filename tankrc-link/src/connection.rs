use std::{
    io::{self, Read, Write},
    net::TcpStream,
};

use tankrc_core::{
    error::LinkError,
    framing::{LineReader, SendQueue},
    message::Message,
    state::LinkState,
};
use tankrc_protocol::{replies::Reply, vehicle::ReplySink};

/// One TCP socket plus the buffered framing around it.
///
/// Shared by both link roles; owns every state transition that follows
/// from socket behavior. All I/O is non-blocking, so a pump pass
/// (`write_drain`, `read_fill`, `next_line`) never stalls its caller.
#[derive(Debug)]
pub(crate) struct Connection {
    socket: Option<TcpStream>,
    state: LinkState,
    reader: LineReader,
    sender: SendQueue,
    recv_capacity: usize,
    send_capacity: usize,
}

/// What one receive pass observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadOutcome {
    /// Nothing to read right now.
    Idle,
    /// New bytes were buffered.
    Data,
    /// Zero-length read: the peer shut down cleanly.
    PeerClosed,
    /// The socket failed; the state is now `SocketError`.
    Failed,
}

impl Connection {
    pub(crate) fn new(recv_capacity: usize, send_capacity: usize) -> Self {
        Self {
            socket: None,
            state: LinkState::Disconnected,
            reader: LineReader::new(recv_capacity),
            sender: SendQueue::new(send_capacity),
            recv_capacity,
            send_capacity,
        }
    }

    pub(crate) fn state(&self) -> LinkState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: LinkState) {
        if state != self.state {
            tracing::debug!(from = %self.state, to = %state, "link state");
            self.state = state;
        }
    }

    /// Adopt a freshly connected socket and open the handshake window.
    /// Both buffers start empty; nothing survives from a previous peer.
    pub(crate) fn attach(&mut self, socket: TcpStream) -> Result<(), LinkError> {
        socket.set_nonblocking(true)?;
        self.reader = LineReader::new(self.recv_capacity);
        self.sender = SendQueue::new(self.send_capacity);
        self.socket = Some(socket);
        self.set_state(LinkState::Connecting);
        Ok(())
    }

    /// Drop the socket. Callers that can accept again move the state on
    /// to `Listening` themselves.
    pub(crate) fn close(&mut self) {
        self.socket = None;
        self.set_state(LinkState::Disconnected);
    }

    fn fail(&mut self, context: &str, err: &io::Error) {
        tracing::error!(context, %err, "socket failure");
        self.socket = None;
        self.set_state(LinkState::SocketError);
    }

    /// Queue one already-terminated line for transmission.
    pub(crate) fn enqueue(&mut self, text: &str) -> Result<(), LinkError> {
        if !self.state.is_online() {
            return Err(LinkError::NotConnected);
        }
        self.sender.enqueue(text)
    }

    /// Push buffered bytes into the socket until it would block.
    pub(crate) fn write_drain(&mut self) {
        self.sender.recover();
        let Some(socket) = self.socket.as_mut() else {
            return;
        };
        let mut failure = None;
        while !self.sender.is_empty() {
            match socket.write(self.sender.pending()) {
                Ok(0) => break,
                Ok(n) => self.sender.consume(n),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        if let Some(err) = failure {
            self.fail("write", &err);
        }
    }

    /// Pull available bytes out of the socket into the line buffer.
    pub(crate) fn read_fill(&mut self) -> ReadOutcome {
        let Some(socket) = self.socket.as_mut() else {
            return ReadOutcome::Idle;
        };
        let mut outcome = ReadOutcome::Idle;
        let mut failure = None;
        loop {
            let vacant = self.reader.vacant();
            if vacant.is_empty() {
                // Full without a newline; the parse pass flags and
                // discards the oversized line.
                break;
            }
            match socket.read(vacant) {
                Ok(0) => {
                    outcome = ReadOutcome::PeerClosed;
                    break;
                }
                Ok(n) => {
                    self.reader.commit(n);
                    outcome = ReadOutcome::Data;
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        if let Some(err) = failure {
            self.fail("read", &err);
            return ReadOutcome::Failed;
        }
        outcome
    }

    /// Next complete inbound line, if any.
    pub(crate) fn next_line(&mut self) -> Option<String> {
        self.reader.next_line()
    }
}

impl ReplySink for Connection {
    fn post_reply(&mut self, reply: &dyn Reply) -> Result<(), LinkError> {
        self.enqueue(&reply.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use tankrc_protocol::replies::GetXReply;

    use super::*;

    #[test]
    fn enqueue_is_refused_while_offline() {
        let mut conn = Connection::new(128, 128);
        assert!(matches!(
            conn.enqueue("GetX\n"),
            Err(LinkError::NotConnected)
        ));
        assert!(matches!(
            conn.post_reply(&GetXReply::new(1.0)),
            Err(LinkError::NotConnected)
        ));
    }

    #[test]
    fn draining_without_a_socket_is_a_no_op() {
        let mut conn = Connection::new(128, 128);
        conn.write_drain();
        assert_eq!(ReadOutcome::Idle, conn.read_fill());
        assert_eq!(None, conn.next_line());
    }
}

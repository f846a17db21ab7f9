use std::{
    collections::VecDeque,
    io,
    net::{SocketAddr, TcpListener},
};

use tankrc_core::{
    error::LinkError, framing, message::Message, protocol, registry::Registry, state::LinkState,
};
use tankrc_protocol::{
    requests::Request,
    vehicle::{ProcessOutcome, Vehicle},
};

use crate::{
    connection::{Connection, ReadOutcome},
    option::BackendOption,
};

/// Simulation-process end of the link.
///
/// Owns the listening socket and at most one connected frontend. The host
/// simulation calls [`BackendLink::update`] once per frame; accepting,
/// draining, parsing and dispatch all happen inside that call on the
/// caller's thread, so the link never outpaces the simulation.
#[derive(Debug)]
pub struct BackendLink {
    listener: Option<TcpListener>,
    conn: Connection,
    requests: Registry<dyn Request>,
    pending: VecDeque<Box<dyn Request>>,
}

impl BackendLink {
    /// Create an idle backend with an injected request vocabulary.
    #[must_use]
    pub fn new(requests: Registry<dyn Request>, option: BackendOption) -> Self {
        Self {
            listener: None,
            conn: Connection::new(option.recv_capacity, option.send_capacity),
            requests,
            pending: VecDeque::new(),
        }
    }

    /// Bind and start listening for a frontend.
    pub fn listen(&mut self, addr: SocketAddr) -> Result<(), LinkError> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        tracing::info!(addr = %listener.local_addr()?, "listening for a frontend");
        self.listener = Some(listener);
        self.conn.set_state(LinkState::Listening);
        Ok(())
    }

    /// Address the listener actually bound (pass port 0 to `listen` and
    /// read it back here).
    pub fn local_addr(&self) -> Result<SocketAddr, LinkError> {
        let listener = self.listener.as_ref().ok_or(LinkError::NotConnected)?;
        Ok(listener.local_addr()?)
    }

    #[must_use]
    pub fn state(&self) -> LinkState {
        self.conn.state()
    }

    /// One frame of link service: accept, drain, parse, dispatch, forward.
    pub fn update(&mut self, vehicle: &mut dyn Vehicle) {
        if self.conn.state() == LinkState::Listening {
            self.try_accept();
        }
        if !self.conn.state().is_online() {
            return;
        }
        self.conn.write_drain();
        match self.conn.read_fill() {
            ReadOutcome::PeerClosed => {
                tracing::info!("frontend disconnected");
                self.drop_frontend();
                return;
            }
            ReadOutcome::Failed => return,
            ReadOutcome::Idle | ReadOutcome::Data => {}
        }
        while let Some(line) = self.conn.next_line() {
            match self.conn.state() {
                LinkState::Connecting => self.handshake_line(&line),
                LinkState::Connected => self.request_line(&line),
                _ => break,
            }
        }
        self.dispatch(vehicle);
        self.forward_events(vehicle);
        self.conn.write_drain();
    }

    /// Drop both the frontend connection and the listener.
    pub fn close(&mut self) {
        self.pending.clear();
        self.listener = None;
        self.conn.close();
    }

    fn try_accept(&mut self) {
        let Some(listener) = self.listener.as_ref() else {
            return;
        };
        match listener.accept() {
            Ok((socket, peer)) => {
                tracing::info!(%peer, "frontend connected");
                let hello = format!(
                    "{} {}\n",
                    protocol::BACKEND_IDENTITY,
                    protocol::PROTOCOL_VERSION
                );
                if self.conn.attach(socket).is_err() || self.conn.enqueue(&hello).is_err() {
                    self.drop_frontend();
                }
            }
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock
                        | io::ErrorKind::Interrupted
                        | io::ErrorKind::ConnectionAborted
                ) => {}
            Err(err) => {
                tracing::error!(%err, "accept failed");
                self.listener = None;
                self.conn.set_state(LinkState::SocketError);
            }
        }
    }

    /// Lose the frontend but keep serving: back to `Listening` as long as
    /// the listener is still armed.
    fn drop_frontend(&mut self) {
        self.pending.clear();
        self.conn.close();
        if self.listener.is_some() {
            self.conn.set_state(LinkState::Listening);
        }
    }

    fn handshake_line(&mut self, line: &str) {
        let tokens = framing::tokenize(line);
        if tokens.len() == 2
            && tokens[0] == protocol::FRONTEND_IDENTITY
            && tokens[1] == protocol::PROTOCOL_VERSION
        {
            self.conn.set_state(LinkState::Connected);
            tracing::info!(
                version = protocol::PROTOCOL_VERSION,
                "frontend identification verified"
            );
        } else {
            tracing::warn!(%line, "frontend failed identification, refusing");
            let _ = self.conn.enqueue(protocol::HANDSHAKE_REFUSAL);
            self.conn.write_drain();
            self.drop_frontend();
        }
    }

    /// A malformed request is answered with an `error` line, not a close:
    /// a buggy bot gets told which command it botched and the match goes
    /// on.
    fn request_line(&mut self, line: &str) {
        let tokens = framing::tokenize(line);
        let Some((&name, args)) = tokens.split_first() else {
            return;
        };
        match self.requests.create(name, args) {
            Ok(request) => self.pending.push_back(request),
            Err(err) => {
                tracing::warn!(%line, %err, "rejecting request");
                let _ = self
                    .conn
                    .enqueue(&format!("{} {name}\n", protocol::ERROR_TOKEN));
            }
        }
    }

    fn dispatch(&mut self, vehicle: &mut dyn Vehicle) {
        while let Some(request) = self.pending.pop_front() {
            match request.process(vehicle, &mut self.conn) {
                Ok(ProcessOutcome::Done) => {}
                Ok(ProcessOutcome::NotReady) => {
                    // No answer on purpose; the frontend re-sends until a
                    // steady tick accepts the command.
                    tracing::trace!(command = request.command_name(), "mid-tick, dropped");
                }
                Err(err) => {
                    tracing::warn!(command = request.command_name(), %err, "request failed");
                }
            }
        }
    }

    /// Drain the vehicle's notifications every frame; they only reach the
    /// wire while a verified frontend is attached.
    fn forward_events(&mut self, vehicle: &mut dyn Vehicle) {
        for event in vehicle.take_events() {
            if self.conn.state().is_connected() {
                let _ = self.conn.enqueue(&event.to_wire());
            }
        }
    }
}

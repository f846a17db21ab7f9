use std::{
    collections::VecDeque,
    net::{SocketAddr, TcpStream},
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    thread::JoinHandle,
    time::{Duration, Instant},
};

use tankrc_core::{
    error::LinkError, framing, message::Message, protocol, registry::Registry, state::LinkState,
};
use tankrc_protocol::{cache::TankState, events::Event, replies::Reply, requests::Request};

use crate::{
    connection::{Connection, ReadOutcome},
    option::FrontendOption,
    sleep::Sleep,
};

/// Bot-process end of the link.
///
/// [`FrontendLink::connect`] spawns a pump thread that services the socket
/// on a fixed cadence; bot code then blocks on [`FrontendLink::call`] until
/// the pump hands it the matching reply. One request is in flight at a
/// time, which `&mut self` on `call` enforces at compile time.
#[derive(Debug)]
pub struct FrontendLink {
    shared: Arc<Shared>,
    pump: Option<JoinHandle<()>>,
    resend_interval: Duration,
}

#[derive(Debug)]
struct Shared {
    inner: Mutex<Inner>,
    wake: Condvar,
}

#[derive(Debug)]
struct Inner {
    conn: Connection,
    replies: Registry<dyn Reply>,
    events: Registry<dyn Event>,
    reply_queue: VecDeque<Box<dyn Reply>>,
    event_queue: VecDeque<Box<dyn Event>>,
    shutdown: bool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FrontendLink {
    /// Connect to a backend and run the identity exchange, blocking until
    /// the backend has introduced itself with a matching protocol version.
    ///
    /// The reply and event vocabularies are injected here; the pump
    /// consults nothing global.
    pub fn connect(
        addr: SocketAddr,
        replies: Registry<dyn Reply>,
        events: Registry<dyn Event>,
        option: FrontendOption,
    ) -> Result<Self, LinkError> {
        let FrontendOption {
            poll_interval,
            resend_interval,
            connect_timeout,
            recv_capacity,
            send_capacity,
            sleeper,
        } = option;

        let socket = TcpStream::connect_timeout(&addr, connect_timeout)?;
        let mut conn = Connection::new(recv_capacity, send_capacity);
        conn.attach(socket)?;
        tracing::info!(%addr, "connected, waiting for backend identification");

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                conn,
                replies,
                events,
                reply_queue: VecDeque::new(),
                event_queue: VecDeque::new(),
                shutdown: false,
            }),
            wake: Condvar::new(),
        });
        let pump = std::thread::Builder::new()
            .name("tankrc-link-pump".to_string())
            .spawn({
                let shared = Arc::clone(&shared);
                move || pump_main(&shared, poll_interval, sleeper)
            })?;

        let mut link = Self {
            shared,
            pump: Some(pump),
            resend_interval,
        };
        if let Err(err) = link.await_handshake(connect_timeout) {
            link.close();
            return Err(err);
        }
        Ok(link)
    }

    fn await_handshake(&self, timeout: Duration) -> Result<(), LinkError> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.shared.lock();
        loop {
            match inner.conn.state() {
                LinkState::Connected => return Ok(()),
                LinkState::Connecting => {}
                state => {
                    return Err(LinkError::Handshake(format!(
                        "link reached {state} before the version exchange completed"
                    )));
                }
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(LinkError::Handshake(
                    "backend did not identify in time".to_string(),
                ));
            }
            let (guard, _) = self
                .shared
                .wake
                .wait_timeout(inner, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
        }
    }

    /// Send `request` and block until its completing reply has been
    /// applied to `state`.
    ///
    /// Every reply popped on the way is applied in arrival order, so the
    /// cache also absorbs stragglers from earlier calls. While the request
    /// stays unanswered the identical line is re-sent every resend
    /// interval: the backend drops state-guarded requests mid-tick, and
    /// the retry is what carries them across that gap.
    pub fn call(&mut self, request: &dyn Request, state: &mut TankState) -> Result<(), LinkError> {
        let line = request.to_wire();
        let target = request.reply_name();
        let mut inner = self.shared.lock();
        if !inner.conn.state().is_connected() {
            return Err(LinkError::NotConnected);
        }
        inner.conn.enqueue(&line)?;
        loop {
            while let Some(reply) = inner.reply_queue.pop_front() {
                reply.apply(state);
                if reply.command_name() == target {
                    return Ok(());
                }
            }
            if !inner.conn.state().is_connected() {
                return Err(LinkError::NotConnected);
            }
            let (guard, timeout) = self
                .shared
                .wake
                .wait_timeout(inner, self.resend_interval)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
            if timeout.timed_out() && inner.conn.state().is_connected() {
                inner.conn.enqueue(&line)?;
            }
        }
    }

    /// Next queued backend notification, if any. Events ride their own
    /// queue so a blocked call never swallows them.
    #[must_use]
    pub fn poll_event(&self) -> Option<Box<dyn Event>> {
        self.shared.lock().event_queue.pop_front()
    }

    /// Connection state as the pump last left it.
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.shared.lock().conn.state()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Stop the pump and drop the socket. Idempotent.
    pub fn close(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.wake.notify_all();
        if let Some(pump) = self.pump.take() {
            let _ = pump.join();
        }
    }
}

impl Drop for FrontendLink {
    fn drop(&mut self) {
        self.close();
    }
}

fn pump_main(shared: &Shared, interval: Duration, sleeper: Box<dyn Sleep>) {
    let mut next = Instant::now() + interval;
    loop {
        {
            let mut inner = shared.lock();
            if inner.shutdown {
                inner.conn.close();
                shared.wake.notify_all();
                return;
            }
            let before = (
                inner.conn.state(),
                inner.reply_queue.len(),
                inner.event_queue.len(),
            );
            pump_once(&mut inner);
            let after = (
                inner.conn.state(),
                inner.reply_queue.len(),
                inner.event_queue.len(),
            );
            // Waiters sleep on a timeout that doubles as the re-send
            // timer, so only observable changes may wake them.
            if before != after {
                shared.wake.notify_all();
            }
            if !inner.conn.state().is_online() {
                tracing::debug!("link offline, pump exiting");
                return;
            }
        }
        sleeper.sleep_until(next);
        next += interval;
    }
}

fn pump_once(inner: &mut Inner) {
    inner.conn.write_drain();
    match inner.conn.read_fill() {
        ReadOutcome::PeerClosed => {
            tracing::info!("backend closed the connection");
            inner.conn.close();
            return;
        }
        ReadOutcome::Failed => return,
        ReadOutcome::Idle | ReadOutcome::Data => {}
    }
    while let Some(line) = inner.conn.next_line() {
        match inner.conn.state() {
            LinkState::Connecting => handshake_line(inner, &line),
            LinkState::Connected => message_line(inner, &line),
            _ => break,
        }
    }
}

fn handshake_line(inner: &mut Inner, line: &str) {
    let tokens = framing::tokenize(line);
    if tokens.len() == 2
        && tokens[0] == protocol::BACKEND_IDENTITY
        && tokens[1] == protocol::PROTOCOL_VERSION
    {
        let answer = format!(
            "{} {}\n",
            protocol::FRONTEND_IDENTITY,
            protocol::PROTOCOL_VERSION
        );
        if inner.conn.enqueue(&answer).is_err() {
            inner.conn.close();
            return;
        }
        inner.conn.set_state(LinkState::Connected);
        tracing::info!(
            version = protocol::PROTOCOL_VERSION,
            "backend identification verified"
        );
    } else {
        tracing::error!(%line, "expected backend identification, closing");
        inner.conn.close();
    }
}

/// Anything unaccounted for from the backend is protocol corruption and
/// fatal; only `error` lines are tolerated, as logs.
fn message_line(inner: &mut Inner, line: &str) {
    let tokens = framing::tokenize(line);
    let Some((&name, args)) = tokens.split_first() else {
        return;
    };
    if name == protocol::ERROR_TOKEN {
        tracing::warn!(%line, "error line from backend");
        return;
    }
    if inner.replies.is_registered(name) {
        match inner.replies.create(name, args) {
            Ok(reply) => inner.reply_queue.push_back(reply),
            Err(err) => {
                tracing::error!(%line, %err, "malformed reply, closing");
                inner.conn.close();
            }
        }
    } else if inner.events.is_registered(name) {
        match inner.events.create(name, args) {
            Ok(event) => inner.event_queue.push_back(event),
            Err(err) => {
                tracing::error!(%line, %err, "malformed event, closing");
                inner.conn.close();
            }
        }
    } else {
        tracing::error!(command = name, "unknown message from backend, closing");
        inner.conn.close();
    }
}

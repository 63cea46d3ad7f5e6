//! FIX client - session ownership, order commands, event stream
//!
//! ```text
//! buy/sell/cancel_order ─► translator ─► FixSession::send ─► venue
//! venue ─► SessionEvent ─► normalizer ─► ClientEvent::Message ─► caller
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::core::{
    CancelIntent, Credentials, Error, FixConfig, OrderParams, Result, Side, Symbol,
};
use crate::fix::{
    FixMessage, FixSession, SecureConnector, SecureStream, SessionEvent, SessionEvents,
    TransportEvent, TransportEvents,
};
use crate::handshake::{self, ActiveSession};
use crate::normalizer::{self, NormalizedEvent};
use crate::signer::HmacSigner;
use crate::translator;

/// Lifecycle and message events delivered to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Logon confirmed, orders may be sent
    Open,
    Message(NormalizedEvent),
    Error(Error),
    /// Session torn down
    Close,
}

pub type EventReceiver = mpsc::UnboundedReceiver<ClientEvent>;

struct Connection {
    generation: u64,
    stream: Box<dyn SecureStream>,
    session: Arc<dyn FixSession>,
    logged_on: bool,
}

enum ConnectionState {
    Disconnected,
    Connecting,
    Active(Connection),
}

/// State shared between the client handle and its dispatch task
struct Shared {
    state: Mutex<ConnectionState>,
    generation: AtomicU64,
    events: mpsc::UnboundedSender<ClientEvent>,
}

impl Shared {
    fn emit(&self, event: ClientEvent) {
        if self.events.send(event).is_err() {
            trace!("Event receiver dropped");
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        matches!(&*self.state.lock(), ConnectionState::Active(conn) if conn.generation == generation)
    }

    fn on_message(&self, generation: u64, msg: &FixMessage) {
        debug!(%msg, "Inbound");
        let Some(event) = normalizer::normalize(msg) else {
            return;
        };
        let is_logon = event == NormalizedEvent::Logon;
        self.emit(ClientEvent::Message(event));

        if is_logon {
            let mut state = self.state.lock();
            if let ConnectionState::Active(conn) = &mut *state {
                if conn.generation == generation && !conn.logged_on {
                    conn.logged_on = true;
                    info!(generation, "FIX session open");
                    self.emit(ClientEvent::Open);
                }
            }
        }
    }

    /// Ask the transport to close; its `End` completes the teardown
    fn end_stream(&self, generation: u64) {
        if let ConnectionState::Active(conn) = &*self.state.lock() {
            if conn.generation == generation {
                info!(generation, "Session ended, closing transport");
                conn.stream.end();
            }
        }
    }

    /// Clear the session if it is still `generation`. Emits `Close` only
    /// when something was actually torn down.
    fn teardown(&self, generation: Option<u64>, close_stream: bool) -> bool {
        let conn = {
            let mut state = self.state.lock();
            match &*state {
                ConnectionState::Active(conn)
                    if generation.is_none_or(|g| g == conn.generation) => {}
                _ => return false,
            }
            match std::mem::replace(&mut *state, ConnectionState::Disconnected) {
                ConnectionState::Active(conn) => conn,
                _ => return false,
            }
        };

        if close_stream {
            conn.stream.end();
        }
        info!(generation = conn.generation, "FIX session closed");
        self.emit(ClientEvent::Close);
        true
    }
}

/// Resets `Connecting` back to `Disconnected` when `connect` is dropped
/// before it settles. Finished connects have already moved the state on.
struct ConnectingGuard<'a> {
    shared: &'a Shared,
    generation: u64,
}

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        if matches!(&*state, ConnectionState::Connecting)
            && self.shared.generation.load(Ordering::Relaxed) == self.generation
        {
            debug!(generation = self.generation, "Connect abandoned");
            *state = ConnectionState::Disconnected;
        }
    }
}

/// Order-entry client for one product over one FIX session at a time
pub struct FixClient {
    product_id: Symbol,
    config: FixConfig,
    credentials: Credentials,
    signer: HmacSigner,
    connector: Arc<dyn SecureConnector>,
    shared: Arc<Shared>,
}

impl FixClient {
    /// Build a client without touching the network
    pub fn new(
        product_id: impl Into<String>,
        config: FixConfig,
        credentials: Credentials,
        connector: Arc<dyn SecureConnector>,
    ) -> Result<(Self, EventReceiver)> {
        let signer = HmacSigner::from_base64(credentials.secret())?;
        let (tx, rx) = mpsc::unbounded_channel();

        let client = Self {
            product_id: Symbol::new(product_id),
            config,
            credentials,
            signer,
            connector,
            shared: Arc::new(Shared {
                state: Mutex::new(ConnectionState::Disconnected),
                generation: AtomicU64::new(0),
                events: tx,
            }),
        };
        Ok((client, rx))
    }

    pub fn product_id(&self) -> &Symbol {
        &self.product_id
    }

    pub fn config(&self) -> &FixConfig {
        &self.config
    }

    /// True once logon has been confirmed and until teardown
    pub fn is_connected(&self) -> bool {
        matches!(&*self.shared.state.lock(), ConnectionState::Active(conn) if conn.logged_on)
    }

    /// Open the transport, create the session and send the signed logon.
    ///
    /// A malformed URI is returned as `InvalidConfig` with no events. Any
    /// other failure is returned and also emitted as `Error` followed by
    /// `Close`. `Open` follows once the venue confirms the logon.
    pub async fn connect(&self) -> Result<()> {
        let generation = {
            let mut state = self.shared.state.lock();
            match &*state {
                ConnectionState::Disconnected => {}
                ConnectionState::Connecting => {
                    return Err(Error::InvalidState("connect already in progress".to_string()));
                }
                ConnectionState::Active(_) => {
                    return Err(Error::InvalidState("session already active".to_string()));
                }
            }
            *state = ConnectionState::Connecting;
            self.shared.generation.fetch_add(1, Ordering::Relaxed) + 1
        };
        let _guard = ConnectingGuard {
            shared: &self.shared,
            generation,
        };

        let result = handshake::connect(
            &self.config,
            &self.credentials,
            &self.signer,
            self.connector.as_ref(),
        )
        .await;

        match result {
            Ok(ActiveSession {
                stream,
                session,
                session_events,
                transport_events,
            }) => {
                *self.shared.state.lock() = ConnectionState::Active(Connection {
                    generation,
                    stream,
                    session,
                    logged_on: false,
                });
                tokio::spawn(dispatch(
                    self.shared.clone(),
                    generation,
                    session_events,
                    transport_events,
                ));
                Ok(())
            }
            Err(e) => {
                *self.shared.state.lock() = ConnectionState::Disconnected;
                if !matches!(e, Error::InvalidConfig(_)) {
                    warn!(error = %e, "FIX connect failed");
                    self.shared.emit(ClientEvent::Error(e.clone()));
                    self.shared.emit(ClientEvent::Close);
                }
                Err(e)
            }
        }
    }

    /// Close the active session. Emits exactly one `Close`.
    pub fn disconnect(&self) -> Result<()> {
        if matches!(&*self.shared.state.lock(), ConnectionState::Connecting) {
            return Err(Error::InvalidState("connect in progress".to_string()));
        }
        if self.shared.teardown(None, true) {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    pub fn buy(&self, params: OrderParams) -> Result<()> {
        self.place_order(params, Side::Buy)
    }

    pub fn sell(&self, params: OrderParams) -> Result<()> {
        self.place_order(params, Side::Sell)
    }

    /// Cancel `order_id`. `request_id` becomes the ClOrdID of the cancel
    /// request and is echoed back in any cancel reject.
    pub fn cancel_order(
        &self,
        request_id: impl Into<String>,
        client_order_id: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Result<()> {
        let intent = CancelIntent {
            symbol: self.product_id.clone(),
            request_id: request_id.into(),
            client_order_id: client_order_id.into(),
            order_id: order_id.into(),
        };
        self.send_with(|| Ok(translator::to_cancel(&intent)))
    }

    fn place_order(&self, params: OrderParams, side: Side) -> Result<()> {
        let intent = params.into_intent(self.product_id.clone(), side);
        self.send_with(|| translator::to_new_order(&intent))
    }

    /// Translate and send under the state lock, so concurrent callers reach
    /// the session in one order. Send failures become `Error` events.
    fn send_with(&self, build: impl FnOnce() -> Result<FixMessage>) -> Result<()> {
        let state = self.shared.state.lock();
        let session = match &*state {
            ConnectionState::Active(conn) if conn.logged_on => &conn.session,
            _ => return Err(Error::NotConnected),
        };

        let msg = build()?;
        debug!(%msg, "Outbound");
        if let Err(e) = session.send(msg, false) {
            warn!(error = %e, "FIX send failed");
            self.shared.emit(ClientEvent::Error(e));
        }
        Ok(())
    }
}

/// Process inbound traffic for one session, one event at a time
async fn dispatch(
    shared: Arc<Shared>,
    generation: u64,
    mut session_events: SessionEvents,
    mut transport_events: TransportEvents,
) {
    let mut session_open = true;

    loop {
        tokio::select! {
            biased;

            event = session_events.recv(), if session_open => match event {
                Some(SessionEvent::Message(msg, next)) => {
                    shared.on_message(generation, &msg);
                    next.complete();
                }
                Some(SessionEvent::End) => shared.end_stream(generation),
                Some(SessionEvent::Error(e)) => {
                    warn!(error = %e, "FIX session error");
                    shared.emit(ClientEvent::Error(Error::Session(e)));
                    shared.teardown(Some(generation), true);
                    break;
                }
                None => {
                    debug!(generation, "Session event stream closed");
                    session_open = false;
                }
            },
            event = transport_events.recv() => match event {
                Some(TransportEvent::End) | None => {
                    drain_session(&shared, generation, &mut session_events);
                    shared.teardown(Some(generation), false);
                    break;
                }
                Some(TransportEvent::Error(e)) => {
                    drain_session(&shared, generation, &mut session_events);
                    warn!(error = %e, "Transport error");
                    shared.emit(ClientEvent::Error(Error::Transport(e)));
                    shared.teardown(Some(generation), true);
                    break;
                }
            },
        }

        if !shared.is_current(generation) {
            break;
        }
    }

    debug!(generation, "Dispatch loop exited");
}

/// Deliver messages the session queued before the transport went away
fn drain_session(shared: &Shared, generation: u64, session_events: &mut SessionEvents) {
    while let Ok(event) = session_events.try_recv() {
        if let SessionEvent::Message(msg, next) = event {
            shared.on_message(generation, &msg);
            next.complete();
        }
    }
}

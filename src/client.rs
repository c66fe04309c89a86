//! Live telemetry client: owns the connection lifecycle to the SSE endpoint,
//! keeps the latest snapshot, and recovers from transport failures with
//! bounded exponential backoff.
//!
//! Split in two: [`TelemetryClient`] is a synchronous state machine that maps
//! operations and transport events to [`Action`]s, and [`ClientDriver`] is the
//! async owner that executes those actions (spawning the transport task and
//! the reconnect timer) on tokio.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::sse;
use crate::types::Snapshot;

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const BASE_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Event from a transport handle or reconnect timer, tagged with the epoch of
/// whatever produced it. Events carrying a stale epoch are dropped, so a
/// superseded handle can never mutate state after a newer one was opened.
#[derive(Debug)]
pub struct Envelope {
    pub epoch: u64,
    pub event: ClientEvent,
}

#[derive(Debug)]
pub enum ClientEvent {
    Open,
    Message(String),
    /// Data-format problem detected below the parse layer (e.g. an oversized
    /// frame the decoder refused to buffer). Reported like a parse failure:
    /// never a connection failure.
    Malformed(String),
    Error(String),
    ReconnectDue,
}

/// Connection phase, exposed to the UI for status rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Connecting,
    Connected,
    ReconnectScheduled,
    Failed,
}

/// What the driver must do after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Close any prior handle, then open a transport to `url`. Events from
    /// the new handle must carry `epoch`.
    OpenTransport { url: String, epoch: u64 },
    /// Cancel any pending timer, then arrange a `ReconnectDue` carrying
    /// `epoch` after `delay`.
    ScheduleReconnect { delay: Duration, epoch: u64 },
}

pub struct TelemetryClient {
    endpoint: Option<String>,
    snapshot: Option<Snapshot>,
    phase: Phase,
    loading: bool,
    last_error: Option<String>,
    reconnect_attempts: u32,
    // in-flight guard: true from connect() until the attempt's open/error
    connecting: bool,
    // bumped on every connect() and on shutdown; invalidates stale events
    epoch: u64,
    // count of snapshots stored, so the UI can detect fresh data
    updates: u64,
    closed: bool,
}

impl TelemetryClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            snapshot: None,
            phase: Phase::Idle,
            loading: true,
            last_error: None,
            reconnect_attempts: 0,
            connecting: false,
            epoch: 0,
            updates: 0,
            closed: false,
        }
    }

    /// Open a connection attempt. A no-op while an attempt is already in
    /// flight, so concurrent calls cannot produce duplicate handles.
    pub fn connect(&mut self) -> Action {
        if self.closed || self.connecting {
            return Action::None;
        }
        let Some(url) = self.endpoint.clone() else {
            // No endpoint configured: intentional no-connection state,
            // not an error.
            self.phase = Phase::Idle;
            self.loading = false;
            return Action::None;
        };
        self.epoch += 1;
        self.connecting = true;
        self.phase = Phase::Connecting;
        self.loading = true;
        self.last_error = None;
        debug!(epoch = self.epoch, %url, "opening transport");
        Action::OpenTransport {
            url,
            epoch: self.epoch,
        }
    }

    /// Manual recovery: start over with a fresh attempt budget.
    pub fn reconnect(&mut self) -> Action {
        if self.closed {
            return Action::None;
        }
        self.reconnect_attempts = 0;
        self.connect()
    }

    /// The stream has no mid-connection refresh primitive, so refreshing a
    /// live connection means reconnecting.
    pub fn refresh(&mut self) -> Action {
        if self.is_connected() {
            self.reconnect()
        } else {
            self.connect()
        }
    }

    pub fn handle(&mut self, env: Envelope) -> Action {
        if self.closed || env.epoch != self.epoch {
            return Action::None;
        }
        match env.event {
            ClientEvent::Open => {
                self.connecting = false;
                self.phase = Phase::Connected;
                self.loading = false;
                self.last_error = None;
                self.reconnect_attempts = 0;
                debug!("connected");
                Action::None
            }
            ClientEvent::Message(text) => {
                match serde_json::from_str::<Snapshot>(&text) {
                    Ok(snapshot) => {
                        self.snapshot = Some(snapshot);
                        self.updates += 1;
                        self.last_error = None;
                    }
                    Err(e) => {
                        // A bad payload is reported but is not a connection
                        // failure; the stream self-corrects on the next
                        // message.
                        let err = TelemetryError::Parse(e);
                        warn!(%err, "dropping message");
                        self.last_error = Some(err.to_string());
                    }
                }
                Action::None
            }
            ClientEvent::Malformed(reason) => {
                warn!(%reason, "bad frame");
                self.last_error = Some(reason);
                Action::None
            }
            ClientEvent::Error(reason) => self.on_transport_error(reason),
            ClientEvent::ReconnectDue => {
                // Only a pending schedule may fire; anything else is a stray.
                if self.phase == Phase::ReconnectScheduled {
                    self.connect()
                } else {
                    Action::None
                }
            }
        }
    }

    fn on_transport_error(&mut self, reason: String) -> Action {
        self.connecting = false;
        self.loading = false;
        let err = TelemetryError::Transport(reason);
        if self.reconnect_attempts < MAX_RECONNECT_ATTEMPTS {
            let delay = BASE_RECONNECT_DELAY * 2u32.pow(self.reconnect_attempts);
            self.reconnect_attempts += 1;
            self.last_error = Some(format!(
                "{err}; retrying in {}s (attempt {}/{})",
                delay.as_secs(),
                self.reconnect_attempts,
                MAX_RECONNECT_ATTEMPTS
            ));
            self.phase = Phase::ReconnectScheduled;
            warn!(
                attempt = self.reconnect_attempts,
                delay_ms = delay.as_millis() as u64,
                "transport error, reconnect scheduled"
            );
            Action::ScheduleReconnect {
                delay,
                epoch: self.epoch,
            }
        } else {
            self.last_error = Some(format!(
                "{err}; giving up after {MAX_RECONNECT_ATTEMPTS} attempts, \
                 manual reconnect required"
            ));
            self.phase = Phase::Failed;
            warn!("reconnect attempts exhausted");
            Action::None
        }
    }

    /// Idempotent teardown; no state mutates after the first call.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.epoch += 1;
    }

    pub fn data(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.phase == Phase::Connected
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Monotonic count of snapshots stored so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

/// Async owner of the single transport task and the single reconnect timer.
/// At most one of each is alive; both are aborted before being replaced and
/// on shutdown.
pub struct ClientDriver {
    client: TelemetryClient,
    tx: mpsc::UnboundedSender<Envelope>,
    rx: mpsc::UnboundedReceiver<Envelope>,
    transport: Option<JoinHandle<()>>,
    timer: Option<JoinHandle<()>>,
}

impl ClientDriver {
    pub fn new(endpoint: Option<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client: TelemetryClient::new(endpoint),
            tx,
            rx,
            transport: None,
            timer: None,
        }
    }

    pub fn connect(&mut self) {
        let action = self.client.connect();
        self.apply(action);
    }

    pub fn reconnect(&mut self) {
        let action = self.client.reconnect();
        self.apply(action);
    }

    pub fn refresh(&mut self) {
        let action = self.client.refresh();
        self.apply(action);
    }

    /// Drain pending transport/timer events through the state machine.
    pub fn pump(&mut self) {
        while let Ok(env) = self.rx.try_recv() {
            let action = self.client.handle(env);
            self.apply(action);
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::OpenTransport { url, epoch } => {
                if let Some(t) = self.timer.take() {
                    t.abort();
                }
                // Close the previous handle before opening the new one.
                if let Some(t) = self.transport.take() {
                    t.abort();
                }
                self.transport = Some(sse::spawn(url, epoch, self.tx.clone()));
            }
            Action::ScheduleReconnect { delay, epoch } => {
                if let Some(t) = self.timer.take() {
                    t.abort();
                }
                let tx = self.tx.clone();
                self.timer = Some(tokio::spawn(async move {
                    sleep(delay).await;
                    let _ = tx.send(Envelope {
                        epoch,
                        event: ClientEvent::ReconnectDue,
                    });
                }));
            }
        }
    }

    /// Idempotent: closes the transport and cancels the timer; nothing
    /// outlives the driver.
    pub fn shutdown(&mut self) {
        self.client.shutdown();
        if let Some(t) = self.timer.take() {
            t.abort();
        }
        if let Some(t) = self.transport.take() {
            t.abort();
        }
    }

    pub fn data(&self) -> Option<&Snapshot> {
        self.client.data()
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    pub fn is_loading(&self) -> bool {
        self.client.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.client.error()
    }

    pub fn phase(&self) -> Phase {
        self.client.phase()
    }

    pub fn updates(&self) -> u64 {
        self.client.updates()
    }
}

impl Drop for ClientDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

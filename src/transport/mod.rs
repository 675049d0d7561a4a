//! In-process stand-in for a multi-client socket.
//!
//! Outbound events that a server would answer are echoed back to this
//! transport's own listeners after an artificial delay. Nothing leaves the
//! process, so two transports never see each other's traffic.

mod config;

pub use config::TransportConfig;

use crate::types::{Message, SessionId, User};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Events a client sends towards the (simulated) server
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    CreateSession {
        session_id: SessionId,
        username: String,
    },
    JoinSession {
        session_id: SessionId,
        username: String,
    },
    LeaveSession,
    CodeChange {
        code: String,
        language: String,
    },
    ChatMessage(Message),
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::CreateSession { .. } => "create-session",
            OutboundEvent::JoinSession { .. } => "join-session",
            OutboundEvent::LeaveSession => "leave-session",
            OutboundEvent::CodeChange { .. } => "code-change",
            OutboundEvent::ChatMessage(_) => "chat-message",
        }
    }
}

/// Events delivered to listeners
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InboundEvent {
    Connect,
    Disconnect,
    SessionJoined {
        session_id: SessionId,
        users: Vec<User>,
    },
    CodeUpdated {
        code: String,
        language: String,
    },
    MessageReceived(Message),
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::Connect => EventKind::Connect,
            InboundEvent::Disconnect => EventKind::Disconnect,
            InboundEvent::SessionJoined { .. } => EventKind::SessionJoined,
            InboundEvent::CodeUpdated { .. } => EventKind::CodeUpdated,
            InboundEvent::MessageReceived(_) => EventKind::MessageReceived,
        }
    }
}

/// Names listeners subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connect,
    Disconnect,
    SessionJoined,
    CodeUpdated,
    MessageReceived,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connect => "connect",
            EventKind::Disconnect => "disconnect",
            EventKind::SessionJoined => "session-joined",
            EventKind::CodeUpdated => "code-updated",
            EventKind::MessageReceived => "message-received",
        }
    }
}

pub type Listener = Arc<dyn Fn(&InboundEvent) + Send + Sync>;

/// Handle returned by `on`, used to remove that one listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ListenerMap = HashMap<EventKind, Vec<(ListenerId, Listener)>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct MockTransport {
    config: TransportConfig,
    connected: AtomicBool,
    next_id: AtomicU64,
    listeners: Arc<Mutex<ListenerMap>>,
    /// Scheduled deliveries that have not fired yet
    pending: Arc<Mutex<HashMap<u64, JoinHandle<()>>>>,
}

impl MockTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            connected: AtomicBool::new(false),
            next_id: AtomicU64::new(0),
            listeners: Arc::new(Mutex::new(HashMap::new())),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        tracing::debug!("Mock transport connected");
        self.trigger(&InboundEvent::Connect);
    }

    /// Disconnect and cancel every delivery that has not fired yet
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        let cancelled = self.cancel_pending();
        tracing::debug!(cancelled, "Mock transport disconnected");
        self.trigger(&InboundEvent::Disconnect);
    }

    /// Send an event. Events a server would answer are echoed back to the
    /// matching listeners after the configured delay; the rest go nowhere.
    pub fn emit(&self, event: OutboundEvent) {
        tracing::debug!(event = event.name(), "Transport emit");

        let (response, delay) = match event {
            OutboundEvent::JoinSession { session_id, .. } => (
                InboundEvent::SessionJoined {
                    session_id,
                    users: Vec::new(),
                },
                self.config.join_delay,
            ),
            OutboundEvent::CodeChange { code, language } => (
                InboundEvent::CodeUpdated { code, language },
                self.config.code_delay,
            ),
            OutboundEvent::ChatMessage(message) => (
                InboundEvent::MessageReceived(message),
                self.config.chat_delay,
            ),
            OutboundEvent::CreateSession { .. } | OutboundEvent::LeaveSession => return,
        };

        self.schedule(response, delay);
    }

    /// Register a listener for one kind of event
    pub fn on(
        &self,
        kind: EventKind,
        callback: impl Fn(&InboundEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners)
            .entry(kind)
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove one listener, or every listener of `kind` when `id` is None
    pub fn off(&self, kind: EventKind, id: Option<ListenerId>) {
        let mut listeners = lock(&self.listeners);
        let Some(registered) = listeners.get_mut(&kind) else {
            return;
        };
        match id {
            Some(id) => registered.retain(|(listener_id, _)| *listener_id != id),
            None => registered.clear(),
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        lock(&self.listeners).get(&kind).map_or(0, Vec::len)
    }

    /// Deliveries scheduled but not yet fired
    pub fn pending_deliveries(&self) -> usize {
        lock(&self.pending).len()
    }

    fn schedule(&self, event: InboundEvent, delay: Duration) {
        let key = self.next_id.fetch_add(1, Ordering::Relaxed);
        let listeners = self.listeners.clone();
        let pending = self.pending.clone();

        // Held across spawn so the task cannot deregister before it is registered
        let mut scheduled = lock(&self.pending);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lock(&pending).remove(&key);
            deliver(&listeners, &event);
        });
        scheduled.insert(key, handle);
    }

    fn trigger(&self, event: &InboundEvent) {
        deliver(&self.listeners, event);
    }

    fn cancel_pending(&self) -> usize {
        let handles: Vec<_> = lock(&self.pending).drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.abort();
        }
        handles.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

fn deliver(listeners: &Mutex<ListenerMap>, event: &InboundEvent) {
    // Callbacks run outside the lock so they may call on/off themselves
    let callbacks: Vec<Listener> = lock(listeners)
        .get(&event.kind())
        .map(|registered| registered.iter().map(|(_, cb)| cb.clone()).collect())
        .unwrap_or_default();

    tracing::debug!(
        event = event.kind().as_str(),
        listeners = callbacks.len(),
        "Transport deliver"
    );

    for callback in callbacks {
        callback(event);
    }
}

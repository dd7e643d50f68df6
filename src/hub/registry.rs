//! Broadcast Hub: the explicit registry of live dashboard sessions.
//! Each session owns an outbound channel and its selected consumer group;
//! pushing to a session that already closed is a no-op.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::protocol::ServerMessage;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Short form for log lines.
    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

struct SessionHandle {
    tx: mpsc::UnboundedSender<ServerMessage>,
    group: Arc<Mutex<String>>,
}

pub struct BroadcastHub {
    sessions: DashMap<SessionId, SessionHandle>,
    default_group: String,
}

impl BroadcastHub {
    pub fn new(default_group: String) -> Self {
        Self {
            sessions: DashMap::new(),
            default_group,
        }
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    /// Registers a new session and returns a guard that deregisters it on
    /// drop (RAII), so removal is tied to the connection's lifetime.
    pub fn register(
        self: &Arc<Self>,
        tx: mpsc::UnboundedSender<ServerMessage>,
    ) -> SessionGuard {
        let id = SessionId::generate();
        let group = Arc::new(Mutex::new(self.default_group.clone()));

        self.sessions.insert(
            id.clone(),
            SessionHandle {
                tx,
                group: group.clone(),
            },
        );

        SessionGuard {
            id,
            group,
            hub: self.clone(),
        }
    }

    /// Pushes one message to every currently-open session. A session whose
    /// receiver is gone is skipped, never a fault.
    pub fn broadcast(&self, message: &ServerMessage) {
        for session in self.sessions.iter() {
            let _ = session.tx.send(message.clone());
        }
    }

    /// Per-session fan-out: builds each session's message from its selected
    /// group. Used by the direct-mode ticker to stamp the shared per-tick
    /// core with each session's group label.
    pub fn broadcast_with(&self, build: impl Fn(&str) -> ServerMessage) {
        for session in self.sessions.iter() {
            let group = session.group.lock().clone();
            let _ = session.tx.send(build(&group));
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Keeps one session registered for as long as the connection task holds it.
pub struct SessionGuard {
    id: SessionId,
    group: Arc<Mutex<String>>,
    hub: Arc<BroadcastHub>,
}

impl SessionGuard {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn selected_group(&self) -> String {
        self.group.lock().clone()
    }

    /// Adopted immediately: the next tick's snapshot for this session
    /// reflects the new group.
    pub fn set_group(&self, group: String) {
        *self.group.lock() = group;
    }

    /// Shared handle for tasks (e.g. the polling tick) that outlive a
    /// borrow of the guard.
    pub fn group_handle(&self) -> Arc<Mutex<String>> {
        self.group.clone()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.hub.sessions.remove(&self.id);
    }
}

// ================
// common/src/lib.rs
// ================
//! Shared types exchanged between the website backend and the services
//! around it: the user Directory API and realtime presence clients.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to every realtime connection
pub type ConnectionId = Uuid;

/// A single user record as returned by the Directory API.
///
/// The backend only ever checks whether records exist, so the payload is
/// kept as raw JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct UserRecord(pub serde_json::Value);

/// Response body of a filtered `users` lookup
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordsPage {
    /// Matching records, possibly empty
    pub records: Vec<UserRecord>,
}

impl RecordsPage {
    /// The records, or `None` when the lookup matched nothing
    pub fn into_matches(self) -> Option<Vec<UserRecord>> {
        if self.records.is_empty() {
            None
        } else {
            Some(self.records)
        }
    }
}

/// Connection lifecycle events on the presence channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    /// A client completed the websocket handshake
    Connected(ConnectionId),
    /// The client went away (close frame, error or dropped stream)
    Disconnected(ConnectionId),
}

impl PresenceEvent {
    pub fn connection_id(&self) -> ConnectionId {
        match self {
            PresenceEvent::Connected(id) | PresenceEvent::Disconnected(id) => *id,
        }
    }
}

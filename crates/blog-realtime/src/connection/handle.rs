//! A single open push connection.

use tokio::sync::mpsc;

use crate::event::PushEvent;
use crate::stream_id::StreamId;

/// Why a frame could not be handed to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// The subscriber stopped reading.
    Closed,
    /// The outbound buffer is full.
    Full,
}

/// Sending half of a push connection.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Connection id.
    pub id: StreamId,
    /// Sender for outbound frames.
    sender: mpsc::Sender<PushEvent>,
}

impl ConnectionHandle {
    /// Create a handle around `sender`.
    pub fn new(id: StreamId, sender: mpsc::Sender<PushEvent>) -> Self {
        Self { id, sender }
    }

    /// Hand a frame to the connection without waiting.
    pub fn try_push(&self, event: PushEvent) -> Result<(), PushError> {
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PushError::Full,
            mpsc::error::TrySendError::Closed(_) => PushError::Closed,
        })
    }
}

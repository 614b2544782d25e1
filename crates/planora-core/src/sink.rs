//! Where completed focus sessions go.
//!
//! The timer hands each [`StudySession`] to a [`SessionSink`] and moves on.
//! A failed hand-off is logged by the timer and otherwise ignored, so a
//! session can be lost; the in-memory counter does not depend on it.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::StoreError;
use crate::storage::KeyValueStore;
use crate::study::{StudySession, SESSIONS};

pub trait SessionSink: Send {
    fn record(&mut self, session: StudySession) -> Result<(), StoreError>;
}

/// Accepts and forgets every session.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl SessionSink for DiscardSink {
    fn record(&mut self, _session: StudySession) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Appends to the `studySessions` collection on the caller's thread.
#[derive(Debug, Clone)]
pub struct CollectionSink<S> {
    store: S,
}

impl<S: KeyValueStore> CollectionSink<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore + Send> SessionSink for CollectionSink<S> {
    fn record(&mut self, session: StudySession) -> Result<(), StoreError> {
        SESSIONS.append(&self.store, session)
    }
}

/// Queues sessions for a writer running on the blocking pool.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<StudySession>,
}

impl SessionSink for ChannelSink {
    fn record(&mut self, session: StudySession) -> Result<(), StoreError> {
        self.tx
            .send(session)
            .map_err(|_| StoreError::Unavailable("session writer has stopped".into()))
    }
}

/// Start a writer that owns `store` and appends every queued session.
///
/// The writer exits once every [`ChannelSink`] clone is dropped; the handle
/// resolves to the number of sessions written.
pub fn spawn_session_writer<S>(store: S) -> (ChannelSink, JoinHandle<usize>)
where
    S: KeyValueStore + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<StudySession>();
    let handle = tokio::task::spawn_blocking(move || {
        let mut written = 0;
        while let Some(session) = rx.blocking_recv() {
            let id = session.id.clone();
            match SESSIONS.append(&store, session) {
                Ok(()) => {
                    written += 1;
                    tracing::debug!(session_id = %id, "study session stored");
                }
                Err(e) => {
                    tracing::warn!(session_id = %id, error = %e, "study session lost");
                }
            }
        }
        written
    });
    (ChannelSink { tx }, handle)
}

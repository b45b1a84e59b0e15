//! In-process revalidation bus backed by a `tokio::sync::broadcast` channel.
//!
//! Shared via `Arc<RevalidationBus>` in application state. Publishing never
//! blocks and never fails; a signal with no subscribers is dropped.

use chrono::{DateTime, Utc};
use pagebuilder_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// RevalidationSignal
// ---------------------------------------------------------------------------

/// Request to drop any cached rendering of `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevalidationSignal {
    /// Path to revalidate, e.g. `"/admin/pages"` or a page route.
    pub path: String,

    /// Layout whose change caused the signal, when known.
    pub layout_id: Option<DbId>,

    pub timestamp: DateTime<Utc>,
}

impl RevalidationSignal {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            layout_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn for_layout(mut self, layout_id: DbId) -> Self {
        self.layout_id = Some(layout_id);
        self
    }
}

// ---------------------------------------------------------------------------
// RevalidationBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus of revalidation signals.
pub struct RevalidationBus {
    sender: broadcast::Sender<RevalidationSignal>,
}

impl RevalidationBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest signals are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, signal: RevalidationSignal) {
        // A SendError only means there are no receivers.
        let _ = self.sender.send(signal);
    }

    /// Fire-and-forget revalidation of `path` after a change to a layout.
    pub fn revalidate(&self, layout_id: DbId, path: &str) {
        tracing::debug!(layout_id, path, "Revalidating path");
        self.publish(RevalidationSignal::new(path).for_layout(layout_id));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RevalidationSignal> {
        self.sender.subscribe()
    }
}

impl Default for RevalidationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

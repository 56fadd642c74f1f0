//! Progress events emitted by the streaming planning variant.

use serde::{Deserialize, Serialize};

use tripflow_core::Itinerary;

/// One event per completed pipeline node, ending in exactly one terminal
/// `Complete` or `Error` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A pipeline node began executing.
    NodeStarted {
        node: String,
        node_index: usize,
        total_nodes: usize,
    },

    /// A pipeline node finished executing.
    NodeCompleted {
        node: String,
        output: Option<String>,
        duration_ms: u64,
    },

    /// The pipeline produced a valid itinerary.
    Complete { itinerary: Itinerary },

    /// The pipeline terminated without an itinerary.
    Error { message: String },
}

impl ProgressEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Complete { .. } | ProgressEvent::Error { .. })
    }
}

//! Execution events and the notifier side-channel.
//!
//! [`ExecutionEvent`] is both the engine's internal event type and its wire
//! form — `#[serde(tag = "type")]` gives the `"process_info"`/
//! `"output_info"` tags on the wire. The bounded channel `run` returns is
//! the primary way a caller consumes events; [`ExecutionNotifier`] is a
//! secondary, best-effort side-channel for observability (logging,
//! metrics) that doesn't participate in backpressure.

use chrono::{DateTime, Utc};
use flowcore_types::{NodeId, ValueBag};
use serde::{Deserialize, Serialize};

/// One event in a pipeline run's stream.
///
/// A node emits `OutputInfo` (if it has a surfaced output) strictly before
/// its `ProcessInfo`, and exactly one `ProcessInfo` per node overall — a
/// run with `n` nodes produces exactly `n` `ProcessInfo` events on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionEvent {
  /// A node finished invoking its component. `data` is the full output
  /// bag the invoker returned.
  ProcessInfo {
    node_id: NodeId,
    timestamp: DateTime<Utc>,
    data: ValueBag,
  },

  /// A node's designated output surfaced as a named pipeline-level result.
  OutputInfo {
    node_id: NodeId,
    timestamp: DateTime<Utc>,
    output_surface_name: String,
    data: ValueBag,
  },

  /// A node failed and the run is being unwound.
  NodeFailed {
    node_id: NodeId,
    timestamp: DateTime<Utc>,
    error: String,
  },
}

impl ExecutionEvent {
  pub fn node_id(&self) -> &NodeId {
    match self {
      ExecutionEvent::ProcessInfo { node_id, .. }
      | ExecutionEvent::OutputInfo { node_id, .. }
      | ExecutionEvent::NodeFailed { node_id, .. } => node_id,
    }
  }
}

/// A best-effort observer of the events an execution run produces.
///
/// Unlike the channel `run` returns, a notifier is never backpressured —
/// it exists for logging/metrics side effects, not for driving the run to
/// completion, so implementations must not block.
pub trait ExecutionNotifier: Send + Sync + 'static {
  fn notify(&self, event: &ExecutionEvent);
}

/// Discards every event. The default when no observability side-channel is
/// needed.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: &ExecutionEvent) {}
}

/// Forwards every event to an unbounded channel.
///
/// Unbounded deliberately: a slow or absent consumer on this side-channel
/// must never slow down (or deadlock with) the bounded channel that
/// actually drives the run.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: tokio::sync::mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: tokio::sync::mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: &ExecutionEvent) {
    let _ = self.sender.send(event.clone());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wire_tags_use_snake_case_literals() {
    let event = ExecutionEvent::ProcessInfo {
      node_id: NodeId::from("a"),
      timestamp: Utc::now(),
      data: ValueBag::new(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "process_info");

    let event = ExecutionEvent::OutputInfo {
      node_id: NodeId::from("a"),
      timestamp: Utc::now(),
      output_surface_name: "result".to_string(),
      data: ValueBag::new(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "output_info");
  }
}

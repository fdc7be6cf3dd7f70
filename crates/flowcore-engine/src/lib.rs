//! Concurrent execution engine for the pipeline model.
//!
//! [`run`] seeds a [`flowcore_model::PipelineModel`] with externally
//! injected inputs, spawns a task per ready node, and streams
//! [`ExecutionEvent`]s back to the caller as nodes complete. Each node's
//! task propagates its outputs to downstream nodes and spawns whichever of
//! them just became ready, recursively, forming a tree of `tokio::spawn`ed
//! tasks rather than a flat worker pool.
//!
//! ```ignore
//! use flowcore_engine::run_default;
//! use tokio_util::sync::CancellationToken;
//!
//! let (mut events, handle) = run_default(model, registry, injected, CancellationToken::new());
//! while let Some(event) = events.next().await {
//!     // observe ProcessInfo/OutputInfo/NodeFailed as they arrive
//! }
//! let outcome = handle.await.unwrap()?;
//! ```

mod engine;
mod error;
mod events;
mod run_state;

pub use engine::{RunOutcome, run, run_default};
pub use error::ExecutionError;
pub use events::{ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier};

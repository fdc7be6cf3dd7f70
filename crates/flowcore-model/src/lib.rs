//! Pipeline model: nodes, forwarding edges, injection bindings.
//!
//! A [`PipelineModel`] is a validated DAG of [`PipelineNode`]s wired to each
//! other by [`NodeConnection`]s and, optionally, to externally supplied
//! values through injection bindings. Construction is the only way to
//! obtain one, and construction enforces every structural invariant
//! against a [`flowcore_registry::ComponentRegistry`] — there is no way to
//! hold an unvalidated model.

mod error;
mod graph;
mod json;
mod model;
mod node;
mod validate;

pub use error::ModelError;
pub use json::PipelineJson;
pub use model::PipelineModel;
pub use node::{NodeConnection, PipelineNode};

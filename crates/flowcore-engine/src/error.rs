use flowcore_registry::ComponentError;
use flowcore_types::{IOType, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
  /// A required input covered only by an injection binding whose external
  /// parameter is absent from the caller's injected-input map.
  #[error("node '{node_id}' requires injected input '{input_name}', but it was not provided")]
  MissingInjectedInput { node_id: NodeId, input_name: String },

  /// A node's invoker returned an error.
  #[error("node '{node_id}' failed: {source}")]
  Invoker {
    node_id: NodeId,
    #[source]
    source: ComponentError,
  },

  /// A value produced at runtime doesn't match the declared type of the
  /// input it was forwarded to (a contract violation the model's
  /// construction-time check cannot catch, since it can only see declared
  /// types, not the value actually returned at runtime).
  #[error(
    "node '{to_node}' input '{to_input}' expected one of its allowed types, got {produced}"
  )]
  TypeMismatch {
    to_node: NodeId,
    to_input: String,
    produced: IOType,
  },

  #[error("execution cancelled")]
  Cancelled,

  #[error("node task panicked or was cancelled by the runtime")]
  Join(#[from] tokio::task::JoinError),
}

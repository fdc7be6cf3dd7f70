use flowcore_types::{IOType, NodeId};
use thiserror::Error;

/// Violations of the pipeline model's structural invariants.
#[derive(Debug, Error)]
pub enum ModelError {
  /// A node names a component the registry doesn't have.
  #[error("node '{node_id}' references unknown component '{component_name}'")]
  UnknownComponent { node_id: NodeId, component_name: String },

  /// An edge's source output isn't declared by the source component.
  #[error("node '{node_id}' forwards an unknown output '{output_name}'")]
  UnknownOutput { node_id: NodeId, output_name: String },

  /// An edge's target input isn't declared by the target component.
  #[error("node '{node_id}' has no input named '{input_name}'")]
  UnknownInput { node_id: NodeId, input_name: String },

  /// An edge's produced type isn't one the target input accepts.
  #[error(
    "edge {from_node}.{from_output} -> {to_node}.{to_input} produces {produced}, \
     which is not an allowed type for {to_input}"
  )]
  TypeMismatch {
    from_node: NodeId,
    from_output: String,
    to_node: NodeId,
    to_input: String,
    produced: IOType,
  },

  /// A single input is targeted by more than one edge or injection binding.
  #[error("input '{input_name}' on node '{node_id}' is assigned more than once")]
  DuplicateInputBinding { node_id: NodeId, input_name: String },

  /// The forwarding graph contains a cycle.
  #[error("pipeline contains a cycle through: {}", nodes.iter().map(NodeId::as_str).collect::<Vec<_>>().join(" -> "))]
  Cycle { nodes: Vec<NodeId> },

  /// A required input has neither an incoming edge nor an injection
  /// binding.
  #[error("required input '{input_name}' on node '{node_id}' is never assigned")]
  MissingRequiredInput { node_id: NodeId, input_name: String },

  /// An edge or injection binding names a node id that doesn't exist.
  #[error("reference to unknown node '{node_id}'")]
  UnknownNodeReference { node_id: NodeId },

  #[error("malformed pipeline JSON")]
  Json(#[from] serde_json::Error),
}

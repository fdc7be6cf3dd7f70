use flowcore_types::NodeId;
use serde::{Deserialize, Serialize};

/// An edge out of a node: which of its own outputs feeds which input on
/// which downstream node.
///
/// The source node id is implicit — a `NodeConnection` always lives inside
/// the `forwards` list of the node it originates from. The JSON wire form
/// (see `json.rs`) spells the source id out explicitly since connections
/// are flattened into one top-level array there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConnection {
  pub from_output_name: String,
  pub to_node_id: NodeId,
  pub to_node_input_name: String,
}

/// A node in a pipeline: which component it runs, where its outputs go,
/// and whether one of its outputs is surfaced as a pipeline-level result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineNode {
  pub id: NodeId,
  pub component_name: String,
  pub forwards: Vec<NodeConnection>,
  pub output_surface_name: Option<String>,
  /// Opaque editor/UI metadata (e.g. canvas coordinates). Never
  /// interpreted by the model or engine, carried through round trips
  /// unchanged.
  pub position: Option<serde_json::Value>,
}

impl PipelineNode {
  pub fn new(id: impl Into<NodeId>, component_name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      component_name: component_name.into(),
      forwards: Vec::new(),
      output_surface_name: None,
      position: None,
    }
  }

  pub fn forward(mut self, connection: NodeConnection) -> Self {
    self.forwards.push(connection);
    self
  }

  pub fn surfaced_as(mut self, name: impl Into<String>) -> Self {
    self.output_surface_name = Some(name.into());
    self
  }
}

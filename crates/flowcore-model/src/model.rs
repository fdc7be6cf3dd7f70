use std::collections::HashMap;

use flowcore_registry::ComponentRegistry;
use flowcore_types::NodeId;

use crate::error::ModelError;
use crate::node::PipelineNode;
use crate::validate;

/// A validated pipeline: a set of nodes wired together by forwarding edges
/// and, optionally, bound to externally injected inputs.
///
/// Construction is the only way to get one, and construction always
/// validates every structural invariant against the registry the nodes
/// were built for — there is no way to hold a `PipelineModel` that doesn't
/// already satisfy every invariant. Begin nodes are computed once here, at
/// construction, rather than recomputed on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineModel {
  nodes: HashMap<NodeId, PipelineNode>,
  node_order: Vec<NodeId>,
  injection_bindings: HashMap<String, (NodeId, String)>,
  begin_nodes: Vec<NodeId>,
}

impl PipelineModel {
  /// Build and validate a pipeline model.
  ///
  /// `nodes` is taken as a `Vec` rather than a map so that insertion order
  /// — preserved in `node_order` and used by `to_json` — reflects the
  /// order the caller built the pipeline in, not an arbitrary hash order.
  pub fn new(
    nodes: Vec<PipelineNode>,
    injection_bindings: HashMap<String, (NodeId, String)>,
    registry: &ComponentRegistry,
  ) -> Result<Self, ModelError> {
    let node_order: Vec<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();
    let node_map: HashMap<NodeId, PipelineNode> = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();

    let validated = validate::validate_nodes(&node_map, registry)?;
    let begin_nodes = validate::validate_injections(
      &node_map,
      registry,
      &injection_bindings,
      &validated.targeted_by_edge,
    )?;

    Ok(Self {
      nodes: node_map,
      node_order,
      injection_bindings,
      begin_nodes,
    })
  }

  pub fn node(&self, id: &NodeId) -> Option<&PipelineNode> {
    self.nodes.get(id)
  }

  pub fn nodes(&self) -> &HashMap<NodeId, PipelineNode> {
    &self.nodes
  }

  /// Nodes in the order they were originally supplied to `new`/`from_json`.
  pub fn node_order(&self) -> &[NodeId] {
    &self.node_order
  }

  pub fn injection_bindings(&self) -> &HashMap<String, (NodeId, String)> {
    &self.injection_bindings
  }

  /// Nodes with no unmet dependency on another node's output — ready to
  /// run as soon as their injected inputs (if any) are supplied.
  pub fn begin_nodes(&self) -> &[NodeId] {
    &self.begin_nodes
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Serialize to the pipeline JSON wire format.
  pub fn to_json_string(&self) -> Result<String, ModelError> {
    Ok(serde_json::to_string(&crate::json::to_json(self))?)
  }

  /// Parse and validate a pipeline from the wire format, against `registry`.
  pub fn from_json_str(json: &str, registry: &ComponentRegistry) -> Result<Self, ModelError> {
    let wire: crate::json::PipelineJson = serde_json::from_str(json)?;
    crate::json::from_json(&wire, registry)
  }
}

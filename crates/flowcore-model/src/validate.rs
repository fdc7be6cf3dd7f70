use std::collections::{HashMap, HashSet};

use flowcore_registry::ComponentRegistry;
use flowcore_types::NodeId;

use crate::error::ModelError;
use crate::graph::Graph;
use crate::node::PipelineNode;

/// The result of validating a node map against a registry: every structural
/// check on components, edges, and acyclicity (required-input coverage and
/// node-reference checks for injection bindings are handled separately in
/// `validate_injections`) plus enough bookkeeping to let the caller compute
/// begin nodes without walking the graph again.
pub struct Validated {
  /// (node_id, input_name) pairs covered by an edge from another node.
  pub targeted_by_edge: HashSet<(NodeId, String)>,
}

pub fn validate_nodes(
  nodes: &HashMap<NodeId, PipelineNode>,
  registry: &ComponentRegistry,
) -> Result<Validated, ModelError> {
  let mut targeted_by_edge = HashSet::new();

  for (node_id, node) in nodes {
    // every node's component must exist in the registry
    let descriptor = registry.lookup(&node.component_name).ok_or_else(|| ModelError::UnknownComponent {
      node_id: node_id.clone(),
      component_name: node.component_name.clone(),
    })?;

    for edge in &node.forwards {
      // source output must be declared
      let output_spec = descriptor.output(&edge.from_output_name).ok_or_else(|| ModelError::UnknownOutput {
        node_id: node_id.clone(),
        output_name: edge.from_output_name.clone(),
      })?;

      // target node must exist
      let target_node = nodes.get(&edge.to_node_id).ok_or_else(|| ModelError::UnknownNodeReference {
        node_id: edge.to_node_id.clone(),
      })?;
      let target_descriptor = registry.lookup(&target_node.component_name).ok_or_else(|| {
        ModelError::UnknownComponent {
          node_id: edge.to_node_id.clone(),
          component_name: target_node.component_name.clone(),
        }
      })?;

      // target input must be declared and accept the produced type
      let input_spec = target_descriptor.input(&edge.to_node_input_name).ok_or_else(|| ModelError::UnknownInput {
        node_id: edge.to_node_id.clone(),
        input_name: edge.to_node_input_name.clone(),
      })?;
      if !input_spec.allowed_types.contains(&output_spec.io_type) {
        return Err(ModelError::TypeMismatch {
          from_node: node_id.clone(),
          from_output: edge.from_output_name.clone(),
          to_node: edge.to_node_id.clone(),
          to_input: edge.to_node_input_name.clone(),
          produced: output_spec.io_type,
        });
      }

      // a single input assigned by at most one edge
      let key = (edge.to_node_id.clone(), edge.to_node_input_name.clone());
      if !targeted_by_edge.insert(key) {
        return Err(ModelError::DuplicateInputBinding {
          node_id: edge.to_node_id.clone(),
          input_name: edge.to_node_input_name.clone(),
        });
      }
    }
  }

  Graph::build(nodes).reject_cycles()?;

  Ok(Validated { targeted_by_edge })
}

/// Validates injection bindings (no double-assignment, no reference to a
/// missing node) and computes which nodes have every required input
/// covered — the begin nodes.
pub fn validate_injections(
  nodes: &HashMap<NodeId, PipelineNode>,
  registry: &ComponentRegistry,
  injection_bindings: &HashMap<String, (NodeId, String)>,
  targeted_by_edge: &HashSet<(NodeId, String)>,
) -> Result<Vec<NodeId>, ModelError> {
  let mut targeted_by_injection = HashSet::new();

  for (node_id, input_name) in injection_bindings.values() {
    if !nodes.contains_key(node_id) {
      return Err(ModelError::UnknownNodeReference { node_id: node_id.clone() });
    }
    let key = (node_id.clone(), input_name.clone());
    // an input must not be targeted by both an edge and an injection,
    // nor by two injections
    if targeted_by_edge.contains(&key) || !targeted_by_injection.insert(key) {
      return Err(ModelError::DuplicateInputBinding {
        node_id: node_id.clone(),
        input_name: input_name.clone(),
      });
    }
  }

  let mut begin_nodes = Vec::new();
  for (node_id, node) in nodes {
    let descriptor = registry
      .lookup(&node.component_name)
      .expect("validate_nodes already checked every component exists");

    let mut is_begin = true;
    for input in descriptor.required_input_names() {
      let key = (node_id.clone(), input.to_string());
      let covered_by_edge = targeted_by_edge.contains(&key);
      let covered_by_injection = targeted_by_injection.contains(&key);
      if !covered_by_edge && !covered_by_injection {
        return Err(ModelError::MissingRequiredInput {
          node_id: node_id.clone(),
          input_name: input.to_string(),
        });
      }
      if covered_by_edge {
        is_begin = false;
      }
    }
    if is_begin {
      begin_nodes.push(node_id.clone());
    }
  }

  Ok(begin_nodes)
}

use std::collections::HashMap;

use flowcore_registry::ComponentRegistry;
use flowcore_types::NodeId;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::PipelineModel;
use crate::node::{NodeConnection, PipelineNode};

#[derive(Debug, Serialize, Deserialize)]
struct NodeJson {
  node_id: String,
  component: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  output_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  position: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConnectionJson {
  from_node_id: String,
  from_output_name: String,
  to_node_id: String,
  to_node_input_name: String,
}

/// The bit-exact wire representation of a [`PipelineModel`]: a flat array
/// of nodes, a flat array of connections (grouped by source node, in the
/// order they were added), and the external-parameter-to-node-input
/// injection mapping.
#[derive(Debug, Serialize, Deserialize)]
pub struct PipelineJson {
  nodes: Vec<NodeJson>,
  connections: Vec<ConnectionJson>,
  #[serde(default)]
  inject_input_mapping: HashMap<String, (String, String)>,
}

pub fn to_json(model: &PipelineModel) -> PipelineJson {
  let mut nodes = Vec::with_capacity(model.node_order().len());
  let mut connections = Vec::new();

  for id in model.node_order() {
    let node = model.node(id).expect("node_order only lists real nodes");
    nodes.push(NodeJson {
      node_id: node.id.as_str().to_string(),
      component: node.component_name.clone(),
      output_name: node.output_surface_name.clone(),
      position: node.position.clone(),
    });
    for edge in &node.forwards {
      connections.push(ConnectionJson {
        from_node_id: node.id.as_str().to_string(),
        from_output_name: edge.from_output_name.clone(),
        to_node_id: edge.to_node_id.as_str().to_string(),
        to_node_input_name: edge.to_node_input_name.clone(),
      });
    }
  }

  let inject_input_mapping = model
    .injection_bindings()
    .iter()
    .map(|(param, (node_id, input_name))| {
      (param.clone(), (node_id.as_str().to_string(), input_name.clone()))
    })
    .collect();

  PipelineJson {
    nodes,
    connections,
    inject_input_mapping,
  }
}

pub fn from_json(json: &PipelineJson, registry: &ComponentRegistry) -> Result<PipelineModel, ModelError> {
  let mut nodes: Vec<PipelineNode> = json
    .nodes
    .iter()
    .map(|n| PipelineNode {
      id: NodeId::from(n.node_id.as_str()),
      component_name: n.component.clone(),
      forwards: Vec::new(),
      output_surface_name: n.output_name.clone(),
      position: n.position.clone(),
    })
    .collect();

  for connection in &json.connections {
    let source = nodes
      .iter_mut()
      .find(|n| n.id.as_str() == connection.from_node_id)
      .ok_or_else(|| ModelError::UnknownNodeReference {
        node_id: NodeId::from(connection.from_node_id.as_str()),
      })?;
    source.forwards.push(NodeConnection {
      from_output_name: connection.from_output_name.clone(),
      to_node_id: NodeId::from(connection.to_node_id.as_str()),
      to_node_input_name: connection.to_node_input_name.clone(),
    });
  }

  let injection_bindings = json
    .inject_input_mapping
    .iter()
    .map(|(param, (node_id, input_name))| {
      (param.clone(), (NodeId::from(node_id.as_str()), input_name.clone()))
    })
    .collect();

  PipelineModel::new(nodes, injection_bindings, registry)
}

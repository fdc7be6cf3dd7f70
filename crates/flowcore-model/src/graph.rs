use std::collections::{HashMap, VecDeque};

use flowcore_types::NodeId;

use crate::error::ModelError;
use crate::node::PipelineNode;

/// Lightweight adjacency view over a node map, built once at validation
/// time for cycle detection.
///
/// Each `PipelineNode` already carries its own outgoing edges in
/// `forwards`, so this only needs the reverse direction. No join-point
/// bookkeeping: this model has no join node type, only cycle detection.
pub struct Graph<'a> {
  nodes: &'a HashMap<NodeId, PipelineNode>,
  downstream: HashMap<&'a NodeId, Vec<&'a NodeId>>,
}

impl<'a> Graph<'a> {
  pub fn build(nodes: &'a HashMap<NodeId, PipelineNode>) -> Self {
    let mut downstream: HashMap<&'a NodeId, Vec<&'a NodeId>> = HashMap::new();
    for id in nodes.keys() {
      downstream.entry(id).or_default();
    }
    for (id, node) in nodes {
      for edge in &node.forwards {
        downstream.entry(id).or_default().push(&edge.to_node_id);
      }
    }
    Self { nodes, downstream }
  }

  /// Reject a pipeline whose forwarding edges form a cycle, via Kahn's
  /// algorithm: nodes are peeled off in dependency order, and anything left
  /// over once no more can be peeled is part of a cycle.
  pub fn reject_cycles(&self) -> Result<(), ModelError> {
    let mut in_degree: HashMap<&NodeId, usize> = self.nodes.keys().map(|id| (id, 0)).collect();
    for targets in self.downstream.values() {
      for target in targets {
        *in_degree.entry(target).or_insert(0) += 1;
      }
    }

    let mut queue: VecDeque<&NodeId> = in_degree
      .iter()
      .filter(|(_, degree)| **degree == 0)
      .map(|(id, _)| *id)
      .collect();
    let mut visited = 0usize;

    while let Some(id) = queue.pop_front() {
      visited += 1;
      for target in self.downstream.get(id).into_iter().flatten() {
        let degree = in_degree.get_mut(target).expect("target was seeded above");
        *degree -= 1;
        if *degree == 0 {
          queue.push_back(target);
        }
      }
    }

    if visited == self.nodes.len() {
      Ok(())
    } else {
      let remaining: Vec<NodeId> = in_degree
        .into_iter()
        .filter(|(_, degree)| *degree > 0)
        .map(|(id, _)| id.clone())
        .collect();
      Err(ModelError::Cycle { nodes: remaining })
    }
  }
}

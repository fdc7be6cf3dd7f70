use std::collections::HashSet;
use std::sync::Arc;

use flowcore_types::IOType;
use serde::{Deserialize, Serialize};

use crate::invoker::Invoker;

/// The declared contract of a single named input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
  pub name: String,
  pub allowed_types: HashSet<IOType>,
  pub required: bool,
}

impl InputSpec {
  pub fn required(name: impl Into<String>, allowed_types: impl IntoIterator<Item = IOType>) -> Self {
    Self {
      name: name.into(),
      allowed_types: allowed_types.into_iter().collect(),
      required: true,
    }
  }

  pub fn optional(name: impl Into<String>, allowed_types: impl IntoIterator<Item = IOType>) -> Self {
    Self {
      name: name.into(),
      allowed_types: allowed_types.into_iter().collect(),
      required: false,
    }
  }
}

/// The declared contract of a single named output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
  pub name: String,
  pub io_type: IOType,
}

impl OutputSpec {
  pub fn new(name: impl Into<String>, io_type: IOType) -> Self {
    Self {
      name: name.into(),
      io_type,
    }
  }
}

/// A registered component: its advertised input/output schema plus the
/// invoker that implements it.
///
/// `inputs`/`outputs` are the schema the rest of the workspace (the model
/// crate's edge and pipeline validation, the engine's edge type-checking)
/// trusts. They are supplied independently of the invoker's own
/// `Invoker::contract`, which is what registration-time `validate` checks
/// them against.
#[derive(Clone)]
pub struct ComponentDescriptor {
  pub name: String,
  pub description: String,
  pub is_official: bool,
  pub enable_type_check: bool,
  pub inputs: Vec<InputSpec>,
  pub outputs: Vec<OutputSpec>,
  pub invoker: Arc<dyn Invoker>,
}

impl ComponentDescriptor {
  pub fn input(&self, name: &str) -> Option<&InputSpec> {
    self.inputs.iter().find(|i| i.name == name)
  }

  pub fn output(&self, name: &str) -> Option<&OutputSpec> {
    self.outputs.iter().find(|o| o.name == name)
  }

  /// Input names that must be covered before the node can run.
  pub fn required_input_names(&self) -> impl Iterator<Item = &str> {
    self.inputs.iter().filter(|i| i.required).map(|i| i.name.as_str())
  }

  /// Input names the invoker still expects to see, defaulted to a null
  /// sentinel, even when no edge or injection binding covers them.
  pub fn optional_input_names(&self) -> impl Iterator<Item = &str> {
    self.inputs.iter().filter(|i| !i.required).map(|i| i.name.as_str())
  }
}

impl std::fmt::Debug for ComponentDescriptor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ComponentDescriptor")
      .field("name", &self.name)
      .field("is_official", &self.is_official)
      .field("enable_type_check", &self.enable_type_check)
      .field("inputs", &self.inputs)
      .field("outputs", &self.outputs)
      .finish_non_exhaustive()
  }
}

/// A read-only view of a descriptor's schema, safe to hand to callers that
/// should see what a component declares but never its invoker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDetail {
  pub name: String,
  pub description: String,
  pub is_official: bool,
  pub inputs: Vec<InputSpec>,
  pub outputs: Vec<OutputSpec>,
}

impl From<&ComponentDescriptor> for ComponentDetail {
  fn from(d: &ComponentDescriptor) -> Self {
    Self {
      name: d.name.clone(),
      description: d.description.clone(),
      is_official: d.is_official,
      inputs: d.inputs.clone(),
      outputs: d.outputs.clone(),
    }
  }
}

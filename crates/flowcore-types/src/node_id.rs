use std::fmt;

use serde::{Deserialize, Serialize};

/// The identifier of a node within a pipeline.
///
/// A thin wrapper over `String` rather than a bare alias so that node
/// identity can't be accidentally confused with a component name or an
/// input/output name at a call site — all three are plain strings on the
/// wire but mean different things.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for NodeId {
  fn from(s: String) -> Self {
    Self(s)
  }
}

impl From<&str> for NodeId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

impl std::borrow::Borrow<str> for NodeId {
  fn borrow(&self) -> &str {
    &self.0
  }
}

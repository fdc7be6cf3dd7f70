use async_trait::async_trait;
use flowcore_types::ValueBag;
use thiserror::Error;

use crate::descriptor::{InputSpec, OutputSpec};

/// An error raised by a component's own logic while it runs.
///
/// Distinct from [`crate::RegistryError`], which covers registration-time
/// failures; this is what an [`Invoker`] returns when the work it was asked
/// to do fails (a downstream HTTP call errors out, a model fails to load,
/// and so on). The engine crate wraps this with the failing node id.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ComponentError {
  pub message: String,
  #[source]
  pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ComponentError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      source: None,
    }
  }

  pub fn from_source(
    message: impl Into<String>,
    source: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self {
      message: message.into(),
      source: Some(Box::new(source)),
    }
  }
}

/// The self-declared input/output contract an [`Invoker`] believes it
/// implements.
///
/// Registration-time `validate` compares this against the
/// [`crate::ComponentDescriptor`]'s own `inputs`/`outputs` — two
/// independently authored declarations of the same shape, which is the
/// schema-first analogue of reflecting over a function's parameter and
/// return type hints.
pub struct InvokerContract {
  pub inputs: Vec<InputSpec>,
  pub outputs: Vec<OutputSpec>,
}

/// The executable half of a component: given a bag of resolved inputs,
/// produce a bag of outputs or fail.
///
/// Implementations are expected to be cheap to clone behind an `Arc` and
/// safe to call concurrently — the engine invokes ready nodes from
/// independently spawned tasks.
#[async_trait]
pub trait Invoker: Send + Sync {
  /// The contract this invoker believes it implements, if it declares one.
  ///
  /// Returning `None` means the invoker opts out of the
  /// `enable_type_check` comparison; registering such a component with
  /// `enable_type_check = true` fails validation.
  fn contract(&self) -> Option<InvokerContract> {
    None
  }

  async fn invoke(&self, inputs: &ValueBag) -> Result<ValueBag, ComponentError>;
}

//! A handful of trivial official components, registered at CLI startup.
//!
//! `flowcore-registry` deliberately ships no concrete components (only the
//! contract one must satisfy), so a runnable CLI needs at least a few to
//! demonstrate the engine end to end.

use async_trait::async_trait;
use flowcore_registry::{ComponentDescriptor, ComponentError, ComponentRegistry, InputSpec, Invoker, OutputSpec};
use flowcore_types::{IOType, Value, ValueBag};

struct Concat;

#[async_trait]
impl Invoker for Concat {
  async fn invoke(&self, inputs: &ValueBag) -> Result<ValueBag, ComponentError> {
    let left = match inputs.get("left") {
      Some(Value::String(s)) => s.as_str(),
      _ => "",
    };
    let right = match inputs.get("right") {
      Some(Value::String(s)) => s.as_str(),
      _ => "",
    };
    let mut out = ValueBag::new();
    out.insert("joined".to_string(), Value::String(format!("{left}{right}")));
    Ok(out)
  }
}

struct Uppercase;

#[async_trait]
impl Invoker for Uppercase {
  async fn invoke(&self, inputs: &ValueBag) -> Result<ValueBag, ComponentError> {
    let text = match inputs.get("text") {
      Some(Value::String(s)) => s.clone(),
      _ => {
        return Err(ComponentError::new("'text' input missing or not a string"));
      }
    };
    let mut out = ValueBag::new();
    out.insert("text".to_string(), Value::String(text.to_uppercase()));
    Ok(out)
  }
}

struct CountWords;

#[async_trait]
impl Invoker for CountWords {
  async fn invoke(&self, inputs: &ValueBag) -> Result<ValueBag, ComponentError> {
    let text = match inputs.get("text") {
      Some(Value::String(s)) => s.clone(),
      _ => String::new(),
    };
    let mut out = ValueBag::new();
    out.insert("count".to_string(), Value::Int(text.split_whitespace().count() as i64));
    Ok(out)
  }
}

/// Register the built-in official components a fresh CLI invocation has
/// available, with no external configuration.
pub fn register_official_components(registry: &ComponentRegistry) -> Result<(), flowcore_registry::RegistryError> {
  registry.register(ComponentDescriptor {
    name: "concat".to_string(),
    description: "Joins two strings.".to_string(),
    is_official: true,
    enable_type_check: false,
    inputs: vec![
      InputSpec::required("left", [IOType::String]),
      InputSpec::required("right", [IOType::String]),
    ],
    outputs: vec![OutputSpec::new("joined", IOType::String)],
    invoker: std::sync::Arc::new(Concat),
  })?;

  registry.register(ComponentDescriptor {
    name: "uppercase".to_string(),
    description: "Upper-cases a string.".to_string(),
    is_official: true,
    enable_type_check: false,
    inputs: vec![InputSpec::required("text", [IOType::String])],
    outputs: vec![OutputSpec::new("text", IOType::String)],
    invoker: std::sync::Arc::new(Uppercase),
  })?;

  registry.register(ComponentDescriptor {
    name: "count_words".to_string(),
    description: "Counts whitespace-separated words in a string.".to_string(),
    is_official: true,
    enable_type_check: false,
    inputs: vec![InputSpec::required("text", [IOType::String])],
    outputs: vec![OutputSpec::new("count", IOType::Int)],
    invoker: std::sync::Arc::new(CountWords),
  })?;

  Ok(())
}

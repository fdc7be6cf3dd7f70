use std::collections::HashSet;

use crate::descriptor::ComponentDescriptor;
use crate::error::RegistryError;

/// Registration-time validation of a descriptor's advertised schema.
///
/// Runs in a schema-first world where there is no function signature to
/// reflect over: the invoker declares its own belief about its contract
/// (`Invoker::contract`) and this checks it against the descriptor's
/// `inputs`/`outputs`.
///
///   - the set of declared input names must match exactly.
///   - for each required input, the allowed type sets must agree.
///   - for each optional input, the allowed type sets must agree.
///   - every output the invoker declares must be a name the descriptor
///     also declares (the descriptor may advertise outputs the invoker
///     only produces conditionally).
///
/// Always runs the basic structural checks (unique names, non-empty
/// allowed-type sets) regardless of `enable_type_check`; the cross-check
/// against the invoker's contract only runs when `enable_type_check` is
/// `true`.
pub fn validate(descriptor: &ComponentDescriptor) -> Result<(), RegistryError> {
  structural_checks(descriptor)?;

  if !descriptor.enable_type_check {
    return Ok(());
  }

  let contract = descriptor.invoker.contract().ok_or_else(|| invalid(
    descriptor,
    "enable_type_check is set but the invoker declares no contract to check against",
  ))?;

  // input name sets must match exactly
  let descriptor_input_names: HashSet<&str> =
    descriptor.inputs.iter().map(|i| i.name.as_str()).collect();
  let contract_input_names: HashSet<&str> =
    contract.inputs.iter().map(|i| i.name.as_str()).collect();
  if descriptor_input_names != contract_input_names {
    return Err(invalid(
      descriptor,
      "declared input names do not match the invoker's own contract",
    ));
  }

  // required and optional inputs checked separately so the error message
  // can say which kind disagreed; order between the two never matters.
  for input in descriptor.inputs.iter().filter(|i| i.required) {
    let declared = contract
      .inputs
      .iter()
      .find(|i| i.name == input.name)
      .expect("name-set equality already checked above");
    if declared.required != input.required || declared.allowed_types != input.allowed_types {
      return Err(invalid(
        descriptor,
        format!("required input '{}' type disagreement with invoker contract", input.name),
      ));
    }
  }
  for input in descriptor.inputs.iter().filter(|i| !i.required) {
    let declared = contract
      .inputs
      .iter()
      .find(|i| i.name == input.name)
      .expect("name-set equality already checked above");
    if declared.required != input.required || declared.allowed_types != input.allowed_types {
      return Err(invalid(
        descriptor,
        format!("optional input '{}' type disagreement with invoker contract", input.name),
      ));
    }
  }

  // every output the invoker declares must be one the descriptor names
  let descriptor_output_names: HashSet<&str> =
    descriptor.outputs.iter().map(|o| o.name.as_str()).collect();
  for output in &contract.outputs {
    if !descriptor_output_names.contains(output.name.as_str()) {
      return Err(invalid(
        descriptor,
        format!("invoker produces undeclared output '{}'", output.name),
      ));
    }
  }

  Ok(())
}

fn structural_checks(descriptor: &ComponentDescriptor) -> Result<(), RegistryError> {
  let mut seen = HashSet::new();
  for input in &descriptor.inputs {
    if !seen.insert(input.name.as_str()) {
      return Err(invalid(descriptor, format!("duplicate input name '{}'", input.name)));
    }
    if input.allowed_types.is_empty() {
      return Err(invalid(descriptor, format!("input '{}' declares no allowed types", input.name)));
    }
  }
  seen.clear();
  for output in &descriptor.outputs {
    if !seen.insert(output.name.as_str()) {
      return Err(invalid(descriptor, format!("duplicate output name '{}'", output.name)));
    }
  }
  Ok(())
}

fn invalid(descriptor: &ComponentDescriptor, reason: impl Into<String>) -> RegistryError {
  RegistryError::InvalidComponent {
    name: descriptor.name.clone(),
    reason: reason.into(),
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;
  use flowcore_types::{IOType, ValueBag};

  use super::*;
  use crate::descriptor::{InputSpec, OutputSpec};
  use crate::invoker::{ComponentError, Invoker, InvokerContract};

  struct Echo {
    declare_contract: bool,
  }

  #[async_trait]
  impl Invoker for Echo {
    fn contract(&self) -> Option<InvokerContract> {
      self.declare_contract.then(|| InvokerContract {
        inputs: vec![InputSpec::required("text", [IOType::String])],
        outputs: vec![OutputSpec::new("text", IOType::String)],
      })
    }

    async fn invoke(&self, inputs: &ValueBag) -> Result<ValueBag, ComponentError> {
      Ok(inputs.clone())
    }
  }

  fn descriptor(enable_type_check: bool, declare_contract: bool) -> ComponentDescriptor {
    ComponentDescriptor {
      name: "echo".to_string(),
      description: "returns its input unchanged".to_string(),
      is_official: true,
      enable_type_check,
      inputs: vec![InputSpec::required("text", [IOType::String])],
      outputs: vec![OutputSpec::new("text", IOType::String)],
      invoker: std::sync::Arc::new(Echo { declare_contract }),
    }
  }

  #[test]
  fn type_check_disabled_accepts_mismatched_contract() {
    assert!(validate(&descriptor(false, false)).is_ok());
  }

  #[test]
  fn type_check_enabled_requires_a_declared_contract() {
    let err = validate(&descriptor(true, false)).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidComponent { .. }));
  }

  #[test]
  fn type_check_enabled_passes_when_contracts_agree() {
    assert!(validate(&descriptor(true, true)).is_ok());
  }

  #[test]
  fn duplicate_input_names_always_rejected() {
    let mut d = descriptor(false, false);
    d.inputs.push(InputSpec::required("text", [IOType::String]));
    assert!(validate(&d).is_err());
  }
}

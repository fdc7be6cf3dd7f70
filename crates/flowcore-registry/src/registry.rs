use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::descriptor::{ComponentDescriptor, ComponentDetail};
use crate::error::RegistryError;
use crate::validate;

/// An in-process catalog of components available to a pipeline.
///
/// Discovery of official components (scanning a well-known location at
/// process startup) is left to the caller — this workspace doesn't ship
/// concrete component implementations, only the contract they must satisfy
/// — so construction is always by explicit `register`/`register_with`
/// calls, keeping "what a registry can hold" separate from "how
/// components get installed into it".
#[derive(Default)]
pub struct ComponentRegistry {
  components: RwLock<HashMap<String, Arc<ComponentDescriptor>>>,
}

impl ComponentRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a component, rejecting a duplicate name.
  pub fn register(&self, descriptor: ComponentDescriptor) -> Result<(), RegistryError> {
    self.register_with(descriptor, true)
  }

  /// Register a component, optionally allowing a later registration to
  /// silently replace an earlier one under the same name.
  ///
  /// Most callers want the strict `register` above, but tooling that
  /// re-registers a component under active development benefits from
  /// opting out of the duplicate check.
  pub fn register_with(
    &self,
    descriptor: ComponentDescriptor,
    check_duplication: bool,
  ) -> Result<(), RegistryError> {
    validate::validate(&descriptor)?;

    let mut components = self.components.write().expect("registry lock poisoned");
    if check_duplication && components.contains_key(&descriptor.name) {
      return Err(RegistryError::DuplicateComponent(descriptor.name));
    }
    components.insert(descriptor.name.clone(), Arc::new(descriptor));
    Ok(())
  }

  pub fn lookup(&self, name: &str) -> Option<Arc<ComponentDescriptor>> {
    self.components.read().expect("registry lock poisoned").get(name).cloned()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.components.read().expect("registry lock poisoned").contains_key(name)
  }

  /// Schema-only view of every registered component, safe to expose for
  /// introspection (e.g. a UI listing available components).
  pub fn list_details(&self) -> Vec<ComponentDetail> {
    self
      .components
      .read()
      .expect("registry lock poisoned")
      .values()
      .map(|d| ComponentDetail::from(d.as_ref()))
      .collect()
  }
}

//! Component registry and type system.
//!
//! A [`ComponentDescriptor`] is the contract a component publishes: a name,
//! a human description, whether it's an official (workspace-shipped) or
//! third-party component, a set of typed inputs and outputs, and an
//! [`Invoker`] that carries out the actual work. Registering a descriptor
//! with `enable_type_check` set runs [`validate`] against the invoker's own
//! declared contract before it is accepted into a [`ComponentRegistry`].

mod descriptor;
mod error;
mod invoker;
mod registry;
mod validate;

pub use descriptor::{ComponentDescriptor, ComponentDetail, InputSpec, OutputSpec};
pub use error::RegistryError;
pub use invoker::{ComponentError, Invoker, InvokerContract};
pub use registry::ComponentRegistry;
pub use validate::validate;

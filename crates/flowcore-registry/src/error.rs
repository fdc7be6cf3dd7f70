use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("component already registered: {0}")]
  DuplicateComponent(String),

  #[error("component {name} failed validation: {reason}")]
  InvalidComponent { name: String, reason: String },

  #[error("no component registered under name: {0}")]
  NotFound(String),
}

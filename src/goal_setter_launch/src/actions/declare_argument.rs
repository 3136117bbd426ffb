//! Declare argument action for argument metadata and defaults

use crate::substitution::{ArgumentMetadata, LaunchContext};

/// Declare argument action with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclareArgumentAction {
    pub name: String,
    pub default: Option<String>,
    pub description: Option<String>,
}

impl DeclareArgumentAction {
    pub fn new(name: &str, default: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            default: Some(default.to_string()),
            description: Some(description.to_string()),
        }
    }

    /// Register the declaration and fill in the default when the caller did
    /// not supply a value. Supplied values are taken as-is.
    pub fn apply(&self, context: &mut LaunchContext) {
        context.declare_argument(ArgumentMetadata {
            name: self.name.clone(),
            default: self.default.clone(),
            description: self.description.clone(),
        });

        match (context.get_configuration(&self.name), &self.default) {
            (Some(value), _) => {
                log::debug!("Argument {} overridden: {}", self.name, value);
            }
            (None, Some(default)) => {
                log::debug!("Argument {} defaulted: {}", self.name, default);
                context.set_configuration(self.name.clone(), default.clone());
            }
            (None, None) => {
                log::debug!("Argument {} declared without default", self.name);
            }
        }
    }
}

//! Launch context for managing configurations

use std::collections::HashMap;

/// Metadata of a declared launch argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentMetadata {
    pub name: String,
    pub default: Option<String>,
    pub description: Option<String>,
}

/// Launch context holding configurations and the environment used for lookups
#[derive(Debug, Clone, Default)]
pub struct LaunchContext {
    configurations: HashMap<String, String>,
    declared_arguments: Vec<ArgumentMetadata>,
    /// Replaces `std::env` for package, executable and distro lookups when set
    environment: Option<HashMap<String, String>>,
}

impl LaunchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(environment: HashMap<String, String>) -> Self {
        Self {
            environment: Some(environment),
            ..Self::default()
        }
    }

    pub fn set_configuration(&mut self, name: String, value: String) {
        self.configurations.insert(name, value);
    }

    pub fn get_configuration(&self, name: &str) -> Option<String> {
        self.configurations.get(name).cloned()
    }

    pub fn configurations(&self) -> &HashMap<String, String> {
        &self.configurations
    }

    /// Record an argument declaration. A later declaration of the same name
    /// replaces the earlier one but keeps its position.
    pub fn declare_argument(&mut self, metadata: ArgumentMetadata) {
        match self
            .declared_arguments
            .iter_mut()
            .find(|arg| arg.name == metadata.name)
        {
            Some(existing) => *existing = metadata,
            None => self.declared_arguments.push(metadata),
        }
    }

    pub fn declared_arguments(&self) -> &[ArgumentMetadata] {
        &self.declared_arguments
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared_arguments.iter().any(|arg| arg.name == name)
    }

    /// Look up an environment variable, honoring the override map
    pub fn env_var(&self, name: &str) -> Option<String> {
        match &self.environment {
            Some(env) => env.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }
}

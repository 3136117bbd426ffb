//! Node action implementation

use crate::{
    error::SubstitutionError,
    substitution::{resolve_substitutions, LaunchContext, Substitution},
};

/// Node action representing a ROS 2 node
#[derive(Debug, Clone)]
pub struct NodeAction {
    pub package: String,
    pub executable: String,
    pub name: Option<String>,
    pub output: Option<String>,
    pub parameters: Vec<ParameterEntry>,
}

/// One entry of a node's `parameters` list. Entries keep their order on the
/// command line.
#[derive(Debug, Clone)]
pub enum ParameterEntry {
    /// Inline parameters, written to a generated parameter file
    Dict(Vec<Parameter>),
    /// Path to an existing parameter file, passed through untouched
    File(Vec<Substitution>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    /// Value type inferred from the text (bool, integer, float, string)
    Inferred,
    /// Always a string, even when the text looks like another type
    String,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub value: Vec<Substitution>,
    pub value_type: ParameterType,
}

impl Parameter {
    pub fn new(name: &str, value: Vec<Substitution>) -> Self {
        Self {
            name: name.to_string(),
            value,
            value_type: ParameterType::Inferred,
        }
    }

    pub fn string(name: &str, value: Vec<Substitution>) -> Self {
        Self {
            name: name.to_string(),
            value,
            value_type: ParameterType::String,
        }
    }

    pub fn resolve(&self, context: &LaunchContext) -> Result<String, SubstitutionError> {
        resolve_substitutions(&self.value, context)
    }
}

impl NodeAction {
    /// Node name, defaulting to the executable name
    pub fn node_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.executable)
    }
}

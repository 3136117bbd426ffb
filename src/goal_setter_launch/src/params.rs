//! Parameter file generation

use crate::{actions::ParameterType, error::GenerationError};
use serde_yaml::{Mapping, Value};
use std::{io::Write, path::Path};
use tempfile::{Builder, TempPath};

/// A parameter file written for one dictionary entry of a node.
/// The file is removed when this value is dropped unless it was kept.
#[derive(Debug)]
pub struct GeneratedParamFile {
    path: TempPath,
    contents: String,
}

impl GeneratedParamFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Keep the file on disk after this value is dropped
    pub fn keep(self) -> std::io::Result<std::path::PathBuf> {
        self.path.keep().map_err(|e| e.error)
    }
}

/// Render parameters as a ROS 2 parameter file applying to every node:
///
/// ```yaml
/// /**:
///   ros__parameters:
///     name: value
/// ```
pub fn render_param_yaml(params: &[(String, Value)]) -> Result<String, GenerationError> {
    let mut ros_parameters = Mapping::new();
    for (name, value) in params {
        ros_parameters.insert(Value::String(name.clone()), value.clone());
    }

    let mut node_map = Mapping::new();
    node_map.insert(
        Value::String("ros__parameters".to_string()),
        Value::Mapping(ros_parameters),
    );

    let mut root = Mapping::new();
    root.insert(Value::String("/**".to_string()), Value::Mapping(node_map));

    Ok(serde_yaml::to_string(&Value::Mapping(root))?)
}

/// Write parameters to a fresh temporary parameter file
pub fn write_param_file(params: &[(String, Value)]) -> Result<GeneratedParamFile, GenerationError> {
    let contents = render_param_yaml(params)?;

    let mut file = Builder::new()
        .prefix("launch_params_")
        .suffix(".yaml")
        .tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;

    let path = file.into_temp_path();
    log::debug!("Wrote parameter file {}", path.display());
    Ok(GeneratedParamFile { path, contents })
}

/// Convert resolved parameter text to its YAML value
pub fn typed_value(text: &str, value_type: ParameterType) -> Value {
    match value_type {
        ParameterType::String => Value::String(text.to_string()),
        ParameterType::Inferred => string_to_yaml_value(text),
    }
}

/// Convert a string to the appropriate YAML value type
fn string_to_yaml_value(s: &str) -> Value {
    match s {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(n) = s.parse::<i64>() {
        return Value::Number(n.into());
    }

    if let Ok(n) = s.parse::<f64>() {
        if n.is_finite() {
            return Value::Number(n.into());
        }
    }

    Value::String(s.to_string())
}

//! Command-line and record generation

use crate::actions::{NodeAction, ParameterEntry};
use crate::error::GenerationError;
use crate::params::{typed_value, write_param_file, GeneratedParamFile};
use crate::record::types::NodeRecord;
use crate::substitution::lookup::find_package_executable;
use crate::substitution::{resolve_substitutions, LaunchContext};

/// A node ready to start: its record plus the parameter files its command
/// line points at. The files live as long as this value.
#[derive(Debug)]
pub struct GeneratedNode {
    pub record: NodeRecord,
    pub param_files: Vec<GeneratedParamFile>,
}

pub struct CommandGenerator;

impl CommandGenerator {
    pub fn generate_node(
        node: &NodeAction,
        context: &LaunchContext,
    ) -> Result<GeneratedNode, GenerationError> {
        // 1. Resolve executable path
        let exec_path = Self::resolve_executable_path(context, &node.package, &node.executable)?;
        let mut cmd = vec![exec_path];

        // 2. ROS args delimiter
        cmd.push("--ros-args".to_string());

        // 3. Node name
        cmd.push("-r".to_string());
        cmd.push(format!("__node:={}", node.node_name()));

        // 4. Parameters, one --params-file per entry in entry order
        let mut params = Vec::new();
        let mut params_files = Vec::new();
        let mut param_files = Vec::new();

        for entry in &node.parameters {
            let path = match entry {
                ParameterEntry::Dict(dict) => {
                    let mut values = Vec::with_capacity(dict.len());
                    for param in dict {
                        let text = param.resolve(context)?;
                        values.push((param.name.clone(), typed_value(&text, param.value_type)));
                        params.push((param.name.clone(), text));
                    }
                    let file = write_param_file(&values)?;
                    let path = file.path().to_string_lossy().into_owned();
                    param_files.push(file);
                    path
                }
                ParameterEntry::File(subs) => resolve_substitutions(subs, context)?,
            };
            cmd.push("--params-file".to_string());
            cmd.push(path.clone());
            params_files.push(path);
        }

        let record = NodeRecord {
            executable: node.executable.clone(),
            package: Some(node.package.clone()),
            name: Some(node.node_name().to_string()),
            output: node.output.clone(),
            params,
            params_files,
            cmd,
        };

        Ok(GeneratedNode {
            record,
            param_files,
        })
    }

    fn resolve_executable_path(
        context: &LaunchContext,
        package: &str,
        executable: &str,
    ) -> Result<String, GenerationError> {
        find_package_executable(context, package, executable)
            .map(|p| p.to_string_lossy().into_owned())
            .ok_or_else(|| GenerationError::ExecutableNotFound {
                package: package.to_string(),
                executable: executable.to_string(),
            })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::actions::Parameter;
    use crate::substitution::Substitution;
    use std::collections::HashMap;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Prefix containing `lib/demo/node` and a context pointing at it
    fn fake_prefix() -> (TempDir, LaunchContext) {
        let dir = TempDir::new().unwrap();
        let lib = dir.path().join("lib").join("demo");
        std::fs::create_dir_all(&lib).unwrap();
        let exe = lib.join("node");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut env = HashMap::new();
        env.insert(
            "AMENT_PREFIX_PATH".to_string(),
            dir.path().to_string_lossy().into_owned(),
        );
        (dir, LaunchContext::with_environment(env))
    }

    fn demo_node(parameters: Vec<ParameterEntry>) -> NodeAction {
        NodeAction {
            package: "demo".to_string(),
            executable: "node".to_string(),
            name: None,
            output: Some("screen".to_string()),
            parameters,
        }
    }

    #[test]
    fn test_generate_simple_command() {
        let (dir, context) = fake_prefix();
        let generated = CommandGenerator::generate_node(&demo_node(vec![]), &context).unwrap();
        let cmd = &generated.record.cmd;

        assert_eq!(
            cmd[0],
            dir.path().join("lib/demo/node").to_string_lossy().to_string()
        );
        assert_eq!(cmd[1], "--ros-args");
        assert_eq!(cmd[2], "-r");
        assert_eq!(cmd[3], "__node:=node");
        assert_eq!(cmd.len(), 4);
    }

    #[test]
    fn test_params_files_in_entry_order() {
        let (_dir, mut context) = fake_prefix();
        context.set_configuration("flag".to_string(), "true".to_string());

        let node = demo_node(vec![
            ParameterEntry::Dict(vec![Parameter::string(
                "text",
                vec![Substitution::text("42")],
            )]),
            ParameterEntry::File(vec![Substitution::text("/etc/static.yaml")]),
            ParameterEntry::Dict(vec![Parameter::new(
                "flag",
                vec![Substitution::var("flag")],
            )]),
        ]);

        let generated = CommandGenerator::generate_node(&node, &context).unwrap();
        let record = &generated.record;

        assert_eq!(record.params_files.len(), 3);
        assert_eq!(record.params_files[1], "/etc/static.yaml");
        assert_eq!(generated.param_files.len(), 2);
        assert_eq!(
            record.params,
            vec![
                ("text".to_string(), "42".to_string()),
                ("flag".to_string(), "true".to_string()),
            ]
        );

        let file_args: Vec<_> = record
            .cmd
            .windows(2)
            .filter(|w| w[0] == "--params-file")
            .map(|w| w[1].clone())
            .collect();
        assert_eq!(file_args, record.params_files);

        let first: serde_yaml::Value =
            serde_yaml::from_str(generated.param_files[0].contents()).unwrap();
        assert_eq!(
            first["/**"]["ros__parameters"]["text"],
            serde_yaml::Value::String("42".to_string())
        );
        let second: serde_yaml::Value =
            serde_yaml::from_str(generated.param_files[1].contents()).unwrap();
        assert_eq!(
            second["/**"]["ros__parameters"]["flag"],
            serde_yaml::Value::Bool(true)
        );
    }

    #[test]
    fn test_missing_executable() {
        let (_dir, context) = fake_prefix();
        let mut node = demo_node(vec![]);
        node.executable = "absent".to_string();

        assert!(matches!(
            CommandGenerator::generate_node(&node, &context),
            Err(GenerationError::ExecutableNotFound { .. })
        ));
    }

    #[test]
    fn test_unresolved_parameter_fails() {
        let (_dir, context) = fake_prefix();
        let node = demo_node(vec![ParameterEntry::Dict(vec![Parameter::new(
            "x",
            vec![Substitution::var("undeclared")],
        )])]);

        assert!(matches!(
            CommandGenerator::generate_node(&node, &context),
            Err(GenerationError::Substitution(_))
        ));
    }
}

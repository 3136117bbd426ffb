//! goal_setter_launch library
//!
//! Composes the launch of the Isaac ROS MoveIt goal setter: resolves the
//! launch arguments, generates the robot descriptions with xacro, locates the
//! kinematics parameters and starts the node.

pub mod actions;
pub mod description;
pub mod error;
pub mod params;
pub mod process;
pub mod record;
pub mod substitution;

use description::LaunchParameterBundle;
use error::Result;
use process::NodeProcess;
use record::{CommandGenerator, GeneratedNode, RecordJson};
use std::collections::{BTreeMap, HashMap};
use substitution::{shell_join, ArgumentMetadata, LaunchContext, Substitution};

/// Resolves arguments and assembles the goal setter launch
pub struct LaunchComposer {
    context: LaunchContext,
}

impl LaunchComposer {
    pub fn new(cli_args: HashMap<String, String>) -> Self {
        Self::from_context(LaunchContext::new(), cli_args)
    }

    /// Composer whose package, executable and PATH lookups read `environment`
    /// instead of the process environment
    pub fn with_environment(
        cli_args: HashMap<String, String>,
        environment: HashMap<String, String>,
    ) -> Self {
        Self::from_context(LaunchContext::with_environment(environment), cli_args)
    }

    fn from_context(mut context: LaunchContext, cli_args: HashMap<String, String>) -> Self {
        // Apply CLI args as initial configurations
        for (k, v) in cli_args {
            context.set_configuration(k, v);
        }
        Self { context }
    }

    pub fn context(&self) -> &LaunchContext {
        &self.context
    }

    /// Apply the argument declarations and return the resolved Argument Set
    pub fn resolve_arguments(&mut self) -> BTreeMap<String, String> {
        for declaration in description::declared_arguments() {
            declaration.apply(&mut self.context);
        }

        let mut undeclared: Vec<_> = self
            .context
            .configurations()
            .keys()
            .filter(|name| !self.context.is_declared(name))
            .cloned()
            .collect();
        undeclared.sort();
        for name in undeclared {
            log::warn!("Launch argument '{}' is not declared and will be ignored", name);
        }

        self.context
            .declared_arguments()
            .iter()
            .filter_map(|arg| {
                self.context
                    .get_configuration(&arg.name)
                    .map(|value| (arg.name.clone(), value))
            })
            .collect()
    }

    /// Arguments that differ from the configuration the semantic
    /// description is generated for, as `(name, value, expected)`
    pub fn semantic_mismatches(&self) -> Vec<(&'static str, String, &'static str)> {
        description::SEMANTIC_CONFIGURATION
            .iter()
            .filter_map(|&(name, expected)| {
                self.context
                    .get_configuration(name)
                    .filter(|value| value != expected)
                    .map(|value| (name, value, expected))
            })
            .collect()
    }

    /// The semantic description is always generated for gen3 / 7 dof /
    /// robotiq_2f_85; say so when the structural description differs.
    fn warn_on_semantic_mismatch(&self) {
        for (name, value, expected) in self.semantic_mismatches() {
            log::warn!(
                "{}:={} does not match the semantic description, which is generated for {}:={}",
                name,
                value,
                name,
                expected
            );
        }
    }

    /// Generate both descriptions and locate the kinematics parameters.
    /// Arguments must already be resolved.
    pub fn build_bundle(&self) -> Result<LaunchParameterBundle> {
        let structural = description::robot_description_command();
        let semantic = description::robot_description_semantic_command();

        log::info!("Generating robot descriptions with {}", description::DESCRIPTION_TOOL);
        let (robot_description, robot_description_semantic) = rayon::join(
            || structural.resolve(&self.context),
            || semantic.resolve(&self.context),
        );
        let robot_description = robot_description?;
        let robot_description_semantic = robot_description_semantic?;
        log::debug!(
            "robot_description: {} bytes, robot_description_semantic: {} bytes",
            robot_description.len(),
            robot_description_semantic.len()
        );

        let kinematics_path = description::kinematics_params().resolve(&self.context)?;
        let use_sim_time = Substitution::var("use_sim_time").resolve(&self.context)?;

        Ok(LaunchParameterBundle {
            robot_description,
            robot_description_semantic,
            kinematics_path,
            use_sim_time,
        })
    }

    /// Run the whole sequence: arguments, descriptions, bundle, node command
    pub fn compose(mut self) -> Result<ComposedLaunch> {
        let arguments = self.resolve_arguments();
        self.warn_on_semantic_mismatch();

        let bundle = self.build_bundle()?;
        let node = description::goal_setter_node(&bundle);
        let generated = CommandGenerator::generate_node(&node, &self.context)?;
        log::debug!("Node command: {}", shell_join(&generated.record.cmd));

        Ok(ComposedLaunch {
            arguments,
            bundle,
            node: generated,
        })
    }
}

/// A fully assembled launch that has not started anything yet
#[derive(Debug)]
pub struct ComposedLaunch {
    pub arguments: BTreeMap<String, String>,
    pub bundle: LaunchParameterBundle,
    pub node: GeneratedNode,
}

impl ComposedLaunch {
    /// Start the node. The returned handle owns the parameter files.
    pub fn launch(self) -> Result<NodeProcess> {
        NodeProcess::spawn(self.node)
    }

    /// Build record.json, keeping the generated parameter files on disk so
    /// the recorded command stays usable.
    pub fn into_record(self) -> Result<RecordJson> {
        let mut record = RecordJson::new();

        for file in self.node.param_files {
            let contents = file.contents().to_string();
            let path = file.keep()?;
            record
                .file_data
                .insert(path.to_string_lossy().into_owned(), contents);
        }

        match std::fs::read_to_string(&self.bundle.kinematics_path) {
            Ok(contents) => {
                record
                    .file_data
                    .insert(self.bundle.kinematics_path.clone(), contents);
            }
            Err(e) => {
                log::debug!(
                    "Kinematics file {} not recorded: {}",
                    self.bundle.kinematics_path,
                    e
                );
            }
        }

        record.node.push(self.node.record);
        Ok(record)
    }
}

/// Compose the launch from CLI arguments using the process environment
pub fn compose_launch(cli_args: HashMap<String, String>) -> Result<ComposedLaunch> {
    LaunchComposer::new(cli_args).compose()
}

/// The declared launch arguments with their defaults and descriptions
pub fn declared_arguments() -> Vec<ArgumentMetadata> {
    let mut context = LaunchContext::new();
    for declaration in description::declared_arguments() {
        declaration.apply(&mut context);
    }
    context.declared_arguments().to_vec()
}

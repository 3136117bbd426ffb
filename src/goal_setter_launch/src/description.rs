//! Launch description of the MoveIt goal setter node
//!
//! Declares the launch arguments, the two xacro invocations that produce the
//! robot descriptions, the kinematics parameter file and the node itself.

use crate::actions::{DeclareArgumentAction, NodeAction, Parameter, ParameterEntry};
use crate::substitution::{CommandErrorMode, Substitution};

pub const DESCRIPTION_TOOL: &str = "xacro";
pub const DESCRIPTION_PACKAGE: &str = "kortex_description";
pub const MOVEIT_CONFIG_PACKAGE: &str = "kinova_gen3_7dof_robotiq_2f_85_moveit_config";
pub const GOAL_SETTER_PACKAGE: &str = "isaac_ros_moveit_goal_setter";
pub const GOAL_SETTER_EXECUTABLE: &str = "isaac_ros_moveit_goal_setter";
pub const GOAL_SETTER_NAME: &str = "isaac_ros_moveit_goal_setter";

/// Arguments substituted into the structural description, in argv order
pub const STRUCTURAL_ARGUMENTS: [&str; 5] = ["robot_ip", "arm", "dof", "gripper", "use_sim_time"];

/// Arm configuration the semantic description is generated for
pub const SEMANTIC_CONFIGURATION: [(&str, &str); 3] =
    [("arm", "gen3"), ("dof", "7"), ("gripper", "robotiq_2f_85")];

pub fn declared_arguments() -> Vec<DeclareArgumentAction> {
    vec![
        DeclareArgumentAction::new("robot_ip", "192.168.1.10", "IP address of the robot"),
        DeclareArgumentAction::new("arm", "gen3", "Type of Kinova arm"),
        DeclareArgumentAction::new("dof", "7", "Number of degrees of freedom"),
        DeclareArgumentAction::new("gripper", "robotiq_2f_85", "Type of gripper"),
        DeclareArgumentAction::new("use_sim_time", "false", "Use simulation time"),
    ]
}

fn package_path(package: &str, parts: &[&str]) -> Substitution {
    let mut joined = vec![vec![Substitution::FindPackageShare(package.to_string())]];
    joined.extend(parts.iter().map(|part| vec![Substitution::text(*part)]));
    Substitution::PathJoin(joined)
}

/// `xacro <kortex_description>/robots/gen3.xacro robot_ip:=.. arm:=.. dof:=.. gripper:=.. use_sim_time:=..`
pub fn robot_description_command() -> Substitution {
    let mut argv = vec![
        vec![Substitution::FindExecutable(DESCRIPTION_TOOL.to_string())],
        vec![package_path(DESCRIPTION_PACKAGE, &["robots", "gen3.xacro"])],
    ];
    argv.extend(STRUCTURAL_ARGUMENTS.iter().map(|name| {
        vec![
            Substitution::text(format!("{}:=", name)),
            Substitution::var(*name),
        ]
    }));

    Substitution::Command {
        argv,
        error_mode: CommandErrorMode::default(),
    }
}

/// `xacro <moveit config>/config/gen3.srdf name:=gen3 prefix:=`
pub fn robot_description_semantic_command() -> Substitution {
    Substitution::Command {
        argv: vec![
            vec![Substitution::FindExecutable(DESCRIPTION_TOOL.to_string())],
            vec![package_path(MOVEIT_CONFIG_PACKAGE, &["config", "gen3.srdf"])],
            vec![Substitution::text("name:=gen3")],
            vec![Substitution::text("prefix:=")],
        ],
        error_mode: CommandErrorMode::default(),
    }
}

pub fn kinematics_params() -> Substitution {
    package_path(MOVEIT_CONFIG_PACKAGE, &["config", "kinematics_cumotion.yaml"])
}

/// Everything the goal setter node is started with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParameterBundle {
    pub robot_description: String,
    pub robot_description_semantic: String,
    pub kinematics_path: String,
    pub use_sim_time: String,
}

impl LaunchParameterBundle {
    /// The node's parameter list: structural description, semantic
    /// description, kinematics file, simulation-time flag
    pub fn entries(&self) -> Vec<ParameterEntry> {
        vec![
            ParameterEntry::Dict(vec![Parameter::string(
                "robot_description",
                vec![Substitution::text(self.robot_description.clone())],
            )]),
            ParameterEntry::Dict(vec![Parameter::string(
                "robot_description_semantic",
                vec![Substitution::text(self.robot_description_semantic.clone())],
            )]),
            ParameterEntry::File(vec![Substitution::text(self.kinematics_path.clone())]),
            ParameterEntry::Dict(vec![Parameter::new(
                "use_sim_time",
                vec![Substitution::text(self.use_sim_time.clone())],
            )]),
        ]
    }
}

pub fn goal_setter_node(bundle: &LaunchParameterBundle) -> NodeAction {
    NodeAction {
        package: GOAL_SETTER_PACKAGE.to_string(),
        executable: GOAL_SETTER_EXECUTABLE.to_string(),
        name: Some(GOAL_SETTER_NAME.to_string()),
        output: Some("screen".to_string()),
        parameters: bundle.entries(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ParameterType;
    use crate::substitution::{resolve_argv, LaunchContext};

    fn argv_of(command: &Substitution) -> &[Vec<Substitution>] {
        match command {
            Substitution::Command { argv, .. } => argv.as_slice(),
            other => panic!("expected a command, got {:?}", other),
        }
    }

    #[test]
    fn test_declared_defaults() {
        let args: Vec<_> = declared_arguments()
            .into_iter()
            .map(|a| (a.name, a.default.unwrap()))
            .collect();
        assert_eq!(
            args,
            vec![
                ("robot_ip".to_string(), "192.168.1.10".to_string()),
                ("arm".to_string(), "gen3".to_string()),
                ("dof".to_string(), "7".to_string()),
                ("gripper".to_string(), "robotiq_2f_85".to_string()),
                ("use_sim_time".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_structural_tokens() {
        let command = robot_description_command();
        let argv = argv_of(&command);
        // tool, template, five substitutions
        assert_eq!(argv.len(), 7);

        let mut context = LaunchContext::new();
        for (name, value) in [
            ("robot_ip", "10.0.0.5"),
            ("arm", "gen3"),
            ("dof", "6"),
            ("gripper", "robotiq_2f_85"),
            ("use_sim_time", "false"),
        ] {
            context.set_configuration(name.to_string(), value.to_string());
        }
        let tokens = resolve_argv(&argv[2..], &context).unwrap();
        assert_eq!(
            tokens,
            vec![
                "robot_ip:=10.0.0.5",
                "arm:=gen3",
                "dof:=6",
                "gripper:=robotiq_2f_85",
                "use_sim_time:=false",
            ]
        );
    }

    #[test]
    fn test_semantic_command_has_no_configuration() {
        let command = robot_description_semantic_command();
        let argv = argv_of(&command);
        assert_eq!(argv.len(), 4);
        assert!(argv
            .iter()
            .flatten()
            .all(|sub| !matches!(sub, Substitution::LaunchConfiguration(_))));

        let tokens = resolve_argv(&argv[2..], &LaunchContext::new()).unwrap();
        assert_eq!(tokens, vec!["name:=gen3", "prefix:="]);
    }

    #[test]
    fn test_kinematics_path_is_fixed() {
        assert_eq!(
            kinematics_params(),
            Substitution::PathJoin(vec![
                vec![Substitution::FindPackageShare(MOVEIT_CONFIG_PACKAGE.to_string())],
                vec![Substitution::text("config")],
                vec![Substitution::text("kinematics_cumotion.yaml")],
            ])
        );
    }

    #[test]
    fn test_bundle_entries() {
        let bundle = LaunchParameterBundle {
            robot_description: "<robot/>".to_string(),
            robot_description_semantic: "<robot/>".to_string(),
            kinematics_path: "/share/config/kinematics_cumotion.yaml".to_string(),
            use_sim_time: "true".to_string(),
        };
        let node = goal_setter_node(&bundle);
        assert_eq!(node.parameters.len(), 4);
        assert_eq!(node.node_name(), GOAL_SETTER_NAME);

        let dict_names: Vec<_> = node
            .parameters
            .iter()
            .filter_map(|entry| match entry {
                ParameterEntry::Dict(params) => Some((params[0].name.as_str(), params[0].value_type)),
                ParameterEntry::File(_) => None,
            })
            .collect();
        assert_eq!(
            dict_names,
            vec![
                ("robot_description", ParameterType::String),
                ("robot_description_semantic", ParameterType::String),
                ("use_sim_time", ParameterType::Inferred),
            ]
        );
        assert!(matches!(node.parameters[2], ParameterEntry::File(_)));
    }
}

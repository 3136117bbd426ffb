//! record.json data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root structure for record.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordJson {
    pub node: Vec<NodeRecord>,
    /// Contents of the parameter files the recorded nodes reference, by path
    pub file_data: BTreeMap<String, String>,
}

impl RecordJson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Node record structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub executable: String,
    pub package: Option<String>,
    pub name: Option<String>,
    pub output: Option<String>,
    /// Inline parameters in entry order, values as resolved text
    pub params: Vec<(String, String)>,
    /// Every `--params-file` argument in command-line order
    pub params_files: Vec<String>,
    pub cmd: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_node() -> NodeRecord {
        NodeRecord {
            executable: "isaac_ros_moveit_goal_setter".to_string(),
            package: Some("isaac_ros_moveit_goal_setter".to_string()),
            name: Some("isaac_ros_moveit_goal_setter".to_string()),
            output: Some("screen".to_string()),
            params: vec![("use_sim_time".to_string(), "false".to_string())],
            params_files: vec!["/tmp/launch_params_a.yaml".to_string()],
            cmd: vec![
                "/opt/ros/humble/lib/isaac_ros_moveit_goal_setter/isaac_ros_moveit_goal_setter"
                    .to_string(),
                "--ros-args".to_string(),
            ],
        }
    }

    #[test]
    fn test_serialize_empty() {
        let record = RecordJson::new();
        let json = record.to_json().unwrap();
        assert!(json.contains("\"node\""));
        assert!(json.contains("\"file_data\""));
    }

    #[test]
    fn test_tuple_serialization() {
        let json = serde_json::to_string(&sample_node()).unwrap();
        // Tuples should serialize as arrays
        assert!(json.contains("[\"use_sim_time\",\"false\"]"));
        assert!(json.contains("\"output\":\"screen\""));
    }

    #[test]
    fn test_record_deserializes() {
        let mut record = RecordJson::new();
        record.node.push(sample_node());
        record
            .file_data
            .insert("/tmp/launch_params_a.yaml".to_string(), "/**: {}\n".to_string());

        let json = record.to_json().unwrap();
        let parsed: RecordJson = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.node.len(), 1);
        assert_eq!(parsed.node[0].params_files, sample_node().params_files);
        assert_eq!(parsed.file_data.len(), 1);
    }
}

//! Substitution types

use crate::error::SubstitutionError;
use crate::substitution::command::run_command;
use crate::substitution::context::LaunchContext;
use crate::substitution::lookup::{find_executable, find_package_share};
use std::path::PathBuf;

/// How a command substitution treats output on stderr.
/// A non-zero exit status is an error in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandErrorMode {
    /// Any stderr output fails the substitution
    #[default]
    Strict,
    /// Stderr output is logged as a warning
    Warn,
    /// Stderr output is discarded
    Ignore,
}

/// Substitution enum representing different types of substitutions
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    /// Plain text (no substitution)
    Text(String),
    /// Launch configuration variable
    LaunchConfiguration(String),
    /// Executable found on PATH
    FindExecutable(String),
    /// ROS 2 package share directory
    FindPackageShare(String),
    /// Path components joined with the platform separator
    PathJoin(Vec<Vec<Substitution>>),
    /// Run a command and take its stdout. Each argv element is resolved
    /// separately and passed as exactly one argument.
    Command {
        argv: Vec<Vec<Substitution>>,
        error_mode: CommandErrorMode,
    },
}

impl Substitution {
    pub fn text(s: impl Into<String>) -> Self {
        Substitution::Text(s.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Substitution::LaunchConfiguration(name.into())
    }

    /// Resolve substitution to string value
    pub fn resolve(&self, context: &LaunchContext) -> Result<String, SubstitutionError> {
        match self {
            Substitution::Text(s) => Ok(s.clone()),
            Substitution::LaunchConfiguration(name) => context
                .get_configuration(name)
                .ok_or_else(|| SubstitutionError::UndefinedVariable(name.clone())),
            Substitution::FindExecutable(name) => find_executable(context, name)
                .map(|p| p.to_string_lossy().into_owned())
                .ok_or_else(|| SubstitutionError::ExecutableNotFound(name.clone())),
            Substitution::FindPackageShare(package_name) => {
                find_package_share(context, package_name)
                    .map(|p| p.to_string_lossy().into_owned())
                    .ok_or_else(|| SubstitutionError::PackageNotFound(package_name.clone()))
            }
            Substitution::PathJoin(parts) => {
                let mut path = PathBuf::new();
                for part in parts {
                    path.push(resolve_substitutions(part, context)?);
                }
                Ok(path.to_string_lossy().into_owned())
            }
            Substitution::Command { argv, error_mode } => {
                let argv = resolve_argv(argv, context)?;
                run_command(&argv, *error_mode)
            }
        }
    }
}

/// Resolve list of substitutions to single string
pub fn resolve_substitutions(
    subs: &[Substitution],
    context: &LaunchContext,
) -> Result<String, SubstitutionError> {
    let mut result = String::new();
    for sub in subs {
        result.push_str(&sub.resolve(context)?);
    }
    Ok(result)
}

/// Resolve every argv element of a command without running it
pub fn resolve_argv(
    argv: &[Vec<Substitution>],
    context: &LaunchContext,
) -> Result<Vec<String>, SubstitutionError> {
    argv.iter()
        .map(|arg| resolve_substitutions(arg, context))
        .collect()
}

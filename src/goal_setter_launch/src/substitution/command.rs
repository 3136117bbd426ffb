//! Command substitution execution

use crate::error::SubstitutionError;
use crate::substitution::types::CommandErrorMode;
use std::process::Command;

/// Run `argv` to completion and return its stdout
pub(crate) fn run_command(
    argv: &[String],
    error_mode: CommandErrorMode,
) -> Result<String, SubstitutionError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| SubstitutionError::CommandFailed("empty command".to_string()))?;

    let command_line = shell_join(argv);
    log::debug!("Running command substitution: {}", command_line);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| SubstitutionError::CommandFailed(format!("{}: {}", command_line, e)))?;

    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        return Err(SubstitutionError::CommandFailed(format!(
            "{} exited with {}: {}",
            command_line,
            output.status,
            stderr.trim()
        )));
    }

    if !stderr.trim().is_empty() {
        match error_mode {
            CommandErrorMode::Strict => {
                return Err(SubstitutionError::CommandFailed(format!(
                    "{} wrote to stderr: {}",
                    command_line,
                    stderr.trim()
                )));
            }
            CommandErrorMode::Warn => {
                log::warn!("{} wrote to stderr: {}", command_line, stderr.trim());
            }
            CommandErrorMode::Ignore => {}
        }
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Shell-quoted rendering of an argv, for log and error messages
pub fn shell_join(argv: &[String]) -> String {
    shlex::try_join(argv.iter().map(String::as_str)).unwrap_or_else(|_| argv.join(" "))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_stdout_is_returned() {
        let out = run_command(&sh("printf '<robot/>'"), CommandErrorMode::Strict).unwrap();
        assert_eq!(out, "<robot/>");
    }

    #[test]
    fn test_nonzero_exit_fails_in_every_mode() {
        for mode in [
            CommandErrorMode::Strict,
            CommandErrorMode::Warn,
            CommandErrorMode::Ignore,
        ] {
            let result = run_command(&sh("echo broken >&2; exit 3"), mode);
            match result {
                Err(SubstitutionError::CommandFailed(msg)) => assert!(msg.contains("broken")),
                other => panic!("expected CommandFailed, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_stderr_handling() {
        let script = sh("echo out; echo noise >&2");
        assert!(run_command(&script, CommandErrorMode::Strict).is_err());
        assert_eq!(
            run_command(&script, CommandErrorMode::Warn).unwrap(),
            "out\n"
        );
        assert_eq!(
            run_command(&script, CommandErrorMode::Ignore).unwrap(),
            "out\n"
        );
    }

    #[test]
    fn test_missing_program() {
        let argv = vec!["/nonexistent/xacro".to_string()];
        assert!(matches!(
            run_command(&argv, CommandErrorMode::Strict),
            Err(SubstitutionError::CommandFailed(_))
        ));
    }

    #[test]
    fn test_empty_command() {
        assert!(run_command(&[], CommandErrorMode::Strict).is_err());
    }

    #[test]
    fn test_shell_join_quotes() {
        let argv = vec!["xacro".to_string(), "prefix:=".to_string(), "a b".to_string()];
        let joined = shell_join(&argv);
        assert!(joined.starts_with("xacro "));
        assert_eq!(shlex::split(&joined), Some(argv));
    }
}

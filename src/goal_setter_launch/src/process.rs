//! Node process start and exit reporting

use crate::error::LaunchError;
use crate::params::GeneratedParamFile;
use crate::record::{GeneratedNode, NodeRecord};
use crate::substitution::shell_join;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc,
};

/// A started node process. Holds the generated parameter files until the
/// process has exited.
#[derive(Debug)]
pub struct NodeProcess {
    child: Child,
    label: String,
    record: NodeRecord,
    _param_files: Vec<GeneratedParamFile>,
}

impl NodeProcess {
    pub fn spawn(generated: GeneratedNode) -> Result<Self, LaunchError> {
        let GeneratedNode {
            record,
            param_files,
        } = generated;

        let (program, args) = record.cmd.split_first().ok_or_else(|| LaunchError::Spawn {
            executable: record.executable.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        let mut command = Command::new(program);
        command.args(args);
        if record.output.as_deref() == Some("log") {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let child = command.spawn().map_err(|source| LaunchError::Spawn {
            executable: program.clone(),
            source,
        })?;

        let label = format!("{}-1", record.executable);
        log::info!("[{}]: process started with pid [{}]", label, child.id());

        Ok(Self {
            child,
            label,
            record,
            _param_files: param_files,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn record(&self) -> &NodeRecord {
        &self.record
    }

    /// Wait for the process to exit and log how it ended
    pub fn wait(mut self) -> Result<ExitStatus, LaunchError> {
        let pid = self.child.id();
        let status = self.child.wait()?;

        if status.success() {
            log::info!("[{}]: process has finished cleanly [pid {}]", self.label, pid);
        } else {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string());
            log::error!(
                "[{}]: process has died [pid {}, exit code {}, cmd '{}']",
                self.label,
                pid,
                code,
                shell_join(&self.record.cmd)
            );
        }

        Ok(status)
    }
}

/// Catches Ctrl-C in the composer and passes it on to the attached node, so
/// the composer outlives the node and still cleans up after it.
#[derive(Debug, Clone, Default)]
pub struct InterruptForwarder {
    pid: Arc<AtomicU32>,
    interrupted: Arc<AtomicBool>,
}

impl InterruptForwarder {
    /// Install the process-wide interrupt handler. Can only be done once.
    pub fn install() -> Result<Self, LaunchError> {
        let forwarder = Self::default();
        let handle = forwarder.clone();
        ctrlc::set_handler(move || handle.interrupt())?;
        Ok(forwarder)
    }

    /// Route interrupts to `node` from now on. An interrupt that arrived
    /// while the node was starting is delivered here.
    pub fn attach(&self, node: &NodeProcess) {
        self.pid.store(node.id(), Ordering::Release);
        if self.interrupted() {
            self.forward(node.id());
        }
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Release);
        match self.pid.load(Ordering::Acquire) {
            0 => log::warn!("Caught interrupt before the node was started"),
            pid => self.forward(pid),
        }
    }

    #[cfg(unix)]
    fn forward(&self, pid: u32) {
        log::info!("Caught interrupt, sending SIGINT to pid [{}]", pid);
        // pid comes from a child we spawned and have not reaped yet
        if unsafe { libc::kill(pid as libc::pid_t, libc::SIGINT) } != 0 {
            log::warn!(
                "Failed to signal pid [{}]: {}",
                pid,
                std::io::Error::last_os_error()
            );
        }
    }

    #[cfg(not(unix))]
    fn forward(&self, pid: u32) {
        // The console delivers Ctrl-C to the whole process group
        log::info!("Caught interrupt, waiting for pid [{}] to exit", pid);
    }
}

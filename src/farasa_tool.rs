use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;
use log::{debug, warn};
use tokio::process::Command;

use crate::app_config::{ToolConfig, ToolKind};
use crate::errors::ToolError;

// @module: Launching the external Farasa executables

// @const: Max stderr lines kept in an error
const MAX_STDERR_LINES: usize = 20;

/// One external Farasa tool, ready to be run on files
#[derive(Debug, Clone)]
pub struct FarasaTool {
    kind: ToolKind,
    program: String,
    base_args: Vec<String>,
    timeout: Option<Duration>,
}

impl FarasaTool {
    /// Build a tool from its configuration
    pub fn from_config(kind: ToolKind, config: &ToolConfig) -> Self {
        Self {
            kind,
            program: config.program.clone(),
            base_args: config.base_args(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Which tool this is
    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    /// Full argument list for one invocation
    pub fn command_args(&self, input: &Path, output: Option<&Path>) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.push("-i".to_string());
        args.push(input.to_string_lossy().into_owned());
        if let Some(output) = output {
            args.push("-o".to_string());
            args.push(output.to_string_lossy().into_owned());
        }
        args
    }

    /// Run the tool on `input`
    ///
    /// With an `output` path the tool writes that file itself and `Ok(None)`
    /// is returned once it exists. A file already at `output` is removed first,
    /// so only what this run wrote counts. Without one, the tool's stdout is
    /// returned.
    pub async fn call(&self, input: &Path, output: Option<&Path>) -> Result<Option<String>, ToolError> {
        let tool = self.kind.display_name().to_string();
        if let Some(output) = output {
            if !Self::is_same_file(input, output) {
                Self::clear_previous_output(&tool, output)?;
            }
        }

        let args = self.command_args(input, output);
        debug!("Running {}: {} {}", tool, self.program, args.join(" "));

        let child_future = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let result = match self.timeout {
            Some(timeout_duration) => {
                tokio::select! {
                    result = child_future => result,
                    _ = tokio::time::sleep(timeout_duration) => {
                        return Err(ToolError::TimedOut {
                            tool,
                            secs: timeout_duration.as_secs(),
                        });
                    }
                }
            }
            None => child_future.await,
        };

        let result = result.map_err(|e| ToolError::Spawn {
            tool: tool.clone(),
            message: e.to_string(),
        })?;

        let stderr = String::from_utf8_lossy(&result.stderr);
        if !result.status.success() {
            return Err(ToolError::Failed {
                tool,
                status: describe_status(&result.status),
                stderr: Self::filter_stderr(&stderr),
            });
        }
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", tool, Self::filter_stderr(&stderr));
        }

        match output {
            Some(output) => {
                if !output.exists() {
                    return Err(ToolError::MissingOutput {
                        tool,
                        path: output.display().to_string(),
                    });
                }
                Ok(None)
            }
            None => Ok(Some(String::from_utf8_lossy(&result.stdout).into_owned())),
        }
    }

    /// Run the tool and require an output file at `output`
    pub async fn call_to_file(&self, input: &Path, output: &Path) -> Result<PathBuf, ToolError> {
        self.call(input, Some(output)).await?;
        Ok(output.to_path_buf())
    }

    fn is_same_file(a: &Path, b: &Path) -> bool {
        match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn clear_previous_output(tool: &str, output: &Path) -> Result<(), ToolError> {
        match std::fs::remove_file(output) {
            Ok(()) => {
                debug!("Removed previous output {:?}", output);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ToolError::StaleOutput {
                tool: tool.to_string(),
                path: output.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Keep the first lines of stderr, trimmed, so errors stay readable
    fn filter_stderr(stderr: &str) -> String {
        let lines: Vec<&str> = stderr
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .collect();

        if lines.len() > MAX_STDERR_LINES {
            warn!("Tool stderr truncated from {} to {} lines", lines.len(), MAX_STDERR_LINES);
            let mut kept = lines[..MAX_STDERR_LINES].join("\n");
            kept.push_str("\n...");
            kept
        } else {
            lines.join("\n")
        }
    }
}

fn describe_status(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("code {}", code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal {}", signal);
        }
    }
    status.to_string()
}

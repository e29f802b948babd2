use crate::utils::{Error, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error};

/// Output of a finished tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone)]
pub struct ToolRunner {
    tool_path: String,
    timeout: Duration,
}

impl ToolRunner {
    pub fn new(tool_path: String, timeout_seconds: u64) -> Self {
        Self {
            tool_path,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn tool_path(&self) -> &str {
        &self.tool_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn check_availability(&self, version_arg: &str) -> Result<()> {
        debug!("Checking tool availability at: {}", self.tool_path);

        let output = Command::new(&self.tool_path)
            .arg(version_arg)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::tool(format!("Failed to run {}: {}", self.tool_path, e)))?;

        // makemkvcon exits non-zero for --version on some builds; it only has to start
        debug!(
            "{} responded with exit code {:?}",
            self.tool_path,
            output.status.code()
        );
        Ok(())
    }

    /// Runs the tool to completion and captures its output, failing on a
    /// non-zero exit.
    pub async fn run(&self, args: &[String]) -> Result<ToolOutput> {
        let output = self.run_unchecked(args, self.timeout).await?;

        if !output.success() {
            error!("{} failed:", self.tool_path);
            error!("Exit code: {}", output.exit_code);
            error!("Stderr: {}", output.stderr);

            return Err(Error::tool(format!(
                "{} failed with exit code {}: {}",
                self.tool_path,
                output.exit_code,
                output.stderr.trim()
            )));
        }

        Ok(output)
    }

    /// Runs the tool and returns whatever it produced, whatever the exit code.
    pub async fn run_unchecked(&self, args: &[String], timeout: Duration) -> Result<ToolOutput> {
        debug!("Running: {} {}", self.tool_path, args.join(" "));

        let child = Command::new(&self.tool_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::tool(format!("Failed to spawn {}: {}", self.tool_path, e)))?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                Error::tool(format!(
                    "{} timed out after {} seconds",
                    self.tool_path,
                    timeout.as_secs()
                ))
            })?
            .map_err(|e| Error::tool(format!("{} failed: {}", self.tool_path, e)))?;

        Ok(ToolOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Runs the tool and hands every stdout line to `on_line` as it arrives.
    /// Returns the exit code.
    pub async fn run_streaming<F>(&self, args: &[String], timeout: Duration, mut on_line: F) -> Result<i32>
    where
        F: FnMut(&str),
    {
        debug!("Running: {} {}", self.tool_path, args.join(" "));

        let mut child = Command::new(&self.tool_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::tool(format!("Failed to spawn {}: {}", self.tool_path, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::tool("Tool stdout was not captured"))?;

        let streamed = async {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                on_line(&line);
            }
            child.wait().await
        };

        let status = tokio::time::timeout(timeout, streamed)
            .await
            .map_err(|_| {
                Error::tool(format!(
                    "{} timed out after {} seconds",
                    self.tool_path,
                    timeout.as_secs()
                ))
            })??;

        Ok(status.code().unwrap_or(-1))
    }
}

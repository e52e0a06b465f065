//! Automation backend
//!
//! The browser automation that actually drives the target LLM's web UI
//! lives in an external driver program. The bridge spawns it once at
//! startup and exchanges one JSON line per invocation over stdin/stdout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::error::BridgeError;

/// A single call into the automation driver.
#[derive(Debug, Clone, Serialize)]
pub struct InvokeRequest {
    /// Target model whose web UI the driver should address
    pub model: String,
    /// Fully composed prompt text
    pub prompt: String,
    /// Inline images, oldest first, original data-URI encoding
    pub images: Vec<String>,
    /// Whether the driver may switch browser tabs while typing
    pub tab_switch: bool,
}

/// Opaque collaborator that drives the target LLM's web UI and returns
/// its textual reply.
///
/// One invocation per inbound chat request; the call blocks until the
/// full reply text is available. No timeout is imposed at this seam, so
/// a hung driver blocks that request indefinitely.
#[async_trait]
pub trait AutomationBackend: Send + Sync {
    /// Dispatch one prompt and wait for the reply text.
    async fn invoke(&self, request: InvokeRequest) -> Result<String, BridgeError>;
}

/// Wire reply from the driver process.
#[derive(Debug, Deserialize)]
struct DriverReply {
    status: String,
    data: Option<String>,
    message: Option<String>,
}

/// Persistent driver subprocess speaking one JSON line per invocation.
///
/// The handles sit behind their own locks; invocations already serialize
/// through the rate gate, the locks only guard against teardown racing a
/// late call.
pub struct DriverProcess {
    child: Mutex<Option<Child>>,
    stdin: Mutex<Option<ChildStdin>>,
    stdout: Mutex<Option<BufReader<ChildStdout>>>,
}

impl DriverProcess {
    /// Spawn the driver from the configured command.
    pub fn spawn(command: &str) -> Result<Self, BridgeError> {
        let mut child = Command::new(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(BridgeError::SpawnFailed)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Unavailable("stdin handle missing".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Unavailable("stdout handle missing".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BridgeError::Unavailable("stderr handle missing".to_string()))?;

        info!(command = %command, pid = child.id(), "Driver process spawned");

        // Surface driver diagnostics as they arrive instead of holding
        // them until exit.
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if !line.trim().is_empty() {
                    error!(stderr = %line, "Driver process stderr output");
                }
            }
        });

        Ok(Self {
            child: Mutex::new(Some(child)),
            stdin: Mutex::new(Some(stdin)),
            stdout: Mutex::new(Some(BufReader::new(stdout))),
        })
    }

    /// Check whether the driver exited, consuming its status if so.
    async fn exit_status(&self) -> Option<String> {
        let mut child_guard = self.child.lock().await;
        let child = child_guard.as_mut()?;
        match child.try_wait() {
            Ok(Some(status)) => Some(format!("{}", status)),
            Ok(None) => None,
            Err(e) => Some(format!("status unavailable: {}", e)),
        }
    }
}

#[async_trait]
impl AutomationBackend for DriverProcess {
    async fn invoke(&self, request: InvokeRequest) -> Result<String, BridgeError> {
        debug!(
            model = %request.model,
            prompt_len = request.prompt.len(),
            image_count = request.images.len(),
            "Dispatching prompt to driver"
        );

        let request_json = serde_json::to_string(&request)?;

        {
            let mut stdin_guard = self.stdin.lock().await;
            let stdin = stdin_guard
                .as_mut()
                .ok_or_else(|| BridgeError::Unavailable("stdin handle gone".to_string()))?;
            stdin.write_all(request_json.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.flush().await?;
        }

        let reply_line = {
            let mut stdout_guard = self.stdout.lock().await;
            let stdout = stdout_guard
                .as_mut()
                .ok_or_else(|| BridgeError::Unavailable("stdout handle gone".to_string()))?;

            let mut buffer = String::new();
            let bytes_read = stdout.read_line(&mut buffer).await?;
            if bytes_read == 0 {
                let status = self
                    .exit_status()
                    .await
                    .unwrap_or_else(|| "EOF with driver still running".to_string());
                error!(status = %status, "Driver closed its stdout before answering");
                return Err(BridgeError::DriverExited(status));
            }
            buffer.trim().to_string()
        };

        let reply: DriverReply = serde_json::from_str(&reply_line)?;
        match reply.status.as_str() {
            "success" => Ok(reply.data.unwrap_or_default()),
            "error" => {
                let message = reply
                    .message
                    .unwrap_or_else(|| "Unknown driver error".to_string());
                error!(error = %message, "Driver returned an error");
                Err(BridgeError::DriverFailed(message))
            }
            other => Err(BridgeError::DriverFailed(format!(
                "Unexpected driver reply status: {}",
                other
            ))),
        }
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        // Can't await in Drop; start_kill detaches the actual reaping.
        if let Ok(mut child_guard) = self.child.try_lock() {
            if let Some(mut child) = child_guard.take() {
                let _ = child.start_kill();
            }
        }
    }
}

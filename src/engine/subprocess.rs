use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use super::{EngineError, EngineOutput, EngineRequest, PricingEngine};
use crate::config::AppConfig;

const STDERR_TAIL_CHARS: usize = 500;

/// Runs the pricing computation as an isolated process per request.
///
/// Exchange protocol: the parameter document is written to
/// `<work_dir>/params_<uuid>.json`, the process is invoked as
/// `<command> <script> <params_path> <result_path>` and must write the result
/// document to `<work_dir>/result_<uuid>.json` before exiting zero. Both
/// scratch files are removed when the call ends, whatever the outcome.
pub struct SubprocessEngine {
    command: String,
    script: PathBuf,
    work_dir: PathBuf,
    timeout: Duration,
}

impl SubprocessEngine {
    pub fn new(
        command: impl Into<String>,
        script: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            script: script.into(),
            work_dir: work_dir.into(),
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.engine_command.clone(),
            config.engine_script.clone(),
            config.engine_work_dir.clone(),
            config.engine_timeout,
        )
    }
}

#[async_trait]
impl PricingEngine for SubprocessEngine {
    async fn optimize(&self, request: &EngineRequest) -> Result<EngineOutput, EngineError> {
        tokio::fs::create_dir_all(&self.work_dir).await?;

        let params_path = self
            .work_dir
            .join(format!("params_{}.json", request.correlation_id));
        let result_path = self
            .work_dir
            .join(format!("result_{}.json", request.correlation_id));

        // Removes both files on every exit path, including cancellation.
        let _scratch = ScratchFiles {
            paths: [params_path.clone(), result_path.clone()],
        };

        let document = serde_json::to_vec(request).map_err(EngineError::Encode)?;
        tokio::fs::write(&params_path, document).await?;

        let mut child = Command::new(&self.command)
            .arg(&self.script)
            .arg(&params_path)
            .arg(&result_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain stderr concurrently so a chatty engine can't block on a full
        // pipe while we wait on its exit status.
        let stderr_pipe = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(mut pipe) = stderr_pipe {
                let _ = pipe.read_to_string(&mut buf).await;
            }
            buf
        });

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                let _ = child.wait().await;
                stderr_task.abort();
                return Err(EngineError::TimedOut(self.timeout));
            }
        };

        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(EngineError::NonZeroExit {
                code: status.code().unwrap_or(-1),
                stderr: stderr_tail(&stderr),
            });
        }

        // A zero exit with no result document is still a failed computation.
        let raw = match tokio::fs::read(&result_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::MissingResult)
            }
            Err(e) => return Err(EngineError::Io(e)),
        };

        serde_json::from_slice(&raw).map_err(|e| EngineError::Malformed(e.to_string()))
    }
}

struct ScratchFiles {
    paths: [PathBuf; 2],
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    match trimmed.char_indices().nth_back(STDERR_TAIL_CHARS) {
        Some((idx, _)) => trimmed[idx..].to_string(),
        None => trimmed.to_string(),
    }
}

//! External training process.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use surveyor_core::config::RetrainingConfig;
use surveyor_core::errors::{RetrainingError, SurveyorResult};
use surveyor_core::traits::{ITrainingRunner, TrainingOutput, TrainingRequest};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Runs `training_command training_script --output-dir <dataset> --base-model <model>`
/// and blocks until it exits or the timeout elapses.
#[derive(Debug, Clone)]
pub struct ProcessTrainingRunner {
    command: String,
    script: PathBuf,
    base_model: PathBuf,
    timeout: Duration,
}

impl ProcessTrainingRunner {
    pub fn new(config: &RetrainingConfig) -> Self {
        Self {
            command: config.training_command.clone(),
            script: config.training_script.clone(),
            base_model: config.base_model.clone(),
            timeout: Duration::from_secs(config.process_timeout_secs),
        }
    }

    fn build_command(&self, request: &TrainingRequest) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(&self.script)
            .arg("--output-dir")
            .arg(&request.dataset_dir)
            .arg("--base-model")
            .arg(&self.base_model)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl ITrainingRunner for ProcessTrainingRunner {
    fn run(&self, request: &TrainingRequest) -> SurveyorResult<TrainingOutput> {
        let mut child = self
            .build_command(request)
            .spawn()
            .map_err(|e| RetrainingError::SpawnFailed {
                command: self.command.clone(),
                reason: e.to_string(),
            })?;
        info!(job_id = %request.job_id, pid = child.id(), "training process started");

        // Drain both pipes so a chatty process never blocks on a full buffer.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = wait_with_timeout(&mut child, self.timeout)?;
        let output = TrainingOutput {
            stdout: join_output(stdout),
            stderr: join_output(stderr),
        };

        match status {
            Some(status) if status.success() => {
                debug!(job_id = %request.job_id, "training process exited cleanly");
                Ok(output)
            }
            Some(status) => Err(RetrainingError::ProcessFailed {
                exit_code: status.code(),
                stderr: tail(&output.stderr),
            }
            .into()),
            None => Err(RetrainingError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
            .into()),
        }
    }
}

/// `Ok(None)` when the timeout elapsed and the child was killed.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> SurveyorResult<Option<std::process::ExitStatus>> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if started.elapsed() >= timeout {
            warn!(pid = child.id(), timeout_secs = timeout.as_secs(), "killing training process");
            if let Err(e) = child.kill() {
                warn!(error = %e, "failed to kill training process");
            }
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(timeout.saturating_sub(started.elapsed())));
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_output(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Last few KB of stderr; training logs are long.
fn tail(stderr: &str) -> String {
    const MAX: usize = 4096;
    if stderr.len() <= MAX {
        return stderr.to_string();
    }
    let mut start = stderr.len() - MAX;
    while !stderr.is_char_boundary(start) {
        start += 1;
    }
    stderr[start..].to_string()
}

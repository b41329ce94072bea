//! # CommandTrainer
//!
//! Runs the model trainer as an external process, one process per job.
//!
//! The job is written to the child's stdin as JSON:
//!
//! ```json
//! {"dataset": "EURUSD60.csv", "data": "{\"columns\": ...}", "genes": [5, 12, 300], "allowed_hours": [4, 9, 17]}
//! ```
//!
//! The child must exit successfully and print `[accuracy, wins, losses]` as the
//! last non-empty line of its stdout. Anything else is a failed job.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EvaluationJob, Trainer, TrainerResult};
use crate::error::{Result, SearchError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTrainer {
    /// Executable to launch.
    pub program: String,
    /// Arguments passed before anything else.
    #[serde(default)]
    pub args: Vec<String>,
    /// Seconds a single process may run before it is killed; `None` never kills.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl CommandTrainer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout_secs: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_secs = timeout.map(|t| t.as_secs().max(1));
        self
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn run(&self, job: &EvaluationJob) -> Result<TrainerResult> {
        self.run_with_deadline(job, self.timeout())
    }

    fn run_with_deadline(
        &self,
        job: &EvaluationJob,
        timeout: Option<Duration>,
    ) -> Result<TrainerResult> {
        let payload = serde_json::to_vec(job)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Stdin is written on its own thread while the output pipes drain.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SearchError::Dispatch("trainer stdin unavailable".to_string()))?;
        thread::spawn(move || {
            if let Err(e) = stdin.write_all(&payload) {
                debug!(error = %e, "trainer closed stdin early");
            }
        });
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let Some(status) = wait_until(&mut child, timeout)? else {
            warn!(program = %self.program, dataset = %job.dataset, "trainer exceeded its deadline, killed");
            return Ok(TrainerResult::failure(format!(
                "trainer killed after {}s",
                timeout.map_or(0, |t| t.as_secs())
            )));
        };

        let stdout = collect(stdout)?;
        if !status.success() {
            let stderr = collect(stderr)?;
            return Ok(TrainerResult::failure(format!(
                "trainer exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        Ok(parse_output(&stdout))
    }
}

/// Waits for `child` to exit. Kills and reaps it once `timeout` has elapsed,
/// returning `None`.
fn wait_until(child: &mut Child, timeout: Option<Duration>) -> Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return Ok(Some(child.wait()?));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            // The child may exit between try_wait and kill.
            if let Err(e) = child.kill() {
                debug!(error = %e, "kill failed");
            }
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<String>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buffer)?;
        }
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    })
}

fn collect(reader: JoinHandle<std::io::Result<String>>) -> Result<String> {
    reader
        .join()
        .map_err(|_| SearchError::Dispatch("trainer output reader panicked".to_string()))?
        .map_err(SearchError::from)
}

impl Trainer for CommandTrainer {
    fn train(&self, job: &EvaluationJob) -> TrainerResult {
        self.run(job)
            .unwrap_or_else(|e| TrainerResult::failure(format!("trainer could not run: {}", e)))
    }
}

/// Reads `[accuracy, wins, losses]` from the last non-empty line of `stdout`.
pub fn parse_output(stdout: &str) -> TrainerResult {
    let Some(line) = stdout.lines().rev().map(str::trim).find(|l| !l.is_empty()) else {
        return TrainerResult::failure("trainer printed nothing");
    };

    match serde_json::from_str::<(f64, u64, u64)>(line) {
        Ok((accuracy, wins, losses)) => TrainerResult::success(accuracy, wins, losses),
        Err(e) => TrainerResult::failure(format!("malformed trainer result {:?}: {}", line, e)),
    }
}

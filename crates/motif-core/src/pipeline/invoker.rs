use crate::domain::{MotifError, MotifResult};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const FIRST_POLL_INTERVAL: Duration = Duration::from_millis(5);
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub arguments: Vec<String>,
    pub working_dir: PathBuf,
    pub stdin: Option<String>,
}

impl CommandLine {
    pub fn render(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.arguments.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs one assembled command line to completion or until `timeout` expires.
pub trait Invoker: Send + Sync {
    fn invoke(&self, command: &CommandLine, timeout: Duration) -> MotifResult<ProcessOutput>;
}

/// Spawns the program as a child process.
///
/// Stdin is fed and both output streams are drained on their own threads,
/// so a child blocked on a full pipe cannot stall the wait loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubprocessInvoker;

impl Invoker for SubprocessInvoker {
    fn invoke(&self, command: &CommandLine, timeout: Duration) -> MotifResult<ProcessOutput> {
        let started = Instant::now();
        let mut child = Command::new(&command.program)
            .args(&command.arguments)
            .current_dir(&command.working_dir)
            .stdin(if command.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                MotifError::process(
                    "PROCESS.SPAWN",
                    format!("failed to start '{}': {}", command.program.display(), source),
                )
            })?;

        let stdin_writer = match (child.stdin.take(), command.stdin.clone()) {
            (Some(pipe), Some(text)) => Some(spawn_writer(pipe, text)),
            _ => None,
        };
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = match wait_with_deadline(&mut child, timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill_and_reap(&mut child);
                // Reader threads finish on their own once the pipes close.
                return Err(MotifError::timeout(
                    "PROCESS.TIMEOUT",
                    format!(
                        "'{}' did not finish within {}s and was killed",
                        command.program.display(),
                        timeout.as_secs_f64()
                    ),
                ));
            }
            Err(source) => {
                kill_and_reap(&mut child);
                return Err(MotifError::process(
                    "PROCESS.WAIT",
                    format!(
                        "failed to wait for '{}': {}",
                        command.program.display(),
                        source
                    ),
                ));
            }
        };

        if let Some(writer) = stdin_writer {
            join_stream(writer, "stdin")?;
        }
        let stdout = join_reader(stdout_reader, "stdout")?;
        let stderr = join_reader(stderr_reader, "stderr")?;

        Ok(ProcessOutput {
            exit_code: status.code(),
            stdout,
            stderr,
            elapsed: started.elapsed(),
        })
    }
}

fn spawn_writer(mut pipe: impl Write + Send + 'static, text: String) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || match pipe.write_all(text.as_bytes()) {
        // The child may exit without reading everything it was sent.
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    })
}

fn spawn_reader(
    pipe: Option<impl Read + Send + 'static>,
) -> Option<JoinHandle<io::Result<Vec<u8>>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            pipe.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    })
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    let mut interval = FIRST_POLL_INTERVAL;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(interval.min(deadline - now));
        interval = (interval * 2).min(MAX_POLL_INTERVAL);
    }
}

fn kill_and_reap(child: &mut Child) {
    if let Err(error) = child.kill() {
        tracing::debug!(%error, "kill after deadline failed; child already exited");
    }
    if let Err(error) = child.wait() {
        tracing::warn!(%error, "failed to reap killed child process");
    }
}

fn join_stream<T>(handle: JoinHandle<io::Result<T>>, stream: &str) -> MotifResult<T> {
    handle
        .join()
        .map_err(|_| {
            MotifError::process(
                "PROCESS.STREAM",
                format!("{} pump thread panicked", stream),
            )
        })?
        .map_err(|source| {
            MotifError::process(
                "PROCESS.STREAM",
                format!("failed to transfer child {}: {}", stream, source),
            )
        })
}

fn join_reader(
    handle: Option<JoinHandle<io::Result<Vec<u8>>>>,
    stream: &str,
) -> MotifResult<String> {
    match handle {
        Some(handle) => {
            let bytes = join_stream(handle, stream)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        None => Ok(String::new()),
    }
}

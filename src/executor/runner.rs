// Executable runner: launch one external program per call and capture its output

use crate::executor::error::{ExecutorError, Result};
use crate::executor::tee::Tee;
use crate::executor::types::{Options, Output, Stream};
use std::ffi::{OsStr, OsString};
use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Instant;
use tracing::{Span, debug, info, info_span, warn};

/// A named external program that can be invoked repeatedly
///
/// Holds only the program name and the span its log events are recorded under.
#[derive(Debug, Clone)]
pub struct Executable {
    name: String,
    span: Span,
}

impl Executable {
    /// Wrap `name`, resolved against `PATH` at invocation time unless it is a path
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let span = info_span!("executable", name = %name);
        Self { name, span }
    }

    /// Wrap `name`, recording log events under the caller's span
    pub fn with_span(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the program with `args` and block until it exits
    ///
    /// The child sees the program name as argv[0] followed by `args`.
    /// Output written by the child is returned in full; writers given in
    /// `options` receive the same bytes as they arrive. Any failure after
    /// the child started still carries the output captured up to that point.
    pub fn execute<I, S>(&self, options: Options<'_>, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let _entered = self.span.enter();

        let args: Vec<OsString> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_os_string())
            .collect();

        let mut command = Command::new(&self.name);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = options.working_dir() {
            command.current_dir(dir);
        }

        if !options.env.is_empty() {
            command.env_clear();
            command.envs(options.env.iter().map(|(k, v)| (k, v)));
        }

        debug!(
            program = %self.name,
            args = ?args,
            dir = ?options.working_dir(),
            env_overrides = options.env.len(),
            "starting executable"
        );

        let start = Instant::now();

        let mut child = command.spawn().map_err(|source| {
            warn!(program = %self.name, error = %source, "failed to start executable");
            ExecutorError::Spawn {
                program: self.name.clone(),
                source,
            }
        })?;

        let child_stdout = child.stdout.take();
        let child_stderr = child.stderr.take();
        let Options { stdout, stderr, .. } = options;

        // Drain both pipes while the child runs; a full pipe blocks the child.
        let ((stdout_bytes, stdout_result), (stderr_bytes, stderr_result)) =
            thread::scope(|scope| {
                let stdout_reader = scope.spawn(move || drain(child_stdout, stdout));
                let stderr_captured = drain(child_stderr, stderr);
                let stdout_captured = stdout_reader
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                (stdout_captured, stderr_captured)
            });

        let output = Output::from_bytes(stdout_bytes, stderr_bytes);
        let status = child.wait();
        let duration_ms = start.elapsed().as_millis() as u64;

        let status = match status {
            Ok(status) => status,
            Err(source) => {
                return Err(ExecutorError::Wait {
                    program: self.name.clone(),
                    source,
                    output,
                });
            }
        };

        info!(
            program = %self.name,
            exit_code = status.code().unwrap_or(-1),
            duration_ms = duration_ms,
            stdout_bytes = output.stdout_bytes.len(),
            stderr_bytes = output.stderr_bytes.len(),
            "executable finished"
        );

        for (stream, result) in [(Stream::Stdout, stdout_result), (Stream::Stderr, stderr_result)] {
            if let Err(source) = result {
                return Err(ExecutorError::Capture {
                    program: self.name.clone(),
                    stream,
                    source,
                    output,
                });
            }
        }

        check_status(status, output)
    }
}

/// Copy a child pipe into an internal buffer, teeing to `forward` when given
///
/// Returns whatever was captured even when the copy fails. The pipe is
/// dropped on return so a child blocked on a full pipe is released.
fn drain<R: Read>(
    pipe: Option<R>,
    forward: Option<&mut (dyn Write + Send)>,
) -> (Vec<u8>, io::Result<()>) {
    let mut captured = Vec::new();
    let Some(mut pipe) = pipe else {
        return (captured, Ok(()));
    };

    // Caller's writer first: a chunk it rejects is never captured.
    let result = {
        let mut tee = Tee::new();
        if let Some(forward) = forward {
            tee.push(forward);
        }
        tee.push(&mut captured);
        io::copy(&mut pipe, &mut tee).and_then(|_| tee.flush())
    };

    (captured, result)
}

fn check_status(status: ExitStatus, output: Output) -> Result<Output> {
    if status.success() {
        return Ok(output);
    }

    match (status.code(), terminating_signal(&status)) {
        (_, Some(signal)) => Err(ExecutorError::Signal { signal, output }),
        (Some(code), None) => Err(ExecutorError::ExitStatus { code, output }),
        (None, None) => Err(ExecutorError::ExitStatus { code: -1, output }),
    }
}

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
